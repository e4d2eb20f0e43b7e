//! Pending documents and the write phase.
//!
//! A document touched by several categories is loaded once, merged by each
//! of them and written once. [`PendingDocuments::flush`] canonicalizes every
//! pending document and writes only those whose serialized bytes differ from
//! what is on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::canonical::canonicalize;
use crate::document::{Document, DocumentKind};
use crate::error::Result;
use crate::filesystem::write_if_changed;

use super::{enter, Phase, UpdateReport};

/// Documents loaded for merging during one run, keyed by local path.
#[derive(Debug, Default)]
pub struct PendingDocuments {
    documents: BTreeMap<PathBuf, Document>,
}

impl PendingDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending document at `path`, loading it from disk on first use.
    pub fn load(&mut self, kind: DocumentKind, path: &Path) -> Result<&mut Document> {
        if !self.documents.contains_key(path) {
            let document = Document::from_file(kind, path)?;
            self.documents.insert(path.to_path_buf(), document);
        }
        Ok(self
            .documents
            .get_mut(path)
            .expect("pending document inserted above"))
    }

    /// Stages an already merged document.
    pub fn insert(&mut self, path: PathBuf, document: Document) {
        self.documents.insert(path, document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Canonicalizes and writes every pending document.
    pub fn flush(self, report: &mut UpdateReport) -> Result<()> {
        let mut rendered = Vec::with_capacity(self.documents.len());
        for (path, mut document) in self.documents {
            canonicalize(&mut document);
            rendered.push((path, document.to_xml()));
        }
        enter(Phase::Canonicalized);

        for (path, xml) in rendered {
            if write_if_changed(&path, xml.as_bytes())? {
                report.record_written(path);
            } else {
                log::debug!("unchanged {}", path.display());
            }
        }
        enter(Phase::Written);
        Ok(())
    }
}
