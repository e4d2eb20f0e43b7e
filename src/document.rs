//! # Metadata Documents
//!
//! In-memory model of the Metadata API XML documents the tool reconciles:
//! profiles, object translations and translation bundles.
//!
//! A document is a [`Record`]: an ordered list of named [`Field`]s, each
//! holding one or more [`Value`]s. Repeated child elements with the same name
//! are grouped under one field in first-occurrence order, so
//!
//! ```xml
//! <Profile>
//!     <fieldPermissions><field>Account.Name</field></fieldPermissions>
//!     <custom>false</custom>
//!     <fieldPermissions><field>Account.Phone</field></fieldPermissions>
//! </Profile>
//! ```
//!
//! becomes a record with a `fieldPermissions` field holding two records and a
//! `custom` field holding one text value. Leaf elements are plain text; the
//! single-element wrapping is only an artifact of the XML layer.
//!
//! Parsing uses `xot`. Serialization is a small pretty printer producing the
//! layout Salesforce tooling emits: XML declaration, four-space indentation,
//! `<tag></tag>` for empty elements and a trailing newline.

use std::path::Path;

use xot::Xot;

use crate::defaults::METADATA_NAMESPACE;
use crate::error::{Error, Result};

/// One value of a field: a text leaf or a nested record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Record(Record),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            Value::Text(_) => None,
        }
    }
}

/// A named group of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub values: Vec<Value>,
}

/// An ordered set of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper appending a text leaf.
    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.push(name, Value::text(value));
        self
    }

    /// Builder-style helper appending a nested record.
    pub fn with_record(mut self, name: &str, record: Record) -> Self {
        self.push(name, Value::Record(record));
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Values of `name`, empty when the field is absent.
    pub fn get(&self, name: &str) -> &[Value] {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.values.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .map(|f| &mut f.values)
    }

    /// First text value of `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).first().and_then(Value::as_text)
    }

    /// Appends a value, creating the field at the end when absent.
    pub fn push(&mut self, name: &str, value: Value) {
        match self.get_mut(name) {
            Some(values) => values.push(value),
            None => self.fields.push(Field {
                name: name.to_string(),
                values: vec![value],
            }),
        }
    }

    /// Replaces the values of `name`. An empty list removes the field.
    pub fn set(&mut self, name: &str, values: Vec<Value>) {
        if values.is_empty() {
            self.remove(name);
            return;
        }
        match self.get_mut(name) {
            Some(existing) => *existing = values,
            None => self.fields.push(Field {
                name: name.to_string(),
                values,
            }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<Value>> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(index).values)
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}

/// The document families this tool understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `*.profile-meta.xml`
    Profile,
    /// `*.objectTranslation-meta.xml`
    ObjectTranslation,
    /// `*.translation-meta.xml`
    Translations,
}

/// Fixed layout of one document family.
#[derive(Debug)]
pub struct Schema {
    /// Root element name.
    pub root: &'static str,
    /// File name suffix on disk.
    pub suffix: &'static str,
    /// Every known top-level field, in canonical order.
    pub template: &'static [&'static str],
    /// `(collection, key field)` pairs whose records are sorted by key.
    pub sort_keys: &'static [(&'static str, &'static str)],
}

const PROFILE_SCHEMA: Schema = Schema {
    root: "Profile",
    suffix: ".profile-meta.xml",
    template: &[
        "applicationVisibilities",
        "categoryGroupVisibilities",
        "classAccesses",
        "custom",
        "customMetadataTypeAccesses",
        "customPermissions",
        "customSettingAccesses",
        "description",
        "externalDataSourceAccesses",
        "fieldPermissions",
        "flowAccesses",
        "fullName",
        "layoutAssignments",
        "loginHours",
        "loginIpRanges",
        "objectPermissions",
        "pageAccesses",
        "profileActionOverrides",
        "recordTypeVisibilities",
        "tabVisibilities",
        "userLicense",
        "userPermissions",
    ],
    sort_keys: &[
        ("applicationVisibilities", "application"),
        ("classAccesses", "apexClass"),
        ("customMetadataTypeAccesses", "name"),
        ("customPermissions", "name"),
        ("customSettingAccesses", "name"),
        ("externalDataSourceAccesses", "externalDataSource"),
        ("fieldPermissions", "field"),
        ("flowAccesses", "flow"),
        ("layoutAssignments", "layout"),
        ("objectPermissions", "object"),
        ("pageAccesses", "apexPage"),
        ("recordTypeVisibilities", "recordType"),
        ("tabVisibilities", "tab"),
        ("userPermissions", "name"),
    ],
};

const OBJECT_TRANSLATION_SCHEMA: Schema = Schema {
    root: "CustomObjectTranslation",
    suffix: ".objectTranslation-meta.xml",
    template: &[
        "caseValues",
        "fieldSets",
        "fields",
        "fullName",
        "gender",
        "layouts",
        "nameFieldLabel",
        "quickActions",
        "recordTypes",
        "sharingReasons",
        "standardFields",
        "startsWith",
        "validationRules",
        "webLinks",
        "workflowTasks",
    ],
    sort_keys: &[
        ("fieldSets", "name"),
        ("layouts", "layout"),
        ("quickActions", "name"),
        ("recordTypes", "name"),
        ("sharingReasons", "name"),
        ("validationRules", "name"),
        ("webLinks", "name"),
        ("workflowTasks", "name"),
    ],
};

const TRANSLATIONS_SCHEMA: Schema = Schema {
    root: "Translations",
    suffix: ".translation-meta.xml",
    template: &[
        "customApplications",
        "customDataTypeTranslations",
        "customLabels",
        "customPageWebLinks",
        "customTabs",
        "flowDefinitions",
        "fullName",
        "quickActions",
        "reportTypes",
        "scontrols",
    ],
    sort_keys: &[
        ("customApplications", "name"),
        ("customLabels", "name"),
        ("flowDefinitions", "fullName"),
        ("quickActions", "name"),
        ("reportTypes", "name"),
    ],
};

/// Suffix of the per-field translation files living next to object
/// translations.
pub const FIELD_TRANSLATION_SUFFIX: &str = ".fieldTranslation-meta.xml";

impl DocumentKind {
    pub fn schema(self) -> &'static Schema {
        match self {
            DocumentKind::Profile => &PROFILE_SCHEMA,
            DocumentKind::ObjectTranslation => &OBJECT_TRANSLATION_SCHEMA,
            DocumentKind::Translations => &TRANSLATIONS_SCHEMA,
        }
    }

    pub fn suffix(self) -> &'static str {
        self.schema().suffix
    }

    /// Component name of a file of this kind, e.g. `Admin` for
    /// `Admin.profile-meta.xml`.
    pub fn component_name(self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        file_name
            .strip_suffix(self.suffix())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    /// File name of the component `name`.
    pub fn file_name(self, name: &str) -> String {
        format!("{}{}", name, self.suffix())
    }
}

/// A parsed metadata document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    kind: DocumentKind,
    root: Record,
}

impl Document {
    pub fn new(kind: DocumentKind, root: Record) -> Self {
        Self { kind, root }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn root(&self) -> &Record {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Record {
        &mut self.root
    }

    /// Parses XML text, checking that the root element matches `kind`.
    ///
    /// `path` is used only for error messages.
    pub fn parse(kind: DocumentKind, xml: &str, path: &Path) -> Result<Self> {
        let document_error = |message: String| Error::Document {
            path: path.to_path_buf(),
            message,
        };

        let mut xot = Xot::new();
        let doc = xot.parse(xml).map_err(|e| document_error(e.to_string()))?;
        let root = xot
            .document_element(doc)
            .map_err(|e| document_error(e.to_string()))?;

        let root_name = element_name(&xot, root).unwrap_or_default();
        if root_name != kind.schema().root {
            return Err(document_error(format!(
                "expected <{}> root element, found <{}>",
                kind.schema().root,
                root_name
            )));
        }

        Ok(Self {
            kind,
            root: read_record(&xot, root),
        })
    }

    /// Reads and parses a document from disk.
    pub fn from_file(kind: DocumentKind, path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(kind, &xml, path)
    }

    /// Serializes the document as Metadata API XML.
    pub fn to_xml(&self) -> String {
        write_xml(self.kind.schema().root, &self.root)
    }
}

fn element_name(xot: &Xot, node: xot::Node) -> Option<String> {
    let element = xot.element(node)?;
    Some(xot.local_name_str(element.name()).to_string())
}

fn read_record(xot: &Xot, node: xot::Node) -> Record {
    let mut record = Record::new();
    for child in xot.children(node) {
        if let Some(name) = element_name(xot, child) {
            record.push(&name, read_value(xot, child));
        }
    }
    record
}

fn read_value(xot: &Xot, node: xot::Node) -> Value {
    if xot.children(node).any(|child| xot.is_element(child)) {
        return Value::Record(read_record(xot, node));
    }
    let mut text = String::new();
    for child in xot.children(node) {
        if let Some(content) = xot.text_str(child) {
            text.push_str(content);
        }
    }
    Value::Text(text)
}

const INDENT: &str = "    ";

/// Renders `record` as a complete XML document under a root element named
/// `root` in the Metadata API namespace.
pub fn write_xml(root: &str, record: &Record) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!("<{} xmlns=\"{}\">\n", root, METADATA_NAMESPACE));
    write_fields(&mut out, record, 1);
    out.push_str(&format!("</{}>\n", root));
    out
}

fn write_fields(out: &mut String, record: &Record, depth: usize) {
    let indent = INDENT.repeat(depth);
    for field in record.fields() {
        let name = &field.name;
        for value in &field.values {
            let line = match value {
                Value::Text(text) => {
                    format!("{indent}<{name}>{}</{name}>\n", escape_text(text))
                }
                Value::Record(child) if child.fields().is_empty() => {
                    format!("{indent}<{name}></{name}>\n")
                }
                Value::Record(child) => {
                    out.push_str(&format!("{indent}<{name}>\n"));
                    write_fields(out, child, depth + 1);
                    format!("{indent}</{name}>\n")
                }
            };
            out.push_str(&line);
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' => escaped.push_str("&#xD;"),
            other => escaped.push(other),
        }
    }
    escaped
}
