use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// Name and size of an uploaded file. This is all that survives persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
}

/// An uploaded file held in memory.
#[derive(Clone, PartialEq)]
pub struct FileHandle {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn meta(&self) -> FileMeta {
        FileMeta {
            name: self.name.clone(),
            size: self.bytes.len() as u64,
        }
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// A file-typed answer: either the live upload or the descriptor restored
/// from a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum FileAnswer {
    Loaded(FileHandle),
    Descriptor(FileMeta),
}

impl FileAnswer {
    pub fn meta(&self) -> FileMeta {
        match self {
            FileAnswer::Loaded(handle) => handle.meta(),
            FileAnswer::Descriptor(meta) => meta.clone(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileAnswer::Loaded(handle) => &handle.name,
            FileAnswer::Descriptor(meta) => &meta.name,
        }
    }
}

/// Value of a single wizard field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredValue", into = "StoredValue")]
pub enum AnswerValue {
    Text(String),
    Choices(Vec<String>),
    Flag(bool),
    Number(i64),
    Files(Vec<FileAnswer>),
}

impl AnswerValue {
    /// Value typed by a user: text as-is, or parsed as JSON when `as_json`.
    pub fn from_input(raw: String, as_json: bool) -> Result<AnswerValue, serde_json::Error> {
        if as_json {
            serde_json::from_str(&raw)
        } else {
            Ok(AnswerValue::Text(raw))
        }
    }

    /// Same value with every loaded file replaced by its descriptor.
    pub fn without_binary(&self) -> AnswerValue {
        match self {
            AnswerValue::Files(files) => AnswerValue::Files(
                files
                    .iter()
                    .map(|f| FileAnswer::Descriptor(f.meta()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

// Persisted shape. Files are written as `{"files": [{name, size}]}` so an
// empty upload list cannot be confused with an empty choice list.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Text(String),
    Flag(bool),
    Number(i64),
    Choices(Vec<String>),
    Files { files: Vec<FileMeta> },
}

impl From<StoredValue> for AnswerValue {
    fn from(value: StoredValue) -> Self {
        match value {
            StoredValue::Text(s) => AnswerValue::Text(s),
            StoredValue::Flag(b) => AnswerValue::Flag(b),
            StoredValue::Number(n) => AnswerValue::Number(n),
            StoredValue::Choices(c) => AnswerValue::Choices(c),
            StoredValue::Files { files } => {
                AnswerValue::Files(files.into_iter().map(FileAnswer::Descriptor).collect())
            }
        }
    }
}

impl From<AnswerValue> for StoredValue {
    fn from(value: AnswerValue) -> Self {
        match value {
            AnswerValue::Text(s) => StoredValue::Text(s),
            AnswerValue::Flag(b) => StoredValue::Flag(b),
            AnswerValue::Number(n) => StoredValue::Number(n),
            AnswerValue::Choices(c) => StoredValue::Choices(c),
            AnswerValue::Files(files) => StoredValue::Files {
                files: files.iter().map(FileAnswer::meta).collect(),
            },
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Flag(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::Choices(value)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(value: Vec<&str>) -> Self {
        AnswerValue::Choices(value.into_iter().map(str::to_string).collect())
    }
}

impl From<FileHandle> for AnswerValue {
    fn from(value: FileHandle) -> Self {
        AnswerValue::Files(vec![FileAnswer::Loaded(value)])
    }
}

impl From<Vec<FileHandle>> for AnswerValue {
    fn from(value: Vec<FileHandle>) -> Self {
        AnswerValue::Files(value.into_iter().map(FileAnswer::Loaded).collect())
    }
}

/// Accumulated wizard answers, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for defaults and fixtures.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Merge one field, leaving every other field untouched.
    /// Returns whether the stored value changed.
    pub fn merge(&mut self, field: impl Into<String>, value: AnswerValue) -> bool {
        let field = field.into();
        if self.0.get(&field) == Some(&value) {
            return false;
        }
        self.0.insert(field, value);
        true
    }

    /// Merge every field of `other` over `self`.
    pub fn merge_all(&mut self, other: Answers) {
        self.0.extend(other.0);
    }

    pub fn remove(&mut self, field: &str) -> Option<AnswerValue> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&AnswerValue> {
        self.0.get(field)
    }

    /// Text field value, if the field holds text.
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.0.get(field) {
            Some(AnswerValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Selected choices; empty when unset or not a choice list.
    pub fn choices(&self, field: &str) -> &[String] {
        match self.0.get(field) {
            Some(AnswerValue::Choices(c)) => c.as_slice(),
            _ => &[],
        }
    }

    pub fn flag(&self, field: &str) -> Option<bool> {
        match self.0.get(field) {
            Some(AnswerValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn number(&self, field: &str) -> Option<i64> {
        match self.0.get(field) {
            Some(AnswerValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Uploaded files; empty when unset.
    pub fn files(&self, field: &str) -> &[FileAnswer] {
        match self.0.get(field) {
            Some(AnswerValue::Files(f)) => f.as_slice(),
            _ => &[],
        }
    }

    /// Copy of these answers safe to persist: no file content.
    pub fn without_binary(&self) -> Answers {
        Answers(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.without_binary()))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AnswerValue)> for Answers {
    fn from_iter<T: IntoIterator<Item = (String, AnswerValue)>>(iter: T) -> Self {
        Answers(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_input_defaults_to_text() {
        assert_eq!(
            AnswerValue::from_input("2024".to_string(), false).unwrap(),
            AnswerValue::Text("2024".to_string())
        );
        assert_eq!(
            AnswerValue::from_input("true".to_string(), false).unwrap(),
            AnswerValue::Text("true".to_string())
        );
    }

    #[test]
    fn json_input_keeps_its_kind() {
        assert_eq!(
            AnswerValue::from_input("2024".to_string(), true).unwrap(),
            AnswerValue::Number(2024)
        );
        assert_eq!(
            AnswerValue::from_input(r#"["a","b"]"#.to_string(), true).unwrap(),
            AnswerValue::from(vec!["a", "b"])
        );
        assert!(AnswerValue::from_input("not json".to_string(), true).is_err());
    }
}
