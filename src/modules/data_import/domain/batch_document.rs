/// Batch documents: a JSON file holding an array of candidate records
use crate::shared::errors::AppError;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

const MAX_ERROR_CHARS: usize = 240;
const PREVIEW_LEN: usize = 3;

/// Structural problems that prevent validating a batch at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchInputError {
    #[error("Expected a .json file, got '{0}'")]
    WrongExtension(String),

    #[error("File is empty")]
    EmptyFile,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Cannot read file: {0}")]
    Unreadable(String),

    #[error("Expected a JSON array of records")]
    NotAnArray,
}

impl From<BatchInputError> for AppError {
    fn from(err: BatchInputError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Shortens parser messages so a bad file cannot flood the output
fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_ERROR_CHARS {
        return message.to_string();
    }
    let mut short: String = message.chars().take(MAX_ERROR_CHARS).collect();
    short.push('…');
    short
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchDocument {
    name: String,
    records: Vec<Value>,
}

impl BatchDocument {
    pub fn parse(name: &str, text: &str) -> Result<Self, BatchInputError> {
        if !name.to_lowercase().ends_with(".json") {
            return Err(BatchInputError::WrongExtension(name.to_string()));
        }
        if text.trim().is_empty() {
            return Err(BatchInputError::EmptyFile);
        }

        let value: Value = serde_json::from_str(text)
            .map_err(|e| BatchInputError::InvalidJson(truncate_message(&e.to_string())))?;

        match value {
            Value::Array(records) => Ok(Self {
                name: name.to_string(),
                records,
            }),
            _ => Err(BatchInputError::NotAnArray),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BatchInputError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !name.to_lowercase().ends_with(".json") {
            return Err(BatchInputError::WrongExtension(name));
        }

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BatchInputError::Unreadable(format!("{}: {}", path.display(), e)))?;

        Self::parse(&name, &text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// The whole document as one JSON array value
    pub fn as_value(&self) -> Value {
        Value::Array(self.records.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First records of the document, for a quick look before uploading
    pub fn preview(&self) -> &[Value] {
        &self.records[..self.records.len().min(PREVIEW_LEN)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let doc = BatchDocument::parse("cities.JSON", r#"[{"a":1},{"a":2},{"a":3},{"a":4}]"#)
            .unwrap();
        assert_eq!(doc.len(), 4);
        assert_eq!(doc.preview().len(), 3);
        assert_eq!(doc.name(), "cities.JSON");
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            BatchDocument::parse("cities.csv", "[]"),
            Err(BatchInputError::WrongExtension(_))
        ));
        assert_eq!(
            BatchDocument::parse("cities.json", "  \n"),
            Err(BatchInputError::EmptyFile)
        );
        assert!(matches!(
            BatchDocument::parse("cities.json", "[{"),
            Err(BatchInputError::InvalidJson(_))
        ));
        assert_eq!(
            BatchDocument::parse("cities.json", r#"{"name":"x"}"#),
            Err(BatchInputError::NotAnArray)
        );
    }

    #[test]
    fn test_long_parser_messages_are_truncated() {
        let long = "x".repeat(500);
        let short = truncate_message(&long);
        assert_eq!(short.chars().count(), MAX_ERROR_CHARS + 1);
    }

    #[test]
    fn test_converts_to_invalid_input() {
        let err: AppError = BatchInputError::NotAnArray.into();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_unreadable() {
        let result = BatchDocument::load("/definitely/not/here/cities.json").await;
        assert!(matches!(result, Err(BatchInputError::Unreadable(_))));
    }
}
