use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Failure to decode a document from its structured form.
///
/// An unrecognized `$type` is never an error; it decodes to
/// [`UnknownBlock`](crate::UnknownBlock) or is dropped (features).
#[derive(Debug, Error, Diagnostic)]
pub enum DecodeError {
    #[error("document is not valid JSON: {0}")]
    #[diagnostic(code(quire::decode::json))]
    Json(#[from] serde_json::Error),

    #[error("`{field}` must be {expected}, found {found}")]
    #[diagnostic(code(quire::decode::shape))]
    Shape {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("malformed `{type_tag}` record: {source}")]
    #[diagnostic(code(quire::decode::malformed))]
    Malformed {
        type_tag: SmolStr,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    pub(crate) fn expected_object(field: &'static str, found: &serde_json::Value) -> Self {
        Self::Shape {
            field,
            expected: "an object",
            found: json_kind(found),
        }
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
