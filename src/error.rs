/// Error types for fragment operations.
use thiserror::Error;

/// Result type for fragment operations.
pub type Result<T> = std::result::Result<T, FragError>;

/// Error types for fragment operations.
///
/// Element parsing itself never fails: malformed markup is logged and a
/// best-effort partial value is returned. These errors only surface at
/// caller-misuse boundaries, such as handing a fragment whose root tag is
/// not the requested element kind.
#[derive(Error, Debug)]
pub enum FragError {
    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// The fragment's root tag is not the requested element kind
    #[error("unexpected root element: expected <{expected}>, got <{got}>")]
    UnexpectedRoot { expected: String, got: String },

    /// The input contained no element at all
    #[error("empty fragment")]
    EmptyFragment,
}

impl From<quick_xml::Error> for FragError {
    fn from(err: quick_xml::Error) -> Self {
        FragError::Xml(err.to_string())
    }
}
