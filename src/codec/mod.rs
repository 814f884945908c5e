//! Plain-text graph codec
//!
//! A file holds one or more graph blocks:
//!
//! ```text
//! #GraphDef
//! People
//! #GraphDefEnd
//! #NodeDef
//! Dave
//! Bob
//! #NodeDefEnd
//! #RelationDef
//! Dave,Knows,Bob
//! #RelationDefEnd
//! #PropertyDef
//! Dave,Smart
//! #PropertyDefEnd
//! ```
//!
//! The `#PropertyDef` section is optional and only written for graphs that
//! carry properties. Names, labels and properties cannot contain commas or
//! line breaks, and cannot be one of the section markers.

mod decoder;
mod encoder;

pub use decoder::decode;
pub use encoder::{encode, encode_into};

use thiserror::Error;

pub const GRAPH_DEF: &str = "#GraphDef";
pub const GRAPH_DEF_END: &str = "#GraphDefEnd";
pub const NODE_DEF: &str = "#NodeDef";
pub const NODE_DEF_END: &str = "#NodeDefEnd";
pub const RELATION_DEF: &str = "#RelationDef";
pub const RELATION_DEF_END: &str = "#RelationDefEnd";
pub const PROPERTY_DEF: &str = "#PropertyDef";
pub const PROPERTY_DEF_END: &str = "#PropertyDefEnd";

/// Every section marker, opening and closing
pub const MARKERS: [&str; 8] = [
    GRAPH_DEF,
    GRAPH_DEF_END,
    NODE_DEF,
    NODE_DEF_END,
    RELATION_DEF,
    RELATION_DEF_END,
    PROPERTY_DEF,
    PROPERTY_DEF_END,
];

/// Field separator inside relation and property lines
pub const FIELD_SEPARATOR: char = ',';

/// Codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    /// Malformed input text
    #[error("Format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// A graph contains a value the text format cannot represent
    #[error("Cannot encode {0}")]
    Unencodable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        CodecError::Format {
            line,
            message: message.into(),
        }
    }

    /// Line number for format errors
    pub fn line(&self) -> Option<usize> {
        match self {
            CodecError::Format { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;

/// True when the trimmed line is one of the section markers
///
/// Other text starting with `#` is ordinary data.
pub fn is_marker(line: &str) -> bool {
    let line = line.trim();
    MARKERS.iter().any(|marker| *marker == line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = CodecError::format(7, "expected #NodeDef");
        assert_eq!(err.to_string(), "Format error at line 7: expected #NodeDef");
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn test_marker_detection() {
        assert!(is_marker("#GraphDef"));
        assert!(is_marker("  #PropertyDefEnd\t"));
        assert!(!is_marker("#general"));
        assert!(!is_marker("#GraphDefinition"));
        assert!(!is_marker("Dave"));
        assert!(!is_marker("C#"));
    }
}
