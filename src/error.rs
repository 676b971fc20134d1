//! Error taxonomy for header, documentation and type-mapping failures.
//!
//! Unsupported constructs (variadic arguments, callback selectors, `_work`
//! variants) are not errors at all; the header parser filters them out.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // -- Structural: header declarations --------------------------------------
    /// The buffered declaration never reached a terminating `;`.
    #[error("declaration does not end with ';': {text}")]
    UnterminatedDeclaration { text: String },

    /// A declaration start line whose name, argument list or return type
    /// could not be extracted.
    #[error("failed to read the {part} of declaration: {text}")]
    MalformedDeclaration { part: &'static str, text: String },

    #[error("empty argument in declaration of {function}")]
    EmptyArgument { function: String },

    // -- Structural: documentation comments -----------------------------------
    #[error("failed to read the param tag: {line}")]
    MalformedParamTag { line: String },

    #[error("invalid param direction `{direction}` for {name}")]
    InvalidDirection { direction: String, name: String },

    #[error("undecodable comment line {line_no}: {text}")]
    UndecodableLine { line_no: usize, text: String },

    #[error("no purpose found")]
    MissingPurpose,

    // -- Missing documentation ------------------------------------------------
    #[error("file not found: {}", path.display())]
    DocumentNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Type mapping ---------------------------------------------------------
    #[error("unknown type `{ty}` for {name}")]
    UnknownType { ty: String, name: String },
}
