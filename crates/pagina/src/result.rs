//! Result and error types for Pagina.
//!
//! "No match" is never an error: a selector that matches nothing resolves to
//! `None` and an unmatchable assertion target, so chained multi-level access
//! needs no error handling along the way. The variants here cover genuine
//! misuse surfaced through the fallible APIs.

use thiserror::Error;

/// Result type for Pagina operations
pub type PaginaResult<T> = Result<T, PaginaError>;

/// Errors that can occur in Pagina
#[derive(Debug, Error)]
pub enum PaginaError {
    /// No extension member with the given name
    #[error("No extension member named '{name}'")]
    UnknownMember {
        /// Member name that was looked up
        name: String,
    },

    /// The member exists but is not a method
    #[error("Extension member '{name}' is not callable")]
    NotCallable {
        /// Member name that was invoked
        name: String,
    },
}
