//! Domain error and result types for medredact.
//!
//! All fallible library operations return [`Result<T, RedactError>`]. The
//! collaborator error enums ([`DetectorError`], [`AnonymizeError`],
//! [`TaggerError`], [`NameRedactionError`]) are closed so that the pipeline
//! classifies failures by kind.

pub mod errors;
pub mod result;

pub use errors::{AnonymizeError, DetectorError, NameRedactionError, RedactError, TaggerError};
pub use result::Result;
