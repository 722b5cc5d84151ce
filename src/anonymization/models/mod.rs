//! Anonymization data models

pub mod category;
pub mod names;
pub mod request;
pub mod span;

pub use category::{AnonymizationConfig, PiiCategory};
pub use names::{NameList, ProtectedTermSet};
pub use request::{AnonymizeRequest, AnonymizeResponse, FailSoftReason, RedactionOutcome, Route};
pub use span::EntitySpan;
