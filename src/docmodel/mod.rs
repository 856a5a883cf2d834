//! Format-independent documentation model and its extraction from an assembled package.

mod comment;
mod extract;
mod model;

pub use comment::{DocBlock, Span};
pub use extract::extract;
pub use model::{DocText, DocumentationModel, FuncDoc, ReceiverDoc, TypeDoc, ValueDoc};
