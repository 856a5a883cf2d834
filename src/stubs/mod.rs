//! Placeholder declarations for receiver types the file does not declare.

mod scan;
mod synth;

pub use scan::{UnresolvedIdentifier, unresolved_receivers};
pub use synth::{PLACEHOLDER_TYPE, STUB_FILE, StubSource, synthesize};
