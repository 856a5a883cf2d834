//! Live godoc-style documentation preview for a single, possibly incomplete Go source file.
//!
//! The file is parsed with tree-sitter, method receivers whose types are declared elsewhere get
//! placeholder declarations in a synthesized stub file, both files are assembled into one
//! package, and the resulting documentation model is rendered through a pair of HTML templates.

/// Go source parsing: syntax trees, declarations and free identifiers.
pub mod syntax;

/// Detection of undeclared receiver types and synthesis of their placeholder declarations.
pub mod stubs;

/// Assembly of the user's file and the stub file into one package.
pub mod package;

/// Documentation model extraction.
pub mod docmodel;

/// Template-driven HTML rendering.
pub mod render;

/// Core API for godoc-preview operations.
pub mod core_api;

// Re-export main public API from core_api
pub use crate::core_api::{PreviewError, Previewer, Result, SyntaxError, render_preview};
pub use crate::docmodel::DocumentationModel;
pub use crate::render::{RenderedPage, Templates};
