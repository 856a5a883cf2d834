//! Core API for godoc-preview, turning one Go source text into a rendered documentation page.
//!
//! The [`Previewer`] runs every stage of the pipeline in sequence and is independent of the host
//! surface (editor, CLI, web worker). It holds only the compiled templates, so one instance can
//! serve any number of requests.

/// Error types for the core API.
pub mod error;

use std::sync::Arc;

pub use self::error::{PreviewError, Result, SyntaxError};
use crate::docmodel::{DocumentationModel, extract};
use crate::package::assemble;
use crate::render::{PageRenderer, RenderedPage, Templates};
use crate::stubs::{STUB_FILE, synthesize, unresolved_receivers};
use crate::syntax::SourceUnit;

/// File name the user's text is parsed under.
pub const INPUT_FILE: &str = "input.go";

/// Renders godoc-style previews of a single, possibly incomplete Go file.
///
/// Method receivers whose types the file does not declare are kept: the previewer declares a
/// placeholder for each such type in a synthesized second file, assembles both files into one
/// package, and leaves the placeholders out of the rendered type list. Every request builds its
/// own syntax trees, stub file and import proxies; nothing is cached between calls.
///
/// # Examples
///
/// ```
/// use godoc_preview::Previewer;
///
/// let previewer = Previewer::builtin().unwrap();
/// let html = previewer
/// 	.render_preview("package demo\n\nfunc (u *U) Close() error { return nil }\n")
/// 	.unwrap();
/// assert!(html.contains("Close"));
/// ```
#[derive(Debug, Clone)]
pub struct Previewer {
	/// Compiled page scaffold and package body templates.
	templates: Arc<Templates>,

	/// Whether unexported declarations are documented too.
	include_unexported: bool,
}

impl Previewer {
	/// Creates a previewer over an already compiled template pair.
	pub fn new(templates: Arc<Templates>) -> Self {
		Self {
			templates,
			include_unexported: false,
		}
	}

	/// Creates a previewer over the templates shipped with the crate.
	pub fn builtin() -> Result<Self> {
		Ok(Self::new(Templates::builtin()?))
	}

	/// Replaces the template pair.
	pub fn with_templates(mut self, templates: Arc<Templates>) -> Self {
		self.templates = templates;
		self
	}

	/// Enables or disables documenting unexported declarations.
	pub fn with_unexported(mut self, include_unexported: bool) -> Self {
		self.include_unexported = include_unexported;
		self
	}

	/// Returns whether unexported declarations are documented.
	pub fn include_unexported(&self) -> bool {
		self.include_unexported
	}

	/// Builds the documentation model for `source`.
	///
	/// Fails on syntax errors in the text, on receiver forms other than `T` and `*T`, and on
	/// internal assembly defects. Unresolved identifiers that are not receivers are tolerated.
	pub fn document(&self, source: &str) -> Result<DocumentationModel> {
		let unit = SourceUnit::parse(INPUT_FILE, source)?;
		let unresolved = unresolved_receivers(&unit)?;
		let stub = synthesize(&unresolved, unit.package());
		let stub = SourceUnit::parse(STUB_FILE, stub.text)?;
		let pkg = assemble(unit, stub)?;
		Ok(extract(&pkg, self.include_unexported))
	}

	/// Renders `source` and returns the title, body fragment and full page.
	pub fn render_page(&self, source: &str) -> Result<RenderedPage> {
		let model = self.document(source)?;
		let title = format!("Package {}", model.name);
		Ok(PageRenderer::new(Arc::clone(&self.templates)).render(&model, &title))
	}

	/// Renders `source` into a complete HTML page.
	pub fn render_preview(&self, source: &str) -> Result<String> {
		Ok(self.render_page(source)?.html)
	}
}

/// Renders `source` with the built-in templates and default settings.
pub fn render_preview(source: &str) -> Result<String> {
	Previewer::builtin()?.render_preview(source)
}
