use std::sync::Arc;

use minijinja::{Value, context};
use serde::Serialize;

use super::templates::{PACKAGE, PAGE, Templates};
use crate::docmodel::DocumentationModel;

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
	/// Page title.
	pub title: String,
	/// Package body fragment.
	pub body: String,
	/// Full page with the body embedded.
	pub html: String,
}

/// Turns a [`DocumentationModel`] into HTML through a compiled template pair.
#[derive(Debug, Clone)]
pub struct PageRenderer {
	templates: Arc<Templates>,
}

impl PageRenderer {
	/// Create a renderer over `templates`.
	pub fn new(templates: Arc<Templates>) -> Self {
		Self { templates }
	}

	/// Swap the template pair.
	pub fn with_templates(mut self, templates: Arc<Templates>) -> Self {
		self.templates = templates;
		self
	}

	/// Render the package body, then embed it in the page scaffold.
	///
	/// Template failures never abort the render: they are logged and whatever the template wrote
	/// before failing is used as-is.
	pub fn render(&self, model: &DocumentationModel, title: &str) -> RenderedPage {
		let body = self.apply(PACKAGE, context! { pdoc => model });
		let html = self.apply(
			PAGE,
			context! {
				title => title,
				body => Value::from_safe_string(body.clone()),
			},
		);
		RenderedPage {
			title: title.to_string(),
			body,
			html,
		}
	}

	fn apply(&self, name: &str, ctx: Value) -> String {
		let mut buf = Vec::new();
		let result = self
			.templates
			.env()
			.get_template(name)
			.and_then(|template| template.render_to_write(ctx, &mut buf).map(|_| ()));
		if let Err(err) = result {
			tracing::warn!(template = name, error = %err, "template failed, keeping partial output");
		}
		String::from_utf8_lossy(&buf).into_owned()
	}
}
