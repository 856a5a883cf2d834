use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, Error, ErrorKind, Output, State, Value, escape_formatter};
use once_cell::sync::OnceCell;

use crate::core_api::Result;
use crate::core_api::error::PreviewError;

/// Name of the page scaffold template.
pub const PAGE: &str = "page.html";
/// Name of the package body template.
pub const PACKAGE: &str = "package.html";

static BUILTIN: OnceCell<Arc<Templates>> = OnceCell::new();

/// The compiled template pair. Immutable once built and safe to share between threads.
#[derive(Debug)]
pub struct Templates {
	env: Environment<'static>,
}

impl Templates {
	/// Compile a page scaffold and a package body template.
	pub fn compile(page: impl Into<String>, package: impl Into<String>) -> Result<Self> {
		let mut env = Environment::new();
		env.set_trim_blocks(true);
		env.set_lstrip_blocks(true);
		env.set_formatter(html_formatter);
		for (name, source) in [(PAGE, page.into()), (PACKAGE, package.into())] {
			env.add_template_owned(name, source)
				.map_err(|source| PreviewError::Template {
					name: name.to_string(),
					source,
				})?;
		}
		Ok(Self { env })
	}

	/// Load `page.html` and `package.html` from `dir`.
	pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
		let dir = dir.as_ref();
		let page = std::fs::read_to_string(dir.join(PAGE))?;
		let package = std::fs::read_to_string(dir.join(PACKAGE))?;
		Self::compile(page, package)
	}

	/// The templates shipped with the crate, compiled on first use.
	pub fn builtin() -> Result<Arc<Self>> {
		BUILTIN
			.get_or_try_init(|| {
				Self::compile(include_str!("../../templates/page.html"), include_str!("../../templates/package.html"))
					.map(Arc::new)
			})
			.cloned()
	}

	pub(crate) fn env(&self) -> &Environment<'static> {
		&self.env
	}
}

/// Escape interpolated strings the way Go's `template.HTMLEscapeString` does. Only `& < > " '`
/// are rewritten so paths and URLs in doc text stay readable in the page source.
fn html_formatter(out: &mut Output<'_>, state: &State<'_, '_>, value: &Value) -> std::result::Result<(), Error> {
	let text = match value.as_str() {
		Some(text) if !value.is_safe() && matches!(state.auto_escape(), AutoEscape::Html) => text,
		_ => return escape_formatter(out, state, value),
	};
	out.write_str(&escape_html(text))
		.map_err(|_| Error::new(ErrorKind::WriteFailure, "failed to write template output"))
}

fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&#34;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builtin_templates_compile_once() {
		let first = Templates::builtin().expect("builtin templates");
		let second = Templates::builtin().expect("builtin templates");
		assert!(Arc::ptr_eq(&first, &second));
		assert!(first.env().get_template(PAGE).is_ok());
		assert!(first.env().get_template(PACKAGE).is_ok());
	}

	#[test]
	fn broken_templates_fail_at_compile_time() {
		let err = Templates::compile("{{ title }}", "{% for x in %}").unwrap_err();
		match err {
			PreviewError::Template { name, .. } => assert_eq!(name, PACKAGE),
			other => panic!("expected template error, got {other:?}"),
		}
	}

	#[test]
	fn escaping_leaves_slashes_alone() {
		assert_eq!(
			escape_html(r#"reads a/b & <c> "d" it's"#),
			"reads a/b &amp; &lt;c&gt; &#34;d&#34; it&#39;s"
		);

		let templates = Templates::compile("{{ body }}", "{{ pdoc }}|{{ safe }}").expect("compile");
		let template = templates.env().get_template(PACKAGE).expect("package template");
		let rendered = template
			.render(minijinja::context! {
				pdoc => "see https://go.dev/doc for a/b",
				safe => Value::from_safe_string("<b>x</b>".to_string()),
			})
			.expect("render");
		assert_eq!(rendered, "see https://go.dev/doc for a/b|<b>x</b>");
	}

	#[test]
	fn templates_load_from_a_directory() {
		let dir = tempfile::tempdir().expect("tempdir");
		std::fs::write(dir.path().join(PAGE), "<title>{{ title }}</title>{{ body }}").expect("write page");
		std::fs::write(dir.path().join(PACKAGE), "{{ pdoc.name }}").expect("write package");
		let templates = Templates::from_dir(dir.path()).expect("load");
		assert!(templates.env().get_template(PACKAGE).is_ok());

		let missing = tempfile::tempdir().expect("tempdir");
		assert!(matches!(Templates::from_dir(missing.path()), Err(PreviewError::Io(_))));
	}
}
