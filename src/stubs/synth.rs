use std::collections::HashSet;
use std::fmt::Write;

use super::scan::UnresolvedIdentifier;

/// Alias target of every synthesized declaration.
pub const PLACEHOLDER_TYPE: &str = "undeclaredType";

/// File name the synthesized source is parsed under.
pub const STUB_FILE: &str = "types.go";

const STUB_COMMENT: &str = "// Undeclared type, presumably this is declared in another file";

/// Synthesized source declaring one placeholder alias per unresolved receiver type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubSource {
	/// Package the stubs belong to.
	pub package: String,
	/// Declared names in order, without duplicates.
	pub names: Vec<String>,
	/// Go source text.
	pub text: String,
}

/// Build the stub file for `package`.
///
/// Each distinct name yields `type Name = undeclaredType` under an explanatory comment. Every name
/// came out of a successful parse, so the text always parses as a file of the same package.
pub fn synthesize(unresolved: &[UnresolvedIdentifier], package: &str) -> StubSource {
	let mut seen = HashSet::new();
	let mut names = Vec::new();
	let mut text = format!("package {package}\n\n");

	for ident in unresolved {
		if !seen.insert(ident.name.as_str()) {
			continue;
		}
		let _ = writeln!(text, "{STUB_COMMENT}");
		let _ = writeln!(text, "type {} = {PLACEHOLDER_TYPE}", ident.name);
		names.push(ident.name.clone());
	}

	tracing::debug!(package, stubs = ?names, "synthesized receiver stubs");

	StubSource {
		package: package.to_string(),
		names,
		text,
	}
}
