use tree_sitter::{Language, Node, Parser, Tree};

use crate::core_api::Result;
use crate::core_api::error::{PreviewError, SyntaxError};

/// Longest source excerpt quoted in a syntax error message.
const EXCERPT_LIMIT: usize = 24;

/// Deepest syntax tree accepted. The later passes recurse over the tree, so deeper input is
/// rejected up front instead of exhausting the stack.
const MAX_NESTING_DEPTH: usize = 512;

pub(crate) fn parse_tree(text: &str) -> Result<Tree> {
	let language: Language = tree_sitter_go::LANGUAGE.into();
	let mut parser = Parser::new();
	parser
		.set_language(&language)
		.map_err(|e| PreviewError::Grammar(e.to_string()))?;

	parser
		.parse(text, None)
		.ok_or_else(|| PreviewError::Grammar("tree-sitter parse returned None".to_string()))
}

/// Reject trees tree-sitter recovered from, and files that are not a package clause followed by
/// declarations.
pub(crate) fn check_file(file: &str, tree: &Tree, text: &str) -> std::result::Result<(), SyntaxError> {
	let root = tree.root_node();
	if let Some(node) = too_deep(root) {
		return Err(syntax_error(file, node, "exceeded max nesting depth".to_string()));
	}
	if root.has_error() {
		let node = first_error(root).unwrap_or(root);
		let message = if node.is_missing() {
			format!("expected '{}'", node.kind())
		} else {
			match excerpt(node, text) {
				Some(found) => format!("unexpected '{found}'"),
				None => "unexpected end of input".to_string(),
			}
		};
		return Err(syntax_error(file, node, message));
	}

	let mut cursor = root.walk();
	let mut seen_package = false;
	for child in root.named_children(&mut cursor) {
		match child.kind() {
			"comment" => {}
			"package_clause" if !seen_package => seen_package = true,
			"package_clause" => {
				return Err(syntax_error(file, child, "unexpected second package clause".to_string()));
			}
			_ if !seen_package => {
				let found = excerpt(child, text).unwrap_or_default();
				return Err(syntax_error(file, child, format!("expected 'package', found '{found}'")));
			}
			"function_declaration" | "method_declaration" | "import_declaration" | "const_declaration"
			| "var_declaration" | "type_declaration" => {}
			_ => {
				let found = excerpt(child, text).unwrap_or_default();
				return Err(syntax_error(file, child, format!("expected declaration, found '{found}'")));
			}
		}
	}

	if !seen_package {
		return Err(SyntaxError {
			file: file.to_string(),
			line: root.end_position().row + 1,
			column: root.end_position().column + 1,
			message: "expected 'package', found 'EOF'".to_string(),
		});
	}

	Ok(())
}

/// First node nested deeper than [`MAX_NESTING_DEPTH`], found without recursion.
fn too_deep(root: Node<'_>) -> Option<Node<'_>> {
	let mut cursor = root.walk();
	let mut depth = 0;
	loop {
		if depth > MAX_NESTING_DEPTH {
			return Some(cursor.node());
		}
		if cursor.goto_first_child() {
			depth += 1;
			continue;
		}
		while !cursor.goto_next_sibling() {
			if !cursor.goto_parent() {
				return None;
			}
			depth -= 1;
		}
	}
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
	if node.is_error() || node.is_missing() {
		return Some(node);
	}
	let mut cursor = node.walk();
	for child in node.children(&mut cursor) {
		if (child.has_error() || child.is_missing())
			&& let Some(found) = first_error(child)
		{
			return Some(found);
		}
	}
	None
}

pub(crate) fn syntax_error(file: &str, node: Node<'_>, message: String) -> SyntaxError {
	let pos = node.start_position();
	SyntaxError {
		file: file.to_string(),
		line: pos.row + 1,
		column: pos.column + 1,
		message,
	}
}

/// First line of the node's text, shortened for error messages.
fn excerpt(node: Node<'_>, text: &str) -> Option<String> {
	let raw = node_text(node, text);
	let line = raw.lines().map(str::trim).find(|line| !line.is_empty())?;
	Some(line.chars().take(EXCERPT_LIMIT).collect())
}

pub(crate) fn node_text<'a>(node: Node<'_>, text: &'a str) -> &'a str {
	text.get(node.start_byte()..node.end_byte()).unwrap_or_default()
}
