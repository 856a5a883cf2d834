//! Comment groups and doc comment text.

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

use super::parse::node_text;

/// Tool directives such as `//go:generate` or `//line foo.go:10`, which never belong to docs.
static DIRECTIVE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^(line |extern |export |[a-z0-9]+:[a-z0-9])").expect("valid directive regex"));

/// Pair each non-comment named child of `parent` with the doc comment directly above it.
///
/// A comment group is a run of comments on consecutive lines; it documents the next node when its
/// last line sits immediately above that node. A comment sharing a line with the previous node is
/// a trailing comment and never opens a group.
pub(crate) fn documented_children<'t>(parent: Node<'t>, text: &str) -> Vec<(Node<'t>, Option<String>)> {
	let mut cursor = parent.walk();
	let mut out = Vec::new();
	let mut group: Vec<Node<'t>> = Vec::new();
	let mut prev_end_row: Option<usize> = None;

	for child in parent.named_children(&mut cursor) {
		if child.kind() == "comment" {
			let row = child.start_position().row;
			if group.is_empty() && prev_end_row == Some(row) {
				continue;
			}
			let detached = group.last().is_some_and(|last| row > last.end_position().row + 1);
			if detached {
				group.clear();
			}
			group.push(child);
			continue;
		}

		let doc = match group.last() {
			Some(last) if last.end_position().row + 1 == child.start_position().row => {
				let raw: Vec<&str> = group.iter().map(|c| node_text(*c, text)).collect();
				Some(comment_text(&raw)).filter(|doc| !doc.is_empty())
			}
			_ => None,
		};
		group.clear();
		prev_end_row = Some(child.end_position().row);
		out.push((child, doc));
	}

	out
}

/// Text of a comment group with the comment markers removed.
///
/// Strips `//` and one following space, or the `/* */` delimiters, drops tool directives, trims
/// trailing whitespace, removes leading and trailing blank lines and collapses runs of blank
/// lines into one.
pub(crate) fn comment_text(comments: &[&str]) -> String {
	let mut lines: Vec<&str> = Vec::new();
	for raw in comments {
		if let Some(body) = raw.strip_prefix("//") {
			if DIRECTIVE.is_match(body) {
				continue;
			}
			lines.push(body.strip_prefix(' ').unwrap_or(body));
		} else if let Some(body) = raw.strip_prefix("/*") {
			let body = body.strip_suffix("*/").unwrap_or(body);
			lines.extend(body.split('\n'));
		}
	}

	let mut out: Vec<&str> = Vec::with_capacity(lines.len());
	for line in lines {
		let line = line.trim_end();
		if line.is_empty() && out.last().is_none_or(|prev: &&str| prev.is_empty()) {
			continue;
		}
		out.push(line);
	}
	while out.last().is_some_and(|line| line.is_empty()) {
		out.pop();
	}

	out.join("\n")
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::syntax::parse::parse_tree;

	#[test]
	fn strips_line_comment_markers() {
		let text = comment_text(&["// Package demo does things.", "//", "//  indented", "//no space"]);
		assert_eq!(text, "Package demo does things.\n\n indented\nno space");
	}

	#[test]
	fn strips_block_comment_markers() {
		let text = comment_text(&["/*\nFirst line.\n\n\n\nSecond line.   \n*/"]);
		assert_eq!(text, "First line.\n\nSecond line.");
	}

	#[test]
	fn drops_directives() {
		let text = comment_text(&["// Gen is generated.", "//go:generate stringer -type=Gen"]);
		assert_eq!(text, "Gen is generated.");
	}

	#[test]
	fn groups_attach_to_the_following_declaration() {
		let src = "package demo\n\n// Detached.\n\n// A is documented.\ntype A int // trailing\n// B is documented.\ntype B int\n\ntype C int\n";
		let tree = parse_tree(src).expect("parse");
		let docs: Vec<Option<String>> =
			documented_children(tree.root_node(), src).into_iter().map(|(_, doc)| doc).collect();
		assert_eq!(
			docs,
			vec![
				None,
				Some("A is documented.".to_string()),
				Some("B is documented.".to_string()),
				None
			]
		);
	}
}
