//! Block structure of doc comments: paragraphs, headings and code.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s<>"'`]+"#).expect("valid url regex"));

/// Run of paragraph text, optionally a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
	/// Visible text.
	pub text: String,
	/// Link target, when the text is a URL.
	pub href: Option<String>,
}

/// One block of a doc comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocBlock {
	/// Consecutive unindented lines, kept verbatim.
	Paragraph {
		/// Text and link spans.
		spans: Vec<Span>,
	},
	/// A `# Heading` line standing alone.
	Heading {
		/// Heading text.
		text: String,
		/// Anchor id, `hdr-` plus the text with every non-alphanumeric character replaced by `_`.
		id: String,
	},
	/// Indented lines with the common indentation removed.
	Code {
		/// Code text.
		text: String,
	},
}

pub(crate) fn parse_blocks(text: &str) -> Vec<DocBlock> {
	let lines: Vec<&str> = text.lines().collect();
	let mut blocks = Vec::new();
	let mut i = 0;

	while i < lines.len() {
		let line = lines[i];
		if is_blank(line) {
			i += 1;
			continue;
		}

		if is_indented(line) {
			let start = i;
			while i < lines.len() && (is_indented(lines[i]) || is_blank(lines[i])) {
				i += 1;
			}
			let mut end = i;
			while end > start && is_blank(lines[end - 1]) {
				end -= 1;
			}
			blocks.push(DocBlock::Code {
				text: unindent(&lines[start..end]),
			});
			continue;
		}

		let standalone = lines.get(i + 1).is_none_or(|next| is_blank(next));
		if standalone && let Some(heading) = line.strip_prefix("# ") {
			let heading = heading.trim();
			blocks.push(DocBlock::Heading {
				text: heading.to_string(),
				id: heading_id(heading),
			});
			i += 1;
			continue;
		}

		let start = i;
		while i < lines.len() && !is_blank(lines[i]) && !is_indented(lines[i]) {
			i += 1;
		}
		blocks.push(DocBlock::Paragraph {
			spans: link_spans(&lines[start..i].join("\n")),
		});
	}

	blocks
}

fn is_blank(line: &str) -> bool {
	line.trim().is_empty()
}

fn is_indented(line: &str) -> bool {
	line.starts_with([' ', '\t'])
}

fn heading_id(heading: &str) -> String {
	let slug: String = heading
		.chars()
		.map(|c| if c.is_alphanumeric() { c } else { '_' })
		.collect();
	format!("hdr-{slug}")
}

/// Remove the longest whitespace prefix shared by all non-blank lines.
fn unindent(lines: &[&str]) -> String {
	let mut common: Option<&str> = None;
	for line in lines.iter().filter(|line| !is_blank(line)) {
		let indent = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
		common = Some(match common {
			Some(prefix) => shared_prefix(prefix, indent),
			None => indent,
		});
	}
	let common = common.unwrap_or_default();
	lines
		.iter()
		.map(|line| line.strip_prefix(common).unwrap_or_default())
		.collect::<Vec<_>>()
		.join("\n")
}

fn shared_prefix<'a>(a: &'a str, b: &str) -> &'a str {
	let len = a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count();
	&a[..len]
}

fn link_spans(text: &str) -> Vec<Span> {
	let mut spans = Vec::new();
	let mut last = 0;
	for found in URL.find_iter(text) {
		let url = trim_url(found.as_str());
		if found.start() > last {
			spans.push(Span {
				text: text[last..found.start()].to_string(),
				href: None,
			});
		}
		spans.push(Span {
			text: url.to_string(),
			href: Some(url.to_string()),
		});
		last = found.start() + url.len();
	}
	if last < text.len() {
		spans.push(Span {
			text: text[last..].to_string(),
			href: None,
		});
	}
	spans
}

/// Drop sentence punctuation that ends up glued to a URL.
fn trim_url(url: &str) -> &str {
	let mut trimmed = url.trim_end_matches(['.', ',', ':', ';', '?', '!']);
	if !trimmed.contains('(') {
		trimmed = trimmed.trim_end_matches(')');
	}
	trimmed
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn text(text: &str) -> Span {
		Span {
			text: text.to_string(),
			href: None,
		}
	}

	#[test]
	fn paragraphs_keep_their_lines() {
		let blocks = parse_blocks("Package demo does things.\nIt does them well.\n\nSecond paragraph.");
		assert_eq!(
			blocks,
			vec![
				DocBlock::Paragraph {
					spans: vec![text("Package demo does things.\nIt does them well.")]
				},
				DocBlock::Paragraph {
					spans: vec![text("Second paragraph.")]
				},
			]
		);
	}

	#[test]
	fn indented_runs_become_code() {
		let blocks = parse_blocks("Example:\n\n\tx := demo.New()\n\n\t\tx.Run()\n\nDone.");
		assert_eq!(
			blocks[1],
			DocBlock::Code {
				text: "x := demo.New()\n\n\tx.Run()".to_string()
			}
		);
		assert_eq!(blocks.len(), 3);
	}

	#[test]
	fn standalone_hash_lines_are_headings() {
		let blocks = parse_blocks("Intro.\n\n# Usage Notes\n\nBody.\n# not a heading");
		assert_eq!(
			blocks[1],
			DocBlock::Heading {
				text: "Usage Notes".to_string(),
				id: "hdr-Usage_Notes".to_string()
			}
		);
		assert_eq!(
			blocks[2],
			DocBlock::Paragraph {
				spans: vec![text("Body.\n# not a heading")]
			}
		);
	}

	#[test]
	fn heading_ids_replace_punctuation() {
		let blocks = parse_blocks("# Usage: Notes (v2)");
		assert_eq!(
			blocks,
			vec![DocBlock::Heading {
				text: "Usage: Notes (v2)".to_string(),
				id: "hdr-Usage__Notes__v2_".to_string()
			}]
		);
	}

	#[test]
	fn mixed_indentation_keeps_unshared_whitespace() {
		let blocks = parse_blocks("Example:\n\n\tfirst\n    second");
		assert_eq!(
			blocks[1],
			DocBlock::Code {
				text: "\tfirst\n    second".to_string()
			}
		);

		let blocks = parse_blocks("Example:\n\n\t\tA\n\n\t  B");
		assert_eq!(
			blocks[1],
			DocBlock::Code {
				text: "\tA\n\n  B".to_string()
			}
		);
	}

	#[test]
	fn urls_become_links() {
		let blocks = parse_blocks("See https://go.dev/doc/comment. for details.");
		let DocBlock::Paragraph { spans } = &blocks[0] else {
			panic!("expected paragraph");
		};
		assert_eq!(
			spans,
			&vec![
				text("See "),
				Span {
					text: "https://go.dev/doc/comment".to_string(),
					href: Some("https://go.dev/doc/comment".to_string()),
				},
				text(". for details."),
			]
		);
	}
}
