//! Go source parsing: syntax tree, declarations, doc comments and free identifiers.

mod comment;
mod decl;
mod parse;
mod resolve;

pub use decl::{Decl, FuncDecl, GenDecl, GenKind, ImportSpec, Pos, Receiver, Spec, TypeExpr};
pub use resolve::Ident;
use tree_sitter::Tree;

use crate::core_api::Result;

/// One parsed file. Immutable once parsed.
#[derive(Debug)]
pub struct SourceUnit {
	file: String,
	text: String,
	tree: Tree,
	package: String,
	package_doc: Option<String>,
	imports: Vec<ImportSpec>,
	decls: Vec<Decl>,
	free: Vec<Ident>,
}

impl SourceUnit {
	/// Parse `text` as a complete Go file named `file`.
	///
	/// Fails with [`crate::core_api::error::PreviewError::Syntax`] when the text does not parse
	/// cleanly, has no leading package clause, or contains something other than declarations at
	/// the top level.
	pub fn parse(file: impl Into<String>, text: impl Into<String>) -> Result<Self> {
		let file = file.into();
		let text = text.into();
		let tree = parse::parse_tree(&text)?;
		parse::check_file(&file, &tree, &text)?;

		let root = tree.root_node();
		let collected = decl::collect(&file, root, &text)?;
		let scope = resolve::file_scope(&collected.decls);
		let free = resolve::free_identifiers(root, &text, &scope);

		Ok(Self {
			file,
			package: collected.package,
			package_doc: collected.package_doc,
			imports: collected.imports,
			decls: collected.decls,
			free,
			tree,
			text,
		})
	}

	/// File name used in positions and error messages.
	pub fn file(&self) -> &str {
		&self.file
	}

	/// Raw source text.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// tree-sitter syntax tree.
	pub fn tree(&self) -> &Tree {
		&self.tree
	}

	/// Name from the package clause.
	pub fn package(&self) -> &str {
		&self.package
	}

	/// Doc comment directly above the package clause.
	pub fn package_doc(&self) -> Option<&str> {
		self.package_doc.as_deref()
	}

	/// Import specs in source order.
	pub fn imports(&self) -> &[ImportSpec] {
		&self.imports
	}

	/// Top-level declarations in source order.
	pub fn decls(&self) -> &[Decl] {
		&self.decls
	}

	/// Identifier occurrences the file could not bind, in source order.
	pub fn free_identifiers(&self) -> &[Ident] {
		&self.free
	}

	/// Method declarations in source order.
	pub fn methods(&self) -> impl Iterator<Item = &FuncDecl> {
		self.decls.iter().filter_map(|decl| match decl {
			Decl::Func(func) if func.recv.is_some() => Some(func),
			_ => None,
		})
	}
}
