//! Owned declaration model lifted out of the tree-sitter tree.

use std::fmt;

use tree_sitter::Node;

use super::comment::documented_children;
use super::parse::{node_text, syntax_error};
use crate::core_api::error::SyntaxError;

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
	/// Line number.
	pub line: usize,
	/// Byte column.
	pub column: usize,
}

impl Pos {
	pub(crate) fn of(node: Node<'_>) -> Self {
		let point = node.start_position();
		Self {
			line: point.row + 1,
			column: point.column + 1,
		}
	}
}

impl fmt::Display for Pos {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// Closed set of type-expression forms the rest of the pipeline distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
	/// A plain type name, `T`.
	Ident(String),
	/// A pointer, `*X`.
	Pointer(Box<TypeExpr>),
	/// A parenthesized type, `(X)`.
	Paren(Box<TypeExpr>),
	/// A generic instantiation, `X[A, B]`.
	Generic {
		/// The instantiated type.
		base: Box<TypeExpr>,
		/// Source text of the whole expression.
		text: String,
	},
	/// A type from another package, `pkg.T`.
	Qualified {
		/// Package qualifier.
		package: String,
		/// Type name.
		name: String,
	},
	/// Any other form (struct, map, slice, func, ...).
	Other {
		/// tree-sitter node kind.
		kind: String,
		/// Source text.
		text: String,
	},
}

impl TypeExpr {
	pub(crate) fn from_node(node: Node<'_>, text: &str) -> Self {
		match node.kind() {
			"type_identifier" => Self::Ident(node_text(node, text).to_string()),
			"pointer_type" => match first_named_child(node) {
				Some(inner) => Self::Pointer(Box::new(Self::from_node(inner, text))),
				None => Self::other(node, text),
			},
			"parenthesized_type" => match first_named_child(node) {
				Some(inner) => Self::Paren(Box::new(Self::from_node(inner, text))),
				None => Self::other(node, text),
			},
			"generic_type" => match node.child_by_field_name("type") {
				Some(base) => Self::Generic {
					base: Box::new(Self::from_node(base, text)),
					text: node_text(node, text).to_string(),
				},
				None => Self::other(node, text),
			},
			"qualified_type" => match (node.child_by_field_name("package"), node.child_by_field_name("name")) {
				(Some(package), Some(name)) => Self::Qualified {
					package: node_text(package, text).to_string(),
					name: node_text(name, text).to_string(),
				},
				_ => Self::other(node, text),
			},
			_ => Self::other(node, text),
		}
	}

	fn other(node: Node<'_>, text: &str) -> Self {
		Self::Other {
			kind: node.kind().to_string(),
			text: node_text(node, text).to_string(),
		}
	}

	/// Name of the package-local type this expression is built on, looking through pointers,
	/// parentheses and instantiation. Types from other packages have no local base.
	pub fn base_name(&self) -> Option<&str> {
		match self {
			Self::Ident(name) => Some(name),
			Self::Pointer(inner) | Self::Paren(inner) => inner.base_name(),
			Self::Generic { base, .. } => base.base_name(),
			Self::Qualified { .. } | Self::Other { .. } => None,
		}
	}
}

/// Receiver of a method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
	/// Receiver variable name, if any.
	pub name: Option<String>,
	/// Receiver type.
	pub ty: TypeExpr,
	/// Receiver type as written.
	pub text: String,
}

/// A `func` declaration, with or without a receiver.
#[derive(Debug, Clone)]
pub struct FuncDecl {
	/// Function or method name.
	pub name: String,
	/// Doc comment text.
	pub doc: Option<String>,
	/// Receiver, for methods.
	pub recv: Option<Receiver>,
	/// Declaration text without the body.
	pub signature: String,
	/// One entry per result field.
	pub results: Vec<TypeExpr>,
	/// Position of the `func` keyword.
	pub pos: Pos,
}

/// Keyword of a grouped declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenKind {
	/// `const`
	Const,
	/// `var`
	Var,
	/// `type`
	Type,
}

/// One spec inside a `const`, `var` or `type` declaration.
#[derive(Debug, Clone)]
pub struct Spec {
	/// Declared names; exactly one for type specs.
	pub names: Vec<String>,
	/// Doc comment directly above the spec.
	pub doc: Option<String>,
	/// Spec text.
	pub text: String,
	/// Explicit type, if written.
	pub ty: Option<TypeExpr>,
	/// Whether a type spec is an alias (`type A = B`).
	pub alias: bool,
}

/// A `const`, `var` or `type` declaration.
#[derive(Debug, Clone)]
pub struct GenDecl {
	/// Declaration keyword.
	pub kind: GenKind,
	/// Doc comment above the keyword.
	pub doc: Option<String>,
	/// Full declaration text.
	pub text: String,
	/// Whether the specs are wrapped in parentheses.
	pub grouped: bool,
	/// Specs in source order.
	pub specs: Vec<Spec>,
	/// Position of the keyword.
	pub pos: Pos,
}

/// Top-level declaration.
#[derive(Debug, Clone)]
pub enum Decl {
	/// `func` declaration.
	Func(FuncDecl),
	/// `const`, `var` or `type` declaration.
	Gen(GenDecl),
}

/// One `import` spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
	/// Explicit local name, including `.` and `_`.
	pub name: Option<String>,
	/// Unquoted import path.
	pub path: String,
}

/// Everything lifted out of a checked tree.
#[derive(Debug, Default)]
pub(crate) struct FileDecls {
	pub(crate) package: String,
	pub(crate) package_doc: Option<String>,
	pub(crate) imports: Vec<ImportSpec>,
	pub(crate) decls: Vec<Decl>,
}

/// Collect the declarations of a tree that passed [`super::parse::check_file`].
pub(crate) fn collect(file: &str, root: Node<'_>, text: &str) -> Result<FileDecls, SyntaxError> {
	let mut out = FileDecls::default();
	for (node, doc) in documented_children(root, text) {
		match node.kind() {
			"package_clause" => {
				out.package = first_named_child(node)
					.map(|name| node_text(name, text).to_string())
					.unwrap_or_default();
				out.package_doc = doc;
			}
			"import_declaration" => {
				for (spec, _) in spec_nodes(node, text) {
					if let Some(import) = import_spec(spec, text) {
						out.imports.push(import);
					}
				}
			}
			"function_declaration" | "method_declaration" => {
				out.decls.push(Decl::Func(func_decl(file, node, doc, text)?));
			}
			"const_declaration" => out.decls.push(Decl::Gen(gen_decl(GenKind::Const, node, doc, text))),
			"var_declaration" => out.decls.push(Decl::Gen(gen_decl(GenKind::Var, node, doc, text))),
			"type_declaration" => out.decls.push(Decl::Gen(gen_decl(GenKind::Type, node, doc, text))),
			_ => {}
		}
	}
	Ok(out)
}

fn func_decl(file: &str, node: Node<'_>, doc: Option<String>, text: &str) -> Result<FuncDecl, SyntaxError> {
	let name = node
		.child_by_field_name("name")
		.map(|name| node_text(name, text).to_string())
		.unwrap_or_default();

	let recv = match node.child_by_field_name("receiver") {
		Some(list) => Some(receiver(file, &name, list, text)?),
		None => None,
	};

	let full = node_text(node, text);
	let signature = match node.child_by_field_name("body") {
		Some(body) => full
			.get(..body.start_byte() - node.start_byte())
			.unwrap_or(full)
			.trim_end()
			.to_string(),
		None => full.trim_end().to_string(),
	};

	let results = match node.child_by_field_name("result") {
		Some(result) if result.kind() == "parameter_list" => {
			let mut cursor = result.walk();
			let types: Vec<TypeExpr> = result
				.named_children(&mut cursor)
				.filter_map(|param| param.child_by_field_name("type"))
				.map(|ty| TypeExpr::from_node(ty, text))
				.collect();
			types
		}
		Some(result) => vec![TypeExpr::from_node(result, text)],
		None => Vec::new(),
	};

	Ok(FuncDecl {
		name,
		doc,
		recv,
		signature,
		results,
		pos: Pos::of(node),
	})
}

fn receiver(file: &str, method: &str, list: Node<'_>, text: &str) -> Result<Receiver, SyntaxError> {
	let mut cursor = list.walk();
	let params: Vec<Node<'_>> = list
		.named_children(&mut cursor)
		.filter(|param| param.kind() != "comment")
		.collect();

	let [param] = params.as_slice() else {
		let message = if params.is_empty() {
			format!("method {method} has no receiver")
		} else {
			format!("method {method} has multiple receivers")
		};
		return Err(syntax_error(file, list, message));
	};

	let Some(ty) = param.child_by_field_name("type") else {
		return Err(syntax_error(file, *param, format!("method {method} has no receiver type")));
	};

	Ok(Receiver {
		name: param
			.child_by_field_name("name")
			.map(|name| node_text(name, text).to_string()),
		ty: TypeExpr::from_node(ty, text),
		text: node_text(ty, text).to_string(),
	})
}

fn gen_decl(kind: GenKind, node: Node<'_>, doc: Option<String>, text: &str) -> GenDecl {
	let full = node_text(node, text);
	let keyword_len = match kind {
		GenKind::Const => "const".len(),
		GenKind::Var => "var".len(),
		GenKind::Type => "type".len(),
	};
	let grouped = full
		.get(keyword_len..)
		.is_some_and(|rest| rest.trim_start().starts_with('('));

	let specs = spec_nodes(node, text)
		.into_iter()
		.filter_map(|(spec, spec_doc)| value_or_type_spec(spec, spec_doc, text))
		.collect();

	GenDecl {
		kind,
		doc,
		text: full.to_string(),
		grouped,
		specs,
		pos: Pos::of(node),
	}
}

/// Specs of a declaration with their docs, looking through `*_spec_list` wrappers.
fn spec_nodes<'t>(decl: Node<'t>, text: &str) -> Vec<(Node<'t>, Option<String>)> {
	let mut out = Vec::new();
	for (child, doc) in documented_children(decl, text) {
		if child.kind().ends_with("_spec_list") {
			out.extend(documented_children(child, text));
		} else {
			out.push((child, doc));
		}
	}
	out
}

fn value_or_type_spec(node: Node<'_>, doc: Option<String>, text: &str) -> Option<Spec> {
	let ty = node
		.child_by_field_name("type")
		.map(|ty| TypeExpr::from_node(ty, text));

	let names = match node.kind() {
		"type_spec" | "type_alias" => vec![node_text(node.child_by_field_name("name")?, text).to_string()],
		"const_spec" | "var_spec" => {
			let mut cursor = node.walk();
			let names: Vec<String> = node
				.children_by_field_name("name", &mut cursor)
				.map(|name| node_text(name, text).to_string())
				.collect();
			names
		}
		_ => return None,
	};

	Some(Spec {
		names,
		doc,
		text: node_text(node, text).to_string(),
		ty,
		alias: node.kind() == "type_alias",
	})
}

fn import_spec(node: Node<'_>, text: &str) -> Option<ImportSpec> {
	if node.kind() != "import_spec" {
		return None;
	}
	let path = node_text(node.child_by_field_name("path")?, text);
	let path = path.trim_matches(|c| c == '"' || c == '`').to_string();
	let name = node
		.child_by_field_name("name")
		.map(|name| node_text(name, text).to_string());
	Some(ImportSpec { name, path })
}

pub(crate) fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
	let mut cursor = node.walk();
	let first = node.named_children(&mut cursor).find(|child| child.kind() != "comment");
	first
}
