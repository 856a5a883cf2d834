//! File-level resolution of type-namespace identifiers.

use std::collections::HashSet;

use tree_sitter::Node;

use super::decl::{Decl, Pos};
use super::parse::node_text;

/// Predeclared Go types, bound by the universe scope.
const UNIVERSE_TYPES: &[&str] = &[
	"any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32", "float64", "int", "int8",
	"int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16", "uint32", "uint64", "uintptr",
];

/// An identifier occurrence the file could not bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
	/// Identifier text.
	pub name: String,
	/// Where it occurs.
	pub pos: Pos,
}

/// Names declared at file scope, excluding methods and blank identifiers.
pub(crate) fn file_scope(decls: &[Decl]) -> HashSet<String> {
	let mut scope = HashSet::new();
	for decl in decls {
		match decl {
			Decl::Func(func) if func.recv.is_none() => {
				scope.insert(func.name.clone());
			}
			Decl::Func(_) => {}
			Decl::Gen(gen_decl) => {
				for spec in &gen_decl.specs {
					scope.extend(spec.names.iter().filter(|name| *name != "_").cloned());
				}
			}
		}
	}
	scope
}

/// Collect every type-position identifier outside function bodies that neither the file scope,
/// the enclosing type parameters nor the universe binds. Package qualifiers (`pkg` in `pkg.T`) are
/// always free here; imports bind them at package level.
pub(crate) fn free_identifiers(root: Node<'_>, text: &str, scope: &HashSet<String>) -> Vec<Ident> {
	let mut resolver = Resolver {
		text,
		scope,
		free: Vec::new(),
	};
	let mut cursor = root.walk();
	for decl in root.named_children(&mut cursor) {
		let locals = type_params(decl, text);
		resolver.visit(decl, &locals);
	}
	resolver.free
}

struct Resolver<'a> {
	text: &'a str,
	scope: &'a HashSet<String>,
	free: Vec<Ident>,
}

impl Resolver<'_> {
	fn visit(&mut self, node: Node<'_>, locals: &HashSet<String>) {
		match node.kind() {
			"block" | "comment" | "package_clause" | "import_declaration" => return,
			"type_identifier" => {
				let name = node_text(node, self.text);
				if !self.is_bound(name, locals) {
					self.free.push(Ident {
						name: name.to_string(),
						pos: Pos::of(node),
					});
				}
				return;
			}
			"qualified_type" => {
				if let Some(package) = node.child_by_field_name("package") {
					self.free.push(Ident {
						name: node_text(package, self.text).to_string(),
						pos: Pos::of(package),
					});
				}
				return;
			}
			"type_spec" | "type_alias" => {
				let own = type_params(node, self.text);
				let locals: HashSet<String> = locals.union(&own).cloned().collect();
				let declared = node.child_by_field_name("name");
				let mut cursor = node.walk();
				let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
				for child in children.into_iter().filter(|child| Some(*child) != declared) {
					self.visit(child, &locals);
				}
				return;
			}
			_ => {}
		}

		let mut cursor = node.walk();
		let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
		for child in children {
			self.visit(child, locals);
		}
	}

	fn is_bound(&self, name: &str, locals: &HashSet<String>) -> bool {
		locals.contains(name) || self.scope.contains(name) || UNIVERSE_TYPES.contains(&name)
	}
}

/// Type parameter names a declaration introduces: its own type parameter list, or for methods
/// the type arguments written on the receiver (`func (l *List[T]) ...`).
fn type_params(node: Node<'_>, text: &str) -> HashSet<String> {
	let mut names = HashSet::new();
	if let Some(params) = node.child_by_field_name("type_parameters") {
		let mut cursor = params.walk();
		let decls: Vec<Node<'_>> = params.named_children(&mut cursor).collect();
		for decl in decls {
			let mut cursor = decl.walk();
			let declared: Vec<Node<'_>> = decl.children_by_field_name("name", &mut cursor).collect();
			names.extend(declared.into_iter().map(|name| node_text(name, text).to_string()));
		}
	}
	if node.kind() == "method_declaration"
		&& let Some(receiver) = node.child_by_field_name("receiver")
	{
		collect_receiver_args(receiver, text, &mut names);
	}
	names
}

fn collect_receiver_args(node: Node<'_>, text: &str, names: &mut HashSet<String>) {
	if node.kind() == "type_arguments" {
		collect_kind(node, "type_identifier", text, names);
		return;
	}
	let mut cursor = node.walk();
	let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
	for child in children {
		collect_receiver_args(child, text, names);
	}
}

fn collect_kind(node: Node<'_>, kind: &str, text: &str, names: &mut HashSet<String>) {
	if node.kind() == kind {
		names.insert(node_text(node, text).to_string());
	}
	let mut cursor = node.walk();
	let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
	for child in children {
		collect_kind(child, kind, text, names);
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::syntax::decl::collect;
	use crate::syntax::parse::parse_tree;

	fn free_names(src: &str) -> Vec<String> {
		let tree = parse_tree(src).expect("parse");
		let decls = collect("input.go", tree.root_node(), src).expect("collect");
		let scope = file_scope(&decls.decls);
		free_identifiers(tree.root_node(), src, &scope)
			.into_iter()
			.map(|ident| ident.name)
			.collect()
	}

	#[test]
	fn undeclared_receiver_type_is_free() {
		let names = free_names("package demo\n\ntype T struct{}\n\nfunc (t *U) M() {}\nfunc (t T) N() {}\n");
		assert_eq!(names, vec!["U".to_string()]);
	}

	#[test]
	fn universe_and_declared_types_are_bound() {
		let names = free_names(
			"package demo\n\ntype T struct {\n\tA int\n\tB error\n\tC *T\n}\n\nfunc F(x string) T { return T{} }\n",
		);
		assert!(names.is_empty(), "unexpected free identifiers: {names:?}");
	}

	#[test]
	fn package_qualifiers_are_free() {
		let names = free_names("package demo\n\nimport \"io\"\n\ntype R struct{ r io.Reader }\n");
		assert_eq!(names, vec!["io".to_string()]);
	}

	#[test]
	fn type_parameters_are_bound() {
		let names = free_names(
			"package demo\n\ntype List[T any] struct{ items []T }\n\nfunc (l *List[T]) Push(v T) {}\n\nfunc Map[K comparable, V any](m map[K]V) {}\n",
		);
		assert!(names.is_empty(), "unexpected free identifiers: {names:?}");
	}

	#[test]
	fn function_bodies_are_not_walked() {
		let names = free_names("package demo\n\nfunc F() {\n\ttype local struct{}\n\tvar x Missing\n\t_ = x\n}\n");
		assert!(names.is_empty(), "unexpected free identifiers: {names:?}");
	}
}
