use std::collections::{BTreeSet, HashMap};

use super::model::{DocText, DocumentationModel, FuncDoc, ReceiverDoc, TypeDoc, ValueDoc};
use crate::package::{AssembledPackage, Origin};
use crate::syntax::{Decl, FuncDecl, GenDecl, GenKind, SourceUnit};

/// Where a function, method or typed value group ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
	Type(usize),
	Receiver(usize),
}

struct Builder {
	include_unexported: bool,
	types: Vec<TypeDoc>,
	receivers: Vec<ReceiverDoc>,
	slots: HashMap<String, Slot>,
	consts: Vec<ValueDoc>,
	vars: Vec<ValueDoc>,
	funcs: Vec<FuncDoc>,
}

/// Build the documentation model of an assembled package.
///
/// Types declared by the stub file never enter [`DocumentationModel::types`]. Their methods and
/// factory functions are collected under [`DocumentationModel::receivers`] instead.
pub fn extract(pkg: &AssembledPackage, include_unexported: bool) -> DocumentationModel {
	let mut builder = Builder {
		include_unexported,
		types: Vec::new(),
		receivers: Vec::new(),
		slots: HashMap::new(),
		consts: Vec::new(),
		vars: Vec::new(),
		funcs: Vec::new(),
	};

	for (origin, unit) in pkg.units() {
		builder.declare_types(origin, unit);
	}

	let source = pkg.source();
	for decl in source.decls() {
		match decl {
			Decl::Gen(gen_decl) if gen_decl.kind != GenKind::Type => builder.add_values(gen_decl),
			Decl::Func(func) if func.recv.is_some() => builder.add_method(source.file(), func),
			Decl::Func(func) => builder.add_func(func),
			Decl::Gen(_) => {}
		}
	}

	let doc = pkg
		.units()
		.into_iter()
		.find_map(|(_, unit)| unit.package_doc())
		.map(DocText::new)
		.unwrap_or_default();

	DocumentationModel {
		name: pkg.name().to_string(),
		doc,
		imports: source.imports().iter().map(|import| import.path.clone()).collect(),
		filenames: vec![source.file().to_string()],
		consts: builder.consts,
		vars: builder.vars,
		funcs: builder.funcs,
		types: builder.types,
		receivers: builder
			.receivers
			.into_iter()
			.filter(|recv| !recv.funcs.is_empty() || !recv.methods.is_empty())
			.collect(),
	}
}

impl Builder {
	fn visible(&self, name: &str) -> bool {
		name != "_" && (self.include_unexported || is_exported(name))
	}

	fn declare_types(&mut self, origin: Origin, unit: &SourceUnit) {
		for decl in unit.decls() {
			let Decl::Gen(gen_decl) = decl else {
				continue;
			};
			if gen_decl.kind != GenKind::Type {
				continue;
			}
			for spec in &gen_decl.specs {
				let Some(name) = spec.names.first() else {
					continue;
				};
				if !self.visible(name) || self.slots.contains_key(name) {
					continue;
				}
				let slot = match origin {
					Origin::Source => {
						let doc = spec.doc.as_deref().or(if gen_decl.grouped { None } else { gen_decl.doc.as_deref() });
						let decl = if gen_decl.grouped {
							format!("type {}", spec.text)
						} else {
							gen_decl.text.clone()
						};
						self.types.push(TypeDoc {
							name: name.clone(),
							doc: DocText::from_opt(doc),
							decl,
							consts: Vec::new(),
							vars: Vec::new(),
							funcs: Vec::new(),
							methods: Vec::new(),
						});
						Slot::Type(self.types.len() - 1)
					}
					Origin::Stub => {
						self.receivers.push(ReceiverDoc {
							name: name.clone(),
							funcs: Vec::new(),
							methods: Vec::new(),
						});
						Slot::Receiver(self.receivers.len() - 1)
					}
				};
				self.slots.insert(name.clone(), slot);
			}
		}
	}

	fn add_values(&mut self, gen_decl: &GenDecl) {
		let names: Vec<String> = gen_decl
			.specs
			.iter()
			.flat_map(|spec| spec.names.iter())
			.filter(|name| self.visible(name))
			.cloned()
			.collect();
		if names.is_empty() {
			return;
		}

		let value = ValueDoc {
			names,
			doc: DocText::from_opt(gen_decl.doc.as_deref()),
			decl: gen_decl.text.clone(),
		};

		let explicit: BTreeSet<&str> = gen_decl
			.specs
			.iter()
			.filter_map(|spec| spec.ty.as_ref()?.base_name())
			.collect();
		let owner = match (explicit.len(), explicit.first()) {
			(1, Some(name)) => match self.slots.get(*name) {
				Some(Slot::Type(index)) => Some(*index),
				_ => None,
			},
			_ => None,
		};

		let target = match (gen_decl.kind, owner) {
			(GenKind::Const, Some(index)) => &mut self.types[index].consts,
			(GenKind::Var, Some(index)) => &mut self.types[index].vars,
			(GenKind::Const, None) => &mut self.consts,
			_ => &mut self.vars,
		};
		target.push(value);
	}

	fn add_func(&mut self, func: &FuncDecl) {
		if func.name == "init" || !self.visible(&func.name) {
			return;
		}
		let doc = func_doc(func, None, func.name.clone());

		let mentioned: BTreeSet<&str> = func.results.iter().filter_map(|result| result.base_name()).collect();
		let factory_of: Vec<Slot> = mentioned
			.into_iter()
			.filter_map(|name| self.slots.get(name).copied())
			.collect();

		match factory_of.as_slice() {
			[Slot::Type(index)] => self.types[*index].funcs.push(doc),
			[Slot::Receiver(index)] => self.receivers[*index].funcs.push(doc),
			_ => self.funcs.push(doc),
		}
	}

	fn add_method(&mut self, file: &str, func: &FuncDecl) {
		let Some(recv) = &func.recv else {
			return;
		};
		if !self.visible(&func.name) {
			return;
		}
		let Some(base) = recv.ty.base_name() else {
			tracing::debug!(
				file,
				method = func.name.as_str(),
				receiver = recv.text.as_str(),
				"dropping method without a local receiver type"
			);
			return;
		};
		let Some(slot) = self.slots.get(base).copied() else {
			tracing::debug!(file, method = func.name.as_str(), receiver = base, "dropping method on an unknown or hidden type");
			return;
		};

		let doc = func_doc(func, Some(recv.text.clone()), format!("{base}.{}", func.name));
		match slot {
			Slot::Type(index) => self.types[index].methods.push(doc),
			Slot::Receiver(index) => self.receivers[index].methods.push(doc),
		}
	}
}

fn func_doc(func: &FuncDecl, recv: Option<String>, anchor: String) -> FuncDoc {
	FuncDoc {
		name: func.name.clone(),
		recv,
		anchor,
		doc: DocText::from_opt(func.doc.as_deref()),
		decl: func.signature.clone(),
	}
}

/// Go's export rule: the name starts with an uppercase letter.
fn is_exported(name: &str) -> bool {
	name.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::package::assemble;
	use crate::stubs::{PLACEHOLDER_TYPE, STUB_FILE, synthesize, unresolved_receivers};

	fn model(src: &str, include_unexported: bool) -> DocumentationModel {
		let source = SourceUnit::parse("input.go", src).expect("parse source");
		let unresolved = unresolved_receivers(&source).expect("scan");
		let stub = synthesize(&unresolved, source.package());
		let stub = SourceUnit::parse(STUB_FILE, stub.text).expect("parse stub");
		let pkg = assemble(source, stub).expect("assemble");
		extract(&pkg, include_unexported)
	}

	fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
		items.iter().map(|item| name(item).to_string()).collect()
	}

	#[test]
	fn stub_types_only_anchor_methods() {
		let doc = model("package demo\n// Doc.\ntype T struct{}\nfunc (t *U) M() {}\n", false);
		assert_eq!(names(&doc.types, |ty| ty.name.as_str()), vec!["T"]);
		assert_eq!(doc.types[0].doc.text, "Doc.");
		assert_eq!(doc.receivers.len(), 1);
		assert_eq!(doc.receivers[0].name, "U");
		assert_eq!(names(&doc.receivers[0].methods, |m| m.anchor.as_str()), vec!["U.M"]);
		assert_eq!(doc.receivers[0].methods[0].recv.as_deref(), Some("*U"));

		let json = serde_json::to_string(&doc).expect("serialize");
		assert!(!json.contains(PLACEHOLDER_TYPE), "{json}");
		assert!(!json.contains("presumably"), "{json}");
	}

	#[test]
	fn methods_on_declared_types_attach_to_them() {
		let doc = model(
			"package demo\n\n// T is a thing.\ntype T struct{}\n\n// Name returns the name.\nfunc (t T) Name() string { return \"\" }\n\nfunc (t *T) hidden() {}\n",
			false,
		);
		assert!(doc.receivers.is_empty());
		let ty = &doc.types[0];
		assert_eq!(ty.decl, "type T struct{}");
		assert_eq!(names(&ty.methods, |m| m.name.as_str()), vec!["Name"]);
		assert_eq!(ty.methods[0].decl, "func (t T) Name() string");
		assert_eq!(ty.methods[0].doc.text, "Name returns the name.");
	}

	#[test]
	fn unexported_declarations_need_the_flag() {
		let src = "package demo\n\ntype t struct{}\n\nfunc (x *t) Run() {}\n\nfunc helper() {}\n";
		let hidden = model(src, false);
		assert!(hidden.types.is_empty());
		assert!(hidden.funcs.is_empty());

		let all = model(src, true);
		assert_eq!(names(&all.types, |ty| ty.name.as_str()), vec!["t"]);
		assert_eq!(names(&all.types[0].methods, |m| m.name.as_str()), vec!["Run"]);
		assert_eq!(names(&all.funcs, |f| f.name.as_str()), vec!["helper"]);
	}

	#[test]
	fn factories_group_under_their_type() {
		let doc = model(
			"package demo\n\ntype T struct{}\n\nfunc NewT() *T { return nil }\n\nfunc NewU() (*U, error) { return nil, nil }\n\nfunc Pair() (T, *U) { return T{}, nil }\n\nfunc (u U) M() {}\n",
			false,
		);
		assert_eq!(names(&doc.types[0].funcs, |f| f.name.as_str()), vec!["NewT"]);
		assert_eq!(names(&doc.receivers[0].funcs, |f| f.name.as_str()), vec!["NewU"]);
		assert_eq!(names(&doc.funcs, |f| f.name.as_str()), vec!["Pair"]);
	}

	#[test]
	fn typed_value_groups_attach_to_their_type() {
		let doc = model(
			"package demo\n\n// Color is a color.\ntype Color int\n\n// Colors.\nconst (\n\tRed Color = iota\n\tGreen\n)\n\n// Limit caps things.\nconst Limit = 10\n\nvar Default Color\n\nvar internal = 1\n",
			false,
		);
		assert_eq!(doc.types[0].consts.len(), 1);
		assert_eq!(doc.types[0].consts[0].names, vec!["Red".to_string(), "Green".to_string()]);
		assert_eq!(doc.types[0].consts[0].doc.text, "Colors.");
		assert_eq!(doc.types[0].vars.len(), 1);
		assert_eq!(names(&doc.consts, |c| c.decl.as_str()), vec!["const Limit = 10"]);
		assert!(doc.vars.is_empty());
	}

	#[test]
	fn grouped_types_show_their_own_spec() {
		let doc = model(
			"package demo\n\n// Shapes.\ntype (\n\t// Circle is round.\n\tCircle struct{ R float64 }\n\tSquare struct{ S float64 }\n)\n",
			false,
		);
		assert_eq!(doc.types[0].decl, "type Circle struct{ R float64 }");
		assert_eq!(doc.types[0].doc.text, "Circle is round.");
		assert!(doc.types[1].doc.is_empty());
	}

	#[test]
	fn methods_on_predeclared_types_are_dropped() {
		let doc = model("package demo\n\nfunc (s string) Len() int { return 0 }\n", false);
		assert!(doc.types.is_empty());
		assert!(doc.receivers.is_empty());
		assert!(doc.funcs.is_empty());
	}

	#[test]
	fn package_metadata_comes_from_the_source_file() {
		let doc = model("// Package demo demos.\npackage demo\n\nimport (\n\t\"fmt\"\n\t\"io\"\n)\n", false);
		assert_eq!(doc.name, "demo");
		assert_eq!(doc.doc.text, "Package demo demos.");
		assert_eq!(doc.imports, vec!["fmt".to_string(), "io".to_string()]);
		assert_eq!(doc.filenames, vec!["input.go".to_string()]);
	}

	#[test]
	fn exported_names_start_uppercase() {
		assert!(is_exported("Reader"));
		assert!(is_exported("Ünicode"));
		assert!(!is_exported("reader"));
		assert!(!is_exported("_"));
		assert!(!is_exported(""));
	}
}
