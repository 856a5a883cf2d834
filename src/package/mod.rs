//! In-memory package built from the user's file and the synthesized stub file.

mod proxy;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

pub use proxy::{ImportProxies, PackageObject};

use crate::core_api::Result;
use crate::core_api::error::PreviewError;
use crate::syntax::{Decl, GenKind, SourceUnit};

/// Which file a package-level declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
	/// The user's file.
	Source,
	/// The synthesized stub file.
	Stub,
}

/// Kind of a package-level name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
	/// Type name.
	Type,
	/// Function.
	Func,
	/// Constant.
	Const,
	/// Variable.
	Var,
}

/// A package-level name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
	/// Declared name.
	pub name: String,
	/// What the name denotes.
	pub kind: SymbolKind,
	/// Declaring file.
	pub origin: Origin,
}

/// The user's file and the stub file merged into one package.
#[derive(Debug)]
pub struct AssembledPackage {
	name: String,
	source: SourceUnit,
	stub: SourceUnit,
	scope: BTreeMap<String, Symbol>,
	file_imports: [HashMap<String, Rc<PackageObject>>; 2],
	proxies: ImportProxies,
	unresolved: Vec<String>,
}

impl AssembledPackage {
	/// Package name shared by both files.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The user's file.
	pub fn source(&self) -> &SourceUnit {
		&self.source
	}

	/// The synthesized stub file.
	pub fn stub(&self) -> &SourceUnit {
		&self.stub
	}

	/// Both files, user's first.
	pub fn units(&self) -> [(Origin, &SourceUnit); 2] {
		[(Origin::Source, &self.source), (Origin::Stub, &self.stub)]
	}

	/// Package scope.
	pub fn scope(&self) -> &BTreeMap<String, Symbol> {
		&self.scope
	}

	/// Look up a package-level name.
	pub fn lookup(&self, name: &str) -> Option<&Symbol> {
		self.scope.get(name)
	}

	/// Import bindings of one file.
	pub fn file_imports(&self, origin: Origin) -> &HashMap<String, Rc<PackageObject>> {
		match origin {
			Origin::Source => &self.file_imports[0],
			Origin::Stub => &self.file_imports[1],
		}
	}

	/// Import proxies created while assembling.
	pub fn proxies(&self) -> &ImportProxies {
		&self.proxies
	}

	/// Identifiers neither the package scope nor the imports could bind, in first-seen order.
	pub fn unresolved(&self) -> &[String] {
		&self.unresolved
	}
}

/// Merge the user's file and the stub file into one package.
///
/// Imports of both files resolve through a fresh [`ImportProxies`] table. A name declared in both
/// files, or differing package clauses, is an [`PreviewError::Assembly`]: correct stub synthesis
/// never produces either.
pub fn assemble(source: SourceUnit, stub: SourceUnit) -> Result<AssembledPackage> {
	if source.package() != stub.package() {
		return Err(PreviewError::Assembly {
			message: format!(
				"{} declares package {} but {} declares package {}",
				stub.file(),
				stub.package(),
				source.file(),
				source.package()
			),
		});
	}

	let mut scope: BTreeMap<String, Symbol> = BTreeMap::new();
	for (origin, unit) in [(Origin::Source, &source), (Origin::Stub, &stub)] {
		declare(&mut scope, origin, unit)?;
	}

	let mut proxies = ImportProxies::new();
	let mut file_imports = [HashMap::new(), HashMap::new()];
	for (bindings, unit) in file_imports.iter_mut().zip([&source, &stub]) {
		bind_imports(bindings, &mut proxies, unit);
	}

	let mut seen = HashSet::new();
	let mut unresolved = Vec::new();
	for (bindings, unit) in file_imports.iter().zip([&source, &stub]) {
		for ident in unit.free_identifiers() {
			let name = ident.name.as_str();
			if scope.contains_key(name) || bindings.contains_key(name) {
				continue;
			}
			if seen.insert(name.to_string()) {
				tracing::debug!(file = unit.file(), name, pos = %ident.pos, "identifier left unresolved");
				unresolved.push(name.to_string());
			}
		}
	}

	Ok(AssembledPackage {
		name: source.package().to_string(),
		source,
		stub,
		scope,
		file_imports,
		proxies,
		unresolved,
	})
}

fn declare(scope: &mut BTreeMap<String, Symbol>, origin: Origin, unit: &SourceUnit) -> Result<()> {
	for decl in unit.decls() {
		let names: Vec<(&str, SymbolKind)> = match decl {
			Decl::Func(func) if func.recv.is_some() || func.name == "init" => continue,
			Decl::Func(func) => vec![(func.name.as_str(), SymbolKind::Func)],
			Decl::Gen(gen_decl) => {
				let kind = match gen_decl.kind {
					GenKind::Const => SymbolKind::Const,
					GenKind::Var => SymbolKind::Var,
					GenKind::Type => SymbolKind::Type,
				};
				gen_decl
					.specs
					.iter()
					.flat_map(|spec| spec.names.iter().map(move |name| (name.as_str(), kind)))
					.collect()
			}
		};

		for (name, kind) in names {
			if name == "_" {
				continue;
			}
			match scope.get(name) {
				Some(existing) if existing.origin != origin => {
					return Err(PreviewError::Assembly {
						message: format!("{name} is declared by both the source file and the stub file"),
					});
				}
				Some(_) => {
					tracing::debug!(file = unit.file(), name, "redeclared name, keeping the first declaration");
				}
				None => {
					scope.insert(
						name.to_string(),
						Symbol {
							name: name.to_string(),
							kind,
							origin,
						},
					);
				}
			}
		}
	}
	Ok(())
}

fn bind_imports(bindings: &mut HashMap<String, Rc<PackageObject>>, proxies: &mut ImportProxies, unit: &SourceUnit) {
	for import in unit.imports() {
		let object = proxies.resolve(&import.path);
		match import.name.as_deref() {
			Some("_") => {}
			Some(".") => {
				for name in object.scope().keys() {
					bindings.insert(name.clone(), Rc::clone(&object));
				}
			}
			Some(alias) => {
				bindings.insert(alias.to_string(), object);
			}
			None => {
				bindings.insert(object.name().to_string(), object);
			}
		}
	}
}
