use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use super::Symbol;

/// Stand-in for an imported package. Nothing is ever fetched; the member scope stays empty.
#[derive(Debug, PartialEq, Eq)]
pub struct PackageObject {
	name: String,
	path: String,
	scope: BTreeMap<String, Symbol>,
}

impl PackageObject {
	/// Package name, taken from the last path segment.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Import path the object stands for.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Exported members; always empty for proxies.
	pub fn scope(&self) -> &BTreeMap<String, Symbol> {
		&self.scope
	}
}

/// Per-request table of import proxies.
///
/// The first lookup of a path creates its [`PackageObject`]; every later lookup of the same path
/// returns the same `Rc`, so callers may compare proxies with [`Rc::ptr_eq`].
#[derive(Debug, Default)]
pub struct ImportProxies {
	by_path: HashMap<String, Rc<PackageObject>>,
}

impl ImportProxies {
	/// Create an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the proxy for `path`, creating it on first use.
	pub fn resolve(&mut self, path: &str) -> Rc<PackageObject> {
		if let Some(existing) = self.by_path.get(path) {
			return Rc::clone(existing);
		}
		let name = path.rsplit('/').next().unwrap_or(path);
		let object = Rc::new(PackageObject {
			name: name.to_string(),
			path: path.to_string(),
			scope: BTreeMap::new(),
		});
		self.by_path.insert(path.to_string(), Rc::clone(&object));
		object
	}

	/// Proxy previously created for `path`, if any.
	pub fn get(&self, path: &str) -> Option<&Rc<PackageObject>> {
		self.by_path.get(path)
	}

	/// Number of distinct import paths seen.
	pub fn len(&self) -> usize {
		self.by_path.len()
	}

	/// Whether no import has been resolved yet.
	pub fn is_empty(&self) -> bool {
		self.by_path.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn repeated_lookups_share_identity() {
		let mut proxies = ImportProxies::new();
		let first = proxies.resolve("golang.org/x/tools/godoc");
		let second = proxies.resolve("golang.org/x/tools/godoc");
		assert!(Rc::ptr_eq(&first, &second));
		assert_eq!(proxies.len(), 1);
		assert_eq!(first.name(), "godoc");
		assert_eq!(first.path(), "golang.org/x/tools/godoc");
		assert!(first.scope().is_empty());
	}

	#[test]
	fn distinct_paths_get_distinct_objects() {
		let mut proxies = ImportProxies::new();
		let a = proxies.resolve("text/template");
		let b = proxies.resolve("html/template");
		assert!(!Rc::ptr_eq(&a, &b));
		assert_eq!(a.name(), b.name());
		assert!(Rc::ptr_eq(proxies.get("html/template").expect("proxy"), &b));
	}

	#[test]
	fn single_segment_paths_name_themselves() {
		let mut proxies = ImportProxies::new();
		assert_eq!(proxies.resolve("fmt").name(), "fmt");
	}
}
