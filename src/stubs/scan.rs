use std::collections::HashSet;

use crate::core_api::Result;
use crate::core_api::error::PreviewError;
use crate::syntax::{FuncDecl, Ident, Receiver, SourceUnit, TypeExpr};

/// A receiver base type the file does not declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedIdentifier {
	/// Type name.
	pub name: String,
}

/// Find method receiver base types that are free in `unit`.
///
/// Names come back in first-occurrence order with duplicates removed. A receiver written as
/// anything other than `T` or `*T` is an [`PreviewError::UnsupportedReceiver`].
pub fn unresolved_receivers(unit: &SourceUnit) -> Result<Vec<UnresolvedIdentifier>> {
	scan(unit.file(), unit.methods(), unit.free_identifiers())
}

pub(crate) fn scan<'a>(
	file: &str,
	methods: impl IntoIterator<Item = &'a FuncDecl>,
	free: &[Ident],
) -> Result<Vec<UnresolvedIdentifier>> {
	let free: HashSet<&str> = free.iter().map(|ident| ident.name.as_str()).collect();
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for method in methods {
		let Some(recv) = &method.recv else {
			continue;
		};
		let name = receiver_base(file, method, recv)?;
		if free.contains(name) && seen.insert(name) {
			out.push(UnresolvedIdentifier { name: name.to_string() });
		}
	}

	Ok(out)
}

fn receiver_base<'a>(file: &str, method: &FuncDecl, recv: &'a Receiver) -> Result<&'a str> {
	match &recv.ty {
		TypeExpr::Ident(name) => Ok(name.as_str()),
		TypeExpr::Pointer(inner) => match inner.as_ref() {
			TypeExpr::Ident(name) => Ok(name.as_str()),
			_ => Err(unsupported(file, method, recv)),
		},
		_ => Err(unsupported(file, method, recv)),
	}
}

fn unsupported(file: &str, method: &FuncDecl, recv: &Receiver) -> PreviewError {
	PreviewError::UnsupportedReceiver {
		file: file.to_string(),
		line: method.pos.line,
		column: method.pos.column,
		method: method.name.clone(),
		receiver: recv.text.clone(),
	}
}
