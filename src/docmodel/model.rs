use serde::Serialize;

use super::comment::{DocBlock, parse_blocks};

/// Processed doc comment: the plain text and its block structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocText {
	/// Comment text with markers removed.
	pub text: String,
	/// Paragraphs, headings and code blocks.
	pub blocks: Vec<DocBlock>,
}

impl DocText {
	/// Build from comment text.
	pub fn new(text: impl Into<String>) -> Self {
		let text = text.into();
		let blocks = parse_blocks(&text);
		Self { text, blocks }
	}

	pub(crate) fn from_opt(text: Option<&str>) -> Self {
		text.map(Self::new).unwrap_or_default()
	}

	/// Whether there is no documentation.
	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}

/// A `const` or `var` declaration group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueDoc {
	/// Declared names in order.
	pub names: Vec<String>,
	/// Group documentation.
	pub doc: DocText,
	/// Declaration source.
	pub decl: String,
}

/// A function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuncDoc {
	/// Function name.
	pub name: String,
	/// Receiver type as written, for methods.
	pub recv: Option<String>,
	/// HTML anchor: `Name` or `Type.Name`.
	pub anchor: String,
	/// Documentation.
	pub doc: DocText,
	/// Signature without body.
	pub decl: String,
}

/// A type declared in the user's file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDoc {
	/// Type name.
	pub name: String,
	/// Documentation.
	pub doc: DocText,
	/// Declaration source.
	pub decl: String,
	/// Constants typed with this type.
	pub consts: Vec<ValueDoc>,
	/// Variables typed with this type.
	pub vars: Vec<ValueDoc>,
	/// Functions constructing this type.
	pub funcs: Vec<FuncDoc>,
	/// Methods.
	pub methods: Vec<FuncDoc>,
}

/// Methods and constructors of a type the file does not declare.
///
/// The type only exists as a synthesized placeholder, so there is no declaration or doc to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiverDoc {
	/// Type name.
	pub name: String,
	/// Functions constructing this type.
	pub funcs: Vec<FuncDoc>,
	/// Methods.
	pub methods: Vec<FuncDoc>,
}

/// Documentation of one package, independent of the output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentationModel {
	/// Package name.
	pub name: String,
	/// Package documentation.
	pub doc: DocText,
	/// Import paths of the user's file.
	pub imports: Vec<String>,
	/// Files shown as package files.
	pub filenames: Vec<String>,
	/// Untyped constant groups.
	pub consts: Vec<ValueDoc>,
	/// Untyped variable groups.
	pub vars: Vec<ValueDoc>,
	/// Package-level functions.
	pub funcs: Vec<FuncDoc>,
	/// Types declared in the user's file.
	pub types: Vec<TypeDoc>,
	/// Method anchors for types declared elsewhere.
	pub receivers: Vec<ReceiverDoc>,
}
