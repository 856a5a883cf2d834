use std::fmt;

use thiserror::Error;

/// A parse failure in either the user's file or the synthesized stub file.
///
/// The `Display` form is `file:line:column: message`, which is what the host shows verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
	/// Name of the file that failed to parse.
	pub file: String,
	/// 1-based line of the offending token.
	pub line: usize,
	/// 1-based byte column of the offending token.
	pub column: usize,
	/// Human readable description.
	pub message: String,
}

impl fmt::Display for SyntaxError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}:{}: {}", self.file, self.line, self.column, self.message)
	}
}

impl std::error::Error for SyntaxError {}

/// Aggregate errors produced while building a preview.
#[derive(Debug, Error)]
pub enum PreviewError {
	/// Input text or synthesized stub text failed to parse.
	#[error("{0}")]
	Syntax(#[from] SyntaxError),
	/// A method receiver uses a type form other than `T` or `*T`.
	#[error("{file}:{line}:{column}: method {method} has unsupported receiver type {receiver}")]
	UnsupportedReceiver {
		/// File containing the method.
		file: String,
		/// 1-based line of the method declaration.
		line: usize,
		/// 1-based column of the method declaration.
		column: usize,
		/// Method name.
		method: String,
		/// Receiver type as written in the source.
		receiver: String,
	},
	/// Merging the user's file and the stub file violated an internal invariant.
	#[error("internal error while assembling package: {message}")]
	Assembly {
		/// Description of the violated invariant.
		message: String,
	},
	/// The Go grammar could not be loaded into the parser.
	#[error("failed to load Go grammar: {0}")]
	Grammar(String),
	/// A template failed to compile.
	#[error("failed to compile template {name}: {source}")]
	Template {
		/// Template name.
		name: String,
		/// Underlying template engine error.
		#[source]
		source: minijinja::Error,
	},
	/// Failed to read template assets.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl PreviewError {
	/// Whether the error describes a problem with the user's text rather than a defect.
	pub fn is_user_facing(&self) -> bool {
		matches!(self, Self::Syntax(_) | Self::UnsupportedReceiver { .. })
	}
}

/// Result type returned by the godoc-preview library.
pub type Result<T> = std::result::Result<T, PreviewError>;
