//! HTML rendering of documentation models through a compiled template pair.

mod core;
mod templates;

pub use self::core::{PageRenderer, RenderedPage};
pub use self::templates::{PACKAGE, PAGE, Templates};
