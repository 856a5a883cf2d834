//! Shared helpers for integration tests.
#![allow(dead_code)]

use godoc_preview::{DocumentationModel, Previewer, RenderedPage};

/// File with a package doc, one declared type and a method on an undeclared type.
pub const MIXED_SOURCE: &str = "package demo\n// Doc.\ntype T struct{}\nfunc (t *U) M() {}\n";

/// File where every receiver type is declared.
pub const COMPLETE_SOURCE: &str = r#"// Package shapes computes areas.
//
// Shapes are immutable.
package shapes

import "math"

// Pi is the circle constant.
const Pi = math.Pi

// Circle is a round shape.
type Circle struct {
	R float64
}

// NewCircle makes a circle of radius r.
func NewCircle(r float64) *Circle {
	return &Circle{R: r}
}

// Area returns the area.
func (c *Circle) Area() float64 {
	return Pi * c.R * c.R
}

// Describe prints a description.
func Describe(c Circle) {}

func internal() {}
"#;

pub fn previewer() -> Previewer {
	Previewer::builtin().expect("builtin templates compile")
}

pub fn render(source: &str) -> RenderedPage {
	previewer().render_page(source).expect("preview renders")
}

pub fn document(source: &str) -> DocumentationModel {
	previewer().document(source).expect("document builds")
}

/// Number of non-overlapping occurrences of `needle`.
pub fn count(haystack: &str, needle: &str) -> usize {
	haystack.matches(needle).count()
}
