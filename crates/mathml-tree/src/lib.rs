//! Internal library for the `latex2mathml` crate for building and serializing MathML.
//!
//! The tree is made of owned [`Element`] values: each element exclusively owns its attributes,
//! its text and its children. Converters receive a `&mut Element` for the container they should
//! populate and append to it.
//!
//! # Example
//!
//! ```rust
//! use latex2mathml_tree_internal::Element;
//!
//! let mut math = Element::new("math");
//! math.set_attr("display", "inline");
//! let row = math.create_child("mrow");
//! row.create_child("mi").set_text("x");
//! row.create_child("mo").set_text("<");
//! row.create_child("mn").set_text("2");
//!
//! assert_eq!(
//!     math.write_to_string(0),
//!     r#"<math display="inline"><mrow><mi>x</mi><mo>&lt;</mo><mn>2</mn></mrow></math>"#
//! );
//! ```
mod element;
mod escape;
mod fmt;

pub use element::Element;
pub use escape::{escape_double_quoted_attribute, escape_text_content};
