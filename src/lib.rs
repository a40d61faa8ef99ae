//! # tinsel
//!
//! A small CSS3 selector and declaration parser.
//!
//! Stylesheet text is tokenized and run through an explicit state machine
//! that builds one [`Selector`] per rule block: the comma-separated
//! selector paths, a specificity weight per path, and the declarations.
//! Declaration values can then be evaluated on demand as strings,
//! integers, or packed RGB colors, including the `url()` and
//! `saturation()` value functions.
//!
//! ## Quick Start
//!
//! ```
//! use tinsel::{parse, Relation};
//!
//! let selectors = parse("div > p.active { color: #336699; width: 10px }").unwrap();
//! let selector = &selectors[0];
//!
//! assert_eq!(selector.paths[0].tags[0].relation, Relation::Child);
//! assert_eq!(selector.weight(0), Some(1));
//! assert_eq!(selector.rules[0].value_color().unwrap(), 0x336699);
//! assert_eq!(selector.rules[1].value_int().unwrap(), 10);
//! ```
//!
//! ## Streaming consumers
//!
//! Each completed block can also be handed to a callback in source order,
//! without collecting:
//!
//! ```
//! use tinsel::{parse_with, ToCss};
//!
//! let mut out = Vec::new();
//! parse_with("a { x: y } b, c { }", |selector| out.push(selector.to_css_string())).unwrap();
//! assert_eq!(out, vec!["a { x: y; }", "b, c { }"]);
//! ```
//!
//! Parsing is fully synchronous and single-pass. The first lexical or
//! syntax error aborts the call with a typed [`Error`] carrying the parser
//! state, the offending token kind, and the line number. There is no
//! error recovery; at-rules and media queries are out of scope.

pub mod error;
pub mod model;
pub mod parser;
pub mod specificity;
pub mod tokenizer;
mod value;


pub use error::{Error, Result};
pub use model::{
    Attribute, AttributeOperator, Path, PseudoClass, Relation, Rule, RuleValue, RuleValueKind,
    Selector, SelectorBuilder, Tag, ToCss,
};
pub use parser::{parse, parse_with};
pub use specificity::path_weight;
pub use tokenizer::{Token, TokenKind, Tokenizer};
