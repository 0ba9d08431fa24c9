//! `sable-syntax` assembles concrete syntax trees for the sable language
//! from the rule events of an external recursive-descent parsing engine.
//!
//! The engine drives everything: it reads bytes through [`SourceReader`]
//! (which keeps the [`LineIndex`] current), reports every rule activation
//! through [`TreeBuilder::push`]/[`TreeBuilder::pop`], and the finished tree
//! is then optionally rewritten by [`optimize`] to drop single-child wrapper
//! nodes and sealed for name-keyed child lookups.
//!
//! ## Examples
//!
//! ```rust
//! use sable_syntax::{CollapseRules, LineIndex, TreeBuilder, optimize};
//!
//! let index = LineIndex::new();
//! let mut builder = TreeBuilder::new("42");
//! builder.push("expression", false, 0, 2, &index);
//! builder.push("literal", false, 0, 2, &index);
//! builder.push("number", true, 0, 2, &index);
//! builder.pop("number", true);
//! builder.pop("literal", true);
//! builder.pop("expression", true);
//!
//! let tree = builder.finish();
//! let mut optimized = optimize(&tree, &CollapseRules::collapse(["literal"]));
//! optimized.seal();
//!
//! let root = optimized.root().unwrap();
//! let number = optimized.child_named(root, "number").unwrap();
//! assert_eq!(optimized.token_text(number), "42");
//! ```
mod arena;
mod cst;
mod error;
mod line_index;
mod span;

pub use arena::{Arena, ArenaId};
pub use cst::builder::TreeBuilder;
pub use cst::node::{Node, NodeId, SyntaxTree};
pub use cst::optimizer::{CollapseMode, CollapseRules, optimize};
pub use error::{Error, ParseError};
pub use line_index::{LineIndex, SourceReader};
pub use span::Span;
