//! Declaration tables for the `sable-hir` crate: flattened type and function
//! descriptors plus the import/struct/alias records built from the engine's
//! parse events, for the [sable](https://github.com/sable-lang/sable) language.
//!
//! ## Example
//!
//! ```rust
//! use sable_hir::Session;
//! use sable_syntax::CollapseRules;
//!
//! let source = "import std.io as io";
//! let mut session = Session::new(source);
//!
//! // The engine reads bytes and reports declaration events.
//! while session.next_byte().is_some() {}
//! session.push_rule("unit", false, 0, source.len());
//! session.enter_import(session.span(0, 6), session.span(7, 13));
//! session.on_import_module_name(session.span(7, 10), false);
//! session.on_import_module_name(session.span(11, 13), true);
//! session.on_import_alias(session.span(14, 16), session.span(17, 19));
//! session.exit_import();
//! session.pop_rule("unit", true);
//!
//! let output = session.finish(&CollapseRules::collapse(["unit"])).unwrap();
//! assert_eq!(output.imports()[0].module_name, "std.io");
//! ```
mod decl;
mod functions;
mod listener;
mod resolver;
mod session;
mod types;

pub use decl::FieldDecl;
pub use decl::ImportDecl;
pub use decl::ModuleClause;
pub use decl::StructDecl;
pub use decl::TypeAliasDecl;
pub use functions::FuncDesc;
pub use functions::FuncId;
pub use functions::Param;
pub use listener::Listener;
pub use resolver::TypeResolver;
pub use session::ParseOutput;
pub use session::Session;
pub use types::TypeDesc;
pub use types::TypeId;
