use sable_syntax::Span;
#[cfg(feature = "desc-json")]
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::functions::FuncId;
use crate::types::TypeId;

/// `module a.b` at the top of a compilation unit.
#[cfg_attr(feature = "desc-json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleClause {
    pub keyword: Span,
    pub name: Span,
}

/// One finalized import declaration.
///
/// The alias clause and the symbol list are mutually exclusive: whichever was
/// seen decides the record's shape, and the other stays empty.
#[cfg_attr(feature = "desc-json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportDecl {
    pub keyword: Span,
    pub module: Span,
    /// Dotted module path, e.g. `a.b`.
    pub module_name: SmolStr,
    pub as_keyword: Span,
    pub alias: Span,
    /// Imported symbols in source order.
    pub symbols: Vec<Span>,
}

impl ImportDecl {
    #[inline(always)]
    pub fn has_alias(&self) -> bool {
        !self.alias.is_empty()
    }
}

/// One field emitted inside a field-declaration group. The group's shared
/// kind span (visibility/mutability keyword) is applied to every specifier.
#[cfg_attr(feature = "desc-json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDecl {
    pub span: Span,
    pub kind: Span,
    pub name: Span,
    pub ty: Option<TypeId>,
    pub init: Span,
}

/// One finalized struct declaration, referencing the type and function
/// tables by id.
#[cfg_attr(feature = "desc-json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructDecl {
    pub span: Span,
    pub kind: Span,
    pub name: Span,
    pub generic_names: Vec<Span>,
    pub supers: Vec<TypeId>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<FuncId>,
}

/// `type Name<T> = ...` value-alias declaration.
#[cfg_attr(feature = "desc-json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeAliasDecl {
    pub keyword: Span,
    pub name: Span,
    pub generic_names: Vec<Span>,
    pub values: Span,
}
