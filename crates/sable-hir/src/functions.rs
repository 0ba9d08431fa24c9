use sable_syntax::{ArenaId, Span};
#[cfg(feature = "desc-json")]
use serde::{Deserialize, Serialize};

use crate::types::TypeId;

pub type FuncId = ArenaId<FuncDesc>;

/// One declared parameter of a function.
#[cfg_attr(feature = "desc-json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub span: Span,
    pub const_span: Span,
    pub name: Span,
    /// Index into the type table, resolved while the parameter was parsed.
    pub ty: Option<TypeId>,
}

/// One row of the flattened function table.
///
/// Emitted once at the declaration's exit event and never mutated afterward.
/// Whether the row describes a method or a free function is decided at that
/// exit, purely by whether a struct accumulator is open.
#[cfg_attr(feature = "desc-json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FuncDesc {
    pub span: Span,
    pub const_span: Span,
    pub keyword: Span,
    pub name: Span,
    pub generic_names: Vec<Span>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeId>,
}

impl FuncDesc {
    #[inline(always)]
    pub fn is_const(&self) -> bool {
        !self.const_span.is_empty()
    }

    #[inline(always)]
    pub fn is_generic(&self) -> bool {
        !self.generic_names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_const() {
        let mut desc = FuncDesc::default();
        assert!(!desc.is_const());
        desc.const_span = Span::new(0, 5, 0, 0);
        assert!(desc.is_const());
    }

    #[test]
    fn test_is_generic() {
        let mut desc = FuncDesc::default();
        assert!(!desc.is_generic());
        desc.generic_names.push(Span::new(8, 9, 0, 8));
        assert!(desc.is_generic());
    }
}
