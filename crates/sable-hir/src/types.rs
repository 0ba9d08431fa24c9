use sable_syntax::{ArenaId, Span};
#[cfg(feature = "desc-json")]
use serde::{Deserialize, Serialize};

pub type TypeId = ArenaId<TypeDesc>;

/// One row of the flattened type table.
///
/// Rows are append-only: once a declaration's type-collecting phase ends the
/// row never changes. While a row is still the *currently open* one, trailing
/// markers (`*`, `&`, `?`) patch `pointers`/`reference`/`nullable` in place.
/// Member rows (tuple elements, generic arguments, function parameter types)
/// and the return type are cross-referenced by [`TypeId`], never by pointer.
#[cfg_attr(feature = "desc-json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDesc {
    pub span: Span,
    /// Module/namespace segment of a qualified name, if any.
    pub qualifier: Span,
    pub name: Span,
    /// Number of pointer markers.
    pub pointers: u32,
    pub reference: Span,
    pub nullable: Span,
    pub is_tuple: bool,
    pub is_generic: bool,
    pub is_function: bool,
    /// Function shapes only.
    pub return_type: Option<TypeId>,
    /// Tuple elements, generic arguments or parameter types, depending on
    /// the shape flag.
    pub members: Vec<TypeId>,
}

impl Default for TypeDesc {
    fn default() -> Self {
        TypeDesc {
            span: Span::EMPTY,
            qualifier: Span::EMPTY,
            name: Span::EMPTY,
            pointers: 0,
            reference: Span::EMPTY,
            nullable: Span::EMPTY,
            is_tuple: false,
            is_generic: false,
            is_function: false,
            return_type: None,
            members: Vec::new(),
        }
    }
}

impl TypeDesc {
    pub(crate) fn named(qualifier: Span, name: Span) -> Self {
        TypeDesc {
            span: qualifier.merge(name),
            qualifier,
            name,
            ..TypeDesc::default()
        }
    }

    pub(crate) fn tuple() -> Self {
        TypeDesc {
            is_tuple: true,
            ..TypeDesc::default()
        }
    }

    pub(crate) fn function() -> Self {
        TypeDesc {
            is_function: true,
            ..TypeDesc::default()
        }
    }

    #[inline(always)]
    pub fn is_named(&self) -> bool {
        !(self.is_tuple || self.is_generic || self.is_function)
    }

    #[inline(always)]
    pub fn is_reference(&self) -> bool {
        !self.reference.is_empty()
    }

    #[inline(always)]
    pub fn is_nullable(&self) -> bool {
        !self.nullable.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_named_merges_qualifier_and_name() {
        let qualifier = Span::new(0, 3, 0, 0);
        let name = Span::new(4, 7, 0, 4);
        let desc = TypeDesc::named(qualifier, name);
        assert_eq!(desc.span, Span::new(0, 7, 0, 0));
        assert!(desc.is_named());
    }

    #[test]
    fn test_named_without_qualifier() {
        let name = Span::new(4, 7, 0, 4);
        let desc = TypeDesc::named(Span::EMPTY, name);
        assert_eq!(desc.span, name);
        assert_eq!(desc.qualifier, Span::EMPTY);
    }

    #[rstest]
    #[case(TypeDesc::tuple(), false)]
    #[case(TypeDesc::function(), false)]
    #[case(TypeDesc::named(Span::EMPTY, Span::new(0, 1, 0, 0)), true)]
    fn test_is_named(#[case] desc: TypeDesc, #[case] expected: bool) {
        assert_eq!(desc.is_named(), expected);
    }

    #[test]
    fn test_marker_predicates() {
        let mut desc = TypeDesc::default();
        assert!(!desc.is_reference());
        assert!(!desc.is_nullable());
        desc.reference = Span::new(3, 4, 0, 3);
        desc.nullable = Span::new(4, 5, 0, 4);
        assert!(desc.is_reference());
        assert!(desc.is_nullable());
    }
}
