use sable_syntax::{Arena, Span};

use crate::types::{TypeDesc, TypeId};

/// One stack frame recording the owning row while its member list (generic
/// arguments, tuple elements, function parameters) is being built.
#[derive(Debug, Clone, Copy)]
struct ListCtx {
    owner: TypeId,
    /// Cleared once a function type's parameter list is done, so a stray
    /// item event cannot land in the wrong list.
    accepting: bool,
}

/// Flattens nested type expressions into the append-only type table.
///
/// Nesting is tracked with an explicit stack instead of call-stack recursion:
/// a generic argument can itself be a tuple containing a function type, and
/// the grammar path driving the events need not mirror the logical nesting.
#[derive(Debug, Default)]
pub struct TypeResolver {
    types: Arena<TypeDesc>,
    stack: Vec<ListCtx>,
    current: Option<TypeId>,
}

impl TypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn types(&self) -> &Arena<TypeDesc> {
        &self.types
    }

    pub(crate) fn into_table(self) -> Arena<TypeDesc> {
        self.types
    }

    /// The most recently completed row, if any.
    pub fn current(&self) -> Option<TypeId> {
        self.current
    }

    /// Takes the most recently completed row, leaving none.
    pub fn take_current(&mut self) -> Option<TypeId> {
        self.current.take()
    }

    /// Starts a named (possibly qualified) type: appends a fresh row and
    /// makes it current.
    pub fn named_type(&mut self, qualifier: Span, name: Span) -> TypeId {
        let id = self.types.alloc(TypeDesc::named(qualifier, name));
        self.current = Some(id);
        id
    }

    /// A trailing `*` on the current row.
    pub fn pointer_marker(&mut self, marker: Span) {
        let row = self.current_row("pointer marker outside a type expression");
        row.pointers += 1;
        row.span = row.span.merge(marker);
    }

    /// A trailing `&` on the current row.
    pub fn reference_marker(&mut self, marker: Span) {
        let row = self.current_row("reference marker outside a type expression");
        row.reference = marker;
        row.span = row.span.merge(marker);
    }

    /// A trailing `?` on the current row.
    pub fn nullable_marker(&mut self, marker: Span) {
        let row = self.current_row("nullable marker outside a type expression");
        row.nullable = marker;
        row.span = row.span.merge(marker);
    }

    /// Marks the current row generic and opens its argument list.
    pub fn enter_generic(&mut self) {
        let id = self.current.expect("generic arguments without a named type");
        self.types[id].is_generic = true;
        self.enter_list(id);
    }

    pub fn exit_generic(&mut self) {
        self.exit_list();
    }

    /// Tuples have no name token, so a fresh row is allocated up front.
    pub fn enter_tuple(&mut self) {
        let id = self.types.alloc(TypeDesc::tuple());
        self.current = Some(id);
        self.enter_list(id);
    }

    pub fn exit_tuple(&mut self, span: Span) {
        self.exit_list();
        let row = self.current_row("tuple exit without a tuple row");
        row.span = span;
    }

    pub fn enter_function(&mut self) {
        let id = self.types.alloc(TypeDesc::function());
        self.current = Some(id);
        self.enter_list(id);
    }

    /// Seals a function type's parameter list; the return type, if any, is
    /// parsed next and must not be recorded as a member.
    pub fn params_done(&mut self) {
        let ctx = self
            .stack
            .last_mut()
            .expect("parameter list end without an open list");
        ctx.accepting = false;
    }

    /// Sets the return type of the innermost function row, only when the
    /// grammar actually saw one.
    pub fn return_type(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }
        let owner = self
            .stack
            .last()
            .expect("return type without an open function type")
            .owner;
        self.types[owner].return_type = self.current;
    }

    pub fn exit_function(&mut self, span: Span) {
        self.exit_list();
        let row = self.current_row("function type exit without a function row");
        row.span = span;
    }

    /// Records the just-completed row as the next member of the innermost
    /// list. A non-continued item restarts the member list, which keeps a
    /// re-parsed list from doubling up.
    pub fn list_item(&mut self, comma_continued: bool) {
        let item = self.current.expect("list item without a completed type");
        let ctx = self.stack.last().expect("list item outside a list");
        debug_assert!(ctx.accepting, "list item after the list was sealed");
        let owner = ctx.owner;
        if !comma_continued {
            self.types[owner].members.clear();
        }
        self.types[owner].members.push(item);
    }

    fn enter_list(&mut self, owner: TypeId) {
        self.stack.push(ListCtx {
            owner,
            accepting: true,
        });
    }

    fn exit_list(&mut self) {
        let ctx = self.stack.pop().expect("list exit without a list entry");
        self.current = Some(ctx.owner);
    }

    /// Clears all transient state. Called whenever a declaration closes so
    /// nothing leaks into the next independent declaration.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.current = None;
    }

    #[track_caller]
    fn current_row(&mut self, message: &str) -> &mut TypeDesc {
        let id = self.current.expect(message);
        &mut self.types[id]
    }
}
