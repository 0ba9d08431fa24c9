use crate::decl::{ImportDecl, ModuleClause, StructDecl, TypeAliasDecl};
use crate::functions::{FuncDesc, FuncId};

/// Callbacks fired as declarations finalize.
///
/// All methods default to no-ops, so a session can run with none wired and
/// still produce the tree and tables. The listener is chosen at session
/// construction and never swapped afterwards.
pub trait Listener {
    fn module_clause(&mut self, decl: &ModuleClause) {
        let _ = decl;
    }

    fn import(&mut self, decl: &ImportDecl) {
        let _ = decl;
    }

    fn struct_decl(&mut self, decl: &StructDecl) {
        let _ = decl;
    }

    /// Fired for free functions only; methods surface through their struct's
    /// [`StructDecl::methods`] list instead.
    fn function(&mut self, id: FuncId, desc: &FuncDesc) {
        let _ = (id, desc);
    }

    fn type_alias(&mut self, decl: &TypeAliasDecl) {
        let _ = decl;
    }
}

/// The no-listener session.
impl Listener for () {}

impl<L: Listener + ?Sized> Listener for &mut L {
    fn module_clause(&mut self, decl: &ModuleClause) {
        (**self).module_clause(decl);
    }

    fn import(&mut self, decl: &ImportDecl) {
        (**self).import(decl);
    }

    fn struct_decl(&mut self, decl: &StructDecl) {
        (**self).struct_decl(decl);
    }

    fn function(&mut self, id: FuncId, desc: &FuncDesc) {
        (**self).function(id, desc);
    }

    fn type_alias(&mut self, decl: &TypeAliasDecl) {
        (**self).type_alias(decl);
    }
}
