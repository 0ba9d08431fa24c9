use itertools::Itertools;
use sable_syntax::{
    Arena, CollapseRules, Error, NodeId, ParseError, SourceReader, Span, SyntaxTree, TreeBuilder,
    optimize,
};
use smol_str::SmolStr;

use crate::decl::{FieldDecl, ImportDecl, ModuleClause, StructDecl, TypeAliasDecl};
use crate::functions::{FuncDesc, FuncId, Param};
use crate::listener::Listener;
use crate::resolver::TypeResolver;
use crate::types::{TypeDesc, TypeId};

/// In-flight import declaration. Module-name segments may arrive before the
/// enter event, so the fields are filled independently and the accumulator
/// is only cleared at the declaration's exit.
#[derive(Debug, Default)]
struct ImportAcc {
    keyword: Span,
    module: Span,
    module_name: String,
    as_keyword: Span,
    alias: Span,
    symbols: Vec<Span>,
}

impl ImportAcc {
    fn is_empty(&self) -> bool {
        self.module_name.is_empty()
    }
}

#[derive(Debug, Default)]
struct StructAcc {
    kind: Span,
    name: Span,
    generic_names: Vec<Span>,
    supers: Vec<TypeId>,
    fields: Vec<FieldDecl>,
    methods: Vec<FuncId>,
}

#[derive(Debug, Default)]
struct TypeAliasAcc {
    keyword: Span,
    name: Span,
    generic_names: Vec<Span>,
}

#[derive(Debug, Default)]
struct FnAcc {
    const_span: Span,
    keyword: Span,
    name: Span,
    generic_names: Vec<Span>,
    params: Vec<Param>,
    return_type: Option<TypeId>,
}

/// One parse of one compilation unit.
///
/// The engine drives the session through the event methods; nothing here
/// looks at the source beyond the byte reader and span slicing, so the
/// session stays grammar-agnostic. When the engine is done, [`Session::finish`]
/// seals the tree and hands back every table built along the way.
pub struct Session<'a, L = ()> {
    source: &'a str,
    listener: L,
    reader: SourceReader<'a>,
    builder: TreeBuilder<'a>,
    resolver: TypeResolver,
    functions: Arena<FuncDesc>,
    /// Scratch list shared by struct, type-alias and function headers; each
    /// declaration drains it when its name-list event arrives.
    generic_names: Vec<Span>,
    import: ImportAcc,
    strukt: Option<StructAcc>,
    /// Kind span shared by every specifier of the current field group.
    field_kind: Span,
    func: FnAcc,
    alias: TypeAliasAcc,
    module_clause: Option<ModuleClause>,
    imports: Vec<ImportDecl>,
    structs: Vec<StructDecl>,
    free_functions: Vec<FuncId>,
    type_aliases: Vec<TypeAliasDecl>,
    error: Option<ParseError>,
}

impl<'a> Session<'a, ()> {
    pub fn new(source: &'a str) -> Self {
        Self::with_listener(source, ())
    }
}

impl<'a, L: Listener> Session<'a, L> {
    pub fn with_listener(source: &'a str, listener: L) -> Self {
        Self {
            source,
            listener,
            reader: SourceReader::new(source),
            builder: TreeBuilder::new(source),
            resolver: TypeResolver::new(),
            functions: Arena::new(64),
            generic_names: Vec::new(),
            import: ImportAcc::default(),
            strukt: None,
            field_kind: Span::EMPTY,
            func: FnAcc::default(),
            alias: TypeAliasAcc::default(),
            module_clause: None,
            imports: Vec::new(),
            structs: Vec::new(),
            free_functions: Vec::new(),
            type_aliases: Vec::new(),
            error: None,
        }
    }

    /// Next source byte for the engine. NUL and end of input read as `None`.
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.reader.next_byte()
    }

    /// Current read offset.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.reader.offset()
    }

    /// Builds a span over `start..end`, resolving line and column from the
    /// newlines seen so far. An inverted or zero-length range yields the
    /// empty span.
    pub fn span(&self, start: usize, end: usize) -> Span {
        if start >= end {
            return Span::EMPTY;
        }
        let (line, column) = self.reader.line_index().position(start);
        Span::new(start, end, line, column)
    }

    /// Records a syntax error at the current read offset. The first error
    /// wins; later ones from the engine's recovery attempts are ignored.
    pub fn syntax_error(&mut self) {
        if self.error.is_none() {
            self.error = Some(ParseError::Syntax {
                offset: self.reader.offset(),
            });
        }
    }

    // --- tree events -------------------------------------------------------

    /// A rule (or token) attempt started at `start..end`.
    pub fn push_rule(&mut self, name: &str, is_token: bool, start: usize, end: usize) -> NodeId {
        self.builder
            .push(name, is_token, start, end, self.reader.line_index())
    }

    /// The matching attempt ended; a failed attempt discards its subtree.
    pub fn pop_rule(&mut self, name: &str, succeeded: bool) {
        self.builder.pop(name, succeeded);
    }

    // --- declaration events ------------------------------------------------

    pub fn on_module_clause(&mut self, keyword: Span, name: Span) {
        let decl = ModuleClause { keyword, name };
        self.listener.module_clause(&decl);
        self.module_clause = Some(decl);
    }

    pub fn enter_import(&mut self, keyword: Span, module: Span) {
        self.import.keyword = keyword;
        self.import.module = module;
    }

    /// One segment of the dotted module path. `continued` is set for every
    /// segment after the first.
    pub fn on_import_module_name(&mut self, name: Span, continued: bool) {
        if !continued {
            self.import.module_name.clear();
        } else if !self.import.module_name.is_empty() {
            self.import.module_name.push('.');
        }
        self.import.module_name.push_str(name.text(self.source));
    }

    pub fn on_import_alias(&mut self, as_keyword: Span, alias: Span) {
        self.import.as_keyword = as_keyword;
        self.import.alias = alias;
    }

    pub fn on_import_symbol(&mut self, name: Span) {
        self.import.symbols.push(name);
    }

    /// Finalizes the declaration. The record's shape is decided here: an
    /// alias seen earlier wins, otherwise the symbol list (possibly empty)
    /// rides along. A declaration that never named a module emits nothing.
    pub fn exit_import(&mut self) {
        let acc = std::mem::take(&mut self.import);
        if acc.is_empty() {
            return;
        }
        // The grammar cannot produce both shapes in one declaration.
        debug_assert!(
            acc.alias.is_empty() || acc.symbols.is_empty(),
            "import declaration with both an alias and a symbol list"
        );
        let symbols = if acc.alias.is_empty() {
            acc.symbols
        } else {
            Vec::new()
        };
        let decl = ImportDecl {
            keyword: acc.keyword,
            module: acc.module,
            module_name: SmolStr::new(&acc.module_name),
            as_keyword: acc.as_keyword,
            alias: acc.alias,
            symbols,
        };
        self.listener.import(&decl);
        self.imports.push(decl);
    }

    /// One name inside a `<...>` generic-name list, for whichever declaration
    /// header is currently open.
    pub fn on_generic_name(&mut self, name: Span) {
        self.generic_names.push(name);
    }

    pub fn enter_type_alias(&mut self, keyword: Span, name: Span) {
        self.alias = TypeAliasAcc {
            keyword,
            name,
            generic_names: Vec::new(),
        };
    }

    pub fn on_type_alias_generic_names(&mut self) {
        self.alias.generic_names = std::mem::take(&mut self.generic_names);
    }

    pub fn exit_type_alias(&mut self, values: Span) {
        let acc = std::mem::take(&mut self.alias);
        let decl = TypeAliasDecl {
            keyword: acc.keyword,
            name: acc.name,
            generic_names: acc.generic_names,
            values,
        };
        self.listener.type_alias(&decl);
        self.type_aliases.push(decl);
        self.resolver.reset();
    }

    pub fn enter_struct(&mut self, kind: Span, name: Span) {
        self.strukt = Some(StructAcc {
            kind,
            name,
            ..StructAcc::default()
        });
    }

    pub fn on_struct_generic_names(&mut self) {
        let names = std::mem::take(&mut self.generic_names);
        let acc = self.struct_acc("generic names outside a struct declaration");
        acc.generic_names = names;
    }

    /// One completed super-type in the inheritance list. `continued` is set
    /// for every entry after a comma; its absence restarts the list, which
    /// drops entries from an abandoned attempt.
    pub fn on_struct_super_type(&mut self, continued: bool) {
        let current = self.resolver.take_current();
        let acc = self.struct_acc("super type outside a struct declaration");
        if !continued {
            acc.supers.clear();
        }
        if let Some(id) = current {
            acc.supers.push(id);
        }
    }

    pub fn exit_struct(&mut self, span: Span) {
        let acc = self
            .strukt
            .take()
            .expect("struct exit without a matching enter");
        let decl = StructDecl {
            span,
            kind: acc.kind,
            name: acc.name,
            generic_names: acc.generic_names,
            supers: acc.supers,
            fields: acc.fields,
            methods: acc.methods,
        };
        self.listener.struct_decl(&decl);
        self.structs.push(decl);
        self.resolver.reset();
    }

    pub fn enter_field(&mut self, kind: Span) {
        self.field_kind = kind;
    }

    /// One `name: Type = init` specifier of the current field group.
    pub fn on_field_specifier(&mut self, span: Span, name: Span, type_span: Span, init: Span) {
        let ty = if type_span.is_empty() {
            None
        } else {
            self.resolver.take_current()
        };
        let kind = self.field_kind;
        let acc = self.struct_acc("field specifier outside a struct declaration");
        acc.fields.push(FieldDecl {
            span,
            kind,
            name,
            ty,
            init,
        });
    }

    pub fn exit_field(&mut self) {
        self.field_kind = Span::EMPTY;
        self.resolver.reset();
    }

    pub fn enter_function(&mut self, const_span: Span, keyword: Span, name: Span) {
        self.func = FnAcc {
            const_span,
            keyword,
            name,
            generic_names: std::mem::take(&mut self.generic_names),
            params: Vec::new(),
            return_type: None,
        };
    }

    pub fn on_function_parameter(&mut self, span: Span, const_span: Span, name: Span, type_span: Span) {
        let ty = if type_span.is_empty() {
            None
        } else {
            self.resolver.take_current()
        };
        self.func.params.push(Param {
            span,
            const_span,
            name,
            ty,
        });
    }

    /// The signature's return type, if one was written.
    pub fn on_function_signature(&mut self, return_type: Span) {
        if !return_type.is_empty() {
            self.func.return_type = self.resolver.take_current();
        }
    }

    /// Closes the declaration. A function exiting inside an open struct is
    /// one of its methods; anything else is a free function.
    pub fn exit_function(&mut self, span: Span) {
        let acc = std::mem::take(&mut self.func);
        let id = self.functions.alloc(FuncDesc {
            span,
            const_span: acc.const_span,
            keyword: acc.keyword,
            name: acc.name,
            generic_names: acc.generic_names,
            params: acc.params,
            return_type: acc.return_type,
        });
        match self.strukt.as_mut() {
            Some(strukt) => strukt.methods.push(id),
            None => {
                self.listener.function(id, &self.functions[id]);
                self.free_functions.push(id);
            }
        }
        self.resolver.reset();
    }

    // --- type-expression events --------------------------------------------

    pub fn on_named_type(&mut self, qualifier: Span, name: Span) -> TypeId {
        self.resolver.named_type(qualifier, name)
    }

    pub fn on_pointer_marker(&mut self, marker: Span) {
        self.resolver.pointer_marker(marker);
    }

    pub fn on_reference_marker(&mut self, marker: Span) {
        self.resolver.reference_marker(marker);
    }

    pub fn on_nullable_marker(&mut self, marker: Span) {
        self.resolver.nullable_marker(marker);
    }

    pub fn enter_generic_type(&mut self) {
        self.resolver.enter_generic();
    }

    pub fn exit_generic_type(&mut self) {
        self.resolver.exit_generic();
    }

    pub fn enter_tuple_type(&mut self) {
        self.resolver.enter_tuple();
    }

    pub fn exit_tuple_type(&mut self, span: Span) {
        self.resolver.exit_tuple(span);
    }

    pub fn enter_function_type(&mut self) {
        self.resolver.enter_function();
    }

    pub fn on_function_type_params_done(&mut self) {
        self.resolver.params_done();
    }

    pub fn on_function_type_return(&mut self, span: Span) {
        self.resolver.return_type(span);
    }

    pub fn exit_function_type(&mut self, span: Span) {
        self.resolver.exit_function(span);
    }

    pub fn on_type_list_item(&mut self, continued: bool) {
        self.resolver.list_item(continued);
    }

    // --- completion --------------------------------------------------------

    /// Seals the tree, runs the collapse pass and returns everything the
    /// parse produced. A recorded syntax error turns into a diagnostic
    /// carrying the source text instead.
    pub fn finish(self, rules: &CollapseRules) -> Result<ParseOutput, Box<Error>> {
        if let Some(cause) = self.error {
            return Err(Box::new(Error::from_error(self.source, cause)));
        }
        let raw = self.builder.finish();
        let mut tree = optimize(&raw, rules);
        tree.seal();
        Ok(ParseOutput {
            tree,
            types: self.resolver.into_table(),
            functions: self.functions,
            module_clause: self.module_clause,
            imports: self.imports,
            structs: self.structs,
            free_functions: self.free_functions,
            type_aliases: self.type_aliases,
            line_count: self.reader.line_index().line_count(),
        })
    }

    fn struct_acc(&mut self, msg: &str) -> &mut StructAcc {
        self.strukt.as_mut().expect(msg)
    }
}

/// Everything one successful parse produced: the sealed, collapsed tree and
/// the flattened declaration tables.
#[derive(Debug)]
pub struct ParseOutput {
    tree: SyntaxTree,
    types: Arena<TypeDesc>,
    functions: Arena<FuncDesc>,
    module_clause: Option<ModuleClause>,
    imports: Vec<ImportDecl>,
    structs: Vec<StructDecl>,
    free_functions: Vec<FuncId>,
    type_aliases: Vec<TypeAliasDecl>,
    line_count: usize,
}

impl ParseOutput {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn type_desc(&self, id: TypeId) -> Option<&TypeDesc> {
        self.types.get(id)
    }

    pub fn func_desc(&self, id: FuncId) -> Option<&FuncDesc> {
        self.functions.get(id)
    }

    pub fn types(&self) -> &Arena<TypeDesc> {
        &self.types
    }

    pub fn functions(&self) -> &Arena<FuncDesc> {
        &self.functions
    }

    pub fn module_clause(&self) -> Option<&ModuleClause> {
        self.module_clause.as_ref()
    }

    pub fn imports(&self) -> &[ImportDecl] {
        &self.imports
    }

    pub fn structs(&self) -> &[StructDecl] {
        &self.structs
    }

    pub fn free_functions(&self) -> &[FuncId] {
        &self.free_functions
    }

    pub fn type_aliases(&self) -> &[TypeAliasDecl] {
        &self.type_aliases
    }

    /// Number of lines seen while reading, counting the one in progress.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Renders a type-table row back to source-like text. Diagnostics and
    /// tests use it; nothing in the parse path does.
    pub fn format_type(&self, id: TypeId, source: &str) -> String {
        let desc = &self.types[id];
        let members = || {
            desc.members
                .iter()
                .map(|member| self.format_type(*member, source))
                .join(", ")
        };
        let mut out = if desc.is_function {
            let mut out = format!("fn({})", members());
            if let Some(ret) = desc.return_type {
                out.push_str(": ");
                out.push_str(&self.format_type(ret, source));
            }
            out
        } else if desc.is_tuple {
            format!("({})", members())
        } else {
            let mut out = String::new();
            if !desc.qualifier.is_empty() {
                out.push_str(desc.qualifier.text(source));
                out.push('.');
            }
            out.push_str(desc.name.text(source));
            if desc.is_generic {
                out.push('<');
                out.push_str(&members());
                out.push('>');
            }
            out
        };
        for _ in 0..desc.pointers {
            out.push('*');
        }
        if desc.is_reference() {
            out.push('&');
        }
        if desc.is_nullable() {
            out.push('?');
        }
        out
    }
}

impl std::ops::Index<TypeId> for ParseOutput {
    type Output = TypeDesc;

    fn index(&self, id: TypeId) -> &Self::Output {
        &self.types[id]
    }
}

impl std::ops::Index<FuncId> for ParseOutput {
    type Output = FuncDesc;

    fn index(&self, id: FuncId) -> &Self::Output {
        &self.functions[id]
    }
}
