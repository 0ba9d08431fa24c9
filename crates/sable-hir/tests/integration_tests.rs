use sable_hir::{
    FuncDesc, FuncId, ImportDecl, Listener, ModuleClause, Session, StructDecl, TypeAliasDecl,
};
use sable_syntax::{CollapseRules, Span};

#[derive(Default)]
struct RecordingListener {
    events: Vec<String>,
}

impl Listener for RecordingListener {
    fn module_clause(&mut self, decl: &ModuleClause) {
        self.events.push(format!("module@{}", decl.name.start));
    }

    fn import(&mut self, decl: &ImportDecl) {
        self.events.push(format!("import {}", decl.module_name));
    }

    fn struct_decl(&mut self, decl: &StructDecl) {
        self.events.push(format!(
            "struct methods={} fields={}",
            decl.methods.len(),
            decl.fields.len()
        ));
    }

    fn function(&mut self, _id: FuncId, desc: &FuncDesc) {
        self.events.push(format!("fn@{}", desc.name.start));
    }

    fn type_alias(&mut self, decl: &TypeAliasDecl) {
        self.events.push(format!("alias@{}", decl.name.start));
    }
}

//  0: module demo.app
// 16: import std.io {read, write}
// 44: struct Point {
// 59:   var x: int
// 72:   fn len(): float {}
// 93: }
// 95: fn main() {}
const SOURCE: &str = "module demo.app\n\
                      import std.io {read, write}\n\
                      struct Point {\n\
                      \x20\x20var x: int\n\
                      \x20\x20fn len(): float {}\n\
                      }\n\
                      fn main() {}\n";

fn run(listener: &mut RecordingListener) -> sable_hir::ParseOutput {
    let mut session = Session::with_listener(SOURCE, listener);
    while session.next_byte().is_some() {}

    session.push_rule("unit", false, 0, SOURCE.len());

    session.push_rule("declaration", false, 0, 15);
    session.push_rule("module_clause", false, 0, 15);
    session.on_module_clause(session.span(0, 6), session.span(7, 15));
    session.pop_rule("module_clause", true);
    session.pop_rule("declaration", true);

    session.push_rule("declaration", false, 16, 43);
    session.push_rule("import_decl", false, 16, 43);
    session.enter_import(session.span(16, 22), session.span(23, 29));
    session.on_import_module_name(session.span(23, 26), false);
    session.on_import_module_name(session.span(27, 29), true);
    session.on_import_symbol(session.span(31, 35));
    session.on_import_symbol(session.span(37, 42));
    session.exit_import();
    session.pop_rule("import_decl", true);
    session.pop_rule("declaration", true);

    session.push_rule("declaration", false, 44, 94);
    session.push_rule("struct_decl", false, 44, 94);
    session.enter_struct(session.span(44, 50), session.span(51, 56));

    session.enter_field(session.span(61, 64));
    session.on_named_type(Span::EMPTY, session.span(68, 71));
    session.on_field_specifier(
        session.span(61, 71),
        session.span(65, 66),
        session.span(68, 71),
        Span::EMPTY,
    );
    session.exit_field();

    session.enter_function(Span::EMPTY, session.span(74, 76), session.span(77, 80));
    session.on_named_type(Span::EMPTY, session.span(84, 89));
    session.on_function_signature(session.span(84, 89));
    session.exit_function(session.span(74, 92));

    session.exit_struct(session.span(44, 94));
    session.pop_rule("struct_decl", true);
    session.pop_rule("declaration", true);

    session.push_rule("declaration", false, 95, 107);
    session.push_rule("function_decl", false, 95, 107);
    session.enter_function(Span::EMPTY, session.span(95, 97), session.span(98, 102));
    session.on_function_signature(Span::EMPTY);
    session.exit_function(session.span(95, 107));
    session.pop_rule("function_decl", true);
    session.pop_rule("declaration", true);

    session.pop_rule("unit", true);
    session
        .finish(&CollapseRules::collapse(["declaration"]))
        .unwrap()
}

#[test]
fn test_declaration_tables() {
    let mut listener = RecordingListener::default();
    let output = run(&mut listener);

    let clause = output.module_clause().unwrap();
    assert_eq!(clause.name.text(SOURCE), "demo.app");

    assert_eq!(output.imports().len(), 1);
    let import = &output.imports()[0];
    assert_eq!(import.module_name, "std.io");
    assert!(!import.has_alias());
    let symbols: Vec<_> = import.symbols.iter().map(|s| s.text(SOURCE)).collect();
    assert_eq!(symbols, vec!["read", "write"]);

    assert_eq!(output.structs().len(), 1);
    let point = &output.structs()[0];
    assert_eq!(point.name.text(SOURCE), "Point");
    assert_eq!(point.fields.len(), 1);
    assert_eq!(point.fields[0].name.text(SOURCE), "x");
    assert_eq!(
        output.format_type(point.fields[0].ty.unwrap(), SOURCE),
        "int"
    );
    assert_eq!(point.methods.len(), 1);
    let method = output.func_desc(point.methods[0]).unwrap();
    assert_eq!(method.name.text(SOURCE), "len");
    assert_eq!(
        output.format_type(method.return_type.unwrap(), SOURCE),
        "float"
    );

    assert_eq!(output.free_functions().len(), 1);
    let main = &output[output.free_functions()[0]];
    assert_eq!(main.name.text(SOURCE), "main");
    assert_eq!(main.span.line, 6);

    assert_eq!(output.line_count(), 8);
}

#[test]
fn test_listener_event_order() {
    let mut listener = RecordingListener::default();
    run(&mut listener);

    // The method inside Point never reaches the listener on its own; the
    // struct event carries it.
    assert_eq!(
        listener.events,
        vec![
            "module@7",
            "import std.io",
            "struct methods=1 fields=1",
            "fn@98",
        ]
    );
}

#[test]
fn test_collapsed_tree_shape() {
    let mut listener = RecordingListener::default();
    let output = run(&mut listener);
    let tree = output.tree();

    let root = tree.root().unwrap();
    assert_eq!(tree.node(root).name, "unit");
    assert_eq!(tree.children(root).len(), 4);

    // Each single-child `declaration` wrapper collapsed into its payload,
    // which remembers the wrapper's name.
    let import = tree.child_named(root, "import_decl").unwrap();
    assert!(tree.node(import).is_relabelled());
    assert_eq!(tree.node(import).original_name, "declaration");

    let dump = tree.to_string();
    assert!(dump.contains("import_decl: declaration"));
    assert!(dump.contains("struct_decl: declaration"));
}
