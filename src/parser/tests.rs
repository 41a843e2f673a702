//! Unit tests for the parser module.
//!
//! This module contains tests for parsing:
//! - Expressions, precedence and the `in` rewrite
//! - Turbofish generics and type annotations
//! - Interpolated strings
//! - Control flow statements, switch cases and imports
//! - Declarations with modifiers, records, enums and requires clauses
//! - Error reporting

use std::rc::Rc;

use crate::{
    ast::{
        ast::{NodeId, NodeKind, NodeTag},
        declarations::RecordKind,
        expressions::{ArgumentKind, AsyncKind, Fixity, LiteralKind},
        statements::{CaseKind, ElseKind, ForHead, IfKind, ImportTarget},
    },
    config::Config,
    errors::errors::{ParseError, ParseErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
};

use super::{
    parser::{parse, Parser, Program},
    stmt::typed_unpacking_vars,
};

fn parse_program(source: &str) -> Program {
    let tokens = tokenize(source, "test.hlx").unwrap();
    match parse(&tokens, &Config::new("test.hlx")) {
        Ok(program) => program,
        Err(error) => panic!("failed to parse {:?}: {}", source, error),
    }
}

fn parse_error(source: &str) -> ParseError {
    parse_error_with(source, &Config::new("test.hlx"))
}

fn parse_error_with(source: &str, config: &Config) -> ParseError {
    let tokens = tokenize(source, "test.hlx").unwrap();
    match parse(&tokens, config) {
        Ok(_) => panic!("expected {:?} to fail", source),
        Err(error) => error,
    }
}

/// The expression of the first declaration, which must be `expr;`.
fn first_expr(program: &Program) -> NodeId {
    match program.ast.kind(program.declarations[0]) {
        NodeKind::ExprStmt(stmt) => stmt.expr,
        other => panic!("expected an expression statement, got {:?}", other.tag()),
    }
}

/// The initializer of the first variable of `let name = value;`.
fn let_value(program: &Program) -> NodeId {
    let NodeKind::Let(decl) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a let declaration");
    };
    let NodeKind::Var(var) = program.ast.kind(decl.vars[0]) else {
        panic!("expected a variable");
    };

    var.value.expect("variable has a value")
}

fn tag(program: &Program, id: NodeId) -> NodeTag {
    program.ast.kind(id).tag()
}

fn ident_name(program: &Program, id: NodeId) -> &str {
    match program.ast.kind(id) {
        NodeKind::Ident(ident) => &ident.name,
        other => panic!("expected an identifier, got {:?}", other.tag()),
    }
}

// EXPRESSIONS

#[test]
fn test_parse_binary_precedence() {
    let program = parse_program("a + b * c;");
    let root = first_expr(&program);

    let NodeKind::Binary(add) = program.ast.kind(root) else {
        panic!("expected a binary expression");
    };
    assert_eq!(add.op.kind, TokenKind::Add);
    assert_eq!(ident_name(&program, add.lhs), "a");

    let NodeKind::Binary(mul) = program.ast.kind(add.rhs) else {
        panic!("expected b * c on the right");
    };
    assert_eq!(mul.op.kind, TokenKind::Mul);
}

#[test]
fn test_parse_binary_left_associative() {
    let program = parse_program("a - b - c;");

    let NodeKind::Binary(outer) = program.ast.kind(first_expr(&program)) else {
        panic!("expected a binary expression");
    };
    assert_eq!(ident_name(&program, outer.rhs), "c");
    assert_eq!(tag(&program, outer.lhs), NodeTag::Binary);
}

#[test]
fn test_parse_assignment_right_associative() {
    let program = parse_program("a = b = c;");

    let NodeKind::Binary(outer) = program.ast.kind(first_expr(&program)) else {
        panic!("expected an assignment");
    };
    assert_eq!(outer.op.kind, TokenKind::Assign);
    assert_eq!(ident_name(&program, outer.lhs), "a");

    let NodeKind::Binary(inner) = program.ast.kind(outer.rhs) else {
        panic!("expected b = c on the right");
    };
    assert_eq!(inner.op.kind, TokenKind::Assign);
}

#[test]
fn test_parse_assignment_of_ternary() {
    let program = parse_program("x = a ? b : c;");

    let NodeKind::Binary(assign) = program.ast.kind(first_expr(&program)) else {
        panic!("expected an assignment");
    };
    assert_eq!(tag(&program, assign.rhs), NodeTag::Ternary);
}

#[test]
fn test_parse_if_ternary() {
    let program = parse_program("let v = b if a else c;");

    let NodeKind::Ternary(ternary) = program.ast.kind(let_value(&program)) else {
        panic!("expected a ternary");
    };
    assert_eq!(ident_name(&program, ternary.condition), "a");
    assert_eq!(ident_name(&program, ternary.if_true), "b");
    assert_eq!(ident_name(&program, ternary.if_false), "c");
}

#[test]
fn test_parse_in_becomes_contains_call() {
    let program = parse_program("x in items;");

    let NodeKind::Call(call) = program.ast.kind(first_expr(&program)) else {
        panic!("expected a call");
    };
    let NodeKind::DotPath(path) = program.ast.kind(call.path) else {
        panic!("expected a member path");
    };
    assert_eq!(ident_name(&program, path.lhs), "items");
    assert_eq!(ident_name(&program, path.rhs), "contains");

    let NodeKind::Argument(arg) = program.ast.kind(call.args[0]) else {
        panic!("expected an argument");
    };
    assert_eq!(arg.kind, ArgumentKind::Positional);
    assert_eq!(ident_name(&program, arg.value), "x");
}

#[test]
fn test_parse_unary_prefix_and_postfix() {
    let program = parse_program("-x; i++;");

    let NodeKind::Unary(neg) = program.ast.kind(first_expr(&program)) else {
        panic!("expected a unary expression");
    };
    assert_eq!(neg.fixity, Fixity::Prefix);
    assert_eq!(neg.op.kind, TokenKind::Sub);

    let NodeKind::ExprStmt(stmt) = program.ast.kind(program.declarations[1]) else {
        panic!("expected an expression statement");
    };
    let NodeKind::Unary(inc) = program.ast.kind(stmt.expr) else {
        panic!("expected a unary expression");
    };
    assert_eq!(inc.fixity, Fixity::Postfix);
}

#[test]
fn test_parse_call_with_keyword_arguments() {
    let program = parse_program("draw(shape, color = red);");

    let NodeKind::Call(call) = program.ast.kind(first_expr(&program)) else {
        panic!("expected a call");
    };
    assert!(call.generics.is_none());
    assert_eq!(call.args.len(), 2);

    let NodeKind::Argument(keyword) = program.ast.kind(call.args[1]) else {
        panic!("expected an argument");
    };
    assert_eq!(keyword.kind, ArgumentKind::Keyword);
    assert_eq!(keyword.name.as_deref(), Some("color"));
}

#[test]
fn test_parse_member_index_and_scope_access() {
    let program = parse_program("std::io::out.buffer[0].len();");

    let NodeKind::Call(call) = program.ast.kind(first_expr(&program)) else {
        panic!("expected a call");
    };
    let NodeKind::DotPath(len) = program.ast.kind(call.path) else {
        panic!("expected a member path");
    };
    let NodeKind::Index(index) = program.ast.kind(len.lhs) else {
        panic!("expected an index");
    };
    let NodeKind::DotPath(buffer) = program.ast.kind(index.lhs) else {
        panic!("expected a member path");
    };
    let NodeKind::ScopePath(scope) = program.ast.kind(buffer.lhs) else {
        panic!("expected a scope path");
    };
    assert_eq!(scope.segments.len(), 3);
    assert!(!scope.global);
}

#[test]
fn test_parse_method_call_on_integer() {
    let program = parse_program("let x = 1.foo();");

    let NodeKind::Call(call) = program.ast.kind(let_value(&program)) else {
        panic!("expected a call");
    };
    let NodeKind::DotPath(path) = program.ast.kind(call.path) else {
        panic!("expected a member path");
    };
    let NodeKind::Literal(literal) = program.ast.kind(path.lhs) else {
        panic!("expected a literal receiver");
    };
    assert_eq!(literal.kind, LiteralKind::Integer);
    assert_eq!(literal.value, "1");
    assert_eq!(ident_name(&program, path.rhs), "foo");
}

#[test]
fn test_parse_global_scope_path() {
    let program = parse_program("::std::exit(1);");

    let NodeKind::Call(call) = program.ast.kind(first_expr(&program)) else {
        panic!("expected a call");
    };
    let NodeKind::ScopePath(scope) = program.ast.kind(call.path) else {
        panic!("expected a scope path");
    };
    assert!(scope.global);
    assert_eq!(scope.segments.len(), 2);
}

#[test]
fn test_parse_turbofish_call() {
    let program = parse_program("foo::<int>(x);");

    let NodeKind::Call(call) = program.ast.kind(first_expr(&program)) else {
        panic!("expected a call");
    };
    assert_eq!(ident_name(&program, call.path), "foo");

    let generics = call.generics.expect("call has generics");
    let NodeKind::GenericInvoke(invoke) = program.ast.kind(generics) else {
        panic!("expected generic arguments");
    };
    assert_eq!(invoke.args.len(), 1);
}

#[test]
fn test_parse_less_than_is_comparison() {
    let program = parse_program("foo < bar;");

    let NodeKind::Binary(binary) = program.ast.kind(first_expr(&program)) else {
        panic!("expected a comparison");
    };
    assert_eq!(binary.op.kind, TokenKind::Less);
}

#[test]
fn test_parse_nested_generics_split_right_shift() {
    let program = parse_program("let v = Vec::<Vec::<int>>::new();");

    let NodeKind::Call(call) = program.ast.kind(let_value(&program)) else {
        panic!("expected a call");
    };
    let NodeKind::ScopePath(path) = program.ast.kind(call.path) else {
        panic!("expected a scope path");
    };
    assert_eq!(path.segments.len(), 2);
    assert_eq!(tag(&program, path.segments[0]), NodeTag::Type);
}

#[test]
fn test_parse_right_shift_outside_generics() {
    let program = parse_program("a >> b;");

    let NodeKind::Binary(binary) = program.ast.kind(first_expr(&program)) else {
        panic!("expected a binary expression");
    };
    assert_eq!(binary.op.kind, TokenKind::RightShift);
}

#[test]
fn test_parse_grouping_and_tuples() {
    let program = parse_program("(1); (1,); (1, 2);");

    let exprs: Vec<NodeTag> = program
        .declarations
        .iter()
        .map(|decl| match program.ast.kind(*decl) {
            NodeKind::ExprStmt(stmt) => tag(&program, stmt.expr),
            other => panic!("expected an expression statement, got {:?}", other.tag()),
        })
        .collect();

    assert_eq!(
        exprs,
        vec![NodeTag::Parenthesized, NodeTag::Tuple, NodeTag::Tuple]
    );
}

#[test]
fn test_parse_collections() {
    let program = parse_program("let a = [1, 2, 3]; let m = {\"k\": 1, \"j\": 2}; let s = {1, 2};");

    let values: Vec<NodeId> = program
        .declarations
        .iter()
        .map(|decl| {
            let NodeKind::Let(decl) = program.ast.kind(*decl) else {
                panic!("expected a let declaration");
            };
            let NodeKind::Var(var) = program.ast.kind(decl.vars[0]) else {
                panic!("expected a variable");
            };
            var.value.expect("variable has a value")
        })
        .collect();

    let NodeKind::Array(array) = program.ast.kind(values[0]) else {
        panic!("expected an array");
    };
    assert_eq!(array.elements.len(), 3);

    let NodeKind::Map(map) = program.ast.kind(values[1]) else {
        panic!("expected a map");
    };
    assert_eq!(map.pairs.len(), 2);

    assert_eq!(tag(&program, values[2]), NodeTag::Set);
}

#[test]
fn test_parse_object_initializers() {
    let program = parse_program("let p = Point { x = 1, y = 2 }; let q = { .x = 1 }; let e = Empty {};");

    let NodeKind::ObjInit(named) = program.ast.kind(let_value(&program)) else {
        panic!("expected an object initializer");
    };
    assert!(named.path.is_some());
    assert_eq!(named.fields.len(), 2);

    for decl in &program.declarations[1..] {
        let NodeKind::Let(decl) = program.ast.kind(*decl) else {
            panic!("expected a let declaration");
        };
        let NodeKind::Var(var) = program.ast.kind(decl.vars[0]) else {
            panic!("expected a variable");
        };
        let value = var.value.expect("variable has a value");
        assert_eq!(tag(&program, value), NodeTag::ObjInit);
    }
}

#[test]
fn test_parse_condition_keeps_block() {
    let program = parse_program("if ready { go(); }");

    let NodeKind::If(stmt) = program.ast.kind(program.declarations[0]) else {
        panic!("expected an if statement");
    };
    assert_eq!(tag(&program, stmt.condition), NodeTag::Ident);
    assert_eq!(tag(&program, stmt.body), NodeTag::Block);
}

#[test]
fn test_parse_cast_then_comparison() {
    let program = parse_program("x as int < y;");

    let NodeKind::Binary(binary) = program.ast.kind(first_expr(&program)) else {
        panic!("expected a comparison");
    };
    assert_eq!(binary.op.kind, TokenKind::Less);
    assert_eq!(tag(&program, binary.lhs), NodeTag::Cast);
}

#[test]
fn test_parse_has_and_async() {
    let program = parse_program("let a = x has Display; let b = await fetch();");

    assert_eq!(tag(&program, let_value(&program)), NodeTag::InstOf);

    let NodeKind::Let(decl) = program.ast.kind(program.declarations[1]) else {
        panic!("expected a let declaration");
    };
    let NodeKind::Var(var) = program.ast.kind(decl.vars[0]) else {
        panic!("expected a variable");
    };
    let NodeKind::AsyncThreading(expr) = program.ast.kind(var.value.unwrap()) else {
        panic!("expected an await");
    };
    assert_eq!(expr.kind, AsyncKind::Await);
    assert_eq!(tag(&program, expr.value), NodeTag::Call);
}

#[test]
fn test_parse_lambda() {
    let program = parse_program("let f = fn (x: int) -> int { return x; };");

    let NodeKind::Lambda(lambda) = program.ast.kind(let_value(&program)) else {
        panic!("expected a lambda");
    };
    let NodeKind::Function(func) = program.ast.kind(lambda.func) else {
        panic!("expected a function");
    };
    assert!(func.name.is_none());
    assert_eq!(func.params.len(), 1);
    assert!(func.returns.is_some());
}

// STRINGS

#[test]
fn test_parse_adjacent_strings_are_joined() {
    let program = parse_program("let s = \"ab\" \"cd\";");

    let NodeKind::Literal(literal) = program.ast.kind(let_value(&program)) else {
        panic!("expected a literal");
    };
    assert_eq!(literal.kind, LiteralKind::String);
    assert_eq!(literal.value, "\"abcd\"");
}

#[test]
fn test_parse_fstring_interpolation() {
    let program = parse_program("let s = f\"x={x}\";");

    let NodeKind::Literal(literal) = program.ast.kind(let_value(&program)) else {
        panic!("expected a literal");
    };
    assert_eq!(literal.prefix, Some('f'));
    assert!(literal.contains_format_args);
    assert_eq!(literal.value, r#""x=\\{\\}""#);
    assert_eq!(literal.format_args.len(), 1);
    assert_eq!(ident_name(&program, literal.format_args[0]), "x");
}

#[test]
fn test_parse_fstring_argument_positions() {
    let program = parse_program("let s = f\"a{b}\";");

    let NodeKind::Literal(literal) = program.ast.kind(let_value(&program)) else {
        panic!("expected a literal");
    };
    let span = program.ast.span(literal.format_args[0]);
    assert_eq!(span.start.line, 1);
    assert_eq!(span.start.column, 12);
    assert_eq!(span.start.offset, 12);
}

#[test]
fn test_parse_fstring_escaped_braces() {
    let program = parse_program(r#"let s = f"\{x\}";"#);

    let NodeKind::Literal(literal) = program.ast.kind(let_value(&program)) else {
        panic!("expected a literal");
    };
    assert!(literal.format_args.is_empty());
    assert_eq!(literal.value, "\"{x}\"");
}

#[test]
fn test_error_fstrings_are_not_joined() {
    let error = parse_error("f\"{a}\" f\"{b}\";");

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_token().value, "f\"{b}\"");
}

#[test]
fn test_parse_char_literals() {
    let program = parse_program("let c = '\\n';");
    let NodeKind::Literal(literal) = program.ast.kind(let_value(&program)) else {
        panic!("expected a literal");
    };
    assert_eq!(literal.kind, LiteralKind::Char);
    assert_eq!(literal.value, "'\\n'");

    for source in ["let c = 'ab';", "let c = '';"] {
        let error = parse_error(source);
        assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed", "{:?}", source);
        assert_eq!(error.get_token().kind, TokenKind::Char);
    }
}

#[test]
fn test_error_mixed_prefix_strings_are_not_joined() {
    let error = parse_error("let s = \"a\" r\"b\";");

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_token().value, "r\"b\"");
    assert_eq!(
        error.get_tip().to_string(),
        "use the same prefix on both literals, or join them with '+'"
    );

    // same prefix still joins
    let program = parse_program("let s = r\"a\" r\"b\";");
    let NodeKind::Literal(literal) = program.ast.kind(let_value(&program)) else {
        panic!("expected a literal");
    };
    assert_eq!(literal.prefix, Some('r'));
    assert_eq!(literal.value, "\"ab\"");
}

// TYPES

#[test]
fn test_parse_type_annotations() {
    let program = parse_program("let p: const *int? = null;");

    let NodeKind::Let(decl) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a let declaration");
    };
    let NodeKind::Var(var) = program.ast.kind(decl.vars[0]) else {
        panic!("expected a variable");
    };
    let NodeKind::NamedVar(named) = program.ast.kind(var.var) else {
        panic!("expected a named variable");
    };
    let NodeKind::Type(ty) = program.ast.kind(named.ty.unwrap()) else {
        panic!("expected a type");
    };

    assert_eq!(ty.specifiers.len(), 1);
    assert_eq!(ty.pointers.len(), 1);
    assert!(ty.nullable);
    assert_eq!(ident_name(&program, ty.base), "int");
}

#[test]
fn test_parse_tuple_and_fn_pointer_types() {
    let program = parse_program("let t: (int, string) = x; let f: fn (int) -> bool = g;");

    let named_type = |decl: NodeId| {
        let NodeKind::Let(decl) = program.ast.kind(decl) else {
            panic!("expected a let declaration");
        };
        let NodeKind::Var(var) = program.ast.kind(decl.vars[0]) else {
            panic!("expected a variable");
        };
        let NodeKind::NamedVar(named) = program.ast.kind(var.var) else {
            panic!("expected a named variable");
        };
        named.ty.unwrap()
    };

    let NodeKind::Type(tuple) = program.ast.kind(named_type(program.declarations[0])) else {
        panic!("expected a type");
    };
    assert_eq!(tag(&program, tuple.base), NodeTag::Tuple);

    let NodeKind::Type(pointer) = program.ast.kind(named_type(program.declarations[1])) else {
        panic!("expected a type");
    };
    assert_eq!(tag(&program, pointer.base), NodeTag::FnPointer);
}

#[test]
fn test_error_generic_type_without_turbofish() {
    let error = parse_error("let v: Vec<int> = x;");

    assert!(matches!(error.get_impl(), ParseErrorImpl::InvalidType { .. }));
    assert_eq!(error.get_token().kind, TokenKind::Less);
    assert!(!error.get_fixes().is_empty());
}

#[test]
fn test_error_array_type() {
    let error = parse_error("let v: int[4] = x;");

    assert_eq!(
        error.get_impl(),
        &ParseErrorImpl::InvalidType {
            message: String::from("array syntax is not a type")
        }
    );
}

// STATEMENTS

#[test]
fn test_parse_if_else_chain() {
    let program = parse_program("if a { } else if b { } else unless c { } else { }");

    let NodeKind::If(stmt) = program.ast.kind(program.declarations[0]) else {
        panic!("expected an if statement");
    };
    assert_eq!(stmt.kind, IfKind::If);

    let kinds: Vec<ElseKind> = stmt
        .else_bodies
        .iter()
        .map(|id| match program.ast.kind(*id) {
            NodeKind::Else(branch) => branch.kind,
            other => panic!("expected an else branch, got {:?}", other.tag()),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![ElseKind::ElseIf, ElseKind::ElseUnless, ElseKind::Else]
    );
}

#[test]
fn test_parse_single_statement_suite() {
    let program = parse_program("unless done: step();");

    let NodeKind::If(stmt) = program.ast.kind(program.declarations[0]) else {
        panic!("expected an if statement");
    };
    assert_eq!(stmt.kind, IfKind::Unless);

    let NodeKind::Block(block) = program.ast.kind(stmt.body) else {
        panic!("expected a block");
    };
    assert_eq!(block.body.len(), 1);
}

#[test]
fn test_error_second_else() {
    let error = parse_error("if a { } else { } else { }");

    assert!(error.to_string().contains("redefinition of captured else block"));
}

#[test]
fn test_error_dangling_else() {
    let error = parse_error("else { }");

    assert_eq!(
        error.get_impl(),
        &ParseErrorImpl::DanglingClause {
            keyword: String::from("else"),
            expected: String::from("'if' or 'unless'"),
        }
    );
    assert_eq!(
        error.to_string(),
        "found dangling 'else' without a matching 'if' or 'unless'"
    );
}

#[test]
fn test_parse_while() {
    let program = parse_program("while i < 10 { i += 1; }");

    let NodeKind::While(stmt) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a while loop");
    };
    assert_eq!(tag(&program, stmt.condition), NodeTag::Binary);
}

#[test]
fn test_parse_for_in() {
    let program = parse_program("for x in items { }");

    let NodeKind::For(stmt) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a for loop");
    };
    let ForHead::Python { vars, iterable } = &stmt.head else {
        panic!("expected a for-in head");
    };
    assert_eq!(vars.len(), 1);
    assert_eq!(ident_name(&program, *iterable), "items");
}

#[test_log::test]
fn test_parse_for_in_typed_vars() {
    let program = parse_program("for x: int in xs { } for a: int, b, c: Vec::<int> in rows { }");

    let heads: Vec<Vec<&str>> = program
        .declarations
        .iter()
        .map(|decl| {
            let NodeKind::For(stmt) = program.ast.kind(*decl) else {
                panic!("expected a for loop");
            };
            let ForHead::Python { vars, .. } = &stmt.head else {
                panic!("expected a for-in head");
            };
            typed_unpacking_vars(&program.ast, vars)
        })
        .collect();

    // a lone loop variable may be typed
    assert!(heads[0].is_empty());
    assert_eq!(heads[1], ["a", "c"]);
}

#[test]
fn test_parse_for_in_parenthesized() {
    let program = parse_program("for (a, b) in pairs { } for (k, v in table) { }");

    for decl in &program.declarations {
        let NodeKind::For(stmt) = program.ast.kind(*decl) else {
            panic!("expected a for loop");
        };
        let ForHead::Python { vars, .. } = &stmt.head else {
            panic!("expected a for-in head");
        };
        assert_eq!(vars.len(), 2);
    }
}

#[test]
fn test_parse_for_c_style() {
    let program = parse_program("for (let i = 0; i < 3; i++) { }");

    let NodeKind::For(stmt) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a for loop");
    };
    let ForHead::CStyle {
        init,
        condition,
        update,
    } = &stmt.head
    else {
        panic!("expected a c-style head");
    };
    assert_eq!(tag(&program, init.unwrap()), NodeTag::Let);
    assert_eq!(tag(&program, condition.unwrap()), NodeTag::Binary);
    assert_eq!(tag(&program, update.unwrap()), NodeTag::Unary);
}

#[test]
fn test_parse_for_c_style_expression_init() {
    let program = parse_program("for (i = 0; i < 10; i += 1) {}");

    let NodeKind::For(stmt) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a for loop");
    };
    let ForHead::CStyle {
        init,
        condition,
        update,
    } = &stmt.head
    else {
        panic!("expected a c-style head");
    };
    assert_eq!(tag(&program, init.unwrap()), NodeTag::ExprStmt);
    assert_eq!(tag(&program, condition.unwrap()), NodeTag::Binary);
    assert_eq!(tag(&program, update.unwrap()), NodeTag::Binary);
}

#[test]
fn test_parse_for_typed_init_backtracks() {
    let program = parse_program("for i: int = 0; i < 3; i += 1 { }");

    let NodeKind::For(stmt) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a for loop");
    };
    let ForHead::CStyle { init, update, .. } = &stmt.head else {
        panic!("expected a c-style head");
    };
    assert_eq!(tag(&program, init.unwrap()), NodeTag::Let);
    assert_eq!(tag(&program, update.unwrap()), NodeTag::Binary);

    // nothing from the abandoned for-in attempt is left in the arena
    let named_vars = program
        .ast
        .iter()
        .filter(|(_, node)| node.kind.tag() == NodeTag::NamedVar)
        .count();
    assert_eq!(named_vars, 1);
}

#[test]
fn test_parse_switch_cases() {
    let program = parse_program("switch x { case 1 { a(); } case 2: b(); case 3: default { c(); } }");

    let NodeKind::Switch(stmt) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a switch");
    };

    let cases: Vec<(CaseKind, usize)> = stmt
        .cases
        .iter()
        .map(|id| {
            let NodeKind::Case(case) = program.ast.kind(*id) else {
                panic!("expected a case");
            };
            let NodeKind::Block(block) = program.ast.kind(case.body) else {
                panic!("expected a block body");
            };
            (case.kind, block.body.len())
        })
        .collect();

    assert_eq!(
        cases,
        vec![
            (CaseKind::Case, 1),
            (CaseKind::Fallthrough, 1),
            (CaseKind::Fallthrough, 0),
            (CaseKind::Default, 1),
        ]
    );
}

#[test]
fn test_error_switch_without_cases() {
    let error = parse_error("switch x;");

    assert!(error
        .to_string()
        .contains("expected a scope with cases but found ';'"));
}

#[test]
fn test_parse_try_catch_finally() {
    let program = parse_program("try { risky(); } catch (e: Error) { } catch Other { } finally { }");

    let NodeKind::Try(stmt) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a try statement");
    };
    assert_eq!(stmt.catches.len(), 2);
    assert!(stmt.finally.is_some());

    let NodeKind::Catch(first) = program.ast.kind(stmt.catches[0]) else {
        panic!("expected a catch");
    };
    assert_eq!(tag(&program, first.binding.unwrap()), NodeTag::NamedVar);

    let NodeKind::Catch(second) = program.ast.kind(stmt.catches[1]) else {
        panic!("expected a catch");
    };
    assert_eq!(tag(&program, second.binding.unwrap()), NodeTag::Type);
}

#[test]
fn test_error_try_without_handler() {
    let error = parse_error("try { risky(); }");

    assert!(error.to_string().contains("expected 'catch' or 'finally'"));
}

#[test]
fn test_parse_jump_statements() {
    let program = parse_program("fn f() { while x { break; continue; } yield 1; return; }");

    let tags: Vec<NodeTag> = program.ast.iter().map(|(_, node)| node.kind.tag()).collect();
    assert!(tags.contains(&NodeTag::Break));
    assert!(tags.contains(&NodeTag::Continue));
    assert!(tags.contains(&NodeTag::Yield));
    assert!(tags.contains(&NodeTag::Return));
}

// IMPORTS

#[test]
fn test_parse_imports() {
    let program = parse_program(
        "import std::io; import std::*; import std::{io, fs as f}; import \"lib.hlx\"; import module net as n;",
    );

    let specs: Vec<_> = program
        .declarations
        .iter()
        .map(|decl| {
            let NodeKind::Import(import) = program.ast.kind(*decl) else {
                panic!("expected an import");
            };
            let NodeKind::ImportSpec(spec) = program.ast.kind(import.spec) else {
                panic!("expected an import spec");
            };
            (import.explicit_module, spec.clone())
        })
        .collect();

    let (_, path) = &specs[0];
    let ImportTarget::Path(target) = &path.target else {
        panic!("expected a path import");
    };
    assert_eq!(tag(&program, *target), NodeTag::ScopePath);

    assert!(specs[1].1.wildcard);
    assert_eq!(specs[2].1.items.len(), 2);
    assert_eq!(specs[3].1.target, ImportTarget::File(String::from("lib.hlx")));

    let (explicit_module, spec) = &specs[4];
    assert!(explicit_module);
    assert_eq!(spec.alias.as_deref(), Some("n"));
}

#[test]
fn test_error_invalid_imports() {
    for source in [
        "import \"a.hlx\"::*;",
        "import std::* as s;",
        "import f\"a.hlx\";",
        "import std::{\"a.hlx\"};",
    ] {
        let error = parse_error(source);
        assert!(
            matches!(error.get_impl(), ParseErrorImpl::InvalidImport { .. }),
            "{:?} gave {}",
            source,
            error
        );
    }
}

// DECLARATIONS

#[test]
fn test_parse_function_with_modifiers() {
    let program = parse_program("pub static inline fn add(a: int, b: int) -> int { return a + b; }");

    let NodeKind::Function(func) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a function");
    };
    assert!(func.modifiers.has(TokenKind::Pub));
    assert!(func.modifiers.has(TokenKind::Static));
    assert!(func.modifiers.has(TokenKind::Inline));
    assert_eq!(func.params.len(), 2);
    assert!(func.body.is_some());

    let span = program.ast.span(program.declarations[0]);
    assert_eq!(span.start.column, 0);
}

#[test]
fn test_parse_function_prototype() {
    let program = parse_program("fn exit(code: int);");

    let NodeKind::Function(func) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a function");
    };
    assert!(func.body.is_none());
}

#[test]
fn test_error_invalid_modifier() {
    let error = parse_error("inline struct S { }");

    assert_eq!(
        error.get_impl(),
        &ParseErrorImpl::InvalidModifier {
            modifier: String::from("inline"),
            target: String::from("a struct"),
        }
    );
    assert_eq!(error.get_token().kind, TokenKind::Inline);
}

#[test]
fn test_error_untyped_parameter() {
    let error = parse_error("fn f(x) { }");

    assert!(error
        .to_string()
        .contains("expected ':' and a type for the parameter"));
}

#[test]
fn test_parse_const_forms() {
    let program = parse_program("const x = 1; pub const y: int = 2; const fn f() { } const if DEBUG { }");

    assert_eq!(tag(&program, program.declarations[0]), NodeTag::Const);

    let NodeKind::Const(decl) = program.ast.kind(program.declarations[1]) else {
        panic!("expected a constant");
    };
    assert!(decl.modifiers.has(TokenKind::Pub));

    let NodeKind::Function(func) = program.ast.kind(program.declarations[2]) else {
        panic!("expected a function");
    };
    assert!(func.modifiers.has(TokenKind::Const));

    let NodeKind::If(stmt) = program.ast.kind(program.declarations[3]) else {
        panic!("expected an if statement");
    };
    assert!(stmt.has_const);
    assert!(!stmt.has_eval);
}

#[test]
fn test_error_storage_without_value() {
    assert!(parse_error("let x;")
        .to_string()
        .contains("expected a type or a value"));
    assert!(parse_error("const x: int;")
        .to_string()
        .contains("expected a value in constant definition"));
}

#[test]
fn test_parse_records() {
    let program = parse_program(
        "struct Point { let x: int; let y: int; }
         class Box requires <T> derives pub Base { fn get(self) -> T { return self.value; } }
         struct Forward;",
    );

    let NodeKind::Record(point) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a record");
    };
    assert_eq!(point.kind, RecordKind::Struct);
    assert_eq!(point.members.len(), 2);

    let NodeKind::Record(boxed) = program.ast.kind(program.declarations[1]) else {
        panic!("expected a record");
    };
    assert_eq!(boxed.kind, RecordKind::Class);
    assert!(boxed.requires.is_some());

    let NodeKind::Derives(derives) = program.ast.kind(boxed.derives.unwrap()) else {
        panic!("expected a derives list");
    };
    assert_eq!(derives.bases[0].0, Some(TokenKind::Pub));

    let NodeKind::Record(forward) = program.ast.kind(program.declarations[2]) else {
        panic!("expected a record");
    };
    assert!(forward.is_forward);
}

#[test]
fn test_parse_enum() {
    let program = parse_program("enum Color derives u8 { Red = 1, Green, Blue, }");

    let NodeKind::Enum(decl) = program.ast.kind(program.declarations[0]) else {
        panic!("expected an enum");
    };
    assert_eq!(decl.name, "Color");
    assert!(decl.derives.is_some());
    assert_eq!(decl.members.len(), 3);

    let NodeKind::EnumMember(red) = program.ast.kind(decl.members[0]) else {
        panic!("expected an enum member");
    };
    assert!(red.value.is_some());
}

#[test]
fn test_parse_requires_with_nested_generics() {
    let program = parse_program("fn f() requires <T: Vec::<int>> { }");

    let NodeKind::Function(func) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a function");
    };
    let NodeKind::Requires(requires) = program.ast.kind(func.requires.unwrap()) else {
        panic!("expected a requires clause");
    };
    assert_eq!(requires.params.len(), 1);
    assert!(func.body.is_some());
}

#[test]
fn test_parse_requires_defaults_and_bounds() {
    let program = parse_program("struct Buf requires <T, const N: int = 4> if T has Copy { }");

    let NodeKind::Record(record) = program.ast.kind(program.declarations[0]) else {
        panic!("expected a record");
    };
    let NodeKind::Requires(requires) = program.ast.kind(record.requires.unwrap()) else {
        panic!("expected a requires clause");
    };
    assert_eq!(requires.params.len(), 2);
    assert_eq!(requires.bounds.len(), 1);

    let NodeKind::RequiresParam(n) = program.ast.kind(requires.params[1]) else {
        panic!("expected a requires parameter");
    };
    assert!(n.is_const);
    assert!(n.default.is_some());
}

#[test]
fn test_parse_ffi_module_extend_and_op() {
    let program = parse_program(
        "ffi \"c\" import \"stdio.h\";
         module a::b { fn f() { } }
         extend Point derives Show { op + fn add(self, other: Point) -> Point { return self; } }",
    );

    let NodeKind::Ffi(ffi) = program.ast.kind(program.declarations[0]) else {
        panic!("expected an ffi declaration");
    };
    assert_eq!(ffi.language, "c");
    assert_eq!(tag(&program, ffi.target), NodeTag::Import);

    let NodeKind::Module(module) = program.ast.kind(program.declarations[1]) else {
        panic!("expected a module");
    };
    assert_eq!(tag(&program, module.name), NodeTag::ScopePath);
    assert_eq!(module.body.len(), 1);

    let NodeKind::Extend(extend) = program.ast.kind(program.declarations[2]) else {
        panic!("expected an extension");
    };
    let NodeKind::Op(op) = program.ast.kind(extend.body[0]) else {
        panic!("expected an operator declaration");
    };
    assert_eq!(op.op[0].kind, TokenKind::Add);
}

#[test]
fn test_error_value_after_expression_hint() {
    let error = parse_error("x 2;");

    assert!(matches!(
        error.get_impl(),
        ParseErrorImpl::UnexpectedToken { .. }
    ));
    assert_eq!(
        error.get_tip().to_string(),
        "a value can't follow another expression, add an operator or ';'"
    );
}

#[test]
fn test_error_ffi_requires_language() {
    let error = parse_error("ffi import \"stdio.h\";");

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_token().kind, TokenKind::Import);
    assert_eq!(
        error.to_string(),
        "expected a language string after 'ffi': 'import'"
    );
}

// ERRORS

#[test]
fn test_error_blank_literals() {
    for source in ["let a = [];", "let a = {};", "let a = ();"] {
        let error = parse_error(source);
        assert!(
            matches!(error.get_impl(), ParseErrorImpl::BlankLiteral { .. }),
            "{:?} gave {}",
            source,
            error
        );
    }

    assert_eq!(parse_error("let a = {};").get_token().kind, TokenKind::OpenBrace);
}

#[test]
fn test_error_blank_fstring_span() {
    let error = parse_error("let s = f\"{ }\";");

    assert!(matches!(
        error.get_impl(),
        ParseErrorImpl::MalformedFormatString { .. }
    ));
}

#[test]
fn test_error_expected_expression() {
    let error = parse_error("let x = ;");

    assert_eq!(
        error.get_impl(),
        &ParseErrorImpl::ExpectedExpression {
            token: String::from(";")
        }
    );
    assert_eq!(error.get_token().position.column, 8);
    assert!(!error.get_fixes().is_empty());
}

#[test]
fn test_error_missing_semicolon() {
    let error = parse_error("let x = 1");

    assert!(matches!(
        error.get_impl(),
        ParseErrorImpl::UnexpectedToken { .. }
    ));
    assert_eq!(error.get_token().kind, TokenKind::EOF);
}

#[test_log::test]
fn test_error_expression_too_long() {
    let config = Config::new("test.hlx").with_expr_iteration_factor(0);
    let error = parse_error_with("x;", &config);

    assert_eq!(error.get_impl(), &ParseErrorImpl::ExpressionTooLong);
}

#[test]
fn test_parse_long_chain_within_default_limit() {
    let operands = vec!["a"; 1000].join(" + ");
    let source = format!("let x = {};", operands);
    let tokens = tokenize(&source, "test.hlx").unwrap();
    let program = parse(&tokens, &Config::default()).unwrap();

    let binaries = program
        .ast
        .iter()
        .filter(|(_, node)| node.kind.tag() == NodeTag::Binary)
        .count();
    assert_eq!(binaries, 999);
}

#[test_log::test]
fn test_parse_iteration_factor_one_is_the_boundary() {
    // every loop step but the last consumes a token, so one step per
    // remaining token is always enough and zero never is
    let operands = vec!["a"; 500].join(" * ");
    let sources = [
        format!("let x = {};", operands),
        String::from("f()()()[0].g()++;"),
        String::from("let y = c ? a : b if d else e;"),
    ];

    let tight = Config::new("test.hlx").with_expr_iteration_factor(1);
    let zero = Config::new("test.hlx").with_expr_iteration_factor(0);

    for source in &sources {
        let tokens = tokenize(source, "test.hlx").unwrap();
        let ok = parse(&tokens, &tight);
        assert!(ok.is_ok(), "{:?} failed with factor 1", source);
    }

    for source in &sources {
        let error = parse_error_with(source, &zero);
        assert_eq!(error.get_impl(), &ParseErrorImpl::ExpressionTooLong);
    }
}

// PARSER STATE

#[test]
fn test_parser_checkpoint_restore() {
    let tokens = tokenize("a + b c", "test.hlx").unwrap();
    let config = Config::new("test.hlx");
    let mut parser = Parser::new(&tokens, &config);

    let checkpoint = parser.checkpoint();
    super::expr::parse_expr(&mut parser).unwrap();
    assert_eq!(parser.current().value, "c");
    assert_eq!(parser.ast().len(), 3);

    parser.restore(checkpoint);
    assert_eq!(parser.current().value, "a");
    assert!(parser.ast().is_empty());
}

#[test]
fn test_parser_advance_stops_at_eof() {
    let tokens = tokenize("a", "test.hlx").unwrap();
    let config = Config::new("test.hlx");
    let mut parser = Parser::new(&tokens, &config);

    parser.advance();
    assert!(!parser.has_tokens());
    assert_eq!(parser.advance().kind, TokenKind::EOF);
    assert_eq!(parser.current_kind(), TokenKind::EOF);
}

#[test]
fn test_parse_annotations_from_directive_tokens() {
    let mut tokens = tokenize("x;", "test.hlx").unwrap();
    let position = tokens[0].position.clone();

    let mut directives = crate::lexer::tokens::TokenSequence::new(Rc::clone(tokens.file()));
    directives.push(Token {
        kind: TokenKind::CompilerDirective,
        value: String::from("#[inline(always)]"),
        position,
        length: 17,
    });
    tokens.insert(0, directives);

    let program = parse(&tokens, &Config::new("test.hlx")).unwrap();

    assert_eq!(program.annotations.len(), 1);
    assert_eq!(program.declarations.len(), 1);
    assert_eq!(tag(&program, program.annotations[0]), NodeTag::Call);
}
