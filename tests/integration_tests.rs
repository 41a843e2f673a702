//! Integration tests for the whole front end.
//!
//! These tests go from source text through tokenization and parsing using
//! only the public API, the way an embedding compiler would.

use std::collections::BTreeMap;

use helix_front::{
    ast::ast::{walk, Ast, NodeId, NodeKind, NodeTag, Visitor},
    config::{Config, Origin},
    errors::errors::Error,
    get_line_at_position,
    lexer::lexer::tokenize,
    parse_source,
    parser::parser::parse,
};

const SAMPLE: &str = r#"
import std::io;
import std::collections::{Map, Set as S};

pub interface Shape {
    fn area(self) -> float;
}

pub class Circle derives pub Shape {
    let radius: float;

    fn area(self) -> float {
        return 3.14159 * self.radius ** 2;
    }

    op == fn eq(self, other: *Circle) -> bool {
        return self.radius == other.radius;
    }
}

type Shapes = Vec::<*Shape>;

eval if DEBUG {
    let level: int = 3;
}

async fn load(path: string) -> string? {
    let data = await io::read(path);
    return data if data != null else null;
}

fn main() {
    let shapes = Vec::<Circle>::new();
    let total = 0.0;

    for shape in shapes {
        total += shape.area();
    }

    while total > 100.0 {
        total /= 2.0;
    }

    let label = f"total: {total}";
    let scale = fn (x: float) -> float { return x * 2.0; };

    switch shapes.len() {
        case 0: print("none");
        case 1:
        case 2 { print("few"); }
        default: print(label);
    }
}
"#;

#[derive(Default)]
struct TagCounter {
    counts: BTreeMap<NodeTag, usize>,
}

impl Visitor for TagCounter {
    fn enter(&mut self, ast: &Ast, id: NodeId) {
        *self.counts.entry(ast.kind(id).tag()).or_default() += 1;
    }
}

fn count_tags(source: &str) -> BTreeMap<NodeTag, usize> {
    let program = parse_source(source, &Config::new("sample.hlx")).unwrap();
    let mut counter = TagCounter::default();

    for decl in &program.declarations {
        walk(&program.ast, *decl, &mut counter);
    }

    counter.counts
}

#[test]
fn test_parse_sample_program() {
    let program = parse_source(SAMPLE, &Config::new("sample.hlx")).unwrap();

    let top_level: Vec<NodeTag> = program
        .declarations
        .iter()
        .map(|id| program.ast.kind(*id).tag())
        .collect();

    assert_eq!(
        top_level,
        vec![
            NodeTag::Import,
            NodeTag::Import,
            NodeTag::Record,
            NodeTag::Record,
            NodeTag::TypeAlias,
            NodeTag::If,
            NodeTag::Function,
            NodeTag::Function,
        ]
    );
    assert!(program.annotations.is_empty());
}

#[test]
fn test_parse_sample_node_counts() {
    let counts = count_tags(SAMPLE);

    assert_eq!(counts.get(&NodeTag::Function), Some(&6));
    assert_eq!(counts.get(&NodeTag::Lambda), Some(&1));
    assert_eq!(counts.get(&NodeTag::Op), Some(&1));
    assert_eq!(counts.get(&NodeTag::For), Some(&1));
    assert_eq!(counts.get(&NodeTag::While), Some(&1));
    assert_eq!(counts.get(&NodeTag::Switch), Some(&1));
    assert_eq!(counts.get(&NodeTag::Case), Some(&4));
    assert_eq!(counts.get(&NodeTag::Ternary), Some(&1));
    assert_eq!(counts.get(&NodeTag::AsyncThreading), Some(&1));
}

#[test]
fn test_parse_eval_if_declaration() {
    let program = parse_source(SAMPLE, &Config::new("sample.hlx")).unwrap();

    let eval_if = program
        .declarations
        .iter()
        .find_map(|id| match program.ast.kind(*id) {
            NodeKind::If(stmt) => Some(stmt),
            _ => None,
        })
        .unwrap();

    assert!(eval_if.has_eval);
    assert!(!eval_if.has_const);
}

#[test]
fn test_tokens_and_parse_share_positions() {
    let tokens = tokenize(SAMPLE, "sample.hlx").unwrap();
    let program = parse(&tokens, &Config::new("sample.hlx")).unwrap();

    let first = program.declarations[0];
    let span = program.ast.span(first);

    assert_eq!(span.start, tokens[0].position);
    assert_eq!(span.start.line, 2);
    assert_eq!(span.start.file.as_str(), "sample.hlx");
}

#[test]
fn test_parse_with_origin() {
    let config = Config::new("inline.hlx").with_origin(Origin::new(10, 4, 200));
    let program = parse_source("let x = 1;", &config).unwrap();

    let span = program.ast.span(program.declarations[0]);
    assert_eq!(span.start.line, 10);
    assert_eq!(span.start.column, 4);
    assert_eq!(span.start.offset, 200);
    assert_eq!(span.end.offset, 210);
}

#[test]
fn test_error_points_at_source_line() {
    let source = "fn main() {\n    let x = 1\n    print(x);\n}\n";
    let error = parse_source(source, &Config::new("broken.hlx")).unwrap_err();

    let Error::Parse(parse_error) = &error else {
        panic!("expected a parse error, got {}", error);
    };
    assert_eq!(parse_error.get_token().value, "print");

    let position = error.get_position();
    let (line_number, line, column) = get_line_at_position(source, position.offset).unwrap();

    assert_eq!(line_number, 3);
    assert_eq!(line, "    print(x);\n");
    assert_eq!(column, 4);
    assert_eq!(position.column as usize, column);
}

#[test]
fn test_error_lexing_stops_parsing() {
    let error = parse_source("let a = 1;\n/* never closed", &Config::new("broken.hlx")).unwrap_err();

    assert!(matches!(error, Error::Lex(_)));
    assert_eq!(error.get_error_name(), "UnterminatedComment");
    assert_eq!(error.get_position().line, 2);
}

#[test]
fn test_iteration_factor_is_configurable() {
    let source = "let x = a + b + c + d + e;";

    assert!(parse_source(source, &Config::new("a.hlx")).is_ok());

    let strict = Config::new("a.hlx").with_expr_iteration_factor(0);
    let error = parse_source(source, &strict).unwrap_err();
    assert_eq!(error.get_error_name(), "ExpressionTooLong");
}

#[test]
fn test_default_config_parses_long_expressions() {
    let terms: Vec<String> = (0..1000).map(|i| format!("x{}", i)).collect();
    let source = format!("fn f() {{ return {}; }}", terms.join(" + "));

    let counts = count_tags(&source);
    assert_eq!(counts.get(&NodeTag::Binary), Some(&999));
    assert_eq!(counts.get(&NodeTag::Ident), Some(&1001));
}
