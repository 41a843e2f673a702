use std::{collections::BTreeMap, env, fs::read_to_string, path::Path, process::exit, time::Instant};

use helix_front::{
    ast::ast::{walk, Ast, NodeId, NodeTag, Visitor},
    config::Config,
    errors::errors::{Error, ErrorTip},
    get_line_at_position,
    lexer::lexer::tokenize_with_origin,
    parser::parser::parse,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Counts nodes by kind for the summary printed after a parse.
#[derive(Default)]
struct TagCounter {
    counts: BTreeMap<NodeTag, usize>,
}

impl Visitor for TagCounter {
    fn enter(&mut self, ast: &Ast, id: NodeId) {
        *self.counts.entry(ast.kind(id).tag()).or_default() += 1;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("usage: {} <file.hlx>", args[0]);
        exit(2);
    }

    let file_path = &args[1];
    let file_name = Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.clone());

    let source = match read_to_string(file_path) {
        Ok(source) => source,
        Err(e) => {
            error!(path = %file_path, error = %e, "failed to read source file");
            exit(1);
        }
    };

    let config = Config::new(file_name);
    let start = Instant::now();

    let tokens = match tokenize_with_origin(&source, &config.file_name, config.origin) {
        Ok(tokens) => tokens,
        Err(e) => {
            display_error(&Error::from(e), &source, file_path);
            exit(1);
        }
    };

    info!(tokens = tokens.len(), elapsed = ?start.elapsed(), "tokenized");

    let parse_start = Instant::now();
    let program = match parse(&tokens, &config) {
        Ok(program) => program,
        Err(e) => {
            display_error(&Error::from(e), &source, file_path);
            exit(1);
        }
    };

    info!(nodes = program.ast.len(), elapsed = ?parse_start.elapsed(), "parsed");

    let mut counter = TagCounter::default();
    for root in program.declarations.iter().chain(&program.annotations) {
        walk(&program.ast, *root, &mut counter);
    }

    println!(
        "{}: {} declarations, {} nodes",
        file_path,
        program.declarations.len(),
        program.ast.len()
    );
    for (tag, count) in &counter.counts {
        println!("  {:<16} {}", format!("{:?}", tag), count);
    }
}

fn display_error(error: &Error, source: &str, file: &str) {
    /*
        error: message
        -> main.hlx
           |
        20 | let a = @;
           | --------^
    */

    let position = error.get_position();

    match error.get_tip() {
        ErrorTip::None => eprintln!("Error: {}: {}", error.get_error_name(), error),
        tip => eprintln!("Error: {}: {} ({})", error.get_error_name(), error, tip),
    }
    eprintln!("-> {}:{}:{}", file, position.line, position.column + 1);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.offset) else {
        return;
    };

    let line_str = line.to_string();
    let padding = line_str.len() + 2;
    eprintln!("{:>padding$}", "|");

    let trimmed = line_text.trim_start_matches(' ');
    let removed = line_text.len() - trimmed.len();
    eprintln!("{} | {}", line_str, trimmed.trim_end());

    let arrows = line_pos.saturating_sub(removed) + 1;
    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}
