//! Debug commands: `parse` and `lex` for inspecting frontend output.

use vireo_ir::{NodeId, StringInterner, TokenKind};
use vireo_lexer::{Scanner, SourceBuffer};
use vireo_parse::{parse_program, ParseResult};

use super::{read_file, report_error, FrontendFlags};

/// Parse a file and display node, function, and symbol counts.
pub fn parse_file(flags: &FrontendFlags) {
    let path = flags.path.as_str();
    let content = read_file(path);
    let interner = StringInterner::new();
    let result = parse_program(&content, &interner, &flags.options);

    if let Some(err) = &result.error {
        report_error(err, &content, path);
        std::process::exit(1);
    }

    let deferred = result
        .arena
        .functions()
        .filter(|(_, f)| f.is_deferred())
        .count();
    println!("Parse result for '{path}':");
    println!("  Nodes:     {}", result.arena.node_count());
    println!("  Functions: {}", result.arena.function_count());
    println!("  Symbols:   {}", result.symbols.len());
    println!("  Deferred:  {deferred}");

    if result.arena.function_count() > 0 {
        println!();
        println!("Functions:");
        for (_, func) in result.arena.functions() {
            let name = match func.name {
                Some(name) => interner.lookup(name),
                None => "<anonymous>",
            };
            println!("  {} @ {} [{:?}]", name, func.span, func.state);
        }
    }

    if flags.dump {
        println!();
        dump_node(&result, result.root, 0);
    }
}

fn dump_node(result: &ParseResult, id: NodeId, depth: usize) {
    let node = result.arena.get(id);
    println!("{:indent$}{:?} @ {}", "", node.kind, node.span, indent = depth * 2);
    let mut children = Vec::new();
    result.arena.child_nodes(id, &mut children);
    for child in children {
        dump_node(result, child, depth + 1);
    }
}

/// Lex a file and display the token stream.
pub fn lex_file(path: &str) {
    let content = read_file(path);
    let interner = StringInterner::new();
    let buffer = SourceBuffer::new(&content);
    let mut scanner = Scanner::new(&buffer, &interner);

    let mut count = 0usize;
    let mut regex_allowed = true;
    loop {
        match scanner.next_token(regex_allowed) {
            Ok(tok) => {
                if tok.kind == TokenKind::Eof {
                    break;
                }
                println!("{} @ {}", tok.kind, tok.span);
                regex_allowed = tok.kind.regex_allowed_after();
                count += 1;
            }
            Err(err) => {
                report_error(&err.into(), &content, path);
                std::process::exit(1);
            }
        }
    }
    println!();
    println!("{count} tokens");
}
