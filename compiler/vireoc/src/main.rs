//! Vireo frontend CLI.

use vireoc::commands::{check_file, explain_error, lex_file, parse_file, FrontendFlags};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "parse" => {
            let usage = "Usage: vireo parse <file.js> [--module] [--strict] \
                         [--no-defer] [--threads=N] [--dump]";
            let flags = FrontendFlags::parse(&args[2..], usage);
            parse_file(&flags);
        }
        "check" => {
            let usage = "Usage: vireo check <file.js> [--module] [--strict]";
            let flags = FrontendFlags::parse(&args[2..], usage);
            check_file(&flags);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: vireo lex <file.js>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: vireo --explain <ERROR_CODE>");
                eprintln!("Example: vireo --explain E2002");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Vireo {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Log filtering comes from `RUST_LOG`; silent by default.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("Vireo JavaScript front end");
    println!();
    println!("Usage: vireo <command> [options]");
    println!();
    println!("Commands:");
    println!("  parse <file.js>      Parse and display AST info");
    println!("  check <file.js>      Full syntax check (parses every body)");
    println!("  lex <file.js>        Tokenize and display tokens");
    println!("  --explain <code>     Explain an error code (e.g., E2002)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Parse options:");
    println!("  --module, -m        Parse with the module goal");
    println!("  --strict            Force strict mode");
    println!("  --no-defer          Disable lazy function-body parsing");
    println!("  --threads=<n>       Parse deferred bodies on n worker threads");
    println!("  --dump              Print the full node tree");
    println!();
    println!("Examples:");
    println!("  vireo parse app.js --dump");
    println!("  vireo parse bundle.js --threads=4");
    println!("  vireo check lib.js --module");
    println!("  vireo --explain E2002");
}
