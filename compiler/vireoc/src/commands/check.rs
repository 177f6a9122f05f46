//! The `check` command: full syntax check with every body parsed.

use vireo_ir::StringInterner;
use vireo_parse::validate;

use super::{read_file, report_error, FrontendFlags};

/// Syntax-check a file. Deferral is bypassed so errors inside function
/// bodies are found too.
pub fn check_file(flags: &FrontendFlags) {
    let path = flags.path.as_str();
    let content = read_file(path);
    let interner = StringInterner::new();

    match validate(&content, &interner, &flags.options) {
        Ok(()) => println!("OK: {path}"),
        Err(err) => {
            report_error(&err, &content, path);
            std::process::exit(1);
        }
    }
}
