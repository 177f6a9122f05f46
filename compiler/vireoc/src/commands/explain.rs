//! The `explain` command: short documentation for error codes.

/// Print an explanation for the given error code string.
pub fn explain_error(code: &str) {
    let upper = code.to_ascii_uppercase();
    let text = match upper.as_str() {
        "E0001" => "Unterminated string literal: the closing quote is missing.",
        "E0002" => "Invalid character: a byte that cannot start any token.",
        "E0003" => "Invalid numeric literal, such as a malformed exponent or digit separator.",
        "E0004" => "Invalid escape sequence in a string or template literal.",
        "E0005" => "Unterminated template literal: the closing backtick is missing.",
        "E0006" => "Unterminated regular expression literal.",
        "E0007" => "Unterminated block comment.",
        "E0008" => "Invalid Unicode escape in an identifier.",
        "E0009" => "Invalid BigInt literal.",
        "E0010" => "Invalid private name: '#' must be followed by an identifier.",
        "E0011" => "Legacy octal literals are not allowed in strict mode.",
        "E1001" => "Unexpected token: the grammar allows no production starting here.",
        "E1002" => "Expected an expression at this position.",
        "E1003" => "Unclosed delimiter: a '}', ')', or ']' is missing.",
        "E1004" => "Expected an identifier or property name.",
        "E1005" => {
            "Invalid assignment or update target. Only identifiers, member\n\
             accesses, and destructuring patterns can be assigned to."
        }
        "E1006" => {
            "Invalid destructuring pattern, or a shorthand initializer like\n\
             `{a = 1}` used outside a destructuring context."
        }
        "E1007" => "Expected a semicolon, and no line break allows one to be inserted.",
        "E1008" => "'return' used outside a function body.",
        "E1009" => "'break' or 'continue' has no matching loop, switch, or label.",
        "E1010" => "A label with this name is already active.",
        "E1011" => "A rest element must be last and cannot have a default.",
        "E1012" => "Invalid optional chain, such as a tagged template inside '?.'.",
        "E1013" => {
            "Construct forbidden in strict mode, such as 'with', deleting a\n\
             variable, or a 'use strict' body with non-simple parameters."
        }
        "E1014" => "A reserved word was used as an identifier.",
        "E1015" => "'import' or 'export' is only allowed at the top level of a module.",
        "E1016" => "Getters take no parameters; setters take exactly one.",
        "E1017" => "The 'throw' argument must start on the same line.",
        "E1018" => "Invalid 'for' statement head.",
        "E1019" => {
            "'new.target' is only valid inside functions and 'import.meta'\n\
             only in modules."
        }
        "E1020" => "'yield' or 'await' cannot be a binding name in this context.",
        "E2001" => "A binding with this name has already been declared in the same scope.",
        "E2002" => "A 'let', 'const', or class binding was used before its declaration.",
        "E2003" => "'eval' and 'arguments' cannot be bound in strict mode.",
        "E2004" => "A private name was used without a declaration in an enclosing class.",
        "E9001" => "Internal invariant violation in the parser. Please report this.",
        "E9002" => "The source file exceeds the 4 GiB addressing limit.",
        _ => {
            eprintln!("Unknown error code: {code}");
            eprintln!();
            eprintln!("Codes have the format EXXXX where X is a digit.");
            eprintln!("Examples: E0002, E1005, E2001");
            std::process::exit(1);
        }
    };
    println!("{upper}: {text}");
}
