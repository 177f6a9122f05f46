use std::fmt;

/// Error codes for all front-end diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: Scanner errors
/// - E1xxx: Grammar errors
/// - E2xxx: Binding errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Scanner Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Invalid escape sequence
    E0004,
    /// Unterminated template literal
    E0005,
    /// Unterminated regular expression
    E0006,
    /// Unterminated block comment
    E0007,
    /// Invalid Unicode escape
    E0008,
    /// Invalid BigInt literal
    E0009,
    /// Invalid private name
    E0010,
    /// Legacy octal literal in strict mode
    E0011,

    // Grammar Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Invalid assignment target
    E1005,
    /// Invalid destructuring pattern
    E1006,
    /// Missing semicolon (automatic insertion not permitted)
    E1007,
    /// `return` outside a function
    E1008,
    /// `break`/`continue` outside a loop or switch, or to an unknown label
    E1009,
    /// Duplicate label
    E1010,
    /// Rest element must be last
    E1011,
    /// Invalid optional chain
    E1012,
    /// Construct forbidden in strict mode
    E1013,
    /// Reserved word used as identifier
    E1014,
    /// `import`/`export` not at module top level
    E1015,
    /// Wrong accessor arity (getter takes no parameters, setter exactly one)
    E1016,
    /// Line break in a restricted production
    E1017,
    /// Invalid `for` loop head
    E1018,
    /// `new.target`/`import.meta` malformed or outside its context
    E1019,
    /// `await`/`yield` used outside an async/generator function
    E1020,

    // Binding Errors (E2xxx)
    /// Duplicate lexical declaration
    E2001,
    /// Use of `let`/`const` binding before its declaration
    E2002,
    /// Binding `eval`/`arguments` in strict mode
    E2003,
    /// Undeclared private name
    E2004,

    // Internal Errors (E9xxx)
    /// Internal front-end error
    E9001,
    /// Source exceeds maximum supported size
    E9002,
}

impl ErrorCode {
    /// Check if this is a grammar/syntax error (E1xxx range).
    pub fn is_grammar_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a binding error (E2xxx range).
    pub fn is_binding_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Scanner
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E0008 => "E0008",
            ErrorCode::E0009 => "E0009",
            ErrorCode::E0010 => "E0010",
            ErrorCode::E0011 => "E0011",
            // Grammar
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
            ErrorCode::E1012 => "E1012",
            ErrorCode::E1013 => "E1013",
            ErrorCode::E1014 => "E1014",
            ErrorCode::E1015 => "E1015",
            ErrorCode::E1016 => "E1016",
            ErrorCode::E1017 => "E1017",
            ErrorCode::E1018 => "E1018",
            ErrorCode::E1019 => "E1019",
            ErrorCode::E1020 => "E1020",
            // Binding
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            // Internal
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
