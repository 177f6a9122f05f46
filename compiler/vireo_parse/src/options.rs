//! Parse configuration.

use bitflags::bitflags;

bitflags! {
    /// Grammar feature gates.
    ///
    /// Hosts embedding the engine can switch individual language features
    /// off; the grammar reports a disabled construct as a syntax error at
    /// the point of use. The default enables everything.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct FeatureFlags: u16 {
        const CLASSES            = 1 << 0;
        const DESTRUCTURING      = 1 << 1;
        const ASYNC_AWAIT        = 1 << 2;
        const GENERATORS         = 1 << 3;
        const MODULES            = 1 << 4;
        const TEMPLATES          = 1 << 5;
        const SPREAD_REST        = 1 << 6;
        const OPTIONAL_CHAINING  = 1 << 7;
        const EXPONENTIATION     = 1 << 8;
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        FeatureFlags::all()
    }
}

/// Options for one parse invocation.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Parse with the module goal: module items allowed, strict throughout.
    pub module: bool,
    /// Force strict mode even without a directive (eval-in-strict callers).
    pub strict_mode: bool,
    /// Master switch for body deferral.
    pub defer_enabled: bool,
    /// Only sources at least this long (bytes) are candidates for deferral.
    pub defer_threshold: u32,
    /// Bodies shorter than this are always parsed inline; skipping them
    /// costs more than parsing them.
    pub min_body_len: u32,
    /// Worker threads for background body parsing; 0 disables parallelism.
    pub background_threads: usize,
    pub features: FeatureFlags,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            module: false,
            strict_mode: false,
            defer_enabled: true,
            defer_threshold: 4096,
            min_body_len: 160,
            background_threads: 0,
            features: FeatureFlags::default(),
        }
    }
}

impl ParseOptions {
    /// Options for the module goal.
    pub fn module() -> Self {
        ParseOptions {
            module: true,
            ..ParseOptions::default()
        }
    }

    /// Options with all deferral disabled (everything parsed eagerly).
    pub fn eager() -> Self {
        ParseOptions {
            defer_enabled: false,
            ..ParseOptions::default()
        }
    }
}
