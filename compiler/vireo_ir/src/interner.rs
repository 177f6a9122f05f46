//! Sharded string interner — the identifier table.
//!
//! Interns identifier and literal text to canonical [`Name`] handles so
//! identical spellings share one object. This is the single structure shared
//! between the main parsing thread and background parse workers; per-shard
//! `RwLock`s keep worker-side interning from serializing against the whole
//! table.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Per-shard storage for interned strings.
struct InternShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        // Pre-intern empty string at index 0
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Shard exceeded capacity.
    ShardOverflow { shard_idx: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "interner shard {shard_idx} exceeded capacity: {count} strings"
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Sharded string interner for concurrent access.
///
/// Provides O(1) lookup and equality comparison for interned strings.
/// Wrap in [`SharedInterner`] to share across parse threads.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    /// Total count of interned strings across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new interner with pre-interned keywords.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });

        // Start with 1 for the empty string pre-interned in shard 0
        let interner = Self {
            shards,
            total_count: AtomicUsize::new(1),
        };
        interner.pre_intern_keywords();
        interner
    }

    /// Compute shard for a string based on its hash.
    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    #[inline]
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(s);
        #[allow(clippy::cast_possible_truncation)] // shard_idx < NUM_SHARDS (16)
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        // Fast path: check if already interned
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s) {
                return Ok(Name::new(shard_idx_u32, local));
            }
        }

        // Slow path: need to insert
        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(s) {
            return Ok(Name::new(shard_idx_u32, local));
        }

        // Leak the string to get 'static lifetime
        let owned: String = s.to_owned();
        let leaked: &'static str = Box::leak(owned.into_boxed_str());

        let local = u32::try_from(guard.strings.len()).map_err(|_| InternError::ShardOverflow {
            shard_idx,
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);

        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_idx_u32, local))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern` for fallible
    /// interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Intern an owned String, avoiding the extra allocation `intern` would
    /// perform. Used for cooked string/template literals.
    pub fn intern_owned(&self, s: String) -> Name {
        let shard_idx = Self::shard_for(&s);
        #[allow(clippy::cast_possible_truncation)] // shard_idx < NUM_SHARDS (16)
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s.as_str()) {
                return Name::new(shard_idx_u32, local);
            }
        }

        let mut guard = shard.write();
        if let Some(&local) = guard.map.get(s.as_str()) {
            return Name::new(shard_idx_u32, local);
        }

        let leaked: &'static str = Box::leak(s.into_boxed_str());
        let local = u32::try_from(guard.strings.len())
            .unwrap_or_else(|_| panic!("interner shard {shard_idx} exceeded capacity"));
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);
        self.total_count.fetch_add(1, Ordering::Relaxed);

        Name::new(shard_idx_u32, local)
    }

    /// Look up the string for a Name.
    pub fn lookup(&self, name: Name) -> &str {
        let shard = &self.shards[name.shard()];
        let guard = shard.read();
        guard.strings[name.local()]
    }

    /// Look up the string for a Name, returning a `'static` reference.
    ///
    /// Safe because interned strings are leaked and never deallocated.
    pub fn lookup_static(&self, name: Name) -> &'static str {
        let shard = &self.shards[name.shard()];
        let guard = shard.read();
        guard.strings[name.local()]
    }

    /// Pre-intern JavaScript keywords and well-known identifiers so that
    /// keyword classification and `eval`/`arguments` checks are pointer-free
    /// Name compares.
    fn pre_intern_keywords(&self) {
        const KEYWORDS: &[&str] = &[
            // Reserved words
            "await",
            "break",
            "case",
            "catch",
            "class",
            "const",
            "continue",
            "debugger",
            "default",
            "delete",
            "do",
            "else",
            "enum",
            "export",
            "extends",
            "false",
            "finally",
            "for",
            "function",
            "if",
            "import",
            "in",
            "instanceof",
            "new",
            "null",
            "return",
            "super",
            "switch",
            "this",
            "throw",
            "true",
            "try",
            "typeof",
            "var",
            "void",
            "while",
            "with",
            "yield",
            // Contextual keywords
            "as",
            "async",
            "from",
            "get",
            "let",
            "meta",
            "of",
            "set",
            "static",
            "target",
            // Well-known identifiers the parser tests by Name
            "arguments",
            "eval",
            "constructor",
            "prototype",
            "undefined",
            "use strict",
        ];

        for kw in KEYWORDS {
            self.intern(kw);
        }
    }

    /// Get the number of interned strings (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the interner is empty (only has the empty string).
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared interner handle for cross-thread interning.
///
/// The background coordinator clones one of these into every worker; the
/// underlying `StringInterner` is the only mutable structure shared between
/// the scanning thread and background parse jobs.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_lookup() {
        let interner = StringInterner::new();

        let foo = interner.intern("foo");
        let bar = interner.intern("bar");
        let foo2 = interner.intern("foo");

        assert_eq!(foo, foo2);
        assert_ne!(foo, bar);

        assert_eq!(interner.lookup(foo), "foo");
        assert_eq!(interner.lookup(bar), "bar");
    }

    #[test]
    fn test_empty_string() {
        let interner = StringInterner::new();
        let empty = interner.intern("");
        assert_eq!(empty, Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn test_keywords_pre_interned() {
        let interner = StringInterner::new();
        let before = interner.len();
        interner.intern("function");
        interner.intern("eval");
        interner.intern("arguments");
        // Already present, count unchanged.
        assert_eq!(interner.len(), before);
    }

    #[test]
    fn test_shared_interner() {
        let interner = SharedInterner::new();
        let interner2 = interner.clone();

        let name1 = interner.intern("shared");
        let name2 = interner2.intern("shared");

        assert_eq!(name1, name2);
    }

    #[test]
    fn test_intern_owned() {
        let interner = StringInterner::new();
        let name1 = interner.intern_owned(String::from("cooked"));
        let name2 = interner.intern("cooked");
        assert_eq!(name1, name2);
    }

    #[test]
    fn test_concurrent_intern_same_name() {
        let interner = SharedInterner::new();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let shared = interner.clone();
            handles.push(std::thread::spawn(move || shared.intern("concurrent")));
        }
        let names: Vec<Name> = handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|_| panic!("worker panicked")))
            .collect();
        assert!(names.windows(2).all(|w| w[0] == w[1]));
    }
}
