//! Parser configuration.
//!
//! Grounded on `apollo-parser::Parser`'s builder methods
//! (`recursion_limit`, `token_limit`) which configure a `LimitTracker`/lexer
//! before `parse()` consumes `self`; generalized here into one struct holding
//! every knob spec.md §6 enumerates, with spec.md's defaults.

/// Which minor syntactic dialect the parser should accept. Only baseline
/// ANSI is implemented in full; the other variants are placeholders for
/// small, well-scoped extensions (spec.md §6: "selects minor syntactic
/// variants").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Baseline ANSI SQL. The only fully-specified dialect.
    #[default]
    Ansi,
    /// ANSI plus a handful of common extensions (e.g. `LIMIT`/`OFFSET`
    /// without a standalone `FETCH FIRST` form).
    AnsiExtended,
}

/// Every configuration knob spec.md §6 names, with its stated default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum recursive production depth. Guards against stack blow-up and
    /// quadratic expression-bomb inputs.
    pub max_depth: u32,
    /// First arena block size, in bytes.
    pub initial_arena_bytes: usize,
    /// Per-block cap for geometric growth, in bytes.
    pub max_block_bytes: usize,
    /// Total arena cap, in bytes. A DoS bound.
    pub max_total_bytes: usize,
    /// Script-mode failure budget.
    pub max_errors: u32,
    /// Whether script mode recovers past a failed statement by skipping to
    /// the next `;`.
    pub continue_on_error: bool,
    /// Minor syntactic dialect selection.
    pub dialect: Dialect,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            initial_arena_bytes: 64 * 1024,
            max_block_bytes: 1024 * 1024,
            max_total_bytes: 100 * 1024 * 1024,
            max_errors: 100,
            continue_on_error: true,
            dialect: Dialect::Ansi,
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_max_total_bytes(mut self, max_total_bytes: usize) -> Self {
        self.max_total_bytes = max_total_bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = ParserConfig::default();
        assert_eq!(cfg.max_depth, 1000);
        assert_eq!(cfg.initial_arena_bytes, 65_536);
        assert_eq!(cfg.max_block_bytes, 1_048_576);
        assert_eq!(cfg.max_total_bytes, 100 * 1024 * 1024);
        assert_eq!(cfg.max_errors, 100);
        assert!(cfg.continue_on_error);
        assert_eq!(cfg.dialect, Dialect::Ansi);
    }
}
