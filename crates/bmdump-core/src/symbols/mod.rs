//! Symbol scanning for the barman protocol header.
//!
//! The header variable is declared in a translation unit that is not known in
//! advance, so it has to be qualified with its file before it can be read.
//! This module scrapes the debugger's variable listing to find that unit.
//!
//! ## Algorithm Overview
//!
//! 1. Split the listing into lines
//! 2. Track the most recently announced translation unit
//! 3. On the first declaration line containing ` <symbol>`, return
//!    `"<unit>"::<symbol>`
//!
//! Declarations seen before any unit header are skipped.
//!
//! ## Limitations
//!
//! Several units may each declare a static variable with the header's name.
//! The first match wins; no attempt is made to decide which instance is live.
//!
//! ## Extensibility
//!
//! The [`SymbolLocator`] trait allows other lookup strategies, such as one
//! backed by a structured symbol table:
//!
//! ```no_run
//! use bmdump_core::symbols::{QualifiedSymbol, SymbolLocator};
//!
//! struct ElfLocator;
//!
//! impl SymbolLocator for ElfLocator {
//!     fn locate(&self, listing: &str) -> Option<QualifiedSymbol> {
//!         // Structured lookup
//!         None
//!     }
//! }
//! ```

mod listing;

use std::fmt;
use tracing::{debug, trace};

pub use listing::{lines, ListingLine};

/// Name of the barman protocol header variable
pub const BM_PROTOCOL_HEADER: &str = "bm_protocol_header_";

/// A variable reference scoped to its translation unit
///
/// Renders as `"<file>"::<name>` and is only meant to be handed to a
/// [`VariableReader`](crate::session::VariableReader).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedSymbol {
    file: String,
    name: String,
}

impl QualifiedSymbol {
    /// Creates a qualified symbol for `name` declared in `file`
    pub fn new(file: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }

    /// Translation unit path
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Unqualified variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of a field reached through this symbol, e.g. `->header_length`
    pub fn field(&self, suffix: &str) -> String {
        format!("{}{}", self, suffix)
    }
}

impl fmt::Display for QualifiedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"::{}", self.file, self.name)
    }
}

/// Configuration for the listing scanner
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Variable name to look for
    pub symbol: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            symbol: BM_PROTOCOL_HEADER.to_string(),
        }
    }
}

impl ScannerConfig {
    /// Creates a new scanner config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the variable name to look for
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }
}

/// Trait for implementing symbol lookup strategies
pub trait SymbolLocator {
    /// Resolve the header symbol from a variable listing
    fn locate(&self, listing: &str) -> Option<QualifiedSymbol>;

    /// Name of the symbol being located
    fn symbol(&self) -> &str {
        BM_PROTOCOL_HEADER
    }
}

/// Scans the textual variable listing
#[derive(Debug, Clone, Default)]
pub struct ListingScanner {
    config: ScannerConfig,
}

impl ListingScanner {
    /// Creates a new scanner with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new scanner with custom configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }
}

impl SymbolLocator for ListingScanner {
    fn locate(&self, listing: &str) -> Option<QualifiedSymbol> {
        // Leading space keeps `my_bm_protocol_header_` from matching.
        let needle = format!(" {}", self.config.symbol);
        let mut current_file: Option<&str> = None;

        for line in lines(listing) {
            match ListingLine::classify(line) {
                ListingLine::UnitHeader(path) => {
                    trace!("Entering unit {}", path);
                    current_file = Some(path);
                }
                ListingLine::Entry(text) => {
                    if !text.find(&needle).is_some_and(|pos| pos > 0) {
                        continue;
                    }
                    match current_file {
                        Some(file) => {
                            debug!("Found {} in {}", self.config.symbol, file);
                            return Some(QualifiedSymbol::new(file, &self.config.symbol));
                        }
                        None => trace!("Skipping declaration outside any unit: {}", text),
                    }
                }
            }
        }

        debug!("{} not found in listing", self.config.symbol);
        None
    }

    fn symbol(&self) -> &str {
        &self.config.symbol
    }
}

/// Find the barman protocol header in a variable listing
pub fn find_header_symbol(listing: &str) -> Option<QualifiedSymbol> {
    ListingScanner::new().locate(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LISTING: &str = "All defined variables:\n\
        \n\
        Global and static variables in \"../src/main.c\":\n\
        \x20   static int counter;\n\
        \n\
        Global and static variables in \"../src/barman.c\":\n\
        \x20   struct bm_protocol_header * bm_protocol_header_;\n";

    #[test]
    fn test_finds_symbol_in_second_unit() {
        let symbol = find_header_symbol(LISTING).unwrap();
        assert_eq!(symbol, QualifiedSymbol::new("../src/barman.c", "bm_protocol_header_"));
        assert_eq!(symbol.to_string(), "\"../src/barman.c\"::bm_protocol_header_");
    }

    #[test]
    fn test_not_found() {
        let listing = "Global and static variables in \"a.c\":\n    int other;\n";
        assert_eq!(find_header_symbol(listing), None);
        assert_eq!(find_header_symbol(""), None);
    }

    #[test]
    fn test_declaration_before_unit_header_is_skipped() {
        let listing = "    struct bm_protocol_header * bm_protocol_header_;\n";
        assert_eq!(find_header_symbol(listing), None);

        let listing = format!("    int bm_protocol_header_;\r\n{}", LISTING);
        assert_eq!(
            find_header_symbol(&listing).map(|s| s.file().to_string()),
            Some("../src/barman.c".to_string())
        );
    }

    #[test]
    fn test_requires_leading_space() {
        let listing = "Global and static variables in \"a.c\":\n\
            \x20   int my_bm_protocol_header_;\n\
            bm_protocol_header_\n";
        assert_eq!(find_header_symbol(listing), None);
    }

    #[test]
    fn test_first_match_wins() {
        let listing = "Global and static variables in \"first.c\":\n\
            \x20   static struct bm_protocol_header * bm_protocol_header_;\n\
            Global and static variables in \"second.c\":\n\
            \x20   static struct bm_protocol_header * bm_protocol_header_;\n";
        assert_eq!(find_header_symbol(listing).unwrap().file(), "first.c");
    }

    #[test]
    fn test_custom_symbol() {
        let scanner = ListingScanner::with_config(ScannerConfig::new().symbol("trace_header"));
        let listing = "Global and static variables in \"t.c\":\n    void * trace_header;\n";
        assert_eq!(scanner.symbol(), "trace_header");
        assert_eq!(scanner.locate(listing).unwrap().name(), "trace_header");
    }

    #[test]
    fn test_field_path() {
        let symbol = QualifiedSymbol::new("b.c", BM_PROTOCOL_HEADER);
        assert_eq!(
            symbol.field("->header_length"),
            "\"b.c\"::bm_protocol_header_->header_length"
        );
    }
}
