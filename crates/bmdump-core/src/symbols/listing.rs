//! Line grammar of the "variables grouped by file" listing.
//!
//! The listing is free text produced by the debugger:
//!
//! ```text
//! All defined variables:
//!
//! Global and static variables in "../src/barman.c":
//!     struct bm_protocol_header * bm_protocol_header_;
//!     static int bm_initialized;
//! ```
//!
//! Only two kinds of line matter: the unit header, which names the
//! translation unit whose variables follow, and everything else.

/// Prefix of a translation unit header line
const UNIT_PREFIX: &str = "Global and static variables in \"";

/// Suffix of a translation unit header line
const UNIT_SUFFIX: &str = "\":";

/// Classification of a single listing line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingLine<'a> {
    /// Start of a translation unit section, carrying its path
    UnitHeader(&'a str),
    /// Any other line (variable declarations, banners, blanks)
    Entry(&'a str),
}

impl<'a> ListingLine<'a> {
    /// Classify a line
    ///
    /// A unit header must match the whole line; the path may not be empty and
    /// may not contain a double quote.
    pub fn classify(line: &'a str) -> Self {
        line.strip_prefix(UNIT_PREFIX)
            .and_then(|rest| rest.strip_suffix(UNIT_SUFFIX))
            .filter(|path| !path.is_empty() && !path.contains('"'))
            .map_or(Self::Entry(line), Self::UnitHeader)
    }
}

/// Split a listing into lines on any run of `\n` / `\r`
pub fn lines(listing: &str) -> impl Iterator<Item = &str> {
    listing
        .split(|c| c == '\n' || c == '\r')
        .filter(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_unit_header() {
        assert_eq!(
            ListingLine::classify("Global and static variables in \"C:\\work\\barman.c\":"),
            ListingLine::UnitHeader("C:\\work\\barman.c")
        );
    }

    #[test]
    fn test_classify_requires_whole_line() {
        let line = "  Global and static variables in \"barman.c\":";
        assert_eq!(ListingLine::classify(line), ListingLine::Entry(line));

        let line = "Global and static variables in \"barman.c\": trailing";
        assert_eq!(ListingLine::classify(line), ListingLine::Entry(line));

        let line = "Global and static variables in \"\":";
        assert_eq!(ListingLine::classify(line), ListingLine::Entry(line));
    }

    #[test]
    fn test_lines_mixed_endings() {
        let collected: Vec<_> = lines("a\r\nb\n\n\rc").collect();
        assert_eq!(collected, vec!["a", "b", "c"]);
    }
}
