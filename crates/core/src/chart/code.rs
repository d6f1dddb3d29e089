//! Hierarchical account codes.
//!
//! A code such as `1.01.05.01` is kept as its raw text plus the parsed
//! segments. Ordering and prefix matching work on the segments, so
//! `1.2` sorts before `1.10` regardless of segment width; two codes whose
//! segments are numerically equal (`1.01` and `1.1`) fall back to the raw
//! text so the order stays total and deterministic.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One dot-separated segment of an account code.
///
/// Numeric segments sort before text segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// All-digit segment, compared by value.
    Numeric(u64),
    /// Anything else, compared lexicographically.
    Text(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = raw.parse::<u64>() {
                return Self::Numeric(value);
            }
        }
        Self::Text(raw.to_string())
    }
}

/// Dot-delimited hierarchical account identifier.
///
/// Construction never fails: historical postings may carry codes that no
/// longer follow the chart's format and must still be grouped and sorted.
/// Use [`AccountCode::is_well_formed`] where strictness matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AccountCode {
    raw: String,
    segments: Vec<Segment>,
}

impl AccountCode {
    /// Parses a code, trimming surrounding whitespace.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let segments = raw.split('.').map(Segment::parse).collect();
        Self { raw, segments }
    }

    /// Returns the code as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments (hierarchy depth).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The first segment when it is numeric; this is the major class key.
    #[must_use]
    pub fn major_prefix(&self) -> Option<u64> {
        match self.segments.first() {
            Some(Segment::Numeric(value)) => Some(*value),
            _ => None,
        }
    }

    /// True when the code is non-empty and every segment is numeric.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.raw.is_empty()
            && self
                .segments
                .iter()
                .all(|segment| matches!(segment, Segment::Numeric(_)))
    }

    /// The code one level up the hierarchy, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (parent, _) = self.raw.rsplit_once('.')?;
        Some(Self::new(parent))
    }

    /// True when `self` lies strictly below `ancestor` in the hierarchy.
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: &Self) -> bool {
        self.segments.len() > ancestor.segments.len()
            && self.segments[..ancestor.segments.len()] == ancestor.segments[..]
    }

    /// True when `self` equals `other` or lies below it.
    #[must_use]
    pub fn is_within(&self, other: &Self) -> bool {
        self == other || self.is_descendant_of(other)
    }
}

impl Ord for AccountCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments
            .cmp(&other.segments)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for AccountCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AccountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for AccountCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for AccountCode {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<AccountCode> for String {
    fn from(code: AccountCode) -> Self {
        code.raw
    }
}

impl std::str::FromStr for AccountCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn code(raw: &str) -> AccountCode {
        AccountCode::new(raw)
    }

    #[test]
    fn test_parses_segments() {
        let c = code("1.01.05.01");
        assert_eq!(
            c.segments(),
            &[
                Segment::Numeric(1),
                Segment::Numeric(1),
                Segment::Numeric(5),
                Segment::Numeric(1)
            ]
        );
        assert_eq!(c.major_prefix(), Some(1));
        assert_eq!(c.depth(), 4);
        assert!(c.is_well_formed());
    }

    #[test]
    fn test_text_segments_are_kept() {
        let c = code("1.01.X");
        assert_eq!(c.segments()[2], Segment::Text("X".to_string()));
        assert!(!c.is_well_formed());
        assert!(!code("").is_well_formed());
        assert!(!code("1..2").is_well_formed());
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(code("  4.01.03.01 ").as_str(), "4.01.03.01");
    }

    #[test]
    fn test_fixed_width_order_matches_string_order() {
        let mut codes = vec![code("2.01.01.01"), code("1.01.05.01"), code("1.01.01.01")];
        codes.sort();
        let raw: Vec<&str> = codes.iter().map(AccountCode::as_str).collect();
        assert_eq!(raw, ["1.01.01.01", "1.01.05.01", "2.01.01.01"]);
    }

    #[test]
    fn test_mixed_width_orders_by_value() {
        // Plain string comparison would put "1.10" before "1.2".
        assert!(code("1.2") < code("1.10"));
        assert!(code("2.1.3.01") < code("2.1.3.002"));
    }

    #[test]
    fn test_equal_values_tie_break_on_raw_text() {
        assert_ne!(code("1.01"), code("1.1"));
        assert!(code("1.01") < code("1.1"));
    }

    #[test]
    fn test_numeric_before_text() {
        assert!(code("1.9") < code("1.A"));
    }

    #[test]
    fn test_parent_and_descendants() {
        let leaf = code("1.01.05.01");
        assert_eq!(leaf.parent(), Some(code("1.01.05")));
        assert_eq!(code("1").parent(), None);

        assert!(leaf.is_descendant_of(&code("1.01")));
        assert!(leaf.is_descendant_of(&code("1")));
        assert!(!leaf.is_descendant_of(&leaf));
        assert!(leaf.is_within(&leaf));
        assert!(!code("1.011").is_descendant_of(&code("1.01")));
        assert!(!code("1.01").is_descendant_of(&code("1.01.05")));
    }

    #[test]
    fn test_serde_as_plain_string() {
        let c = code("3.01.01");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"3.01.01\"");
        let back: AccountCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    proptest! {
        #[test]
        fn prop_order_is_total_and_consistent_with_eq(
            a in "[0-9]{1,2}(\\.[0-9]{1,3}){0,3}",
            b in "[0-9]{1,2}(\\.[0-9]{1,3}){0,3}",
        ) {
            let (a, b) = (code(&a), code(&b));
            prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        }
    }
}
