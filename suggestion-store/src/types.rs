//! Core data model: suggestions, cached results and pages.

use serde::{Deserialize, Serialize};

/// Number of suggestions per page. Fixed by the candidate UI.
pub const PAGE_SIZE: usize = 6;

/// Initial `max_pages` for a fresh record, tightened to the true total once
/// the remote service signals exhaustion.
pub const DEFAULT_MAX_PAGES: u32 = 32;

/// Minimum page depth fetched when a query is first registered.
pub const REQUEST_PAGE_MIN: u32 = 2;

/// A single candidate word returned by the remote transliteration service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The candidate word.
    pub word: String,

    /// Romanization annotation shown next to the candidate.
    pub annotation: String,

    /// How many leading input characters this suggestion consumes. May be
    /// less than the full query for multi-syllable composition.
    pub matched_length: usize,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(
        word: impl Into<String>,
        annotation: impl Into<String>,
        matched_length: usize,
    ) -> Self {
        Self {
            word: word.into(),
            annotation: annotation.into(),
            matched_length,
        }
    }
}

/// The cached fetch result for one distinct query string.
///
/// Records are only ever constructed fully populated; concurrent readers
/// never observe a partially-initialized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResult {
    /// The query this record belongs to.
    pub query: String,

    /// All suggestions fetched so far, in remote-service order.
    pub suggestions: Vec<Suggestion>,

    /// How many pages' worth of suggestions have been fetched.
    pub requested_pages: u32,

    /// Upper bound on pages the remote service can provide for this query.
    pub max_pages: u32,

    /// Read-start time of the fetch that produced this record, unix millis.
    /// The newest read-start time wins the final write.
    pub requested_time: i64,

    /// When this record was last read, unix millis. Refreshed by the store
    /// on every successful read; drives the eviction policy.
    pub last_retrieved: i64,
}

impl CachedResult {
    /// Create a record from a completed fetch. `last_retrieved` starts out
    /// equal to the fetch's read-start time.
    pub fn new(
        query: impl Into<String>,
        suggestions: Vec<Suggestion>,
        requested_pages: u32,
        max_pages: u32,
        requested_time: i64,
    ) -> Self {
        Self {
            query: query.into(),
            suggestions,
            requested_pages,
            max_pages,
            requested_time,
            last_retrieved: requested_time,
        }
    }

    /// Zero-result fallback: a single synthetic suggestion echoing the raw
    /// input, so the candidate list is never empty.
    ///
    /// Composite queries of the form `|committed,buffer` encode an
    /// already-committed prefix plus the live buffer; only the buffer text
    /// is echoed back.
    pub fn fallback(query: impl Into<String>, requested_time: i64) -> Self {
        let query = query.into();
        let raw = raw_input(&query).to_string();
        let matched_length = raw.chars().count();
        Self::new(
            query,
            vec![Suggestion::new(raw, "", matched_length)],
            1,
            1,
            requested_time,
        )
    }

    /// Whether the remote service has no more candidates for this query.
    pub fn is_exhausted(&self) -> bool {
        self.requested_pages >= self.max_pages
    }

    /// Slice out one page of suggestions, clamping `page_num` into the
    /// range of fetched pages. The terminal page may hold fewer than
    /// [`PAGE_SIZE`] items. Returns `None` only when the record holds no
    /// pages at all.
    pub fn page(&self, page_num: u32) -> Option<Page> {
        if self.requested_pages == 0 || self.suggestions.is_empty() {
            return None;
        }
        let last = self
            .requested_pages
            .min(self.suggestions.len().div_ceil(PAGE_SIZE) as u32)
            - 1;
        let page_num = page_num.min(last);
        let start = page_num as usize * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(self.suggestions.len());
        Some(Page {
            word: self.query.clone(),
            page_num,
            suggestions: self.suggestions[start..end].to_vec(),
        })
    }
}

/// A transient, fixed-size view into a record's suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The query this page belongs to.
    pub word: String,

    /// Zero-based page index, after clamping.
    pub page_num: u32,

    /// Up to [`PAGE_SIZE`] suggestions.
    pub suggestions: Vec<Suggestion>,
}

/// Strip the `|committed,` prefix from a composite query, recovering the
/// live buffer text. Plain queries pass through unchanged.
pub fn raw_input(query: &str) -> &str {
    query
        .strip_prefix('|')
        .and_then(|rest| rest.split_once(','))
        .map_or(query, |(_, buffer)| buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record_with(count: usize, pages: u32) -> CachedResult {
        let suggestions = (0..count)
            .map(|i| Suggestion::new(format!("word{i}"), format!("ann{i}"), 1))
            .collect();
        CachedResult::new("hoeng", suggestions, pages, DEFAULT_MAX_PAGES, 1)
    }

    #[test]
    fn test_page_slicing() {
        let record = record_with(24, 4);
        let page = record.page(2).unwrap();
        assert_eq!(page.page_num, 2);
        assert_eq!(page.suggestions.len(), PAGE_SIZE);
        assert_eq!(page.suggestions[0].word, "word12");
        assert_eq!(page.suggestions[5].word, "word17");
    }

    #[test]
    fn test_page_clamps_past_the_end() {
        let record = record_with(12, 2);
        let page = record.page(99).unwrap();
        assert_eq!(page.page_num, 1);
        assert_eq!(page.suggestions[0].word, "word6");
    }

    #[test]
    fn test_terminal_page_may_be_short() {
        // 15 items over 3 pages: the last page holds 3.
        let record = record_with(15, 3);
        let page = record.page(2).unwrap();
        assert_eq!(page.suggestions.len(), 3);
    }

    #[test]
    fn test_fallback_echoes_raw_input() {
        let record = CachedResult::fallback("zoeng", 42);
        assert_eq!(record.requested_pages, 1);
        assert_eq!(record.max_pages, 1);
        assert!(record.is_exhausted());
        assert_eq!(record.suggestions.len(), 1);
        assert_eq!(record.suggestions[0].word, "zoeng");
        assert_eq!(record.suggestions[0].matched_length, 5);
    }

    #[test]
    fn test_fallback_strips_composite_prefix() {
        let record = CachedResult::fallback("|早晨,gwong", 42);
        assert_eq!(record.query, "|早晨,gwong");
        assert_eq!(record.suggestions[0].word, "gwong");
        assert_eq!(record.suggestions[0].matched_length, 5);
    }

    #[test]
    fn test_raw_input_passthrough() {
        assert_eq!(raw_input("gwong"), "gwong");
        // A bare pipe without the comma separator is not composite.
        assert_eq!(raw_input("|gwong"), "|gwong");
    }
}
