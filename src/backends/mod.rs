//! Search-source abstractions and concrete implementations.

pub mod youtube;

use crate::error::Result;

/// One search hit as returned by the paginated search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub video_id: String,
}

/// One page of search results plus the cursor for the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub items: Vec<CandidateItem>,
    pub next_page_token: Option<String>,
}

impl SearchPage {
    /// Returns the continuation token when it is present and non-empty.
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }

    pub fn video_ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.video_id.clone()).collect()
    }
}

/// Per-video metadata returned by the batch lookup call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMetadata {
    pub video_id: String,
    pub default_audio_language: Option<String>,
}

/// Fully resolved parameters for one paginated search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub part: String,
    pub keyword: String,
    pub result_type: String,
    pub order: String,
    pub region_code: Option<String>,
    /// RFC 3339 timestamp.
    pub published_after: Option<String>,
    pub page_size: u32,
}

/// Interface implemented by concrete search sources.
pub trait SearchClient {
    fn search_page(&self, request: &SearchRequest, page_token: Option<&str>)
        -> Result<SearchPage>;
    fn lookup_items(&self, joined_ids: &str, part: &str) -> Result<Vec<ItemMetadata>>;
}
