use crate::FetchError;

/// Identifies the query session a request was issued for.
///
/// The generation increases every time the query session changes, so two
/// loads of the same query text are still told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// First page of a session; replaces the result set.
    Replace,
    /// Follow-up page; merged into the result set.
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: RequestToken,
    pub page: u32,
    pub page_size: u32,
    pub kind: SearchKind,
}

impl SearchRequest {
    pub fn query(&self) -> &str {
        &self.token.query
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the card source for a page.
    Search(SearchRequest),
    /// A response was merged into the state.
    PageApplied {
        request: SearchRequest,
        added: usize,
        skipped: usize,
    },
    /// A response arrived for a superseded session and was dropped untouched.
    ResponseDiscarded { request: SearchRequest },
    /// The card source failed; the state kept its cards.
    SearchFailed {
        request: SearchRequest,
        error: FetchError,
    },
    /// `LoadNext` arrived before any query session was opened.
    LoadNextRejected,
}
