use crate::{Card, FetchError, SearchRequest};

/// Every state transition of the catalog goes through one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Replace the active query and drop the current result set.
    SetQuery { query: String },
    /// Overwrite the page cursor.
    SetPage { page: u32 },
    /// Overwrite the loading flag.
    SetLoading { loading: bool },
    /// Start a fresh query session and request its first page.
    Load { query: String },
    /// Request the page after the last merged one.
    LoadNext,
    /// The card source answered a request emitted by `Load` or `LoadNext`.
    SearchCompleted {
        request: SearchRequest,
        result: Result<Vec<Card>, FetchError>,
    },
}
