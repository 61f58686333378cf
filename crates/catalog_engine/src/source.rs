use catalog_core::{Card, FetchError};
use serde::Deserialize;

/// One batch of cards for a query/page pair.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Page {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

#[async_trait::async_trait]
pub trait CardSource: Send + Sync {
    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<Page, FetchError>;
}
