use std::collections::{HashMap, HashSet};

use crate::view_model::{self, CardTile, CatalogViewModel};
use crate::{Card, CardId, RequestToken};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 27;
/// The page cursor of a fresh query session.
pub const FIRST_PAGE: u32 = 1;

/// Normalized catalog state.
///
/// `cards_by_id` is the lookup table and `ids` keeps arrival order; the two
/// always describe the same set of cards. Fields are private so every change
/// funnels through [`crate::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    cards_by_id: HashMap<CardId, Card>,
    ids: Vec<CardId>,
    query: String,
    page: u32,
    loading: bool,
    page_size: u32,
    generation: u64,
    session_open: bool,
    dirty: bool,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogState {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// A zero page size is bumped to one.
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            cards_by_id: HashMap::new(),
            ids: Vec::new(),
            query: String::new(),
            page: FIRST_PAGE,
            loading: false,
            page_size: page_size.max(1),
            generation: 0,
            session_open: false,
            dirty: false,
        }
    }

    pub fn cards_by_id(&self) -> &HashMap<CardId, Card> {
        &self.cards_by_id
    }

    pub fn ids(&self) -> &[CardId] {
        &self.ids
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once `SetQuery` or `Load` has opened a query session.
    pub fn has_session(&self) -> bool {
        self.session_open
    }

    /// Token identifying the current query session.
    pub fn token(&self) -> RequestToken {
        RequestToken {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        token.generation == self.generation && token.query == self.query
    }

    /// Checks that `ids` is duplicate-free and matches `cards_by_id` exactly.
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.ids.len());
        let unique = self.ids.iter().all(|id| seen.insert(id));
        unique
            && self.ids.len() == self.cards_by_id.len()
            && self.ids.iter().all(|id| self.cards_by_id.contains_key(id))
    }

    pub fn view(&self) -> CatalogViewModel {
        let tiles: Vec<CardTile> = view_model::cards(self)
            .into_iter()
            .map(CardTile::from)
            .collect();
        CatalogViewModel {
            is_empty: tiles.is_empty(),
            tiles,
            query: self.query.clone(),
            page: self.page,
            loading: self.loading,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Opens a new query session and drops the current result set.
    pub(crate) fn start_session(&mut self, query: String) {
        self.renew_session(query);
        self.cards_by_id.clear();
        self.ids.clear();
        self.page = FIRST_PAGE;
    }

    /// Opens a new query session but keeps cards and page until a first page
    /// replaces them.
    pub(crate) fn renew_session(&mut self, query: String) {
        self.query = query;
        self.generation += 1;
        self.session_open = true;
        self.dirty = true;
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(FIRST_PAGE);
        self.dirty = true;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.dirty = true;
        }
    }

    pub(crate) fn replace_cards(&mut self, cards: Vec<Card>) -> (usize, usize) {
        self.cards_by_id.clear();
        self.ids.clear();
        self.merge_cards(cards)
    }

    /// Appends cards whose id is not present yet. Returns `(added, skipped)`.
    pub(crate) fn merge_cards(&mut self, cards: Vec<Card>) -> (usize, usize) {
        let mut added = 0;
        let mut skipped = 0;
        for card in cards {
            if self.cards_by_id.contains_key(card.id()) {
                skipped += 1;
                continue;
            }
            self.ids.push(card.id().to_owned());
            self.cards_by_id.insert(card.id().to_owned(), card);
            added += 1;
        }
        self.dirty = true;
        (added, skipped)
    }
}
