use crate::{Card, CardId, CatalogState};

/// Cards in display order: by name, ties kept in arrival order.
pub fn cards(state: &CatalogState) -> Vec<Card> {
    let mut cards: Vec<Card> = state
        .ids()
        .iter()
        .filter_map(|id| state.cards_by_id().get(id))
        .cloned()
        .collect();
    cards.sort_by(|a, b| a.name().cmp(b.name()));
    cards
}

pub fn loading(state: &CatalogState) -> bool {
    state.loading()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogViewModel {
    pub tiles: Vec<CardTile>,
    pub is_empty: bool,
    pub query: String,
    pub page: u32,
    pub loading: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTile {
    pub id: CardId,
    pub name: String,
    pub image_url: String,
    pub alt_text: String,
}

impl From<Card> for CardTile {
    fn from(card: Card) -> Self {
        Self {
            alt_text: card.alt_text(),
            id: card.id().to_owned(),
            name: card.name().to_owned(),
            image_url: card.image_url().to_owned(),
        }
    }
}
