//! Catalog core: pure state machine, selectors and view-model helpers.
mod card;
mod effect;
mod error;
mod msg;
mod state;
mod update;
mod view_model;

pub use card::{Card, CardId};
pub use effect::{Effect, RequestToken, SearchKind, SearchRequest};
pub use error::{FailureKind, FetchError};
pub use msg::Msg;
pub use state::{CatalogState, DEFAULT_PAGE_SIZE, FIRST_PAGE};
pub use update::update;
pub use view_model::{cards, loading, CardTile, CatalogViewModel};
