//! Catalog engine: card source IO, async store orchestration and input timing.
mod controller;
mod debounce;
mod error;
mod http;
mod source;
mod store;

pub use controller::{ControllerSettings, SearchController, SearchEvent, Trigger};
pub use debounce::Debouncer;
pub use error::CatalogError;
pub use http::{HttpCardSource, SourceSettings};
pub use source::{CardSource, Page};
pub use store::{CatalogStore, LoadOutcome, StoreSettings};
