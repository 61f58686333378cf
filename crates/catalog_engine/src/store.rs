use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use catalog_core::{
    update, Card, CatalogState, CatalogViewModel, Effect, Msg, SearchRequest, DEFAULT_PAGE_SIZE,
};
use catalog_logging::{catalog_debug, catalog_error, catalog_info, catalog_warn};

use crate::{CardSource, CatalogError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    pub page_size: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// What happened to the response of a `load`/`load_next` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was merged into the catalog.
    Applied {
        page: u32,
        added: usize,
        skipped: usize,
    },
    /// The query session changed while the request was in flight; nothing was touched.
    Discarded,
}

/// Owns the catalog state and runs the searches its transitions ask for.
///
/// The lock is only taken for the synchronous `update` step and is never held
/// across the card source await point, so several loads can be in flight at
/// once and the newest query session wins.
pub struct CatalogStore {
    state: Mutex<CatalogState>,
    source: Arc<dyn CardSource>,
}

impl CatalogStore {
    pub fn new(source: Arc<dyn CardSource>, settings: StoreSettings) -> Self {
        Self {
            state: Mutex::new(CatalogState::with_page_size(settings.page_size)),
            source,
        }
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.dispatch(Msg::SetQuery {
            query: query.into(),
        });
    }

    pub fn set_page(&self, page: u32) {
        self.dispatch(Msg::SetPage { page });
    }

    pub fn set_loading(&self, loading: bool) {
        self.dispatch(Msg::SetLoading { loading });
    }

    /// Starts a fresh session for `query` and fetches its first page.
    pub async fn load(&self, query: impl Into<String>) -> Result<LoadOutcome, CatalogError> {
        let request = self.begin(Msg::Load {
            query: query.into(),
        })?;
        self.execute(request).await
    }

    /// Fetches the page after the last merged one and appends unseen cards.
    pub async fn load_next(&self) -> Result<LoadOutcome, CatalogError> {
        let request = self.begin(Msg::LoadNext)?;
        self.execute(request).await
    }

    pub fn cards(&self) -> Vec<Card> {
        catalog_core::cards(&self.lock())
    }

    pub fn loading(&self) -> bool {
        catalog_core::loading(&self.lock())
    }

    pub fn snapshot(&self) -> CatalogState {
        self.lock().clone()
    }

    pub fn view(&self) -> CatalogViewModel {
        self.lock().view()
    }

    pub fn consume_dirty(&self) -> bool {
        self.lock().consume_dirty()
    }

    /// Applies the synchronous half of `Load`/`LoadNext` and returns the
    /// request to send.
    pub(crate) fn begin(&self, msg: Msg) -> Result<SearchRequest, CatalogError> {
        issued(self.dispatch(msg))
    }

    /// Like `begin(Msg::LoadNext)`, but returns `Ok(None)` without touching
    /// the state when a fetch is already running. The loading check and the
    /// transition happen under one lock.
    pub(crate) fn begin_next_if_idle(&self) -> Result<Option<SearchRequest>, CatalogError> {
        let effects = {
            let mut guard = self.lock();
            if guard.loading() {
                return Ok(None);
            }
            apply(&mut guard, Msg::LoadNext)
        };
        issued(effects).map(Some)
    }

    /// Sends `request` to the card source and folds the answer back in.
    pub(crate) async fn execute(
        &self,
        request: SearchRequest,
    ) -> Result<LoadOutcome, CatalogError> {
        let result = self
            .source
            .search(request.query(), request.page, request.page_size)
            .await
            .map(|page| page.cards);

        let effects = self.dispatch(Msg::SearchCompleted { request, result });
        match effects.into_iter().next() {
            Some(Effect::PageApplied {
                request,
                added,
                skipped,
            }) => {
                catalog_info!(
                    "applied page {} for {:?}: {} new, {} duplicate",
                    request.page,
                    request.query(),
                    added,
                    skipped
                );
                Ok(LoadOutcome::Applied {
                    page: request.page,
                    added,
                    skipped,
                })
            }
            Some(Effect::SearchFailed { request, error }) => {
                catalog_warn!(
                    "search for {:?} page {} failed: {}",
                    request.query(),
                    request.page,
                    error
                );
                Err(CatalogError::Network(error))
            }
            Some(Effect::ResponseDiscarded { request }) => {
                catalog_debug!(
                    "discarded stale response for {:?} page {} (generation {})",
                    request.query(),
                    request.page,
                    request.token.generation
                );
                Ok(LoadOutcome::Discarded)
            }
            other => {
                catalog_error!("unexpected effect after search completion: {:?}", other);
                Ok(LoadOutcome::Discarded)
            }
        }
    }

    fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        apply(&mut self.lock(), msg)
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn apply(state: &mut CatalogState, msg: Msg) -> Vec<Effect> {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    effects
}

fn issued(effects: Vec<Effect>) -> Result<SearchRequest, CatalogError> {
    match effects.into_iter().next() {
        Some(Effect::Search(request)) => {
            catalog_info!(
                "search query={:?} page={} page_size={} generation={}",
                request.query(),
                request.page,
                request.page_size,
                request.token.generation
            );
            Ok(request)
        }
        Some(Effect::LoadNextRejected) => {
            catalog_warn!("next page requested before any query was loaded");
            Err(CatalogError::NotLoaded)
        }
        other => {
            catalog_error!("unexpected effect when issuing a search: {:?}", other);
            Err(CatalogError::NotLoaded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Page;
    use catalog_core::FetchError;

    struct EmptySource;

    #[async_trait::async_trait]
    impl CardSource for EmptySource {
        async fn search(
            &self,
            _query: &str,
            _page: u32,
            _page_size: u32,
        ) -> Result<Page, FetchError> {
            Ok(Page::default())
        }
    }

    fn store() -> CatalogStore {
        CatalogStore::new(Arc::new(EmptySource), StoreSettings::default())
    }

    #[test]
    fn next_page_is_refused_while_a_load_is_in_flight() {
        let store = store();
        let load = store
            .begin(Msg::Load {
                query: "q".to_string(),
            })
            .unwrap();

        assert_eq!(store.begin_next_if_idle(), Ok(None));
        let state = store.snapshot();
        assert!(state.loading());
        assert_eq!(state.page(), 1);
        assert!(state.is_current(&load.token));
    }

    #[test]
    fn next_page_is_issued_when_idle() {
        let store = store();
        store.set_query("q");

        let request = store.begin_next_if_idle().unwrap().expect("request");
        assert_eq!(request.page, 2);
        assert!(store.loading());
    }

    #[test]
    fn next_page_without_session_is_rejected_when_idle() {
        assert_eq!(store().begin_next_if_idle(), Err(CatalogError::NotLoaded));
    }
}
