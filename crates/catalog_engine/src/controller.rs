use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use catalog_core::Msg;
use catalog_logging::catalog_debug;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::{CatalogError, CatalogStore, Debouncer, LoadOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Quiet period after the last keystroke before a search goes out.
    pub debounce: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
        }
    }
}

/// What caused a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Input,
    Submit,
    NextPage,
}

/// Result of a search started by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEvent {
    pub trigger: Trigger,
    pub query: String,
    pub result: Result<LoadOutcome, CatalogError>,
}

/// Binds input-box edits, the search button and next-page requests to a
/// [`CatalogStore`].
pub struct SearchController {
    store: Arc<CatalogStore>,
    settings: ControllerSettings,
    runtime: Handle,
    debouncer: Debouncer,
    input: Mutex<String>,
    paging: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<SearchEvent>,
}

impl SearchController {
    pub fn new(
        store: Arc<CatalogStore>,
        settings: ControllerSettings,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (events, event_rx) = mpsc::unbounded_channel();
        let controller = Self {
            store,
            settings,
            debouncer: Debouncer::new(runtime.clone()),
            runtime,
            input: Mutex::new(String::new()),
            paging: Arc::new(AtomicBool::new(false)),
            events,
        };
        (controller, event_rx)
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    /// Current content of the input box.
    pub fn input(&self) -> String {
        self.input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records the new input text and (re)arms the debounced search.
    pub fn input_changed(&self, text: impl Into<String>) {
        let text = text.into();
        *self.input.lock().unwrap_or_else(PoisonError::into_inner) = text.clone();

        let store = self.store.clone();
        let runtime = self.runtime.clone();
        let events = self.events.clone();
        self.debouncer.schedule(
            move || dispatch_load(&runtime, store, events, text, Trigger::Input),
            self.settings.debounce,
        );
    }

    /// Searches for the current input right away. Every click dispatches.
    pub fn button_clicked(&self) {
        dispatch_load(
            &self.runtime,
            self.store.clone(),
            self.events.clone(),
            self.input(),
            Trigger::Submit,
        );
    }

    /// Requests the next page unless a fetch is already running.
    ///
    /// Returns whether a request was issued.
    pub fn request_next_page(&self) -> bool {
        if self.paging.swap(true, Ordering::AcqRel) {
            catalog_debug!("next page skipped: previous request in flight");
            return false;
        }

        let request = match self.store.begin_next_if_idle() {
            Ok(Some(request)) => request,
            Ok(None) => {
                self.paging.store(false, Ordering::Release);
                catalog_debug!("next page skipped: catalog is loading");
                return false;
            }
            Err(err) => {
                self.paging.store(false, Ordering::Release);
                let _ = self.events.send(SearchEvent {
                    trigger: Trigger::NextPage,
                    query: self.store.snapshot().query().to_string(),
                    result: Err(err),
                });
                return false;
            }
        };

        let store = self.store.clone();
        let events = self.events.clone();
        let paging = self.paging.clone();
        self.runtime.spawn(async move {
            let query = request.query().to_string();
            let result = store.execute(request).await;
            paging.store(false, Ordering::Release);
            report(&events, Trigger::NextPage, query, result);
        });
        true
    }

    /// Drops a debounced search that has not fired yet.
    pub fn cancel_pending(&self) {
        self.debouncer.cancel();
    }

    pub fn has_pending_input(&self) -> bool {
        self.debouncer.is_pending()
    }
}

/// Opens the session synchronously so dispatch order decides which load wins,
/// then awaits the card source on the runtime.
fn dispatch_load(
    runtime: &Handle,
    store: Arc<CatalogStore>,
    events: mpsc::UnboundedSender<SearchEvent>,
    query: String,
    trigger: Trigger,
) {
    let request = match store.begin(Msg::Load {
        query: query.clone(),
    }) {
        Ok(request) => request,
        Err(err) => {
            report(&events, trigger, query, Err(err));
            return;
        }
    };
    runtime.spawn(async move {
        let result = store.execute(request).await;
        report(&events, trigger, query, result);
    });
}

fn report(
    events: &mpsc::UnboundedSender<SearchEvent>,
    trigger: Trigger,
    query: String,
    result: Result<LoadOutcome, CatalogError>,
) {
    if let Err(err) = &result {
        catalog_debug!("{:?} search for {:?} reported failure: {}", trigger, query, err);
    }
    let _ = events.send(SearchEvent {
        trigger,
        query,
        result,
    });
}
