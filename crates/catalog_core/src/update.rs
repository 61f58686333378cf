use crate::{CatalogState, Effect, Msg, SearchKind, SearchRequest, FIRST_PAGE};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: CatalogState, msg: Msg) -> (CatalogState, Vec<Effect>) {
    let effects = match msg {
        Msg::SetQuery { query } => {
            state.start_session(query);
            Vec::new()
        }
        Msg::SetPage { page } => {
            state.set_page(page);
            Vec::new()
        }
        Msg::SetLoading { loading } => {
            state.set_loading(loading);
            Vec::new()
        }
        Msg::Load { query } => {
            // Cards and page stay until the first page arrives, so a failed
            // load leaves them as they were.
            state.renew_session(query);
            state.set_loading(true);
            vec![Effect::Search(search_request(
                &state,
                FIRST_PAGE,
                SearchKind::Replace,
            ))]
        }
        Msg::LoadNext => {
            if !state.has_session() {
                return (state, vec![Effect::LoadNextRejected]);
            }
            state.set_loading(true);
            let next_page = state.page().saturating_add(1);
            vec![Effect::Search(search_request(
                &state,
                next_page,
                SearchKind::Append,
            ))]
        }
        Msg::SearchCompleted { request, result } => {
            // Responses from a superseded session must not touch anything,
            // including the loading flag owned by the newer request.
            if !state.is_current(&request.token) {
                return (state, vec![Effect::ResponseDiscarded { request }]);
            }
            state.set_loading(false);
            match result {
                Ok(cards) => {
                    let (added, skipped) = match request.kind {
                        SearchKind::Replace => state.replace_cards(cards),
                        SearchKind::Append => state.merge_cards(cards),
                    };
                    state.set_page(request.page);
                    vec![Effect::PageApplied {
                        request,
                        added,
                        skipped,
                    }]
                }
                Err(error) => vec![Effect::SearchFailed { request, error }],
            }
        }
    };

    (state, effects)
}

fn search_request(state: &CatalogState, page: u32, kind: SearchKind) -> SearchRequest {
    SearchRequest {
        token: state.token(),
        page,
        page_size: state.page_size(),
        kind,
    }
}
