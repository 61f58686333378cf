use catalog_core::{CardTile, CatalogViewModel};
use catalog_engine::SearchEvent;

pub const EMPTY_RESULT_MESSAGE: &str = "Oops... nothing found.";
pub const LOADING_MESSAGE: &str = "Loading...";

pub fn render(view: &CatalogViewModel) -> Vec<String> {
    let query_label = if view.query.is_empty() {
        "<all>".to_string()
    } else {
        format!("{:?}", view.query)
    };
    let mut lines = vec![format!(
        "Query: {} | Page: {} | Cards: {}{}",
        query_label,
        view.page,
        view.tiles.len(),
        if view.loading { " | loading" } else { "" }
    )];

    if view.is_empty {
        lines.push(if view.loading {
            LOADING_MESSAGE.to_string()
        } else {
            EMPTY_RESULT_MESSAGE.to_string()
        });
        return lines;
    }

    lines.extend(view.tiles.iter().map(render_tile));
    if view.loading {
        lines.push(LOADING_MESSAGE.to_string());
    }
    lines
}

fn render_tile(tile: &CardTile) -> String {
    if tile.image_url.is_empty() {
        format!("  {}", tile.alt_text)
    } else {
        format!("  {}  {}", tile.alt_text, tile.image_url)
    }
}

/// Error affordance for failed searches; successful ones render through the view.
pub fn render_event(event: &SearchEvent) -> Option<String> {
    match &event.result {
        Ok(_) => None,
        Err(err) => Some(format!("Search for {:?} failed: {}", event.query, err)),
    }
}
