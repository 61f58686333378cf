use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type CardId = String;

/// A catalog card as delivered by the card source.
///
/// Cards are immutable once built. Members of the source record other than
/// `id`, `name` and `imageUrl` are kept verbatim in `extra` and written back
/// unchanged on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    name: String,
    #[serde(rename = "imageUrl", default)]
    image_url: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Card {
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: image_url.into(),
            extra: Map::new(),
        }
    }

    /// Returns a copy of this card carrying an extra opaque field.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Label identifying the card's tile: `{id}-{name}`.
    pub fn alt_text(&self) -> String {
        format!("{}-{}", self.id, self.name)
    }
}
