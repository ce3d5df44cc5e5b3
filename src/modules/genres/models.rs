use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use stacks_store::Document;

/// A genre document. The name is the natural key: uniqueness is enforced by
/// the create flow's duplicate check, not by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default = "Uuid::nil")]
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::nil(),
            name,
        }
    }

    /// Canonical URL for this genre.
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }

    /// Context-bag representation for views.
    pub fn as_view(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "url": self.url(),
        })
    }
}

impl Document for Genre {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}
