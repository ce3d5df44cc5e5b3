use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use stacks_store::Document;

/// A book document. Copies of a book on the shelves are separate
/// `BookInstance` documents referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default = "Uuid::nil")]
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: Option<String>,
    #[serde(default)]
    pub genres: Vec<Uuid>,
}

impl Book {
    pub fn new(
        title: String,
        author: Uuid,
        summary: String,
        isbn: Option<String>,
        genres: Vec<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            title,
            author,
            summary,
            isbn,
            genres,
        }
    }

    /// Canonical URL for this book.
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }

    /// Context-bag representation for views.
    pub fn as_view(&self) -> serde_json::Value {
        json!({
            "title": self.title,
            "summary": self.summary,
            "isbn": self.isbn,
            "url": self.url(),
        })
    }
}

impl Document for Book {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}
