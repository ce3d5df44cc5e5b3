use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use stacks_store::Document;

/// Loan status of a copy.
///
/// The canonical spelling is `Loaned`; `Loanded` survives only as a serde
/// alias so documents written by the predecessor system still deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Status {
    Available,
    #[default]
    Maintenance,
    #[serde(alias = "Loanded")]
    Loaned,
    Reserved,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Available,
        Status::Maintenance,
        Status::Loaned,
        Status::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Maintenance => "Maintenance",
            Status::Loaned => "Loaned",
            Status::Reserved => "Reserved",
        }
    }

    /// Parse a form value. Accepts the legacy "Loanded" spelling.
    pub fn parse(raw: &str) -> Option<Status> {
        match raw {
            "Available" => Some(Status::Available),
            "Maintenance" => Some(Status::Maintenance),
            "Loaned" | "Loanded" => Some(Status::Loaned),
            "Reserved" => Some(Status::Reserved),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default due-back date, evaluated per insert rather than once at load time.
pub fn default_due_back() -> NaiveDate {
    Utc::now().date_naive()
}

/// A physical copy of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInstance {
    #[serde(default = "Uuid::nil")]
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    #[serde(default)]
    pub status: Status,
    pub due_back: NaiveDate,
}

impl BookInstance {
    /// Build a copy from validated form data. A missing due-back date takes
    /// the per-insert default.
    pub fn new(book: Uuid, imprint: String, status: Status, due_back: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::nil(),
            book,
            imprint,
            status,
            due_back: due_back.unwrap_or_else(default_due_back),
        }
    }

    /// Canonical URL for this copy.
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    /// Context-bag representation for views.
    pub fn as_view(&self) -> serde_json::Value {
        json!({
            "imprint": self.imprint,
            "status": self.status.as_str(),
            "due_back": self.due_back,
            "url": self.url(),
        })
    }
}

impl Document for BookInstance {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_maintenance() {
        assert_eq!(Status::default(), Status::Maintenance);
    }

    #[test]
    fn status_parse_accepts_legacy_spelling_and_rejects_garbage() {
        assert_eq!(Status::parse("Loaned"), Some(Status::Loaned));
        assert_eq!(Status::parse("Loanded"), Some(Status::Loaned));
        assert_eq!(Status::parse("Available"), Some(Status::Available));
        assert_eq!(Status::parse("available"), None);
        assert_eq!(Status::parse("Lost"), None);
    }

    #[test]
    fn legacy_status_spelling_deserializes() {
        let status: Status = serde_json::from_str("\"Loanded\"").unwrap();
        assert_eq!(status, Status::Loaned);
        // The alias is never produced on the way out.
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Loaned\"");
    }

    #[test]
    fn missing_due_back_takes_the_per_insert_default() {
        let earliest = default_due_back();
        let copy = BookInstance::new(
            Uuid::now_v7(),
            "Gollancz, 2007".to_string(),
            Status::default(),
            None,
        );
        let latest = default_due_back();

        assert_eq!(copy.status, Status::Maintenance);
        assert!(copy.due_back >= earliest && copy.due_back <= latest);
    }
}
