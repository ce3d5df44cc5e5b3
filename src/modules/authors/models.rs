use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use stacks_store::Document;

/// An author document.
///
/// Display attributes (name, lifespan, URL) are computed from the instance at
/// read time, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default = "Uuid::nil")]
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    pub fn new(
        first_name: String,
        family_name: String,
        date_of_birth: Option<NaiveDate>,
        date_of_death: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            first_name,
            family_name,
            date_of_birth,
            date_of_death,
        }
    }

    /// Display name, "family, first".
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn year_of_birth(&self) -> Option<i32> {
        self.date_of_birth.map(|d| d.year())
    }

    pub fn year_of_death(&self) -> Option<i32> {
        self.date_of_death.map(|d| d.year())
    }

    /// "YYYY - YYYY", with blanks for unknown years.
    pub fn lifespan(&self) -> String {
        let year = |y: Option<i32>| y.map(|y| y.to_string()).unwrap_or_default();
        format!(
            "{} - {}",
            year(self.year_of_birth()),
            year(self.year_of_death())
        )
    }

    /// Canonical URL for this author.
    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    /// Context-bag representation for views.
    pub fn as_view(&self) -> serde_json::Value {
        json!({
            "name": self.name(),
            "first_name": self.first_name,
            "family_name": self.family_name,
            "date_of_birth": self.date_of_birth,
            "date_of_death": self.date_of_death,
            "lifespan": self.lifespan(),
            "url": self.url(),
        })
    }
}

impl Document for Author {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}
