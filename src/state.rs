//! Shared catalog state: the aggregate of typed entity collections handed to
//! every module.

use std::sync::Arc;

use chrono::NaiveDate;

use stacks_store::Collection;

use crate::modules::authors::models::Author;
use crate::modules::books::models::Book;
use crate::modules::copies::models::{BookInstance, Status};
use crate::modules::genres::models::Genre;

/// Aggregate of the four entity collections.
pub struct Catalog {
    pub authors: Collection<Author>,
    pub genres: Collection<Genre>,
    pub books: Collection<Book>,
    pub copies: Collection<BookInstance>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            authors: Collection::new("author"),
            genres: Collection::new("genre"),
            books: Collection::new("book"),
            copies: Collection::new("bookinstance"),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedCatalog = Arc<Catalog>;

/// Seed the store with a small demo data set for local runs.
pub async fn seed(catalog: &Catalog) -> anyhow::Result<()> {
    let fantasy = catalog.genres.insert(Genre::new("Fantasy".to_string())).await?;
    let scifi = catalog
        .genres
        .insert(Genre::new("Science Fiction".to_string()))
        .await?;

    let rothfuss = catalog
        .authors
        .insert(Author::new(
            "Patrick".to_string(),
            "Rothfuss".to_string(),
            NaiveDate::from_ymd_opt(1973, 6, 6),
            None,
        ))
        .await?;
    let asimov = catalog
        .authors
        .insert(Author::new(
            "Isaac".to_string(),
            "Asimov".to_string(),
            NaiveDate::from_ymd_opt(1920, 1, 2),
            NaiveDate::from_ymd_opt(1992, 4, 6),
        ))
        .await?;

    let name_of_the_wind = catalog
        .books
        .insert(Book::new(
            "The Name of the Wind".to_string(),
            rothfuss.id,
            "The tale of Kvothe, from his childhood in a troupe of traveling players to \
             years spent as a near-feral orphan."
                .to_string(),
            Some("9781473211896".to_string()),
            vec![fantasy.id],
        ))
        .await?;
    catalog
        .books
        .insert(Book::new(
            "Foundation".to_string(),
            asimov.id,
            "The story of our future begins with the history of Foundation and its \
             psychohistorians."
                .to_string(),
            Some("9780553293357".to_string()),
            vec![scifi.id],
        ))
        .await?;

    catalog
        .copies
        .insert(BookInstance::new(
            name_of_the_wind.id,
            "Gollancz, 2007".to_string(),
            Status::Available,
            None,
        ))
        .await?;
    catalog
        .copies
        .insert(BookInstance::new(
            name_of_the_wind.id,
            "Gollancz, 2007".to_string(),
            Status::Loaned,
            NaiveDate::from_ymd_opt(2026, 9, 15),
        ))
        .await?;

    tracing::info!("catalog seeded with demo records");
    Ok(())
}
