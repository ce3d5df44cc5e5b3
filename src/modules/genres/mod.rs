//! Genre catalog module.
//!
//! Carries the reference shape of the aggregation + decision flow: every
//! detail/delete handler joins the genre with the books referencing it before
//! deciding what to render, and deletion is refused while dependents exist.

pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use stacks_http::{AppError, View};
use stacks_kernel::{InitCtx, Module};

use crate::forms::{self, FormErrors};
use crate::modules::books::models::Book;
use crate::state::SharedCatalog;
use models::Genre;

const LIST_URL: &str = "/catalog/genre";

pub struct GenresModule {
    catalog: SharedCatalog,
}

impl GenresModule {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for GenresModule {
    fn name(&self) -> &'static str {
        "genre"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "genre module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list))
            .route("/create", get(create_form).post(create))
            .route("/{id}", get(detail))
            .route("/{id}/delete", get(delete_form).post(execute_delete))
            .route("/{id}/update", get(update_form).post(update))
            .with_state(self.catalog.clone())
    }
}

/// Typed create/update form. Unknown fields are rejected at extraction.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenreForm {
    pub name: Option<String>,
}

fn books_view(books: &[Book]) -> Vec<Value> {
    books.iter().map(Book::as_view).collect()
}

pub async fn list(State(catalog): State<SharedCatalog>) -> Result<Response, AppError> {
    let mut genres = catalog.genres.find_many(|_| true).await?;
    genres.sort_by(|a, b| a.name.cmp(&b.name));

    let view = View::new("genre_list", "Genre List").with(
        "genre_list",
        genres.iter().map(Genre::as_view).collect::<Vec<_>>(),
    );
    Ok(view.into_response())
}

pub async fn detail(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (genre, genre_books) = tokio::try_join!(
        catalog.genres.find_by_id(id),
        catalog.books.find_many(|b| b.genres.contains(&id)),
    )?;

    let genre = genre.ok_or_else(|| AppError::not_found("Genre not found"))?;

    let view = View::new("genre_detail", "Genre Detail")
        .with("genre", genre.as_view())
        .with("genre_books", books_view(&genre_books));
    Ok(view.into_response())
}

pub async fn create_form() -> Result<Response, AppError> {
    Ok(View::new("genre_form", "Create Genre").into_response())
}

pub async fn create(
    State(catalog): State<SharedCatalog>,
    Form(form): Form<GenreForm>,
) -> Result<Response, AppError> {
    let mut errors = FormErrors::new();
    let name = forms::required_text(&mut errors, "name", &form.name, "Genre name required");
    let genre = Genre::new(name);

    if !errors.is_empty() {
        let view = View::new("genre_form", "Create Genre")
            .with("genre", genre.as_view())
            .with("errors", errors.errors());
        return Ok(view.into_response());
    }

    // Natural-key check: an existing genre with this name wins and no
    // duplicate is inserted.
    if let Some(existing) = catalog.genres.find_one(|g| g.name == genre.name).await? {
        return Ok(Redirect::to(&existing.url()).into_response());
    }

    let genre = catalog.genres.insert(genre).await?;
    Ok(Redirect::to(&genre.url()).into_response())
}

pub async fn delete_form(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (genre, genre_books) = tokio::try_join!(
        catalog.genres.find_by_id(id),
        catalog.books.find_many(|b| b.genres.contains(&id)),
    )?;

    // Already gone: deleting something missing is not an error to the user.
    let Some(genre) = genre else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let view = View::new("genre_delete", "Delete Genre")
        .with("genre", genre.as_view())
        .with("genre_books", books_view(&genre_books));
    Ok(view.into_response())
}

pub async fn execute_delete(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    // Re-aggregate from the path id; client-submitted state is not trusted.
    let (genre, genre_books) = tokio::try_join!(
        catalog.genres.find_by_id(id),
        catalog.books.find_many(|b| b.genres.contains(&id)),
    )?;

    let Some(genre) = genre else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    if !genre_books.is_empty() {
        // Deletion refused: re-show the confirmation with the blockers.
        let view = View::new("genre_delete", "Delete Genre")
            .with("genre", genre.as_view())
            .with("genre_books", books_view(&genre_books));
        return Ok(view.into_response());
    }

    catalog.genres.delete_by_id(id).await?;
    Ok(Redirect::to(LIST_URL).into_response())
}

pub async fn update_form(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let genre = catalog
        .genres
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Genre not found"))?;

    let view = View::new("genre_form", "Update Genre").with("genre", genre.as_view());
    Ok(view.into_response())
}

pub async fn update(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
    Form(form): Form<GenreForm>,
) -> Result<Response, AppError> {
    let mut errors = FormErrors::new();
    let name = forms::required_text(&mut errors, "name", &form.name, "Genre name required");

    // Keep the target id so an invalid submission can be retried in place.
    let mut genre = Genre::new(name);
    genre.id = id;

    if !errors.is_empty() {
        let view = View::new("genre_form", "Update Genre")
            .with("genre", genre.as_view())
            .with("errors", errors.errors());
        return Ok(view.into_response());
    }

    let genre = catalog.genres.replace(id, genre).await?;
    Ok(Redirect::to(&genre.url()).into_response())
}

/// Create a new instance of the genre module.
pub fn create_module(catalog: SharedCatalog) -> Arc<dyn Module> {
    Arc::new(GenresModule::new(catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::{header::LOCATION, StatusCode};

    use crate::state::Catalog;

    fn shared() -> SharedCatalog {
        Arc::new(Catalog::new())
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn seed_genre(catalog: &Catalog, name: &str) -> Genre {
        catalog
            .genres
            .insert(Genre::new(name.to_string()))
            .await
            .unwrap()
    }

    async fn seed_book_in_genre(catalog: &Catalog, title: &str, genre: Uuid) -> Book {
        catalog
            .books
            .insert(Book::new(
                title.to_string(),
                Uuid::now_v7(),
                "summary".to_string(),
                None,
                vec![genre],
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_with_empty_name_rerenders_form_and_inserts_nothing() {
        let catalog = shared();

        let response = create(
            State(catalog.clone()),
            Form(GenreForm {
                name: Some("   ".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Genre name required"));
        assert!(catalog.genres.find_many(|_| true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_with_duplicate_name_redirects_to_existing_genre() {
        let catalog = shared();
        let existing = seed_genre(&catalog, "Fiction").await;

        let response = create(
            State(catalog.clone()),
            Form(GenreForm {
                name: Some("Fiction".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            existing.url().as_str()
        );
        assert_eq!(catalog.genres.find_many(|_| true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_trims_input_and_redirects_to_the_new_genre() {
        let catalog = shared();

        let response = create(
            State(catalog.clone()),
            Form(GenreForm {
                name: Some("  Horror  ".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let stored = catalog
            .genres
            .find_one(|g| g.name == "Horror")
            .await
            .unwrap()
            .expect("genre stored");
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            stored.url().as_str()
        );
    }

    #[tokio::test]
    async fn detail_shows_genre_with_its_books_and_404s_when_missing() {
        let catalog = shared();
        let genre = seed_genre(&catalog, "Fantasy").await;
        seed_book_in_genre(&catalog, "The Hobbit", genre.id).await;
        seed_book_in_genre(&catalog, "Elantris", genre.id).await;
        seed_book_in_genre(&catalog, "Unrelated", Uuid::now_v7()).await;

        let response = detail(State(catalog.clone()), Path(genre.id)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Fantasy"));
        assert!(body.contains("The Hobbit"));
        assert!(body.contains("Elantris"));
        assert!(!body.contains("Unrelated"));

        let err = detail(State(catalog), Path(Uuid::now_v7())).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_is_refused_while_books_reference_the_genre() {
        let catalog = shared();
        let genre = seed_genre(&catalog, "Fantasy").await;
        seed_book_in_genre(&catalog, "The Hobbit", genre.id).await;
        seed_book_in_genre(&catalog, "Elantris", genre.id).await;

        let response = execute_delete(State(catalog.clone()), Path(genre.id))
            .await
            .unwrap();

        // Refusal is a normal confirmation page listing the blockers.
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("The Hobbit"));
        assert!(body.contains("Elantris"));
        assert!(catalog
            .genres
            .find_by_id(genre.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn delete_of_unreferenced_genre_removes_it_and_redirects_to_list() {
        let catalog = shared();
        let genre = seed_genre(&catalog, "Ephemera").await;

        let response = execute_delete(State(catalog.clone()), Path(genre.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), LIST_URL);
        assert!(catalog
            .genres
            .find_by_id(genre.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_of_missing_genre_redirects_instead_of_erroring() {
        let catalog = shared();

        let get_response = delete_form(State(catalog.clone()), Path(Uuid::now_v7()))
            .await
            .unwrap();
        assert_eq!(get_response.status(), StatusCode::SEE_OTHER);

        let post_response = execute_delete(State(catalog), Path(Uuid::now_v7()))
            .await
            .unwrap();
        assert_eq!(post_response.status(), StatusCode::SEE_OTHER);
        assert_eq!(post_response.headers().get(LOCATION).unwrap(), LIST_URL);
    }

    #[tokio::test]
    async fn update_replaces_the_full_document_and_is_idempotent() {
        let catalog = shared();
        let genre = seed_genre(&catalog, "Sci Fi").await;

        for _ in 0..2 {
            let response = update(
                State(catalog.clone()),
                Path(genre.id),
                Form(GenreForm {
                    name: Some("Science Fiction".to_string()),
                }),
            )
            .await
            .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
        }

        let stored = catalog.genres.find_by_id(genre.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Science Fiction");
        assert_eq!(catalog.genres.find_many(|_| true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_genre_is_a_not_found_error() {
        let catalog = shared();

        let err = update(
            State(catalog),
            Path(Uuid::now_v7()),
            Form(GenreForm {
                name: Some("Anything".to_string()),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn invalid_update_preserves_the_target_id_in_the_form() {
        let catalog = shared();
        let genre = seed_genre(&catalog, "Poetry").await;

        let response = update(
            State(catalog.clone()),
            Path(genre.id),
            Form(GenreForm { name: None }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(&genre.url()));
        // Stored document untouched on the invalid path.
        let stored = catalog.genres.find_by_id(genre.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Poetry");
    }
}
