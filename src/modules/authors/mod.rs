//! Author catalog module.

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
use models::Author;

const LIST_URL: &str = "/catalog/author";

pub struct AuthorsModule {
    catalog: SharedCatalog,
}

impl AuthorsModule {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "author"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "author module initialized"
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
pub struct AuthorForm {
    pub first_name: Option<String>,
    pub family_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
}

/// Validate and sanitize a submission into an `Author` plus any field errors.
fn validate(form: &AuthorForm) -> (Author, FormErrors) {
    let mut errors = FormErrors::new();

    let first_name = forms::required_text(
        &mut errors,
        "first_name",
        &form.first_name,
        "First name must be specified",
    );
    let family_name = forms::required_text(
        &mut errors,
        "family_name",
        &form.family_name,
        "Family name must be specified",
    );
    let date_of_birth = forms::optional_date(&mut errors, "date_of_birth", &form.date_of_birth);
    let date_of_death = forms::optional_date(&mut errors, "date_of_death", &form.date_of_death);

    let author = Author::new(first_name, family_name, date_of_birth, date_of_death);
    (author, errors)
}

fn books_view(books: &[Book]) -> Vec<Value> {
    books.iter().map(Book::as_view).collect()
}

pub async fn list(State(catalog): State<SharedCatalog>) -> Result<Response, AppError> {
    let mut authors = catalog.authors.find_many(|_| true).await?;
    authors.sort_by(|a, b| a.family_name.cmp(&b.family_name));

    let view = View::new("author_list", "Author List").with(
        "author_list",
        authors.iter().map(Author::as_view).collect::<Vec<_>>(),
    );
    Ok(view.into_response())
}

pub async fn detail(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (author, author_books) = tokio::try_join!(
        catalog.authors.find_by_id(id),
        catalog.books.find_many(|b| b.author == id),
    )?;

    let author = author.ok_or_else(|| AppError::not_found("Author not found"))?;

    let view = View::new("author_detail", "Author Detail")
        .with("author", author.as_view())
        .with("author_books", books_view(&author_books));
    Ok(view.into_response())
}

pub async fn create_form() -> Result<Response, AppError> {
    Ok(View::new("author_form", "Create Author").into_response())
}

pub async fn create(
    State(catalog): State<SharedCatalog>,
    Form(form): Form<AuthorForm>,
) -> Result<Response, AppError> {
    let (author, errors) = validate(&form);

    if !errors.is_empty() {
        let view = View::new("author_form", "Create Author")
            .with("author", author.as_view())
            .with("errors", errors.errors());
        return Ok(view.into_response());
    }

    let author = catalog.authors.insert(author).await?;
    Ok(Redirect::to(&author.url()).into_response())
}

pub async fn delete_form(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (author, author_books) = tokio::try_join!(
        catalog.authors.find_by_id(id),
        catalog.books.find_many(|b| b.author == id),
    )?;

    let Some(author) = author else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let view = View::new("author_delete", "Delete Author")
        .with("author", author.as_view())
        .with("author_books", books_view(&author_books));
    Ok(view.into_response())
}

pub async fn execute_delete(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (author, author_books) = tokio::try_join!(
        catalog.authors.find_by_id(id),
        catalog.books.find_many(|b| b.author == id),
    )?;

    let Some(author) = author else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    if !author_books.is_empty() {
        let view = View::new("author_delete", "Delete Author")
            .with("author", author.as_view())
            .with("author_books", books_view(&author_books));
        return Ok(view.into_response());
    }

    catalog.authors.delete_by_id(id).await?;
    Ok(Redirect::to(LIST_URL).into_response())
}

pub async fn update_form(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let author = catalog
        .authors
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Author not found"))?;

    let view = View::new("author_form", "Update Author").with("author", author.as_view());
    Ok(view.into_response())
}

pub async fn update(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
    Form(form): Form<AuthorForm>,
) -> Result<Response, AppError> {
    let (mut author, errors) = validate(&form);
    author.id = id;

    if !errors.is_empty() {
        let view = View::new("author_form", "Update Author")
            .with("author", author.as_view())
            .with("errors", errors.errors());
        return Ok(view.into_response());
    }

    let author = catalog.authors.replace(id, author).await?;
    Ok(Redirect::to(&author.url()).into_response())
}

/// Create a new instance of the author module.
pub fn create_module(catalog: SharedCatalog) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(catalog))
}
