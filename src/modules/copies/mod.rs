//! BookInstance (copy) catalog module.

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
use models::{BookInstance, Status};

const LIST_URL: &str = "/catalog/bookinstance";

pub struct CopiesModule {
    catalog: SharedCatalog,
}

impl CopiesModule {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for CopiesModule {
    fn name(&self) -> &'static str {
        "bookinstance"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "bookinstance module initialized"
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
pub struct CopyForm {
    pub book: Option<String>,
    pub imprint: Option<String>,
    pub status: Option<String>,
    pub due_back: Option<String>,
}

/// Validate and sanitize a submission into a `BookInstance` plus any field
/// errors.
///
/// An empty status takes the schema default; a present but unknown status is
/// rejected rather than stored. An absent due-back date stays absent so the
/// per-insert default applies.
fn validate(form: &CopyForm) -> (BookInstance, FormErrors) {
    let mut errors = FormErrors::new();

    let book = forms::required_id(&mut errors, "book", &form.book, "Book must be specified");
    let imprint = forms::required_text(
        &mut errors,
        "imprint",
        &form.imprint,
        "Imprint must be specified",
    );

    let status_raw = forms::sanitize_text(&form.status);
    let status = if status_raw.is_empty() {
        Status::default()
    } else {
        match Status::parse(&status_raw) {
            Some(status) => status,
            None => {
                errors.push("status", "Invalid status");
                Status::default()
            }
        }
    };

    let due_back = forms::optional_date(&mut errors, "due_back", &form.due_back);

    let copy = BookInstance::new(book.unwrap_or_else(Uuid::nil), imprint, status, due_back);
    (copy, errors)
}

/// Copy view with its referenced book joined in for display.
fn populated_view(copy: &BookInstance, books: &[Book]) -> Value {
    let mut view = copy.as_view();
    if let Some(book) = books.iter().find(|b| b.id == copy.book) {
        view["book"] = book.as_view();
    }
    view
}

fn books_view(books: &[Book]) -> Vec<Value> {
    books.iter().map(Book::as_view).collect()
}

/// Build the copy form view with the book list for its select.
fn form_view(
    title: &str,
    copy: &BookInstance,
    books: &[Book],
    errors: Option<&FormErrors>,
) -> View {
    let mut view = View::new("bookinstance_form", title)
        .with("bookinstance", copy.as_view())
        .with("selected_book", copy.book.to_string())
        .with("selected_status", copy.status.as_str())
        .with("book_list", books_view(books));
    if let Some(errors) = errors {
        view = view.with("errors", errors.errors());
    }
    view
}

pub async fn list(State(catalog): State<SharedCatalog>) -> Result<Response, AppError> {
    let (copies, books) = tokio::try_join!(
        catalog.copies.find_many(|_| true),
        catalog.books.find_many(|_| true),
    )?;

    let items: Vec<Value> = copies.iter().map(|c| populated_view(c, &books)).collect();

    let view = View::new("bookinstance_list", "Book Instance List").with("bookinstance_list", items);
    Ok(view.into_response())
}

pub async fn detail(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let copy = catalog
        .copies
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Book copy not found"))?;

    let book = catalog.books.find_by_id(copy.book).await?;

    let view = View::new("bookinstance_detail", "Book")
        .with("bookinstance", copy.as_view())
        .with("book", book.map(|b| b.as_view()));
    Ok(view.into_response())
}

pub async fn create_form(State(catalog): State<SharedCatalog>) -> Result<Response, AppError> {
    let books = catalog.books.find_many(|_| true).await?;

    let view = View::new("bookinstance_form", "Create BookInstance")
        .with("book_list", books_view(&books));
    Ok(view.into_response())
}

pub async fn create(
    State(catalog): State<SharedCatalog>,
    Form(form): Form<CopyForm>,
) -> Result<Response, AppError> {
    let (copy, errors) = validate(&form);

    if !errors.is_empty() {
        let books = catalog.books.find_many(|_| true).await?;
        return Ok(
            form_view("Create BookInstance", &copy, &books, Some(&errors)).into_response(),
        );
    }

    let copy = catalog.copies.insert(copy).await?;
    Ok(Redirect::to(&copy.url()).into_response())
}

pub async fn delete_form(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(copy) = catalog.copies.find_by_id(id).await? else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let book = catalog.books.find_by_id(copy.book).await?;

    let view = View::new("bookinstance_delete", "Delete Book Instance")
        .with("bookinstance", copy.as_view())
        .with("book", book.map(|b| b.as_view()));
    Ok(view.into_response())
}

pub async fn execute_delete(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    // Re-check from the path id; a copy has no dependents, so resolving is
    // the only gate.
    let Some(_copy) = catalog.copies.find_by_id(id).await? else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    catalog.copies.delete_by_id(id).await?;
    Ok(Redirect::to(LIST_URL).into_response())
}

pub async fn update_form(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (copy, books) = tokio::try_join!(
        catalog.copies.find_by_id(id),
        catalog.books.find_many(|_| true),
    )?;

    let copy = copy.ok_or_else(|| AppError::not_found("Copy not found"))?;

    Ok(form_view("Update Copy", &copy, &books, None).into_response())
}

pub async fn update(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
    Form(form): Form<CopyForm>,
) -> Result<Response, AppError> {
    let (mut copy, errors) = validate(&form);
    copy.id = id;

    if !errors.is_empty() {
        let books = catalog.books.find_many(|_| true).await?;
        return Ok(form_view("Update Copy", &copy, &books, Some(&errors)).into_response());
    }

    let copy = catalog.copies.replace(id, copy).await?;
    Ok(Redirect::to(&copy.url()).into_response())
}

/// Create a new instance of the bookinstance module.
pub fn create_module(catalog: SharedCatalog) -> Arc<dyn Module> {
    Arc::new(CopiesModule::new(catalog))
}
