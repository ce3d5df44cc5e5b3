//! Book catalog module.
//!
//! The busiest aggregation consumer: forms join the author and genre lists
//! for their selects, and the detail page joins the book with its copies and
//! its referenced author/genres.

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
use crate::modules::authors::models::Author;
use crate::modules::copies::models::BookInstance;
use crate::modules::genres::models::Genre;
use crate::state::SharedCatalog;
use models::Book;

const LIST_URL: &str = "/catalog/book";

pub struct BooksModule {
    catalog: SharedCatalog,
}

impl BooksModule {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "book"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "book module initialized"
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
/// `genres` carries comma-separated genre ids from the checkbox group.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub isbn: Option<String>,
    pub genres: Option<String>,
}

/// Validate and sanitize a submission into a `Book` plus any field errors.
fn validate(form: &BookForm) -> (Book, FormErrors) {
    let mut errors = FormErrors::new();

    let title = forms::required_text(&mut errors, "title", &form.title, "Title must be specified");
    let author = forms::required_id(
        &mut errors,
        "author",
        &form.author,
        "Author must be specified",
    );
    let summary = forms::required_text(
        &mut errors,
        "summary",
        &form.summary,
        "Summary must be specified",
    );
    let isbn = forms::optional_text(&form.isbn);

    let mut genres = Vec::new();
    if let Some(raw) = form.genres.as_deref() {
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match Uuid::parse_str(token) {
                Ok(id) => genres.push(id),
                Err(_) => errors.push("genres", "Invalid genre"),
            }
        }
    }

    let book = Book::new(
        title,
        author.unwrap_or_else(Uuid::nil),
        summary,
        isbn,
        genres,
    );
    (book, errors)
}

fn as_views<'a, T, I>(items: I, f: impl Fn(&T) -> Value) -> Vec<Value>
where
    I: IntoIterator<Item = &'a T>,
    T: 'a,
{
    items.into_iter().map(|item| f(item)).collect()
}

/// Build the book form view with its reference lists.
fn form_view(
    title: &str,
    book: &Book,
    authors: &[Author],
    genres: &[Genre],
    errors: Option<&FormErrors>,
) -> View {
    let mut view = View::new("book_form", title)
        .with("book", book.as_view())
        .with("selected_author", book.author.to_string())
        .with(
            "selected_genres",
            book.genres.iter().map(Uuid::to_string).collect::<Vec<_>>(),
        )
        .with("author_list", as_views(authors, Author::as_view))
        .with("genre_list", as_views(genres, Genre::as_view));
    if let Some(errors) = errors {
        view = view.with("errors", errors.errors());
    }
    view
}

pub async fn list(State(catalog): State<SharedCatalog>) -> Result<Response, AppError> {
    let mut books = catalog.books.find_many(|_| true).await?;
    books.sort_by(|a, b| a.title.cmp(&b.title));

    let view = View::new("book_list", "Book List")
        .with("book_list", as_views(&books, Book::as_view));
    Ok(view.into_response())
}

pub async fn detail(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (book, book_instances) = tokio::try_join!(
        catalog.books.find_by_id(id),
        catalog.copies.find_many(|c| c.book == id),
    )?;

    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;

    // Second aggregation stage: the referenced author and genres.
    let (author, genres) = tokio::try_join!(
        catalog.authors.find_by_id(book.author),
        catalog.genres.find_many(|g| book.genres.contains(&g.id)),
    )?;

    let view = View::new("book_detail", "Book Detail")
        .with("book", book.as_view())
        .with("author", author.map(|a| a.as_view()))
        .with("genre_list", as_views(&genres, Genre::as_view))
        .with(
            "book_instances",
            as_views(&book_instances, BookInstance::as_view),
        );
    Ok(view.into_response())
}

pub async fn create_form(State(catalog): State<SharedCatalog>) -> Result<Response, AppError> {
    let (authors, genres) = tokio::try_join!(
        catalog.authors.find_many(|_| true),
        catalog.genres.find_many(|_| true),
    )?;

    let view = View::new("book_form", "Create Book")
        .with("author_list", as_views(&authors, Author::as_view))
        .with("genre_list", as_views(&genres, Genre::as_view));
    Ok(view.into_response())
}

pub async fn create(
    State(catalog): State<SharedCatalog>,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    let (book, errors) = validate(&form);

    if !errors.is_empty() {
        // Re-render with the reference lists the form needs.
        let (authors, genres) = tokio::try_join!(
            catalog.authors.find_many(|_| true),
            catalog.genres.find_many(|_| true),
        )?;
        return Ok(
            form_view("Create Book", &book, &authors, &genres, Some(&errors)).into_response(),
        );
    }

    let book = catalog.books.insert(book).await?;
    Ok(Redirect::to(&book.url()).into_response())
}

pub async fn delete_form(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (book, book_instances) = tokio::try_join!(
        catalog.books.find_by_id(id),
        catalog.copies.find_many(|c| c.book == id),
    )?;

    let Some(book) = book else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let view = View::new("book_delete", "Delete Book")
        .with("book", book.as_view())
        .with(
            "book_instances",
            as_views(&book_instances, BookInstance::as_view),
        );
    Ok(view.into_response())
}

pub async fn execute_delete(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (book, book_instances) = tokio::try_join!(
        catalog.books.find_by_id(id),
        catalog.copies.find_many(|c| c.book == id),
    )?;

    let Some(book) = book else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    if !book_instances.is_empty() {
        let view = View::new("book_delete", "Delete Book")
            .with("book", book.as_view())
            .with(
                "book_instances",
                as_views(&book_instances, BookInstance::as_view),
            );
        return Ok(view.into_response());
    }

    catalog.books.delete_by_id(id).await?;
    Ok(Redirect::to(LIST_URL).into_response())
}

pub async fn update_form(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (book, authors, genres) = tokio::try_join!(
        catalog.books.find_by_id(id),
        catalog.authors.find_many(|_| true),
        catalog.genres.find_many(|_| true),
    )?;

    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;

    Ok(form_view("Update Book", &book, &authors, &genres, None).into_response())
}

pub async fn update(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<Uuid>,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    let (mut book, errors) = validate(&form);
    book.id = id;

    if !errors.is_empty() {
        let (authors, genres) = tokio::try_join!(
            catalog.authors.find_many(|_| true),
            catalog.genres.find_many(|_| true),
        )?;
        return Ok(
            form_view("Update Book", &book, &authors, &genres, Some(&errors)).into_response(),
        );
    }

    let book = catalog.books.replace(id, book).await?;
    Ok(Redirect::to(&book.url()).into_response())
}

/// Create a new instance of the book module.
pub fn create_module(catalog: SharedCatalog) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(catalog))
}
