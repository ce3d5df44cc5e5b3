//! Route-level tests over the fully assembled application router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use stacks_app::modules;
use stacks_app::state::Catalog;
use stacks_kernel::settings::Settings;
use stacks_kernel::ModuleRegistry;

fn app() -> (axum::Router, Arc<Catalog>) {
    let catalog = Arc::new(Catalog::new());
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, catalog.clone());

    let settings = Settings::default();
    (stacks_http::build_router(&registry, &settings), catalog)
}

fn form_post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_check_responds() {
    let (router, _) = app();

    let response = router
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn every_module_serves_its_list_route() {
    let (router, _) = app();

    for path in [
        "/catalog/author",
        "/catalog/genre",
        "/catalog/book",
        "/catalog/bookinstance",
    ] {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "list route {path}");
    }
}

#[tokio::test]
async fn genre_create_round_trips_through_the_router() {
    let (router, catalog) = app();

    let response = router
        .clone()
        .oneshot(form_post("/catalog/genre/create", "name=Fiction"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let stored = catalog
        .genres
        .find_one(|g| g.name == "Fiction")
        .await
        .unwrap()
        .expect("genre stored");
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        stored.url().as_str()
    );
}

#[tokio::test]
async fn unknown_form_fields_are_rejected_before_any_mutation() {
    let (router, catalog) = app();

    let response = router
        .oneshot(form_post(
            "/catalog/genre/create",
            "name=Fiction&surprise=1",
        ))
        .await
        .unwrap();

    assert!(
        response.status().is_client_error(),
        "got {}",
        response.status()
    );
    assert!(catalog.genres.find_many(|_| true).await.unwrap().is_empty());
}

#[tokio::test]
async fn detail_of_unknown_genre_is_a_404_page() {
    let (router, _) = app();

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/catalog/genre/{}", Uuid::now_v7()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
