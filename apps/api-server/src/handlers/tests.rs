use std::sync::Arc;

use actix_web::{App, http::StatusCode, http::header, test, web};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use blogicum_core::domain::{Category, User};
use blogicum_core::listing::DEFAULT_PAGE_SIZE;
use blogicum_core::ports::{BaseRepository, TokenService};
use blogicum_infra::{InMemoryStore, JwtConfig, JwtTokenService};

use super::{configure_routes, post_detail_path};
use crate::middleware::auth::STAFF_ROLE;
use crate::state::AppState;

struct Fixture {
    store: Arc<InMemoryStore>,
    state: AppState,
    tokens: Arc<dyn TokenService>,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            state: AppState::with_repositories(store.repositories(), DEFAULT_PAGE_SIZE, None),
            tokens: Arc::new(JwtTokenService::new(JwtConfig::default())),
            store,
        }
    }

    /// Seed a user and return a bearer header value for them.
    async fn login(&self, username: &str, is_staff: bool) -> (User, String) {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "not-a-hash".to_string(),
            is_staff,
            created_at: now,
            updated_at: now,
        };
        let user = self.store.save(user).await.unwrap();

        let mut roles = vec!["user".to_string()];
        if is_staff {
            roles.push(STAFF_ROLE.to_string());
        }
        let token = self
            .tokens
            .generate_token(user.id, &user.username, roles)
            .unwrap();
        (user, format!("Bearer {token}"))
    }

    async fn category(&self, slug: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            title: slug.to_string(),
            description: String::new(),
            slug: slug.to_string(),
            is_published: true,
            created_at: Utc::now(),
        };
        self.store.save(category).await.unwrap()
    }
}

macro_rules! app {
    ($fx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($fx.state.clone()))
                .app_data(web::Data::new($fx.tokens.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn post_body(title: &str, category: &Category) -> Value {
    json!({
        "title": title,
        "text": "Body",
        "pub_date": null,
        "category_id": category.id,
        "location_id": null,
    })
}

#[actix_web::test]
async fn test_anonymous_index_of_empty_blog_has_one_page() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/posts?page=banana")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["posts"], json!([]));
    assert_eq!(body["page_obj"]["number"], 1);
    assert_eq!(body["page_obj"]["num_pages"], 1);
}

#[actix_web::test]
async fn test_unknown_and_malformed_post_ids_are_not_found() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri(&post_detail_path(Uuid::new_v4()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/posts/not-a-uuid")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_anonymous_cannot_create_post() {
    let fx = Fixture::new();
    let app = app!(fx);
    let travel = fx.category("travel").await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_body("Hello", &travel))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_created_post_is_listed_and_readable_by_anyone() {
    let fx = Fixture::new();
    let app = app!(fx);
    let (_, bearer) = fx.login("alice", false).await;
    let travel = fx.category("travel").await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, bearer))
        .set_json(post_body("Hello", &travel))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["author"], "alice");
    assert_eq!(created["comment_count"], 0);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing["page_obj"]["total"], 1);
    assert_eq!(listing["posts"][0]["id"], created["id"]);

    let id = created["id"].as_str().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{id}"))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["post"]["title"], "Hello");
    assert_eq!(detail["comments"], json!([]));
}

#[actix_web::test]
async fn test_non_author_is_redirected_to_post_page() {
    let fx = Fixture::new();
    let app = app!(fx);
    let (_, alice) = fx.login("alice", false).await;
    let (_, bob) = fx.login("bob", false).await;
    let travel = fx.category("travel").await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(post_body("Hello", &travel))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{post_id}/comments"))
        .insert_header((header::AUTHORIZATION, bob))
        .set_json(json!({ "text": "First!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Value = test::read_body_json(resp).await;
    assert_eq!(comment["author"], "bob");
    let comment_id = comment["id"].as_str().unwrap();

    // The post author does not own the comment.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}/comments/{comment_id}"))
        .insert_header((header::AUTHORIZATION, alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        format!("/api/posts/{post_id}").as_str()
    );

    // Anonymous edits are bounced the same way.
    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}"))
        .set_json(post_body("Hijacked", &travel))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);
}

#[actix_web::test]
async fn test_catalog_writes_require_staff() {
    let fx = Fixture::new();
    let app = app!(fx);
    let (_, reader) = fx.login("reader", false).await;
    let (_, admin) = fx.login("admin", true).await;
    let category = json!({ "title": "Travel", "slug": "travel" });

    let req = test::TestRequest::post()
        .uri("/api/admin/categories")
        .insert_header((header::AUTHORIZATION, reader))
        .set_json(&category)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/admin/categories")
        .insert_header((header::AUTHORIZATION, admin.clone()))
        .set_json(&category)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/api/categories/travel").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["category"]["slug"], "travel");
    assert_eq!(body["page_obj"]["total"], 0);

    let req = test::TestRequest::put()
        .uri("/api/admin/categories/travel/publication")
        .insert_header((header::AUTHORIZATION, admin))
        .set_json(json!({ "is_published": false }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/categories/travel").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "long-enough-secret",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "carol", "password": "wrong-password" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "carol", "password": "long-enough-secret" }))
        .to_request();
    let auth: Value = test::call_and_read_body_json(&app, req).await;
    let token = auth["access_token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["username"], "carol");
    assert!(me.get("email").is_none());
}

#[actix_web::test]
async fn test_comment_author_is_current_username_after_rename() {
    let fx = Fixture::new();
    let app = app!(fx);
    let (_, bob) = fx.login("bob", false).await;
    let travel = fx.category("travel").await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, bob.clone()))
        .set_json(post_body("Hello", &travel))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri("/api/profile")
        .insert_header((header::AUTHORIZATION, bob.clone()))
        .set_json(json!({ "username": "robert", "email": "robert@example.com" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // The token still carries the old username.
    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{post_id}/comments"))
        .insert_header((header::AUTHORIZATION, bob.clone()))
        .set_json(json!({ "text": "Renamed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Value = test::read_body_json(resp).await;
    assert_eq!(comment["author"], "robert");
    let comment_id = comment["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}/comments/{comment_id}"))
        .insert_header((header::AUTHORIZATION, bob))
        .set_json(json!({ "text": "Renamed, edited" }))
        .to_request();
    let edited: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(edited["author"], "robert");
    assert_eq!(edited["text"], "Renamed, edited");
}
