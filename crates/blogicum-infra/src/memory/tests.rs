use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::{
    Category, Comment, NewCategory, NewLocation, Post, PostDraft, User, Viewer,
};
use blogicum_core::ports::{BaseRepository, CommentRepository, FixedClock, PostRepository};
use blogicum_core::service::{BlogService, CatalogService};

use super::InMemoryStore;

struct Fixture {
    store: Arc<InMemoryStore>,
    blog: BlogService,
    catalog: CatalogService,
    now: DateTime<Utc>,
}

impl Fixture {
    fn new(page_size: u64) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let now = Utc::now();
        let clock = Arc::new(FixedClock(now));
        Self {
            blog: BlogService::new(store.repositories(), clock.clone(), page_size),
            catalog: CatalogService::new(store.repositories(), clock),
            store,
            now,
        }
    }

    async fn user(&self, username: &str) -> User {
        let now = self.now;
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "not-a-hash".to_string(),
            is_staff: false,
            created_at: now,
            updated_at: now,
        };
        self.store.save(user).await.unwrap()
    }

    async fn category(&self, slug: &str, is_published: bool) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            title: slug.to_string(),
            description: String::new(),
            slug: slug.to_string(),
            is_published,
            created_at: self.now,
        };
        self.store.save(category).await.unwrap()
    }

    async fn post(
        &self,
        author: &User,
        category: Option<&Category>,
        age: Duration,
        is_published: bool,
    ) -> Post {
        let draft = PostDraft {
            title: "Post".to_string(),
            text: "Body".to_string(),
            pub_date: Some(self.now - age),
            category_id: category.map(|c| c.id),
            location_id: None,
        };
        let mut post = Post::new(author.id, draft, self.now);
        post.is_published = is_published;
        self.store.save(post).await.unwrap()
    }

    async fn comment(&self, author: &User, post: &Post) -> Comment {
        let comment = Comment::new(author.id, post.id, "Nice".to_string(), self.now);
        self.store.save(comment).await.unwrap()
    }
}

#[tokio::test]
async fn test_anonymous_category_listing_shows_published_posts_with_comment_counts() {
    let fx = Fixture::new(10);
    let author = fx.user("anna").await;
    let reader = fx.user("boris").await;
    let travel = fx.category("travel", true).await;

    let first = fx.post(&author, Some(&travel), Duration::hours(3), true).await;
    fx.post(&author, Some(&travel), Duration::hours(2), true).await;
    fx.post(&author, Some(&travel), Duration::hours(1), true).await;
    fx.post(&author, Some(&travel), Duration::hours(4), false).await;
    fx.comment(&reader, &first).await;
    fx.comment(&author, &first).await;

    let (category, page) = fx
        .blog
        .category_posts(&Viewer::Anonymous, "travel", 1)
        .await
        .unwrap();

    assert_eq!(category.id, travel.id);
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 3);
    assert!(page.items.iter().all(|r| r.post.is_published));
    let counted = page.items.iter().find(|r| r.post.id == first.id).unwrap();
    assert_eq!(counted.comment_count, 2);
    assert_eq!(counted.author_username, "anna");
}

#[tokio::test]
async fn test_unpublished_category_is_not_found() {
    let fx = Fixture::new(10);
    fx.category("drafts", false).await;

    let result = fx.blog.category_posts(&Viewer::Anonymous, "drafts", 1).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    let result = fx.blog.category_posts(&Viewer::Anonymous, "missing", 1).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_own_profile_includes_scheduled_and_unpublished_posts() {
    let fx = Fixture::new(10);
    let author = fx.user("anna").await;
    let travel = fx.category("travel", true).await;

    fx.post(&author, Some(&travel), -Duration::days(2), false).await;
    fx.post(&author, Some(&travel), Duration::hours(1), true).await;
    fx.post(&author, Some(&travel), Duration::hours(2), true).await;

    let (profile, own) = fx
        .blog
        .profile(&Viewer::user(author.id), "anna", 1)
        .await
        .unwrap();
    assert_eq!(profile.id, author.id);
    assert_eq!(own.items.len(), 3);

    let (_, public) = fx
        .blog
        .profile(&Viewer::Anonymous, "anna", 1)
        .await
        .unwrap();
    assert_eq!(public.items.len(), 2);
    assert!(public.items.iter().all(|r| r.post.pub_date <= fx.now));
}

#[tokio::test]
async fn test_listing_is_newest_first_and_clamps_pages() {
    let fx = Fixture::new(2);
    let author = fx.user("anna").await;
    let travel = fx.category("travel", true).await;
    for hours in [5, 1, 3, 2, 4] {
        fx.post(&author, Some(&travel), Duration::hours(hours), true)
            .await;
    }

    let mut seen = Vec::new();
    for number in 1..=3 {
        let page = fx.blog.index(&Viewer::Anonymous, number).await.unwrap();
        assert_eq!(page.number, number as u64);
        seen.extend(page.items.into_iter().map(|r| r.post.pub_date));
    }
    assert_eq!(seen.len(), 5);
    assert!(seen.windows(2).all(|w| w[0] >= w[1]));

    let beyond = fx.blog.index(&Viewer::Anonymous, 42).await.unwrap();
    assert_eq!(beyond.number, 3);
    assert_eq!(beyond.num_pages, 3);
    assert_eq!(beyond.items.len(), 1);
    assert!(!beyond.has_next());

    let before = fx.blog.index(&Viewer::Anonymous, 0).await.unwrap();
    assert_eq!(before.number, 1);
}

#[tokio::test]
async fn test_index_hides_drafts_even_from_their_author() {
    let fx = Fixture::new(10);
    let author = fx.user("anna").await;
    let travel = fx.category("travel", true).await;
    fx.post(&author, Some(&travel), Duration::hours(1), false).await;

    let page = fx.blog.index(&Viewer::user(author.id), 1).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.num_pages, 1);
}

#[tokio::test]
async fn test_hidden_post_detail_is_not_found_for_others() {
    let fx = Fixture::new(10);
    let author = fx.user("anna").await;
    let stranger = fx.user("boris").await;
    let travel = fx.category("travel", true).await;
    let scheduled = fx.post(&author, Some(&travel), -Duration::days(1), true).await;

    let result = fx
        .blog
        .post_detail(&Viewer::user(stranger.id), scheduled.id)
        .await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    let detail = fx
        .blog
        .post_detail(&Viewer::user(author.id), scheduled.id)
        .await
        .unwrap();
    assert_eq!(detail.post.post.id, scheduled.id);
}

#[tokio::test]
async fn test_post_without_category_is_hidden_from_non_authors() {
    let fx = Fixture::new(10);
    let author = fx.user("anna").await;
    let travel = fx.category("travel", true).await;
    let post = fx.post(&author, Some(&travel), Duration::hours(1), true).await;

    BaseRepository::<Category, Uuid>::delete(&*fx.store, travel.id)
        .await
        .unwrap();

    let orphan = BaseRepository::<Post, Uuid>::find_by_id(&*fx.store, post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(orphan.category_id, None);

    let page = fx.blog.index(&Viewer::Anonymous, 1).await.unwrap();
    assert!(page.items.is_empty());
    assert!(matches!(
        fx.blog.post_detail(&Viewer::Anonymous, post.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(
        fx.blog
            .post_detail(&Viewer::user(author.id), post.id)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_non_author_cannot_delete_comment() {
    let fx = Fixture::new(10);
    let anna = fx.user("anna").await;
    let boris = fx.user("boris").await;
    let travel = fx.category("travel", true).await;
    let post = fx.post(&anna, Some(&travel), Duration::hours(1), true).await;
    let comment = fx.comment(&anna, &post).await;

    let result = fx
        .blog
        .delete_comment(&Viewer::user(boris.id), post.id, comment.id)
        .await;
    assert!(matches!(
        result,
        Err(DomainError::NotAuthor { post_id }) if post_id == post.id
    ));
    assert_eq!(fx.store.find_by_post(post.id).await.unwrap().len(), 1);

    fx.blog
        .delete_comment(&Viewer::user(anna.id), post.id, comment.id)
        .await
        .unwrap();
    assert!(fx.store.find_by_post(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_must_belong_to_the_addressed_post() {
    let fx = Fixture::new(10);
    let anna = fx.user("anna").await;
    let travel = fx.category("travel", true).await;
    let post = fx.post(&anna, Some(&travel), Duration::hours(1), true).await;
    let other = fx.post(&anna, Some(&travel), Duration::hours(2), true).await;
    let comment = fx.comment(&anna, &post).await;

    let result = fx
        .blog
        .update_comment(&Viewer::user(anna.id), other.id, comment.id, "edit".into())
        .await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    let edited = fx
        .blog
        .update_comment(&Viewer::user(anna.id), post.id, comment.id, "edit".into())
        .await
        .unwrap();
    assert_eq!(edited.comment.text, "edit");
}

#[tokio::test]
async fn test_commenting_requires_a_visible_post() {
    let fx = Fixture::new(10);
    let anna = fx.user("anna").await;
    let boris = fx.user("boris").await;
    let travel = fx.category("travel", true).await;
    let draft = fx.post(&anna, Some(&travel), Duration::hours(1), false).await;

    let result = fx
        .blog
        .add_comment(&Viewer::user(boris.id), draft.id, "hi".into())
        .await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    let result = fx
        .blog
        .add_comment(&Viewer::Anonymous, draft.id, "hi".into())
        .await;
    assert!(matches!(result, Err(DomainError::Unauthorized)));

    let comment = fx
        .blog
        .add_comment(&Viewer::user(anna.id), draft.id, "note to self".into())
        .await
        .unwrap();
    assert_eq!(comment.comment.post_id, draft.id);
}

#[tokio::test]
async fn test_comment_author_follows_profile_renames() {
    let fx = Fixture::new(10);
    let mut anna = fx.user("anna").await;
    let travel = fx.category("travel", true).await;
    let post = fx.post(&anna, Some(&travel), Duration::hours(1), true).await;
    let viewer = Viewer::user(anna.id);

    let first = fx
        .blog
        .add_comment(&viewer, post.id, "before".into())
        .await
        .unwrap();
    assert_eq!(first.author_username, "anna");

    anna.username = "anna_k".to_string();
    fx.store.save(anna).await.unwrap();

    let second = fx
        .blog
        .add_comment(&viewer, post.id, "after".into())
        .await
        .unwrap();
    assert_eq!(second.author_username, "anna_k");

    let edited = fx
        .blog
        .update_comment(&viewer, post.id, first.comment.id, "before, edited".into())
        .await
        .unwrap();
    assert_eq!(edited.author_username, "anna_k");
}

#[tokio::test]
async fn test_post_edit_and_delete_are_author_only() {
    let fx = Fixture::new(10);
    let anna = fx.user("anna").await;
    let boris = fx.user("boris").await;
    let travel = fx.category("travel", true).await;

    let post = fx
        .blog
        .create_post(
            &Viewer::user(anna.id),
            PostDraft {
                title: "Road trip".into(),
                text: "Day one".into(),
                pub_date: None,
                category_id: Some(travel.id),
                location_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(post.pub_date, fx.now);
    fx.comment(&boris, &post).await;

    let draft = PostDraft {
        title: "Hijacked".into(),
        text: "...".into(),
        pub_date: None,
        category_id: Some(travel.id),
        location_id: None,
    };
    let denied = fx
        .blog
        .update_post(&Viewer::user(boris.id), post.id, draft.clone())
        .await;
    assert!(matches!(denied, Err(DomainError::NotAuthor { post_id }) if post_id == post.id));
    assert!(matches!(
        fx.blog.delete_post(&Viewer::Anonymous, post.id).await,
        Err(DomainError::NotAuthor { .. })
    ));

    let updated = fx
        .blog
        .update_post(&Viewer::user(anna.id), post.id, draft)
        .await
        .unwrap();
    assert_eq!(updated.title, "Hijacked");

    fx.blog
        .delete_post(&Viewer::user(anna.id), post.id)
        .await
        .unwrap();
    assert!(fx.store.find_record(post.id).await.unwrap().is_none());
    assert!(fx.store.find_by_post(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_post_rejects_unknown_category() {
    let fx = Fixture::new(10);
    let anna = fx.user("anna").await;

    let result = fx
        .blog
        .create_post(
            &Viewer::user(anna.id),
            PostDraft {
                title: "Road trip".into(),
                text: "Day one".into(),
                pub_date: None,
                category_id: Some(Uuid::new_v4()),
                location_id: None,
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_deleting_user_cascades_to_posts_and_comments() {
    let fx = Fixture::new(10);
    let anna = fx.user("anna").await;
    let boris = fx.user("boris").await;
    let travel = fx.category("travel", true).await;
    let anna_post = fx.post(&anna, Some(&travel), Duration::hours(1), true).await;
    let boris_post = fx.post(&boris, Some(&travel), Duration::hours(1), true).await;
    fx.comment(&boris, &anna_post).await;
    fx.comment(&anna, &boris_post).await;

    BaseRepository::<User, Uuid>::delete(&*fx.store, anna.id)
        .await
        .unwrap();

    assert!(fx.store.find_record(anna_post.id).await.unwrap().is_none());
    let remaining = fx.store.find_record(boris_post.id).await.unwrap().unwrap();
    assert_eq!(remaining.comment_count, 0);
}

#[tokio::test]
async fn test_catalog_writes_require_staff() {
    let fx = Fixture::new(10);
    let anna = fx.user("anna").await;
    let new_category = NewCategory {
        title: "Travel".into(),
        description: String::new(),
        slug: "travel".into(),
        is_published: true,
    };

    let result = fx
        .catalog
        .create_category(&Viewer::user(anna.id), new_category.clone())
        .await;
    assert!(matches!(result, Err(DomainError::Forbidden)));

    let staff = Viewer::staff(anna.id);
    fx.catalog
        .create_category(&staff, new_category.clone())
        .await
        .unwrap();
    assert!(matches!(
        fx.catalog.create_category(&staff, new_category).await,
        Err(DomainError::Duplicate(_))
    ));

    let location = fx
        .catalog
        .create_location(
            &staff,
            NewLocation {
                name: "Lisbon".into(),
                is_published: false,
            },
        )
        .await
        .unwrap();
    assert!(fx.catalog.published_locations().await.unwrap().is_empty());
    fx.catalog
        .set_location_publication(&staff, location.id, true)
        .await
        .unwrap();
    assert_eq!(fx.catalog.published_locations().await.unwrap().len(), 1);

    fx.catalog
        .set_category_publication(&staff, "travel", false)
        .await
        .unwrap();
    assert!(fx.catalog.published_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unpublishing_a_post_hides_it() {
    let fx = Fixture::new(10);
    let anna = fx.user("anna").await;
    let travel = fx.category("travel", true).await;
    let post = fx.post(&anna, Some(&travel), Duration::hours(1), true).await;

    fx.catalog
        .set_post_publication(&Viewer::staff(Uuid::new_v4()), post.id, false)
        .await
        .unwrap();

    assert!(matches!(
        fx.blog.post_detail(&Viewer::Anonymous, post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[cfg(feature = "auth")]
mod accounts {
    use super::*;
    use crate::auth::Argon2PasswordService;
    use blogicum_core::domain::{NewAccount, ProfileChanges};
    use blogicum_core::service::AccountService;

    fn account(username: &str, password: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: password.to_string(),
            first_name: "Anna".to_string(),
            last_name: "K".to_string(),
        }
    }

    fn service_at(store: &Arc<InMemoryStore>, now: DateTime<Utc>) -> AccountService {
        AccountService::new(
            store.repositories(),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(FixedClock(now)),
        )
    }

    fn service(store: &Arc<InMemoryStore>) -> AccountService {
        service_at(store, Utc::now())
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let store = Arc::new(InMemoryStore::new());
        let accounts = service(&store);

        let user = accounts
            .register(account("anna", "long-enough"))
            .await
            .unwrap();
        assert_ne!(user.password_hash, "long-enough");

        let logged_in = accounts.authenticate("anna", "long-enough").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(matches!(
            accounts.authenticate("anna", "wrong-password").await,
            Err(DomainError::Unauthorized)
        ));
        assert!(matches!(
            accounts.authenticate("nobody", "long-enough").await,
            Err(DomainError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_short_passwords() {
        let store = Arc::new(InMemoryStore::new());
        let accounts = service(&store);
        accounts
            .register(account("anna", "long-enough"))
            .await
            .unwrap();

        assert!(matches!(
            accounts.register(account("anna", "long-enough")).await,
            Err(DomainError::Duplicate(_))
        ));
        assert!(matches!(
            accounts.register(account("boris", "short")).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_checks_username_uniqueness() {
        let store = Arc::new(InMemoryStore::new());
        let accounts = service(&store);
        let anna = accounts
            .register(account("anna", "long-enough"))
            .await
            .unwrap();
        accounts
            .register(account("boris", "long-enough"))
            .await
            .unwrap();

        let taken = ProfileChanges {
            username: "boris".into(),
            email: "anna@example.com".into(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(matches!(
            accounts.update_profile(&Viewer::user(anna.id), taken).await,
            Err(DomainError::Duplicate(_))
        ));

        let renamed = ProfileChanges {
            username: "anna_k".into(),
            email: "anna@example.com".into(),
            first_name: "Anna".into(),
            last_name: "Karenina".into(),
        };
        let updated = accounts
            .update_profile(&Viewer::user(anna.id), renamed)
            .await
            .unwrap();
        assert_eq!(updated.username, "anna_k");
        assert_eq!(updated.last_name, "Karenina");
    }

    #[tokio::test]
    async fn test_account_timestamps_come_from_the_clock() {
        let store = Arc::new(InMemoryStore::new());
        let registered_at = Utc::now() - Duration::days(30);
        let anna = service_at(&store, registered_at)
            .register(account("anna", "long-enough"))
            .await
            .unwrap();
        assert_eq!(anna.created_at, registered_at);
        assert_eq!(anna.updated_at, registered_at);

        let edited_at = registered_at + Duration::days(1);
        let changes = ProfileChanges {
            username: "anna".into(),
            email: "anna@example.com".into(),
            first_name: "Anna".into(),
            last_name: "K".into(),
        };
        let updated = service_at(&store, edited_at)
            .update_profile(&Viewer::user(anna.id), changes)
            .await
            .unwrap();

        assert_eq!(updated.created_at, registered_at);
        assert_eq!(updated.updated_at, edited_at);
    }
}
