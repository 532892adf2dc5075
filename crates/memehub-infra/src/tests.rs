//! End-to-end flows: the core services wired over the in-memory
//! repositories and the real credential adapters.

use std::sync::Arc;

use memehub_core::ApiError;
use memehub_core::feed::{FeedSort, PageRequest};
use memehub_core::ports::{
    MemeRepository, PasswordService, Principal, TokenService, UserRepository,
};
use memehub_core::service::{AuthService, FeedService, MemeService, UserService};
use memehub_shared::dto::{CreateMemeRequest, LoginRequest, RegisterRequest, UpdateMemeRequest};

use crate::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
use crate::database::{InMemoryMemeRepository, InMemoryUserRepository, MemoryStore};

struct TestApp {
    auth: AuthService,
    users: UserService,
    memes: MemeService,
    feed: FeedService,
    user_repo: Arc<dyn UserRepository>,
}

fn test_app() -> TestApp {
    let store = MemoryStore::new();
    let user_repo: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new(store.clone()));
    let meme_repo: Arc<dyn MemeRepository> = Arc::new(InMemoryMemeRepository::new(store));
    let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        ..JwtConfig::default()
    }));

    TestApp {
        auth: AuthService::new(user_repo.clone(), passwords, tokens),
        users: UserService::new(user_repo.clone(), meme_repo.clone()),
        memes: MemeService::new(meme_repo.clone(), user_repo.clone()),
        feed: FeedService::new(meme_repo),
        user_repo,
    }
}

async fn register(app: &TestApp, name: &str) -> Principal {
    let resp = app
        .auth
        .register(RegisterRequest {
            username: name.to_string(),
            email: format!("{name}@x.com"),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    app.auth.authenticate(&resp.token).unwrap()
}

fn meme_request(caption: &str, tags: &[&str]) -> CreateMemeRequest {
    CreateMemeRequest {
        image_url: "https://res.cloudinary.com/demo/cat.jpg".to_string(),
        caption: Some(caption.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn default_page() -> PageRequest {
    PageRequest::new(None, None)
}

#[tokio::test]
async fn register_issues_a_token_that_resolves_to_the_user() {
    let app = test_app();

    let resp = app
        .auth
        .register(RegisterRequest {
            username: " alice ".to_string(),
            email: "Alice@X.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    // Username trimmed, email lowercased.
    assert_eq!(resp.user.username, "alice");
    assert_eq!(resp.user.email, "alice@x.com");

    let principal = app.auth.authenticate(&resp.token).unwrap();
    assert_eq!(principal.username, "alice");
    assert_eq!(principal.user_id.to_string(), resp.user.id);

    let me = app.users.me(&principal).await.unwrap();
    assert_eq!(me.id, resp.user.id);
}

#[tokio::test]
async fn register_validates_before_touching_the_store() {
    let app = test_app();

    let cases = [
        ("x", "x@x.com", "secret1"),          // username too short
        ("alice", "not-an-email", "secret1"), // no @ or .
        ("alice", "alice@x.com", "12345"),    // password too short
    ];

    for (username, email, password) in cases {
        let err = app
            .auth
            .register(RegisterRequest {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app();
    register(&app, "alice").await;

    let err = app
        .auth
        .register(RegisterRequest {
            username: "alice".to_string(),
            email: "fresh@x.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "user_exists");
    assert_eq!(err.status(), 409);

    let err = app
        .auth
        .register(RegisterRequest {
            username: "alice2".to_string(),
            email: "alice@x.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "user_exists");
}

#[tokio::test]
async fn login_accepts_username_or_email_and_rejects_bad_credentials() {
    let app = test_app();
    register(&app, "alice").await;

    let by_name = app
        .auth
        .login(LoginRequest {
            username: "alice".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(by_name.user.username, "alice");

    let by_email = app
        .auth
        .login(LoginRequest {
            username: "alice@x.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(by_email.user.username, "alice");

    for (handle, password) in [("alice", "wrong-pass"), ("nobody", "secret1")] {
        let err = app
            .auth
            .login(LoginRequest {
                username: handle.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_credentials");
    }
}

#[tokio::test]
async fn garbage_tokens_are_unauthorized() {
    let app = test_app();
    let err = app.auth.authenticate("not-a-jwt").unwrap_err();
    assert_eq!(err.code(), "unauthorized");
    assert_eq!(err.status(), 401);
}

#[tokio::test]
async fn responses_never_carry_the_password_hash() {
    let app = test_app();
    let resp = app
        .auth
        .register(RegisterRequest {
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    let json = serde_json::to_string(&resp).unwrap();
    assert!(!json.to_lowercase().contains("password"));
}

#[tokio::test]
async fn like_flow_normalizes_tags_and_keeps_totals_exact() {
    let app = test_app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let meme = app
        .memes
        .create(&alice, meme_request("first!", &["Fun ", " cats"]))
        .await
        .unwrap();
    assert_eq!(meme.tags, vec!["fun", "cats"]);

    app.memes.like(&bob, &meme.id).await.unwrap();
    let profile = app.users.get(&alice.user_id.to_string()).await.unwrap();
    assert_eq!(profile.total_likes, 1);

    // Second like is rejected and the total does not double-count.
    let err = app.memes.like(&bob, &meme.id).await.unwrap_err();
    assert_eq!(err.code(), "already_liked");
    let profile = app.users.get(&alice.user_id.to_string()).await.unwrap();
    assert_eq!(profile.total_likes, 1);

    // Unlike restores the prior state exactly once.
    app.memes.unlike(&bob, &meme.id).await.unwrap();
    let profile = app.users.get(&alice.user_id.to_string()).await.unwrap();
    assert_eq!(profile.total_likes, 0);

    let err = app.memes.unlike(&bob, &meme.id).await.unwrap_err();
    assert_eq!(err.code(), "not_liked");
}

#[tokio::test]
async fn like_metadata_is_derived_per_viewer() {
    let app = test_app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let meme = app
        .memes
        .create(&alice, meme_request("hello", &[]))
        .await
        .unwrap();
    app.memes.like(&bob, &meme.id).await.unwrap();

    let as_bob = app.memes.get(&meme.id, Some(bob.user_id)).await.unwrap();
    assert_eq!(as_bob.likes_count, 1);
    assert!(as_bob.is_liked);

    let anonymous = app.memes.get(&meme.id, None).await.unwrap();
    assert!(!anonymous.is_liked);
}

#[tokio::test]
async fn invalid_image_urls_are_rejected() {
    let app = test_app();
    let alice = register(&app, "alice").await;

    let err = app
        .memes
        .create(
            &alice,
            CreateMemeRequest {
                image_url: "https://evil.example.com/cat.jpg".to_string(),
                caption: None,
                tags: vec![],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "invalid_image");
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn feed_pages_with_the_extra_row_verdict() {
    let app = test_app();
    let alice = register(&app, "alice").await;

    for n in 0..3 {
        app.memes
            .create(&alice, meme_request(&format!("meme {n}"), &[]))
            .await
            .unwrap();
    }

    let first = app
        .feed
        .page(FeedSort::Recent, PageRequest::new(Some(1), Some(2)), None)
        .await
        .unwrap();
    assert_eq!(first.memes.len(), 2);
    assert!(first.has_more);
    assert_eq!(first.next_cursor.as_deref(), Some("2"));

    let second = app
        .feed
        .page(FeedSort::Recent, PageRequest::new(Some(2), Some(2)), None)
        .await
        .unwrap();
    assert_eq!(second.memes.len(), 1);
    assert!(!second.has_more);
    assert!(second.next_cursor.is_none());

    // The two pages together cover all three memes exactly once.
    let mut ids: Vec<String> = first
        .memes
        .iter()
        .chain(second.memes.iter())
        .map(|m| m.id.clone())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn popular_feed_ranks_by_like_count() {
    let app = test_app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let carol = register(&app, "carol").await;

    app.memes
        .create(&alice, meme_request("quiet", &[]))
        .await
        .unwrap();
    let hit = app
        .memes
        .create(&alice, meme_request("hit", &[]))
        .await
        .unwrap();
    app.memes.like(&bob, &hit.id).await.unwrap();
    app.memes.like(&carol, &hit.id).await.unwrap();

    let ranked = app
        .feed
        .page(FeedSort::Popular, default_page(), None)
        .await
        .unwrap();
    assert_eq!(ranked.memes[0].id, hit.id);
    assert_eq!(ranked.memes[0].likes_count, 2);
}

#[tokio::test]
async fn search_matches_captions_case_insensitively() {
    let app = test_app();
    let alice = register(&app, "alice").await;

    app.memes
        .create(&alice, meme_request("Monday Mood", &[]))
        .await
        .unwrap();
    app.memes
        .create(&alice, meme_request("unrelated", &[]))
        .await
        .unwrap();

    let hits = app.feed.search("monday", default_page(), None).await.unwrap();
    assert_eq!(hits.memes.len(), 1);
    assert_eq!(hits.memes[0].caption.as_deref(), Some("Monday Mood"));

    let err = app.feed.search("   ", default_page(), None).await.unwrap_err();
    assert_eq!(err.code(), "missing_parameter");
}

#[tokio::test]
async fn tag_feed_normalizes_the_requested_tag() {
    let app = test_app();
    let alice = register(&app, "alice").await;

    app.memes
        .create(&alice, meme_request("cat pic", &["cats"]))
        .await
        .unwrap();
    app.memes
        .create(&alice, meme_request("dog pic", &["dogs"]))
        .await
        .unwrap();

    let hits = app.feed.by_tag(" CATS ", default_page(), None).await.unwrap();
    assert_eq!(hits.memes.len(), 1);
    assert_eq!(hits.memes[0].caption.as_deref(), Some("cat pic"));
}

#[tokio::test]
async fn only_the_owner_may_edit_or_delete() {
    let app = test_app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let meme = app
        .memes
        .create(&alice, meme_request("original", &["cats"]))
        .await
        .unwrap();

    let err = app
        .memes
        .update(
            &bob,
            &meme.id,
            UpdateMemeRequest {
                caption: Some("defaced".to_string()),
                tags: vec![],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "meme_not_found");

    let err = app.memes.delete(&bob, &meme.id).await.unwrap_err();
    assert_eq!(err.code(), "meme_not_found");

    // Untouched for everyone else.
    let current = app.memes.get(&meme.id, None).await.unwrap();
    assert_eq!(current.caption.as_deref(), Some("original"));

    // The owner's edit replaces tags wholesale and trims the caption.
    app.memes
        .update(
            &alice,
            &meme.id,
            UpdateMemeRequest {
                caption: Some("  revised  ".to_string()),
                tags: vec!["Dogs".to_string()],
            },
        )
        .await
        .unwrap();
    let current = app.memes.get(&meme.id, None).await.unwrap();
    assert_eq!(current.caption.as_deref(), Some("revised"));
    assert_eq!(current.tags, vec!["dogs"]);
}

#[tokio::test]
async fn deleted_memes_disappear_from_every_view() {
    let app = test_app();
    let alice = register(&app, "alice").await;

    let meme = app
        .memes
        .create(&alice, meme_request("fleeting", &["cats"]))
        .await
        .unwrap();
    app.memes.delete(&alice, &meme.id).await.unwrap();

    let err = app.memes.get(&meme.id, None).await.unwrap_err();
    assert_eq!(err.code(), "meme_not_found");

    let feed = app
        .feed
        .page(FeedSort::Recent, default_page(), None)
        .await
        .unwrap();
    assert!(feed.memes.is_empty());

    let tagged = app.feed.by_tag("cats", default_page(), None).await.unwrap();
    assert!(tagged.memes.is_empty());

    let theirs = app
        .users
        .memes_of(&alice.user_id.to_string(), default_page(), None)
        .await
        .unwrap();
    assert!(theirs.memes.is_empty());
}

#[tokio::test]
async fn downloads_count_without_authentication() {
    let app = test_app();
    let alice = register(&app, "alice").await;
    let meme = app
        .memes
        .create(&alice, meme_request("download me", &[]))
        .await
        .unwrap();

    app.memes.record_download(&meme.id).await.unwrap();
    app.memes.record_download(&meme.id).await.unwrap();

    let current = app.memes.get(&meme.id, None).await.unwrap();
    assert_eq!(current.download_count, 2);

    let err = app
        .memes
        .record_download(&uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "meme_not_found");
}

#[tokio::test]
async fn malformed_ids_are_not_found_never_a_crash() {
    let app = test_app();
    let alice = register(&app, "alice").await;

    let err = app.memes.get("not-a-uuid", None).await.unwrap_err();
    assert_eq!(err.code(), "meme_not_found");

    let err = app.users.get("not-a-uuid").await.unwrap_err();
    assert_eq!(err.code(), "user_not_found");

    let page = app
        .users
        .memes_of("not-a-uuid", default_page(), None)
        .await
        .unwrap();
    assert!(page.memes.is_empty());
    assert!(!page.has_more);

    let err = app.memes.like(&alice, "not-a-uuid").await.unwrap_err();
    assert_eq!(err.code(), "already_liked");
}

#[tokio::test]
async fn reconciliation_repairs_a_skewed_total() {
    let app = test_app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let meme = app
        .memes
        .create(&alice, meme_request("popular", &[]))
        .await
        .unwrap();
    app.memes.like(&bob, &meme.id).await.unwrap();

    // Skew the denormalized counter behind the service's back.
    app.user_repo
        .set_total_likes(alice.user_id, 40)
        .await
        .unwrap();

    let reconciled = app.users.reconcile_total_likes(alice.user_id).await.unwrap();
    assert_eq!(reconciled, 1);

    let profile = app.users.get(&alice.user_id.to_string()).await.unwrap();
    assert_eq!(profile.total_likes, 1);
}

#[tokio::test]
async fn profile_image_update_round_trips() {
    let app = test_app();
    let alice = register(&app, "alice").await;

    let url = "https://res.cloudinary.com/demo/me.png".to_string();
    app.users
        .set_profile_image(&alice, Some(url.clone()))
        .await
        .unwrap();

    let me = app.users.me(&alice).await.unwrap();
    assert_eq!(me.profile_image, Some(url));
}

#[tokio::test]
async fn unknown_user_lookup_is_not_found() {
    let app = test_app();
    let err = app
        .users
        .get(&uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(err.code(), "user_not_found");
}
