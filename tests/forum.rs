use cvlforum::error::AppError;
use cvlforum::messages::{self, MessageKind};
use cvlforum::session::Caller;
use cvlforum::{categories, db, profiles};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

const SECRET: &str = "noussommeslecvl";

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::init_schema(&pool).await.unwrap();
    pool
}

fn caller(user_id: &str) -> Caller {
    Caller {
        user_id: user_id.to_owned(),
        name: None,
        email: None,
    }
}

fn named_caller(user_id: &str, name: Option<&str>, email: Option<&str>) -> Caller {
    Caller {
        user_id: user_id.to_owned(),
        name: name.map(str::to_owned),
        email: email.map(str::to_owned),
    }
}

#[tokio::test]
async fn listing_is_recency_ordered_and_capped_at_fifty() {
    let pool = test_pool().await;
    let alice = caller("alice");

    for i in 0..60 {
        messages::send_message(&pool, &alice, &format!("msg {i}"), None)
            .await
            .unwrap();
    }

    let listed = messages::list_messages(&pool, None).await.unwrap();
    assert_eq!(listed.len(), 50);
    assert_eq!(listed[0].content, "msg 59");
    assert_eq!(listed[49].content, "msg 10");
    for pair in listed.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[tokio::test]
async fn listing_filters_by_exact_category() {
    let pool = test_pool().await;
    categories::initialize_default_categories(&pool).await.unwrap();
    let alice = caller("alice");

    for i in 0..3 {
        messages::send_message(&pool, &alice, &format!("cours {i}"), Some("Cours"))
            .await
            .unwrap();
    }
    messages::send_message(&pool, &alice, "aide", Some("Aide")).await.unwrap();
    messages::send_message(&pool, &alice, "libre", None).await.unwrap();

    let cours = messages::list_messages(&pool, Some("Cours")).await.unwrap();
    assert_eq!(cours.len(), 3);
    assert!(cours.iter().all(|m| m.category.as_deref() == Some("Cours")));

    let all = messages::list_messages(&pool, None).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn posting_rejects_empty_content_and_unknown_category() {
    let pool = test_pool().await;
    categories::initialize_default_categories(&pool).await.unwrap();
    let alice = caller("alice");

    let err = messages::send_message(&pool, &alice, "   ", None).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = messages::send_message(&pool, &alice, "salut", Some("Cantine"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(messages::list_messages(&pool, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn author_name_follows_the_fallback_chain() {
    let pool = test_pool().await;

    // profile display name wins over everything
    let with_profile = named_caller("a", Some("Provider Name"), Some("a@lycee.fr"));
    profiles::update_profile(&pool, &with_profile, "Prez CVL", "Ter01", "")
        .await
        .unwrap();
    messages::send_message(&pool, &with_profile, "un", None).await.unwrap();

    // then the provider name, then the email, then the literal
    let with_name = named_caller("b", Some("Bob"), Some("b@lycee.fr"));
    messages::send_message(&pool, &with_name, "deux", None).await.unwrap();

    let with_email = named_caller("c", None, Some("c@lycee.fr"));
    messages::send_message(&pool, &with_email, "trois", None).await.unwrap();

    let anonymous = caller("d");
    messages::send_message(&pool, &anonymous, "quatre", None).await.unwrap();

    let listed = messages::list_messages(&pool, None).await.unwrap();
    let names: Vec<&str> = listed.iter().rev().map(|m| m.author_name.as_str()).collect();
    assert_eq!(names, ["Prez CVL", "Bob", "c@lycee.fr", "Utilisateur anonyme"]);
}

#[tokio::test]
async fn author_name_is_a_snapshot_not_a_join() {
    let pool = test_pool().await;
    let alice = caller("alice");

    profiles::update_profile(&pool, &alice, "Ancien nom", "2nd03", "")
        .await
        .unwrap();
    messages::send_message(&pool, &alice, "bonjour", None).await.unwrap();
    profiles::update_profile(&pool, &alice, "Nouveau nom", "2nd03", "")
        .await
        .unwrap();

    let listed = messages::list_messages(&pool, None).await.unwrap();
    assert_eq!(listed[0].author_name, "Ancien nom");
}

#[tokio::test]
async fn announcement_requires_the_shared_secret() {
    let pool = test_pool().await;
    let bob = caller("bob");

    let err = messages::send_announcement(&pool, &bob, SECRET, "wrong", "x", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));
    assert!(messages::list_messages(&pool, None).await.unwrap().is_empty());

    messages::send_announcement(&pool, &bob, SECRET, SECRET, "Sortie annulée", None)
        .await
        .unwrap();

    let listed = messages::list_messages(&pool, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].kind, MessageKind::Announcement);
    assert_eq!(listed[0].author_name, "Administration");
}

#[tokio::test]
async fn only_the_author_may_delete() {
    let pool = test_pool().await;
    let alice = caller("alice");
    let bob = caller("bob");

    let id = messages::send_message(&pool, &bob, "mon message", None).await.unwrap();

    let err = messages::delete_message(&pool, &alice, id).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));
    assert_eq!(messages::list_messages(&pool, None).await.unwrap().len(), 1);

    messages::delete_message(&pool, &bob, id).await.unwrap();
    assert!(messages::list_messages(&pool, None).await.unwrap().is_empty());

    let err = messages::delete_message(&pool, &bob, id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn knowing_the_secret_grants_no_delete_privilege() {
    let pool = test_pool().await;
    let alice = caller("alice");
    let bob = caller("bob");

    let id = messages::send_message(&pool, &alice, "a moi", None).await.unwrap();
    messages::send_announcement(&pool, &bob, SECRET, SECRET, "annonce", None)
        .await
        .unwrap();

    let err = messages::delete_message(&pool, &bob, id).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));
}

#[tokio::test]
async fn default_categories_seed_exactly_once() {
    let pool = test_pool().await;

    let (a, b, c) = tokio::join!(
        categories::initialize_default_categories(&pool),
        categories::initialize_default_categories(&pool),
        categories::initialize_default_categories(&pool),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();
    categories::initialize_default_categories(&pool).await.unwrap();

    let listed = categories::list_categories(&pool).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Général", "Cours", "Examens", "Événements", "Aide"]);
}

#[tokio::test]
async fn seeding_a_non_empty_store_is_a_no_op() {
    let pool = test_pool().await;
    let alice = caller("alice");

    // user-created categories count as "non-empty" too
    categories::create_category(&pool, "Cantine", "Menus et avis", "#111111")
        .await
        .unwrap();
    categories::initialize_default_categories(&pool).await.unwrap();

    let listed = categories::list_categories(&pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Cantine");

    messages::send_message(&pool, &alice, "au menu", Some("Cantine"))
        .await
        .unwrap();
}

#[tokio::test]
async fn profile_update_is_an_upsert() {
    let pool = test_pool().await;
    let alice = caller("alice");

    profiles::update_profile(&pool, &alice, "Alice", "601", "salut")
        .await
        .unwrap();
    profiles::update_profile(&pool, &alice, "Alice L.", "602", "re")
        .await
        .unwrap();

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let profile = profiles::get_profile(&pool, "alice").await.unwrap().unwrap();
    assert_eq!(profile.display_name, "Alice L.");
    assert_eq!(profile.class_name, "602");
    assert_eq!(profile.bio, "re");
}

#[tokio::test]
async fn profile_validation_is_server_side() {
    let pool = test_pool().await;
    let alice = caller("alice");

    let err = profiles::update_profile(&pool, &alice, "  ", "601", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = profiles::update_profile(&pool, &alice, "Alice", "Directeur", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let long_bio = "x".repeat(201);
    let err = profiles::update_profile(&pool, &alice, "Alice", "601", &long_bio)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(profiles::get_profile(&pool, "alice").await.unwrap().is_none());
}

#[tokio::test]
async fn absent_profile_reads_as_none() {
    let pool = test_pool().await;
    assert!(profiles::get_profile(&pool, "nobody").await.unwrap().is_none());
}
