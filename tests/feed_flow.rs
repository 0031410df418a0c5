mod common;

use std::sync::atomic::Ordering;

use common::{
    at_hour, comment_service, feed_service, like_service, make_post, make_user, post_service,
    MemoryBlobStore, MemoryStore,
};
use qhive_be::dtos::feed_dtos::{FeedEntryOut, FeedQuery};
use qhive_be::dtos::post_dtos::CreatePostIn;
use qhive_be::error::ApiError;
use qhive_be::models::feed::filter_entries;
use uuid::Uuid;

#[tokio::test]
async fn assembly_joins_owner_likes_and_comments() {
    let store = MemoryStore::new();
    let alice = make_user("Alice", "CSE", 3);
    let bob = make_user("Bob", "ECE", 1);
    store.seed_user(alice.clone()).await;
    store.seed_user(bob.clone()).await;

    let mut old = make_post("lab manual", Some(alice.id));
    old.created_at = Some(at_hour(9));
    let mut fresh = make_post("exam schedule", Some(bob.id));
    fresh.created_at = Some(at_hour(15));
    let old_id = store.seed_post(old).await;
    let fresh_id = store.seed_post(fresh).await;

    store.seed_like(old_id, bob.id).await;
    store.seed_like(old_id, alice.id).await;

    let comments = comment_service(&store);
    comments.append(old_id, bob.id, "thanks!").await.unwrap();
    comments.append(old_id, alice.id, "np").await.unwrap();

    let feed = feed_service(&store);
    let view = feed.current().await.unwrap();

    assert!(!view.stale);
    assert_eq!(view.entries.len(), 2);
    // Newest first.
    assert_eq!(view.entries[0].post.id, fresh_id);
    assert_eq!(view.entries[1].post.id, old_id);

    let entry = &view.entries[1];
    assert_eq!(entry.owner.branch, "CSE");
    assert_eq!(entry.owner.year, "3");
    assert_eq!(entry.like_count(), 2);
    assert!(entry.is_liked_by(bob.id));
    // Thread comes back oldest first.
    assert_eq!(entry.comments.len(), 2);
    assert_eq!(entry.comments[0].text, "thanks!");
    assert_eq!(entry.comments[1].text, "np");

    let bare = &view.entries[0];
    assert_eq!(bare.owner.branch, "ECE");
    assert_eq!(bare.like_count(), 0);
    assert!(bare.comments.is_empty());
}

#[tokio::test]
async fn untimed_posts_sort_after_every_timed_one() {
    let store = MemoryStore::new();
    let mut timed = make_post("timed", None);
    timed.created_at = Some(at_hour(1));
    let untimed_id = store.seed_post(make_post("untimed", None)).await;
    let timed_id = store.seed_post(timed).await;

    let feed = feed_service(&store);
    let view = feed.current().await.unwrap();

    assert_eq!(view.entries[0].post.id, timed_id);
    assert_eq!(view.entries[1].post.id, untimed_id);
}

#[tokio::test]
async fn missing_owner_rows_get_placeholder_badges() {
    let store = MemoryStore::new();
    // Owner id points nowhere, and a second post has no owner at all.
    store
        .seed_post(make_post("orphaned", Some(Uuid::new_v4())))
        .await;
    store.seed_post(make_post("ownerless", None)).await;

    let feed = feed_service(&store);
    let view = feed.current().await.unwrap();

    for entry in &view.entries {
        assert_eq!(entry.owner.branch, "N/A");
        assert_eq!(entry.owner.year, "N/A");
    }
}

#[tokio::test]
async fn owner_lookup_outage_degrades_to_placeholder_not_error() {
    let store = MemoryStore::new();
    let owner = make_user("Carol", "MECH", 2);
    store.seed_user(owner.clone()).await;
    store.seed_post(make_post("notes", Some(owner.id))).await;
    store.fail_users.store(true, Ordering::SeqCst);

    let feed = feed_service(&store);
    let view = feed.current().await.unwrap();

    assert!(!view.stale);
    assert_eq!(view.entries[0].owner.branch, "N/A");
}

#[tokio::test]
async fn embedded_likes_count_until_the_ledger_has_rows() {
    let store = MemoryStore::new();
    let legacy_fans = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let mut post = make_post("old upload", None);
    post.likes = legacy_fans.clone();
    let post_id = store.seed_post(post).await;

    let feed = feed_service(&store);
    let view = feed.current().await.unwrap();
    assert_eq!(view.entries[0].like_count(), 3);
    assert!(view.entries[0].is_liked_by(legacy_fans[1]));

    // First ledger row takes over; the embedded array stops counting.
    let viewer = Uuid::new_v4();
    like_service(&store).toggle(post_id, viewer).await.unwrap();
    let view = feed.current().await.unwrap();
    assert_eq!(view.entries[0].like_count(), 1);
    assert!(view.entries[0].is_liked_by(viewer));
    assert!(!view.entries[0].is_liked_by(legacy_fans[0]));
}

#[tokio::test]
async fn likes_outage_falls_back_to_embedded_array() {
    let store = MemoryStore::new();
    let mut post = make_post("resilient", None);
    post.likes = vec![Uuid::new_v4()];
    store.seed_post(post).await;
    store.fail_likes.store(true, Ordering::SeqCst);

    let feed = feed_service(&store);
    let view = feed.current().await.unwrap();

    assert!(!view.stale);
    assert_eq!(view.entries[0].like_count(), 1);
}

#[tokio::test]
async fn comment_outage_leaves_the_thread_empty() {
    let store = MemoryStore::new();
    let post_id = store.seed_post(make_post("quiet", None)).await;
    comment_service(&store)
        .append(post_id, Uuid::new_v4(), "lost for now")
        .await
        .unwrap();
    store.fail_comments.store(true, Ordering::SeqCst);

    let feed = feed_service(&store);
    let view = feed.current().await.unwrap();

    assert!(!view.stale);
    assert!(view.entries[0].comments.is_empty());
}

#[tokio::test]
async fn posts_outage_serves_the_stale_snapshot() {
    let store = MemoryStore::new();
    let mut post = make_post("survivor", None);
    post.created_at = Some(at_hour(8));
    store.seed_post(post).await;

    let feed = feed_service(&store);
    let first = feed.current().await.unwrap();
    assert!(!first.stale);

    store.fail_posts.store(true, Ordering::SeqCst);
    let fallback = feed.current().await.unwrap();
    assert!(fallback.stale);
    assert!(fallback.stale_reason.is_some());
    assert_eq!(fallback.entries.len(), 1);
    assert_eq!(fallback.entries[0].post.title, "survivor");
    assert_eq!(fallback.refreshed_at, first.refreshed_at);

    // Recovery clears the flag.
    store.fail_posts.store(false, Ordering::SeqCst);
    let recovered = feed.current().await.unwrap();
    assert!(!recovered.stale);
}

#[tokio::test]
async fn posts_outage_with_no_snapshot_is_an_error() {
    let store = MemoryStore::new();
    store.fail_posts.store(true, Ordering::SeqCst);

    let feed = feed_service(&store);
    match feed.current().await {
        Err(ApiError::Store(_)) => {}
        other => panic!("expected store error, got {:?}", other.map(|v| v.stale)),
    }
}

#[tokio::test]
async fn interaction_patches_keep_the_stale_snapshot_current() {
    let store = MemoryStore::new();
    let post_id = store.seed_post(make_post("patched", None)).await;

    let feed = feed_service(&store);
    feed.current().await.unwrap();
    store.fail_posts.store(true, Ordering::SeqCst);

    let viewer = Uuid::new_v4();
    let likes = like_service(&store);
    let outcome = likes.toggle(post_id, viewer).await.unwrap();
    feed.apply_like(post_id, viewer, outcome.liked).await;

    let comment = comment_service(&store)
        .append(post_id, viewer, "still works")
        .await
        .unwrap();
    feed.apply_comment(&comment).await;

    let view = feed.current().await.unwrap();
    assert!(view.stale);
    assert!(view.entries[0].is_liked_by(viewer));
    assert_eq!(view.entries[0].comments.len(), 1);
    assert_eq!(view.entries[0].comments[0].text, "still works");

    // Untoggling patches back out.
    let outcome = likes.toggle(post_id, viewer).await.unwrap();
    feed.apply_like(post_id, viewer, outcome.liked).await;
    let view = feed.current().await.unwrap();
    assert!(!view.entries[0].is_liked_by(viewer));
}

#[tokio::test]
async fn removal_patch_drops_the_entry_from_the_snapshot() {
    let store = MemoryStore::new();
    let keep_id = store.seed_post(make_post("keep", None)).await;
    let drop_id = store.seed_post(make_post("drop", None)).await;

    let feed = feed_service(&store);
    feed.current().await.unwrap();
    store.fail_posts.store(true, Ordering::SeqCst);

    feed.apply_removal(drop_id).await;
    let view = feed.current().await.unwrap();
    assert!(view.stale);
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].post.id, keep_id);
}

#[tokio::test]
async fn query_filters_compose_over_the_assembled_feed() {
    let store = MemoryStore::new();
    let cse_senior = make_user("Dev", "CSE", 4);
    let cse_fresher = make_user("Esha", "CSE", 1);
    let civil = make_user("Farhan", "CIVIL", 4);
    for user in [&cse_senior, &cse_fresher, &civil] {
        store.seed_user((*user).clone()).await;
    }
    let mut wanted = make_post("Placement Prep Notes", Some(cse_senior.id));
    wanted.description = "aptitude and coding rounds".to_string();
    store.seed_post(wanted).await;
    store
        .seed_post(make_post("Placement drive photos", Some(cse_fresher.id)))
        .await;
    store
        .seed_post(make_post("placement stats", Some(civil.id)))
        .await;

    let feed = feed_service(&store);
    let view = feed.current().await.unwrap();

    let filter = FeedQuery {
        branch: Some("CSE".to_string()),
        year: Some("4".to_string()),
        q: Some("placement".to_string()),
    }
    .into_filter();
    let hits = filter_entries(&view.entries, &filter);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].post.title, "Placement Prep Notes");

    // Branch comparison is exact, so a lowercase axis matches nothing.
    let filter = FeedQuery {
        branch: Some("cse".to_string()),
        year: None,
        q: None,
    }
    .into_filter();
    assert!(filter_entries(&view.entries, &filter).is_empty());
}

#[tokio::test]
async fn render_computes_the_viewer_flag_per_requester() {
    let store = MemoryStore::new();
    let fan = Uuid::new_v4();
    let post_id = store.seed_post(make_post("rendered", None)).await;
    store.seed_like(post_id, fan).await;

    let feed = feed_service(&store);
    let view = feed.current().await.unwrap();
    let entry = &view.entries[0];

    let as_fan = FeedEntryOut::from_entry(entry, Some(fan));
    assert!(as_fan.viewer_has_liked);
    assert_eq!(as_fan.like_count, 1);

    let as_stranger = FeedEntryOut::from_entry(entry, Some(Uuid::new_v4()));
    assert!(!as_stranger.viewer_has_liked);

    let anonymous = FeedEntryOut::from_entry(entry, None);
    assert!(!anonymous.viewer_has_liked);
    assert_eq!(anonymous.like_count, 1);
}

#[tokio::test]
async fn post_lifecycle_from_creation_to_deletion() {
    let store = MemoryStore::new();
    let blobs = MemoryBlobStore::new();
    let author = make_user("Asha", "CSE", 3);
    let reader = make_user("Ravi", "ECE", 2);
    store.seed_user(author.clone()).await;
    store.seed_user(reader.clone()).await;

    let posts = post_service(&store, &blobs);
    let feed = feed_service(&store);
    let likes = like_service(&store);
    let comments = comment_service(&store);

    // Author creates a text-only post; the next refresh shows it unliked.
    let post = posts
        .create(
            author.id,
            CreatePostIn {
                title: "Exam Schedule".to_string(),
                description: String::new(),
                file: None,
            },
        )
        .await
        .unwrap();
    let view = feed.current().await.unwrap();
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].post.title, "Exam Schedule");
    assert_eq!(view.entries[0].like_count(), 0);

    // Reader likes it; the flag is per viewer.
    let outcome = likes.toggle(post.id, reader.id).await.unwrap();
    feed.apply_like(post.id, reader.id, outcome.liked).await;
    let view = feed.current().await.unwrap();
    let entry = &view.entries[0];
    assert_eq!(entry.like_count(), 1);
    assert!(FeedEntryOut::from_entry(entry, Some(reader.id)).viewer_has_liked);
    assert!(!FeedEntryOut::from_entry(entry, Some(author.id)).viewer_has_liked);

    // Author answers in the thread.
    let comment = comments.append(post.id, author.id, "Thanks").await.unwrap();
    feed.apply_comment(&comment).await;
    let thread = comments.list_for(post.id).await.unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].text, "Thanks");

    // Author deletes the post; the next refresh no longer carries it.
    posts.delete(post.id, author.id).await.unwrap();
    feed.apply_removal(post.id).await;
    let view = feed.current().await.unwrap();
    assert!(view.entries.is_empty());
    assert_eq!(blobs.delete_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blank_comments_are_rejected_before_the_store() {
    let store = MemoryStore::new();
    let post_id = store.seed_post(make_post("strict", None)).await;
    let comments = comment_service(&store);

    match comments.append(post_id, Uuid::new_v4(), "   \n\t").await {
        Err(ApiError::Validation(_)) => {}
        other => panic!("expected validation error, got {:?}", other.is_ok()),
    }
    assert_eq!(store.comment_count().await, 0);

    // Stored text is the trimmed form.
    let comment = comments
        .append(post_id, Uuid::new_v4(), "  solid advice  ")
        .await
        .unwrap();
    assert_eq!(comment.text, "solid advice");
}
