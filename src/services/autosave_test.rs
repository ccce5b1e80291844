use super::*;
use crate::services::library::NewSnippet;
use crate::services::store::MemoryStore;

const DEBOUNCE: Duration = Duration::from_millis(1000);

async fn setup() -> (Arc<Library>, Autosave, Uuid) {
    let library = Arc::new(Library::new(Arc::new(MemoryStore::new())));
    let snippet = library.create(NewSnippet::default(), OffsetDateTime::now_utc()).await.unwrap();
    let autosave = Autosave::new(library.clone(), DEBOUNCE);
    (library, autosave, snippet.id)
}

fn html(v: &str) -> SnippetPatch {
    SnippetPatch { html: Some(v.into()), ..SnippetPatch::default() }
}

#[tokio::test(start_paused = true)]
async fn draft_waits_for_debounce() {
    let (library, autosave, id) = setup().await;
    autosave.schedule(id, html("<p>draft</p>"));
    assert_eq!(autosave.pending_count(), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(library.get(id).await.unwrap().html, "");

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(library.get(id).await.unwrap().html, "<p>draft</p>");
    assert_eq!(autosave.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn burst_of_edits_saves_last_only() {
    let (library, autosave, id) = setup().await;
    for v in ["a", "ab", "abc"] {
        autosave.schedule(id, html(v));
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    assert_eq!(autosave.pending_count(), 1);
    assert_eq!(library.get(id).await.unwrap().html, "");

    tokio::time::sleep(DEBOUNCE).await;
    assert_eq!(library.get(id).await.unwrap().html, "abc");
    assert_eq!(autosave.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn drafts_for_different_snippets_are_independent() {
    let (library, autosave, a) = setup().await;
    let b = library.create(NewSnippet::default(), OffsetDateTime::now_utc()).await.unwrap().id;

    autosave.schedule(a, html("A"));
    autosave.schedule(b, html("B"));
    assert_eq!(autosave.pending_count(), 2);

    tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;
    assert_eq!(library.get(a).await.unwrap().html, "A");
    assert_eq!(library.get(b).await.unwrap().html, "B");
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_drafts() {
    let (library, autosave, id) = setup().await;
    autosave.schedule(id, html("never"));
    autosave.shutdown();
    assert_eq!(autosave.pending_count(), 0);

    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(library.get(id).await.unwrap().html, "");
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_one_draft() {
    let (library, autosave, id) = setup().await;
    autosave.schedule(id, html("x"));
    assert!(autosave.cancel(id));
    assert!(!autosave.cancel(id));

    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(library.get(id).await.unwrap().html, "");
}

#[tokio::test(start_paused = true)]
async fn draft_for_deleted_snippet_is_dropped_quietly() {
    let (library, autosave, id) = setup().await;
    autosave.schedule(id, html("late"));
    library.delete(id).await.unwrap();

    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(autosave.pending_count(), 0);
    assert!(library.list().await.unwrap().is_empty());
}
