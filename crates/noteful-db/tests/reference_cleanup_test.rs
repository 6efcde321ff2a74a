//! Reference cleanup when folders and tags are deleted.
//!
//! Requires a running PostgreSQL; see `DEFAULT_TEST_DATABASE_URL`.

use noteful_db::test_fixtures::{seed_demo_data, TestDatabase, TestDataBuilder};
use noteful_db::{CascadeOutcome, FolderRepository, NoteFilter, NoteRepository, TagRepository};

#[tokio::test]
#[ignore = "requires database"]
async fn test_folder_delete_unsets_folder_on_notes() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;
    let data = seed_demo_data(&db.notes, &db.folders, &db.tags).await;
    let archive = data.folders[0].id;

    let outcome = db.folders.delete(archive).await.unwrap();
    assert_eq!(
        outcome,
        CascadeOutcome {
            deleted: true,
            notes_updated: 2
        }
    );

    assert!(db.folders.get(archive).await.unwrap().is_none());
    let filed = db
        .notes
        .list(NoteFilter {
            folder_id: Some(archive),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(filed.is_empty());

    // The notes themselves survive
    assert_eq!(db.notes.count().await.unwrap(), 4);
    let first = db.notes.fetch(data.notes[0].id).await.unwrap().unwrap();
    assert_eq!(first.folder_id, None);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_tag_delete_removes_only_that_tag() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;
    let data = seed_demo_data(&db.notes, &db.folders, &db.tags).await;
    let breed = data.tags[0].id;
    let hybrid = data.tags[1].id;

    let outcome = db.tags.delete(breed).await.unwrap();
    assert!(outcome.deleted);
    assert_eq!(outcome.notes_updated, 2);

    let tagged = db
        .notes
        .list(NoteFilter {
            tag_id: Some(breed),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(tagged.is_empty());

    let both = db.notes.fetch(data.notes[2].id).await.unwrap().unwrap();
    let remaining: Vec<_> = both.tags.iter().map(|t| t.id).collect();
    assert_eq!(remaining, vec![hybrid]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_missing_folder_and_tag() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    let id = noteful_db::ObjectId::new();
    assert!(!db.folders.delete(id).await.unwrap().deleted);
    assert!(!db.tags.delete(id).await.unwrap().deleted);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_dangling_tag_references_are_dropped_on_read() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;
    let ghost = noteful_db::ObjectId::new();

    let data = TestDataBuilder::new(&db.notes, &db.folders, &db.tags)
        .with_tag("real")
        .await;
    let real = data.build().tags[0].id;

    let note = TestDataBuilder::new(&db.notes, &db.folders, &db.tags)
        .with_note("mixed", None, &[ghost, real])
        .await
        .build()
        .notes
        .remove(0);

    // Stored as written
    assert_eq!(note.tags, vec![ghost, real]);

    let fetched = db.notes.fetch(note.id).await.unwrap().unwrap();
    assert_eq!(fetched.tags.len(), 1);
    assert_eq!(fetched.tags[0].name, "real");

    test_db.cleanup().await;
}
