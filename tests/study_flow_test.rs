use rand::rngs::StdRng;
use rand::SeedableRng;
use vocaloop_lib::analytics::compute_overview;
use vocaloop_lib::selection::{select_session_words, FolderScope, WordFilter};
use vocaloop_lib::sessions::{load_all_sessions, save_session};
use vocaloop_lib::{AnswerContext, JsonWordStore, LearningStatus, QuizType, StudySession, Word, WordStore};

#[tokio::test]
async fn test_session_persists_progress_and_record() {
    let dir = tempfile::tempdir().unwrap();
    let library_path = dir.path().join("library.json");

    let store: WordStore = JsonWordStore::open(&library_path).await.unwrap().into();
    store.save_word(&Word::new("w1", "laconic", "brief").with_rate(50).in_folder("gre")).await.unwrap();
    store.save_word(&Word::new("w2", "opaque", "not clear").with_rate(10).in_folder("gre")).await.unwrap();
    store.save_word(&Word::new("w3", "lucid", "clear").with_rate(90)).await.unwrap();

    let candidates = store.list().await.unwrap();
    let filter = WordFilter { folder: FolderScope::Folder("gre".into()), ..Default::default() };
    let mut words = select_session_words(&candidates, &filter, 0, &mut StdRng::seed_from_u64(1));
    words.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(words.len(), 2);

    let mut session = StudySession::start(words, QuizType::Multiple);
    // w1 missed, w2 right, w1 right on the re-ask
    let miss = session.answer_and_save(&store, false, AnswerContext::default()).await.unwrap();
    assert_eq!(miss.word.id, "w1");
    assert_eq!(miss.new_rate, 45);
    let hit = session.answer_and_save(&store, true, AnswerContext::default()).await.unwrap();
    assert_eq!(hit.word.id, "w2");
    assert_eq!(hit.new_rate, 22);
    let recovered = session.answer_and_save(&store, true, AnswerContext::default()).await.unwrap();
    assert!(recovered.is_reasked);
    // 45 + 5 * 0.6
    assert_eq!(recovered.new_rate, 48);
    assert!(recovered.complete);

    let record = session.finish();
    let sessions_dir = dir.path().join("sessions");
    save_session(&sessions_dir, &record).await.unwrap();

    // reopen from disk
    let reopened: WordStore = JsonWordStore::open(&library_path).await.unwrap().into();
    let w1 = reopened.get("w1").await.unwrap().unwrap();
    assert_eq!(w1.learning_rate, 48);
    assert_eq!(w1.stats.wrong_count, 1);
    assert_eq!(w1.stats.review_count, 2);
    assert_eq!(w1.stats.last_penalty, 0);
    assert_eq!(w1.term, "laconic");

    let overview = compute_overview(&reopened.list().await.unwrap());
    assert_eq!(overview.status_counts.learning, 1);
    assert_eq!(overview.status_counts.difficult, 1);
    assert_eq!(overview.status_counts.memorized, 1);
    assert_eq!(reopened.get("w3").await.unwrap().unwrap().status(), LearningStatus::Memorized);

    let records = load_all_sessions(&sessions_dir).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].correct, 2);
    assert_eq!(records[0].wrong, 1);
}

#[tokio::test]
async fn test_library_tolerates_loose_documents() {
    let dir = tempfile::tempdir().unwrap();
    let library_path = dir.path().join("library.json");
    tokio::fs::write(
        &library_path,
        r#"{"words": [{"id": "x", "learningRate": 180}, {"id": "y", "learningRate": -3, "stats": {"wrong_count": 4}}]}"#,
    )
    .await
    .unwrap();

    let store: WordStore = JsonWordStore::open(&library_path).await.unwrap().into();
    let x = store.get("x").await.unwrap().unwrap();
    let y = store.get("y").await.unwrap().unwrap();
    assert_eq!(x.learning_rate, 100);
    assert_eq!(y.learning_rate, 0);
    assert_eq!(y.stats.wrong_count, 4);
    assert!(store.folders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_library_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let library_path = dir.path().join("library.json");
    tokio::fs::write(&library_path, "not json").await.unwrap();
    let err = JsonWordStore::open(&library_path).await.err().unwrap();
    assert_eq!(err.stage, "json_parse");
}
