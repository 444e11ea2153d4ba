//! Durability tests: records must survive closing and reopening the database.

use frontdesk::engine::{Engine, EngineConfig, Resolution};
use frontdesk::model::RequestStatus;

fn persistent_engine(dir: &std::path::Path) -> Engine {
    Engine::new(EngineConfig {
        data_dir: Some(dir.to_path_buf()),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn knowledge_entries_survive_reopen() {
    let dir = tempfile::TempDir::new().unwrap();

    let entry = {
        let engine = persistent_engine(dir.path());
        engine
            .add_knowledge("What are your working hours?", "10 AM to 8 PM.")
            .unwrap()
    };

    let engine = persistent_engine(dir.path());
    let entries = engine.list_knowledge().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], entry);

    // And the reopened store still answers.
    let outcome = engine
        .resolve_question("caller-1", "what are your working hours", true)
        .unwrap();
    assert!(matches!(outcome, Resolution::Answered { .. }));
}

#[test]
fn help_requests_survive_reopen_with_state() {
    let dir = tempfile::TempDir::new().unwrap();

    let (pending_id, resolved_id) = {
        let engine = persistent_engine(dir.path());
        let pending = engine
            .create_escalation("caller-1", "Do you have parking nearby?")
            .unwrap();
        let resolved = engine
            .create_escalation("caller-2", "Do you sell gift cards?")
            .unwrap();
        engine
            .resolve_escalation(&resolved.id, "Yes, at the counter.")
            .unwrap();
        (pending.id, resolved.id)
    };

    let engine = persistent_engine(dir.path());

    let pending = engine.list_escalations(RequestStatus::Pending).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, pending_id);
    assert!(pending[0].supervisor_answer.is_none());

    let resolved = engine.list_escalations(RequestStatus::Resolved).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, resolved_id);
    assert_eq!(
        resolved[0].supervisor_answer.as_deref(),
        Some("Yes, at the counter.")
    );
    assert!(resolved[0].resolved_at.is_some());

    // The written-back entry is there too.
    let entries = engine.list_knowledge().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].question, "Do you sell gift cards?");
}

#[test]
fn memory_only_engine_does_not_persist() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    engine.add_knowledge("q", "a").unwrap();
    drop(engine);

    let engine = Engine::new(EngineConfig::default()).unwrap();
    assert!(engine.list_knowledge().unwrap().is_empty());
}
