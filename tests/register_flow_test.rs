//! The bundled sample tracks driven through the dispatcher

mod helpers;

use std::sync::{Arc, Mutex};
use async_trait::async_trait;

use botanix::handlers::{
    FieldNames, HelpHandler, RegisterHandler, Registration, RegistrationSink, StartHandler,
    HELP_TEXT, WELCOME_TEXT,
};
use botanix::{ContextStore, Dispatcher, InMemoryContextStore, Result};
use helpers::{init_test_env, CountingStore, RecordingReplier, UntouchableStore};

#[derive(Debug, Default, Clone)]
struct CapturingSink {
    registrations: Arc<Mutex<Vec<Registration>>>,
}

#[async_trait]
impl RegistrationSink for CapturingSink {
    async fn register(&self, registration: Registration) -> Result<()> {
        self.registrations.lock().unwrap().push(registration);
        Ok(())
    }
}

fn sample_bot(store: Arc<dyn ContextStore>, replier: &RecordingReplier, sink: &CapturingSink) -> Dispatcher<()> {
    Dispatcher::new(store)
        .with_track(HelpHandler::new(replier.clone()))
        .with_track(StartHandler::new(replier.clone()))
        .with_track(RegisterHandler::with_sink(replier.clone(), sink.clone()))
}

#[tokio::test]
async fn test_registration_flow() {
    init_test_env();
    let store = Arc::new(InMemoryContextStore::new());
    let replier = RecordingReplier::new();
    let sink = CapturingSink::default();
    let dispatcher = sample_bot(store.clone(), &replier, &sink);

    let result = dispatcher.route(42, "/register", &()).await.unwrap();
    assert!(result.is_handled());
    assert_eq!(replier.last_text().as_deref(), Some("Please enter your first name:"));
    assert_eq!(store.get_active(42).await.unwrap().unwrap().step(), 1);

    // rejected first name re-prompts and keeps the step
    let result = dispatcher.route(42, "Al", &()).await.unwrap();
    assert_eq!(result.unhandled_reason(), Some("Invalid input"));
    assert_eq!(
        replier.last_text().as_deref(),
        Some("First name must be at least 3 characters. Try again.")
    );
    assert_eq!(store.get_active(42).await.unwrap().unwrap().step(), 1);

    dispatcher.route(42, "Ali", &()).await.unwrap();
    assert_eq!(replier.last_text().as_deref(), Some("Please provide your surname:"));
    let context = store.get_active(42).await.unwrap().unwrap();
    assert_eq!(context.step(), 2);
    assert_eq!(context.get_payload::<String>(FieldNames::FIRST_NAME).unwrap(), "Ali");

    dispatcher.route(42, "Veli", &()).await.unwrap();
    assert_eq!(replier.last_text().as_deref(), Some("Please provide your email:"));
    assert_eq!(store.get_active(42).await.unwrap().unwrap().step(), 3);

    let result = dispatcher.route(42, "not-an-email", &()).await.unwrap();
    assert!(!result.is_handled());
    assert_eq!(replier.last_text().as_deref(), Some("Not a valid email. Try again."));
    assert!(sink.registrations.lock().unwrap().is_empty());

    let result = dispatcher.route(42, "ali@example.com", &()).await.unwrap();
    assert!(result.is_terminal());
    assert_eq!(replier.last_text().as_deref(), Some("Your registration was successful!"));
    assert!(store.get_active(42).await.unwrap().is_none());

    let registrations = sink.registrations.lock().unwrap().clone();
    assert_eq!(
        registrations,
        vec![Registration {
            user_id: 42,
            first_name: "Ali".to_string(),
            surname: "Veli".to_string(),
            email: "ali@example.com".to_string(),
        }]
    );

    assert_eq!(replier.count(), 6);
    assert!(replier.sent().iter().all(|(user_id, _)| *user_id == 42));
}

#[tokio::test]
async fn test_names_keep_their_casing() {
    let store = Arc::new(InMemoryContextStore::new());
    let replier = RecordingReplier::new();
    let sink = CapturingSink::default();
    let dispatcher = sample_bot(store.clone(), &replier, &sink);

    dispatcher.route(1, "/Register", &()).await.unwrap();
    dispatcher.route(1, "McDonald", &()).await.unwrap();

    let context = store.get_active(1).await.unwrap().unwrap();
    assert_eq!(context.get_payload::<String>(FieldNames::FIRST_NAME).unwrap(), "McDonald");
}

#[tokio::test]
async fn test_help_never_touches_store() {
    let replier = RecordingReplier::new();
    let sink = CapturingSink::default();
    let dispatcher = sample_bot(Arc::new(UntouchableStore), &replier, &sink);

    for _ in 0..2 {
        let result = dispatcher.route(5, "/help", &()).await.unwrap();
        assert!(result.is_handled());
        assert_eq!(replier.last_text().as_deref(), Some(HELP_TEXT));
    }
    assert_eq!(replier.count(), 2);
}

#[tokio::test]
async fn test_start_only_clears_store() {
    let store = Arc::new(CountingStore::new());
    let replier = RecordingReplier::new();
    let sink = CapturingSink::default();
    let dispatcher = sample_bot(store.clone(), &replier, &sink);

    let result = dispatcher.route(5, "/start", &()).await.unwrap();
    assert!(result.is_terminal());
    assert_eq!(replier.last_text().as_deref(), Some(WELCOME_TEXT));
    assert_eq!(store.puts() + store.creates(), 0);
    assert_eq!(store.clears(), 1);
}

#[tokio::test]
async fn test_start_mid_registration_discards_progress() {
    let store = Arc::new(InMemoryContextStore::new());
    let replier = RecordingReplier::new();
    let sink = CapturingSink::default();
    let dispatcher = sample_bot(store.clone(), &replier, &sink);

    dispatcher.route(8, "/register", &()).await.unwrap();
    dispatcher.route(8, "Ali", &()).await.unwrap();
    assert_eq!(store.get_active(8).await.unwrap().unwrap().step(), 2);

    let result = dispatcher.route(8, "/start", &()).await.unwrap();
    assert!(result.is_terminal());
    assert!(store.get_active(8).await.unwrap().is_none());

    // the next message has nothing to continue
    let result = dispatcher.route(8, "Veli", &()).await.unwrap();
    assert_eq!(result.unhandled_reason(), Some("no active choice"));
    assert!(sink.registrations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_help_mid_registration_keeps_progress() {
    let store = Arc::new(InMemoryContextStore::new());
    let replier = RecordingReplier::new();
    let sink = CapturingSink::default();
    let dispatcher = sample_bot(store.clone(), &replier, &sink);

    dispatcher.route(3, "/register", &()).await.unwrap();
    dispatcher.route(3, "Ali", &()).await.unwrap();
    dispatcher.route(3, "/help", &()).await.unwrap();

    let context = store.get_active(3).await.unwrap().unwrap();
    assert_eq!(context.track_name(), "register");
    assert_eq!(context.step(), 2);

    dispatcher.route(3, "Veli", &()).await.unwrap();
    assert_eq!(store.get_active(3).await.unwrap().unwrap().step(), 3);
}
