//! Editing session: language, source, test cases, last results.
//!
//! [`Session`] is shared by every trigger (REPL command, keyboard shortcut),
//! so its API takes `&self`. State sits behind a mutex that is never held
//! across the network call; the in-flight flag is a separate atomic so a
//! second [`Session::run`] can be refused while the first is awaiting.

use anyhow::{Result, bail};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::cases::TestCases;
use crate::client::{ExecutionClient, ExecutionOutcome};
use crate::consts::{CODE_KEY, LANGUAGE_KEY};
use crate::events::EventBus;
use crate::keymap::RunShortcut;
use crate::languages::{self, Language, LanguageRecord};
use crate::store::{KvStore, Persistent};

/// What a call to [`Session::run`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed(ExecutionOutcome),
    /// Nothing to run.
    EmptySource,
    /// Another run is still outstanding; this one was dropped.
    AlreadyRunning,
}

struct State {
    language: &'static Language,
    code: String,
    cases: TestCases,
    results: Vec<String>,
}

/// Holds the in-flight flag for the lifetime of one run.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Session {
    client: ExecutionClient,
    code_cell: Persistent<String>,
    language_cell: Persistent<LanguageRecord>,
    state: Mutex<State>,
    running: AtomicBool,
    shortcut: Mutex<Option<RunShortcut>>,
}

impl Session {
    /// Restore language and code from `store`, falling back to the catalog
    /// default. The resolved values are written back, so a missing or
    /// corrupt entry is replaced by what the session shows. Test cases and
    /// results always start fresh.
    pub fn new(client: ExecutionClient, store: Arc<dyn KvStore>) -> Self {
        let code_cell = Persistent::new(store.clone(), CODE_KEY);
        let language_cell = Persistent::new(store, LANGUAGE_KEY);

        let language =
            languages::resolve(&language_cell.read(languages::default_language().into()));
        let code = code_cell.read(language.boilerplate.to_string());
        debug!(language = language.id, "session restored");

        let session = Self {
            client,
            code_cell,
            language_cell,
            state: Mutex::new(State {
                language,
                code: code.clone(),
                cases: TestCases::new(),
                results: Vec::new(),
            }),
            running: AtomicBool::new(false),
            shortcut: Mutex::new(None),
        };
        session.persist_language(language);
        session.persist_code(&code);
        session
    }

    pub fn language(&self) -> &'static Language {
        self.state.lock().unwrap().language
    }

    pub fn code(&self) -> String {
        self.state.lock().unwrap().code.clone()
    }

    /// The source as last persisted, or empty if the stored value is
    /// missing or unreadable.
    pub fn saved_code(&self) -> String {
        self.code_cell.read(String::new())
    }

    pub fn set_code(&self, code: impl Into<String>) {
        let code = code.into();
        self.persist_code(&code);
        self.state.lock().unwrap().code = code;
    }

    /// Switch language and replace the source with its boilerplate.
    /// Unsaved edits are discarded.
    pub fn select_language(&self, id: &str) -> Result<&'static Language> {
        let Some(language) = languages::find(id) else {
            bail!(
                "unknown language: {id} (expected one of: {})",
                languages::ids().join(", ")
            );
        };
        {
            let mut state = self.state.lock().unwrap();
            state.language = language;
            state.code = language.boilerplate.to_string();
        }
        self.persist_language(language);
        self.persist_code(language.boilerplate);
        info!(language = language.id, "language switched");
        Ok(language)
    }

    pub fn test_cases(&self) -> Vec<String> {
        self.state.lock().unwrap().cases.as_slice().to_vec()
    }

    pub fn add_test_case(&self) -> bool {
        self.state.lock().unwrap().cases.add()
    }

    pub fn remove_test_case(&self, index: usize) -> bool {
        self.state.lock().unwrap().cases.remove(index)
    }

    pub fn set_test_case(&self, index: usize, text: impl Into<String>) -> bool {
        self.state.lock().unwrap().cases.set(index, text)
    }

    /// Outputs of the last completed run, one per test case.
    pub fn results(&self) -> Vec<String> {
        self.state.lock().unwrap().results.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run the current source against every test case.
    ///
    /// Empty source is a no-op. A call made while another run is
    /// outstanding is dropped without contacting the service.
    pub async fn run(&self) -> RunStatus {
        let (api_id, code, inputs) = {
            let state = self.state.lock().unwrap();
            if state.code.is_empty() {
                debug!("run skipped: empty source");
                return RunStatus::EmptySource;
            }
            (
                state.language.api_id,
                state.code.clone(),
                state.cases.as_slice().to_vec(),
            )
        };

        let Some(_in_flight) = InFlight::acquire(&self.running) else {
            debug!("run skipped: already running");
            return RunStatus::AlreadyRunning;
        };

        self.state.lock().unwrap().results.clear();
        info!(language = api_id, cases = inputs.len(), "running");

        let outcome = self.client.execute(api_id, &code, &inputs).await;
        self.state.lock().unwrap().results = outcome.lines().to_vec();
        RunStatus::Completed(outcome)
    }

    /// Bind the run chord on `bus`. Returns false if already bound.
    pub fn install_shortcut(&self, bus: &EventBus) -> bool {
        let mut slot = self.shortcut.lock().unwrap();
        if slot.is_some() {
            return false;
        }
        *slot = Some(RunShortcut::install(bus));
        true
    }

    /// Unbind the run chord. Returns false if it was not bound.
    pub fn remove_shortcut(&self) -> bool {
        self.shortcut.lock().unwrap().take().is_some()
    }

    pub fn has_shortcut(&self) -> bool {
        self.shortcut.lock().unwrap().is_some()
    }

    /// Handle key events queued since the last pump. Any number of run
    /// chords in one batch start a single run.
    pub async fn pump_shortcuts(&self) -> Option<RunStatus> {
        let triggered = match self.shortcut.lock().unwrap().as_mut() {
            Some(shortcut) => shortcut.triggered(),
            None => 0,
        };
        if triggered == 0 {
            return None;
        }
        debug!(triggered, "run shortcut");
        Some(self.run().await)
    }

    fn persist_language(&self, language: &Language) {
        if let Err(e) = self.language_cell.write(&language.into()) {
            warn!(error = %e, "failed to persist language");
        }
    }

    fn persist_code(&self, code: &str) {
        if let Err(e) = self.code_cell.write(&code.to_string()) {
            warn!(error = %e, "failed to persist code");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::StubTransport;
    use crate::client::{FailureKind, ServerReply, TransportError};
    use crate::events::Event;
    use crate::keymap::KeyChord;
    use crate::store::sqlite::SqliteStore;

    fn session_with(stub: Arc<StubTransport>) -> Session {
        let store: Arc<dyn KvStore> = Arc::new(SqliteStore::in_memory().unwrap());
        Session::new(ExecutionClient::new(Box::new(stub), "k"), store)
    }

    #[test]
    fn fresh_session_uses_catalog_default() {
        let session = session_with(Arc::new(StubTransport::new(vec![])));
        assert_eq!(session.language().id, "python");
        assert_eq!(session.code(), languages::default_language().boilerplate);
        assert_eq!(session.test_cases(), [""]);
        assert!(session.results().is_empty());
        assert!(!session.is_running());
    }

    #[test]
    fn select_language_discards_edits() {
        let session = session_with(Arc::new(StubTransport::new(vec![])));
        session.set_code("my precious edits");
        session.select_language("go").unwrap();
        assert_eq!(session.code(), languages::find("go").unwrap().boilerplate);
        assert!(!session.code().contains("precious"));
    }

    #[test]
    fn unknown_language_is_rejected() {
        let session = session_with(Arc::new(StubTransport::new(vec![])));
        session.set_code("keep me");
        let err = session.select_language("brainfuck").unwrap_err();
        assert!(err.to_string().contains("python"));
        assert_eq!(session.code(), "keep me");
        assert_eq!(session.language().id, "python");
    }

    #[tokio::test]
    async fn run_stores_outputs() {
        let stub = Arc::new(StubTransport::new(vec![Ok(ServerReply::ok(vec![
            "a".to_string(),
            "b".to_string(),
        ]))]));
        let session = session_with(stub.clone());
        session.add_test_case();

        let status = session.run().await;
        assert!(matches!(status, RunStatus::Completed(ref o) if o.is_success()));
        assert_eq!(session.results(), ["a", "b"]);
        assert!(!session.is_running());

        let request = &stub.requests()[0];
        assert_eq!(request["language"], "Python");
        assert_eq!(request["inputs"], serde_json::json!(["", ""]));
        assert_eq!(request["key"], "k");
    }

    #[tokio::test]
    async fn failure_messages_become_results() {
        let stub = Arc::new(StubTransport::new(vec![Err(TransportError::Connect(
            "refused".to_string(),
        ))]));
        let session = session_with(stub);

        let status = session.run().await;
        assert!(matches!(
            status,
            RunStatus::Completed(ExecutionOutcome::Failure {
                kind: FailureKind::Transport,
                ..
            })
        ));
        assert_eq!(
            session.results(),
            ["Error: Could not connect to the execution service."]
        );
    }

    #[tokio::test]
    async fn empty_source_is_noop() {
        let stub = Arc::new(StubTransport::new(vec![]));
        let session = session_with(stub.clone());
        session.set_code("");

        assert_eq!(session.run().await, RunStatus::EmptySource);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn results_are_replaced_not_merged() {
        let stub = Arc::new(StubTransport::new(vec![
            Ok(ServerReply::ok(vec!["first".to_string(), "second".to_string()])),
            Ok(ServerReply::error("bad syntax")),
        ]));
        let session = session_with(stub);

        session.run().await;
        session.run().await;
        assert_eq!(session.results(), ["bad syntax"]);
    }

    #[tokio::test]
    async fn overlapping_run_is_dropped() {
        let stub = Arc::new(StubTransport::gated(vec![Ok(ServerReply::ok(vec![
            "done".to_string(),
        ]))]));
        let session = Arc::new(session_with(stub.clone()));

        let first = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.run().await }
        });
        while stub.in_flight() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(session.is_running());
        assert!(session.results().is_empty());

        assert_eq!(session.run().await, RunStatus::AlreadyRunning);
        assert_eq!(stub.calls(), 1);

        stub.release();
        let status = first.await.unwrap();
        assert!(matches!(status, RunStatus::Completed(_)));
        assert_eq!(stub.peak_in_flight(), 1);
        assert!(!session.is_running());
        assert_eq!(session.results(), ["done"]);
    }

    #[tokio::test]
    async fn abandoned_wait_still_stores_results() {
        let stub = Arc::new(StubTransport::gated(vec![Ok(ServerReply::ok(vec![
            "late".to_string(),
        ]))]));
        let session = Arc::new(session_with(stub.clone()));

        let handle = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.run().await }
        });
        while stub.in_flight() == 0 {
            tokio::task::yield_now().await;
        }

        // Stop waiting; the spawned run keeps going.
        let waited = tokio::time::timeout(std::time::Duration::from_millis(20), handle).await;
        assert!(waited.is_err());
        assert!(session.is_running());

        stub.release();
        while session.is_running() {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
        assert_eq!(session.results(), ["late"]);
        assert_eq!(stub.calls(), 1);
    }

    #[test]
    fn fresh_session_persists_what_it_shows() {
        let store: Arc<dyn KvStore> = Arc::new(SqliteStore::in_memory().unwrap());
        let client = ExecutionClient::new(Box::new(StubTransport::new(vec![])), "k");
        let session = Session::new(client, store.clone());

        assert_eq!(session.saved_code(), session.code());
        let record: LanguageRecord =
            serde_json::from_str(&store.get(LANGUAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(record.id, session.language().id);
    }

    #[test]
    fn corrupt_code_is_overwritten_on_restore() {
        let store: Arc<dyn KvStore> = Arc::new(SqliteStore::in_memory().unwrap());
        store.set(CODE_KEY, "{broken").unwrap();
        let client = ExecutionClient::new(Box::new(StubTransport::new(vec![])), "k");
        let session = Session::new(client, store);

        assert_eq!(session.code(), languages::default_language().boilerplate);
        assert_eq!(session.saved_code(), session.code());
    }

    #[test]
    fn shortcut_installs_once() {
        let bus = EventBus::default();
        let session = session_with(Arc::new(StubTransport::new(vec![])));
        assert!(session.install_shortcut(&bus));
        assert!(!session.install_shortcut(&bus));
        assert_eq!(bus.listener_count(), 1);

        assert!(session.remove_shortcut());
        assert!(!session.remove_shortcut());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn dropping_session_removes_shortcut() {
        let bus = EventBus::default();
        let session = session_with(Arc::new(StubTransport::new(vec![])));
        session.install_shortcut(&bus);
        drop(session);
        assert_eq!(bus.listener_count(), 0);
    }

    #[tokio::test]
    async fn shortcut_runs_once_per_batch() {
        let bus = EventBus::default();
        let stub = Arc::new(StubTransport::new(vec![Ok(ServerReply::ok(vec![
            "ok".to_string(),
        ]))]));
        let session = session_with(stub.clone());
        session.install_shortcut(&bus);

        assert!(session.pump_shortcuts().await.is_none());

        bus.emit(Event::Key(KeyChord::run()));
        bus.emit(Event::Key(KeyChord::run()));
        let status = session.pump_shortcuts().await;
        assert!(matches!(status, Some(RunStatus::Completed(_))));
        assert_eq!(stub.calls(), 1);
        assert!(session.pump_shortcuts().await.is_none());
    }

    #[tokio::test]
    async fn removed_shortcut_does_not_run() {
        let bus = EventBus::default();
        let stub = Arc::new(StubTransport::new(vec![]));
        let session = session_with(stub.clone());
        session.install_shortcut(&bus);
        session.remove_shortcut();

        bus.emit(Event::Key(KeyChord::run()));
        assert!(session.pump_shortcuts().await.is_none());
        assert_eq!(stub.calls(), 0);
    }
}
