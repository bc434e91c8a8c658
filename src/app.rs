use crate::db::IdeaStore;
use crate::form::{FormAction, IdeaForm};
use crate::idea::{FieldKey, Idea};
use crate::messages::{StoreChannels, StoreEvent};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Which overlay is drawn on top of the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Form,
    Detail,
}

/// Load state of the gallery list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

/// Detail overlay state machine: `Idle -> Loading -> {Loaded, Error}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Idle,
    Loading { id: i64 },
    Loaded(Box<Idea>),
    Error { id: i64, message: String },
}

impl DetailState {
    /// Identifier the overlay is showing, if any.
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Idle => None,
            Self::Loading { id } | Self::Error { id, .. } => Some(*id),
            Self::Loaded(idea) => Some(idea.id),
        }
    }
}

/// Width of one gallery card including its gap.
pub const CARD_WIDTH: u16 = 36;
pub const MAX_COLUMNS: usize = 3;

/// Main application state.
pub struct App {
    store: Arc<dyn IdeaStore>,
    events_tx: UnboundedSender<StoreEvent>,
    events_rx: UnboundedReceiver<StoreEvent>,

    pub should_quit: bool,
    pub show_help: bool,
    pub overlay: Overlay,

    // Gallery state
    pub ideas: Vec<Idea>,
    pub gallery_status: LoadStatus,
    pub selected: usize,
    pub columns: usize,
    list_generation: u64,
    // Records appended while a list request was in flight
    appended_since_load: Vec<Idea>,

    // Submission form state
    pub form: IdeaForm,
    insert_generation: u64,

    // Detail overlay state
    pub detail: DetailState,
    pub detail_scroll: u16,
    detail_generation: u64,
    detail_task: Option<JoinHandle<()>>,

    // Status message
    pub status_msg: String,
}

impl App {
    pub fn new(store: Arc<dyn IdeaStore>) -> Self {
        let StoreChannels { tx, rx } = StoreChannels::new();
        Self {
            store,
            events_tx: tx,
            events_rx: rx,

            should_quit: false,
            show_help: false,
            overlay: Overlay::None,

            ideas: Vec::new(),
            gallery_status: LoadStatus::Loading,
            selected: 0,
            columns: 1,
            list_generation: 0,
            appended_since_load: Vec::new(),

            form: IdeaForm::new(),
            insert_generation: 0,

            detail: DetailState::Idle,
            detail_scroll: 0,
            detail_generation: 0,
            detail_task: None,

            status_msg: String::new(),
        }
    }

    /// Request the full list. The response replaces `ideas` wholesale.
    pub fn load_ideas(&mut self) {
        self.list_generation += 1;
        self.appended_since_load.clear();
        self.gallery_status = LoadStatus::Loading;
        self.status_msg = "Loading ideas...".to_string();

        let store = Arc::clone(&self.store);
        let tx = self.events_tx.clone();
        let generation = self.list_generation;
        tokio::spawn(async move {
            let result = store.list().await;
            let _ = tx.send(StoreEvent::IdeasLoaded { generation, result });
        });
    }

    /// Update the grid column count from the terminal width.
    pub fn update_columns(&mut self, width: u16) {
        self.columns = usize::from(width / CARD_WIDTH).clamp(1, MAX_COLUMNS);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.ideas.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let target = self.selected + self.columns;
        if target < self.ideas.len() {
            self.selected = target;
        }
    }

    pub fn select_up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    /// Append a record to the in-memory gallery.
    pub fn add_record(&mut self, idea: Idea) {
        if self.gallery_status == LoadStatus::Loading {
            self.appended_since_load.push(idea.clone());
        }
        self.ideas.push(idea);
    }

    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    pub fn open_form(&mut self) {
        self.overlay = Overlay::Form;
        self.status_msg.clear();
    }

    /// Close the form, discarding whatever was typed.
    pub fn close_form(&mut self) {
        if !self.form.draft().is_empty() {
            tracing::debug!("discarding form input");
        }
        self.reset_form();
        if self.overlay == Overlay::Form {
            self.overlay = Overlay::None;
        }
    }

    pub fn handle_form_action(&mut self, action: FormAction) {
        match action {
            FormAction::Submit => {
                self.submit_form();
            }
            FormAction::Cancel => self.close_form(),
        }
    }

    /// Send the form values to the store. Returns whether a request went out.
    pub fn submit_form(&mut self) -> bool {
        if self.form.submitting {
            return false;
        }
        if self.form.draft().title_is_blank() {
            self.form.error = Some("Title is required".to_string());
            self.form.focus(FieldKey::Title);
            return false;
        }

        self.insert_generation += 1;
        self.form.submitting = true;
        self.form.error = None;

        let store = Arc::clone(&self.store);
        let tx = self.events_tx.clone();
        let generation = self.insert_generation;
        let draft = self.form.draft().clone();
        tokio::spawn(async move {
            let result = store.insert(draft.clone()).await;
            let _ = tx.send(StoreEvent::Inserted {
                generation,
                draft,
                result,
            });
        });
        true
    }

    /// Open the detail overlay for the card under the cursor.
    pub fn open_selected(&mut self) {
        if let Some(id) = self.ideas.get(self.selected).map(|idea| idea.id) {
            self.select_id(Some(id));
        }
    }

    /// Point the detail overlay at `id`, or clear it with `None`.
    ///
    /// Every call starts a new generation, so a response for an earlier id is
    /// dropped when it arrives. The superseded fetch is also aborted.
    pub fn select_id(&mut self, id: Option<i64>) {
        self.detail_generation += 1;
        if let Some(task) = self.detail_task.take() {
            task.abort();
        }
        self.detail_scroll = 0;

        match id {
            Some(id) => {
                self.detail = DetailState::Loading { id };
                self.overlay = Overlay::Detail;

                let store = Arc::clone(&self.store);
                let tx = self.events_tx.clone();
                let generation = self.detail_generation;
                self.detail_task = Some(tokio::spawn(async move {
                    let result = store.get(id).await;
                    let _ = tx.send(StoreEvent::DetailLoaded {
                        generation,
                        id,
                        result,
                    });
                }));
            }
            None => {
                self.detail = DetailState::Idle;
                if self.overlay == Overlay::Detail {
                    self.overlay = Overlay::None;
                }
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.select_id(None);
    }

    /// Apply every store result that has arrived since the last tick.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    pub fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::IdeasLoaded { generation, result } => {
                if generation != self.list_generation {
                    tracing::debug!(generation, "discarding stale list response");
                    return;
                }
                match result {
                    Ok(mut ideas) => {
                        tracing::info!(count = ideas.len(), "loaded ideas");
                        // The response may predate inserts that finished meanwhile.
                        for appended in self.appended_since_load.drain(..) {
                            if !ideas.iter().any(|i| i.id == appended.id) {
                                ideas.push(appended);
                            }
                        }
                        self.ideas = ideas;
                        self.selected = self.selected.min(self.ideas.len().saturating_sub(1));
                        self.gallery_status = LoadStatus::Loaded;
                        self.status_msg = format!("{} ideas loaded", self.ideas.len());
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "error fetching ideas");
                        self.appended_since_load.clear();
                        self.gallery_status = LoadStatus::Failed(e.user_message());
                        self.status_msg = format!("Could not load ideas: {}", e.user_message());
                    }
                }
            }
            StoreEvent::Inserted {
                generation,
                draft,
                result,
            } => {
                // False when the form was cancelled (and maybe reused) meanwhile.
                let pending = self.form.submitting && generation == self.insert_generation;
                match result {
                    Ok(stored) => {
                        tracing::info!(id = stored.id, "idea submitted");
                        let idea = draft.into_idea(stored.id, stored.created_at);
                        self.status_msg = format!("Submitted \"{}\"", idea.title);
                        self.add_record(idea);
                        if pending {
                            self.reset_form();
                            if self.overlay == Overlay::Form {
                                self.overlay = Overlay::None;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "error submitting idea");
                        if pending {
                            self.form.submitting = false;
                            self.form.error = Some(e.user_message());
                        } else {
                            self.status_msg = format!("Submit failed: {}", e.user_message());
                        }
                    }
                }
            }
            StoreEvent::DetailLoaded {
                generation,
                id,
                result,
            } => {
                if generation != self.detail_generation {
                    tracing::debug!(id, generation, "discarding stale detail response");
                    return;
                }
                self.detail_task = None;
                self.detail = match result {
                    Ok(idea) => DetailState::Loaded(Box::new(idea)),
                    Err(e) => {
                        tracing::error!(id, error = %e, "error fetching idea");
                        DetailState::Error {
                            id,
                            message: e.user_message(),
                        }
                    }
                };
            }
        }
    }

    pub fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    pub fn scroll_page_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(10);
    }

    pub fn scroll_page_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(10);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::DbError;
    use crate::idea::{FIELDS, IdeaDraft};
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// In-memory table with failure switches and per-id gates.
    #[derive(Default)]
    pub(crate) struct FakeStore {
        pub rows: Mutex<Vec<Idea>>,
        next_id: AtomicI64,
        pub inserts: AtomicUsize,
        pub lists: AtomicUsize,
        pub fail_list: AtomicBool,
        pub fail_insert: AtomicBool,
        gates: Mutex<HashMap<i64, Arc<Notify>>>,
    }

    impl FakeStore {
        pub fn with_rows(rows: Vec<Idea>) -> Self {
            let next = rows.iter().map(|r| r.id).max().unwrap_or(0);
            let store = Self::default();
            *store.rows.lock().unwrap() = rows;
            store.next_id.store(next, Ordering::SeqCst);
            store
        }

        /// Hold `get(id)` until the returned handle is notified.
        pub fn gate(&self, id: i64) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.gates.lock().unwrap().insert(id, Arc::clone(&gate));
            gate
        }
    }

    #[async_trait]
    impl IdeaStore for FakeStore {
        async fn list(&self) -> Result<Vec<Idea>, DbError> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(DbError::Api {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn insert(&self, draft: IdeaDraft) -> Result<Idea, DbError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if self.fail_insert.load(Ordering::SeqCst) {
                return Err(DbError::Api {
                    status: 500,
                    body: "insert failed".to_string(),
                });
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let idea = draft.into_idea(id, None);
            self.rows.lock().unwrap().push(idea.clone());
            Ok(idea)
        }

        async fn get(&self, id: i64) -> Result<Idea, DbError> {
            let gate = self.gates.lock().unwrap().get(&id).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or(DbError::NotFound(id))
        }
    }

    pub(crate) fn idea(id: i64, title: &str) -> Idea {
        Idea {
            id,
            title: title.to_string(),
            ..Idea::default()
        }
    }

    fn app_with(store: &Arc<FakeStore>) -> App {
        App::new(Arc::clone(store) as Arc<dyn IdeaStore>)
    }

    fn type_into(app: &mut App, key: FieldKey, text: &str) {
        app.form.focus(key);
        for c in text.chars() {
            app.form
                .handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    async fn settle(app: &mut App) {
        let event = tokio::time::timeout(Duration::from_secs(5), app.events_rx.recv())
            .await
            .expect("store event timed out")
            .expect("channel closed");
        app.apply(event);
    }

    #[tokio::test]
    async fn test_load_ideas() {
        let store = Arc::new(FakeStore::with_rows(vec![idea(1, "A"), idea(2, "B")]));
        let mut app = app_with(&store);

        app.load_ideas();
        assert_eq!(app.gallery_status, LoadStatus::Loading);
        settle(&mut app).await;

        assert_eq!(app.gallery_status, LoadStatus::Loaded);
        assert_eq!(app.ideas.len(), 2);
        assert_eq!(app.status_msg, "2 ideas loaded");
    }

    #[tokio::test]
    async fn test_list_failure_leaves_gallery_empty_with_visible_status() {
        let store = Arc::new(FakeStore::with_rows(vec![idea(1, "A")]));
        store.fail_list.store(true, Ordering::SeqCst);
        let mut app = app_with(&store);

        app.load_ideas();
        settle(&mut app).await;

        assert!(app.ideas.is_empty());
        assert!(matches!(app.gallery_status, LoadStatus::Failed(_)));
        assert!(app.status_msg.starts_with("Could not load ideas"));
    }

    #[tokio::test]
    async fn test_stale_list_reload_is_discarded() {
        let store = Arc::new(FakeStore::with_rows(vec![idea(1, "A")]));
        let mut app = app_with(&store);

        app.load_ideas();
        app.load_ideas();
        app.apply(StoreEvent::IdeasLoaded {
            generation: 1,
            result: Ok(vec![idea(9, "old")]),
        });
        assert!(app.ideas.is_empty());
        assert_eq!(app.gallery_status, LoadStatus::Loading);

        // Both real responses arrive; only the second one counts.
        settle(&mut app).await;
        settle(&mut app).await;
        assert_eq!(app.ideas, vec![idea(1, "A")]);
    }

    #[tokio::test]
    async fn test_blank_title_sends_nothing() {
        let store = Arc::new(FakeStore::with_rows(vec![idea(1, "A")]));
        let mut app = app_with(&store);
        app.ideas = store.rows.lock().unwrap().clone();

        app.open_form();
        type_into(&mut app, FieldKey::Title, "   ");
        type_into(&mut app, FieldKey::Genre, "Puzzle");
        assert!(!app.submit_form());

        tokio::task::yield_now().await;
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
        assert_eq!(app.ideas.len(), 1);
        assert_eq!(app.overlay, Overlay::Form);
        assert_eq!(app.form.error.as_deref(), Some("Title is required"));
        assert_eq!(app.form.focused().key, FieldKey::Title);
        assert_eq!(app.form.draft().get(FieldKey::Genre), "Puzzle");
    }

    #[tokio::test]
    async fn test_submit_then_open_detail_example() {
        let store = Arc::new(FakeStore::default());
        let mut app = app_with(&store);
        app.load_ideas();
        settle(&mut app).await;

        app.open_form();
        type_into(&mut app, FieldKey::Title, "Puzzle Quest");
        type_into(&mut app, FieldKey::Genre, "Puzzle");
        assert!(app.submit_form());
        assert!(app.form.submitting);
        assert!(!app.submit_form(), "second submit while in flight");
        settle(&mut app).await;

        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
        assert_eq!(app.ideas.len(), 1);
        assert_eq!(app.ideas[0].title, "Puzzle Quest");
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.form.draft().is_empty());
        assert!(!app.form.submitting);

        app.selected = 0;
        app.open_selected();
        assert_eq!(app.overlay, Overlay::Detail);
        assert_eq!(app.detail, DetailState::Loading { id: app.ideas[0].id });
        settle(&mut app).await;

        let DetailState::Loaded(loaded) = &app.detail else {
            panic!("expected loaded, got {:?}", app.detail);
        };
        assert_eq!(loaded.display_value(FieldKey::Genre), Some("Puzzle"));
        for spec in FIELDS.iter().skip(2) {
            assert_eq!(loaded.display_value(spec.key), None, "{} should be empty", spec.label);
        }
    }

    #[tokio::test]
    async fn test_insert_failure_keeps_form_and_values() {
        let store = Arc::new(FakeStore::default());
        store.fail_insert.store(true, Ordering::SeqCst);
        let mut app = app_with(&store);

        app.open_form();
        type_into(&mut app, FieldKey::Title, "Star Farmer");
        type_into(&mut app, FieldKey::Notes, "cozy");
        assert!(app.submit_form());
        settle(&mut app).await;

        assert!(app.ideas.is_empty());
        assert_eq!(app.overlay, Overlay::Form);
        assert!(!app.form.submitting);
        assert!(app.form.error.is_some());
        assert_eq!(app.form.draft().get(FieldKey::Title), "Star Farmer");
        assert_eq!(app.form.draft().get(FieldKey::Notes), "cozy");
    }

    #[tokio::test]
    async fn test_cancel_discards_input() {
        let store = Arc::new(FakeStore::default());
        let mut app = app_with(&store);

        app.open_form();
        type_into(&mut app, FieldKey::Title, "Draft");
        type_into(&mut app, FieldKey::Story, "Once upon");
        app.handle_form_action(FormAction::Cancel);
        assert_eq!(app.overlay, Overlay::None);

        app.open_form();
        assert_eq!(app.overlay, Overlay::Form);
        assert!(app.form.draft().is_empty());
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_during_submit_still_records_success() {
        let store = Arc::new(FakeStore::default());
        let mut app = app_with(&store);

        app.open_form();
        type_into(&mut app, FieldKey::Title, "First");
        assert!(app.submit_form());
        app.close_form();

        // User reopens and starts typing something else.
        app.open_form();
        type_into(&mut app, FieldKey::Title, "Second");
        settle(&mut app).await;

        assert_eq!(app.ideas.len(), 1);
        assert_eq!(app.ideas[0].title, "First");
        assert_eq!(app.overlay, Overlay::Form);
        assert_eq!(app.form.draft().get(FieldKey::Title), "Second");
    }

    #[tokio::test]
    async fn test_cancel_during_failed_submit_reports_in_status_bar() {
        let store = Arc::new(FakeStore::default());
        store.fail_insert.store(true, Ordering::SeqCst);
        let mut app = app_with(&store);

        app.open_form();
        type_into(&mut app, FieldKey::Title, "First");
        assert!(app.submit_form());
        app.close_form();

        app.open_form();
        type_into(&mut app, FieldKey::Title, "Second");
        settle(&mut app).await;

        assert!(app.status_msg.starts_with("Submit failed"), "{}", app.status_msg);
        assert!(app.form.error.is_none());
        assert!(!app.form.submitting);
        assert_eq!(app.overlay, Overlay::Form);
        assert_eq!(app.form.draft().get(FieldKey::Title), "Second");
        assert!(app.ideas.is_empty());
    }

    #[tokio::test]
    async fn test_insert_survives_reload_that_predates_it() {
        let store = Arc::new(FakeStore::default());
        let mut app = app_with(&store);

        app.load_ideas();
        let list_generation = app.list_generation;
        app.open_form();
        type_into(&mut app, FieldKey::Title, "Puzzle Quest");
        let draft = app.form.draft().clone();
        assert!(app.submit_form());

        // The insert lands before a list snapshot taken without it.
        app.apply(StoreEvent::Inserted {
            generation: app.insert_generation,
            draft,
            result: Ok(idea(7, "Puzzle Quest")),
        });
        assert_eq!(app.ideas.len(), 1);
        app.apply(StoreEvent::IdeasLoaded {
            generation: list_generation,
            result: Ok(vec![idea(1, "A")]),
        });

        let titles: Vec<&str> = app.ideas.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "Puzzle Quest"]);
        assert_eq!(app.gallery_status, LoadStatus::Loaded);

        // A snapshot that already has the record does not duplicate it.
        app.load_ideas();
        let list_generation = app.list_generation;
        app.add_record(idea(8, "Star Farmer"));
        app.apply(StoreEvent::IdeasLoaded {
            generation: list_generation,
            result: Ok(vec![idea(1, "A"), idea(7, "Puzzle Quest"), idea(8, "Star Farmer")]),
        });
        assert_eq!(app.ideas.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_id_renders_error_state() {
        let store = Arc::new(FakeStore::with_rows(vec![idea(1, "A")]));
        let mut app = app_with(&store);

        app.select_id(Some(404));
        settle(&mut app).await;

        assert!(matches!(app.detail, DetailState::Error { id: 404, .. }));
        assert_eq!(app.overlay, Overlay::Detail);
    }

    #[tokio::test]
    async fn test_switching_id_never_shows_stale_data() {
        let store = Arc::new(FakeStore::with_rows(vec![idea(1, "A"), idea(2, "B")]));
        let gate_a = store.gate(1);
        let mut app = app_with(&store);

        app.select_id(Some(1));
        app.select_id(Some(2));
        settle(&mut app).await;

        let DetailState::Loaded(shown) = &app.detail else {
            panic!("expected loaded, got {:?}", app.detail);
        };
        assert_eq!(shown.id, 2);
        assert_eq!(shown.title, "B");

        // A late answer for the first id is ignored even if it gets through.
        app.apply(StoreEvent::DetailLoaded {
            generation: 1,
            id: 1,
            result: Ok(idea(1, "A")),
        });
        assert_eq!(app.detail.id(), Some(2));

        gate_a.notify_one();
        tokio::task::yield_now().await;
        assert_eq!(app.drain_events(), 0, "first fetch was aborted");
        assert_eq!(app.detail.id(), Some(2));
    }

    #[tokio::test]
    async fn test_clearing_id_returns_to_idle() {
        let store = Arc::new(FakeStore::with_rows(vec![idea(1, "A")]));
        let gate = store.gate(1);
        let mut app = app_with(&store);

        app.select_id(Some(1));
        app.close_detail();
        assert_eq!(app.detail, DetailState::Idle);
        assert_eq!(app.overlay, Overlay::None);

        gate.notify_one();
        tokio::task::yield_now().await;
        app.drain_events();
        assert_eq!(app.detail, DetailState::Idle);
    }

    #[tokio::test]
    async fn test_grid_navigation() {
        let store = Arc::new(FakeStore::default());
        let mut app = app_with(&store);
        app.ideas = (1..=7).map(|i| idea(i, "x")).collect();
        app.update_columns(CARD_WIDTH * 3 + 5);
        assert_eq!(app.columns, 3);

        app.select_down();
        assert_eq!(app.selected, 3);
        app.select_down();
        assert_eq!(app.selected, 6);
        app.select_down();
        assert_eq!(app.selected, 6);
        app.select_next();
        assert_eq!(app.selected, 6);
        app.select_up();
        app.select_prev();
        assert_eq!(app.selected, 2);

        app.update_columns(10);
        assert_eq!(app.columns, 1);
        app.update_columns(u16::MAX);
        assert_eq!(app.columns, MAX_COLUMNS);
    }

    fn run<F: std::future::Future<Output = ()>>(future: F) {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future);
    }

    proptest! {
        #[test]
        fn prop_submit_adds_exactly_one_matching_entry(
            title in "[A-Za-z0-9][A-Za-z0-9 ]{0,20}",
            rest in proptest::collection::vec("[a-z ]{0,12}", FIELDS.len() - 1),
            existing in 0usize..4,
        ) {
            run(async move {
                let rows = (1..=existing as i64).map(|i| idea(i, "old")).collect();
                let store = Arc::new(FakeStore::with_rows(rows));
                let mut app = app_with(&store);
                app.load_ideas();
                settle(&mut app).await;

                app.open_form();
                type_into(&mut app, FieldKey::Title, &title);
                for (spec, value) in FIELDS.iter().skip(1).zip(&rest) {
                    type_into(&mut app, spec.key, value);
                }
                assert!(app.submit_form());
                settle(&mut app).await;

                assert_eq!(app.ideas.len(), existing + 1);
                let added = app.ideas.last().unwrap();
                assert_eq!(added.title, title);
                for (spec, value) in FIELDS.iter().skip(1).zip(&rest) {
                    let expected = if value.trim().is_empty() { None } else { Some(value.as_str()) };
                    assert_eq!(added.display_value(spec.key), expected);
                }
            });
        }

        #[test]
        fn prop_blank_title_never_inserts(title in "[ \t]{0,6}", genre in "[a-z]{0,8}") {
            run(async move {
                let store = Arc::new(FakeStore::default());
                let mut app = app_with(&store);
                app.open_form();
                type_into(&mut app, FieldKey::Title, &title);
                type_into(&mut app, FieldKey::Genre, &genre);
                assert!(!app.submit_form());
                tokio::task::yield_now().await;
                assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
                assert!(app.ideas.is_empty());
            });
        }
    }
}
