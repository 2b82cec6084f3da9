//! List/create/update/delete against `/positions`.
//!
//! Writes never patch local state. Every successful mutation is followed by a
//! full `list()`, so the view always shows what the server last returned.

use std::sync::{Arc, Mutex};

use jrb_types::Position;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::SessionManager;
use crate::Confirm;

const LIST_FAILED: &str = "Failed to fetch positions";
const SAVE_FAILED: &str = "Save failed";
const DELETE_FAILED: &str = "Delete failed";
pub const DELETE_PROMPT: &str = "Delete this position?";

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ListState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<Position>),
    Failed(String),
}

impl ListState {
    /// A successful fetch that came back with nothing in it.
    pub fn is_empty(&self) -> bool {
        matches!(self, ListState::Loaded(list) if list.is_empty())
    }
}

/// Result of one controller operation, as far as the view cares.
///
/// For writes, `Done` means the server accepted the write. A failed reload
/// afterwards shows up as `ListState::Failed`, not here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The user declined the confirmation prompt. Nothing was sent.
    Cancelled,
    /// The session was cleared and the user sent back to login.
    SignedOut,
    Failed(String),
}

/// Contents of the create/edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionDraft {
    pub editing_id: Option<i64>,
    pub code: String,
    pub name: String,
}

impl PositionDraft {
    pub fn edit(position: &Position) -> Self {
        Self {
            editing_id: position.id,
            code: position.code.clone(),
            name: position.name.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn payload(&self) -> Position {
        Position::new(self.code.clone(), self.name.clone())
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Position"
        } else {
            "Create Position"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update"
        } else {
            "Create"
        }
    }
}

type Listener = Arc<dyn Fn(ListState) + Send + Sync>;

#[derive(Clone)]
pub struct PositionsController {
    api: ApiClient,
    session: SessionManager,
    confirm: Arc<dyn Confirm>,
    state: Arc<Mutex<ListState>>,
    listener: Option<Listener>,
}

impl PositionsController {
    pub fn new(api: ApiClient, session: SessionManager, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            api,
            session,
            confirm,
            state: Arc::new(Mutex::new(ListState::Idle)),
            listener: None,
        }
    }

    /// Registers a callback that receives every state transition.
    pub fn on_change(mut self, listener: impl Fn(ListState) + Send + Sync + 'static) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }

    pub fn state(&self) -> ListState {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    fn set_state(&self, next: ListState) {
        {
            let mut current = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = next.clone();
        }
        if let Some(listener) = &self.listener {
            listener(next);
        }
    }

    /// The bearer token, or the 401 path when there is none worth sending.
    fn bearer_or_expire(&self) -> Option<String> {
        let token = self.session.bearer();
        if token.is_none() {
            self.session.expire();
        }
        token
    }

    fn fail(&self, err: ApiError, fallback: &str) -> Outcome {
        match err {
            ApiError::AuthExpired => {
                self.session.expire();
                Outcome::SignedOut
            }
            other => Outcome::Failed(other.user_message(fallback)),
        }
    }

    pub async fn list(&self) -> Outcome {
        let Some(token) = self.bearer_or_expire() else {
            return Outcome::SignedOut;
        };

        self.set_state(ListState::Loading);
        match self.api.list_positions(&token).await {
            Ok(positions) => {
                debug!("loaded {} positions", positions.len());
                self.set_state(ListState::Loaded(positions));
                Outcome::Done
            }
            Err(ApiError::AuthExpired) => {
                self.set_state(ListState::Idle);
                self.session.expire();
                Outcome::SignedOut
            }
            Err(e) => {
                let message = e.user_message(LIST_FAILED);
                self.set_state(ListState::Failed(message.clone()));
                Outcome::Failed(message)
            }
        }
    }

    /// Refetches after an accepted write. Only a rejected session overrides
    /// the write's success.
    async fn reload_after_write(&self) -> Outcome {
        match self.list().await {
            Outcome::SignedOut => Outcome::SignedOut,
            _ => Outcome::Done,
        }
    }

    pub async fn create(&self, payload: &Position) -> Outcome {
        let Some(token) = self.bearer_or_expire() else {
            return Outcome::SignedOut;
        };

        match self.api.create_position(&token, payload).await {
            Ok(()) => {
                info!("created position {}", payload.code);
                self.reload_after_write().await
            }
            Err(e) => self.fail(e, SAVE_FAILED),
        }
    }

    pub async fn update(&self, id: i64, payload: &Position) -> Outcome {
        let Some(token) = self.bearer_or_expire() else {
            return Outcome::SignedOut;
        };

        match self.api.update_position(&token, id, payload).await {
            Ok(()) => {
                info!("updated position {id}");
                self.reload_after_write().await
            }
            Err(e) => self.fail(e, SAVE_FAILED),
        }
    }

    /// Asks for confirmation first. Declining sends nothing.
    pub async fn delete(&self, id: i64) -> Outcome {
        if !self.confirm.confirm(DELETE_PROMPT) {
            return Outcome::Cancelled;
        }

        let Some(token) = self.bearer_or_expire() else {
            return Outcome::SignedOut;
        };

        match self.api.delete_position(&token, id).await {
            Ok(()) => {
                info!("deleted position {id}");
                self.reload_after_write().await
            }
            Err(e) => self.fail(e, DELETE_FAILED),
        }
    }

    /// Create or update, depending on whether the draft is editing a row.
    pub async fn save(&self, draft: &PositionDraft) -> Outcome {
        let payload = draft.payload();
        match draft.editing_id {
            Some(id) => self.update(id, &payload).await,
            None => self.create(&payload).await,
        }
    }
}
