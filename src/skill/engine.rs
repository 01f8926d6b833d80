//! DialogEngine — decides what the skill says on each turn.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::intent::{self, Intent};
use super::oracle::{PredictionFeatures, PredictionOracle};
use super::protocol::{Button, ResponseBody};
use super::state::{DialogStage, SessionRecord};
use super::store::SessionStore;
use super::texts;
use crate::error::{Result, SessionError};

/// One inbound turn, stripped down to what the engine reads.
#[derive(Debug, Clone)]
pub struct Turn {
    pub user_id: String,
    /// The platform flagged this as the first turn of a session.
    pub is_new: bool,
    pub tokens: Vec<String>,
}

impl Turn {
    pub fn new(user_id: impl Into<String>, is_new: bool, tokens: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_new,
            tokens,
        }
    }
}

/// What the skill answers on a turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogReply {
    pub text: String,
    pub buttons: Option<Vec<Button>>,
    pub end_session: bool,
}

impl DialogReply {
    fn say(text: impl Into<String>, buttons: Vec<Button>) -> Self {
        Self {
            text: text.into(),
            buttons: Some(buttons),
            end_session: false,
        }
    }

    /// Write this reply into a response body.
    pub fn apply_to(self, body: &mut ResponseBody) {
        body.text = self.text;
        body.buttons = self.buttons;
        body.end_session = self.end_session;
    }
}

/// Session-state dialog handler.
///
/// With an oracle attached, "да" triggers a prediction; without one, "да"
/// just ends the session.
pub struct DialogEngine {
    store: Arc<dyn SessionStore>,
    oracle: Option<Arc<dyn PredictionOracle>>,
}

impl DialogEngine {
    pub fn new(store: Arc<dyn SessionStore>, oracle: Option<Arc<dyn PredictionOracle>>) -> Self {
        Self { store, oracle }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn oracle(&self) -> Option<&Arc<dyn PredictionOracle>> {
        self.oracle.as_ref()
    }

    /// Process one turn.
    ///
    /// Fails with [`SessionError::NotFound`] when a non-new turn arrives for a
    /// user without a record, and with a prediction error when the oracle
    /// rejects its input. Neither is recovered from.
    pub async fn handle_turn(&self, turn: &Turn) -> Result<DialogReply> {
        if turn.is_new {
            self.store
                .put(&turn.user_id, SessionRecord::new(&turn.user_id))
                .await;
            info!(user_id = %turn.user_id, "New session started");
            return Ok(DialogReply::say(texts::START_TEXT, texts::standard_buttons()));
        }

        let mut record = self
            .store
            .get(&turn.user_id)
            .await
            .ok_or_else(|| SessionError::NotFound {
                user_id: turn.user_id.clone(),
            })?;

        if record.session_started {
            warn!(user_id = %turn.user_id, stage = %record.stage, "Turn past confirmation has no handler");
            return Ok(DialogReply::say(texts::FALLBACK_TEXT, texts::reduced_buttons()));
        }

        let intent = Intent::classify(&turn.tokens);
        debug!(user_id = %turn.user_id, %intent, stage = %record.stage, "Intent classified");

        let reply = match intent {
            Intent::Help => DialogReply::say(texts::HELP_TEXT, texts::standard_buttons()),
            Intent::Approval => self.approve(&record, &turn.tokens)?,
            Intent::Rejection => DialogReply {
                text: texts::FAREWELL_TEXT.to_string(),
                buttons: None,
                end_session: true,
            },
            Intent::Unrecognized => {
                DialogReply::say(texts::FALLBACK_TEXT, texts::reduced_buttons())
            }
        };

        if reply.end_session {
            if let Err(e) = record.transition(DialogStage::Ended) {
                warn!(user_id = %turn.user_id, "{e}");
            }
            self.store.put(&turn.user_id, record).await;
            info!(user_id = %turn.user_id, %intent, "Session ended");
        }

        Ok(reply)
    }

    fn approve(&self, record: &SessionRecord, tokens: &[String]) -> Result<DialogReply> {
        let Some(oracle) = &self.oracle else {
            return Ok(DialogReply {
                end_session: true,
                ..Default::default()
            });
        };

        // Nothing collects these fields yet, so this normally predicts on
        // an all-unset vector.
        let features = PredictionFeatures::from_record(record);
        if features.is_empty() {
            debug!(user_id = %record.user_id, "Predicting without collected measurements");
        }
        let predisposed = oracle.predict(&features)?;
        info!(
            user_id = %record.user_id,
            oracle = oracle.name(),
            predisposed,
            "Prediction made"
        );

        let mut reply = DialogReply::say(texts::prediction_text(predisposed), texts::standard_buttons());
        // The restart question is answered by the same utterance that asked
        // for the prediction.
        if intent::is_approval(tokens) {
            reply.end_session = true;
        }
        Ok(reply)
    }
}
