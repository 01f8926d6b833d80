//! Webhook JSON protocol — the few request fields the skill consumes and the
//! response envelope it returns.

use serde::{Deserialize, Serialize};

/// Inbound webhook payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookRequest {
    pub session: SessionInfo,
    pub version: String,
    pub request: UserRequest,
}

/// Session block of the request. Fields the skill does not read are kept in
/// `extra` so the whole block can be echoed back.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionInfo {
    pub user_id: String,
    pub new: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The user's utterance as the platform parsed it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserRequest {
    pub nlu: Nlu,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Nlu {
    /// Lowercase word tokens.
    pub tokens: Vec<String>,
}

/// A suggestion button shown under the reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Button {
    pub title: String,
    pub hide: bool,
}

impl Button {
    /// A button that disappears after the user taps it.
    pub fn hidden(title: &str) -> Self {
        Self {
            title: title.to_string(),
            hide: true,
        }
    }
}

/// Outbound webhook payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookResponse {
    pub session: SessionInfo,
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResponseBody {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
    pub end_session: bool,
}

impl WebhookResponse {
    /// Skeleton response for a request: session and version echoed,
    /// `end_session` false, no text yet.
    pub fn skeleton(request: &WebhookRequest) -> Self {
        Self {
            session: request.session.clone(),
            version: request.version.clone(),
            response: ResponseBody::default(),
        }
    }
}
