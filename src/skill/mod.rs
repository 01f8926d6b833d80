//! Diabotik skill — webhook dialog for a diabetes-predisposition check.
//!
//! A new session is greeted and asked whether to start. The following turn is
//! classified by keyword (help / yes / no) and either explains the skill,
//! runs the prediction oracle, says goodbye, or asks the user to repeat.

pub mod engine;
pub mod intent;
pub mod oracle;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod store;
pub mod texts;

pub use engine::{DialogEngine, DialogReply, Turn};
pub use intent::Intent;
pub use oracle::{LogisticOracle, ModelSnapshot, PredictionFeatures, PredictionOracle};
pub use protocol::{Button, ResponseBody, WebhookRequest, WebhookResponse};
pub use routes::{SkillState, SkillStatus, skill_routes};
pub use state::{DialogStage, SessionRecord};
pub use store::{InMemorySessionStore, SessionStore};
