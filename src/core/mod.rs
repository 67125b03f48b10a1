pub mod message;
pub mod scenario;

pub use message::{clamp_column, PubSubPayload, ScenarioMessage, MAX_COLUMN, MIN_COLUMN};
pub use scenario::{MessageSample, Scenario};
