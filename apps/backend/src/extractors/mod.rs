pub mod actor;
pub mod validated_json;

pub use actor::ActorId;
pub use validated_json::ValidatedJson;
