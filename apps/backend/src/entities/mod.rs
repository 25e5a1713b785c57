pub mod action_code;
pub mod execution_batches;
pub mod games;
pub mod period_steps;

pub use action_code::ActionCode;
pub use execution_batches::Entity as ExecutionBatches;
pub use execution_batches::Model as ExecutionBatch;
pub use games::Entity as Games;
pub use games::Model as Game;
pub use period_steps::Entity as PeriodSteps;
pub use period_steps::Model as PeriodStep;
