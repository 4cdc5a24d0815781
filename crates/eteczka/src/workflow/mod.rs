//! The upload wizard: steps, guards and the reducer that owns all state.
//!
//! [`WorkflowState::apply`] is the only place state changes. Stages never
//! touch each other's data; they produce [`WorkflowAction`]s that the
//! reducer validates against the current step and applies. The async
//! [`UploadWorkflow`] façade wires the stages together and publishes
//! [`WorkflowSnapshot`]s through a watch channel.

mod action;
mod events;
mod orchestrator;
mod snapshot;
mod state;
mod step;


pub use action::WorkflowAction;
pub use events::WorkflowEvent;
pub use orchestrator::UploadWorkflow;
pub use snapshot::WorkflowSnapshot;
pub use state::WorkflowState;
pub use step::{step_progress, StepStatus, WorkflowStep};
