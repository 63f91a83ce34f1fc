//! Household budgeting wizard state: one persisted [`ApplicationState`],
//! its normalizer, and read-only summaries derived from it.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod presets;
pub mod storage;
pub mod store;
pub mod summary;
pub mod wizard;

pub use error::{AppError, AppResult};
pub use model::{ApplicationState, StatePatch};
pub use normalize::normalize;
pub use storage::{StorageHandle, STATE_STORAGE_KEY};
pub use store::{StateStore, SubscriptionId};
pub use summary::{build_tips, planner_summary, PlannerSummary};
pub use wizard::WizardForm;
