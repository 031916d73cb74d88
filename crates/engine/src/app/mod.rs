mod grid;
mod input;
mod loop_runner;
mod scene;
mod signal;

pub use grid::{Grid, GridError, IVec2};
pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{
    plan_sim_steps, run_headless, ClockMode, InputSource, LoopConfig, LoopSummary, StepPlan,
    StopReason,
};
pub use scene::{Scene, SceneCommand};
pub use signal::{Signal, SubscriptionId};
