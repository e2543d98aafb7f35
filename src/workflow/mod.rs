//! 流程层（Workflow）
//!
//! 选择 → 组合生成 → 批次切分 → 结果累加 → 进度播报
//!
//! `RunController` 串起整个流程，只通过 `AskBackend` 访问后端。

pub mod batch_scheduler;
pub mod combination;
pub mod progress;
pub mod result_accumulator;
pub mod run_controller;
pub mod selection;

pub use batch_scheduler::{batch_count, BatchRequest, BatchScheduler, BatchWindow};
pub use combination::{generate_combinations, Combination};
pub use progress::spawn_progress_logger;
pub use result_accumulator::ResultAccumulator;
pub use run_controller::{BatchError, RunController, RunOutcome, RunState};
pub use selection::SelectionState;
