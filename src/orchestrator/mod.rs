//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次分析运行的调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (加载目录、应用选择、输出结果)
//!     ↓
//! workflow::RunController (组合 → 分批 → 顺序发送 → 累加)
//!     ↓
//! services (能力层：题库 / 酒店 / 记录 / 导出)
//!     ↓
//! clients (基础设施：ApiClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 ApiClient
//! 2. **向下依赖**：编排层 → workflow → services → clients
//! 3. **无批次逻辑**：只做调度和统计，批次细节在 workflow

pub mod analysis_runner;

pub use analysis_runner::{App, RunOptions, RunSummary};
