//! # Chatbot Analyzer
//!
//! 酒店聊天机器人分析工具：维护题库和酒店列表，把选中的问题分批发给后端，
//! 汇总每个酒店机器人的回答并导出报表
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 唯一与后端 HTTP API 打交道的地方
//! - `ApiClient` - 题库、酒店、提问、报表接口
//! - `AskBackend` - 提问能力的抽象，流程层只依赖它
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `QuestionService` / `HotelService` - 题库和酒店的增删改查
//! - `TranscriptWriter` - 写对话记录能力
//! - `ReportService` - 保存结果、生成报表能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次运行"的完整处理流程
//! - `SelectionState` - 问题和酒店的选择
//! - `generate_combinations` / `BatchScheduler` - 组合生成与分批
//! - `ResultAccumulator` - 结果累计
//! - `RunController` - 逐批发送、超时、进度、失败处理
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/analysis_runner` - 持有客户端，串起配置、服务和流程
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ApiClient, AskBackend};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnalysisResponse, AnalysisResult, AnalysisStatus, BatchProgress, Hotel};
pub use orchestrator::{App, RunOptions, RunSummary};
pub use workflow::{generate_combinations, BatchScheduler, RunController, RunOutcome, RunState};
