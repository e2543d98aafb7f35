//! 分析运行器 - 编排层
//!
//! ## 职责
//!
//! 本模块是一次分析运行的入口，负责把配置、客户端、服务和流程串起来。
//!
//! ## 核心功能
//!
//! 1. **加载目录**：从后端获取问题和酒店列表，构建选择状态
//! 2. **应用选择**：按运行参数（或运行计划文件）选中问题和酒店
//! 3. **执行运行**：交给 `RunController` 逐批发送
//! 4. **实时记录**：每批结果到达后立即写入对话记录文件
//! 5. **导出结果**：保存结果 JSON（完整或部分），可选生成报表
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单批的细节
//! - **资源所有者**：唯一持有 `ApiClient` 的模块
//! - **向下委托**：批次逻辑全部在 workflow 层

use crate::clients::ApiClient;
use crate::config::Config;
use crate::error::ValidationError;
use crate::models::{find_chatbot, AnalysisResponse, RunPlan};
use crate::services::{load_results, ReportService, TranscriptWriter};
use crate::utils::logging;
use crate::workflow::{spawn_progress_logger, RunController, RunOutcome, SelectionState};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const DEFAULT_CHATBOT: &str = "asksuite";

/// 一次运行的参数
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// 聊天机器人 id，未指定时使用 `asksuite`
    pub chatbot: Option<String>,
    pub questions: Vec<String>,
    pub hotels: Vec<String>,
    pub all_questions: bool,
    pub all_hotels: bool,
    /// 覆盖配置中的批次大小
    pub batch_size: Option<usize>,
    /// 运行结束后生成报表
    pub report: bool,
}

impl RunOptions {
    pub fn chatbot_id(&self) -> &str {
        self.chatbot.as_deref().unwrap_or(DEFAULT_CHATBOT)
    }

    /// 合并运行计划，命令行中已给出的项优先
    pub fn merge_plan(mut self, plan: RunPlan) -> Self {
        self.chatbot = self.chatbot.or(plan.chatbot);
        if self.questions.is_empty() {
            self.questions = plan.questions;
        }
        if self.hotels.is_empty() {
            self.hotels = plan.hotels;
        }
        self.all_questions |= plan.all_questions;
        self.all_hotels |= plan.all_hotels;
        self.batch_size = self.batch_size.or(plan.batch_size);
        self
    }

    /// 把参数应用到选择状态上
    pub fn apply(&self, selection: &mut SelectionState) -> Result<(), ValidationError> {
        if self.all_questions {
            selection.select_all_questions();
        } else {
            selection.select_questions(&self.questions)?;
        }
        if self.all_hotels {
            selection.select_all_hotels();
        } else {
            selection.select_hotels(&self.hotels)?;
        }
        Ok(())
    }
}

/// 一次运行的汇总
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub total_combinations: usize,
    pub results_path: PathBuf,
    pub report_path: Option<PathBuf>,
}

/// 应用主结构
pub struct App {
    config: Config,
    client: ApiClient,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let client = ApiClient::new(&config).context("无法创建 API 客户端")?;
        info!("🔗 API 地址: {}", client.base_url());
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// 从后端加载问题和酒店，全部未选中
    pub async fn load_selection(&self) -> Result<SelectionState> {
        info!("\n📁 正在加载问题和酒店列表...");
        let questions = self
            .client
            .get_questions()
            .await
            .context("加载问题列表失败")?;
        let hotels = self.client.get_hotels().await.context("加载酒店列表失败")?;
        info!("✓ 找到 {} 个问题, {} 个酒店", questions.len(), hotels.len());
        Ok(SelectionState::new(questions, hotels))
    }

    /// 执行一次分析
    pub async fn run_analysis(&self, options: &RunOptions) -> Result<RunSummary> {
        let chatbot = find_chatbot(options.chatbot_id())?;

        let mut selection = self.load_selection().await?;
        options.apply(&mut selection)?;
        let questions = selection.selected_questions();
        let hotels = selection.selected_hotels();
        if questions.is_empty() || hotels.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }

        let batch_size = options.batch_size.unwrap_or(self.config.batch_size);
        let controller = RunController::new(batch_size, self.config.batch_timeout())?;
        logging::log_run_start(chatbot.name, questions.len(), hotels.len(), batch_size);

        let transcript = TranscriptWriter::new(&self.config.transcript_file);
        transcript.write_header(chatbot.name).await?;
        let mut controller = controller.with_transcript(transcript);

        let progress_task = spawn_progress_logger(controller.subscribe());
        let outcome = controller.run(&self.client, &questions, &hotels).await;
        // 关闭进度通道，等日志任务读完最后一次更新
        drop(controller);
        match progress_task.await {
            Ok(last) => debug!("最终进度: {}", last),
            Err(e) => warn!("⚠️ 进度日志任务异常退出: {}", e),
        }
        let outcome = outcome?;

        if let Some(err) = outcome.error() {
            error!(
                "❌ 运行在第 {} 批终止{}: {}",
                err.batch_index(),
                if err.is_timeout() { "（超时）" } else { "" },
                err
            );
        }

        let total_combinations = questions.len() * hotels.len();
        let reports = ReportService::new(self.client.clone(), &self.config.output_dir);
        let results_path = reports
            .save_results(outcome.response())
            .await
            .context("保存结果失败")?;

        let report_path = if options.report && !outcome.response().results.is_empty() {
            match reports.download_report(outcome.response()).await {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("⚠️ 报表生成失败，结果已保存在 {}: {}", results_path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        logging::print_final_stats(
            &outcome.response().summary(),
            total_combinations,
            Some(results_path.display().to_string().as_str()),
        );

        Ok(RunSummary {
            outcome,
            total_combinations,
            results_path,
            report_path,
        })
    }

    /// 从已保存的结果文件生成报表
    pub async fn export_report(&self, results_file: &Path) -> Result<PathBuf> {
        let response: AnalysisResponse = load_results(results_file)
            .await
            .with_context(|| format!("无法读取结果文件: {}", results_file.display()))?;
        let reports = ReportService::new(self.client.clone(), &self.config.output_dir);
        let path = reports.download_report(&response).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Hotel;
    use serde_json::Value;

    #[test]
    fn test_merge_plan_cli_wins() {
        let options = RunOptions {
            questions: vec!["q1".to_string()],
            ..RunOptions::default()
        };
        let plan = RunPlan {
            chatbot: Some("asksuite".to_string()),
            batch_size: Some(10),
            questions: vec!["q2".to_string()],
            hotels: vec!["A".to_string()],
            all_questions: false,
            all_hotels: false,
        };

        let merged = options.merge_plan(plan);
        assert_eq!(merged.questions, vec!["q1"]);
        assert_eq!(merged.hotels, vec!["A"]);
        assert_eq!(merged.batch_size, Some(10));
        assert_eq!(merged.chatbot_id(), "asksuite");
        assert_eq!(RunOptions::default().chatbot_id(), "asksuite");
    }

    #[test]
    fn test_apply_options() {
        let mut selection = SelectionState::new(
            vec!["q1".to_string(), "q2".to_string()],
            vec![Hotel::new("A", "1", Value::Null), Hotel::new("B", "2", Value::Null)],
        );
        let options = RunOptions {
            questions: vec!["q2".to_string()],
            all_hotels: true,
            ..RunOptions::default()
        };

        options.apply(&mut selection).unwrap();
        assert_eq!(selection.selected_questions(), vec!["q2"]);
        assert_eq!(selection.selected_hotels(), vec!["A", "B"]);
    }
}
