use crate::error::{AppResult, FileError};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 运行计划：一次分析要选中的问题和酒店
///
/// ```toml
/// chatbot = "asksuite"
/// batch_size = 40
/// questions = ["Do you have parking?", "Is breakfast included?"]
/// all_hotels = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunPlan {
    pub chatbot: Option<String>,
    pub batch_size: Option<usize>,
    pub questions: Vec<String>,
    pub hotels: Vec<String>,
    /// 选中题库中全部问题，忽略 `questions`
    pub all_questions: bool,
    /// 选中全部酒店，忽略 `hotels`
    pub all_hotels: bool,
}

/// 从 TOML 文件加载运行计划
pub async fn load_run_plan(path: &Path) -> AppResult<RunPlan> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| FileError::read(path, e))?;

    let plan: RunPlan = toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::info!(
        "已加载运行计划 {}: {} 个问题, {} 个酒店",
        path.file_name().unwrap_or_default().to_string_lossy(),
        plan.questions.len(),
        plan.hotels.len()
    );

    Ok(plan)
}
