use serde::{Deserialize, Serialize};
use std::fmt;

/// 单个 (问题, 酒店) 的回答状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Success,
    Error,
    NoResponse,
    /// 后端返回了无法识别的状态
    #[serde(other)]
    Unknown,
}

impl AnalysisStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStatus::Success => "成功",
            AnalysisStatus::Error => "失败",
            AnalysisStatus::NoResponse => "无回复",
            AnalysisStatus::Unknown => "未知",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AnalysisStatus::Success => "✅",
            AnalysisStatus::Error => "❌",
            AnalysisStatus::NoResponse => "⚠️",
            AnalysisStatus::Unknown => "❔",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

/// 聊天机器人对一个组合的回答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub hotel: String,
    pub question: String,
    pub response: String,
    pub status: AnalysisStatus,
}

/// `/ask` 的响应体，也是一次运行累计的结果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub timestamp: String,
    #[serde(default)]
    pub results: Vec<AnalysisResult>,
}

impl AnalysisResponse {
    /// 按状态统计
    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary {
            total: self.results.len(),
            ..Default::default()
        };
        for result in &self.results {
            match result.status {
                AnalysisStatus::Success => summary.success += 1,
                AnalysisStatus::Error => summary.error += 1,
                AnalysisStatus::NoResponse => summary.no_response += 1,
                AnalysisStatus::Unknown => summary.unknown += 1,
            }
        }
        summary
    }
}

/// 结果状态统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub total: usize,
    pub success: usize,
    pub error: usize,
    pub no_response: usize,
    pub unknown: usize,
}

/// 批次进度，每次运行开始时重置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchProgress {
    /// 当前批次（从 1 开始，0 表示尚未开始）
    pub current_batch: usize,
    pub total_batches: usize,
    /// 已处理的组合数
    pub processed: usize,
    /// 组合总数
    pub total: usize,
}

impl BatchProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.processed as f64 * 100.0 / self.total as f64
    }
}

impl fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "批次 {}/{} | 已处理 {}/{} ({:.1}%)",
            self.current_batch,
            self.total_batches,
            self.processed,
            self.total,
            self.percent()
        )
    }
}
