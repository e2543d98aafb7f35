//! 对话记录写入服务 - 业务能力层
//!
//! 只负责把收到的回答追加到记录文件，不关心流程

use crate::error::{AppResult, FileError};
use crate::models::AnalysisResult;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 对话记录写入服务
///
/// 每批结果到达后立即追加，运行中途失败时已写入的记录仍然保留
pub struct TranscriptWriter {
    path: PathBuf,
}

impl TranscriptWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 写入运行分隔头
    pub async fn write_header(&self, chatbot: &str) -> AppResult<()> {
        let header = format!(
            "{}\n{} 分析记录 - {}\n{}\n",
            "=".repeat(60),
            chatbot,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        self.append(&header).await
    }

    /// 追加一批结果
    pub async fn write_batch(&self, batch_index: usize, results: &[AnalysisResult]) -> AppResult<()> {
        debug!("写入第 {} 批记录: {} 条", batch_index, results.len());

        let mut text = format!("\n--- 第 {} 批 ---\n", batch_index);
        for result in results {
            text.push_str(&format_entry(result));
        }
        self.append(&text).await
    }

    async fn append(&self, text: &str) -> AppResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| FileError::write(&self.path, e))?;

        file.write_all(text.as_bytes())
            .await
            .map_err(|e| FileError::write(&self.path, e))?;
        Ok(())
    }
}

fn format_entry(result: &AnalysisResult) -> String {
    format!(
        "酒店 {} | 问题 {} | {}\n{}\n",
        result.hotel,
        result.question,
        result.status.label(),
        result.response.trim()
    )
}
