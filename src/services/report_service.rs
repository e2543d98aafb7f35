//! 结果导出服务 - 业务能力层
//!
//! 负责保存/读取分析结果 JSON，以及通过后端生成表格报表

use crate::clients::ApiClient;
use crate::error::{AppResult, FileError};
use crate::models::AnalysisResponse;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// 结果导出服务
pub struct ReportService {
    client: ApiClient,
    output_dir: PathBuf,
}

impl ReportService {
    pub fn new(client: ApiClient, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }

    /// 保存结果为 `analysis_<timestamp>.json`
    pub async fn save_results(&self, response: &AnalysisResponse) -> AppResult<PathBuf> {
        let path = self
            .output_dir
            .join(format!("analysis_{}.json", file_stem(&response.timestamp)));
        let json = serde_json::to_vec_pretty(response).map_err(|e| FileError::JsonParseFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        self.write(&path, &json).await?;
        info!("💾 结果已保存: {}", path.display());
        Ok(path)
    }

    /// 请求后端生成报表，保存为 `report_<timestamp>.xlsx`
    pub async fn download_report(&self, response: &AnalysisResponse) -> AppResult<PathBuf> {
        info!("📊 正在生成报表 ({} 条结果)...", response.results.len());
        let bytes = self.client.generate_report(response).await?;

        let path = self
            .output_dir
            .join(format!("report_{}.xlsx", file_stem(&response.timestamp)));
        self.write(&path, &bytes).await?;
        info!("✓ 报表已保存: {}", path.display());
        Ok(path)
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> AppResult<()> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| FileError::write(&self.output_dir, e))?;
        fs::write(path, bytes)
            .await
            .map_err(|e| FileError::write(path, e))?;
        Ok(())
    }
}

/// 读取之前保存的结果文件
pub async fn load_results(path: &Path) -> AppResult<AnalysisResponse> {
    let content = fs::read(path).await.map_err(|e| FileError::read(path, e))?;
    let response = serde_json::from_slice(&content).map_err(|e| FileError::JsonParseFailed {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(response)
}

/// 时间戳中不适合出现在文件名里的字符替换为 `_`
fn file_stem(timestamp: &str) -> String {
    let stem: String = timestamp
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "unknown".to_string()
    } else {
        stem
    }
}
