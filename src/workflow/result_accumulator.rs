//! 结果累加
//!
//! 每批成功的结果按批次顺序追加，不去重。累计条数不会超过组合总数，
//! 超出部分丢弃并计入 `overflow`。

use crate::models::{AnalysisResponse, AnalysisResult};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ResultAccumulator {
    capacity: usize,
    timestamp: Option<String>,
    results: Vec<AnalysisResult>,
    batch_counts: Vec<usize>,
    overflow: usize,
}

impl ResultAccumulator {
    /// `capacity` 为本次运行的组合总数
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            timestamp: None,
            results: Vec::with_capacity(capacity),
            batch_counts: Vec::new(),
            overflow: 0,
        }
    }

    /// 追加一批结果，返回实际接收的条数
    pub fn append(&mut self, response: AnalysisResponse) -> usize {
        if self.timestamp.is_none() && !response.timestamp.is_empty() {
            self.timestamp = Some(response.timestamp);
        }

        let room = self.capacity - self.results.len();
        let received = response.results.len();
        let accepted = received.min(room);
        if accepted < received {
            let dropped = received - accepted;
            self.overflow += dropped;
            warn!(
                "⚠️ 本批返回 {} 条结果，超出组合总数，丢弃 {} 条",
                received, dropped
            );
        }

        self.results
            .extend(response.results.into_iter().take(accepted));
        self.batch_counts.push(accepted);
        accepted
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[AnalysisResult] {
        &self.results
    }

    /// 每批接收的条数，按批次顺序
    pub fn batch_counts(&self) -> &[usize] {
        &self.batch_counts
    }

    pub fn overflow(&self) -> usize {
        self.overflow
    }

    /// 转换为累计响应；时间戳取第一批的时间戳，没有成功批次时使用 `fallback_timestamp`
    pub fn into_response(self, fallback_timestamp: &str) -> AnalysisResponse {
        AnalysisResponse {
            timestamp: self
                .timestamp
                .unwrap_or_else(|| fallback_timestamp.to_string()),
            results: self.results,
        }
    }
}
