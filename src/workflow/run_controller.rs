//! 运行控制器 - 流程层
//!
//! 核心职责：驱动一次完整的分析运行
//!
//! 状态机：
//! 1. Idle → Running：至少选中一个问题和一个酒店，否则保持 Idle 并返回校验错误
//! 2. Running → Running：每批成功后偏移量前进 batch_size
//! 3. Running → Completed：偏移量 ≥ 组合总数
//! 4. Running → Failed：任一批请求失败或超时，已收到的结果保留
//!
//! 批次严格顺序发送，上一批返回（成功或失败）后才发送下一批，失败不重试。
//! 每批响应只保留属于本窗口的组合，再写入对话记录并累加。
//! 累计结果和进度只由控制器写入，进度通过 watch 通道对外广播。

use std::time::Duration;

use chrono::Local;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::clients::AskBackend;
use crate::error::{AppError, ValidationError};
use crate::models::{AnalysisResponse, BatchProgress};
use crate::services::TranscriptWriter;
use crate::utils::logging;
use crate::workflow::batch_scheduler::BatchScheduler;
use crate::workflow::combination::generate_combinations;
use crate::workflow::result_accumulator::ResultAccumulator;

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    /// 在第 `batch_index` 批（从 1 开始）失败
    Failed { batch_index: usize },
}

/// 批次失败原因
#[derive(Debug, Error)]
pub enum BatchError {
    /// 超过单批超时
    #[error("第 {batch_index} 批请求超时 (超过 {timeout_secs} 秒)")]
    Timeout {
        batch_index: usize,
        timeout_secs: u64,
    },
    /// 其他请求错误
    #[error("第 {batch_index} 批请求失败: {source}")]
    Request {
        batch_index: usize,
        #[source]
        source: AppError,
    },
}

impl BatchError {
    pub fn batch_index(&self) -> usize {
        match self {
            BatchError::Timeout { batch_index, .. } | BatchError::Request { batch_index, .. } => {
                *batch_index
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BatchError::Timeout { .. })
    }
}

/// 运行结果
#[derive(Debug)]
pub enum RunOutcome {
    /// 全部批次成功
    Completed(AnalysisResponse),
    /// 某一批失败，`partial` 为之前各批累计的结果
    Failed {
        error: BatchError,
        partial: AnalysisResponse,
    },
}

impl RunOutcome {
    /// 已收集到的结果（完整或部分）
    pub fn response(&self) -> &AnalysisResponse {
        match self {
            RunOutcome::Completed(response) => response,
            RunOutcome::Failed { partial, .. } => partial,
        }
    }

    pub fn into_response(self) -> AnalysisResponse {
        match self {
            RunOutcome::Completed(response) => response,
            RunOutcome::Failed { partial, .. } => partial,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    pub fn error(&self) -> Option<&BatchError> {
        match self {
            RunOutcome::Completed(_) => None,
            RunOutcome::Failed { error, .. } => Some(error),
        }
    }
}

/// 运行控制器
pub struct RunController {
    batch_size: usize,
    batch_timeout: Duration,
    state: RunState,
    progress: watch::Sender<BatchProgress>,
    transcript: Option<TranscriptWriter>,
}

impl RunController {
    pub fn new(batch_size: usize, batch_timeout: Duration) -> Result<Self, ValidationError> {
        if batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize);
        }
        let (progress, _) = watch::channel(BatchProgress::default());
        Ok(Self {
            batch_size,
            batch_timeout,
            state: RunState::Idle,
            progress,
            transcript: None,
        })
    }

    /// 每批成功后把本批结果追加到对话记录
    pub fn with_transcript(mut self, transcript: TranscriptWriter) -> Self {
        self.transcript = Some(transcript);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 当前进度快照
    pub fn progress(&self) -> BatchProgress {
        *self.progress.borrow()
    }

    /// 订阅进度更新
    pub fn subscribe(&self) -> watch::Receiver<BatchProgress> {
        self.progress.subscribe()
    }

    /// 执行一次运行
    ///
    /// # 参数
    /// - `backend`: `/ask` 能力
    /// - `questions`: 选中的问题（有序）
    /// - `hotels`: 选中的酒店（有序）
    ///
    /// # 返回
    /// 选择为空时返回校验错误且不发起任何请求；否则返回 Completed 或 Failed
    pub async fn run<B>(
        &mut self,
        backend: &B,
        questions: &[String],
        hotels: &[String],
    ) -> Result<RunOutcome, ValidationError>
    where
        B: AskBackend + ?Sized,
    {
        self.state = RunState::Idle;
        if questions.is_empty() || hotels.is_empty() {
            warn!("⚠️ 未选择问题或酒店，不发起请求");
            return Err(ValidationError::EmptySelection);
        }

        let combinations = generate_combinations(questions, hotels);
        let scheduler = BatchScheduler::new(&combinations, self.batch_size)?;
        let total = scheduler.total();
        let total_batches = scheduler.total_batches();

        self.state = RunState::Running;
        self.publish(BatchProgress {
            current_batch: 0,
            total_batches,
            processed: 0,
            total,
        });

        let started_at = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut accumulator = ResultAccumulator::new(total);
        let mut offset = 0;

        while let Some(window) = scheduler.window_at(offset) {
            let progress = BatchProgress {
                current_batch: window.index,
                total_batches,
                processed: offset,
                total,
            };
            self.publish(progress);
            logging::log_batch_start(&progress, window.start + 1, window.end);

            let request = window.request();
            if request.implied_pairs() > window.len() {
                warn!(
                    "⚠️ 第 {} 批: 窗口含 {} 个组合，但去重后的 {} 个问题 x {} 个酒店会在后端展开为 {} 个，窗口外的结果将被剔除",
                    window.index,
                    window.len(),
                    request.questions.len(),
                    request.hotels.len(),
                    request.implied_pairs()
                );
            }

            let outcome = timeout(self.batch_timeout, backend.ask(&request)).await;
            let batch_error = match outcome {
                Ok(Ok(mut response)) => {
                    let outside = window.retain_own(&mut response.results);
                    if outside > 0 {
                        debug!("第 {} 批: 剔除 {} 条窗口外的结果", window.index, outside);
                    }
                    self.record(window.index, &response).await;

                    let accepted = accumulator.append(response);
                    logging::log_batch_complete(window.index, accepted, accumulator.len());

                    offset = window.end;
                    self.publish(BatchProgress {
                        processed: offset,
                        ..progress
                    });
                    continue;
                }
                Ok(Err(e)) if e.is_timeout() => BatchError::Timeout {
                    batch_index: window.index,
                    timeout_secs: self.batch_timeout.as_secs(),
                },
                Ok(Err(e)) => BatchError::Request {
                    batch_index: window.index,
                    source: e,
                },
                Err(_) => BatchError::Timeout {
                    batch_index: window.index,
                    timeout_secs: self.batch_timeout.as_secs(),
                },
            };

            error!("❌ {}，运行终止，保留已收到的 {} 条结果", batch_error, accumulator.len());
            self.state = RunState::Failed {
                batch_index: window.index,
            };
            return Ok(RunOutcome::Failed {
                error: batch_error,
                partial: accumulator.into_response(&started_at),
            });
        }

        info!("✓ 全部 {} 批完成，共 {} 条结果", total_batches, accumulator.len());
        if accumulator.overflow() > 0 {
            warn!(
                "⚠️ 各批接收 {:?} 条，共丢弃 {} 条超出组合总数的结果",
                accumulator.batch_counts(),
                accumulator.overflow()
            );
        }
        self.state = RunState::Completed;
        Ok(RunOutcome::Completed(accumulator.into_response(&started_at)))
    }

    fn publish(&self, progress: BatchProgress) {
        self.progress.send_replace(progress);
    }

    /// 记录文件写失败不影响本批结果
    async fn record(&self, batch_index: usize, response: &AnalysisResponse) {
        let Some(transcript) = &self.transcript else {
            return;
        };
        if let Err(e) = transcript.write_batch(batch_index, &response.results).await {
            warn!("⚠️ 写入对话记录失败 ({}): {}", transcript.path().display(), e);
        }
    }
}
