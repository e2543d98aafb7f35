//! 进度播报
//!
//! 订阅运行控制器的进度通道并写日志，只读不写。

use crate::models::BatchProgress;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// 启动进度日志任务，发送端关闭后任务结束并返回最后看到的进度
///
/// 发送端关闭前发布的最后一次更新也会被读到。
pub fn spawn_progress_logger(mut rx: watch::Receiver<BatchProgress>) -> JoinHandle<BatchProgress> {
    tokio::spawn(async move {
        let mut last = *rx.borrow_and_update();
        while rx.changed().await.is_ok() {
            last = *rx.borrow_and_update();
            if last.current_batch > 0 {
                info!("⏳ {}", last);
            }
        }
        last
    })
}
