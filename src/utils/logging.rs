/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::models::{BatchProgress, StatusSummary};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则 verbose 时为 debug，默认 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录运行开始信息
///
/// # 参数
/// - `chatbot`: 聊天机器人名称
/// - `questions`: 选中的问题数
/// - `hotels`: 选中的酒店数
/// - `batch_size`: 每批组合数
pub fn log_run_start(chatbot: &str, questions: usize, hotels: usize, batch_size: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始分析 - {}", chatbot);
    info!("📋 问题 {} 个 x 酒店 {} 个 = {} 个组合", questions, hotels, questions * hotels);
    info!("📦 每批最多 {} 个组合，逐批顺序发送", batch_size);
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `progress`: 发送前的进度
/// - `start`: 起始组合编号（从 1 开始）
/// - `end`: 结束组合编号
pub fn log_batch_start(progress: &BatchProgress, start: usize, end: usize) {
    info!("\n{}", "=".repeat(60));
    info!(
        "📦 开始处理第 {}/{} 批",
        progress.current_batch, progress.total_batches
    );
    info!("📄 本批组合: {}-{} / 共 {} 个", start, end, progress.total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
///
/// # 参数
/// - `batch_index`: 批次编号
/// - `accepted`: 本批计入的结果数
/// - `accumulated`: 累计结果数
pub fn log_batch_complete(batch_index: usize, accepted: usize, accumulated: usize) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 批完成: 计入 {} 条结果，累计 {} 条",
        batch_index, accepted, accumulated
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `summary`: 结果状态统计
/// - `expected`: 组合总数
/// - `saved_to`: 结果文件路径（如有）
pub fn print_final_stats(summary: &StatusSummary, expected: usize, saved_to: Option<&str>) {
    info!("\n{}", "=".repeat(60));
    info!("📊 分析结果统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📋 结果: {}/{}", summary.total, expected);
    info!("✅ 成功: {}", summary.success);
    info!("⚠️ 无回复: {}", summary.no_response);
    info!("❌ 失败: {}", summary.error);
    if summary.unknown > 0 {
        info!("❔ 未知状态: {}", summary.unknown);
    }
    info!("{}", "=".repeat(60));
    if let Some(path) = saved_to {
        info!("\n结果已保存至: {}", path);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
