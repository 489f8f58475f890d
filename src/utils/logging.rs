//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::{DateRange, Resource, RunResult};
use crate::workflow::Mode;

/// 初始化 tracing 输出
///
/// 默认级别为 info，可通过 `RUST_LOG` 覆盖。重复调用无副作用。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(resource: Resource, mode: Mode, range: &DateRange, threads: usize, dry_run: bool) {
    info!("{}", "=".repeat(60));
    match mode {
        Mode::Analyze => info!("🚀 程序启动 - {} 文本分析模式", resource.name()),
        Mode::Synthesize => info!("🚀 程序启动 - {} LLM 综述模式", resource.name()),
    }
    info!("📅 日期范围: {} → {}", range.from, range.to);
    info!("📊 提取线程数: {}", threads);
    if dry_run {
        info!("🧪 试运行：只构建结果，不写回");
    }
    info!("{}", "=".repeat(60));
}

/// 记录页开始信息
///
/// # 参数
/// - `page_index`: 页码（从 1 开始）
/// - `offset`: 本页起始位置
/// - `count`: 本页记录数
/// - `total`: 远程报告的总数
pub fn log_page_start(page_index: usize, offset: usize, count: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {} 页", page_index);
    info!(
        "📄 本页记录: {}-{} / 共 {} 条",
        offset + 1,
        offset + count,
        total
    );
    info!("{}", "=".repeat(60));
}

/// 记录页完成信息
pub fn log_page_complete(page_index: usize, page: &RunResult) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 页完成: 处理 {}/{}，跳过 {}，失败 {}",
        page_index,
        page.processed(),
        page.seen,
        page.skipped_total(),
        page.failed
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(result: &RunResult) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已写回: {}/{}", result.sent, result.seen);
    if result.tested > 0 {
        info!("🧪 试运行: {}", result.tested);
    }
    info!("⏭️ 跳过: {}", result.skipped_total());
    for (reason, count) in &result.skipped {
        info!("   - {}: {}", reason, count);
    }
    info!("❌ 远程拒绝: {}", result.failed);
    info!("{}", "=".repeat(60));
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
