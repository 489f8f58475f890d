//! 单页处理器 - 编排层
//!
//! ## 职责
//!
//! 处理一页记录，是页级别的编排器。
//!
//! ## 两种执行方式
//!
//! - **顺序**：综述模式或线程数为 1 时，逐条调用 `RecordFlow::run`
//! - **线程池**：分析模式下，阻塞的提取步骤交给最多 `threads` 个工作线程；
//!   控制循环按完成顺序取回结果并立即写回
//!
//! 每条记录的"提取 → 写回"严格有序，计数器每条记录只更新一次。

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, warn};

use crate::error::AppResult;
use crate::models::{Record, Resource, RunResult};
use crate::workflow::{Mode, Outcome, RecordCtx, RecordFlow, SkipReason};

/// 处理一页记录
///
/// # 参数
/// - `flow`: 记录处理流程
/// - `resource`: 当前集合
/// - `page_index`: 页码（从 1 开始，用于日志）
/// - `records`: 本页记录
/// - `threads`: 提取线程数
///
/// # 返回
/// 本页的计数；致命错误直接返回 `Err`
pub async fn process_page(
    flow: &RecordFlow,
    resource: Resource,
    page_index: usize,
    records: Vec<Record>,
    threads: usize,
) -> AppResult<RunResult> {
    if flow.mode() == Mode::Synthesize || threads <= 1 {
        process_sequential(flow, resource, page_index, records).await
    } else {
        process_pooled(flow, resource, page_index, records, threads).await
    }
}

async fn process_sequential(
    flow: &RecordFlow,
    resource: Resource,
    page_index: usize,
    records: Vec<Record>,
) -> AppResult<RunResult> {
    let mut result = RunResult::default();

    for (index, record) in records.into_iter().enumerate() {
        let ctx = RecordCtx::new(resource, page_index, index + 1, record.id);
        let outcome = flow.run(&ctx, record).await?;
        result.record(&outcome);
    }

    Ok(result)
}

async fn process_pooled(
    flow: &RecordFlow,
    resource: Resource,
    page_index: usize,
    records: Vec<Record>,
    threads: usize,
) -> AppResult<RunResult> {
    let semaphore = Arc::new(Semaphore::new(threads));
    let mut tasks = JoinSet::new();
    let mut result = RunResult::default();

    // 不需要提取的记录直接计数，其余的提交到线程池
    for (index, record) in records.into_iter().enumerate() {
        let ctx = RecordCtx::new(resource, page_index, index + 1, record.id);

        if let Some(reason) = flow.analyze_precheck(&record) {
            let outcome = Outcome::Skipped(reason);
            flow.report(&ctx, &outcome);
            result.record(&outcome);
            continue;
        }

        let job = flow.analysis_job(ctx.clone(), record);
        let semaphore = semaphore.clone();

        tasks.spawn(async move {
            let prepared = match semaphore.acquire_owned().await {
                Ok(_permit) => match tokio::task::spawn_blocking(move || job.run()).await {
                    Ok(prepared) => prepared,
                    Err(e) => {
                        warn!("{} ⚠️ 提取任务异常退出: {}", ctx, e);
                        Err(SkipReason::ExtractionError)
                    }
                },
                Err(e) => {
                    warn!("{} ⚠️ 无法获取工作线程: {}", ctx, e);
                    Err(SkipReason::ExtractionError)
                }
            };
            (ctx, prepared)
        });
    }

    // 按完成顺序写回
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((ctx, prepared)) => {
                let outcome = flow.finish_analysis(prepared).await?;
                flow.report(&ctx, &outcome);
                result.record(&outcome);
            }
            Err(e) => {
                error!("[第{}页] 任务执行失败: {}", page_index, e);
                result.record(&Outcome::Skipped(SkipReason::ExtractionError));
            }
        }
    }

    Ok(result)
}
