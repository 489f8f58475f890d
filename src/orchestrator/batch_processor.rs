//! 批量记录处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是同步流程的入口，负责资源管理和分页驱动。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验本地目录、认证、创建 ApiExecutor / LlmService / 提取器
//! 2. **分页加载**：以 `RecordPager` 逐页读取日期范围内的记录
//! 3. **并发控制**：每页交给 page_processor，线程数由配置决定
//! 4. **全局统计**：汇总所有页的 `RunResult`
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单条记录的细节
//! - **资源所有者**：唯一持有 HTTP 客户端和 LLM 客户端的模块
//! - **向下委托**：委托 page_processor 处理单页

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppResult, ConfigError};
use crate::infrastructure::{get_token, ApiExecutor};
use crate::models::{DateRange, Resource, RunResult};
use crate::orchestrator::page_processor;
use crate::services::{LlmService, PathMapper, PdfTextExtractor, RecordPager};
use crate::utils::logging::{log_page_complete, log_page_start, log_startup, print_final_stats};
use crate::workflow::{FlowDeps, FlowOptions, Mode, RecordFlow};

/// 一次同步运行的参数
#[derive(Debug, Clone, Copy)]
pub struct RunRequest {
    pub resource: Resource,
    pub mode: Mode,
    pub range: DateRange,
    pub options: FlowOptions,
}

/// 应用主结构
pub struct App {
    config: Config,
    deps: FlowDeps,
}

impl App {
    /// 初始化应用
    ///
    /// 本地目录缺失和认证失败都是致命的。
    pub async fn initialize(config: Config, resource: Resource) -> AppResult<Self> {
        ensure_base_dir(&config, resource)?;

        info!("🔐 正在认证: {}", config.api_base_url);
        let token = get_token(&config).await?;
        info!("✓ 认证成功");

        let api = ApiExecutor::new(&config, token)?;
        let deps = FlowDeps {
            api: Arc::new(api),
            extractor: Arc::new(PdfTextExtractor::new()),
            synthesizer: Arc::new(LlmService::new(&config)),
        };

        Ok(Self { config, deps })
    }

    /// 使用已构建的依赖创建应用
    pub fn with_deps(config: Config, deps: FlowDeps) -> Self {
        Self { config, deps }
    }

    /// 运行应用主逻辑
    pub async fn run(&self, request: RunRequest) -> AppResult<RunResult> {
        let RunRequest {
            resource,
            mode,
            range,
            options,
        } = request;

        ensure_base_dir(&self.config, resource)?;
        log_startup(resource, mode, &range, self.config.threads, options.dry_run);

        let mapper = PathMapper::new(
            self.config.base_dir(resource),
            self.config.remote_base_url(resource),
        );
        let flow = RecordFlow::new(mode, options, mapper, self.deps.clone(), resource)
            .with_system_prompt(self.config.llm_system_prompt.clone())
            .with_preview_chars(self.config.preview_chars);

        let mut pager = RecordPager::new(
            self.deps.api.clone(),
            resource,
            range.query(),
            self.config.page_size,
        );

        let mut total = RunResult::default();
        let mut page_index = 0;

        loop {
            let offset = pager.offset();
            let Some(page) = pager.next_page().await? else {
                break;
            };
            page_index += 1;

            if page.data.is_empty() {
                if page_index == 1 {
                    warn!("⚠️ 没有找到 {} 记录，程序结束", resource.name());
                }
                continue;
            }

            log_page_start(page_index, offset, page.data.len(), pager.total());

            let page_result = page_processor::process_page(
                &flow,
                resource,
                page_index,
                page.data,
                self.config.threads,
            )
            .await?;

            log_page_complete(page_index, &page_result);
            total.merge(page_result);
        }

        print_final_stats(&total);
        Ok(total)
    }
}

/// 本地镜像目录必须存在
fn ensure_base_dir(config: &Config, resource: Resource) -> AppResult<()> {
    let base_dir = config.base_dir(resource);
    if Path::new(base_dir).is_dir() {
        Ok(())
    } else {
        Err(ConfigError::DirectoryNotFound {
            path: base_dir.to_string(),
        }
        .into())
    }
}
