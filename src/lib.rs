//! # Hercules RAG
//!
//! 将判决（sentencias）与公告（edictos）的远程记录和本地 PDF 镜像同步，
//! 为每条记录写回提取的全文和 LLM 综述。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端与 token），只暴露能力
//! - `ApiExecutor` - 远程 API 的唯一出口，实现 `RecordApi`
//! - `get_token` - 用户名密码换取 bearer token
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条记录
//! - `PathMapper` - 远程 URL → 本地路径
//! - `PdfTextExtractor` - PDF 文本提取
//! - `LlmService` - LLM 综述能力
//! - `RecordPager` - 分页遍历
//! - `ResultPublisher` - 写回分析/综述
//! - `CatalogService` - 机构与司法区目录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条记录"的完整处理流程
//! - `RecordCtx` - 上下文封装（集合 + 页码 + 位置 + id）
//! - `RecordFlow` - 流程编排（判断 → 提取/综述 → 写回）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用生命周期与分页驱动
//! - `orchestrator/page_processor` - 单页顺序或线程池处理
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{ApiExecutor, RecordApi};
pub use models::{DateRange, Record, Resource, RunResult};
pub use orchestrator::{process_page, App, RunRequest};
pub use workflow::{Outcome, RecordCtx, RecordFlow, SkipReason};
