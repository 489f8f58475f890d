//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责分页驱动和并发调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量记录处理器
//! - 管理应用生命周期（校验、认证、运行）
//! - 逐页读取远程集合（RecordPager）
//! - 输出全局统计信息
//!
//! ### `page_processor` - 单页处理器
//! - 遍历一页记录
//! - 顺序执行或交给有界线程池提取
//! - 按完成顺序写回并计数
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理所有页)
//!     ↓
//! page_processor (处理 Vec<Record>)
//!     ↓
//! workflow::RecordFlow (处理单条 Record)
//!     ↓
//! services (能力层：path / extract / llm / pager / publish)
//!     ↓
//! infrastructure (基础设施：ApiExecutor)
//! ```

pub mod batch_processor;
pub mod page_processor;

// 重新导出主要类型
pub use batch_processor::{App, RunRequest};
pub use page_processor::process_page;
