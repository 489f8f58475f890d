//! 记录处理上下文
//!
//! 封装"我正在处理哪个集合第几页的哪条记录"这一信息

use std::fmt::Display;

use crate::models::Resource;

/// 记录处理上下文
#[derive(Debug, Clone)]
pub struct RecordCtx {
    pub resource: Resource,

    /// 页码（从1开始，仅用于日志显示）
    pub page_index: usize,

    /// 记录在本页中的位置（从1开始）
    pub position: usize,

    /// 远程主键
    pub id: i64,
}

impl RecordCtx {
    pub fn new(resource: Resource, page_index: usize, position: usize, id: i64) -> Self {
        Self {
            resource,
            page_index,
            position,
            id,
        }
    }
}

impl Display for RecordCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} #{} 第{}页/{}]",
            self.resource.name(),
            self.id,
            self.page_index,
            self.position
        )
    }
}
