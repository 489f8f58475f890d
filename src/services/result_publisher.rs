//! 结果写回服务 - 业务能力层
//!
//! 只负责把一条分析或综述 PUT 回远程 API，并解释响应信封

use std::sync::Arc;
use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::RecordApi;
use crate::models::{RagUpdate, Resource};

/// 写回结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    /// `success: true`
    Accepted,
    /// `success: false`，附带服务端消息
    Rejected(String),
}

/// 结果写回服务
///
/// 传输失败以 `Err` 返回（调用方视为致命）；业务拒绝以
/// `PublishStatus::Rejected` 返回（调用方记录并跳过）。
pub struct ResultPublisher {
    api: Arc<dyn RecordApi>,
    resource: Resource,
}

impl ResultPublisher {
    pub fn new(api: Arc<dyn RecordApi>, resource: Resource) -> Self {
        Self { api, resource }
    }

    /// 发出一次 PUT；相同的 `update` 总是产生相同的请求
    pub async fn publish(&self, update: &RagUpdate) -> AppResult<PublishStatus> {
        debug!("[{} {}] 写回 RAG 数据", self.resource.name(), update.id);

        let envelope = self.api.put_rag(self.resource, update).await?;
        if envelope.success {
            Ok(PublishStatus::Accepted)
        } else {
            Ok(PublishStatus::Rejected(envelope.message_or_default()))
        }
    }
}
