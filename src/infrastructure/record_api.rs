use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Envelope, Page, RagUpdate, RecordDetail, Resource};

/// 远程案件管理 API 的能力边界
///
/// 传输失败与非 2xx 响应以 `Err` 返回；`success: false` 信封原样返回，
/// 由调用方决定是否致命。
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// GET `{collection}?filters&limit&offset`
    async fn list(
        &self,
        resource: Resource,
        filters: &[(&'static str, String)],
        limit: usize,
        offset: usize,
    ) -> AppResult<Page>;

    /// GET `{collection}/{id}`
    async fn detail(&self, resource: Resource, id: i64) -> AppResult<Envelope<RecordDetail>>;

    /// PUT `{collection}/rag`
    async fn put_rag(
        &self,
        resource: Resource,
        update: &RagUpdate,
    ) -> AppResult<Envelope<serde_json::Value>>;
}
