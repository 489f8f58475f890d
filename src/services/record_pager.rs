//! 分页遍历服务 - 业务能力层
//!
//! 以 offset/limit 逐页读取远程集合，直到 offset 达到服务端报告的 total

use futures::stream::{self, Stream};
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::infrastructure::RecordApi;
use crate::models::{Page, Resource};

/// 远程集合的分页游标
///
/// 有限、不可重启：每个新的 `RecordPager` 都从 offset 0 开始。
/// `total` 每页重新读取，但有效值只增不减。
pub struct RecordPager {
    api: Arc<dyn RecordApi>,
    resource: Resource,
    filters: Vec<(&'static str, String)>,
    page_size: usize,
    offset: usize,
    total: usize,
    finished: bool,
}

impl RecordPager {
    pub fn new(
        api: Arc<dyn RecordApi>,
        resource: Resource,
        filters: Vec<(&'static str, String)>,
        page_size: usize,
    ) -> Self {
        Self {
            api,
            resource,
            filters,
            page_size: page_size.max(1),
            offset: 0,
            total: 0,
            finished: false,
        }
    }

    /// 下一页在集合中的起始位置
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 目前为止见到的最大 total
    pub fn total(&self) -> usize {
        self.total
    }

    /// 取下一页；遍历结束后返回 `Ok(None)`
    ///
    /// 传输错误和 `success: false` 都是致命的，游标随之结束。
    pub async fn next_page(&mut self) -> AppResult<Option<Page>> {
        if self.finished {
            return Ok(None);
        }

        let endpoint = self.resource.list_path();
        let page = match self
            .api
            .list(self.resource, &self.filters, self.page_size, self.offset)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };

        if !page.success {
            self.finished = true;
            let message = page.message.unwrap_or_else(|| "sin mensaje".to_string());
            return Err(AppError::business(endpoint, message));
        }

        self.total = self.total.max(page.total);
        info!(
            "📄 {} offset {} 读取 {} 条 / 共 {} 条",
            self.resource.name(),
            self.offset,
            page.data.len(),
            self.total
        );

        self.offset += self.page_size;
        if self.offset >= self.total {
            self.finished = true;
        }

        Ok(Some(page))
    }

    /// 以 `Stream` 的形式惰性产出每一页
    pub fn into_stream(self) -> impl Stream<Item = AppResult<Page>> {
        stream::try_unfold(self, |mut pager| async move {
            let page = pager.next_page().await?;
            Ok(page.map(|p| (p, pager)))
        })
    }
}
