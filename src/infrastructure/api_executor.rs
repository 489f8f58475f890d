//! HTTP 执行器 - 基础设施层
//!
//! 唯一持有 reqwest 客户端和 token 的对象

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult, TransportError};
use crate::infrastructure::RecordApi;
use crate::models::{Envelope, Page, RagUpdate, RecordDetail, Resource};

/// HTTP 执行器
///
/// 职责：
/// - 持有 `reqwest::Client` 与 bearer token
/// - 暴露带认证的 GET / PUT 能力
/// - 不判断 `success` 字段
pub struct ApiExecutor {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiExecutor {
    /// 创建新的执行器，超时取自配置
    pub fn new(config: &Config, token: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::request_failed(&config.api_base_url, e))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            token: token.into(),
        })
    }

    /// 带认证的 GET，返回反序列化后的 JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = join_url(&self.base_url, path);
        debug!(url = %url, "GET");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::request_failed(&url, e))?;

        read_json(url, resp).await
    }

    /// 带认证的 PUT，请求体序列化为 JSON
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = join_url(&self.base_url, path);
        debug!(url = %url, "PUT");

        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::request_failed(&url, e))?;

        read_json(url, resp).await
    }
}

/// 拼接基础地址与路径，两侧多余的 `/` 只保留一个
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

async fn read_json<T: DeserializeOwned>(url: String, resp: reqwest::Response) -> AppResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(TransportError::BadStatus {
            endpoint: url,
            status: status.as_u16(),
            body,
        }
        .into());
    }

    let body = resp
        .text()
        .await
        .map_err(|e| AppError::request_failed(&url, e))?;

    serde_json::from_str(&body).map_err(|e| {
        TransportError::InvalidBody {
            endpoint: url,
            source: e,
        }
        .into()
    })
}

#[async_trait]
impl RecordApi for ApiExecutor {
    async fn list(
        &self,
        resource: Resource,
        filters: &[(&'static str, String)],
        limit: usize,
        offset: usize,
    ) -> AppResult<Page> {
        let mut query: Vec<(&str, String)> = filters.to_vec();
        query.push(("limit", limit.to_string()));
        query.push(("offset", offset.to_string()));
        self.get_json(&resource.list_path(), &query).await
    }

    async fn detail(&self, resource: Resource, id: i64) -> AppResult<Envelope<RecordDetail>> {
        self.get_json(&resource.detail_path(id), &[]).await
    }

    async fn put_rag(
        &self,
        resource: Resource,
        update: &RagUpdate,
    ) -> AppResult<Envelope<serde_json::Value>> {
        self.put_json(&resource.rag_path(), update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_keeps_a_single_slash() {
        for base in ["https://api.example.mx", "https://api.example.mx/"] {
            assert_eq!(
                join_url(base, "/api/v5/edictos/rag"),
                "https://api.example.mx/api/v5/edictos/rag"
            );
        }
        assert_eq!(
            join_url("https://api.example.mx/hercules/", "api/v5/distritos"),
            "https://api.example.mx/hercules/api/v5/distritos"
        );
    }
}
