//! 目录查询服务 - 业务能力层
//!
//! 只负责列出机构与司法区，渲染成对齐的文本表格

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::infrastructure::ApiExecutor;
use crate::models::{Authority, District, Envelope};

const AUTHORITIES_PATH: &str = "/api/v5/autoridades";
const DISTRICTS_PATH: &str = "/api/v5/distritos";

/// 目录服务
pub struct CatalogService<'a> {
    executor: &'a ApiExecutor,
    limit: usize,
}

impl<'a> CatalogService<'a> {
    pub fn new(executor: &'a ApiExecutor, limit: usize) -> Self {
        Self { executor, limit }
    }

    /// 列出机构，`notaries_only` 时只要公证处
    pub async fn authorities(&self, notaries_only: bool) -> AppResult<Vec<Authority>> {
        let query = authority_query(self.limit, notaries_only);
        self.fetch(AUTHORITIES_PATH, &query).await
    }

    /// 列出司法区
    pub async fn districts(&self) -> AppResult<Vec<District>> {
        let query = [("limit", self.limit.to_string())];
        self.fetch(DISTRICTS_PATH, &query).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let envelope: Envelope<Vec<T>> = self.executor.get_json(path, query).await?;
        let items = unwrap_listing(path, envelope)?;
        info!("📋 {} 返回 {} 条", path, items.len());
        Ok(items)
    }
}

fn authority_query(limit: usize, notaries_only: bool) -> Vec<(&'static str, String)> {
    let mut query = vec![("limit", limit.to_string())];
    if notaries_only {
        query.push(("es_notaria", "1".to_string()));
    }
    query
}

/// `success: false` 是致命错误；缺少 `data` 视为空列表
fn unwrap_listing<T>(endpoint: &str, envelope: Envelope<Vec<T>>) -> AppResult<Vec<T>> {
    if !envelope.success {
        return Err(AppError::business(endpoint, envelope.message_or_default()));
    }
    Ok(envelope.data.unwrap_or_default())
}

fn yes_no(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "sí",
        Some(false) => "no",
        None => "-",
    }
    .to_string()
}

/// 机构表格
pub fn authorities_table(items: &[Authority]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|a| {
            vec![
                a.clave.clone(),
                a.descripcion_corta.clone().unwrap_or_default(),
                yes_no(a.es_notaria),
            ]
        })
        .collect();
    render_table(&["clave", "descripcion_corta", "es_notaria"], &rows)
}

/// 司法区表格
pub fn districts_table(items: &[District]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|d| {
            vec![
                d.clave.clone(),
                d.nombre_corto.clone().unwrap_or_default(),
                d.nombre.clone().unwrap_or_default(),
                yes_no(d.es_jurisdiccional),
            ]
        })
        .collect();
    render_table(&["clave", "nombre_corto", "nombre", "es_jurisdiccional"], &rows)
}

/// 按字符数对齐的纯文本表格，列之间两个空格
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(headers.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}
