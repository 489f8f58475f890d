//! 远程 API 的记录与响应信封

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 一条远程记录（判决或公告）
///
/// `synthesized_at` 只有在 `analyzed_at` 非空时才有意义。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    /// 存储中 PDF 的 URL
    #[serde(rename = "url", default)]
    pub remote_url: Option<String>,
    #[serde(rename = "archivo", default)]
    pub display_name: Option<String>,
    #[serde(rename = "autoridad_clave", default)]
    pub authority_key: Option<String>,
    #[serde(rename = "rag_fue_analizado_tiempo", default)]
    pub analyzed_at: Option<String>,
    #[serde(rename = "rag_fue_sintetizado_tiempo", default)]
    pub synthesized_at: Option<String>,
}

impl Record {
    pub fn is_analyzed(&self) -> bool {
        self.analyzed_at.is_some()
    }

    pub fn is_synthesized(&self) -> bool {
        self.synthesized_at.is_some()
    }
}

/// 分页列表响应
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub data: Vec<Record>,
}

/// 单条记录详情中的分析结果
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RagAnalysis {
    #[serde(rename = "texto", default)]
    pub text: Option<String>,
}

/// 单条记录详情
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDetail {
    #[serde(rename = "rag_analisis", default)]
    pub rag_analysis: Option<RagAnalysis>,
}

/// 通用响应信封 `{success, message, data}`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn message_or_default(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "sin mensaje".to_string())
    }
}

/// 按创建日期过滤的区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    /// 列表请求的过滤参数
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("creado_desde", self.from.format("%Y-%m-%d").to_string()),
            ("creado_hasta", self.to.format("%Y-%m-%d").to_string()),
        ]
    }
}
