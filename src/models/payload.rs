//! 写回远程 API 的 RAG 数据

use serde::Serialize;

/// 文本提取结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisPayload {
    #[serde(skip)]
    pub id: i64,
    #[serde(rename = "archivo_tamanio")]
    pub archive_size: u64,
    /// 记录没有机构代码时为 `null`
    #[serde(rename = "autor")]
    pub author: Option<String>,
    /// 文本字符数
    #[serde(rename = "longitud")]
    pub length: usize,
    #[serde(rename = "texto")]
    pub text: String,
}

impl AnalysisPayload {
    pub fn new(id: i64, archive_size: u64, author: Option<String>, text: String) -> Self {
        Self {
            id,
            archive_size,
            author,
            length: text.chars().count(),
            text,
        }
    }
}

/// LLM 综述结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisPayload {
    #[serde(skip)]
    pub id: i64,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "sintesis")]
    pub synthesis_text: String,
    #[serde(rename = "tokens_total")]
    pub token_count: u32,
}

/// PUT `{collection}/rag` 的请求体
///
/// `analisis` 与 `sintesis` 恰有一个非空，`categorias` 始终为空。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RagUpdate {
    pub id: i64,
    #[serde(rename = "analisis")]
    analysis: Option<AnalysisPayload>,
    #[serde(rename = "sintesis")]
    synthesis: Option<SynthesisPayload>,
    #[serde(rename = "categorias")]
    categories: Option<serde_json::Value>,
}

impl RagUpdate {
    pub fn analysis(payload: AnalysisPayload) -> Self {
        Self {
            id: payload.id,
            analysis: Some(payload),
            synthesis: None,
            categories: None,
        }
    }

    pub fn synthesis(payload: SynthesisPayload) -> Self {
        Self {
            id: payload.id,
            analysis: None,
            synthesis: Some(payload),
            categories: None,
        }
    }

    pub fn analysis_payload(&self) -> Option<&AnalysisPayload> {
        self.analysis.as_ref()
    }

    pub fn synthesis_payload(&self) -> Option<&SynthesisPayload> {
        self.synthesis.as_ref()
    }
}
