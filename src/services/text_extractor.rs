//! 文本提取服务 - 业务能力层
//!
//! 只负责"文件 → 文本"能力，阻塞调用，由编排层放到线程池中执行

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::debug;

use crate::error::ExtractionError;

/// 文本提取能力
pub trait TextExtractor: Send + Sync {
    /// 提取文件中的全部文本
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// 基于 `pdf-extract` 的 PDF 文本提取
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let path_str = path.display().to_string();

        if !path.is_file() {
            return Err(ExtractionError::NotFound { path: path_str });
        }
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(ExtractionError::Unsupported { path: path_str });
        }

        debug!("正在提取文本: {}", path_str);

        // pdf-extract 在部分畸形文件上会 panic
        let raw = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)))
            .map_err(|_| ExtractionError::Failed {
                path: path_str.clone(),
                message: "PDF 解析器崩溃".to_string(),
            })?
            .map_err(|e| ExtractionError::Failed {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        Ok(normalize_whitespace(&raw))
    }
}

/// 换行替换为空格，连续空白合并为一个
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_newlines_and_runs() {
        assert_eq!(
            normalize_whitespace("  Primera  línea\nSegunda\n\n\tlínea  "),
            "Primera línea Segunda línea"
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = PdfTextExtractor::new()
            .extract(Path::new("/definitely/not/here.pdf"))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NotFound { .. }));
        assert!(err.to_string().contains("/definitely/not/here.pdf"));
    }

    #[test]
    fn non_pdf_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nota.txt");
        std::fs::write(&path, "hola").unwrap();

        let err = PdfTextExtractor::new().extract(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::Unsupported { .. }));
    }

    #[test]
    fn garbage_pdf_fails_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roto.PDF");
        std::fs::write(&path, b"esto no es un pdf").unwrap();

        let err = PdfTextExtractor::new().extract(&path).unwrap_err();
        let ExtractionError::Failed { path: reported, .. } = err else {
            panic!("expected a parse failure");
        };
        assert_eq!(reported, path.display().to_string());
    }
}
