//! 错误类型
//!
//! 封闭的错误集合：调用方通过 `match` 显式区分致命错误与可恢复错误，
//! 不使用兜底式捕获。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 认证失败（获取 token）
    #[error("认证错误: {0}")]
    Authentication(#[from] AuthError),
    /// 网络传输失败或非 2xx 响应
    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),
    /// 远程 API 返回 `success: false`
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// PDF 文本提取失败
    #[error("提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// LLM 综述失败
    #[error("综述错误: {0}")]
    Synthesis(#[from] SynthesisError),
    /// 远程 URL 与配置的前缀不匹配
    #[error("无效URL: {url} 不以 {expected_prefix} 开头")]
    InvalidUrl {
        url: String,
        expected_prefix: String,
    },
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 本地文件系统错误
    #[error("文件错误 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 无法连接认证端点
    #[error("无法请求 token ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 认证端点拒绝
    #[error("认证被拒绝 ({endpoint}): status={status}")]
    Rejected { endpoint: String, status: u16 },
    /// 响应中没有 access_token
    #[error("响应中缺少 access_token ({endpoint})")]
    MissingToken { endpoint: String },
}

/// 传输错误
#[derive(Debug, Error)]
pub enum TransportError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 非 2xx 响应
    #[error("服务器返回 {status} ({endpoint}): {body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 响应体无法解析
    #[error("响应解析失败 ({endpoint}): {source}")]
    InvalidBody {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 业务错误（`success: false` 信封）
#[derive(Debug, Error)]
#[error("{endpoint}: {message}")]
pub struct BusinessError {
    pub endpoint: String,
    pub message: String,
}

/// 文本提取错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 不是 PDF 文件
    #[error("不支持的文件类型: {path}")]
    Unsupported { path: String },
    /// 提取过程失败
    #[error("无法提取文本 ({path}): {message}")]
    Failed { path: String, message: String },
}

/// LLM 综述错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// 请求构建或 API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 超时
    #[error("LLM 调用超时 (模型: {model}, {seconds}秒)")]
    Timeout { model: String, seconds: u64 },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 响应中没有 token 用量
    #[error("LLM响应缺少 token 用量 (模型: {model})")]
    MissingUsage { model: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 值不合法
    #[error("配置项 {name} 不合法: {reason}")]
    InvalidValue { name: String, reason: String },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// TOML 配置文件解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建传输层请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Transport(TransportError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建业务错误
    pub fn business(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Business(BusinessError {
            endpoint: endpoint.into(),
            message: message.into(),
        })
    }

    /// 创建文件错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// 是否应当终止整个运行
    ///
    /// 提取、综述与 URL 错误在单条记录边界上被转换为跳过原因，
    /// 其余错误一旦传播到编排层即终止进程。
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AppError::Extraction(_) | AppError::Synthesis(_) | AppError::InvalidUrl { .. }
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_errors_are_not_fatal() {
        let err: AppError = ExtractionError::NotFound {
            path: "/data/a.pdf".into(),
        }
        .into();
        assert!(!err.is_fatal());

        let err: AppError = SynthesisError::EmptyContent {
            model: "gpt-4o-mini".into(),
        }
        .into();
        assert!(!err.is_fatal());
    }

    #[test]
    fn business_and_config_errors_are_fatal() {
        assert!(AppError::business("/api/v5/edictos", "no autorizado").is_fatal());
        let err: AppError = ConfigError::DirectoryNotFound {
            path: "/nope".into(),
        }
        .into();
        assert!(err.is_fatal());
    }

    #[test]
    fn business_error_display_includes_message() {
        let err = AppError::business("/api/v5/edictos/rag", "No existe el edicto");
        assert!(err.to_string().contains("No existe el edicto"));
    }
}
