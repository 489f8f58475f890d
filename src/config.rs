use crate::error::{AppResult, ConfigError};
use crate::models::Resource;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置
///
/// 构造一次后以引用方式传递给每个组件，运行期间不可变。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 远程 API 配置 ---
    pub api_base_url: String,
    pub username: String,
    pub password: String,
    /// 每页记录数
    pub page_size: usize,
    /// 请求超时（秒）
    pub timeout_secs: u64,
    /// 提取线程数
    pub threads: usize,
    // --- 本地镜像配置 ---
    pub sentencias_base_dir: String,
    pub sentencias_remote_base_url: String,
    pub edictos_base_dir: String,
    pub edictos_remote_base_url: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_org_id: String,
    pub llm_project_id: String,
    pub llm_system_prompt: String,
    pub llm_timeout_secs: u64,
    /// 日志中预览文本的字符数
    pub preview_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            username: String::new(),
            password: String::new(),
            page_size: 100,
            timeout_secs: 20,
            threads: default_threads(),
            sentencias_base_dir: "sentencias".to_string(),
            sentencias_remote_base_url: "https://storage.googleapis.com/sentencias".to_string(),
            edictos_base_dir: "edictos".to_string(),
            edictos_remote_base_url: "https://storage.googleapis.com/edictos".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_org_id: String::new(),
            llm_project_id: String::new(),
            llm_system_prompt: "Eres un asistente jurídico. Elabora una síntesis breve y objetiva \
                                del siguiente documento judicial, en español."
                .to_string(),
            llm_timeout_secs: 60,
            preview_chars: 40,
        }
    }
}

impl Config {
    /// 默认值 → 可选 TOML 文件 → 环境变量
    pub fn load(toml_path: Option<&Path>) -> AppResult<Self> {
        let base = match toml_path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取，缺失的字段取默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::AppError::io(path.display().to_string(), e))?;
        let config = toml::from_str(&content).map_err(|e| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            api_base_url: env_string("API_BASE_URL").unwrap_or(self.api_base_url),
            username: env_string("USERNAME").unwrap_or(self.username),
            password: env_string("PASSWORD").unwrap_or(self.password),
            page_size: env_parse("LIMIT", "usize")?.unwrap_or(self.page_size),
            timeout_secs: env_parse("TIMEOUT", "u64")?.unwrap_or(self.timeout_secs),
            threads: env_parse("THREADS", "usize")?.unwrap_or(self.threads),
            sentencias_base_dir: env_string("SENTENCIAS_BASE_DIR")
                .unwrap_or(self.sentencias_base_dir),
            sentencias_remote_base_url: env_string("SENTENCIAS_GCS_BASE_URL")
                .unwrap_or(self.sentencias_remote_base_url),
            edictos_base_dir: env_string("EDICTOS_BASE_DIR").unwrap_or(self.edictos_base_dir),
            edictos_remote_base_url: env_string("EDICTOS_GCS_BASE_URL")
                .unwrap_or(self.edictos_remote_base_url),
            llm_api_key: env_string("OPENAI_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: env_string("OPENAI_ENDPOINT").unwrap_or(self.llm_api_base_url),
            llm_model_name: env_string("OPENAI_MODEL").unwrap_or(self.llm_model_name),
            llm_org_id: env_string("OPENAI_ORG_ID").unwrap_or(self.llm_org_id),
            llm_project_id: env_string("OPENAI_PROJECT_ID").unwrap_or(self.llm_project_id),
            llm_system_prompt: env_string("OPENAI_PROMPT").unwrap_or(self.llm_system_prompt),
            llm_timeout_secs: env_parse("OPENAI_TIMEOUT", "u64")?
                .unwrap_or(self.llm_timeout_secs),
            preview_chars: env_parse("MOSTRAR_CARACTERES", "usize")?
                .unwrap_or(self.preview_chars),
        })
    }

    /// 校验不可为零的数值项
    pub fn validate(&self) -> AppResult<()> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "LIMIT".into(),
                reason: "必须大于 0".into(),
            }
            .into());
        }
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                name: "THREADS".into(),
                reason: "必须大于 0".into(),
            }
            .into());
        }
        Ok(())
    }

    /// 覆盖线程数（来自命令行）
    pub fn with_threads(mut self, threads: Option<usize>) -> AppResult<Self> {
        if let Some(n) = threads {
            self.threads = n;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// 资源对应的本地目录
    pub fn base_dir(&self, resource: Resource) -> &str {
        match resource {
            Resource::Sentencias => &self.sentencias_base_dir,
            Resource::Edictos => &self.edictos_base_dir,
        }
    }

    /// 资源对应的远程存储前缀
    pub fn remote_base_url(&self, resource: Resource) -> &str {
        match resource {
            Resource::Sentencias => &self.sentencias_remote_base_url,
            Resource::Edictos => &self.edictos_remote_base_url,
        }
    }
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_parse<T: std::str::FromStr>(name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| {
                ConfigError::EnvVarParseFailed {
                    var_name: name.to_string(),
                    value,
                    expected_type: expected_type.to_string(),
                }
                .into()
            }),
        Err(_) => Ok(None),
    }
}
