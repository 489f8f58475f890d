//! LLM 服务 - 业务能力层
//!
//! 只负责"文本 → 综述"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点、组织与项目
//! - 兼容 OpenAI API 的服务

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::SynthesisError;

/// 一次综述的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// 服务端报告的模型标识
    pub model: String,
    pub text: String,
    pub token_count: u32,
}

/// 综述能力
///
/// 单次请求，不重试，不使用流式响应。
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(
        &self,
        system_prompt: &str,
        document_text: &str,
    ) -> Result<Synthesis, SynthesisError>;
}

/// LLM 服务
///
/// 职责：
/// - 以固定的系统提示词和文档全文调用 chat completion
/// - 返回完整的综述文本、模型与 token 数
/// - 不出现 Record / 分页
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    timeout: Duration,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let mut openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);
        if !config.llm_org_id.is_empty() {
            openai_config = openai_config.with_org_id(&config.llm_org_id);
        }
        if !config.llm_project_id.is_empty() {
            openai_config = openai_config.with_project_id(&config.llm_project_id);
        }

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            timeout: config.llm_timeout(),
        }
    }

    /// 通用的 LLM 调用
    ///
    /// 系统提示词为空时只发送用户消息。
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<Synthesis, SynthesisError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        let api_failed = |e: async_openai::error::OpenAIError| SynthesisError::ApiCallFailed {
            model: self.model_name.clone(),
            message: e.to_string(),
        };

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message.filter(|s| !s.trim().is_empty()) {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(api_failed)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(api_failed)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .build()
            .map_err(api_failed)?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| SynthesisError::Timeout {
                model: self.model_name.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                api_failed(e)
            })?;

        debug!("LLM API 调用成功");

        into_synthesis(&self.model_name, response)
    }
}

/// 从 chat completion 响应中取出综述
///
/// 文本按服务端返回原样保留；缺少 usage 视为错误，不写回 0。
fn into_synthesis(
    requested_model: &str,
    response: CreateChatCompletionResponse,
) -> Result<Synthesis, SynthesisError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| SynthesisError::EmptyContent {
            model: requested_model.to_string(),
        })?;

    let usage = response.usage.ok_or_else(|| {
        warn!("LLM 响应缺少 usage 字段，模型: {}", response.model);
        SynthesisError::MissingUsage {
            model: response.model.clone(),
        }
    })?;

    Ok(Synthesis {
        model: response.model,
        text,
        token_count: usage.total_tokens,
    })
}

#[async_trait]
impl Synthesizer for LlmService {
    async fn synthesize(
        &self,
        system_prompt: &str,
        document_text: &str,
    ) -> Result<Synthesis, SynthesisError> {
        self.send_to_llm(document_text, Some(system_prompt)).await
    }
}
