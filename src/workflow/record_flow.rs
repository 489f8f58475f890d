//! 记录处理流程 - 流程层
//!
//! 核心职责：定义"一条记录"的完整处理流程
//!
//! 分析模式：
//! 1. 已分析且不覆盖 → 跳过
//! 2. 本地文件不存在 → 跳过
//! 3. 提取失败 → 跳过
//! 4. 文本为空 → 跳过
//! 5. 构建分析结果 → 写回（试运行时只构建）
//!
//! 综述模式：
//! 1. 未分析 / 已综述且不覆盖 → 跳过
//! 2. 读取详情中的分析文本，逐级校验
//! 3. LLM 综述失败 → 跳过
//! 4. 构建综述结果 → 写回（试运行时只构建）

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::RecordApi;
use crate::models::{AnalysisPayload, RagUpdate, Record, SynthesisPayload};
use crate::services::{PathMapper, PublishStatus, ResultPublisher, Synthesizer, TextExtractor};
use crate::utils::logging::truncate_text;
use crate::workflow::RecordCtx;

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 提取文本并写回分析结果
    Analyze,
    /// 基于已有分析文本生成综述并写回
    Synthesize,
}

/// 命令行开关
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowOptions {
    /// 忽略已处理标记
    pub overwrite: bool,
    /// 只构建结果，不写回
    pub dry_run: bool,
}

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    AlreadyAnalyzed,
    InvalidUrl,
    MissingFile,
    ExtractionError,
    EmptyText,
    NotAnalyzed,
    AlreadySynthesized,
    NoData,
    NoAnalysis,
    NoTextField,
    SynthesisError,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::AlreadyAnalyzed => "already-analyzed",
            SkipReason::InvalidUrl => "invalid-url",
            SkipReason::MissingFile => "missing-file",
            SkipReason::ExtractionError => "extraction-error",
            SkipReason::EmptyText => "empty-text",
            SkipReason::NotAnalyzed => "not-analyzed",
            SkipReason::AlreadySynthesized => "already-synthesized",
            SkipReason::NoData => "no-data",
            SkipReason::NoAnalysis => "no-analysis",
            SkipReason::NoTextField => "no-text-field",
            SkipReason::SynthesisError => "synthesis-error",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单条记录的终态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 已写回
    Sent,
    /// 试运行：已构建未写回
    Tested,
    /// 跳过
    Skipped(SkipReason),
    /// 远程返回 `success: false`
    Rejected(String),
}

/// 流程依赖的外部能力
#[derive(Clone)]
pub struct FlowDeps {
    pub api: Arc<dyn RecordApi>,
    pub extractor: Arc<dyn TextExtractor>,
    pub synthesizer: Arc<dyn Synthesizer>,
}

/// 一次文本提取任务
///
/// 只含阻塞的第 2 至 4 步，可以整体移交给工作线程。
pub struct AnalysisJob {
    pub ctx: RecordCtx,
    record: Record,
    mapper: PathMapper,
    extractor: Arc<dyn TextExtractor>,
    preview_chars: usize,
}

impl AnalysisJob {
    /// 定位文件、提取文本并构建分析结果（阻塞）
    pub fn run(self) -> Result<AnalysisPayload, SkipReason> {
        let ctx = &self.ctx;

        let Some(remote_url) = self.record.remote_url.as_deref() else {
            warn!("{} ⚠️ 记录没有 url", ctx);
            return Err(SkipReason::InvalidUrl);
        };

        let path: PathBuf = match self.mapper.resolve(remote_url) {
            Ok(path) => path,
            Err(e) => {
                warn!("{} ⚠️ {}", ctx, e);
                return Err(SkipReason::InvalidUrl);
            }
        };

        if !path.is_file() {
            warn!(
                "{} ⚠️ {} 不存在 ({})",
                ctx,
                self.record.display_name.as_deref().unwrap_or("-"),
                path.display()
            );
            return Err(SkipReason::MissingFile);
        }

        let text = match self.extractor.extract(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!("{} ⚠️ {}", ctx, e);
                return Err(SkipReason::ExtractionError);
            }
        };

        if text.trim().is_empty() {
            warn!("{} ⚠️ 没有文本", ctx);
            return Err(SkipReason::EmptyText);
        }

        let archive_size = match std::fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("{} ⚠️ 无法读取文件大小: {}", ctx, e);
                return Err(SkipReason::ExtractionError);
            }
        };

        let payload = AnalysisPayload::new(
            self.record.id,
            archive_size,
            self.record.authority_key.clone(),
            text,
        );
        info!(
            "{} {} = {}",
            ctx,
            truncate_text(&payload.text, self.preview_chars),
            payload.length
        );

        Ok(payload)
    }
}

/// 记录处理流程
///
/// - 两种模式共用同一套判断与写回逻辑
/// - 不持有分页状态
/// - 可恢复的错误在这里转换为跳过原因，致命错误向上传播
pub struct RecordFlow {
    mode: Mode,
    options: FlowOptions,
    mapper: PathMapper,
    deps: FlowDeps,
    publisher: ResultPublisher,
    system_prompt: String,
    preview_chars: usize,
}

impl RecordFlow {
    pub fn new(
        mode: Mode,
        options: FlowOptions,
        mapper: PathMapper,
        deps: FlowDeps,
        resource: crate::models::Resource,
    ) -> Self {
        let publisher = ResultPublisher::new(deps.api.clone(), resource);
        Self {
            mode,
            options,
            mapper,
            deps,
            publisher,
            system_prompt: String::new(),
            preview_chars: 40,
        }
    }

    /// 综述使用的系统提示词
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// 日志预览长度
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// 按模式处理一条记录
    pub async fn run(&self, ctx: &RecordCtx, record: Record) -> AppResult<Outcome> {
        let outcome = match self.mode {
            Mode::Analyze => self.run_analyze(ctx, record).await?,
            Mode::Synthesize => self.run_synthesize(ctx, record).await?,
        };
        self.report(ctx, &outcome);
        Ok(outcome)
    }

    // ========== 分析模式 ==========

    /// 第 1 步：不调用提取器即可判断的跳过
    pub fn analyze_precheck(&self, record: &Record) -> Option<SkipReason> {
        (!self.options.overwrite && record.is_analyzed()).then_some(SkipReason::AlreadyAnalyzed)
    }

    /// 构建可移交给工作线程的提取任务
    pub fn analysis_job(&self, ctx: RecordCtx, record: Record) -> AnalysisJob {
        AnalysisJob {
            ctx,
            record,
            mapper: self.mapper.clone(),
            extractor: self.deps.extractor.clone(),
            preview_chars: self.preview_chars,
        }
    }

    /// 提取完成后的写回步骤
    pub async fn finish_analysis(
        &self,
        prepared: Result<AnalysisPayload, SkipReason>,
    ) -> AppResult<Outcome> {
        match prepared {
            Ok(payload) => self.deliver(RagUpdate::analysis(payload)).await,
            Err(reason) => Ok(Outcome::Skipped(reason)),
        }
    }

    async fn run_analyze(&self, ctx: &RecordCtx, record: Record) -> AppResult<Outcome> {
        if let Some(reason) = self.analyze_precheck(&record) {
            return Ok(Outcome::Skipped(reason));
        }

        let job = self.analysis_job(ctx.clone(), record);
        let prepared = match tokio::task::spawn_blocking(move || job.run()).await {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!("{} ⚠️ 提取任务异常退出: {}", ctx, e);
                Err(SkipReason::ExtractionError)
            }
        };

        self.finish_analysis(prepared).await
    }

    // ========== 综述模式 ==========

    /// 综述前置判断：必须已分析，且未综述或允许覆盖
    pub fn synthesize_precheck(&self, record: &Record) -> Option<SkipReason> {
        if !record.is_analyzed() {
            return Some(SkipReason::NotAnalyzed);
        }
        if !self.options.overwrite && record.is_synthesized() {
            return Some(SkipReason::AlreadySynthesized);
        }
        None
    }

    async fn run_synthesize(&self, ctx: &RecordCtx, record: Record) -> AppResult<Outcome> {
        if let Some(reason) = self.synthesize_precheck(&record) {
            return Ok(Outcome::Skipped(reason));
        }

        let text = match self.fetch_analysis_text(ctx).await? {
            Ok(text) => text,
            Err(reason) => return Ok(Outcome::Skipped(reason)),
        };

        let synthesis = match self
            .deps
            .synthesizer
            .synthesize(&self.system_prompt, &text)
            .await
        {
            Ok(synthesis) => synthesis,
            Err(e) => {
                warn!("{} ⚠️ 综述失败: {}", ctx, e);
                return Ok(Outcome::Skipped(SkipReason::SynthesisError));
            }
        };

        info!(
            "{} {} = {} tokens",
            ctx,
            truncate_text(&synthesis.text, self.preview_chars),
            synthesis.token_count
        );

        let payload = SynthesisPayload {
            id: record.id,
            model: synthesis.model,
            synthesis_text: synthesis.text,
            token_count: synthesis.token_count,
        };
        self.deliver(RagUpdate::synthesis(payload)).await
    }

    /// 读取 `data.rag_analisis.texto`，任何一级缺失都对应不同的跳过原因
    async fn fetch_analysis_text(&self, ctx: &RecordCtx) -> AppResult<Result<String, SkipReason>> {
        let envelope = self.deps.api.detail(ctx.resource, ctx.id).await?;
        if !envelope.success {
            return Err(AppError::business(
                ctx.resource.detail_path(ctx.id),
                envelope.message_or_default(),
            ));
        }

        let Some(detail) = envelope.data else {
            return Ok(Err(SkipReason::NoData));
        };
        let Some(analysis) = detail.rag_analysis else {
            return Ok(Err(SkipReason::NoAnalysis));
        };
        let Some(text) = analysis.text else {
            return Ok(Err(SkipReason::NoTextField));
        };
        if text.trim().is_empty() {
            return Ok(Err(SkipReason::EmptyText));
        }

        Ok(Ok(text))
    }

    // ========== 写回 ==========

    async fn deliver(&self, update: RagUpdate) -> AppResult<Outcome> {
        if self.options.dry_run {
            return Ok(Outcome::Tested);
        }

        match self.publisher.publish(&update).await? {
            PublishStatus::Accepted => Ok(Outcome::Sent),
            PublishStatus::Rejected(message) => Ok(Outcome::Rejected(message)),
        }
    }

    /// 输出一条记录的最终结果
    pub fn report(&self, ctx: &RecordCtx, outcome: &Outcome) {
        match outcome {
            Outcome::Sent => info!(id = ctx.id, outcome = "sent", "{} ✓ ENVIADO", ctx),
            Outcome::Tested => info!(id = ctx.id, outcome = "tested", "{} ✓ PROBADO", ctx),
            Outcome::Skipped(reason) => {
                info!(id = ctx.id, reason = reason.as_str(), "{} ⏭️ 跳过: {}", ctx, reason)
            }
            Outcome::Rejected(message) => warn!(
                id = ctx.id,
                reason = "publish-rejected",
                "{} ⚠️ 远程拒绝写入: {}",
                ctx,
                message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, SynthesisError};
    use crate::models::{Envelope, Page, RecordDetail, Resource};
    use crate::services::Synthesis;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CountingExtractor {
        calls: AtomicUsize,
    }

    impl TextExtractor for CountingExtractor {
        fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let content = std::fs::read_to_string(path).map_err(|e| ExtractionError::Failed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            if content.starts_with("%dañado") {
                return Err(ExtractionError::Failed {
                    path: path.display().to_string(),
                    message: "xref roto".into(),
                });
            }
            Ok(content)
        }
    }

    struct FixedSynthesizer {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Synthesizer for FixedSynthesizer {
        async fn synthesize(&self, _: &str, text: &str) -> Result<Synthesis, SynthesisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SynthesisError::EmptyContent {
                    model: "fake".into(),
                });
            }
            Ok(Synthesis {
                model: "fake-model".into(),
                text: format!("síntesis de {} caracteres", text.chars().count()),
                token_count: 42,
            })
        }
    }

    struct DetailApi {
        detail: serde_json::Value,
        puts: Mutex<Vec<RagUpdate>>,
    }

    #[async_trait]
    impl RecordApi for DetailApi {
        async fn list(
            &self,
            _: Resource,
            _: &[(&'static str, String)],
            _: usize,
            _: usize,
        ) -> AppResult<Page> {
            unreachable!()
        }

        async fn detail(&self, _: Resource, _: i64) -> AppResult<Envelope<RecordDetail>> {
            Ok(serde_json::from_value(self.detail.clone()).unwrap())
        }

        async fn put_rag(
            &self,
            _: Resource,
            update: &RagUpdate,
        ) -> AppResult<Envelope<serde_json::Value>> {
            self.puts.lock().unwrap().push(update.clone());
            Ok(Envelope {
                success: true,
                message: None,
                data: None,
            })
        }
    }

    struct Fixture {
        api: Arc<DetailApi>,
        extractor: Arc<CountingExtractor>,
        synthesizer: Arc<FixedSynthesizer>,
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new(detail: serde_json::Value, synth_fails: bool) -> Self {
            Self {
                api: Arc::new(DetailApi {
                    detail,
                    puts: Mutex::new(Vec::new()),
                }),
                extractor: Arc::new(CountingExtractor {
                    calls: AtomicUsize::new(0),
                }),
                synthesizer: Arc::new(FixedSynthesizer {
                    calls: AtomicUsize::new(0),
                    fail: synth_fails,
                }),
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn flow(&self, mode: Mode, options: FlowOptions) -> RecordFlow {
            let deps = FlowDeps {
                api: self.api.clone(),
                extractor: self.extractor.clone(),
                synthesizer: self.synthesizer.clone(),
            };
            let mapper = PathMapper::new(self.dir.path(), "https://g/a/");
            RecordFlow::new(mode, options, mapper, deps, Resource::Edictos)
                .with_system_prompt("Resume")
        }
    }

    fn record(id: i64, analyzed: bool, synthesized: bool) -> Record {
        Record {
            id,
            remote_url: Some(format!("https://g/a/{id}.pdf")),
            display_name: Some(format!("{id}.pdf")),
            authority_key: Some("TRC-J1".into()),
            analyzed_at: analyzed.then(|| "2024-05-01T10:00:00".to_string()),
            synthesized_at: synthesized.then(|| "2024-05-02T10:00:00".to_string()),
        }
    }

    fn ctx(id: i64) -> RecordCtx {
        RecordCtx::new(Resource::Edictos, 1, 1, id)
    }

    #[tokio::test]
    async fn already_analyzed_skips_without_extracting() {
        let fx = Fixture::new(serde_json::Value::Null, false);
        let flow = fx.flow(Mode::Analyze, FlowOptions::default());

        let outcome = flow.run(&ctx(1), record(1, true, false)).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::AlreadyAnalyzed));
        assert_eq!(fx.extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn overwrite_proceeds_to_existence_check() {
        let fx = Fixture::new(serde_json::Value::Null, false);
        let options = FlowOptions {
            overwrite: true,
            dry_run: false,
        };
        let flow = fx.flow(Mode::Analyze, options);

        let outcome = flow.run(&ctx(2), record(2, true, false)).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::MissingFile));
    }

    #[tokio::test]
    async fn empty_text_is_skipped() {
        let fx = Fixture::new(serde_json::Value::Null, false);
        std::fs::write(fx.dir.path().join("3.pdf"), "   \n  ").unwrap();
        let flow = fx.flow(Mode::Analyze, FlowOptions::default());

        let outcome = flow.run(&ctx(3), record(3, false, false)).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::EmptyText));
        assert!(fx.api.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dry_run_builds_but_never_publishes() {
        let fx = Fixture::new(serde_json::Value::Null, false);
        std::fs::write(fx.dir.path().join("4.pdf"), "hola").unwrap();
        let options = FlowOptions {
            overwrite: false,
            dry_run: true,
        };
        let flow = fx.flow(Mode::Analyze, options);

        let outcome = flow.run(&ctx(4), record(4, false, false)).await.unwrap();

        assert_eq!(outcome, Outcome::Tested);
        assert!(fx.api.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn extraction_failure_skips_and_the_next_record_still_runs() {
        let fx = Fixture::new(serde_json::Value::Null, false);
        std::fs::write(fx.dir.path().join("12.pdf"), "%dañado").unwrap();
        std::fs::write(fx.dir.path().join("13.pdf"), "hola").unwrap();
        let flow = fx.flow(Mode::Analyze, FlowOptions::default());

        let first = flow.run(&ctx(12), record(12, false, false)).await.unwrap();
        assert_eq!(first, Outcome::Skipped(SkipReason::ExtractionError));
        assert!(fx.api.puts.lock().unwrap().is_empty());

        let second = flow.run(&ctx(13), record(13, false, false)).await.unwrap();
        assert_eq!(second, Outcome::Sent);
        assert_eq!(fx.extractor.calls.load(Ordering::SeqCst), 2);
        assert_eq!(fx.api.puts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn null_url_is_an_invalid_url_skip() {
        let fx = Fixture::new(serde_json::Value::Null, false);
        let flow = fx.flow(Mode::Analyze, FlowOptions::default());
        let record = Record {
            remote_url: None,
            ..record(14, false, false)
        };

        let outcome = flow.run(&ctx(14), record).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::InvalidUrl));
        assert_eq!(fx.extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn null_author_is_published_as_null() {
        let fx = Fixture::new(serde_json::Value::Null, false);
        std::fs::write(fx.dir.path().join("15.pdf"), "hola").unwrap();
        let flow = fx.flow(Mode::Analyze, FlowOptions::default());
        let record = Record {
            authority_key: None,
            display_name: None,
            ..record(15, false, false)
        };

        let outcome = flow.run(&ctx(15), record).await.unwrap();

        assert_eq!(outcome, Outcome::Sent);
        let puts = fx.api.puts.lock().unwrap();
        assert!(puts[0].analysis_payload().unwrap().author.is_none());
    }

    #[tokio::test]
    async fn analysis_payload_carries_size_author_and_length() {
        let fx = Fixture::new(serde_json::Value::Null, false);
        std::fs::write(fx.dir.path().join("5.pdf"), "hola").unwrap();
        let flow = fx.flow(Mode::Analyze, FlowOptions::default());

        let outcome = flow.run(&ctx(5), record(5, false, false)).await.unwrap();

        assert_eq!(outcome, Outcome::Sent);
        let puts = fx.api.puts.lock().unwrap();
        let payload = puts[0].analysis_payload().unwrap();
        assert_eq!(payload.id, 5);
        assert_eq!(payload.archive_size, 4);
        assert_eq!(payload.author.as_deref(), Some("TRC-J1"));
        assert_eq!(payload.length, 4);
        assert_eq!(payload.text, "hola");
        assert!(puts[0].synthesis_payload().is_none());
    }

    #[tokio::test]
    async fn synthesize_requires_prior_analysis_even_with_overwrite() {
        let fx = Fixture::new(serde_json::Value::Null, false);
        let options = FlowOptions {
            overwrite: true,
            dry_run: false,
        };
        let flow = fx.flow(Mode::Synthesize, options);

        let outcome = flow.run(&ctx(6), record(6, false, false)).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::NotAnalyzed));
        assert_eq!(fx.synthesizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn already_synthesized_is_skipped_unless_overwrite() {
        let detail = serde_json::json!({
            "success": true,
            "data": {"id": 7, "rag_analisis": {"texto": "hola"}}
        });
        let fx = Fixture::new(detail, false);

        let flow = fx.flow(Mode::Synthesize, FlowOptions::default());
        let outcome = flow.run(&ctx(7), record(7, true, true)).await.unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::AlreadySynthesized));

        let flow = fx.flow(
            Mode::Synthesize,
            FlowOptions {
                overwrite: true,
                dry_run: false,
            },
        );
        let outcome = flow.run(&ctx(7), record(7, true, true)).await.unwrap();
        assert_eq!(outcome, Outcome::Sent);
    }

    #[tokio::test]
    async fn missing_analysis_chain_levels_have_distinct_reasons() {
        let cases = [
            (serde_json::json!({"success": true, "data": null}), SkipReason::NoData),
            (
                serde_json::json!({"success": true, "data": {"id": 8}}),
                SkipReason::NoAnalysis,
            ),
            (
                serde_json::json!({"success": true, "data": {"id": 8, "rag_analisis": {}}}),
                SkipReason::NoTextField,
            ),
            (
                serde_json::json!({"success": true, "data": {"id": 8, "rag_analisis": {"texto": "  "}}}),
                SkipReason::EmptyText,
            ),
        ];

        for (detail, expected) in cases {
            let fx = Fixture::new(detail, false);
            let flow = fx.flow(Mode::Synthesize, FlowOptions::default());
            let outcome = flow.run(&ctx(8), record(8, true, false)).await.unwrap();
            assert_eq!(outcome, Outcome::Skipped(expected));
            assert_eq!(fx.synthesizer.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn synthesis_failure_is_not_fatal() {
        let detail = serde_json::json!({
            "success": true,
            "data": {"id": 9, "rag_analisis": {"texto": "hola"}}
        });
        let fx = Fixture::new(detail, true);
        let flow = fx.flow(Mode::Synthesize, FlowOptions::default());

        let outcome = flow.run(&ctx(9), record(9, true, false)).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::SynthesisError));
        assert!(fx.api.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn detail_success_false_is_fatal() {
        let detail = serde_json::json!({"success": false, "message": "Token expirado"});
        let fx = Fixture::new(detail, false);
        let flow = fx.flow(Mode::Synthesize, FlowOptions::default());

        let err = flow.run(&ctx(10), record(10, true, false)).await.unwrap_err();

        assert!(matches!(err, AppError::Business(_)));
    }

    #[tokio::test]
    async fn synthesis_payload_is_published() {
        let detail = serde_json::json!({
            "success": true,
            "data": {"id": 11, "rag_analisis": {"texto": "hola"}}
        });
        let fx = Fixture::new(detail, false);
        let flow = fx.flow(Mode::Synthesize, FlowOptions::default());

        let outcome = flow.run(&ctx(11), record(11, true, false)).await.unwrap();

        assert_eq!(outcome, Outcome::Sent);
        let puts = fx.api.puts.lock().unwrap();
        let payload = puts[0].synthesis_payload().unwrap();
        assert_eq!(payload.id, 11);
        assert_eq!(payload.model, "fake-model");
        assert_eq!(payload.token_count, 42);
        assert!(puts[0].analysis_payload().is_none());
    }
}
