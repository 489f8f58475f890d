mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cli::{Cli, Command, RangeArgs};
use hercules_rag::infrastructure::get_token;
use hercules_rag::services::catalog::{authorities_table, districts_table};
use hercules_rag::services::{CatalogService, LlmService, PdfTextExtractor, TextExtractor};
use hercules_rag::utils::logging;
use hercules_rag::workflow::{FlowOptions, Mode};
use hercules_rag::{ApiExecutor, App, Config, DateRange, Resource, RunRequest};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    let cli = Cli::parse();
    let resource = cli.resource;

    // 加载配置
    let config = Config::load(cli.config.as_deref()).context("配置加载失败")?;

    match cli.command {
        Command::Analyze(args) => {
            let config = config.with_threads(args.threads)?;
            sync(config, resource, Mode::Analyze, &args.range).await
        }
        Command::Synthesize(args) => sync(config, resource, Mode::Synthesize, &args.range).await,
        Command::Ask { question } => {
            let llm = LlmService::new(&config);
            let answer = llm
                .send_to_llm(&question, Some(&config.llm_system_prompt))
                .await?;
            println!("{}", answer.text);
            Ok(())
        }
        Command::Extract { file } => {
            let text = PdfTextExtractor::new().extract(&file)?;
            println!("{}", text);
            Ok(())
        }
        Command::SynthesizeFile { file } => {
            let text = PdfTextExtractor::new().extract(&file)?;
            let llm = LlmService::new(&config);
            let synthesis = llm
                .send_to_llm(&text, Some(&config.llm_system_prompt))
                .await?;
            println!("{}", synthesis.text);
            eprintln!("{} / {} tokens", synthesis.model, synthesis.token_count);
            Ok(())
        }
        Command::Authorities { notaries } => {
            let executor = connect(&config).await?;
            let catalog = CatalogService::new(&executor, config.page_size);
            let items = catalog.authorities(notaries).await?;
            println!("{}", authorities_table(&items));
            Ok(())
        }
        Command::Districts => {
            let executor = connect(&config).await?;
            let catalog = CatalogService::new(&executor, config.page_size);
            let items = catalog.districts().await?;
            println!("{}", districts_table(&items));
            Ok(())
        }
    }
}

/// 认证并创建 HTTP 执行器
async fn connect(config: &Config) -> Result<ApiExecutor> {
    let token = get_token(config).await?;
    Ok(ApiExecutor::new(config, token)?)
}

/// 初始化并运行同步流程
async fn sync(config: Config, resource: Resource, mode: Mode, args: &RangeArgs) -> Result<()> {
    let Some(range) = DateRange::new(args.from, args.to) else {
        bail!("日期范围无效: {} 晚于 {}", args.from, args.to);
    };

    let request = RunRequest {
        resource,
        mode,
        range,
        options: FlowOptions {
            overwrite: args.overwrite,
            dry_run: args.dry_run,
        },
    };

    App::initialize(config, resource).await?.run(request).await?;
    Ok(())
}
