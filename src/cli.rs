//! 命令行定义

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use hercules_rag::Resource;

/// 判决与公告的 RAG 同步工具
#[derive(Debug, Parser)]
#[command(name = "hercules-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// 远程集合：sentencias 或 edictos
    #[arg(short, long, global = true, default_value = "edictos", value_parser = parse_resource)]
    pub resource: Resource,

    /// TOML 配置文件，环境变量优先
    #[arg(short, long, global = true, env = "HERCULES_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

fn parse_resource(s: &str) -> Result<Resource, String> {
    Resource::from_str(s).ok_or_else(|| format!("未知的集合: {s}"))
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 提取本地 PDF 文本并写回分析结果
    Analyze(AnalyzeArgs),

    /// 基于分析文本生成 LLM 综述并写回
    Synthesize(SynthesizeArgs),

    /// 向 LLM 提一个问题
    Ask {
        question: String,
    },

    /// 提取一个本地 PDF 的文本
    Extract {
        file: PathBuf,
    },

    /// 提取一个本地 PDF 并输出综述
    SynthesizeFile {
        file: PathBuf,
    },

    /// 列出机构
    Authorities {
        /// 只列出公证处
        #[arg(long)]
        notaries: bool,
    },

    /// 列出司法区
    Districts,
}

/// 日期范围，格式 YYYY-MM-DD
#[derive(Debug, Parser)]
pub struct RangeArgs {
    /// 创建日期下限
    pub from: NaiveDate,

    /// 创建日期上限
    pub to: NaiveDate,

    /// 忽略已处理标记
    #[arg(long)]
    pub overwrite: bool,

    /// 只构建结果，不写回
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// 提取线程数，默认为 CPU 数
    #[arg(short, long)]
    pub threads: Option<usize>,
}

#[derive(Debug, Parser)]
pub struct SynthesizeArgs {
    #[command(flatten)]
    pub range: RangeArgs,
}
