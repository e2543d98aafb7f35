//! 命令行入口
//!
//! 每个子命令对应管理后台的一个页面：聊天机器人列表、题库、酒店、分析运行、报表导出。

use crate::clients::ApiClient;
use crate::config::Config;
use crate::models::{load_run_plan, HotelForm, CHATBOTS};
use crate::orchestrator::{App, RunOptions};
use crate::services::{HotelService, QuestionService};
use crate::utils::{logging, truncate_text};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "chatbot-analyzer")]
#[command(about = "Manage hotel chatbots and batch-ask questions through the analyzer API")]
pub struct Cli {
    /// TOML config file (environment variables still override it)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Backend API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the supported chatbots
    Chatbots,
    /// Manage the question bank
    Questions {
        #[command(subcommand)]
        action: QuestionAction,
    },
    /// Manage the hotel roster
    Hotels {
        #[command(subcommand)]
        action: HotelAction,
    },
    /// Ask every selected question to every selected hotel, batch by batch
    Run(RunArgs),
    /// Generate a spreadsheet report from a saved results file
    Report {
        /// analysis_<timestamp>.json written by `run`
        results: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum QuestionAction {
    List,
    Add { text: String },
    Update { old: String, new: String },
    Delete { text: String },
}

#[derive(Debug, Subcommand)]
pub enum HotelAction {
    List {
        /// Also print each hotel's JSON payload
        #[arg(long)]
        payload: bool,
    },
    Add(HotelAddArgs),
    Update(HotelUpdateArgs),
    Delete { name: String },
}

#[derive(Debug, Args)]
pub struct HotelAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub company_id: String,
    #[command(flatten)]
    pub payload: PayloadArgs,
}

#[derive(Debug, Args)]
pub struct HotelUpdateArgs {
    /// Current hotel name
    pub name: String,
    #[arg(long)]
    pub rename: Option<String>,
    #[arg(long)]
    pub company_id: Option<String>,
    #[command(flatten)]
    pub payload: PayloadArgs,
}

#[derive(Debug, Args)]
pub struct PayloadArgs {
    /// JSON payload text
    #[arg(long, conflicts_with = "payload_file")]
    pub payload: Option<String>,
    /// Read the JSON payload from a file
    #[arg(long)]
    pub payload_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Chatbot id (default: asksuite)
    #[arg(long)]
    pub chatbot: Option<String>,
    /// Question to select (repeatable)
    #[arg(short, long = "question")]
    pub questions: Vec<String>,
    /// Hotel name to select (repeatable)
    #[arg(long = "hotel")]
    pub hotels: Vec<String>,
    #[arg(long)]
    pub all_questions: bool,
    #[arg(long)]
    pub all_hotels: bool,
    /// Combinations per batch
    #[arg(long)]
    pub batch_size: Option<usize>,
    /// TOML run plan with the selection
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Download the spreadsheet report when the run ends
    #[arg(long)]
    pub report: bool,
}

impl RunArgs {
    fn to_options(&self) -> RunOptions {
        RunOptions {
            chatbot: self.chatbot.clone(),
            questions: self.questions.clone(),
            hotels: self.hotels.clone(),
            all_questions: self.all_questions,
            all_hotels: self.all_hotels,
            batch_size: self.batch_size,
            report: self.report,
        }
    }
}

impl PayloadArgs {
    async fn read(&self) -> Result<Option<String>> {
        match (&self.payload, &self.payload_file) {
            (Some(text), _) => Ok(Some(text.clone())),
            (None, Some(path)) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("无法读取 payload 文件: {}", path.display()))?;
                Ok(Some(text))
            }
            (None, None) => Ok(None),
        }
    }
}

/// 按命令行参数构建配置：默认值 → TOML 文件 → 环境变量 → 命令行
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?.merge_env()?,
        None => Config::from_env()?,
    };
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    config.verbose_logging |= cli.verbose;
    Ok(config)
}

/// 执行命令
pub async fn execute(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    logging::init(config.verbose_logging);

    match cli.command {
        Commands::Chatbots => {
            for chatbot in CHATBOTS {
                println!("{:<12} {:<12} {}", chatbot.id, chatbot.name, chatbot.description);
            }
            Ok(())
        }
        Commands::Questions { action } => {
            let service = QuestionService::new(ApiClient::new(&config)?);
            run_question_action(&service, action).await
        }
        Commands::Hotels { action } => {
            let service = HotelService::new(ApiClient::new(&config)?);
            run_hotel_action(&service, action).await
        }
        Commands::Run(args) => {
            let mut options = args.to_options();
            if let Some(plan_path) = &args.plan {
                options = options.merge_plan(load_run_plan(plan_path).await?);
            }

            let app = App::initialize(config)?;
            let summary = app.run_analysis(&options).await?;
            if let Some(path) = &summary.report_path {
                println!("{}", path.display());
            }
            println!("{}", summary.results_path.display());

            if let Some(err) = summary.outcome.error() {
                bail!(
                    "运行未完成: {} (已保留 {}/{} 条结果)",
                    err,
                    summary.outcome.response().results.len(),
                    summary.total_combinations
                );
            }
            Ok(())
        }
        Commands::Report { results } => {
            if !looks_like_results_file(&results) {
                warn!("⚠️ {} 不像是分析结果文件，仍尝试读取", results.display());
            }
            let app = App::initialize(config)?;
            let path = app.export_report(&results).await?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

async fn run_question_action(service: &QuestionService, action: QuestionAction) -> Result<()> {
    match action {
        QuestionAction::List => {
            let questions = service.list().await?;
            for (i, question) in questions.iter().enumerate() {
                println!("{:>3}. {}", i + 1, question);
            }
        }
        QuestionAction::Add { text } => {
            service.add(&text).await?;
        }
        QuestionAction::Update { old, new } => {
            service.update(&old, &new).await?;
        }
        QuestionAction::Delete { text } => {
            service.delete(&text).await?;
        }
    }
    Ok(())
}

async fn run_hotel_action(service: &HotelService, action: HotelAction) -> Result<()> {
    match action {
        HotelAction::List { payload } => {
            for hotel in service.list().await? {
                if payload {
                    println!("{} ({})\n{}\n", hotel.name, hotel.company_id, hotel.payload_pretty());
                } else {
                    println!(
                        "{:<40} {:<12} {}",
                        hotel.name,
                        hotel.company_id,
                        truncate_text(&hotel.payload.to_string(), 40)
                    );
                }
            }
        }
        HotelAction::Add(args) => {
            let form = HotelForm {
                name: args.name,
                company_id: args.company_id,
                payload: args.payload.read().await?.unwrap_or_default(),
            };
            service.add(&form).await?;
        }
        HotelAction::Update(args) => {
            let existing = service
                .find(&args.name)
                .await?
                .with_context(|| format!("酒店不存在: {}", args.name))?;
            let form = HotelForm {
                name: args.rename.unwrap_or_else(|| existing.name.clone()),
                company_id: args.company_id.unwrap_or_else(|| existing.company_id.clone()),
                payload: match args.payload.read().await? {
                    Some(text) => text,
                    None => existing.payload_pretty(),
                },
            };
            service.update(&existing.name, &form).await?;
        }
        HotelAction::Delete { name } => {
            service.delete(&name).await?;
        }
    }
    Ok(())
}

/// 结果文件路径是否像是 `run` 的输出
pub fn looks_like_results_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("analysis_") && n.ends_with(".json"))
}
