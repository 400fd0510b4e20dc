use anyhow::Context;
use tweetpulse::ai::AnyProvider;
use tweetpulse::classify::{ClassifierService, ClassifyConfig};
use tweetpulse::collect::{CollectConfig, CollectorService};
use tweetpulse::commands::{AppCommand, USAGE};
use tweetpulse::report::{labeled_files, ReportConfig, ReportService};
use tweetpulse::scheduler::Scheduler;
use tweetpulse::search::TwitterSession;
use chrono::Local;
use log::{info, warn};
use std::path::Path;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("tweetpulse", log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = args
        .join(" ")
        .parse::<AppCommand>()
        .unwrap_or(AppCommand::Help);

    match cmd {
        AppCommand::Collect => {
            run_collect().await?;
        }
        AppCommand::Classify { input } => {
            run_classify(&input).await?;
        }
        AppCommand::Report => {
            run_report().await?;
        }
        AppCommand::Run => {
            run_pipeline().await?;
        }
        AppCommand::Schedule => {
            // Credential problems should kill the process now, not be
            // rediscovered at the first due time.
            TwitterSession::from_env()
                .context("scheduler needs TWITTER_BEARER_TOKEN (set it in .env or the environment)")?;
            AnyProvider::from_env()
                .context("scheduler needs an LLM credential (OPENAI_API_KEY or OPENROUTER_API_KEY)")?;
            let mut sched = Scheduler::from_env()?;
            sched.skip_past(Local::now().naive_local());
            sched.run_loop(run_pipeline).await;
        }
        AppCommand::CheckEnv => {
            check_env();
        }
        AppCommand::Help => {
            println!("{USAGE}");
        }
        AppCommand::Unknown(msg) => {
            eprintln!("{msg}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

async fn run_collect() -> anyhow::Result<Option<std::path::PathBuf>> {
    let session = TwitterSession::from_env()
        .context("collector needs TWITTER_BEARER_TOKEN (set it in .env or the environment)")?;
    let cfg = CollectConfig::from_env();
    CollectorService::new(session).collect(&cfg).await
}

async fn run_classify(input: &Path) -> anyhow::Result<std::path::PathBuf> {
    let provider = AnyProvider::from_env()
        .context("classifier needs an LLM credential (OPENAI_API_KEY or OPENROUTER_API_KEY)")?;
    let service = ClassifierService::new(provider, ClassifyConfig::from_env());
    service.classify_file(input).await
}

async fn run_report() -> anyhow::Result<()> {
    let provider = AnyProvider::from_env()
        .context("reporter needs an LLM credential (OPENAI_API_KEY or OPENROUTER_API_KEY)")?;
    let cfg = ReportConfig::from_env();
    let files = labeled_files(&cfg.data_dir)?;
    let artifacts = ReportService::new(provider, cfg).run(&files).await?;
    info!(
        "report artifacts: {}, {}, {}",
        artifacts.html.display(),
        artifacts.summary_txt.display(),
        artifacts.markdown.display()
    );
    Ok(())
}

/// The scheduler's stage function: one full collect -> classify -> report
/// pass. When the collector found nothing there is nothing to classify, but
/// the report still refreshes from earlier labeled files if any exist.
async fn run_pipeline() -> anyhow::Result<()> {
    let stamp = Local::now().format("%Y%m%d-%H%M");
    info!("pipeline run starting: {stamp}");

    match run_collect().await? {
        Some(raw) => {
            run_classify(&raw).await?;
        }
        None => warn!("collector wrote no file; reporting from existing datasets"),
    }

    run_report().await
}

fn check_env() {
    let vars = [
        "TWITTER_BEARER_TOKEN",
        "OPENAI_API_KEY",
        "OPENROUTER_API_KEY",
        "LLM_PROVIDER",
        "LLM_MODEL",
        "SEARCH_QUERY",
        "SCHEDULE_TIMES",
        "DATA_DIR",
        "OUTPUT_DIR",
    ];
    for var in vars {
        // Presence only; never echo the value of a credential.
        match std::env::var(var) {
            Ok(_) => println!("{var}: set"),
            Err(_) => println!("{var}: not set"),
        }
    }
}
