//! CLI entrypoint for redline
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod builtin;
mod chunker;
mod cli;
mod output;
mod progress;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, OutputMode};
use progress::{CompositeProgress, ConsoleProgressReporter};
use redline_application::{
    AnalyzeDocumentUseCase, ChunkClassifier, FindingsJudge, JudgeFindingsUseCase,
    NoPipelineProgress, PipelineParams, PipelineProgress, RunEnsembleUseCase,
};
use redline_domain::ExtractorConfig;
use redline_infrastructure::{
    ConfigLoader, FileConfig, JsonlRunLogger, OpenRouterClient, OpenRouterIssueExtractor,
    OpenRouterReasoningGateway, ServiceConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let _log_guard = match &cli.log_file {
        Some(path) => {
            let directory = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let filename = path.file_name().context("log file path has no file name")?;
            let appender = tracing_appender::rolling::never(directory, filename);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    };

    info!("Starting redline");

    // Load and validate configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("config error: {e}"))?
    };
    config.validate().context("invalid configuration")?;

    let document_text = std::fs::read_to_string(&cli.document)
        .with_context(|| format!("could not read {}", cli.document.display()))?;
    let chunks = chunker::chunk_paragraphs(&document_text);
    if chunks.is_empty() {
        bail!("document {} contains no text", cli.document.display());
    }
    info!("Chunked document into {} paragraphs", chunks.len());

    // === Dependency Injection ===
    let api_key = std::env::var(&config.service.api_key_env).with_context(|| {
        format!(
            "reasoning service API key not set (export {})",
            config.service.api_key_env
        )
    })?;
    let mut service = ServiceConfig::new(config.service.base_url.clone(), api_key);
    if let Some(seconds) = config.service.timeout_seconds {
        service = service.with_timeout(Duration::from_secs(seconds));
    }
    let client = Arc::new(OpenRouterClient::new(service)?);
    let gateway = Arc::new(OpenRouterReasoningGateway::new(
        Arc::clone(&client),
        config.service.model.clone(),
    ));

    let mut params = config.pipeline_params();
    if let Some(threshold) = cli.threshold {
        let ensemble = params.ensemble().clone().with_dedup_threshold(threshold);
        params = params.with_ensemble(ensemble);
    }
    if cli.judge {
        let ensemble = params.ensemble().clone().with_judge();
        params = params.with_ensemble(ensemble);
    }

    let progress = build_progress(&cli, &config);

    if cli.ensemble {
        run_ensemble(&cli, &config, &params, client, gateway, &document_text, progress).await
    } else {
        run_plugins(&cli, &params, gateway, &document_text, chunks, progress).await
    }
}

/// Console reporter plus optional JSONL run log, unless --quiet.
fn build_progress(cli: &Cli, config: &FileConfig) -> Arc<dyn PipelineProgress> {
    let mut reporters: Vec<Arc<dyn PipelineProgress>> = Vec::new();
    if !cli.quiet {
        reporters.push(Arc::new(ConsoleProgressReporter::new()));
    }
    if let Some(path) = &config.logging.run_log
        && let Some(logger) = JsonlRunLogger::new(path)
    {
        reporters.push(Arc::new(logger));
    }

    match reporters.len() {
        0 => Arc::new(NoPipelineProgress),
        1 => reporters.into_iter().next().expect("one reporter"),
        _ => Arc::new(CompositeProgress::new(reporters)),
    }
}

/// Run the chunk-routing and plugin-execution pipeline.
async fn run_plugins(
    cli: &Cli,
    params: &PipelineParams,
    gateway: Arc<OpenRouterReasoningGateway>,
    document_text: &str,
    chunks: Vec<redline_domain::Chunk>,
    progress: Arc<dyn PipelineProgress>,
) -> Result<()> {
    let classifier = Arc::new(ChunkClassifier::new(
        Arc::clone(&gateway),
        params.classifier().clone(),
    ));
    let plugins = builtin::default_plugins(&gateway);

    let analysis = AnalyzeDocumentUseCase::new(classifier)
        .execute(&plugins, &chunks, document_text, params.executor(), progress)
        .await;

    let rendered = match cli.output {
        OutputMode::Full => output::format_analysis(&analysis, false),
        OutputMode::Summary => output::format_analysis(&analysis, true),
        OutputMode::Json => output::format_analysis_json(&analysis),
    };
    println!("{rendered}");
    Ok(())
}

/// Run the extraction ensemble with dedup and optional arbitration.
async fn run_ensemble(
    cli: &Cli,
    config: &FileConfig,
    params: &PipelineParams,
    client: Arc<OpenRouterClient>,
    gateway: Arc<OpenRouterReasoningGateway>,
    document_text: &str,
    progress: Arc<dyn PipelineProgress>,
) -> Result<()> {
    let configs: Vec<ExtractorConfig> = if cli.extractors.is_empty() {
        config.extractor_configs()
    } else {
        cli.extractors
            .iter()
            .map(|model| ExtractorConfig::new(model.clone()))
            .collect()
    };
    if configs.is_empty() {
        bail!("no extractors configured; pass --extractor or add [[ensemble.extractors]]");
    }

    let extractor = Arc::new(OpenRouterIssueExtractor::new(client));
    let use_case = RunEnsembleUseCase::new(extractor);

    let judge_use_case = params.ensemble().enable_judge.then(|| {
        let mut judge = JudgeFindingsUseCase::new(gateway);
        if let Some(model) = &params.ensemble().judge_model {
            judge = judge.with_model(model.clone());
        }
        judge
    });
    let judge: Option<&dyn FindingsJudge> =
        judge_use_case.as_ref().map(|j| j as &dyn FindingsJudge);

    let findings = use_case
        .run_reconciled(document_text, &configs, params.ensemble(), judge, progress)
        .await?;

    let rendered = match cli.output {
        OutputMode::Full => output::format_findings(&findings, false),
        OutputMode::Summary => output::format_findings(&findings, true),
        OutputMode::Json => output::format_findings_json(&findings),
    };
    println!("{rendered}");
    Ok(())
}
