mod cli;
mod config;
mod constraints;
mod errors;
mod evaluation;
mod generation;
mod llm_client;
mod models;
mod pipeline;
mod render;
mod store;
mod tracker;
mod validation;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands, JobArgs};
use crate::config::Config;
use crate::constraints::ConstraintSchema;
use crate::evaluation::{LlmEvaluator, ScoreExtractor};
use crate::generation::{detect_company, LlmContentGenerator, LlmReviser};
use crate::llm_client::LlmClient;
use crate::models::ResumeDocument;
use crate::pipeline::controller::DEFAULT_COLLABORATOR_TIMEOUT;
use crate::pipeline::{
    Artifact, Collaborators, ContentGenerator, DocumentRenderer, Evaluator, JobContext,
    PipelineController, PipelineOptions, Reviser, RunSummary,
};
use crate::render::{LatexRenderer, OUTPUT_STEM};
use crate::store::ApplicationStore;
use crate::tracker::{RunRecord, RunTracker};
use crate::validation::{validate, ValidationReport};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config, cli.verbose, cli.json);

    let store = ApplicationStore::new(config.config_dir());

    match cli.command {
        Commands::Run {
            job,
            use_existing,
            skip_validation,
            skip_render,
            skip_quality,
            skip_ats,
            max_revisions,
            max_quality_attempts,
            quality_threshold,
        } => {
            let options = PipelineOptions {
                max_revision_attempts: max_revisions.unwrap_or(config.max_revision_attempts),
                max_quality_attempts: max_quality_attempts.unwrap_or(config.max_quality_attempts),
                quality_threshold: quality_threshold.unwrap_or(config.quality_threshold),
                collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT.max(config.llm_timeout),
                skip_validation,
                skip_render,
                skip_quality,
                skip_ats,
            };
            let code = cmd_run(&config, &store, &job, use_existing, options, cli.json).await?;
            std::process::exit(code);
        }
        Commands::Generate { job } => cmd_generate(&config, &store, &job, cli.json).await,
        Commands::Validate { path } => {
            let passed = cmd_validate(&store, path, cli.json).await?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Revise {
            feedback,
            feedback_file,
        } => cmd_revise(&config, &store, feedback, feedback_file, cli.json).await,
        Commands::Render => cmd_render(&config, &store).await,
        Commands::Quality => cmd_evaluate(&config, &store, EvaluationTarget::Quality).await,
        Commands::Ats => cmd_evaluate(&config, &store, EvaluationTarget::Ats).await,
        Commands::History => cmd_history(&config, cli.json).await,
    }
}

/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing(config: &Config, verbose: bool, json: bool) {
    let level = if verbose { "debug" } else { config.rust_log.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level)));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared setup
// ────────────────────────────────────────────────────────────────────────────

fn llm(config: &Config) -> Result<LlmClient> {
    let client = LlmClient::new(config.require_api_key()?, config.llm_timeout)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    Ok(client)
}

/// Resolves the job description from flags, saving a new one for later
/// commands, or falls back to the saved one.
async fn job_description(store: &ApplicationStore, args: &JobArgs) -> Result<String> {
    let text = match (&args.jd, &args.jd_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description from {}", path.display()))?,
        (None, None) => return Ok(store.load_job_description().await?),
    };
    if text.trim().is_empty() {
        bail!("Job description is empty");
    }
    store.save_job_description(&text).await?;
    Ok(text)
}

async fn job_context(
    store: &ApplicationStore,
    job_description: String,
    company: Option<String>,
) -> Result<JobContext> {
    Ok(JobContext {
        job_description,
        reference_facts: store.load_reference_facts().await?,
        schema: ConstraintSchema::load(&store.constraints_path())?,
        company,
    })
}

async fn renderer(config: &Config) -> Result<LatexRenderer> {
    Ok(LatexRenderer::from_template_file(
        &config.template_path,
        config.output_dir(),
        config.latex_engine.clone(),
    )
    .await?)
}

fn print_report(report: &ValidationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.feedback());
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Commands
// ────────────────────────────────────────────────────────────────────────────

/// Returns the process exit code for the run's outcome.
async fn cmd_run(
    config: &Config,
    store: &ApplicationStore,
    args: &JobArgs,
    use_existing: bool,
    options: PipelineOptions,
    json: bool,
) -> Result<i32> {
    let jd = job_description(store, args).await?;
    let llm = match llm(config) {
        Ok(llm) => llm,
        Err(e) => {
            error!("Generation cannot start: {e:#}");
            let summary = RunSummary::generation_failed(args.company.clone(), format!("{e:#}"));
            return finish_run(config, &summary, json).await;
        }
    };

    let initial = if use_existing {
        Some(store.load_document().await?)
    } else {
        None
    };
    let known_company = args
        .company
        .clone()
        .or_else(|| initial.as_ref().and_then(|d| d.company_name.clone()));
    let company = match known_company {
        Some(company) => Some(company),
        None => detect_company(&jd, &llm).await,
    };
    let initial = initial.map(|mut document| {
        if company.is_some() {
            document.company_name = company.clone();
        }
        document
    });

    let job = job_context(store, jd, company).await?;
    let collaborators = Collaborators {
        generator: Arc::new(LlmContentGenerator::new(llm.clone())),
        reviser: Arc::new(LlmReviser::new(llm.clone())),
        renderer: Arc::new(renderer(config).await?),
        quality: Arc::new(LlmEvaluator::quality(llm.clone(), job.reference_facts.clone())),
        ats: Arc::new(LlmEvaluator::ats(llm, job.reference_facts.clone())),
    };

    let controller = PipelineController::new(collaborators, options).with_store(store.clone());
    let summary = controller.run(&job, initial).await;
    finish_run(config, &summary, json).await
}

/// Prints the summary, appends it to the run log, and returns the exit code.
async fn finish_run(config: &Config, summary: &RunSummary, json: bool) -> Result<i32> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", summary.render_text());
    }

    if let Err(e) = RunTracker::new(&config.output_dir())
        .append(&RunRecord::from(summary))
        .await
    {
        warn!("Failed to record run history: {e}");
    }

    Ok(summary.outcome.exit_code())
}

async fn cmd_generate(
    config: &Config,
    store: &ApplicationStore,
    args: &JobArgs,
    json: bool,
) -> Result<()> {
    let llm = llm(config)?;
    let jd = job_description(store, args).await?;
    let company = match &args.company {
        Some(company) => Some(company.clone()),
        None => detect_company(&jd, &llm).await,
    };
    let job = job_context(store, jd, company).await?;

    let document = LlmContentGenerator::new(llm).generate(&job).await?;
    store.save_document(&document).await?;
    info!("Document saved to {}", store.document_path().display());

    print_report(&validate(&document, &job.schema), json)
}

/// Returns whether the document passed.
async fn cmd_validate(store: &ApplicationStore, path: Option<PathBuf>, json: bool) -> Result<bool> {
    let document = match path {
        Some(path) => store.load_document_from(&path).await?,
        None => store.load_document().await?,
    };
    let schema = ConstraintSchema::load(&store.constraints_path())?;
    let report = validate(&document, &schema);
    print_report(&report, json)?;
    Ok(report.passed())
}

async fn cmd_revise(
    config: &Config,
    store: &ApplicationStore,
    feedback: Option<String>,
    feedback_file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let feedback = match (feedback, feedback_file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read feedback from {}", path.display()))?,
        (None, None) => bail!("Pass --feedback or --feedback-file"),
    };

    let llm = llm(config)?;
    let current: ResumeDocument = store.load_document().await?;
    let jd = store.load_job_description().await?;
    let job = job_context(store, jd, current.company_name.clone()).await?;

    let revised = LlmReviser::new(llm).revise(&current, &feedback, &job).await?;
    store.save_document(&revised).await?;
    info!("Revised document saved to {}", store.document_path().display());

    print_report(&validate(&revised, &job.schema), json)
}

async fn cmd_render(config: &Config, store: &ApplicationStore) -> Result<()> {
    let document = store.load_document().await?;
    let artifact = renderer(config).await?.render(&document).await?;

    println!("LaTeX: {}", artifact.source_path.display());
    if let Some(pdf) = &artifact.pdf_path {
        println!("PDF:   {}", pdf.display());
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum EvaluationTarget {
    Quality,
    Ats,
}

/// Reviews whatever `tailor render` last produced.
async fn cmd_evaluate(
    config: &Config,
    store: &ApplicationStore,
    target: EvaluationTarget,
) -> Result<()> {
    let artifact = rendered_artifact(config)?;
    let jd = match store.load_job_description().await {
        Ok(jd) => jd,
        Err(e) => {
            warn!("{e}; evaluating without a job description");
            String::new()
        }
    };
    let facts = store.load_reference_facts().await?;
    let llm = llm(config)?;

    let (evaluator, extractor) = match target {
        EvaluationTarget::Quality => (LlmEvaluator::quality(llm, facts), ScoreExtractor::quality()),
        EvaluationTarget::Ats => (LlmEvaluator::ats(llm, facts), ScoreExtractor::ats()),
    };
    let report = evaluator.evaluate(&artifact, &jd).await?;

    println!("{report}");
    match extractor.extract(&report) {
        Some(score) => println!("\nScore: {score}"),
        None => warn!("Report carried no recognisable score line"),
    }
    Ok(())
}

fn rendered_artifact(config: &Config) -> Result<Artifact> {
    let output_dir = config.output_dir();
    let source_path = output_dir.join(format!("{OUTPUT_STEM}.tex"));
    let pdf_path = output_dir.join(format!("{OUTPUT_STEM}.pdf"));

    if !source_path.exists() && !pdf_path.exists() {
        bail!(
            "No rendered document in {}; run `tailor render` first",
            output_dir.display()
        );
    }
    Ok(Artifact {
        source_path,
        pdf_path: pdf_path.exists().then_some(pdf_path),
    })
}

async fn cmd_history(config: &Config, json: bool) -> Result<()> {
    let history = RunTracker::new(&config.output_dir()).history().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        print!("{}", history.render_text());
    }
    Ok(())
}
