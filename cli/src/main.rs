//! CLI entrypoint for agora
//!
//! This is the main binary that wires together all layers using
//! dependency injection: catalog and roster from the domain, use cases
//! from the application layer, and the Groq gateway, config loader,
//! JSONL logger and file exporter from infrastructure.

mod output;

use agora_application::{
    GenerateTurnUseCase, NegotiationProgress, NoTranscriptLogger, ReflectionStore,
    RunNegotiationInput, RunNegotiationUseCase, SummarizeUseCase, SummaryExporter,
    TranscriptLogger,
};
use agora_domain::{
    Agent, BudgetRules, KeywordWeightedPolicy, PolicyArea, PolicySelection, RoundRobinPolicy,
    TurnPolicy, default_policy_areas, find_option,
};
use agora_infrastructure::{
    ConfigLoader, FileConfig, FileSummaryExporter, GroqConfig, GroqGateway, JsonlTranscriptLogger,
    MemoryReflectionStore,
};
use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use output::{ConsoleProgress, format_summary, format_transcript, stance_colored};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "agora",
    about = "Policy negotiation simulator with AI stakeholder agents",
    version
)]
struct Cli {
    /// Policy option ids to select (e.g. -s a2,l3,t2)
    #[arg(short, long, value_delimiter = ',')]
    select: Vec<String>,

    /// Advisor messages; message N opens round N
    #[arg(short, long)]
    message: Vec<String>,

    /// Save a reflection answer after the run, as QID=TEXT (repeatable)
    #[arg(long = "reflect", value_name = "QID=TEXT")]
    reflect: Vec<String>,

    /// Number of negotiation rounds (overrides config)
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Turn policy: round-robin or keyword-weighted (overrides config)
    #[arg(long)]
    turn_policy: Option<String>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip config files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// List available policy options and exit
    #[arg(long)]
    list_policies: bool,

    /// List the agent roster and exit
    #[arg(long)]
    list_agents: bool,

    /// Skip the generated summary
    #[arg(long)]
    no_summary: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let areas = default_policy_areas();
    let roster = Agent::default_roster();

    if cli.list_policies {
        print_policies(&areas);
        return Ok(());
    }
    if cli.list_agents {
        print_agents(&roster);
        return Ok(());
    }

    // === Configuration ===
    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?
    };
    for issue in config.validate() {
        warn!("Config: {issue}");
    }

    let rounds = cli.rounds.unwrap_or(config.negotiation.rounds);
    let budget = BudgetRules::new(config.negotiation.budget_units);

    // === Selection ===
    if cli.select.is_empty() {
        bail!(
            "No policies selected. Pick options with --select (see --list-policies), e.g.: agora -s a2,l2,t2"
        );
    }
    let mut selection = PolicySelection::new();
    for id in &cli.select {
        let option = find_option(&areas, id)
            .with_context(|| format!("Unknown policy id '{id}' (see --list-policies)"))?;
        if !selection.select(option) {
            warn!("Policy '{id}' selected twice; keeping the first");
        }
    }

    if !cli.quiet {
        print_header(&selection, &budget, rounds);
    }

    // === Dependency Injection ===
    let api_key = std::env::var(&config.provider.api_key_env).with_context(|| {
        format!(
            "Environment variable {} is not set (it must hold the generation API key)",
            config.provider.api_key_env
        )
    })?;

    let gateway = Arc::new(
        GroqGateway::new(
            GroqConfig::new(api_key)
                .with_model(&config.provider.model)
                .with_base_url(&config.provider.base_url)
                .with_timeout(Duration::from_secs(config.provider.timeout_secs)),
        )
        .map_err(|e| anyhow::anyhow!("Failed to set up generation gateway: {e}"))?,
    );

    // Ctrl-C cancels the in-flight turn instead of killing the process
    // mid-write.
    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
    }

    let turn_policy: Arc<dyn TurnPolicy> = match cli
        .turn_policy
        .as_deref()
        .unwrap_or(&config.negotiation.turn_policy)
    {
        "keyword-weighted" => Arc::new(KeywordWeightedPolicy),
        "round-robin" => Arc::new(RoundRobinPolicy),
        other => bail!("Unknown turn policy '{other}' (round-robin, keyword-weighted)"),
    };

    let logger: Arc<dyn TranscriptLogger> = match &config.output.transcript_log {
        Some(path) => match JsonlTranscriptLogger::new(path) {
            Some(logger) => {
                info!("Logging negotiation to {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoTranscriptLogger),
        },
        None => Arc::new(NoTranscriptLogger),
    };

    let generator = GenerateTurnUseCase::new(Arc::clone(&gateway))
        .with_budget(budget.clone())
        .with_cancellation(cancellation.clone())
        .with_context_window(config.negotiation.context_window);

    let run = RunNegotiationUseCase::new(generator)
        .with_turn_policy(turn_policy)
        .with_logger(logger);

    // === Run ===
    let input = RunNegotiationInput::new(selection, roster.clone())
        .with_rounds(rounds)
        .with_user_messages(cli.message.clone());

    let state = if cli.quiet {
        run.execute(input).await?
    } else {
        run.execute_with_progress(input, &ConsoleProgress).await?
    };

    println!("{}", format_transcript(&state, &roster));

    // === Summary ===
    if !cli.no_summary {
        let progress = ConsoleProgress;
        if !cli.quiet {
            progress.on_summary_start();
        }

        let summarizer = SummarizeUseCase::new(gateway);
        match summarizer.execute(&state).await {
            Ok(summary) => {
                println!("{}", format_summary(&summary, &state));
                if let Some(dir) = &config.output.summary_dir {
                    let exporter = FileSummaryExporter::new(dir);
                    match exporter.export(&summary).await {
                        Ok(reference) => println!("Summary saved to {}", reference.location),
                        Err(e) => warn!("Summary export failed: {e}"),
                    }
                }
            }
            Err(e) => {
                if !cli.quiet {
                    progress.on_summary_complete(false);
                }
                warn!("Summary generation failed: {e}");
            }
        }
    }

    // === Reflections ===
    if !cli.reflect.is_empty() {
        let store = MemoryReflectionStore::new();
        for raw in &cli.reflect {
            match raw.split_once('=') {
                Some((question_id, text)) => {
                    let record = store
                        .save(question_id.trim(), text.trim())
                        .await
                        .context("Failed to save reflection")?;
                    println!(
                        "Reflection {} saved for question '{}'",
                        record.id, record.question_id
                    );
                }
                None => warn!("Ignoring malformed --reflect '{raw}' (expected QID=TEXT)"),
            }
        }
    }

    Ok(())
}

fn print_header(selection: &PolicySelection, budget: &BudgetRules, rounds: u32) {
    println!();
    println!("{}", "Agora - Stakeholder Negotiation".bold());
    println!();
    println!("Selected policies:");
    for option in selection.options() {
        println!(
            "  [{}] {} - Tier {} ({})",
            option.id,
            option.title,
            option.tier,
            option.impact
        );
    }
    println!(
        "Budget: {} of {} units, {} rounds",
        selection.allocated_budget(),
        budget.total_units,
        rounds
    );
    for warning in selection.warnings(budget) {
        println!("  {} {}", "!".yellow(), warning.yellow());
    }
}

fn print_policies(areas: &[PolicyArea]) {
    for area in areas {
        println!("{}", area.title.bold());
        for option in &area.options {
            println!(
                "  [{}] {} - Tier {} ({})",
                option.id,
                option.title,
                option.tier,
                option.impact
            );
        }
        println!();
    }
}

fn print_agents(roster: &[Agent]) {
    for agent in roster {
        println!(
            "{} - {}, {} ({})",
            stance_colored(&agent.name, agent.stance).bold(),
            agent.role,
            agent.age,
            agent.stance
        );
        println!("  Concerns: {}", agent.concerns.join(", "));
    }
}
