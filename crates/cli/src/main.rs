use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{FriendGraph, UserId};
use engine::{JobConfig, JobReport, LocalJobRunner};
use pipeline::{RecommendationAggregator, RecommendationList, RecommendationPipeline};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// FriendRecs - mutual-friend recommendation job
#[derive(Parser)]
#[command(name = "friend-recs")]
#[command(about = "Recommend friends by counting mutual friends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the batch job over an input file or directory
    Run {
        /// Adjacency input: a file, or a directory of files
        input: PathBuf,

        /// Output directory (must not exist)
        output: PathBuf,

        /// JSON job configuration; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Recommendations kept per user
        #[arg(long)]
        top_n: Option<usize>,

        /// Number of reduce partitions
        #[arg(long)]
        reducers: Option<usize>,

        /// Input lines per map split
        #[arg(long)]
        split_lines: Option<usize>,

        /// Pair repeated friend ids as they appear instead of dropping them
        #[arg(long)]
        keep_duplicate_friends: bool,

        /// Abort on the first line with a non-numeric id
        #[arg(long)]
        strict: bool,

        /// Write the job report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show recommendations for one user, with the mutual friends behind them
    Recommend {
        /// Adjacency input: a file, or a directory of files
        #[arg(long)]
        input: PathBuf,

        /// User ID to get recommendations for
        #[arg(long, allow_negative_numbers = true)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        top_n: usize,
    },

    /// Summarize an input graph
    Stats {
        /// Adjacency input: a file, or a directory of files
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Run {
            input,
            output,
            config,
            top_n,
            reducers,
            split_lines,
            keep_duplicate_friends,
            strict,
            report,
        } => {
            let mut job_config = load_config(config.as_deref())?;
            if let Some(top_n) = top_n {
                job_config = job_config.with_top_n(top_n);
            }
            if let Some(reducers) = reducers {
                job_config = job_config.with_reducers(reducers);
            }
            if let Some(split_lines) = split_lines {
                job_config = job_config.with_split_lines(split_lines);
            }
            if keep_duplicate_friends {
                job_config = job_config.with_dedup_friends(false);
            }
            if strict {
                job_config = job_config.with_strict(true);
            }
            handle_run(job_config, input, output, report).await?
        }
        Commands::Recommend {
            input,
            user_id,
            top_n,
        } => handle_recommend(&input, user_id, top_n)?,
        Commands::Stats { input } => handle_stats(&input)?,
    }

    Ok(())
}

/// Load a JSON job configuration, or the defaults when none is given
fn load_config(path: Option<&Path>) -> Result<JobConfig> {
    let Some(path) = path else {
        return Ok(JobConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

/// Handle the 'run' command
///
/// The job runs on a blocking thread. Ctrl-C sets the cancel flag; the job
/// stops at its next phase boundary and leaves no `_SUCCESS` marker.
async fn handle_run(
    config: JobConfig,
    input: PathBuf,
    output: PathBuf,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let cancelled = Arc::new(AtomicBool::new(false));
    let runner = LocalJobRunner::new(config).with_cancel_flag(cancelled.clone());
    info!("Starting job with {:?}", runner.config());
    let output_dir = output.clone();
    let mut job = tokio::task::spawn_blocking(move || runner.run(&input, &output));

    let outcome = tokio::select! {
        result = &mut job => result.context("Job task failed")?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupt received, cancelling job");
            cancelled.store(true, Ordering::Relaxed);
            job.await.context("Job task failed")?
        }
    };
    let report = outcome.context("Recommendation job failed")?;

    if let Some(path) = report_path {
        fs::write(&path, report.to_json()?)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }
    print_report(&report, &output_dir);
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(input: &Path, user_id: UserId, top_n: usize) -> Result<()> {
    let start = Instant::now();
    let (graph, parsed) = FriendGraph::load_from_path(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    if !graph.contains_user(user_id) {
        return Err(anyhow!("User {} not found", user_id));
    }

    // Only the target's own signals matter here
    let signals: Vec<_> = RecommendationPipeline::new()
        .emit_all(&parsed.records)
        .into_iter()
        .filter(|s| s.target == user_id)
        .collect();
    let (list, mutual) = RecommendationAggregator::new()
        .with_top_n(top_n)
        .aggregate_explained(user_id, signals);

    print_recommendations(&list, &mutual);
    println!("{}", format!("Computed in {:.2?}", start.elapsed()).dimmed());
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(input: &Path) -> Result<()> {
    let (graph, parsed) = FriendGraph::load_from_path(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let (users, edges) = graph.counts();
    let max_degree = graph
        .users()
        .filter_map(|u| graph.friends_of(u).map(|f| (u, f.len())))
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)));
    let asymmetric = graph.asymmetric_edges();
    let isolated = graph.isolated_users();

    println!("{}", format!("Graph: {}", input.display()).bold().blue());
    println!("{}Lines read: {}", "• ".green(), parsed.lines);
    println!("{}Records: {}", "• ".green(), parsed.records.len());
    println!("{}Users: {}", "• ".green(), users);
    println!("{}Friendships: {}", "• ".green(), edges);
    if users > 0 {
        println!(
            "{}Average degree: {:.2}",
            "• ".green(),
            2.0 * edges as f64 / users as f64
        );
    }
    if let Some((user, degree)) = max_degree {
        println!("{}Largest friend list: user {} ({})", "• ".green(), user, degree);
    }
    println!("{}Users with no friends: {}", "• ".cyan(), isolated.len());
    println!("{}Malformed lines skipped: {}", "• ".yellow(), parsed.skipped);
    println!("{}Lines rejected: {}", "• ".yellow(), parsed.rejected.len());
    for e in parsed.rejected.iter().take(5) {
        println!("    {}", e.to_string().red());
    }
    println!("{}One-sided listings: {}", "• ".yellow(), asymmetric.len());
    for (owner, friend) in asymmetric.iter().take(5) {
        println!("    {} lists {} but not the reverse", owner, friend);
    }
    Ok(())
}

/// Helper function to format and print one user's recommendations
fn print_recommendations(
    list: &RecommendationList,
    mutual: &BTreeMap<UserId, BTreeSet<UserId>>,
) {
    println!(
        "{}",
        format!("Friend recommendations for user {}:", list.target)
            .bold()
            .blue()
    );
    if list.is_empty() {
        println!("  (none)");
        return;
    }
    for (idx, entry) in list.entries.iter().enumerate() {
        let common = mutual
            .get(&entry.candidate)
            .map(|friends| {
                friends
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!(
            "{}. user {} - {} mutual friend(s): {}",
            (idx + 1).to_string().green(),
            entry.candidate,
            entry.count,
            common
        );
    }
}

fn print_report(report: &JobReport, output: &Path) {
    println!(
        "{} Wrote {} users to {} in {:.2?}",
        "✓".green(),
        report.users_written,
        output.display(),
        report.elapsed
    );
    if report.dropped_lines() > 0 {
        println!(
            "{} Dropped {} line(s): {} malformed, {} with invalid ids",
            "!".yellow(),
            report.dropped_lines(),
            report.malformed_skipped,
            report.rejected
        );
    }
}
