use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fixwatch::config::AppConfig;
use fixwatch::models::job::{JobState, NotificationKind, RunStatus};
use fixwatch::models::timeline::TimelineEvent;
use fixwatch::services::formatter;
use fixwatch::services::logs;
use fixwatch::services::poller::{JobMonitor, DEFAULT_POLL_INTERVAL};
use fixwatch::services::report;
use fixwatch::services::scoring;
use fixwatch::services::stage::{self, StagePhase, PIPELINE_STAGES};
use fixwatch::services::transport::{HttpStatusTransport, RunAgentRequest, StatusTransport};

#[derive(Parser)]
#[command(name = "fixwatch", about = "Terminal monitor for remote autonomous repair jobs")]
struct Cli {
    /// Backend base URL (overrides API_BASE_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Poll period in milliseconds (overrides POLL_INTERVAL_MS).
    #[arg(long, global = true)]
    interval_ms: Option<u64>,

    /// Directory for the terminal JSON report (overrides REPORT_DIR).
    #[arg(long, global = true)]
    report_dir: Option<String>,

    /// Skip writing the terminal JSON report.
    #[arg(long, global = true)]
    no_report: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new repair job and watch it to completion.
    Run {
        #[arg(long)]
        repo_url: String,
        #[arg(long)]
        team_name: String,
        #[arg(long)]
        leader_name: String,
        #[arg(long, default_value_t = 5)]
        retry_limit: u32,
    },
    /// Watch an existing job by id.
    Watch { job_id: String },
}

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Environment config supplies defaults; flags win.
    let env_config = AppConfig::from_env().ok();
    let api_url = cli
        .api_url
        .clone()
        .or_else(|| env_config.as_ref().map(|c| c.api_base_url.clone()))
        .expect("backend URL required: pass --api-url or set API_BASE_URL");
    let poll_interval = resolve_poll_interval(
        cli.interval_ms,
        env_config.as_ref().map(|c| c.poll_interval_ms),
    );
    let report_dir = cli
        .report_dir
        .clone()
        .or_else(|| env_config.as_ref().map(|c| c.report_dir.clone()))
        .unwrap_or_else(|| ".".to_string());

    let transport: Arc<dyn StatusTransport> = Arc::new(HttpStatusTransport::new(&api_url));

    let job_id = match &cli.command {
        Command::Run {
            repo_url,
            team_name,
            leader_name,
            retry_limit,
        } => {
            let request = RunAgentRequest {
                repo_url: repo_url.clone(),
                team_name: team_name.clone(),
                leader_name: leader_name.clone(),
                retry_limit: *retry_limit,
            };
            let response = transport
                .run_agent(&request)
                .await
                .expect("failed to create repair job");
            tracing::info!(job_id = %response.job_id, "repair job created");
            response.job_id
        }
        Command::Watch { job_id } => job_id.clone(),
    };

    let monitor = JobMonitor::new(Arc::clone(&transport), poll_interval);
    let mut updates = monitor.subscribe();
    monitor.watch(&job_id);

    let terminal = loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    // Monitor dropped; nothing more will arrive.
                    std::process::exit(1);
                }
                let snapshot = updates.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    render_progress(&snapshot);
                    if snapshot.is_terminal() {
                        break snapshot;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(job_id = %job_id, "interrupted, tearing down watch session");
                monitor.reset();
                std::process::exit(130);
            }
        }
    };

    render_summary(&terminal);

    if !cli.no_report {
        match report::write_report(Path::new(&report_dir), &terminal) {
            Ok(path) => tracing::info!(path = %path.display(), "report written"),
            Err(e) => tracing::error!(error = %e, "failed to write report"),
        }
    }

    let code = match terminal.status {
        JobState::Passed | JobState::Finished => 0,
        _ => 1,
    };
    std::process::exit(code);
}

/// One progress line per snapshot: pipeline position, status, counters.
fn render_progress(snapshot: &RunStatus) {
    let pipeline: Vec<String> = PIPELINE_STAGES
        .iter()
        .enumerate()
        .map(|(idx, name)| match stage::stage_phase(idx, snapshot.status) {
            StagePhase::Done => format!("[x {name}]"),
            StagePhase::Current => format!("[> {name}]"),
            StagePhase::Pending => format!("[  {name}]"),
        })
        .collect();

    println!(
        "{}  {}  anomalies={} patches={} iteration={}/{} elapsed={}",
        pipeline.join(" "),
        snapshot.status,
        snapshot.failures_detected,
        snapshot.fixes_applied,
        snapshot.iterations_used,
        snapshot.retry_limit,
        format_elapsed(snapshot.total_time_seconds),
    );

    if let Some(notification) = &snapshot.notification {
        match notification.kind {
            NotificationKind::Error => {
                tracing::error!(title = %notification.title, "{}", notification.message)
            }
            NotificationKind::Warning => {
                tracing::warn!(title = %notification.title, "{}", notification.message)
            }
        }
    }
}

/// Terminal summary: score card, fix ledger, classified log stream.
fn render_summary(snapshot: &RunStatus) {
    println!();
    println!(
        "job {} finished: {} ({} on branch {})",
        snapshot.job_id,
        snapshot.status,
        snapshot.repo_url,
        if snapshot.branch_name.is_empty() {
            "<unassigned>"
        } else {
            &snapshot.branch_name
        },
    );

    if let Some(card) = scoring::score(snapshot) {
        println!();
        println!("agent performance: {}/{} pts", card.total, scoring::SCORE_CAP);
        for adjustment in &card.breakdown {
            println!("  {:<16} {:+}", adjustment.label, adjustment.delta);
        }
    }

    if !snapshot.timeline.is_empty() {
        println!();
        println!("iteration timeline:");
        for event in &snapshot.timeline {
            println!("  {}", format_timeline_line(event));
        }
    }

    if !snapshot.fixes.is_empty() {
        println!();
        println!("fix ledger ({}):", snapshot.fixes.len());
        for fix in &snapshot.fixes {
            let marker = if fix.is_ai_fixed() { "ai" } else { "annotated" };
            // Category, not the raw tag: unknown tags render as LOGIC.
            println!(
                "  [{marker}] [{}] {}",
                fix.category(),
                formatter::describe(fix)
            );
        }
    }

    let lines = logs::normalize(&snapshot.raw_logs);
    if !lines.is_empty() {
        println!();
        println!("log stream ({} lines):", lines.len());
        for line in &lines {
            println!("  {:<8} {}", line.category.to_string(), line.text);
        }
    }
}

/// One timeline entry: pass/fail marker, retry cycle, opaque timestamp.
fn format_timeline_line(event: &TimelineEvent) -> String {
    let marker = if event.is_pass() { "pass" } else { "fail" };
    format!(
        "[{marker}] iteration {} at {}",
        event.iteration, event.timestamp
    )
}

/// CLI flag wins over environment; otherwise the poller's default period.
fn resolve_poll_interval(flag_ms: Option<u64>, env_ms: Option<u64>) -> Duration {
    flag_ms
        .or(env_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_POLL_INTERVAL)
}

/// `mm:ss`, or `--:--` while the elapsed time is not yet known.
fn format_elapsed(total_time_seconds: f64) -> String {
    if total_time_seconds <= 0.0 {
        return "--:--".to_string();
    }
    let seconds = total_time_seconds as u64;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
