use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use simwatch_core::app::{Poller, Watchlist, render_json, render_table};
use simwatch_core::impls::{QueueSource, StaticSource};
use simwatch_core::observability::StatusCounts;
use simwatch_core::ports::{JobEntry, JobSource};
use simwatch_core::{ScanLimits, StatusEngine};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "simwatch",
    version,
    about = "Live status of running simulation cases, read from their logs"
)]
pub struct Cli {
    /// Case directories to watch (ignored with --queue)
    #[arg(default_value = ".")]
    pub directories: Vec<PathBuf>,

    /// List jobs from the batch queue instead of taking directories
    #[arg(long)]
    pub queue: bool,

    /// Command printing `<id>|<directory>` per job (used with --queue)
    #[arg(long, default_value = "squeue --me --noheader --format=%i|%Z")]
    pub queue_command: String,

    /// Time between refreshes
    #[arg(long, default_value = "10s")]
    pub interval: humantime::Duration,

    /// Print one report and exit
    #[arg(long)]
    pub once: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Jobs inspected concurrently
    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    /// Lines read back from the end of each log
    #[arg(long, default_value_t = 10_000)]
    pub tail_lines: usize,

    /// Bytes read back from the end of each log before giving up on a marker
    #[arg(long, default_value_t = 8 * 1024 * 1024)]
    pub tail_bytes: u64,

    /// Lines read from the top of each log for the header
    #[arg(long, default_value_t = 200)]
    pub header_lines: usize,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Settings for one monitoring session.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub interval: Duration,
    pub once: bool,
    pub json: bool,
    pub workers: usize,
    pub limits: ScanLimits,
}

impl MonitorConfig {
    pub fn from_cli(args: &Cli) -> Self {
        Self {
            interval: Duration::from(args.interval),
            once: args.once,
            json: args.json,
            workers: args.workers,
            limits: ScanLimits {
                header_lines: args.header_lines,
                tail_lines: args.tail_lines,
                tail_bytes: args.tail_bytes,
            },
        }
    }
}

fn build_source(args: &Cli) -> Result<Box<dyn JobSource>> {
    if args.queue {
        let source = QueueSource::from_command_line(&args.queue_command)
            .context("--queue-command is empty")?;
        return Ok(Box::new(source));
    }
    let entries = args.directories.iter().map(JobEntry::new).collect();
    Ok(Box::new(StaticSource::new(entries)))
}

pub async fn run(args: Cli) -> Result<()> {
    let cfg = MonitorConfig::from_cli(&args);
    let source = build_source(&args)?;
    let poller = Poller::new(StatusEngine::new(cfg.limits), cfg.workers);
    let mut watchlist = Watchlist::new();

    tracing::info!(
        queue = args.queue,
        interval = %args.interval,
        workers = cfg.workers,
        "simwatch started"
    );

    loop {
        match source.list().await {
            Ok(entries) => watchlist.reconcile(entries),
            // keep the previous list; the queue may be briefly unreachable
            Err(e) => tracing::warn!("job listing failed: {e}"),
        }

        poller.poll_watchlist(&mut watchlist).await;

        let counts = StatusCounts::from_jobs(watchlist.jobs());
        tracing::info!(
            total = counts.total(),
            running = counts.running,
            completed = counts.completed,
            failed = counts.failed,
            cancelled = counts.cancelled,
            unavailable = counts.unavailable,
            "poll finished"
        );

        if cfg.json {
            println!("{}", render_json(watchlist.jobs()).context("failed to encode report")?);
        } else {
            if !cfg.once {
                // clear the terminal and move home before each redraw
                print!("\x1b[2J\x1b[H");
            }
            print!("{}", render_table(watchlist.jobs()));
        }

        if cfg.once {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(cfg.interval) => {}
            res = tokio::signal::ctrl_c() => {
                res.context("failed to listen for ctrl-c")?;
                tracing::info!("interrupted, stopping");
                return Ok(());
            }
        }
    }
}
