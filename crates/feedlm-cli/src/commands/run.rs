//! `feedlm run`: add every pending video to the open notebook.
//!
//! The driver publishes status events over a channel; this command folds
//! each one into the controller (which persists progress) and renders it.
//! Ctrl+C requests a stop, which the driver honours at its next
//! suspension point.

use crate::Context;
use anyhow::{Context as _, Result, anyhow, bail};
use console::style;
use feedlm_browser::{CdpHost, CdpSession};
use feedlm_core::target::UrlPattern;
use feedlm_core::{AutomationEvent, Controller};
use feedlm_driver::{
    BatchOutcome, BatchRunner, ChannelSink, DriverConfig, SelectorProfile, StopAck, StopHandle,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub fn execute(ctx: &Context, port: u16, target: &str, selectors: Option<&str>) -> Result<()> {
    let mut config = DriverConfig::load(&ctx.store.config_path())?;
    if let Some(name) = selectors {
        config.selectors = SelectorProfile::named(name).ok_or_else(|| {
            anyhow!(
                "Unknown selector profile '{}' (expected marker or attribute)",
                name
            )
        })?;
    }
    let pattern = UrlPattern::parse(target)?;

    let mut controller = ctx.controller()?;
    if controller.is_running() {
        bail!(
            "A batch is already running. If it was interrupted, clear it with 'feedlm status --clear'."
        );
    }
    if controller.pending().is_empty() {
        bail!("No videos in the list to add. Use 'feedlm extract' or 'feedlm add' first.");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run_batch(ctx, &mut controller, port, &pattern, config));
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn run_batch(
    ctx: &Context,
    controller: &mut Controller,
    port: u16,
    pattern: &UrlPattern,
    config: DriverConfig,
) -> Result<()> {
    let session = CdpSession::connect(port).await?;
    let (page, url) = session.find_tab(pattern).await?;

    let items = controller.start(&url)?;
    let total = items.len();
    tracing::info!("Adding {} videos to {}", total, url);

    let runner = BatchRunner::new(CdpHost::new(page), config);
    let bar = progress_bar(ctx, total)?;
    let watcher = tokio::spawn(watch_ctrl_c(runner.stop_handle(), bar.clone()));

    let (sink, mut rx) = ChannelSink::new();
    let runner = &runner;
    let drive = async move {
        let report = runner.run(items, &sink).await;
        drop(sink);
        report
    };

    let json = ctx.is_json();
    let mut record_error = None;
    let follow = async {
        while let Some(event) = rx.recv().await {
            if let Err(e) = controller.apply(&event) {
                tracing::error!("Failed to record progress: {}", e);
                record_error.get_or_insert(e);
            }
            render(&bar, json, &event);
        }
    };

    let (report, ()) = tokio::join!(drive, follow);
    watcher.abort();
    bar.finish_and_clear();

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            controller.abort(&e.to_string())?;
            return Err(e.into());
        }
    };
    if let Some(e) = record_error {
        return Err(e).context("Progress was not saved; check 'feedlm status' and 'feedlm list'");
    }

    let remaining = controller.pending().len();
    match report.outcome {
        BatchOutcome::Complete => {
            if !json {
                println!(
                    "✅ Added {} of {} videos to the notebook.",
                    report.processed, report.total
                );
            }
        }
        BatchOutcome::Stopped => {
            if !json {
                println!(
                    "🛑 Stopped after {} of {} videos. {} remain in the list.",
                    report.processed, report.total, remaining
                );
            }
        }
        BatchOutcome::Failed => bail!(
            "Batch failed after {} of {} videos. {} remain in the list.",
            report.processed,
            report.total,
            remaining
        ),
    }
    Ok(())
}

fn progress_bar(ctx: &Context, total: usize) -> Result<ProgressBar> {
    if ctx.is_json() {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    Ok(bar)
}

fn render(bar: &ProgressBar, json: bool, event: &AutomationEvent) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => bar.suspend(|| println!("{}", line)),
            Err(e) => tracing::warn!("Could not serialize event: {}", e),
        }
        return;
    }

    match event {
        AutomationEvent::Progress { message, .. } => bar.set_message(message.clone()),
        AutomationEvent::Success { message, .. } => {
            bar.inc(1);
            bar.println(format!("{} {}", style("✓").green(), message));
        }
        AutomationEvent::Error { message } => {
            bar.println(format!("{} {}", style("✗").red(), message));
        }
        AutomationEvent::Stopped { message } | AutomationEvent::Complete { message } => {
            bar.set_message(message.clone());
        }
    }
}

async fn watch_ctrl_c(stop: StopHandle, bar: ProgressBar) {
    while tokio::signal::ctrl_c().await.is_ok() {
        let note = match stop.request_stop() {
            StopAck::Acknowledged => "Stop requested; finishing the current step...",
            StopAck::AlreadyRequested => "Already stopping...",
            StopAck::NotRunning => break,
        };
        bar.suspend(|| eprintln!("🛑 {}", note));
    }
}
