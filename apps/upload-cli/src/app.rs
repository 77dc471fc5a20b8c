//! Wires the upload flow to the terminal.

use std::io::BufRead;

use anyhow::Context;
use naspi_protocol::RemoteDirectoryEntry;
use naspi_upload::{
    BatchReport, BatchStatus, FileOutcome, HttpBackend, Notifier, UploadEvent, UploadFile,
    UploadOrchestrator, UploadState, UploadStore,
};
use tokio::sync::{mpsc, watch};

use crate::cli::{Cli, Control};
use crate::config::Config;

/// Runs one listing or upload batch. Returns `false` when any file was
/// not uploaded.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<bool> {
    let backend = HttpBackend::with_timeout(&config.server_url, config.request_timeout())
        .with_context(|| format!("cannot use server {}", config.server_url))?;

    let store = UploadStore::new();
    let notifier = Notifier::with_duration(config.notification_duration());
    let mut orchestrator = UploadOrchestrator::new(backend, store.clone())
        .with_chunk_size(config.chunk_size())
        .with_notifier(notifier.clone());

    if cli.list {
        let entries = orchestrator
            .list_directory(&cli.dest)
            .await
            .with_context(|| format!("cannot list \"{}\"", cli.dest))?;
        print_listing(&cli.dest, &entries);
        return Ok(true);
    }

    let files = cli
        .files
        .iter()
        .map(|path| {
            UploadFile::from_path(path).with_context(|| format!("cannot read {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    tracing::info!(
        server = %config.server_url,
        files = files.len(),
        "uploading"
    );

    let events = orchestrator
        .take_events()
        .context("event receiver already taken")?;
    let printer = tokio::spawn(print_events(events, notifier));
    let progress = tokio::spawn(print_progress(store.subscribe()));

    spawn_controls(store.clone());
    let ctrl_c = {
        let store = store.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, cancelling upload");
                store.cancel();
            }
        })
    };

    let result = orchestrator.run_batch(files, &cli.dest).await;
    drop(orchestrator);

    ctrl_c.abort();
    progress.abort();
    let _ = printer.await;

    let report = result?;
    print_report(&report);
    Ok(report.status == BatchStatus::Completed)
}

/// Reads pause/resume/cancel commands from stdin.
///
/// Runs on a plain thread: a blocking stdin read would otherwise hold up
/// runtime shutdown.
fn spawn_controls(store: UploadStore) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match Control::parse(&line) {
                Some(Control::Pause) => {
                    store.pause();
                    println!("paused; type r to resume");
                }
                Some(Control::Resume) => {
                    store.resume();
                    println!("resumed");
                }
                Some(Control::Cancel) => {
                    store.cancel();
                    println!("cancelling...");
                }
                None => {}
            }
        }
    });
}

async fn print_progress(mut rx: watch::Receiver<UploadState>) {
    let mut last = None;
    while rx.changed().await.is_ok() {
        let line = {
            let state = rx.borrow_and_update();
            if !state.uploading {
                continue;
            }
            let status = if state.paused { "paused" } else { "uploading" };
            let key = (state.global_progress, state.paused, state.queue.len());
            if last == Some(key) {
                continue;
            }
            last = Some(key);
            format!(
                "[{:>3}%] {status}, {} file(s) remaining",
                state.global_progress,
                state.queue.len()
            )
        };
        println!("{line}");
    }
}

async fn print_events(mut events: mpsc::Receiver<UploadEvent>, notifier: Notifier) {
    let mut shown = None;
    while let Some(event) = events.recv().await {
        match event {
            UploadEvent::FileStarted { file_name, .. } => println!("-> {file_name}"),
            UploadEvent::Progress {
                file_name,
                chunk_index,
                total_chunks,
                progress,
                ..
            } => tracing::debug!(
                file = %file_name,
                chunk = chunk_index,
                total = total_chunks,
                progress,
                "chunk acknowledged"
            ),
            _ => {}
        }

        if let Some(n) = notifier.current() {
            if shown != Some(n.id) {
                shown = Some(n.id);
                println!("{}", n.message);
            }
        }
    }
}

fn print_report(report: &BatchReport) {
    println!();
    for file in &report.files {
        let outcome = match &file.outcome {
            FileOutcome::Completed => "uploaded".to_string(),
            FileOutcome::Failed(reason) => format!("failed: {reason}"),
            FileOutcome::Cancelled => "cancelled".to_string(),
            FileOutcome::Skipped => "skipped".to_string(),
        };
        println!("  {:<40} {outcome}", file.file_name);
    }
    println!(
        "{} uploaded, {} failed, {} not uploaded",
        report.completed(),
        report.failed(),
        report.not_uploaded()
    );

    if let Some(entries) = &report.listing {
        print_listing(&report.destination, entries);
    }
}

fn print_listing(path: &str, entries: &[RemoteDirectoryEntry]) {
    let shown = if path.is_empty() { "/" } else { path };
    println!("\n{shown}:");
    for entry in entries {
        let full = entry.path_in(path);
        if entry.is_folder {
            println!("  {full}/");
        } else {
            println!("  {full}");
        }
    }
}
