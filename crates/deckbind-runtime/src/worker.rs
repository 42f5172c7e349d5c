use deckbind_merge::{CancelFlag, MergeError, Pipeline, calculate_plan};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{BindCommand, BindUpdate};

/// The build in flight
struct RunningBuild {
    cancel: CancelFlag,
    handle: JoinHandle<()>,
}

impl RunningBuild {
    fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Async worker task that processes bind commands and sends updates.
///
/// Builds run on their own task so a `Cancel` can reach them while they
/// are in progress. Only one build runs at a time.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<BindCommand>,
    update_tx: mpsc::UnboundedSender<BindUpdate>,
) {
    let mut running: Option<RunningBuild> = None;

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut running, &update_tx).await;
    }

    // The front end hung up; let a build in flight finish writing
    if let Some(build) = running.take() {
        let _ = build.handle.await;
    }
}

async fn process_command(
    cmd: BindCommand,
    running: &mut Option<RunningBuild>,
    update_tx: &mpsc::UnboundedSender<BindUpdate>,
) {
    match cmd {
        BindCommand::Build {
            inputs,
            options,
            output_path,
        } => {
            if running.as_ref().is_some_and(RunningBuild::is_active) {
                let _ = update_tx.send(BindUpdate::Error {
                    message: "A build is already running".to_string(),
                });
                return;
            }

            let cancel = CancelFlag::new();
            let progress_tx = update_tx.clone();
            let pipeline = Pipeline::new(options)
                .with_cancel_flag(cancel.clone())
                .with_progress(move |event| {
                    let fraction = event.fraction();
                    let _ = progress_tx.send(BindUpdate::Progress { event, fraction });
                });

            let update_tx = update_tx.clone();
            let handle = tokio::spawn(async move {
                let update = match pipeline.run(inputs, &output_path).await {
                    Ok(report) => BindUpdate::Complete { report },
                    Err(MergeError::Cancelled) => {
                        log::info!("Build cancelled");
                        BindUpdate::Cancelled
                    }
                    Err(e) => {
                        log::error!("Build failed: {}", e);
                        BindUpdate::Error {
                            message: format!("Build failed: {}", e),
                        }
                    }
                };
                let _ = update_tx.send(update);
            });

            *running = Some(RunningBuild { cancel, handle });
        }
        BindCommand::Plan { inputs, options } => {
            let update = match calculate_plan(&inputs, &options).await {
                Ok(summary) => BindUpdate::Planned { summary },
                Err(e) => BindUpdate::Error {
                    message: format!("Failed to plan: {}", e),
                },
            };
            let _ = update_tx.send(update);
        }
        BindCommand::LoadConfig { path } => {
            let update = match deckbind_merge::BindOptions::load(&path).await {
                Ok(options) => BindUpdate::ConfigLoaded { options },
                Err(e) => BindUpdate::Error {
                    message: format!("Failed to load config: {}", e),
                },
            };
            let _ = update_tx.send(update);
        }
        BindCommand::Cancel => match running.as_ref() {
            Some(build) if build.is_active() => build.cancel.cancel(),
            _ => log::debug!("Cancel requested with no build running"),
        },
    }
}
