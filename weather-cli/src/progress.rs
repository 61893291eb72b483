use indicatif::{ProgressBar, ProgressStyle};
use std::{future::Future, time::Duration};
use tokio::sync::watch;

fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Drive `fut` to completion, showing a spinner while `busy` reads true.
///
/// The spinner is cleared before this returns, so callers can print right away.
pub async fn with_spinner<F: Future>(
    mut busy: watch::Receiver<bool>,
    message: &str,
    fut: F,
) -> F::Output {
    tokio::pin!(fut);

    let mut spinner: Option<ProgressBar> = None;
    let mut watching = true;

    let output = loop {
        tokio::select! {
            output = &mut fut => break output,
            changed = busy.changed(), if watching => {
                if changed.is_err() {
                    watching = false;
                } else if *busy.borrow_and_update() {
                    spinner = Some(new_spinner(message));
                    watching = false;
                }
            }
        }
    };

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    output
}
