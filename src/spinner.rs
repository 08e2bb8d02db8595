use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use std::future::Future;
use std::time::Duration;

/// Awaits `fut` while a spinner with `msg` runs on stderr, then clears the line.
/// Nothing is drawn when disabled or when stderr isn't a terminal.
pub async fn with_spinner<Fut, T>(msg: impl Into<String>, enabled: bool, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    let pb = (enabled && std::io::stderr().is_terminal()).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
        );
        pb.set_message(msg.into());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    });

    // Clear the line on every exit path, including cancellation
    struct Guard(Option<ProgressBar>);
    impl Drop for Guard {
        fn drop(&mut self) {
            if let Some(pb) = self.0.take() {
                pb.finish_and_clear();
            }
        }
    }
    let _guard = Guard(pb);

    fut.await
}
