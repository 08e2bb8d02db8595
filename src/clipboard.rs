use arboard::Clipboard;

/// Copies `text` to the system clipboard. Failures are not fatal and are only
/// reported at debug level.
pub fn copy_to_clipboard(text: &str) {
    match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => tracing::debug!("answer copied to clipboard"),
        Err(e) => tracing::debug!(error = %e, "could not copy answer to clipboard"),
    }
}
