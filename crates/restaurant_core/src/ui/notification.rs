use log::info;

/// Shows a titled message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Notifier that writes the alert to the log instead of a dialog.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        info!(
            "event=notify module=ui status=ok title={:?} message={:?}",
            title, message
        );
    }
}
