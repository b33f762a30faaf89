/// One-way sink for user-facing error presentation.
///
/// The client never notifies on its own; callers decide which failures are
/// worth showing and pass [`crate::ClientError::user_message`] output here,
/// so REST and streaming failures present through one policy.
pub trait Notifier {
    fn notify_error(&self, message: &str);
}

/// Prints each notification as one stderr line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
