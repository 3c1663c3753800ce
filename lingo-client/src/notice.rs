use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ClientError;

pub type NoticeSender = mpsc::UnboundedSender<Notice>;
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A toast for the presentation layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    /// The same action may succeed if the user tries again.
    pub retryable: bool,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, text: text.into(), retryable: false }
    }
    pub fn error(err: &ClientError) -> Self {
        Self { kind: NoticeKind::Error, text: err.to_string(), retryable: err.is_retryable() }
    }
}

pub fn channel() -> (NoticeSender, NoticeReceiver) {
    mpsc::unbounded_channel()
}

/// Sends `notice`; a dropped receiver only means nobody is showing toasts.
pub(crate) fn deliver(notices: &NoticeSender, notice: Notice) {
    if notices.send(notice).is_err() {
        debug!("notice receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_errors_offer_a_retry() {
        assert!(Notice::error(&ClientError::NetworkFailure("reset".into())).retryable);
        assert!(!Notice::error(&ClientError::Conflict("dup".into())).retryable);
        assert!(!Notice::success("Friend request sent").retryable);
    }

    #[test]
    fn delivering_without_a_receiver_is_harmless() {
        let (tx, rx) = channel();
        drop(rx);
        deliver(&tx, Notice::success("ignored"));
    }
}
