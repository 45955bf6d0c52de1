use thiserror::Error;

/// Why a single channel attempt failed.
///
/// The `Display` output is the bare detail; the dispatcher adds the
/// channel label when it writes the report.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Provider unreachable: connect, TLS, timeout, or broken response stream.
    #[error("{0}")]
    Transport(String),

    /// Provider answered but refused the message.
    #[error("{0}")]
    Rejected(String),

    /// The outbound message could not be assembled (bad address, bad header).
    #[error("{0}")]
    Build(String),
}

impl ChannelError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ChannelError::Transport(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ChannelError::Rejected(_))
    }
}

/// `outer: cause: root cause`, skipping levels that only repeat the tail.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !detail.ends_with(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }
    detail
}

impl From<reqwest::Error> for ChannelError {
    fn from(e: reqwest::Error) -> Self {
        let detail = error_chain(&e);
        if e.is_timeout() {
            ChannelError::Transport(format!("request timed out: {detail}"))
        } else {
            ChannelError::Transport(detail)
        }
    }
}

impl From<lettre::transport::smtp::Error> for ChannelError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        if e.is_permanent() || e.is_transient() {
            ChannelError::Rejected(e.to_string())
        } else {
            ChannelError::Transport(e.to_string())
        }
    }
}

impl From<lettre::error::Error> for ChannelError {
    fn from(e: lettre::error::Error) -> Self {
        ChannelError::Build(e.to_string())
    }
}

impl From<lettre::address::AddressError> for ChannelError {
    fn from(e: lettre::address::AddressError) -> Self {
        ChannelError::Build(format!("invalid address: {e}"))
    }
}
