/// Errors raised by the companion library.
///
/// Remote and storage failures are recoverable and meant to be shown to the
/// user. The remaining variants are precondition failures: they indicate a
/// caller passed something the calculators cannot interpret.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    RemoteNotFound(String),

    #[error("could not fetch {resource}: {message}")]
    RemoteTransport { resource: String, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("unknown nature: {0}")]
    UnknownNature(String),

    #[error("unknown stat: {0}")]
    UnknownStat(String),

    #[error("a Pokémon has one or two types, got {0}")]
    InvalidTyping(usize),

    #[error("{field} out of range: {value}")]
    InvalidStatInput { field: &'static str, value: u32 },

    #[error("move slot {0} out of range")]
    InvalidMoveSlot(usize),
}

impl Error {
    /// True for failures the user can sensibly retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RemoteTransport { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let resource = err
            .url()
            .map(|url| url.path().to_string())
            .unwrap_or_else(|| "resource".to_string());
        Error::RemoteTransport {
            resource,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
