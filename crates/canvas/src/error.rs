#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// The media list is empty; the scene declines to start.
    EmptyMedia,
    NotMounted,
    AlreadyMounted,
    /// A previous frame panicked; the scene stays down until remounted.
    Faulted(String),
}

impl std::fmt::Display for CanvasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanvasError::EmptyMedia => write!(f, "media list is empty"),
            CanvasError::NotMounted => write!(f, "canvas is not mounted"),
            CanvasError::AlreadyMounted => write!(f, "canvas is already mounted"),
            CanvasError::Faulted(msg) => write!(f, "canvas faulted: {msg}"),
        }
    }
}

impl std::error::Error for CanvasError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    /// A tunable is outside its valid range.
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "invalid config overrides: {msg}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
