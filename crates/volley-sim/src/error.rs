use std::fmt;

/// A rejected [`SimConfig`](crate::SimConfig) value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Name of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: &'static str, msg: impl Into<String>) -> Self {
        Self { field, message: msg.into() }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid sim config `{}`: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}
