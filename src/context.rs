//! Explicit view context: active file, session token and thresholds
//!
//! Every file switch (or clear) starts a new session. Fetches carry the token
//! of the session that issued them so late responses can be recognised.

use crate::config::ViewConfig;
use crate::filter::ThresholdFilter;
use std::fmt;

/// Identifies one opened-file session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn next(self) -> Self {
        SessionToken(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// State shared by every operation of the controller
#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    file: Option<String>,
    token: SessionToken,
    filter: ThresholdFilter,
}

impl ViewContext {
    pub fn new(filter: ThresholdFilter) -> Self {
        Self {
            file: None,
            token: SessionToken::default(),
            filter,
        }
    }

    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(config.filter())
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn filter(&self) -> &ThresholdFilter {
        &self.filter
    }

    /// Start a new session, optionally on a file
    pub(crate) fn begin(&mut self, file: Option<String>) -> SessionToken {
        self.file = file;
        self.token = self.token.next();
        self.token
    }

    pub fn is_current(&self, token: SessionToken) -> bool {
        self.token == token
    }
}

impl Default for ViewContext {
    fn default() -> Self {
        Self::new(ThresholdFilter::all())
    }
}
