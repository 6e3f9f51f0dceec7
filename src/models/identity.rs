//! Student display identities.

use serde::{Deserialize, Serialize};

/// How a student may be shown to their peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentIdentity {
    pub user_id: String,

    /// Opt-in to showing the real name on leaderboards
    #[serde(default)]
    pub show_real_name: bool,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,
}

impl StudentIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            show_real_name: false,
            first_name: None,
            last_name: None,
            display_name: None,
        }
    }

    pub fn with_names(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn opted_in(mut self) -> Self {
        self.show_real_name = true;
        self
    }
}
