use serde::{Deserialize, Serialize};

/// UI state remembered between runs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    /// Last city looked up on the weather screen.
    #[serde(default)]
    pub last_city: Option<String>,
}
