//! Action policy and per-attempt deadlines

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read action policy: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse action policy: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Fixed deadlines, one per attempt class, in milliseconds.
///
/// Candidates and hints stay short so the worst case for one action is
/// bounded at primary + a handful of short attempts, never an open-ended
/// retry loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionTimeouts {
    #[serde(default = "default_primary_ms")]
    pub primary_ms: u64,
    #[serde(default = "default_visibility_ms")]
    pub visibility_ms: u64,
    #[serde(default = "default_candidate_ms")]
    pub candidate_ms: u64,
    #[serde(default = "default_hint_ms")]
    pub hint_ms: u64,
    #[serde(default = "default_url_wait_ms")]
    pub url_wait_ms: u64,
}

impl ActionTimeouts {
    pub fn primary(&self) -> Duration {
        Duration::from_millis(self.primary_ms)
    }

    pub fn visibility(&self) -> Duration {
        Duration::from_millis(self.visibility_ms)
    }

    pub fn candidate(&self) -> Duration {
        Duration::from_millis(self.candidate_ms)
    }

    pub fn hint(&self) -> Duration {
        Duration::from_millis(self.hint_ms)
    }

    pub fn url_wait(&self) -> Duration {
        Duration::from_millis(self.url_wait_ms)
    }
}

impl Default for ActionTimeouts {
    fn default() -> Self {
        Self {
            primary_ms: default_primary_ms(),
            visibility_ms: default_visibility_ms(),
            candidate_ms: default_candidate_ms(),
            hint_ms: default_hint_ms(),
            url_wait_ms: default_url_wait_ms(),
        }
    }
}

fn default_primary_ms() -> u64 {
    2000
}

fn default_visibility_ms() -> u64 {
    5000
}

fn default_candidate_ms() -> u64 {
    2000
}

fn default_hint_ms() -> u64 {
    2000
}

fn default_url_wait_ms() -> u64 {
    10_000
}

fn default_allow_self_heal() -> bool {
    true
}

/// Facade-level behavior switches.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionPolicy {
    /// When false, every primary failure is returned as-is with no
    /// fallback attempts and no audit events.
    #[serde(default = "default_allow_self_heal")]
    pub allow_self_heal: bool,
    #[serde(default)]
    pub timeouts: ActionTimeouts,
}

impl Default for ActionPolicy {
    fn default() -> Self {
        Self {
            allow_self_heal: default_allow_self_heal(),
            timeouts: ActionTimeouts::default(),
        }
    }
}

impl ActionPolicy {
    /// Load a policy from a YAML file, falling back to defaults when the
    /// file does not exist.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "policy file missing, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let policy: ActionPolicy = serde_yaml::from_str(&raw)?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_timeout_table() {
        let policy = ActionPolicy::default();
        assert!(policy.allow_self_heal);
        assert_eq!(policy.timeouts.primary(), Duration::from_secs(2));
        assert_eq!(policy.timeouts.visibility(), Duration::from_secs(5));
        assert_eq!(policy.timeouts.candidate(), Duration::from_secs(2));
        assert_eq!(policy.timeouts.hint(), Duration::from_secs(2));
        assert_eq!(policy.timeouts.url_wait(), Duration::from_secs(10));
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("policy.yaml");
        std::fs::write(
            &file_path,
            r#"allow_self_heal: false
timeouts:
  primary_ms: 500
"#,
        )
        .unwrap();

        let policy = ActionPolicy::load_from_path(&file_path).unwrap();
        assert!(!policy.allow_self_heal);
        assert_eq!(policy.timeouts.primary_ms, 500);
        assert_eq!(policy.timeouts.visibility_ms, 5000);
        assert_eq!(policy.timeouts.url_wait_ms, 10_000);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let policy = ActionPolicy::load_from_path(dir.path().join("absent.yaml")).unwrap();
        assert!(policy.allow_self_heal);
        assert_eq!(policy.timeouts.primary_ms, 2000);
    }
}
