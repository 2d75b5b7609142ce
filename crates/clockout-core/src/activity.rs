//! User activity (idle state) collaborators.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::process::Command;
use tracing::warn;

/// Idle state of the user session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleState {
    Active,
    Idle,
    Locked,
}

/// Platform idle query. Implementations must not fail: when the state cannot
/// be determined they report [`IdleState::Active`].
#[async_trait]
pub trait ActivityProbe: Send + Sync {
    /// State given that `threshold` without input counts as idle.
    async fn query_state(&self, threshold: Duration) -> IdleState;
}

/// Probe for hosts without idle detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeActive;

#[async_trait]
impl ActivityProbe for AssumeActive {
    async fn query_state(&self, _threshold: Duration) -> IdleState {
        IdleState::Active
    }
}

/// Runs a command that prints the idle time in milliseconds, such as
/// `xprintidle`.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
}

impl CommandProbe {
    /// Build from a whitespace-separated command line. Returns `None` for an
    /// empty line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    async fn idle_for(&self) -> Result<Duration, String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {e}", self.program))?;

        if !output.status.success() {
            return Err(format!("{} exited with {}", self.program, output.status));
        }

        parse_idle_millis(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl ActivityProbe for CommandProbe {
    async fn query_state(&self, threshold: Duration) -> IdleState {
        match self.idle_for().await {
            Ok(idle) => classify(idle, threshold),
            Err(e) => {
                warn!(error = %e, "idle query failed, assuming active");
                IdleState::Active
            }
        }
    }
}

fn parse_idle_millis(stdout: &str) -> Result<Duration, String> {
    stdout
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| format!("unexpected idle output: {:?}", stdout.trim()))
}

fn classify(idle: Duration, threshold: Duration) -> IdleState {
    if idle >= threshold {
        IdleState::Idle
    } else {
        IdleState::Active
    }
}

/// Tracks successive probe results to spot idle→active transitions.
#[derive(Debug, Clone)]
pub struct ActivityWatcher {
    last: IdleState,
}

impl Default for ActivityWatcher {
    fn default() -> Self {
        Self {
            last: IdleState::Active,
        }
    }
}

impl ActivityWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `state`; true when the user just came back.
    pub fn observe(&mut self, state: IdleState) -> bool {
        let returned = self.last != IdleState::Active && state == IdleState::Active;
        self.last = state;
        returned
    }

    pub fn last(&self) -> IdleState {
        self.last
    }
}
