//! Poll state machine for queued generation jobs.

use std::time::Duration;

/// Status reported by the queue for a submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    InQueue,
    InProgress,
    Completed,
    Failed { error: Option<String> },
}

/// Polling limits for a queued job.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Maximum number of status checks before giving up.
    pub max_polls: u32,
    /// Delay between consecutive status checks.
    pub delay: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_polls: 300,
            delay: Duration::from_secs(2),
        }
    }
}

/// Lifecycle of one queued job, advanced by each status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Job accepted, no status observed yet.
    Submitted,
    /// Job still queued or running after `attempt` checks.
    Polling { attempt: u32 },
    /// Job finished and a result is available.
    Completed,
    /// Provider reported a terminal failure.
    Failed { error: String },
    /// Poll budget exhausted before any terminal status.
    TimedOut,
}

impl PollState {
    /// Fold one status response into the state.
    ///
    /// Terminal states are absorbing. A timeout is distinct from a failure:
    /// the job may still be running, we just stop waiting for it.
    pub fn advance(self, status: &JobStatus, config: &PollConfig) -> PollState {
        match self {
            PollState::Completed | PollState::Failed { .. } | PollState::TimedOut => self,
            PollState::Submitted | PollState::Polling { .. } => {
                let attempt = match &self {
                    PollState::Polling { attempt } => *attempt,
                    _ => 0,
                };
                match status {
                    JobStatus::Completed => PollState::Completed,
                    JobStatus::Failed { error } => PollState::Failed {
                        error: error
                            .clone()
                            .unwrap_or_else(|| "job failed without detail".to_string()),
                    },
                    JobStatus::InQueue | JobStatus::InProgress => {
                        if attempt + 1 >= config.max_polls {
                            PollState::TimedOut
                        } else {
                            PollState::Polling {
                                attempt: attempt + 1,
                            }
                        }
                    }
                }
            }
        }
    }

    /// Whether polling should stop.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Completed | PollState::Failed { .. } | PollState::TimedOut
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(max_polls: u32) -> PollConfig {
        PollConfig {
            max_polls,
            delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn completes_from_submitted() {
        let state = PollState::Submitted.advance(&JobStatus::Completed, &cfg(300));
        assert_eq!(state, PollState::Completed);
    }

    #[test]
    fn counts_attempts_while_pending() {
        let config = cfg(300);
        let mut state = PollState::Submitted;
        state = state.advance(&JobStatus::InQueue, &config);
        assert_eq!(state, PollState::Polling { attempt: 1 });
        state = state.advance(&JobStatus::InProgress, &config);
        assert_eq!(state, PollState::Polling { attempt: 2 });
    }

    #[test]
    fn times_out_at_poll_budget() {
        let config = cfg(3);
        let mut state = PollState::Submitted;
        for _ in 0..3 {
            state = state.advance(&JobStatus::InQueue, &config);
        }
        assert_eq!(state, PollState::TimedOut);
    }

    #[test]
    fn failure_carries_provider_error() {
        let status = JobStatus::Failed {
            error: Some("bad prompt".to_string()),
        };
        let state = PollState::Submitted.advance(&status, &cfg(300));
        assert_eq!(
            state,
            PollState::Failed {
                error: "bad prompt".to_string()
            }
        );
    }

    #[test]
    fn terminal_states_absorb() {
        let config = cfg(300);
        let state = PollState::Completed.advance(&JobStatus::InQueue, &config);
        assert_eq!(state, PollState::Completed);
        let state = PollState::TimedOut.advance(&JobStatus::Completed, &config);
        assert_eq!(state, PollState::TimedOut);
    }
}
