//! Orchestration of the StoryReel generation pipeline.
//!
//! Wires the provider clients, the session layout, and the local media
//! steps into one workflow with bounded retries and partial-failure
//! handling.

pub mod error;
pub mod retry;
pub mod workflow;

pub use error::{PipelineError, PipelineResult};
pub use retry::{is_permanent_failure, retry_async, retry_async_with, RetryConfig};
pub use workflow::{partition_results, RunOutcome, RunRequest, Workflow};
