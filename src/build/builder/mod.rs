//! Build orchestration and process execution.
//!
//! - [`orchestrator`] - the [`Builder`] pipeline and its [`BuildOutcome`]
//! - [`process`] - the [`CommandRunner`] seam and [`SystemRunner`]
//! - [`checksum`] - SHA-256 of the final artifact

mod checksum;
mod orchestrator;
mod process;

pub use checksum::artifact_sha256;
pub use orchestrator::{BuildOutcome, Builder};
pub use process::{CommandRunner, SystemRunner};
