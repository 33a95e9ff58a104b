// Sync run audit records

pub mod recorder;
pub mod run;

pub use recorder::RunRecorder;
pub use run::{RunCounts, RunParameters, RunStatus, SyncRun};
