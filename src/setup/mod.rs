pub mod classify;
pub mod error;
pub mod orchestrator;
pub mod phase;
pub mod recovery;

pub use classify::{classify_failure, RawFailure};
pub use error::{ConfigError, ConfigErrorKey, SetupFailure, SetupRejection};
pub use orchestrator::{SetupOptions, SetupOrchestrator, DEFAULT_SETUP_TIMEOUT};
pub use phase::{Completion, RecoveryHop, SetupAction, SetupAttempt, SetupPhase};
pub use recovery::{plan_recovery, RecoveryInput, RecoveryStep};
