use crate::client::{BridgeError, LaunchClient};
use crate::notice::Notice;
use crate::schema::LaunchConfig;
use crate::setup::SetupOrchestrator;
use crate::shared::logging::{append_setup_log, LogLevel};

pub const RESET_NOTICE: &str = "Successfully reset to default settings.";
pub const RESET_BUSY_NOTICE: &str = "Setup is still running. Try the reset again once it finishes.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    Idle,
    Confirm,
    Pending,
    Success,
}

impl ResetState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Confirm => "confirm",
            Self::Pending => "pending",
            Self::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPress {
    Armed,
    Started,
    Ignored,
}

/// Two-press confirmation in front of the irreversible settings reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetFlow {
    state: ResetState,
}

impl Default for ResetFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetFlow {
    pub fn new() -> Self {
        Self {
            state: ResetState::Idle,
        }
    }

    pub fn state(&self) -> ResetState {
        self.state
    }

    pub fn press(&mut self) -> ResetPress {
        match self.state {
            ResetState::Idle => {
                self.state = ResetState::Confirm;
                ResetPress::Armed
            }
            ResetState::Confirm => {
                self.state = ResetState::Pending;
                ResetPress::Started
            }
            ResetState::Pending | ResetState::Success => ResetPress::Ignored,
        }
    }

    /// Backs out of the confirmation prompt. Only possible before the reset starts.
    pub fn cancel(&mut self) -> bool {
        if self.state != ResetState::Confirm {
            return false;
        }
        self.state = ResetState::Idle;
        true
    }

    pub fn finish(&mut self, result: &Result<LaunchConfig, BridgeError>) -> Notice {
        match result {
            Ok(_) => {
                self.state = ResetState::Success;
                Notice::success(RESET_NOTICE)
            }
            Err(err) => {
                self.state = ResetState::Idle;
                Notice::from(err)
            }
        }
    }

    /// Presses the reset control; on the confirming press runs the reset and sends
    /// setup back to its start.
    ///
    /// The confirming press is held back while setup still has a gateway call
    /// outstanding. Returns a notice only when a reset ran or was held back.
    pub fn press_and_run(
        &mut self,
        client: &LaunchClient,
        setup: &SetupOrchestrator,
    ) -> Option<Notice> {
        if self.state == ResetState::Confirm && setup.is_busy() {
            log_reset(client, LogLevel::Warn, "reset.deferred", "setup call outstanding");
            return Some(Notice::warning(RESET_BUSY_NOTICE));
        }
        if self.press() != ResetPress::Started {
            return None;
        }
        let result = client.reset();
        let notice = self.finish(&result);
        if result.is_ok() {
            if let Err(rejection) = setup.restart() {
                log_reset(
                    client,
                    LogLevel::Error,
                    "reset.restart_rejected",
                    &format!("setup not restarted after reset: {rejection}"),
                );
            }
        }
        Some(notice)
    }
}

fn log_reset(client: &LaunchClient, level: LogLevel, event: &str, message: &str) {
    if let Some(path) = client.log_path() {
        append_setup_log(path, level, event, message);
    }
}
