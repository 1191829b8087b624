use super::classify::classify_failure;
use super::error::{ConfigError, SetupFailure, SetupRejection};
use super::phase::{Completion, RecoveryHop, SetupAction, SetupAttempt, SetupPhase};
use super::recovery::{plan_recovery, RecoveryInput, RecoveryStep};
use crate::client::{BridgeError, LaunchClient};
use crate::config::Settings;
use crate::gateway::GatewayFailure;
use crate::schema::{
    dedup_platforms, validate_payload, LaunchConfig, Platform, SetupPathResponse, SteamProfile,
};
use crate::shared::logging::{append_setup_log, LogLevel};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

pub const DEFAULT_SETUP_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    pub timeout: Duration,
    pub log_path: Option<PathBuf>,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SETUP_TIMEOUT,
            log_path: None,
        }
    }
}

impl SetupOptions {
    pub fn from_settings(settings: &Settings, fallback_root: &Path) -> Self {
        Self {
            timeout: Duration::from_millis(settings.setup_timeout_ms),
            log_path: Some(settings.resolve_log_path(fallback_root)),
        }
    }
}

enum AttemptSignal {
    Completed(Result<String, GatewayFailure>),
    Canceled,
}

enum AttemptOutcome {
    Configured(LaunchConfig),
    Classified(ConfigError),
    Failed(SetupFailure),
}

struct InFlight {
    generation: u64,
    resume: SetupPhase,
    cancel: Sender<AttemptSignal>,
}

struct Machine {
    phase: SetupPhase,
    selection: Vec<Platform>,
    hops: Vec<RecoveryHop>,
    generation: u64,
    in_flight: Option<InFlight>,
    /// Generation whose gateway call has not returned yet, even if it was abandoned.
    outstanding: Option<u64>,
}

impl Machine {
    fn is_busy(&self) -> bool {
        self.in_flight.is_some() || self.outstanding.is_some()
    }
}

/// Drives platform selection through setup, error recovery and the Steam detour.
///
/// At most one setup or resolve call is in flight. Each call runs on its own worker
/// thread; the caller blocks until it answers, the timeout elapses, or `cancel` is
/// invoked from another thread. Replies that arrive after a cancel or timeout are
/// dropped without touching the phase or the cache, and no new call starts until the
/// abandoned one has returned.
pub struct SetupOrchestrator {
    client: LaunchClient,
    options: SetupOptions,
    machine: Arc<Mutex<Machine>>,
}

impl SetupOrchestrator {
    pub fn new(client: LaunchClient, options: SetupOptions) -> Self {
        Self {
            client,
            options,
            machine: Arc::new(Mutex::new(Machine {
                phase: SetupPhase::Idle,
                selection: Vec::new(),
                hops: Vec::new(),
                generation: 0,
                in_flight: None,
                outstanding: None,
            })),
        }
    }

    pub fn client(&self) -> &LaunchClient {
        &self.client
    }

    pub fn phase(&self) -> SetupPhase {
        self.lock().phase.clone()
    }

    pub fn selection(&self) -> Vec<Platform> {
        self.lock().selection.clone()
    }

    /// Classified failures seen since the last submit or restart, oldest first.
    pub fn recovery_log(&self) -> Vec<RecoveryHop> {
        self.lock().hops.clone()
    }

    /// True while an attempt is in flight or an abandoned gateway call has not returned.
    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    pub fn submit(&self, platforms: &[Platform]) -> Result<SetupPhase, SetupRejection> {
        let platforms = dedup_platforms(platforms);
        if platforms.is_empty() {
            self.log(
                LogLevel::Warn,
                "setup.rejected",
                "submit refused: no platform selected",
            );
            return Err(SetupRejection::EmptySelection);
        }
        let is_initialized = self.client.cache().is_setup();
        self.begin(SetupAction::Submit, |machine| {
            match &machine.phase {
                SetupPhase::Idle | SetupPhase::Succeeded { .. } | SetupPhase::FailedGeneric { .. } => {}
                other => {
                    return Err(SetupRejection::InvalidAction {
                        phase: other.as_str(),
                        action: SetupAction::Submit.as_str(),
                    })
                }
            }
            machine.selection = platforms.clone();
            machine.hops.clear();
            Ok(SetupAttempt::Setup {
                platforms,
                is_initialized,
            })
        })
    }

    /// Applies the user's remediation to the classified failure currently shown.
    pub fn recover(&self, input: RecoveryInput) -> Result<SetupPhase, SetupRejection> {
        self.begin(SetupAction::Recover, |machine| match &machine.phase {
            SetupPhase::FailedClassified { error, .. } => plan_recovery(error, &input),
            other => Err(SetupRejection::InvalidAction {
                phase: other.as_str(),
                action: SetupAction::Recover.as_str(),
            }),
        })
    }

    /// Reissues the attempt that ended in a retryable generic failure.
    pub fn retry(&self) -> Result<SetupPhase, SetupRejection> {
        self.begin(SetupAction::Retry, |machine| match &machine.phase {
            SetupPhase::FailedGeneric {
                retry: Some(attempt),
                ..
            } => Ok(attempt.clone()),
            other => Err(SetupRejection::InvalidAction {
                phase: other.as_str(),
                action: SetupAction::Retry.as_str(),
            }),
        })
    }

    pub fn confirm_steam_accounts(&self) -> Result<SetupPhase, SetupRejection> {
        self.begin(SetupAction::ConfirmSteam, |machine| match &machine.phase {
            SetupPhase::Succeeded {
                completion: Completion::SteamConfirmationRequired,
                ..
            } => Ok(SetupAttempt::ConfirmSteam),
            other => Err(SetupRejection::InvalidAction {
                phase: other.as_str(),
                action: SetupAction::ConfirmSteam.as_str(),
            }),
        })
    }

    /// Abandons the in-flight call and returns to the phase it started from.
    ///
    /// No-op when nothing is in flight.
    pub fn cancel(&self) -> SetupPhase {
        let mut machine = self.lock();
        let Some(in_flight) = machine.in_flight.take() else {
            return machine.phase.clone();
        };
        let _ = in_flight.cancel.send(AttemptSignal::Canceled);
        machine.phase = in_flight.resume;
        self.log(
            LogLevel::Info,
            "setup.canceled",
            &format!(
                "attempt {} canceled; back to {}",
                in_flight.generation, machine.phase
            ),
        );
        machine.phase.clone()
    }

    /// Closes a generic failure and goes back to where the user was.
    pub fn dismiss(&self) -> Result<SetupPhase, SetupRejection> {
        let mut machine = self.lock();
        let SetupPhase::FailedGeneric { resume, .. } = &machine.phase else {
            return Err(SetupRejection::InvalidAction {
                phase: machine.phase.as_str(),
                action: SetupAction::Dismiss.as_str(),
            });
        };
        let resume = (**resume).clone();
        machine.phase = resume.clone();
        Ok(resume)
    }

    /// Drops any failure or success state and starts over with an empty selection.
    pub fn restart(&self) -> Result<SetupPhase, SetupRejection> {
        let mut machine = self.lock();
        if machine.in_flight.is_some() {
            return Err(SetupRejection::CallInFlight);
        }
        machine.phase = SetupPhase::Idle;
        machine.selection.clear();
        machine.hops.clear();
        self.log(LogLevel::Info, "setup.restart", "setup restarted");
        Ok(SetupPhase::Idle)
    }

    /// Steam accounts to present during the confirmation detour.
    pub fn steam_accounts(&self) -> Result<Vec<SteamProfile>, BridgeError> {
        self.client.steam_accounts()
    }

    /// Suggested path for the file the current classified failure asks for.
    ///
    /// `None` unless the phase is waiting on a picked file.
    pub fn setup_path_hint(&self) -> Result<Option<SetupPathResponse>, BridgeError> {
        let key = match &self.lock().phase {
            SetupPhase::FailedClassified {
                error,
                step: RecoveryStep::PickFile { .. },
            } => error.error_key,
            _ => return Ok(None),
        };
        self.client.setup_path(key).map(Some)
    }

    fn begin<F>(&self, action: SetupAction, plan: F) -> Result<SetupPhase, SetupRejection>
    where
        F: FnOnce(&mut Machine) -> Result<SetupAttempt, SetupRejection>,
    {
        let (sender, receiver) = mpsc::channel();
        let (generation, attempt) = {
            let mut machine = self.lock();
            if machine.is_busy() {
                self.log(
                    LogLevel::Warn,
                    "setup.rejected",
                    &format!("{} refused: a gateway call is outstanding", action.as_str()),
                );
                return Err(SetupRejection::CallInFlight);
            }
            let attempt = plan(&mut *machine).map_err(|rejection| {
                self.log(
                    LogLevel::Warn,
                    "setup.rejected",
                    &format!("{} refused: {rejection}", action.as_str()),
                );
                rejection
            })?;
            machine.generation += 1;
            let previous = std::mem::replace(
                &mut machine.phase,
                SetupPhase::Attempting {
                    attempt: attempt.clone(),
                },
            );
            let resume = match previous {
                SetupPhase::FailedGeneric { resume, .. } => *resume,
                other => other,
            };
            machine.in_flight = Some(InFlight {
                generation: machine.generation,
                resume,
                cancel: sender.clone(),
            });
            machine.outstanding = Some(machine.generation);
            (machine.generation, attempt)
        };
        Ok(self.run(generation, attempt, sender, receiver))
    }

    fn run(
        &self,
        generation: u64,
        attempt: SetupAttempt,
        sender: Sender<AttemptSignal>,
        receiver: Receiver<AttemptSignal>,
    ) -> SetupPhase {
        let request = attempt.request();
        let labels: Vec<&str> = attempt
            .platforms()
            .iter()
            .map(|platform| platform.label())
            .collect();
        self.log(
            LogLevel::Info,
            "setup.attempt",
            &format!(
                "attempt {generation}: {} [{}] {}",
                request.command(),
                labels.join(", "),
                request.args()
            ),
        );

        let gateway = self.client.gateway().clone();
        let machine = Arc::clone(&self.machine);
        let spawned = thread::Builder::new()
            .name(format!("setup-{}", request.command()))
            .spawn(move || {
                let reply = gateway.invoke(&request);
                let mut state = lock_machine(&machine);
                if state.outstanding == Some(generation) {
                    state.outstanding = None;
                }
                drop(state);
                let _ = sender.send(AttemptSignal::Completed(reply));
            });
        if let Err(err) = spawned {
            self.lock().outstanding = None;
            return self.settle(
                generation,
                &attempt,
                AttemptOutcome::Failed(SetupFailure::Unexpected(format!(
                    "failed to spawn setup worker: {err}"
                ))),
            );
        }

        let outcome = match receiver.recv_timeout(self.options.timeout) {
            Ok(AttemptSignal::Completed(Ok(raw))) => self.interpret_payload(&raw),
            Ok(AttemptSignal::Completed(Err(failure))) => {
                match classify_failure(failure).into_generic() {
                    Ok(error) => AttemptOutcome::Classified(error),
                    Err(failure) => AttemptOutcome::Failed(failure),
                }
            }
            Ok(AttemptSignal::Canceled) => return self.phase(),
            Err(RecvTimeoutError::Timeout) => AttemptOutcome::Failed(SetupFailure::TimedOut {
                timeout_ms: u64::try_from(self.options.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            Err(RecvTimeoutError::Disconnected) => AttemptOutcome::Failed(
                SetupFailure::Unexpected("setup worker exited without a reply".to_string()),
            ),
        };
        self.settle(generation, &attempt, outcome)
    }

    fn interpret_payload(&self, raw: &str) -> AttemptOutcome {
        match validate_payload::<LaunchConfig>(raw) {
            Ok(config) if config.is_setup => AttemptOutcome::Configured(config),
            Ok(_) => AttemptOutcome::Failed(SetupFailure::AllPlatformsDisabled),
            Err(err) => {
                self.log(
                    LogLevel::Error,
                    "setup.validation",
                    &format!("{}: {} payload={}", err.schema(), err.reason(), err.payload()),
                );
                AttemptOutcome::Failed(SetupFailure::Validation(err))
            }
        }
    }

    fn settle(
        &self,
        generation: u64,
        attempt: &SetupAttempt,
        outcome: AttemptOutcome,
    ) -> SetupPhase {
        let mut machine = self.lock();
        let in_flight = match machine.in_flight.take() {
            Some(in_flight) if in_flight.generation == generation => in_flight,
            other => {
                machine.in_flight = other;
                self.log(
                    LogLevel::Info,
                    "setup.stale_reply",
                    &format!("discarded reply for abandoned attempt {generation}"),
                );
                return machine.phase.clone();
            }
        };

        let next = match outcome {
            AttemptOutcome::Configured(config) => {
                let completion = if config.needs_steam_confirmation() {
                    Completion::SteamConfirmationRequired
                } else {
                    Completion::Complete
                };
                self.client.cache().replace(config.clone());
                SetupPhase::Succeeded { config, completion }
            }
            AttemptOutcome::Classified(error) => {
                machine.hops.push(RecoveryHop::from(&error));
                let step = RecoveryStep::for_key(error.error_key);
                SetupPhase::FailedClassified { error, step }
            }
            AttemptOutcome::Failed(failure) => {
                let resume = if failure == SetupFailure::AllPlatformsDisabled {
                    machine.selection.clear();
                    SetupPhase::Idle
                } else {
                    in_flight.resume
                };
                let retry = failure.is_retryable().then(|| attempt.clone());
                SetupPhase::FailedGeneric {
                    failure,
                    resume: Box::new(resume),
                    retry,
                }
            }
        };

        let level = match &next {
            SetupPhase::Succeeded { .. } => LogLevel::Info,
            SetupPhase::FailedClassified { .. } => LogLevel::Warn,
            _ => LogLevel::Error,
        };
        self.log(level, "setup.outcome", &describe_outcome(generation, &next));
        machine.phase = next.clone();
        next
    }

    fn lock(&self) -> MutexGuard<'_, Machine> {
        lock_machine(&self.machine)
    }

    fn log(&self, level: LogLevel, event: &str, message: &str) {
        if let Some(path) = &self.options.log_path {
            append_setup_log(path, level, event, message);
        }
    }
}

fn lock_machine(machine: &Mutex<Machine>) -> MutexGuard<'_, Machine> {
    machine.lock().unwrap_or_else(PoisonError::into_inner)
}

fn describe_outcome(generation: u64, phase: &SetupPhase) -> String {
    match phase {
        SetupPhase::Succeeded { completion, .. } => {
            format!("attempt {generation} succeeded ({completion:?})")
        }
        SetupPhase::FailedClassified { error, .. } => format!(
            "attempt {generation} failed with {}: {}",
            error.error_key, error.message
        ),
        SetupPhase::FailedGeneric { failure, .. } => {
            format!("attempt {generation} failed: {failure}")
        }
        other => format!("attempt {generation} ended in {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LaunchCache;
    use crate::gateway::ScriptedGateway;
    use crate::setup::ConfigErrorKey;

    const CONFIGURED: &str = r#"{
        "is_setup": true,
        "battle_net": {"enabled": true, "config": "C:/cfg", "install": "C:/bnet"},
        "steam": {"enabled": false, "setup": false, "profiles": null, "install": null, "configs": null},
        "background": {"current": null, "is_outdated": false}
    }"#;

    fn orchestrator(gateway: Arc<ScriptedGateway>) -> SetupOrchestrator {
        let client = LaunchClient::new(gateway, Arc::new(LaunchCache::new()));
        SetupOrchestrator::new(client, SetupOptions::default())
    }

    #[test]
    fn submit_dedups_selection_before_calling_setup() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_ok(CONFIGURED);
        let setup = orchestrator(gateway.clone());

        let phase = setup
            .submit(&[Platform::BattleNet, Platform::BattleNet])
            .expect("submit");

        assert!(phase.is_complete());
        assert_eq!(setup.selection(), vec![Platform::BattleNet]);
        assert_eq!(gateway.count("setup"), 1);
    }

    #[test]
    fn dismiss_is_refused_outside_generic_failure() {
        let setup = orchestrator(Arc::new(ScriptedGateway::new()));
        assert_eq!(
            setup.dismiss(),
            Err(SetupRejection::InvalidAction {
                phase: "idle",
                action: "dismiss",
            })
        );
    }

    #[test]
    fn classified_failure_is_recorded_as_recovery_hop() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_error(
            r#"{"error_key":"BattleNetConfig","message":"missing","platforms":["BattleNet"]}"#,
        );
        let setup = orchestrator(gateway);

        let phase = setup.submit(&[Platform::BattleNet]).expect("submit");

        assert_eq!(phase.as_str(), "failed_classified");
        let hops = setup.recovery_log();
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].key, ConfigErrorKey::BattleNetConfig);
    }

    #[test]
    fn cancel_without_call_in_flight_keeps_phase() {
        let setup = orchestrator(Arc::new(ScriptedGateway::new()));
        assert_eq!(setup.cancel(), SetupPhase::Idle);
        assert!(!setup.is_busy());
    }
}
