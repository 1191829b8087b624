use overbuddy::cache::LaunchCache;
use overbuddy::client::LaunchClient;
use overbuddy::flows::reset::RESET_BUSY_NOTICE;
use overbuddy::flows::{revert_background, ResetFlow, ResetPress, ResetState};
use overbuddy::gateway::ScriptedGateway;
use overbuddy::notice::NoticeLevel;
use overbuddy::schema::{LaunchConfig, Platform};
use overbuddy::setup::{SetupOptions, SetupOrchestrator, SetupPhase};
use std::fs;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

const CONFIGURED: &str = r#"{
    "is_setup": true,
    "battle_net": {"enabled": true, "config": "C:/bnet/Battle.net.config", "install": "C:/bnet"},
    "steam": {"enabled": false, "setup": false, "profiles": null, "install": null, "configs": null},
    "background": {"current": "hanamura", "is_outdated": false}
}"#;

const DEFAULTS: &str = r#"{
    "is_setup": false,
    "battle_net": {"enabled": false, "config": null, "install": null},
    "steam": {"enabled": false, "setup": false, "profiles": null, "install": null, "configs": null},
    "background": {"current": null, "is_outdated": false}
}"#;

fn harness(gateway: &Arc<ScriptedGateway>) -> SetupOrchestrator {
    let client = LaunchClient::new(gateway.clone(), Arc::new(LaunchCache::new()));
    SetupOrchestrator::new(client, SetupOptions::default())
}

#[test]
fn confirmed_reset_restores_defaults_and_restarts_setup() {
    let gateway = Arc::new(ScriptedGateway::new());
    gateway.push_ok(CONFIGURED).push_ok(DEFAULTS);
    let setup = harness(&gateway);
    setup.submit(&[Platform::BattleNet]).expect("submit");
    let mut flow = ResetFlow::new();

    assert!(flow.press_and_run(setup.client(), &setup).is_none());
    assert_eq!(flow.state(), ResetState::Confirm);
    assert_eq!(gateway.count("reset"), 0);

    let notice = flow
        .press_and_run(setup.client(), &setup)
        .expect("reset notice");

    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.text, "Successfully reset to default settings.");
    assert_eq!(flow.state(), ResetState::Success);
    assert_eq!(setup.phase(), SetupPhase::Idle);
    assert_eq!(
        setup.client().cache().read(),
        Some(LaunchConfig::unconfigured())
    );
    assert_eq!(flow.press(), ResetPress::Ignored);
}

#[test]
fn failed_reset_returns_flow_to_idle_with_error_notice() {
    let gateway = Arc::new(ScriptedGateway::new());
    gateway.push_error("Failed to reset.");
    let setup = harness(&gateway);
    let mut flow = ResetFlow::new();

    flow.press();
    let notice = flow
        .press_and_run(setup.client(), &setup)
        .expect("reset notice");

    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, "Failed to reset.");
    assert_eq!(flow.state(), ResetState::Idle);
}

#[test]
fn background_revert_reports_success() {
    let gateway = Arc::new(ScriptedGateway::new());
    gateway.push_ok(CONFIGURED.replace("\"hanamura\"", "null"));
    let setup = harness(&gateway);

    let notice = revert_background(setup.client());

    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(
        notice.text,
        "Successfully reverted to the default background."
    );
    assert_eq!(gateway.count("reset_background"), 1);
}

#[test]
fn confirming_press_waits_for_outstanding_setup_call() {
    let temp = tempdir().expect("tempdir");
    let log_path = temp.path().join("setup.log");
    let gateway = Arc::new(ScriptedGateway::new());
    let (release, held) = mpsc::channel();
    gateway
        .push_held(held, Ok(CONFIGURED.to_string()))
        .push_ok(DEFAULTS);
    let client = LaunchClient::new(gateway.clone(), Arc::new(LaunchCache::new()))
        .with_log_path(&log_path);
    let setup = Arc::new(SetupOrchestrator::new(client, SetupOptions::default()));

    let running = {
        let setup = Arc::clone(&setup);
        thread::spawn(move || setup.submit(&[Platform::BattleNet]))
    };
    while !setup.is_busy() {
        thread::sleep(Duration::from_millis(2));
    }

    let mut flow = ResetFlow::new();
    assert_eq!(flow.press(), ResetPress::Armed);
    let notice = flow
        .press_and_run(setup.client(), &setup)
        .expect("deferred notice");

    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.text, RESET_BUSY_NOTICE);
    assert_eq!(flow.state(), ResetState::Confirm);
    assert_eq!(gateway.count("reset"), 0);
    let log = fs::read_to_string(&log_path).expect("read log");
    assert!(log.contains("\"event\":\"reset.deferred\""));

    release.send(()).expect("release setup reply");
    running.join().expect("join").expect("submit");
    while setup.is_busy() {
        thread::sleep(Duration::from_millis(2));
    }

    let notice = flow
        .press_and_run(setup.client(), &setup)
        .expect("reset notice");
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(setup.phase(), SetupPhase::Idle);
    assert_eq!(gateway.count("reset"), 1);
}
