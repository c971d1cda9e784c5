//! Runner tests
//!
//! Drive a `SandboxRunner` over the scripted surface and check generation
//! guarding, resource lifetime and console behavior.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sandpit_compose::{compose, CompositionMode, Sources};
use sandpit_sandbox::prelude::*;
use sandpit_sandbox::{ResourceStore, Routed, RunPhase, SandboxError, RUNNING_MESSAGE};
use sandpit_test_utils::ScriptedSurface;
use std::rc::Rc;

fn runner() -> (SandboxRunner, ScriptedSurface, Rc<InMemoryResourceStore>) {
    let store = Rc::new(InMemoryResourceStore::new());
    let surface = ScriptedSurface::new(Rc::clone(&store));
    let runner = SandboxRunner::new(
        Box::new(surface.clone()),
        store.clone() as Rc<dyn ResourceStore>,
        SandboxPolicy::default(),
    );
    (runner, surface, store)
}

fn preview(script: &str) -> sandpit_compose::ComposedDocument {
    compose(&Sources::new("<h1>Hi</h1>", "h1{color:red}", script), CompositionMode::Preview)
}

fn texts(console: &DiagnosticsConsole) -> Vec<(Severity, String)> {
    console
        .entries()
        .map(|e| (e.severity, e.text.clone()))
        .collect()
}

#[test]
fn test_run_relays_console_calls() {
    let (mut runner, _surface, _store) = runner();
    let mut console = DiagnosticsConsole::default();

    let generation = runner.run(&preview("console.log('x')"), &mut console).unwrap();
    assert_eq!(generation, Generation(1));
    assert_eq!(runner.phase(), RunPhase::Streaming);

    let report = runner.pump(&mut console);
    assert_eq!(report.delivered, 1);
    assert_eq!(
        texts(&console),
        vec![
            (Severity::Info, RUNNING_MESSAGE.to_string()),
            (Severity::Log, "x".to_string()),
        ]
    );
}

#[test]
fn test_levels_are_preserved_in_order() {
    let (mut runner, _surface, _store) = runner();
    let mut console = DiagnosticsConsole::default();

    runner
        .run(
            &preview("console.warn('w');\nconsole.error('e');\nconsole.info('i');"),
            &mut console,
        )
        .unwrap();
    runner.pump(&mut console);

    let severities: Vec<Severity> = console.entries().skip(1).map(|e| e.severity).collect();
    assert_eq!(severities, vec![Severity::Warn, Severity::Error, Severity::Info]);
}

#[test]
fn test_thrown_error_is_reported() {
    let (mut runner, _surface, _store) = runner();
    let mut console = DiagnosticsConsole::default();

    runner
        .run(&preview("throw new Error('boom');\nconsole.log('unreached')"), &mut console)
        .unwrap();
    runner.pump(&mut console);

    let last = console.entries().last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert_eq!(last.text, "JavaScript Error: Error: boom");
    assert_eq!(console.len(), 2);
}

#[test]
fn test_superseded_context_is_silenced() {
    let (mut runner, surface, _store) = runner();
    let mut console = DiagnosticsConsole::default();

    runner.run(&preview("console.log('first')"), &mut console).unwrap();
    let old_port = surface.port(0);
    runner.run(&preview("console.log('second')"), &mut console).unwrap();

    // a slow first context posting after the second run started
    assert!(old_port.post_console(Severity::Log, "late"));

    let report = runner.pump(&mut console);
    // "first" from run 1 and "late" are both stale
    assert_eq!(report.stale, 2);
    assert_eq!(report.delivered, 1);
    assert!(console.entries().all(|e| e.text != "late" && e.text != "first"));
    assert_eq!(console.entries().last().unwrap().text, "second");
}

#[test]
fn test_stop_silences_current_context() {
    let (mut runner, surface, store) = runner();
    let mut console = DiagnosticsConsole::default();

    runner.run(&preview(""), &mut console).unwrap();
    let port = surface.port(0);
    runner.stop().unwrap();

    assert_eq!(runner.phase(), RunPhase::Idle);
    assert_eq!(store.live_count(), 0);
    assert_eq!(surface.record().borrow().unloads, 1);

    port.post_console(Severity::Log, "after stop");
    let report = runner.pump(&mut console);
    assert_eq!(report.stale, 1);
    assert_eq!(report.delivered, 0);
}

#[test]
fn test_repeated_runs_keep_one_live_resource() {
    let (mut runner, _surface, store) = runner();
    let mut console = DiagnosticsConsole::default();

    for i in 0..5 {
        runner
            .run(&preview(&format!("console.log('{i}')")), &mut console)
            .unwrap();
        assert_eq!(store.live_count(), 1);
    }
    assert_eq!(store.created_count(), 5);
    assert_eq!(store.revoked_count(), 4);

    let current = runner.current_resource().unwrap().clone();
    assert!(store.fetch(&current).is_some());
}

#[test]
fn test_listener_registered_once() {
    let (mut runner, surface, _store) = runner();
    let mut console = DiagnosticsConsole::default();
    assert!(!runner.is_listening());

    runner.run(&preview(""), &mut console).unwrap();
    runner.run(&preview(""), &mut console).unwrap();
    assert!(runner.is_listening());

    // both ports feed the same receiver; only generations differ
    assert_eq!(surface.port(0).generation(), Generation(1));
    assert_eq!(surface.port(1).generation(), Generation(2));
}

#[test]
fn test_load_failure_returns_to_idle() {
    let (mut runner, surface, store) = runner();
    let mut console = DiagnosticsConsole::default();

    runner.run(&preview(""), &mut console).unwrap();
    surface.fail_next_load("frame detached");

    let err = runner.run(&preview("console.log('x')"), &mut console).unwrap_err();
    assert_eq!(err, SandboxError::Load("frame detached".to_string()));
    assert_eq!(runner.phase(), RunPhase::Idle);
    assert_eq!(store.live_count(), 0);

    let last = console.entries().last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert!(last.text.contains("frame detached"));

    // the next run recovers
    runner.run(&preview("console.log('ok')"), &mut console).unwrap();
    runner.pump(&mut console);
    assert_eq!(console.entries().last().unwrap().text, "ok");
}

#[test]
fn test_foreign_and_malformed_payloads_are_dropped() {
    let (mut runner, surface, _store) = runner();
    let mut console = DiagnosticsConsole::default();

    runner.run(&preview(""), &mut console).unwrap();
    let port = surface.port(0);
    port.post(serde_json::json!({ "type": "resize", "height": 10 }));
    port.post(serde_json::json!({ "type": "console", "level": "debug", "message": "?" }));

    let report = runner.pump(&mut console);
    assert_eq!(report.ignored, 2);
    assert_eq!(console.len(), 1);
}

#[tokio::test]
async fn test_next_routes_one_envelope() {
    let (mut runner, _surface, _store) = runner();
    let mut console = DiagnosticsConsole::default();

    runner.run(&preview("console.info('ready')"), &mut console).unwrap();
    let routed = runner.next(&mut console).await;
    assert_eq!(routed, Some(Routed::Appended(Severity::Info)));
    assert_eq!(console.entries().last().unwrap().text, "ready");
}

#[tokio::test]
async fn test_next_before_any_run_is_none() {
    let (mut runner, _surface, _store) = runner();
    let mut console = DiagnosticsConsole::default();
    assert_eq!(runner.next(&mut console).await, None);
}

#[test]
fn test_policy_reaches_surface() {
    let (mut runner, surface, _store) = runner();
    let mut console = DiagnosticsConsole::default();
    runner.run(&preview(""), &mut console).unwrap();
    assert_eq!(
        surface.record().borrow().sandbox_attributes,
        vec!["allow-scripts allow-same-origin".to_string()]
    );
}

proptest! {
    #[test]
    fn prop_console_never_exceeds_capacity(
        capacity in 1..80usize,
        appends in 0..200usize,
    ) {
        let mut console = DiagnosticsConsole::new(capacity);
        for i in 0..appends {
            console.log(Severity::Log, i.to_string());
            prop_assert!(console.len() <= capacity);
        }
        prop_assert_eq!(console.len(), appends.min(capacity));

        // survivors are the newest entries, oldest first
        let first_kept = appends.saturating_sub(capacity);
        let kept: Vec<String> = console.entries().map(|e| e.text.clone()).collect();
        let expected: Vec<String> = (first_kept..appends).map(|i| i.to_string()).collect();
        prop_assert_eq!(kept, expected);
    }
}
