//! Library-level tests: built-in commands dispatched against a temporary lab.

use std::fs;

use calbr::CalbrError;
use calbr::commands::register_builtins;
use calbr::core::{Dispatcher, Outcome, Registry};
use calbr::storage::Settings;

mod common;

use common::Lab;

fn dispatcher(lab: &Lab) -> Dispatcher {
    let settings = Settings {
        calibrates: lab.calibrates(),
        linearfits: lab.linearfits(),
        derivatives: lab.derivatives(),
        export: lab.export(),
        no_color: true,
        ..Settings::default()
    };
    let mut registry = Registry::new();
    register_builtins(&mut registry, &settings).unwrap();
    Dispatcher::new(registry, settings)
}

#[test]
fn keywords_do_not_leak_into_next_cycle() {
    let lab = Lab::new();
    lab.calibrate("1001").calibrate("1002");
    let mut dispatcher = dispatcher(&lab);

    let outcome = dispatcher.dispatch("copycal 1001 flow=no move=yes").unwrap();
    assert_eq!(outcome, Outcome::Handled);
    assert!(!lab.calibrates().join("1001.pCal").exists());
    assert!(lab.calibrates().join("1001.fCal").exists());

    // Defaults are back: both kinds, copied not moved.
    dispatcher.dispatch("copycal 1002").unwrap();
    assert!(lab.export().join("1002.pCal").is_file());
    assert!(lab.export().join("1002.fCal").is_file());
    assert!(lab.calibrates().join("1002.pCal").is_file());

    let element = dispatcher.registry().lookup("copycal").unwrap();
    assert!(element.arguments().is_empty());
}

#[test]
fn unknown_verb_leaves_lab_untouched() {
    let lab = Lab::new();
    lab.calibrate("1001");
    let mut dispatcher = dispatcher(&lab);

    let err = dispatcher.dispatch("zzz 1001 move=yes").unwrap_err();
    assert!(matches!(err, CalbrError::CommandNotFound { .. }));
    assert!(err.is_recoverable());
    assert!(lab.calibrates().join("1001.pCal").exists());
    assert_eq!(fs::read_dir(lab.export()).unwrap().count(), 0);
}

#[test]
fn bad_literal_runs_nothing() {
    let lab = Lab::new();
    lab.calibrate("1001");
    let mut dispatcher = dispatcher(&lab);

    let err = dispatcher.dispatch("copycal 1001 move=Maybe").unwrap_err();
    assert!(matches!(err, CalbrError::Coercion { .. }));
    assert_eq!(fs::read_dir(lab.export()).unwrap().count(), 0);
}

#[test]
fn handler_error_surfaces_from_dispatch() {
    let lab = Lab::new();
    lab.calibrate("1001");
    let mut dispatcher = dispatcher(&lab);

    let err = dispatcher
        .dispatch("concat 1001 dest=/nonexistent/outbox")
        .unwrap_err();
    assert!(matches!(err, CalbrError::Directory { .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn derivative_for_range_of_serials() {
    let lab = Lab::new();
    for serial in ["1001", "1002", "1003"] {
        lab.calibrate(serial);
        lab.linearfit(serial, "");
    }
    let mut dispatcher = dispatcher(&lab);

    dispatcher.dispatch("makeder 1001~1003").unwrap();
    assert_eq!(fs::read_dir(lab.derivatives()).unwrap().count(), 3);
}

#[test]
fn exit_and_quit_end_session() {
    let lab = Lab::new();
    let mut dispatcher = dispatcher(&lab);
    assert_eq!(dispatcher.dispatch("exit").unwrap(), Outcome::Exit);
    assert_eq!(dispatcher.dispatch("quit").unwrap(), Outcome::Exit);
    assert_eq!(dispatcher.dispatch("help").unwrap(), Outcome::Handled);
    assert_eq!(dispatcher.dispatch("  ").unwrap(), Outcome::Idle);
}
