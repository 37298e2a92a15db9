//! Tests that read or modify process environment variables.

use bracefmt::{are_escape_sequences_supported, Formatter, FORCE_ESCAPE_SEQUENCES_ENV};
use serial_test::serial;

fn plain() -> Formatter {
    let mut formatter = Formatter::new();
    formatter.disable_escape_sequences();
    formatter
}

#[test]
#[serial]
fn test_force_escape_sequences_enabled() {
    for value in ["1", "true", "YES", " on "] {
        std::env::set_var(FORCE_ESCAPE_SEQUENCES_ENV, value);
        assert!(are_escape_sequences_supported(), "{:?}", value);
    }
    std::env::remove_var(FORCE_ESCAPE_SEQUENCES_ENV);
}

#[test]
#[serial]
fn test_force_escape_sequences_disabled() {
    for value in ["0", "false", "No", "disable"] {
        std::env::set_var(FORCE_ESCAPE_SEQUENCES_ENV, value);
        assert!(!are_escape_sequences_supported(), "{:?}", value);
    }
    std::env::remove_var(FORCE_ESCAPE_SEQUENCES_ENV);
}

#[test]
#[serial]
fn test_dumb_terminal_without_force() {
    std::env::remove_var(FORCE_ESCAPE_SEQUENCES_ENV);
    let previous = std::env::var("TERM").ok();
    std::env::set_var("TERM", "dumb");
    assert!(!are_escape_sequences_supported());
    match previous {
        Some(term) => std::env::set_var("TERM", term),
        None => std::env::remove_var("TERM"),
    }
}

#[test]
#[serial]
fn test_env_function() {
    std::env::set_var("BRACEFMT_TEST_VALUE", "value");
    let out = plain()
        .format(r#"{env "BRACEFMT_TEST_VALUE"}"#, &[])
        .unwrap();
    assert_eq!(out, "value");

    std::env::remove_var("BRACEFMT_TEST_VALUE");
    let out = plain()
        .format(r#"{env "BRACEFMT_TEST_VALUE"}"#, &[])
        .unwrap();
    assert_eq!(out, "");
}

#[test]
#[serial]
fn test_expand_function() {
    std::env::set_var("BRACEFMT_TEST_DIR", "/opt/app");
    let out = plain()
        .format(r#"{expand "$BRACEFMT_TEST_DIR/bin:${BRACEFMT_TEST_DIR}/lib"}"#, &[])
        .unwrap();
    assert_eq!(out, "/opt/app/bin:/opt/app/lib");
    std::env::remove_var("BRACEFMT_TEST_DIR");
}

#[test]
#[serial]
fn test_user_function() {
    let previous = std::env::var("USER").ok();
    std::env::set_var("USER", "tester");
    assert_eq!(plain().format("{user}", &[]).unwrap(), "tester");
    match previous {
        Some(user) => std::env::set_var("USER", user),
        None => std::env::remove_var("USER"),
    }
}
