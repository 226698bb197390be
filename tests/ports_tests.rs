// Port prober and negotiator tests

use std::io::Cursor;
use std::net::TcpListener;
use std::time::Duration;
use systempulse::ports::{
    Negotiation, NegotiatorOptions, PortMode, find_free_port, is_port_in_use, negotiate,
    scan_report,
};

fn opts(max_attempts: u16) -> NegotiatorOptions {
    NegotiatorOptions {
        max_attempts,
        grace: Duration::from_millis(10),
    }
}

/// Binds an ephemeral port and returns it free again.
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Finds a base port where `count` consecutive ports can all be bound,
/// returning the listeners (dropping them frees the run).
fn occupy_consecutive(count: u16) -> (u16, Vec<TcpListener>) {
    'base: for base in (20000..60000).step_by(97) {
        let mut listeners = Vec::new();
        for offset in 0..count {
            match TcpListener::bind(("127.0.0.1", base + offset)) {
                Ok(l) => listeners.push(l),
                Err(_) => continue 'base,
            }
        }
        return (base, listeners);
    }
    panic!("no run of {} consecutive free ports found", count);
}

#[test]
fn test_probe_is_idempotent_on_free_port() {
    let port = free_port();
    // The probe must release its socket; two probes in a row both say free.
    assert!(!is_port_in_use(port));
    assert!(!is_port_in_use(port));
}

#[test]
fn test_probe_detects_bound_port() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    assert!(is_port_in_use(port));
    drop(listener);
}

#[test]
fn test_free_preferred_port_resolves_immediately() {
    let port = free_port();
    let result = negotiate(
        port,
        PortMode::Auto,
        &opts(10),
        &mut Cursor::new(""),
        &mut Vec::new(),
    );
    assert_eq!(result, Negotiation::Resolved(port));
}

#[test]
fn test_auto_mode_picks_smallest_free_port_above_preferred() {
    // Occupy preferred and the next two, leaving +3 free; the negotiator
    // must skip to it.
    let (base, mut listeners) = occupy_consecutive(4);
    drop(listeners.pop());
    let result = negotiate(
        base,
        PortMode::Auto,
        &opts(10),
        &mut Cursor::new(""),
        &mut Vec::new(),
    );
    match result {
        Negotiation::Resolved(port) => {
            assert_eq!(port, base + 3, "smallest free port in the window");
            assert!(!is_port_in_use(port));
        }
        Negotiation::Aborted(reason) => panic!("unexpected abort: {}", reason),
    }
    drop(listeners);
}

#[test]
fn test_auto_mode_aborts_when_window_exhausted() {
    let (base, listeners) = occupy_consecutive(4);
    // Window covers (base, base+3], all occupied.
    let result = negotiate(
        base,
        PortMode::Auto,
        &opts(3),
        &mut Cursor::new(""),
        &mut Vec::new(),
    );
    assert!(matches!(result, Negotiation::Aborted(_)));
    drop(listeners);
}

#[test]
fn test_auto_mode_at_top_of_port_range_aborts_cleanly() {
    // No ports exist above 65535; when it is busy the negotiator can only
    // abort, and formatting the abort message must not overflow.
    let _guard = TcpListener::bind(("127.0.0.1", 65535u16));
    if !is_port_in_use(65535) {
        // Could not occupy the port on this host; nothing to exercise.
        return;
    }
    let result = negotiate(
        65535,
        PortMode::Auto,
        &opts(10),
        &mut Cursor::new(""),
        &mut Vec::new(),
    );
    assert!(matches!(result, Negotiation::Aborted(_)));
}

#[test]
fn test_find_free_port_scans_ascending() {
    let (base, listeners) = occupy_consecutive(2);
    let found = find_free_port(base, 20).expect("a free port within 20");
    assert!(found > base);
    assert!(!is_port_in_use(found));
    drop(listeners);
}

#[test]
fn test_interactive_abort_choice() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let mut output = Vec::new();
    let result = negotiate(
        port,
        PortMode::Interactive,
        &opts(10),
        &mut Cursor::new("3\n"),
        &mut output,
    );
    assert_eq!(result, Negotiation::Aborted("aborted by user".into()));
    let prompt = String::from_utf8(output).unwrap();
    assert!(prompt.contains(&format!("Port {} is in use", port)));
}

#[test]
fn test_interactive_find_another_port() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let mut output = Vec::new();
    let result = negotiate(
        port,
        PortMode::Interactive,
        &opts(50),
        &mut Cursor::new("1\n"),
        &mut output,
    );
    match result {
        Negotiation::Resolved(found) => {
            assert_ne!(found, port);
            assert!(!is_port_in_use(found));
        }
        Negotiation::Aborted(reason) => panic!("unexpected abort: {}", reason),
    }
}

#[test]
fn test_interactive_eof_aborts() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let result = negotiate(
        port,
        PortMode::Interactive,
        &opts(10),
        &mut Cursor::new(""),
        &mut Vec::new(),
    );
    assert_eq!(result, Negotiation::Aborted("input closed".into()));
}

#[test]
fn test_interactive_reprompts_on_garbage() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let mut output = Vec::new();
    let result = negotiate(
        port,
        PortMode::Interactive,
        &opts(10),
        &mut Cursor::new("bogus\n3\n"),
        &mut output,
    );
    assert_eq!(result, Negotiation::Aborted("aborted by user".into()));
    assert!(String::from_utf8(output).unwrap().contains("Unrecognized"));
}

#[test]
fn test_scan_report_lists_every_port_in_range() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let bound = listener.local_addr().unwrap().port();
    let mut out = Vec::new();
    scan_report(bound, bound, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(&bound.to_string()));
    assert!(text.contains("in use"));
}
