#![cfg(feature = "cli")]

use std::process::Command;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_stock-screener"))
}

#[test]
fn help_displays_overview() {
    let output = binary().arg("--help").output().expect("invoke stock-screener --help");

    assert!(output.status.success(), "help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Stock screener and watchlist client"),
        "expected overview text in help output"
    );
}

#[test]
fn dry_run_prints_request_body() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = binary()
        .args(["--store"])
        .arg(dir.path().join("store.json"))
        .args([
            "screen",
            "--dry-run",
            "--sector",
            "Energy",
            "--min-price",
            "10",
            "--filter",
            "eps:gte:5",
        ])
        .output()
        .expect("invoke screen --dry-run");

    assert!(output.status.success(), "dry run should succeed");
    let body: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("dry run prints JSON");
    assert_eq!(body["sector.Energy"]["filter_type"], "categoric");
    assert_eq!(body["price__gte"]["value"], 10.0);
    assert_eq!(body["eps__gte"]["operator"], "gte");
}

#[test]
fn watchlist_round_trip_through_file_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("store.json");

    let run = |args: &[&str]| {
        let output = binary()
            .arg("--store")
            .arg(&store)
            .args(args)
            .output()
            .expect("invoke watchlist");
        assert!(output.status.success(), "watchlist {args:?} failed");
        String::from_utf8_lossy(&output.stdout).into_owned()
    };

    run(&["watchlist", "create", "Tech"]);
    run(&["watchlist", "add", "Tech", "aapl", "msft"]);
    run(&["watchlist", "remove", "Tech", "msft"]);
    let listing = run(&["watchlist", "list"]);
    assert!(listing.contains("Tech"));
    assert!(listing.contains("AAPL"));
    assert!(!listing.contains("MSFT"));
}
