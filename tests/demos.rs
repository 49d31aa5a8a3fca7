mod common;

use std::fs;

use common::capturing_context;
use finlite::run_source;
use walkdir::WalkDir;

#[test]
fn demo_scripts_run() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "fin"))
    {
        let path = entry.path();
        let source = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        let (mut context, capture) = capturing_context();
        if let Err(e) = run_source(&source, &mut context) {
            panic!("Demo {path:?} failed:\n{e}");
        }
        assert!(!capture.text().is_empty(), "Demo {path:?} printed nothing");
        count += 1;
    }

    assert!(count > 0, "No demo scripts found in demos/");
}

#[test]
fn ledger_demo_tracks_entries() {
    let source = fs::read_to_string("demos/ledger.fin").unwrap();
    let (mut context, capture) = capturing_context();
    run_source(&source, &mut context).unwrap();

    let text = capture.text();
    assert!(text.starts_with("LEDGER(4 entries)\nBalance:\n"));
    assert!(text.contains("LedgerEntry(2024-01-01: Opening deposit)"));
    assert!(text.ends_with("Invoice 1042\n"));
}
