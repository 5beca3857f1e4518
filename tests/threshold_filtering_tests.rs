// Threshold filtering of top-level calls and subcalls
//
// Trace files are written to temp files and read through the local file
// provider, the same path the CLI takes.

use arbol::config::ViewConfig;
use arbol::node::NodeId;
use arbol::provider::FileProvider;
use arbol::session::TreeSession;
use arbol::view::RecordingSink;
use std::io::Write;
use tempfile::NamedTempFile;

fn trace(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

fn session(root: f64, nested: f64) -> TreeSession<FileProvider, RecordingSink> {
    let config = ViewConfig::default().with_thresholds(Some(root), Some(nested));
    TreeSession::new(FileProvider::from_config(&config), &config, RecordingSink::new())
}

fn durations(session: &TreeSession<FileProvider, RecordingSink>) -> Vec<String> {
    session.rows().into_iter().map(|r| r.duration).collect()
}

const THREE_ROOTS: [&str; 3] = [
    r#"{"a()":"50ms"}"#,
    r#"{"b()":"5ms"}"#,
    r#"{"c()":"1200ms"}"#,
];

#[tokio::test]
async fn test_root_threshold_10() {
    let file = trace(&THREE_ROOTS);
    let mut session = session(10.0, 0.0);
    let visible = session.open(&file.path().to_string_lossy()).await.unwrap();

    assert_eq!(visible, 2);
    assert_eq!(durations(&session), vec!["50ms", "1200ms"]);
}

#[tokio::test]
async fn test_root_threshold_1000() {
    let file = trace(&THREE_ROOTS);
    let mut session = session(1000.0, 0.0);
    session.open(&file.path().to_string_lossy()).await.unwrap();

    assert_eq!(durations(&session), vec!["1200ms"]);
    // Line numbers survive filtering
    assert_eq!(session.rows()[0].id, NodeId::root(3));
}

#[tokio::test]
async fn test_threshold_is_strict() {
    let file = trace(&THREE_ROOTS);
    let mut session = session(50.0, 0.0);
    session.open(&file.path().to_string_lossy()).await.unwrap();

    assert_eq!(durations(&session), vec!["1200ms"]);
}

#[tokio::test]
async fn test_nested_threshold_applies_at_every_depth() {
    let file = trace(&[
        r#"{"root()":"900ms","subcalls":[{"slow()":"400ms","subcalls":[{"deep()":"30ms"},{"deeper()":"8ms"}]},{"quick()":"9ms","subcalls":[{"hidden()":"500ms"}]}]}"#,
    ]);
    let mut session = session(0.0, 10.0);
    session.open(&file.path().to_string_lossy()).await.unwrap();

    let root = NodeId::root(1);
    session.expand(&root).await.unwrap();
    session.expand(&root.child(0)).await.unwrap();

    let names: Vec<_> = session.rows().into_iter().map(|r| r.name).collect();
    // quick() falls under the cutoff and takes its slow subcall with it
    assert_eq!(names, vec!["root()", "slow()", "deep()"]);
}

#[tokio::test]
async fn test_root_and_nested_thresholds_are_independent() {
    let file = trace(&[
        r#"{"root()":"200ms","subcalls":[{"child()":"60ms"}]}"#,
        r#"{"other()":"60ms"}"#,
    ]);
    let mut session = session(100.0, 50.0);
    session.open(&file.path().to_string_lossy()).await.unwrap();
    session.expand(&NodeId::root(1)).await.unwrap();

    assert_eq!(durations(&session), vec!["200ms", "60ms"]);
    assert_eq!(session.rows()[1].name, "child()");
}

#[tokio::test]
async fn test_malformed_lines_are_skipped() {
    let file = trace(&[
        r#"{"a()":"50ms"}"#,
        "not json at all",
        r#"{"subcalls":[]}"#,
        "",
        r#"{"e()":"70ms"}"#,
    ]);
    let mut session = session(0.0, 0.0);
    session.open(&file.path().to_string_lossy()).await.unwrap();

    let ids: Vec<_> = session.rows().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![NodeId::root(1), NodeId::root(5)]);
}

#[tokio::test]
async fn test_malformed_subcall_is_skipped_with_siblings_kept() {
    let file = trace(&[
        r#"{"root()":"100ms","subcalls":[{"a()":"20ms"},{"subcalls":[]},{"c()":"bogus"},{"d()":"40ms"}]}"#,
    ]);
    let mut session = session(0.0, 0.0);
    session.open(&file.path().to_string_lossy()).await.unwrap();
    session.expand(&NodeId::root(1)).await.unwrap();

    let rows = session.rows();
    let ids: Vec<_> = rows.iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, vec!["1", "1/0", "1/3"]);
}

#[tokio::test]
async fn test_non_object_subcall_is_skipped_with_siblings_kept() {
    let file = trace(&[
        r#"{"root()":"100ms","subcalls":[{"good()":"50ms"},7,{"also()":"60ms"}]}"#,
    ]);
    let mut session = session(0.0, 0.0);
    session.open(&file.path().to_string_lossy()).await.unwrap();
    session.expand(&NodeId::root(1)).await.unwrap();

    let ids: Vec<_> = session.rows().iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, vec!["1", "1/0", "1/2"]);
}

#[tokio::test]
async fn test_non_list_subcalls_means_no_children() {
    let file = trace(&[
        r#"{"root()":"100ms","subcalls":[{"good()":"50ms"},{"bad()":"9ms","subcalls":null}]}"#,
    ]);
    let mut session = session(0.0, 0.0);
    session.open(&file.path().to_string_lossy()).await.unwrap();
    session.expand(&NodeId::root(1)).await.unwrap();

    let rows = session.rows();
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["root()", "good()", "bad()"]);
    assert!(!rows[2].has_children);
}

#[tokio::test]
async fn test_bad_grandchild_keeps_root_listed() {
    let file = trace(&[
        r#"{"main()":"1200ms","subcalls":[{"ok()":"300ms"},{"x()":"1ms","subcalls":[42]}]}"#,
    ]);
    let mut session = session(0.0, 0.0);
    let visible = session.open(&file.path().to_string_lossy()).await.unwrap();
    assert_eq!(visible, 1);

    session.expand(&NodeId::root(1)).await.unwrap();
    let names: Vec<_> = session.rows().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["main()", "ok()", "x()"]);

    // x() lists one unusable child, which is skipped on expansion
    session.expand(&NodeId::root(1).child(1)).await.unwrap();
    assert_eq!(session.rows().len(), 3);
}
