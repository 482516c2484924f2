//! End-to-end tests: Lua directory in, JSON files out

use luajson_lua::{
    write_all, BatchLoader, ExportMode, FailurePolicy, FallbackPolicy, JsonWriter, LuaError,
    LuaSession, LuaVersion, SessionOptions, DECODE_ERROR_MARKER, FUNCTION_MARKER,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_source(dir: &Path, rel: &str, content: &[u8]) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Source dir with `x = {1,2,3}` and `y = {name="n"}` in separate files
fn two_binding_sources() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_source(dir.path(), "numbers.lua", b"x = {1, 2, 3}\n");
    write_source(dir.path(), "meta/named.lua", b"y = { name = \"n\" }\n");
    dir
}

fn run_batch(source: &Path, output: &Path, mode: ExportMode) -> usize {
    let mut session = LuaSession::open(LuaVersion::linked()).unwrap();
    BatchLoader::new(source).unwrap().load_all(&mut session).unwrap();
    let writer = JsonWriter::new(output, mode);
    write_all(session.exports(), &writer, |_| {}).unwrap().bindings
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// EXPORT MODES
// ============================================================================

#[test]
fn test_format_mode_writes_formatted_files_only() {
    let source = two_binding_sources();
    let out = TempDir::new().unwrap();

    assert_eq!(run_batch(source.path(), out.path(), ExportMode::Format), 2);

    assert_eq!(read_json(&out.path().join("x.json")), json!([1, 2, 3]));
    assert_eq!(read_json(&out.path().join("y.json")), json!({ "name": "n" }));
    assert_eq!(
        fs::read_to_string(out.path().join("y.json")).unwrap(),
        "{\n   \"name\": \"n\"\n}"
    );
    assert!(!out.path().join("x.min.json").exists());
    assert!(!out.path().join("y.min.json").exists());
}

#[test]
fn test_min_mode_writes_compact_files_only() {
    let source = two_binding_sources();
    let out = TempDir::new().unwrap();

    run_batch(source.path(), out.path(), ExportMode::Min);

    assert_eq!(fs::read_to_string(out.path().join("x.min.json")).unwrap(), "[1,2,3]");
    assert_eq!(
        fs::read_to_string(out.path().join("y.min.json")).unwrap(),
        r#"{"name":"n"}"#
    );
    assert!(!out.path().join("x.json").exists());
}

#[test]
fn test_all_mode_writes_both_forms_with_equal_content() {
    let source = two_binding_sources();
    let out = TempDir::new().unwrap();

    run_batch(source.path(), out.path(), ExportMode::All);

    for name in ["x", "y"] {
        let formatted = read_json(&out.path().join(format!("{name}.json")));
        let minified = read_json(&out.path().join(format!("{name}.min.json")));
        assert_eq!(formatted, minified, "forms differ for {name}");
    }
}

// ============================================================================
// AUTHORING STYLES AND RECOVERY
// ============================================================================

#[test]
fn test_bare_literal_file_does_not_abort_the_batch() {
    let source = TempDir::new().unwrap();
    write_source(source.path(), "a_literal.lua", b"{ gold = 10, silver = 2 }");
    write_source(source.path(), "b_script.lua", b"prices = { gold = 10 }");

    let mut session = LuaSession::open(LuaVersion::linked()).unwrap();
    let report = BatchLoader::new(source.path())
        .unwrap()
        .load_all(&mut session)
        .unwrap();

    assert_eq!(report.fallbacks, 1);
    assert_eq!(report.chunks, 1);
    assert!(session.fallback_source("a_literal").is_some());
    assert_eq!(session.discovered().distinct(), vec!["prices"]);
}

#[test]
fn test_invoke_policy_exports_bare_literal_under_file_stem() {
    let source = TempDir::new().unwrap();
    write_source(source.path(), "rewards.lua", b"{ gold = 10, items = { 'a', 'b' } }");
    let out = TempDir::new().unwrap();

    let mut session = LuaSession::with_options(
        LuaVersion::linked(),
        SessionOptions {
            fallback: FallbackPolicy::Invoke,
            ..Default::default()
        },
    )
    .unwrap();
    BatchLoader::new(source.path()).unwrap().load_all(&mut session).unwrap();
    write_all(session.exports(), &JsonWriter::new(out.path(), ExportMode::Format), |_| {}).unwrap();

    assert_eq!(
        read_json(&out.path().join("rewards.json")),
        json!({ "gold": 10, "items": ["a", "b"] })
    );
}

#[test]
fn test_decode_errors_and_functions_are_inlined_as_markers() {
    let source = TempDir::new().unwrap();
    write_source(
        source.path(),
        "npc.lua",
        b"npc = { name = \"guard\", motto = \"\xff\xfe\", on_talk = function() end }",
    );
    let out = TempDir::new().unwrap();

    run_batch(source.path(), out.path(), ExportMode::Format);

    assert_eq!(
        read_json(&out.path().join("npc.json")),
        json!({ "name": "guard", "motto": DECODE_ERROR_MARKER, "on_talk": FUNCTION_MARKER })
    );
}

#[test]
fn test_excluded_keys_never_reach_output() {
    let source = TempDir::new().unwrap();
    write_source(
        source.path(),
        "env.lua",
        b"env = { _G = _G, io = io, nested = { package = package, value = 1 } }",
    );
    let out = TempDir::new().unwrap();

    run_batch(source.path(), out.path(), ExportMode::Min);

    assert_eq!(
        fs::read_to_string(out.path().join("env.min.json")).unwrap(),
        r#"{"nested":{"value":1}}"#
    );
}

#[test]
fn test_cyclic_table_exports_with_marker() {
    let source = TempDir::new().unwrap();
    write_source(source.path(), "graph.lua", b"node = { id = 1 }\nnode.parent = node\n");
    let out = TempDir::new().unwrap();

    run_batch(source.path(), out.path(), ExportMode::Format);

    assert_eq!(
        read_json(&out.path().join("node.json")),
        json!({ "id": 1, "parent": luajson_lua::CYCLE_MARKER })
    );
}

#[test]
fn test_later_file_value_wins() {
    let source = TempDir::new().unwrap();
    write_source(source.path(), "1.lua", b"config = { level = 1 }");
    write_source(source.path(), "2.lua", b"config.level = 2");
    let out = TempDir::new().unwrap();

    assert_eq!(run_batch(source.path(), out.path(), ExportMode::Format), 1);
    assert_eq!(read_json(&out.path().join("config.json")), json!({ "level": 2 }));
}

#[test]
fn test_empty_binding_exports_as_empty_object() {
    let source = TempDir::new().unwrap();
    write_source(source.path(), "empty.lua", b"nothing = {}");
    let out = TempDir::new().unwrap();

    run_batch(source.path(), out.path(), ExportMode::Min);

    assert_eq!(fs::read_to_string(out.path().join("nothing.min.json")).unwrap(), "{}");
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_fatal_file_aborts_by_default() {
    let source = TempDir::new().unwrap();
    write_source(source.path(), "bad.lua", b"local = = =");

    let mut session = LuaSession::open(LuaVersion::linked()).unwrap();
    let err = BatchLoader::new(source.path())
        .unwrap()
        .load_all(&mut session)
        .unwrap_err();

    assert!(matches!(err, LuaError::Execution { .. }));
    assert!(err.to_string().contains("bad.lua"));
}

#[test]
fn test_continue_policy_exports_the_good_files() {
    let source = TempDir::new().unwrap();
    write_source(source.path(), "bad.lua", b"local = = =");
    write_source(source.path(), "good.lua", b"good = { ok = true }");
    let out = TempDir::new().unwrap();

    let mut session = LuaSession::open(LuaVersion::linked()).unwrap();
    let report = BatchLoader::new(source.path())
        .unwrap()
        .with_policy(FailurePolicy::Continue)
        .load_all(&mut session)
        .unwrap();
    write_all(session.exports(), &JsonWriter::new(out.path(), ExportMode::Format), |_| {}).unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(read_json(&out.path().join("good.json")), json!({ "ok": true }));
}

#[test]
fn test_unsupported_version_fails_before_io() {
    let err = "51".parse::<LuaVersion>().unwrap_err();
    assert!(matches!(err, LuaError::UnsupportedVersion(_)));
}
