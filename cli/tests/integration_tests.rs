//! End-to-end tests for the `bot-api-typegen` binary against cached pages.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const PAGE: &str = r##"<h3>Available types</h3>
<h4><a class="anchor" name="chattype"></a>ChatType</h4>
<p>Kinds of chat.</p>
<ul>
<li><a href="#privatechat">PrivateChat</a></li>
<li><a href="#groupchat">GroupChat</a></li>
</ul>
<h4><a class="anchor" name="user"></a>User</h4>
<p>This object represents a Telegram user or bot.</p>
<table class="table">
<thead><tr><th>Field</th><th>Type</th><th>Description</th></tr></thead>
<tbody>
<tr><td>id</td><td>Integer</td><td>Unique identifier for this user or bot.</td></tr>
<tr><td>username</td><td>String</td><td><em>Optional</em>. User&#39;s or bot&#39;s username</td></tr>
</tbody>
</table>
<h3>Available methods</h3>
<h4><a class="anchor" name="getme"></a>getMe</h4>
<p>A simple method for testing your bot&#39;s authentication token. Requires no parameters. Returns basic information about the bot in form of a <a href="#user">User</a> object.</p>
"##;

const BROKEN_PAGE: &str = "<h4>Broken</h4>\n<table><tr><td>id</td><td>Integer</td><td>Id</td></tr></table>\n<ul><li>Stray</li></ul>\n";

fn typegen_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bot-api-typegen"))
}

fn write_cache(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("bot-api.html");
    fs::write(&path, contents).expect("failed to write cache");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(typegen_bin())
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run bot-api-typegen")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path should be UTF-8")
}

#[test]
fn test_typescript_output_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = write_cache(dir.path(), PAGE);

    let output = run(&[path_arg(&cache)]);
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("export type NoInput = Record<string, never>;"));
    assert!(stdout.contains("export type ChatType = PrivateChat | GroupChat;"));
    assert!(stdout.contains("  username?: string; // Optional. User's or bot's username"));
    assert!(stdout.contains("export type GetMeData = NoInput;"));
    assert!(stdout.contains("export type Methods = {\n  getMe: [GetMeData, User];\n};"));

    // A cache hit never rewrites the file.
    assert_eq!(fs::read_to_string(&cache).unwrap(), PAGE);
}

#[test]
fn test_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let cache = write_cache(dir.path(), PAGE);

    let output = run(&[path_arg(&cache), "--format", "json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{stdout}"));
    assert_eq!(parsed["entities"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["registry"]["entries"][0]["operation"], "getMe");
    assert_eq!(parsed["registry"]["entries"][0]["request_shape"], "GetMeData");
}

#[test]
fn test_yaml_output() {
    let dir = tempfile::tempdir().unwrap();
    let cache = write_cache(dir.path(), PAGE);

    let output = run(&[path_arg(&cache), "--format", "yaml"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_yaml::Value = serde_yaml::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid YAML output: {e}\n{stdout}"));
    assert!(parsed["entities"].is_sequence());
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let cache = write_cache(dir.path(), PAGE);
    let out = dir.path().join("generated").join("bot-api.d.ts");

    let output = run(&[path_arg(&cache), "--output", path_arg(&out)]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("getMe: [GetMeData, User];"));
}

#[test]
fn test_config_file_and_flag_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let cache = write_cache(dir.path(), PAGE);
    let config = dir.path().join("typegen.yml");
    fs::write(
        &config,
        format!(
            "cache_path: {}\nregistry_name: BotMethods\nwrap_width: 20\n",
            cache.display()
        ),
    )
    .unwrap();

    let output = run(&["--config", path_arg(&config)]);
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("export type BotMethods = {"));
    assert!(stdout.contains(" * This object\n * represents a\n * Telegram user or\n * bot.\n"));

    let output = run(&["--config", path_arg(&config), "--registry-name", "Api"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("export type Api = {"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cache = write_cache(dir.path(), PAGE);

    let output = run(&[path_arg(&cache), "--wrap-width", "0"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: invalid config: wrap_width"), "{stderr}");
}

#[test]
fn test_inconsistent_entity_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let cache = write_cache(dir.path(), BROKEN_PAGE);

    let output = run(&[path_arg(&cache)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: inconsistent entity shape in Broken"), "{stderr}");
}

#[test]
fn test_unreachable_source_fails_without_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("missing.html");

    let output = run(&[
        path_arg(&cache),
        "--url",
        "http://127.0.0.1:9/bots/api",
        "--timeout",
        "2",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: failed to fetch http://127.0.0.1:9/bots/api"), "{stderr}");
    assert!(!cache.exists());
}

#[test]
fn test_report_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let cache = write_cache(dir.path(), PAGE);

    let output = run(&[path_arg(&cache), "--report"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let report: serde_json::Value = serde_json::from_str(&stderr)
        .unwrap_or_else(|e| panic!("Invalid report JSON: {e}\n{stderr}"));
    assert_eq!(report["operations"], 1);
    assert_eq!(report["unions"], 1);
    assert_eq!(report["records"], 1);
    assert_eq!(report["source"]["origin"], "cache");
}
