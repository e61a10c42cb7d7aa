use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;

fn run_vp(workdir: &Path, args: &[&str]) -> (bool, Vec<Value>, String) {
	let output = Command::new(env!("CARGO_BIN_EXE_vp"))
		.current_dir(workdir)
		.env_remove("RUST_LOG")
		.args(args)
		.output()
		.expect("failed to execute vp");

	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	(output.status.success(), parse_responses(&stdout), stderr)
}

fn parse_responses(stdout: &str) -> Vec<Value> {
	stdout
		.lines()
		.map(|line| serde_json::from_str(line).unwrap_or_else(|_| json!({ "raw": line })))
		.collect()
}

fn write_script(workdir: &Path, requests: &[Value]) -> String {
	let path = workdir.join("requests.jsonl");
	let body: Vec<String> = requests.iter().map(Value::to_string).collect();
	std::fs::write(&path, body.join("\n")).expect("script should be written");
	path.display().to_string()
}

fn create_texture(uri: &str) -> Value {
	json!({ "type": "create_for_texture_view", "options": { "uri": uri } })
}

#[test]
fn script_drives_full_player_lifecycle() {
	let temp = TempDir::new().expect("tempdir");
	let script = write_script(
		temp.path(),
		&[
			json!({ "type": "initialize" }),
			json!({ "type": "create_for_platform_view", "options": { "uri": "asset:///videos/intro.mp4" } }),
			create_texture("https://host/live.m3u8"),
			json!({ "type": "dispose", "player_id": 1 }),
			json!({ "type": "dispose", "player_id": 1 }),
			json!({ "type": "lookup_asset_key", "asset": "videos/intro.mp4" }),
		],
	);

	let (success, responses, stderr) = run_vp(temp.path(), &["--script", &script]);

	assert!(success, "vp failed: {stderr}");
	assert_eq!(
		responses,
		vec![
			json!({ "type": "ok" }),
			json!({ "type": "player", "player_id": 1 }),
			json!({ "type": "texture_player", "player_id": 2, "texture_id": 0 }),
			json!({ "type": "ok" }),
			json!({ "type": "error", "code": "unknown_player", "message": "no player found with id <1>" }),
			json!({ "type": "asset_key", "key": "assets/videos/intro.mp4" }),
		]
	);
}

#[test]
fn malformed_lines_get_error_responses() {
	let temp = TempDir::new().expect("tempdir");
	let path = temp.path().join("requests.jsonl");
	std::fs::write(&path, "# comment\n\nnot json\n{\"type\":\"initialize\"}\n").expect("script should be written");

	let (success, responses, stderr) = run_vp(temp.path(), &["--script", &path.display().to_string()]);

	assert!(success, "vp failed: {stderr}");
	assert_eq!(responses.len(), 2);
	assert_eq!(responses[0]["code"], "malformed_request");
	assert_eq!(responses[1], json!({ "type": "ok" }));
}

#[test]
fn injected_surface_failures_are_retried() {
	let temp = TempDir::new().expect("tempdir");
	let script = write_script(temp.path(), &[create_texture("https://host/a.mp4")]);

	let (success, responses, stderr) = run_vp(temp.path(), &["--script", &script, "--surface-failures", "2"]);

	assert!(success, "vp failed: {stderr}");
	assert_eq!(responses, vec![json!({ "type": "texture_player", "player_id": 1, "texture_id": 0 })]);
	assert!(stderr.contains("attempt"), "retries should be logged: {stderr}");
}

#[test]
fn exhausted_retries_report_resource_acquisition() {
	let temp = TempDir::new().expect("tempdir");
	let script = write_script(temp.path(), &[create_texture("https://host/a.mp4"), create_texture("https://host/b.mp4")]);

	let (success, responses, stderr) = run_vp(temp.path(), &["--script", &script, "--build-failures", "3"]);

	assert!(success, "vp failed: {stderr}");
	assert_eq!(responses[0]["type"], "error");
	assert_eq!(responses[0]["code"], "resource_acquisition");
	assert_eq!(responses[1], json!({ "type": "texture_player", "player_id": 2, "texture_id": 3 }));
	assert!(!stderr.contains("outlived"), "no surface should leak: {stderr}");
}

#[test]
fn config_file_raises_attempt_budget() {
	let temp = TempDir::new().expect("tempdir");
	let config = temp.path().join("vp.json");
	std::fs::write(&config, r#"{"retry":{"maxAttempts":5,"baseDelayMs":1}}"#).expect("config should be written");
	let script = write_script(temp.path(), &[create_texture("https://host/a.mp4")]);

	let (success, responses, stderr) = run_vp(
		temp.path(),
		&["--script", &script, "--config", &config.display().to_string(), "--build-failures", "4"],
	);

	assert!(success, "vp failed: {stderr}");
	assert_eq!(responses, vec![json!({ "type": "texture_player", "player_id": 1, "texture_id": 4 })]);
}

#[test]
fn missing_script_fails_with_context() {
	let temp = TempDir::new().expect("tempdir");

	let (success, responses, stderr) = run_vp(temp.path(), &["--script", "absent.jsonl"]);

	assert!(!success);
	assert!(responses.is_empty());
	assert!(stderr.contains("failed to open script"), "stderr: {stderr}");
}

#[test]
fn reads_requests_from_stdin() {
	let temp = TempDir::new().expect("tempdir");
	let mut child = Command::new(env!("CARGO_BIN_EXE_vp"))
		.current_dir(temp.path())
		.env_remove("RUST_LOG")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("failed to spawn vp");

	{
		let mut stdin = child.stdin.take().expect("stdin should be piped");
		writeln!(stdin, "{}", json!({ "type": "set_mix_with_others", "mix_with_others": true })).expect("write request");
		writeln!(stdin, "{}", json!({ "type": "lookup_asset_key", "asset": "a.mp4", "package_name": "clips" })).expect("write request");
	}

	let output = child.wait_with_output().expect("vp should exit");
	assert!(output.status.success());
	assert_eq!(
		parse_responses(&String::from_utf8_lossy(&output.stdout)),
		vec![json!({ "type": "ok" }), json!({ "type": "asset_key", "key": "assets/packages/clips/a.mp4" })]
	);
}
