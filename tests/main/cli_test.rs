//! CLI contract tests.

use std::fs;
use std::path::Path;

use assert_cmd::Command;

fn penwright() -> Command {
    match Command::cargo_bin("penwright") {
        Ok(cmd) => cmd,
        Err(err) => panic!("binary should build: {err}"),
    }
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = match cmd.output() {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };
    assert!(output.status.success(), "status: {:?}", output.status);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Config pointing at a closed local port so `generate` never leaves the host.
fn offline_config(dir: &Path) -> std::path::PathBuf {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let path = dir.join("config.toml");
    let write = fs::write(
        &path,
        format!("[service]\nbase_url = \"http://{addr}/v1\"\ntimeout_secs = 5\n"),
    );
    assert!(write.is_ok());
    path
}

#[test]
fn styles_lists_every_style() {
    let stdout = stdout_of(penwright().arg("styles"));
    for id in ["professional", "casual", "humorous", "inspirational"] {
        assert!(stdout.contains(id), "missing {id} in {stdout}");
    }
    assert_eq!(stdout.lines().count(), 4);
}

#[test]
fn prompt_prints_system_and_user_prompts() {
    let stdout = stdout_of(penwright().args([
        "prompt",
        "--topic",
        "效率",
        "--style",
        "Humorous",
        "--words",
        "1200",
        "--audience",
        "学生",
    ]));
    assert!(stdout.contains("[system]"));
    assert!(stdout.contains("[user]"));
    assert!(stdout.contains("1200字左右"));
    assert!(stdout.contains("幽默风趣"));
}

#[test]
fn unknown_style_is_rejected() {
    penwright()
        .args(["prompt", "--topic", "a", "--style", "gothic", "--audience", "b"])
        .assert()
        .failure();
}

#[test]
fn blank_topic_is_rejected() {
    penwright()
        .args(["prompt", "--topic", "  ", "--audience", "b"])
        .assert()
        .failure();
}

#[test]
fn generate_offline_still_prints_article_and_writes_file() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let config = offline_config(tmp.path());
    let out_dir = tmp.path().join("out");

    let stdout = stdout_of(
        penwright()
            .env_remove("PENWRIGHT_BASE_URL")
            .env("PENWRIGHT_CONFIG_PATH", &config)
            .args([
                "generate",
                "--topic",
                "效率",
                "--audience",
                "职场新人",
                "--output",
            ])
            .arg(&out_dir),
    );

    assert!(stdout.starts_with("效率：职场新人必须知道的那些事\n\n"));
    assert!(stdout.contains("4. 总结"));
    let written = out_dir.join("效率：职场新人必须知道的那些事.txt");
    let contents = fs::read_to_string(&written).expect("article file written");
    assert_eq!(contents, stdout);
}

#[test]
fn generate_json_reports_fallback_and_exit_code() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let config = offline_config(tmp.path());

    let output = penwright()
        .env_remove("PENWRIGHT_BASE_URL")
        .arg("--config")
        .arg(&config)
        .args([
            "generate",
            "--topic",
            "效率",
            "--audience",
            "职场新人",
            "--json",
            "--fail-on-fallback",
        ])
        .output()
        .expect("command should run");

    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["diagnostics"]["tier"], "synthesized");
    assert_eq!(value["diagnostics"]["fallback"]["kind"], "network");
    assert_eq!(value["document"]["sections"].as_array().map(Vec::len), Some(4));
}
