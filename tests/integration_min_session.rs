// Runs the compiled binary under a temporary home. The PTY session (open the
// game, close it, quit) needs a TTY from expectrl, so it is ignored by default.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use expectrl::{spawn, Eof};

/// The binary under a throwaway home so config, scores and logs stay out of the real one.
fn isolated(home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("catch-targets").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
#[ignore]
fn open_close_and_quit() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("catch-targets");
    let cmd = format!(
        "env HOME={home} XDG_CONFIG_HOME={home}/.config XDG_DATA_HOME={home}/.local/share {bin}",
        home = home.path().display(),
        bin = bin.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("g")?;
    std::thread::sleep(Duration::from_millis(200));

    // Esc closes the game, q leaves the title screen
    p.send("\x1b")?;
    std::thread::sleep(Duration::from_millis(200));
    p.send("q")?;

    p.expect(Eof)?;
    Ok(())
}

#[test]
fn list_prints_empty_board_without_a_tty() {
    let home = tempfile::tempdir().unwrap();
    let out = isolated(home.path()).arg("--list").output().unwrap();

    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("No scores yet"));
    assert!(home
        .path()
        .join(".local/state/catch-targets/catch-targets.log")
        .exists());
}

#[cfg(target_os = "linux")]
#[test]
fn list_reads_config_from_the_given_home() {
    let home = tempfile::tempdir().unwrap();
    let scores = home.path().join("elsewhere.json");
    fs::write(
        &scores,
        r#"[{"name":"ada","score":12,"date":"2024-01-01T00:00:00.000Z"}]"#,
    )
    .unwrap();
    let config_dir = home.path().join(".config/catch-targets");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.json"),
        serde_json::json!({ "scores_path": scores }).to_string(),
    )
    .unwrap();

    let out = isolated(home.path()).arg("--list").output().unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("ada"), "unexpected output: {stdout}");
    assert!(stdout.contains("12"));
}
