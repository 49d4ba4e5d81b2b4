//! Integration tests for the JSON-lines boundary and process lifecycle.

use anyhow::Result;
use serde_json::json;
use std::process::Stdio;

mod common;
use common::{CHAT, TestBot};

#[tokio::test]
async fn test_malformed_lines_are_skipped() -> Result<()> {
    let mut bot = TestBot::spawn("").await?;

    bot.send_raw("this is not json").await?;
    bot.send_raw(r#"{"type":"sticker","chat_id":1}"#).await?;
    bot.send_raw("").await?;
    bot.send(json!({"type": "message", "chat_id": CHAT, "from_id": 1, "text": "!help"}))
        .await?;

    let help = bot.recv_text().await?;
    assert!(help.starts_with("Available commands (Member (2))"), "{help}");

    Ok(())
}

#[tokio::test]
async fn test_exits_cleanly_on_eof() -> Result<()> {
    let bot = TestBot::spawn("").await?;
    let status = bot.finish().await?;
    assert!(status.success());
    Ok(())
}

#[tokio::test]
async fn test_invalid_config_refuses_to_start() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, "[bot]\ncommand_prefix = \"!\"\ndev_prefix = \"!\"\n")?;

    let status = tokio::process::Command::new(env!("CARGO_BIN_EXE_orbit-manager"))
        .arg(&config_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;
    assert!(!status.success());

    let status = tokio::process::Command::new(env!("CARGO_BIN_EXE_orbit-manager"))
        .arg(dir.path().join("missing.toml"))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;
    assert!(!status.success());

    Ok(())
}
