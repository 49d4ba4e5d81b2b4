//! Test bot process management.

use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;

/// A running bot with its own data directory.
pub struct TestBot {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
    config_path: PathBuf,
    _data_dir: TempDir,
}

impl TestBot {
    /// Spawn the bot with `extra` appended to a minimal config.
    ///
    /// The minimal config sets the database path and makes
    /// [`super::DEV`] a developer.
    pub async fn spawn(extra: &str) -> anyhow::Result<Self> {
        let data_dir = tempfile::tempdir()?;
        let config_path = data_dir.path().join("config.toml");
        std::fs::write(&config_path, config_text(data_dir.path(), extra))?;

        let mut child = Command::new(env!("CARGO_BIN_EXE_orbit-manager"))
            .arg(&config_path)
            .env("RUST_LOG", "warn")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("stdout not captured"))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            config_path,
            _data_dir: data_dir,
        })
    }

    /// Rewrite the config file, keeping the database section.
    #[allow(dead_code)]
    pub fn rewrite_config(&self, extra: &str) -> anyhow::Result<()> {
        let dir = self
            .config_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("config has no parent"))?;
        std::fs::write(&self.config_path, config_text(dir, extra))?;
        Ok(())
    }

    /// Send one raw input line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("stdin already closed"))?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Send one event.
    pub async fn send(&mut self, event: Value) -> anyhow::Result<()> {
        self.send_raw(&event.to_string()).await
    }

    /// Send a chat message.
    #[allow(dead_code)]
    pub async fn say(&mut self, chat_id: i64, from_id: i64, message_id: i64, text: &str) -> anyhow::Result<()> {
        self.send(json!({
            "type": "message",
            "chat_id": chat_id,
            "from_id": from_id,
            "message_id": message_id,
            "text": text,
        }))
        .await
    }

    /// Receive one effect.
    pub async fn recv(&mut self) -> anyhow::Result<Value> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive one effect with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Value> {
        let line = timeout(dur, self.stdout.next_line())
            .await??
            .ok_or_else(|| anyhow::anyhow!("bot closed stdout"))?;
        Ok(serde_json::from_str(&line)?)
    }

    /// Receive one effect and return its text, failing on anything but a
    /// `send_message`.
    #[allow(dead_code)]
    pub async fn recv_text(&mut self) -> anyhow::Result<String> {
        let effect = self.recv().await?;
        if effect["type"] != "send_message" {
            anyhow::bail!("expected send_message, got {}", effect);
        }
        effect["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("send_message without text: {}", effect))
    }

    /// Assert that nothing arrives for a short while.
    #[allow(dead_code)]
    pub async fn expect_silence(&mut self) -> anyhow::Result<()> {
        match self.recv_timeout(Duration::from_millis(300)).await {
            Ok(effect) => anyhow::bail!("unexpected effect: {}", effect),
            Err(_) => Ok(()),
        }
    }

    /// Close stdin and wait for a clean exit.
    #[allow(dead_code)]
    pub async fn finish(mut self) -> anyhow::Result<std::process::ExitStatus> {
        drop(self.stdin.take());
        Ok(timeout(Duration::from_secs(5), self.child.wait()).await??)
    }
}

fn config_text(dir: &Path, extra: &str) -> String {
    format!(
        r#"
[bot]
developers = [{}]

[database]
path = "{}"

{}
"#,
        super::DEV,
        dir.join("orbit.db").display(),
        extra
    )
}
