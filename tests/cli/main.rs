use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use serde_json::Value;
use tempfile::TempDir;

mod add_scans;
mod consolidate;

const BIN_NAME: &str = "annotool";

pub struct CliTest {
    _temp_dir: TempDir,
    work_dir: PathBuf,
}

/// Captured result of one annotool run.
pub struct RunOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    /// Parse stdout as JSONL.
    pub fn records(&self) -> Result<Vec<Value>> {
        self.stdout
            .lines()
            .map(|line| serde_json::from_str(line).context("stdout line should be JSON"))
            .collect()
    }
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let work_dir = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            work_dir,
        })
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.work_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.work_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.work_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn consolidate_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("consolidate");
        cmd
    }

    pub fn add_scans_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("add-scans");
        cmd
    }

    /// Run a command with `input` on stdin.
    pub fn run(&self, mut cmd: Command, input: &str) -> Result<RunOutput> {
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn annotool")?;
        let mut stdin = child.stdin.take().context("stdin should be piped")?;
        // the process may exit before reading its input (e.g. bad arguments)
        let _ = stdin.write_all(input.as_bytes());
        drop(stdin);
        let Output {
            status,
            stdout,
            stderr,
        } = child.wait_with_output()?;
        Ok(RunOutput {
            code: status.code(),
            stdout: String::from_utf8(stdout)?,
            stderr: String::from_utf8(stderr)?,
        })
    }
}

/// Join JSON lines into a JSONL document.
pub fn jsonl(lines: &[&str]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
