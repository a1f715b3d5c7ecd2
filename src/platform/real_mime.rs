//! MIME-type probing via the `file(1)` external collaborator (§6).

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

use super::MimeProber;

pub struct RealMimeProber;

impl MimeProber for RealMimeProber {
    fn probe(&self, path: &Path) -> Result<String> {
        let output = Command::new("file")
            .arg("--brief")
            .arg("--mime-type")
            .arg(path)
            .output()
            .with_context(|| format!("failed to run file(1) on {}", path.display()))?;
        let mut mime = String::from_utf8_lossy(&output.stdout).into_owned();
        while mime.ends_with('\n') || mime.ends_with('\r') {
            mime.pop();
        }
        if mime.is_empty() {
            anyhow::bail!("file(1) produced no output for {}", path.display());
        }
        Ok(mime)
    }
}
