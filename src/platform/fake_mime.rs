//! Fake MIME prober — returns a fixed map, falling back to a default.

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::MimeProber;

pub struct FakeMimeProber {
    map: RefCell<HashMap<PathBuf, String>>,
    default: String,
}

impl FakeMimeProber {
    pub fn new() -> Self {
        Self {
            map: RefCell::new(HashMap::new()),
            default: "application/octet-stream".to_string(),
        }
    }

    pub fn set(&self, path: impl Into<PathBuf>, mime: impl Into<String>) {
        self.map.borrow_mut().insert(path.into(), mime.into());
    }

    pub fn set_default(&mut self, mime: impl Into<String>) {
        self.default = mime.into();
    }
}

impl Default for FakeMimeProber {
    fn default() -> Self {
        Self::new()
    }
}

impl MimeProber for FakeMimeProber {
    fn probe(&self, path: &Path) -> Result<String> {
        Ok(self
            .map
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(|| self.default.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_configured_mime() {
        let prober = FakeMimeProber::new();
        prober.set("/tmp/a.txt", "text/plain");
        assert_eq!(prober.probe(Path::new("/tmp/a.txt")).unwrap(), "text/plain");
    }

    #[test]
    fn falls_back_to_default() {
        let prober = FakeMimeProber::new();
        assert_eq!(
            prober.probe(Path::new("/tmp/unknown")).unwrap(),
            "application/octet-stream"
        );
    }
}
