#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory for settings files and sources, removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    /// Writes a settings file pointing at `source` with the given
    /// `(name, type)` headers.
    pub fn write_settings(&self, name: &str, source: &str, headers: &[(&str, &str)]) -> PathBuf {
        let mut yaml = format!("source: {source}\noutput: out.shp\nheaders:\n");
        for (header, tag) in headers {
            yaml.push_str(&format!("  - {{ name: \"{header}\", type: {tag} }}\n"));
        }
        self.write(name, &yaml)
    }
}

pub const TV_STATIONS_CSV: &str = "\
Call Sign,Primary Network Affiliation,Market Rank,Licensed State,Latitude (degrees),Longitude (degrees)
WKOW,ABC,85,WI,43.0553,-89.5353
WMTV,NBC,85,WI,43.0497,-89.4860
KARE,NBC,15,MN,45.0589,-93.1233
";

pub const TV_HEADERS: &[(&str, &str)] = &[
    ("Primary Network Affiliation", "TEXT"),
    ("Market Rank", "TEXT"),
    ("Licensed State", "TEXT"),
    ("Latitude (degrees)", "X"),
    ("Longitude (degrees)", "Y"),
];
