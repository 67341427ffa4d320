//! Test fixtures for build pipeline tests.

use std::fs;
use std::path::{Path, PathBuf};

/// A project laid out on disk for a build test.
#[derive(Debug, Clone, Default)]
pub struct ProjectFixture {
    /// Embedded assets (file name -> bytes).
    pub assets: Vec<(String, Vec<u8>)>,
    /// Other files (path relative to project root -> content).
    pub files: Vec<(PathBuf, String)>,
}

impl ProjectFixture {
    pub fn new() -> Self {
        ProjectFixture::default()
    }

    /// A project with one C source and the given assets under `src/embed`.
    pub fn with_assets(assets: &[(&str, &[u8])]) -> Self {
        let mut fixture = ProjectFixture::new();
        fixture.files.push((
            PathBuf::from("src/main.c"),
            "int main(void) { return 0; }\n".to_string(),
        ));
        for (name, bytes) in assets {
            fixture.assets.push((name.to_string(), bytes.to_vec()));
        }
        fixture
    }

    /// Write the fixture under `root`.
    pub fn write_to(&self, root: &Path) {
        let embed = root.join("src/embed");
        fs::create_dir_all(&embed).unwrap();
        for (name, bytes) in &self.assets {
            fs::write(embed.join(name), bytes).unwrap();
        }

        for (path, content) in &self.files {
            let full = root.join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
    }
}
