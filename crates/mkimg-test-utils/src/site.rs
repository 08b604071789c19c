//! [`TestSite`] builder for configuration test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding site configs, kickstarts and caches.
///
/// # Example
///
/// ```rust,no_run
/// use mkimg_test_utils::TestSite;
///
/// let site = TestSite::new();
/// let _conf = site.write_siteconf("[create]\narch = x86_64\n");
/// let _ks = site.write_kickstart("handset.ks", "repo --name=a --baseurl=file:///r\n");
/// site.assert_file_exists("mkimg.conf");
/// ```
pub struct TestSite {
    temp_dir: TempDir,
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSite {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the site.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `mkimg.conf` at the site root.
    pub fn write_siteconf(&self, content: &str) -> PathBuf {
        self.write_file("mkimg.conf", content)
    }

    /// Write a kickstart file at the site root.
    pub fn write_kickstart(&self, name: &str, content: &str) -> PathBuf {
        self.write_file(name, content)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {}", path.display(), e));
        path
    }

    /// Create empty package files named `name-version-release.arch.rpm`
    /// under `rel` and return the directory.
    pub fn write_rpm_repo(&self, rel: &str, packages: &[&str]) -> PathBuf {
        let dir = self.path(rel);
        fs::create_dir_all(&dir).unwrap();
        for package in packages {
            fs::write(dir.join(package), b"").unwrap();
        }
        dir
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `rel` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let full_path = self.path(rel);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "Expected {} to contain {:?}, got:\n{}",
            full_path.display(),
            content,
            file_content
        );
    }
}
