//! Output side of a conversion: files written into the vault folder

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Destination folder for converted files
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    dry_run: bool,
}

impl Vault {
    pub fn new(root: PathBuf) -> Self {
        Self { root, dry_run: false }
    }

    /// Compute target paths without touching the filesystem
    pub fn dry_run(root: PathBuf) -> Self {
        Self { root, dry_run: true }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn target_path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file at `relative` using atomic write (write to .tmp then rename),
    /// creating missing parent folders. Returns the full target path.
    pub fn write(&self, relative: &Path, content: &[u8]) -> Result<PathBuf> {
        let path = self.target_path(relative);
        if self.dry_run {
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = tmp_path_for(&path);
        let written = fs::write(&tmp_path, content).and_then(|_| fs::rename(&tmp_path, &path));
        if let Err(e) = written {
            // Never leave a partial .tmp behind
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        log::info!("Wrote {:?}", path);
        Ok(path)
    }
}

/// "Page.md" -> "Page.md.tmp"
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let vault = Vault::new(temp_dir.path().to_path_buf());

        let path = vault
            .write(Path::new("Projects/Work/Page.md"), b"# Page\n")
            .unwrap();

        assert_eq!(path, temp_dir.path().join("Projects/Work/Page.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Page\n");
        assert!(!temp_dir.path().join("Projects/Work/Page.md.tmp").exists());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let vault = Vault::new(temp_dir.path().to_path_buf());

        vault.write(Path::new("Page.md"), b"old").unwrap();
        let path = vault.write(Path::new("Page.md"), b"new").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "new");
    }

    #[test]
    fn test_failed_write_removes_tmp_file() {
        let temp_dir = TempDir::new().unwrap();
        let vault = Vault::new(temp_dir.path().to_path_buf());

        // A non-empty folder sits where the file should go
        fs::create_dir_all(temp_dir.path().join("Page.md/inner")).unwrap();

        assert!(vault.write(Path::new("Page.md"), b"content").is_err());
        assert!(!temp_dir.path().join("Page.md.tmp").exists());
        assert!(temp_dir.path().join("Page.md/inner").is_dir());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let vault = Vault::dry_run(temp_dir.path().to_path_buf());

        let path = vault.write(Path::new("Nested/Page.md"), b"content").unwrap();

        assert_eq!(path, temp_dir.path().join("Nested/Page.md"));
        assert!(!path.exists());
        assert!(!temp_dir.path().join("Nested").exists());
    }

    #[test]
    fn test_tmp_path_for() {
        assert_eq!(tmp_path_for(Path::new("a/Page.md")), Path::new("a/Page.md.tmp"));
    }
}
