use crate::utils::error::Result;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const INPUT_FILE: &str = "statement.pdf";
const OUTPUT_FILE: &str = "output.json";

/// Per-request transient files for one casparser run.
///
/// Every request gets its own randomly named directory, so concurrent runs
/// never share an input or output path. Dropping the value removes the output
/// artifact, the input document and the directory; failures are only logged.
#[derive(Debug)]
pub struct Scratch {
    dir: Option<TempDir>,
    input_path: PathBuf,
    output_path: PathBuf,
}

impl Scratch {
    /// 建立專屬目錄並寫入上傳的 PDF
    pub async fn create(work_dir: &Path, document: &[u8]) -> Result<Self> {
        tokio::fs::create_dir_all(work_dir).await?;

        let dir = tempfile::Builder::new().prefix("ecas-").tempdir_in(work_dir)?;
        let input_path = dir.path().join(INPUT_FILE);
        let output_path = dir.path().join(OUTPUT_FILE);

        let scratch = Self {
            dir: Some(dir),
            input_path,
            output_path,
        };

        tokio::fs::write(&scratch.input_path, document).await?;
        tracing::debug!(
            "Wrote {} bytes to {}",
            document.len(),
            scratch.input_path.display()
        );

        Ok(scratch)
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_ref().map(|d| d.path())
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Runs from `Drop`, so removal is synchronous: two small files and one
    /// directory per request.
    fn cleanup(&mut self) {
        remove_quietly(&self.output_path, "output artifact");
        remove_quietly(&self.input_path, "input document");

        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!("Failed to remove scratch directory {}: {}", path.display(), e);
            }
        }
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn remove_quietly(path: &Path, what: &str) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!("Removed {} {}", what, path.display()),
        // 工具失敗時可能根本沒有產生輸出檔
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to clean up {} {}: {}", what, path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scratch_writes_input_and_cleans_up() {
        let work_dir = TempDir::new().unwrap();
        let scratch = Scratch::create(work_dir.path(), b"%PDF-1.4").await.unwrap();

        let dir = scratch.dir().unwrap().to_path_buf();
        assert!(dir.starts_with(work_dir.path()));
        assert_eq!(std::fs::read(scratch.input_path()).unwrap(), b"%PDF-1.4");
        assert!(!scratch.output_path().exists());

        std::fs::write(scratch.output_path(), "{}").unwrap();
        drop(scratch);

        assert!(!dir.exists());
        assert_eq!(std::fs::read_dir(work_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_scratch_paths_are_unique() {
        let work_dir = TempDir::new().unwrap();
        let a = Scratch::create(work_dir.path(), b"a").await.unwrap();
        let b = Scratch::create(work_dir.path(), b"b").await.unwrap();

        assert_ne!(a.input_path(), b.input_path());
        assert_ne!(a.output_path(), b.output_path());
        assert_eq!(std::fs::read(a.input_path()).unwrap(), b"a");
    }

    #[tokio::test]
    async fn test_work_dir_is_created() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("nested").join("work");
        let scratch = Scratch::create(&nested, b"x").await.unwrap();
        assert!(scratch.input_path().starts_with(&nested));
    }
}
