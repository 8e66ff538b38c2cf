use std::{fs::File, io::Write, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

/// Write-then-rename wrapper so a failed export never leaves a truncated file behind.
struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    fn open(target: &Path, force: bool) -> Result<Self> {
        let parent = target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent)
            .with_context(|| format!("[common::fs] create dir {}", parent.display()))?;
        if !force && target.exists() {
            bail!("[common::fs] Refusing to overwrite existing file: {} (use --force)", target.display());
        }
        let tmp = NamedTempFile::new_in(parent).context("[common::fs] create temp file")?;
        Ok(Self { target: target.to_path_buf(), tmp })
    }

    fn finalize(self) -> Result<PathBuf> {
        self.tmp.as_file().sync_all().ok(); // best-effort fsync
        self.tmp.persist(&self.target)
            .with_context(|| format!("[common::fs] rename to {}", self.target.display()))?;
        if let Some(dir) = self.target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(self.target)
    }
}

/// Atomically write `bytes` to `target`. Errors if the file exists and `force` is false.
pub(crate) fn write_atomic(target: &Path, bytes: &[u8], force: bool) -> Result<PathBuf> {
    let mut sink = PendingWrite::open(target, force)?;
    sink.tmp.write_all(bytes)
        .with_context(|| format!("[common::fs] write {}", target.display()))?;
    sink.finalize()
}
