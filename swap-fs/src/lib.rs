use anyhow::{Context, Result};
use directories_next::ProjectDirs;
use std::path::{Path, PathBuf};

/// This is where the daemon keeps per-swap state (contract addresses etc.)
// Linux: /home/<user>/.local/share/xmr-eth-swap/
// OSX: /Users/<user>/Library/Application Support/xmr-eth-swap/
pub fn system_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "xmr-eth-swap")
        .map(|proj_dirs| proj_dirs.data_dir().to_path_buf())
        .context("Could not generate default system data dir")
}

pub fn ensure_directory_exists(file: &Path) -> Result<(), std::io::Error> {
    if let Some(path) = file.parent() {
        if !path.exists() {
            tracing::info!(
                "Parent directory does not exist, creating recursively: {}",
                file.display()
            );
            return std::fs::create_dir_all(path);
        }
    }
    Ok(())
}

/// Writes `contents` to `file` atomically: the data goes to a temporary
/// sibling first and is moved into place with a rename, so readers never
/// observe a partially written file.
pub fn write_atomic(file: &Path, contents: &str) -> Result<()> {
    ensure_directory_exists(file)?;

    let tmp = file.with_extension("tmp");
    std::fs::write(&tmp, contents)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, file)
        .with_context(|| format!("Failed to move {} into place", tmp.display()))?;

    Ok(())
}
