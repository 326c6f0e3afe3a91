use dirs::data_dir;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

static DATA_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let base = data_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    base.join("ticket-scout")
});

pub fn data_root() -> PathBuf {
    DATA_ROOT.clone()
}

pub fn context_path() -> PathBuf {
    data_root().join("context.json")
}

pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
