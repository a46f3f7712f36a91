//! Shared helper for deriving the four on-disk filenames from one basename.

use std::path::{Path, PathBuf};

pub(crate) fn append_suffix(basename: &Path, suffix: &str) -> PathBuf {
    let mut os = basename.as_os_str().to_owned();
    os.push(".");
    os.push(suffix);
    PathBuf::from(os)
}
