use anyhow::{Context, Result};
use std::path::Path;

use moncky_rs::{hexrec, EncodedWord};

/// Read program text; a missing file is fatal.
pub fn load_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("no code file at {}", path.display()))
}

/// Write `words` as a `v2.0 raw` record, replacing any previous file.
pub fn write_record(path: &Path, words: &[EncodedWord]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }
    std::fs::write(path, hexrec::render(words))
        .with_context(|| format!("writing {}", path.display()))
}

pub fn load_record(path: &Path) -> Result<Vec<EncodedWord>> {
    let txt = std::fs::read_to_string(path)
        .with_context(|| format!("reading hex record {}", path.display()))?;
    hexrec::parse(&txt).with_context(|| format!("parsing hex record {}", path.display()))
}
