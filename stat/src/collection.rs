use crate::stat::{Decoding, Encoding, Variant};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CSV_EXTENSION: &str = "csv";

/// Result files of the four variants benchmarked at one optimization level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantFiles {
    pub bitmask_register: PathBuf,
    pub bitmask_stack: PathBuf,
    pub union_register: PathBuf,
    pub union_stack: PathBuf,
}

impl VariantFiles {
    /// Locates the result file of every variant under `dir`, which must hold
    /// one subdirectory per variant (`br`, `bs`, `ur`, `us`).
    pub fn discover(dir: &Path) -> Result<Self> {
        Ok(Self {
            bitmask_register: find_csv_file(&dir.join(Variant::BITMASK_REGISTER.dir_name()))?,
            bitmask_stack: find_csv_file(&dir.join(Variant::BITMASK_STACK.dir_name()))?,
            union_register: find_csv_file(&dir.join(Variant::UNION_REGISTER.dir_name()))?,
            union_stack: find_csv_file(&dir.join(Variant::UNION_STACK.dir_name()))?,
        })
    }

    pub fn get(&self, variant: Variant) -> &Path {
        match (variant.decoding, variant.encoding) {
            (Decoding::Bitmask, Encoding::Register) => &self.bitmask_register,
            (Decoding::Bitmask, Encoding::Stack) => &self.bitmask_stack,
            (Decoding::Union, Encoding::Register) => &self.union_register,
            (Decoding::Union, Encoding::Stack) => &self.union_stack,
        }
    }
}

/// Returns the only csv file of `dir`. Other files are ignored, but several
/// csv files in the same directory are an error.
pub fn find_csv_file(dir: &Path) -> Result<PathBuf> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("could not read directory {}", dir.display()))?;

    let mut files = vec![];
    for entry in entries {
        let path = entry
            .with_context(|| format!("could not read directory {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == CSV_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();

    match files.len() {
        0 => bail!("no .{} file in {}", CSV_EXTENSION, dir.display()),
        1 => {
            let file = files.remove(0);
            debug!("Found {}", file.display());
            Ok(file)
        }
        n => bail!(
            "expected exactly one .{} file in {}, found {}: {}",
            CSV_EXTENSION,
            dir.display(),
            n,
            files
                .iter()
                .map(|f| f.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn layout(dir: &Path) {
        for variant in Variant::ALL {
            let sub = dir.join(variant.dir_name());
            fs::create_dir(&sub).unwrap();
            fs::write(sub.join(format!("{}.csv", variant.dir_name())), "run,elapsed,dev\n").unwrap();
            fs::write(sub.join("notes.txt"), "not a result").unwrap();
            fs::write(sub.join("run.csv.bak"), "old").unwrap();
        }
    }

    #[test]
    fn test_discover() {
        let dir = TempDir::new().unwrap();
        layout(dir.path());
        let files = VariantFiles::discover(dir.path()).unwrap();
        assert_eq!(files.bitmask_register, dir.path().join("br").join("br.csv"));
        assert_eq!(files.union_stack, dir.path().join("us").join("us.csv"));
        let distinct: HashSet<&Path> = Variant::ALL.iter().map(|v| files.get(*v)).collect();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn test_discover_missing_subdirectory() {
        let dir = TempDir::new().unwrap();
        layout(dir.path());
        fs::remove_dir_all(dir.path().join("ur")).unwrap();
        let err = VariantFiles::discover(dir.path()).unwrap_err();
        assert!(err.to_string().contains("ur"));
    }

    #[test]
    fn test_no_csv_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        assert!(find_csv_file(dir.path()).is_err());
    }

    #[test]
    fn test_several_csv_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.csv"), "").unwrap();
        fs::write(dir.path().join("b.csv"), "").unwrap();
        let err = find_csv_file(dir.path()).unwrap_err();
        assert!(err.to_string().contains("found 2"));
    }
}
