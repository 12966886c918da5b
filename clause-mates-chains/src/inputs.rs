//! Expansion of input paths into annotation files.

use std::fs;
use std::path::{Path, PathBuf};

use clause_mates::{ClauseMateError, ClauseMateResult};

const EXTENSIONS: &[&str] = &["tsv", "tsv3"];

/// Expand files and directories into a list of annotation files.
///
/// Files are kept as given. Directories are walked recursively for `.tsv`
/// files, which are added in sorted order so chapter numbering is stable.
pub fn collect_inputs(paths: &[PathBuf]) -> ClauseMateResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            walk(path, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> ClauseMateResult<()> {
    for entry in fs::read_dir(dir).map_err(|e| ClauseMateError::io(dir, e))? {
        let path = entry.map_err(|e| ClauseMateError::io(dir, e))?.path();
        if path.is_dir() {
            walk(&path, found)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| EXTENSIONS.contains(&e))
        {
            found.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_expand_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("book");
        fs::create_dir(&nested).unwrap();
        for name in &["02.tsv", "01.tsv", "notes.txt"] {
            fs::write(nested.join(name), "").unwrap();
        }
        let single = dir.path().join("extra.tsv");
        fs::write(&single, "").unwrap();

        let files = collect_inputs(&[single.clone(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(
            files,
            vec![
                single.clone(),
                nested.join("01.tsv"),
                nested.join("02.tsv"),
                single,
            ]
        );
    }
}
