use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Path of the PNG for `id` under `dir`.
pub fn png_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.png"))
}

/// Recursively walk a directory, collecting all `.png` files as IDs
/// (relative path without the `.png` extension, `/`-separated).
fn collect_png_ids(base: &Path, dir: &Path, ids: &mut BTreeSet<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_png_ids(base, &path, ids);
        } else if path.extension().is_some_and(|e| e == "png")
            && let Ok(rel) = path.strip_prefix(base)
        {
            let id: Vec<String> = rel
                .with_extension("")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            ids.insert(id.join("/"));
        }
    }
}

pub fn list_png_ids(dir: &Path) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    collect_png_ids(dir, dir, &mut ids);
    ids
}

/// Remove stale diff images for the given IDs.
pub fn clean_output_files(out_dir: &Path, ids: &[String]) {
    for id in ids {
        let _ = std::fs::remove_file(png_path(out_dir, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn lists_nested_pngs_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("home.png"));
        touch(&dir.path().join("buttons/primary.png"));
        touch(&dir.path().join("buttons/notes.txt"));
        touch(&dir.path().join("buttons/upper.PNG"));
        let ids: Vec<String> = list_png_ids(dir.path()).into_iter().collect();
        assert_eq!(ids, vec!["buttons/primary", "home"]);
    }

    #[test]
    fn missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_png_ids(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn clean_removes_only_named_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&png_path(dir.path(), "a"));
        touch(&png_path(dir.path(), "b/c"));
        clean_output_files(dir.path(), &["b/c".to_string(), "missing".to_string()]);
        let ids: Vec<String> = list_png_ids(dir.path()).into_iter().collect();
        assert_eq!(ids, vec!["a"]);
    }
}
