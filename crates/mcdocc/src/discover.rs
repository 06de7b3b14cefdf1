//! Turns a directory of `.mcdoc` files on disk into the `(logical_folder,
//! file_stem, source)` tuples `mcdoc_loader::load_project` expects. The
//! engine itself never touches the filesystem (spec §6): this is the one
//! piece of the pipeline that does.

use std::fs;
use std::io;
use std::path::Path;

/// One file read off disk, with its module-path pieces already split out.
pub struct SourceFile {
    pub folder: Vec<String>,
    pub stem: String,
    pub display_path: String,
    pub source: String,
}

/// Walk `root` recursively, collecting every `.mcdoc` file.
///
/// Files are returned sorted by display path so a project's load order
/// (and therefore which declaration wins a collision) is deterministic
/// across runs and platforms.
pub fn discover(root: &Path) -> io::Result<Vec<SourceFile>> {
    let mut out = Vec::new();
    walk(root, root, &mut out)?;
    out.sort_by(|a, b| a.display_path.cmp(&b.display_path));
    Ok(out)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<SourceFile>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk(root, &path, out)?;
            continue;
        }
        if !path.extension().is_some_and(|ext| ext == "mcdoc") {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let mut components: Vec<String> =
            relative.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
        let Some(file_name) = components.pop() else { continue };
        let stem = file_name.strip_suffix(".mcdoc").unwrap_or(&file_name).to_string();
        let display_path = relative.to_string_lossy().replace('\\', "/");
        let source = fs::read_to_string(&path)?;
        out.push(SourceFile { folder: components, stem, display_path, source });
    }
    Ok(())
}
