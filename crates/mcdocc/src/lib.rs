//! Library surface behind the `mcdocc` binary: turns a directory on disk
//! into a loaded [`mcdoc_types::Engine`], plus the reporting and rendering
//! helpers the commands share.

pub mod discover;
pub mod render;
pub mod report;
pub mod tracing_setup;

use std::io;
use std::path::Path;

use discover::SourceFile;
use mcdoc_loader::{FileInput, LoadedProject};

/// Discover every `.mcdoc` file under `root` and load it into a project.
pub fn load_dir(root: &Path) -> io::Result<LoadedProject> {
    let files = discover::discover(root)?;
    Ok(load_files(&files))
}

/// Build the `mcdoc_loader::FileInput` slice a `Vec<SourceFile>` borrows
/// into, then load it. Split out of [`load_dir`] so tests can feed
/// in-memory files without touching the filesystem.
#[must_use]
pub fn load_files(files: &[SourceFile]) -> LoadedProject {
    let folders: Vec<Vec<&str>> = files.iter().map(|f| f.folder.iter().map(String::as_str).collect()).collect();
    let inputs: Vec<FileInput<'_>> = files
        .iter()
        .zip(&folders)
        .map(|(f, folder)| FileInput {
            logical_folder: folder,
            file_stem: &f.stem,
            display_path: &f.display_path,
            source: &f.source,
        })
        .collect();
    mcdoc_loader::load_project(&inputs)
}
