//! C++ source generation from the enriched IR.
//!
//! Each target renders to its own pair of files:
//! - `bean`: `<stem>.h` / `<stem>.cpp`, a plain value class
//! - `qtbean`: `<stem>object.h` / `<stem>object.cpp`, `QObject` wrappers
//! - `factory`: `<stem>jsonfactory.h` / `<stem>jsonfactory.cpp`, a JSON decoder
//!
//! Nested classes are always rendered before their parent; for the bean
//! target the rendered block is indented into the parent's declaration.
//! The output is deterministic: identical IR gives byte-identical files.

mod bean;
mod json_factory;
mod qt_object;

use std::path::Path;

use crate::error::{Error, Result};
use crate::ir::BeanIr;
use crate::naming::to_identifier;
use crate::target::Target;

/// Statistics collected during generation for reporting.
#[derive(Debug, Default)]
pub struct GenerationStats {
    pub files_written: usize,
    pub classes_rendered: usize,
}

/// A rendered file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: String,
    pub contents: String,
}

/// Render the files for `ir` without touching the filesystem.
pub fn render(ir: &BeanIr, stem: &str) -> Result<Vec<RenderedFile>> {
    let files = match ir.target {
        Target::Bean => bean::render(ir, stem)?,
        Target::QtBean => qt_object::render(ir, stem)?,
        Target::Factory => json_factory::render(ir, stem)?,
    };
    Ok(files)
}

/// Render `ir` and write the files to `output_dir`.
pub fn generate(ir: &BeanIr, stem: &str, output_dir: &Path) -> Result<GenerationStats> {
    let files = render(ir, stem)?;
    for file in &files {
        let path = output_dir.join(&file.name);
        write_file(&path, &file.contents)?;
        tracing::info!(path = %path.display(), "wrote {}", file.name);
    }
    Ok(GenerationStats {
        files_written: files.len(),
        classes_rendered: ir.class_count(),
    })
}

/// Indent a rendered block by one level.
///
/// Surrounding whitespace is trimmed and every line gets four leading
/// spaces: `"hello\nworld\n"` → `"    hello\n    world"`.
pub fn indent(text: &str) -> String {
    format!("    {}", text.trim().split('\n').collect::<Vec<_>>().join("\n    "))
}

/// Include guard macro for a generated header: `("person", "OBJECT_H")` →
/// `"PERSON_OBJECT_H"`.
fn include_guard(stem: &str, suffix: &str) -> String {
    format!("{}_{suffix}", to_identifier(stem).to_uppercase())
}

/// Write content to a file, creating parent directories as needed.
fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
