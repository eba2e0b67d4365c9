pub mod ast;
pub mod check;
pub mod tokens;

use std::path::Path;

/// Module name for a document: explicit override, else the file stem.
pub fn module_name(path: &Path, explicit: Option<&str>) -> String {
    if let Some(name) = explicit {
        return name.to_string();
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "main".to_string())
}

pub fn read_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: cannot read {}: {error}", path.display());
            std::process::exit(1);
        }
    }
}
