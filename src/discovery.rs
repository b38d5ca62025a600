//! Batch discovery and migration of component files.
//!
//! Recursively scans a directory for `.vue` files and migrates each one
//! independently. Nothing is written to disk.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::component::{migrate_component, MigrateOptions, MigrationOutput};
use crate::diagnostics::{CompilerError, ERR_READ_FAILED};

const COMPONENT_EXTENSION: &str = "vue";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMigration {
    pub path: PathBuf,
    pub result: Result<MigrationOutput, CompilerError>,
}

impl FileMigration {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// All component files under `dir`, in path order.
pub fn find_component_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).into_iter().flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == COMPONENT_EXTENSION) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files
}

/// Migrate every component under `dir` in parallel.
///
/// `base` supplies the module and hook names; the component name and file
/// path are taken from each file.
pub fn migrate_directory(dir: &Path, base: &MigrateOptions) -> Vec<FileMigration> {
    let files = find_component_files(dir);
    debug!("migrating {} component files under {}", files.len(), dir.display());

    files
        .into_par_iter()
        .map(|path| {
            let result = migrate_file(&path, base);
            if let Err(e) = &result {
                warn!("failed to migrate {}: {}", path.display(), e);
            }
            FileMigration { path, result }
        })
        .collect()
}

fn migrate_file(path: &Path, base: &MigrateOptions) -> Result<MigrationOutput, CompilerError> {
    let file_options = MigrateOptions::for_file(path);
    let options = MigrateOptions {
        component_name: file_options.component_name,
        file_path: file_options.file_path,
        ..base.clone()
    };

    let source = fs::read_to_string(path).map_err(|e| {
        CompilerError::new(
            ERR_READ_FAILED,
            &format!("Failed to read file: {}", e),
            &options.file_path,
            0,
            0,
        )
    })?;

    migrate_component(&source, &options)
}
