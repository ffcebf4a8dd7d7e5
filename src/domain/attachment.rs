use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use regex::Regex;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum MatchType {
    ExactMatch,
    RegexMatch,
}

/// Where attachments come from: one named file, or every file under a folder
/// whose path matches a pattern.
#[derive(Debug, Clone)]
pub struct AttachmentSource {
    pub file_name: String,
    pub folder: String,
    pub match_type: MatchType,
}

impl AttachmentSource {
    /// Local paths to upload, in the order they should be sent.
    pub fn resolve_paths(&self) -> AppResult<Vec<PathBuf>> {
        match self.match_type {
            MatchType::ExactMatch => Ok(vec![combine_folder_and_file(
                &self.folder,
                &self.file_name,
            )]),
            MatchType::RegexMatch => {
                let pattern = Regex::new(&self.file_name).map_err(|err| {
                    AppError::InvalidInput(format!(
                        "'{}' is not a valid pattern: {err}",
                        self.file_name
                    ))
                })?;
                let root = if self.folder.is_empty() {
                    Path::new(".")
                } else {
                    Path::new(&self.folder)
                };
                let mut files = Vec::new();
                collect_files(root, &mut files)?;
                Ok(files
                    .into_iter()
                    .filter(|path| pattern.is_match(&path.to_string_lossy()))
                    .collect())
            }
        }
    }
}

fn combine_folder_and_file(folder: &str, file_name: &str) -> PathBuf {
    if folder.is_empty() {
        PathBuf::from(file_name)
    } else {
        Path::new(folder).join(file_name)
    }
}

/// Symlinked directories are skipped; symlinks to files are kept.
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> AppResult<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.and_then(|entry| Ok((entry.path(), entry.file_type()?))))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by(|(left, _), (right, _)| left.cmp(right));

    for (path, file_type) in entries {
        if file_type.is_dir() {
            collect_files(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}
