//! File scanning for audio files

use crate::{LibraryError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as audio media items
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "wav", "aac", "m4a", "opus"];

/// Scanner for audio files in directories
#[derive(Debug, Clone, Default)]
pub struct FileScanner {
    follow_links: bool,
    max_depth: Option<usize>,
}

impl FileScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Set maximum directory depth to traverse
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Scan a directory for audio files
    ///
    /// Files come back in file-name order within each directory, so repeated
    /// scans of an unchanged tree yield the same sequence.
    pub fn scan_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(LibraryError::DirectoryNotFound(path.to_path_buf()));
        }

        if !path.is_dir() {
            return Err(LibraryError::NotADirectory(path.to_path_buf()));
        }

        let mut walker = WalkDir::new(path)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut audio_files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", path.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_file() && is_audio_file(entry.path()) {
                audio_files.push(entry.into_path());
            }
        }

        Ok(audio_files)
    }

    /// Scan multiple directories, skipping the ones that fail
    pub fn scan_directories(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut all_files = Vec::new();

        for path in paths {
            match self.scan_directory(path) {
                Ok(mut files) => all_files.append(&mut files),
                Err(e) => {
                    tracing::warn!("Failed to scan {}: {}", path.display(), e);
                }
            }
        }

        all_files
    }
}

/// Check if a file has a supported audio extension
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
