use anyhow::{Result, Context};
use chrono::Local;
use std::fs;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let extension = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(extension) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @generates: Artifact file name for a job, `{job_id}-{yyyyMMdd_HHmmss}.{extension}`
    pub fn artifact_name(job_id: u64, extension: &str) -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("{}-{}.{}", job_id, timestamp, extension)
    }

    /// Write content to a new file in `dir` without ever replacing an existing one.
    ///
    /// The file is named after the job and the current time. When that name is
    /// taken (two writes in the same second) a numeric suffix is added.
    pub fn write_unique<P: AsRef<Path>>(dir: P, job_id: u64, extension: &str, content: &str) -> Result<PathBuf> {
        let dir = dir.as_ref();
        Self::ensure_dir(dir)?;

        let name = Self::artifact_name(job_id, extension);
        let stem = name.trim_end_matches(&format!(".{}", extension)).to_string();

        for attempt in 0..100u32 {
            let path = if attempt == 0 {
                dir.join(&name)
            } else {
                dir.join(format!("{}-{}.{}", stem, attempt, extension))
            };

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())
                        .with_context(|| format!("Failed to write to file: {:?}", path))?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to create file: {:?}", path));
                }
            }
        }

        Err(anyhow::anyhow!("No free artifact name for job {} in {:?}", job_id, dir))
    }
}
