use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::fs;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

// @module: File and directory utilities

/// Suffix appended to the input stem for the default output name
pub const OUTPUT_SUFFIX: &str = "_translated";

/// Leading bytes of every zip archive, and so of every `.xlsx` package
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !Self::dir_exists(path) {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for a translated workbook
    // @params: input_file, output_dir (defaults to the input's directory)
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, output_dir: Option<&Path>) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input_file.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(OUTPUT_SUFFIX);
        if let Some(ext) = input_file.extension() {
            output_filename.push('.');
            output_filename.push_str(&ext.to_string_lossy());
        }

        output_dir.join(output_filename)
    }

    /// Whether the path names a plain `.xlsx` workbook
    pub fn is_supported_workbook<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("xlsx"))
    }

    /// Classify a file by extension, confirming `.xlsx` by its zip signature
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" => {
                let mut header = [0u8; 4];
                let mut file = fs::File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
                let is_zip = file.read_exact(&mut header).is_ok() && header == ZIP_MAGIC;
                Ok(if is_zip { FileType::Workbook } else { FileType::Unknown })
            }
            "xls" | "xlsm" | "xlsb" | "ods" => Ok(FileType::OtherSpreadsheet),
            _ => Ok(FileType::Unknown),
        }
    }

    /// Path of the log file for `date`: `<dir>/<name>_YYYYMMDD.log`
    pub fn daily_log_path<P: AsRef<Path>>(dir: P, name: &str, date: NaiveDate) -> PathBuf {
        dir.as_ref().join(format!("{}_{}.log", name, date.format("%Y%m%d")))
    }
}

/// Append-only log file rolled over by calendar day
///
/// The handle stays open between writes and is only reopened when the date of
/// the record differs from the date of the open file.
#[derive(Debug)]
pub struct DailyLogFile {
    dir: PathBuf,
    name: String,
    current: Option<(NaiveDate, File)>,
}

impl DailyLogFile {
    /// Creates `dir` if needed; no file is opened until the first write
    pub fn new<P: AsRef<Path>>(dir: P, name: impl Into<String>) -> Result<Self> {
        FileManager::ensure_dir(&dir)?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            name: name.into(),
            current: None,
        })
    }

    /// Path of the file currently open, if any
    pub fn current_path(&self) -> Option<PathBuf> {
        self.current
            .as_ref()
            .map(|(date, _)| FileManager::daily_log_path(&self.dir, &self.name, *date))
    }

    /// Append a timestamped line using the local clock
    pub fn append(&mut self, content: &str) -> Result<()> {
        self.append_at(Local::now().naive_local(), content)
    }

    /// Append a line stamped with `now`, switching files when the day changes
    pub fn append_at(&mut self, now: NaiveDateTime, content: &str) -> Result<()> {
        let date = now.date();
        if self.current.as_ref().map(|(open_date, _)| *open_date) != Some(date) {
            let path = FileManager::daily_log_path(&self.dir, &self.name, date);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;
            self.current = Some((date, file));
        }

        if let Some((_, file)) = self.current.as_mut() {
            writeln!(file, "[{}] {}", now.format("%Y-%m-%d %H:%M:%S"), content)
                .context("Failed to write to log file")?;
        }
        Ok(())
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Office Open XML workbook (.xlsx)
    Workbook,
    /// Spreadsheet format that is recognised but not supported
    OtherSpreadsheet,
    /// Unknown file type
    Unknown,
}
