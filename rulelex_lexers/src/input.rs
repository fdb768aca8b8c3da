//! Reading source files for tokenization
//!
//! Size is checked against the compile-time limit before any content is
//! read; content must be UTF-8.

use rulelex_core::config::compile_time::input::{LARGE_INPUT_THRESHOLD, MAX_FILE_SIZE};
use rulelex_core::logging::{codes, Code};
use rulelex_core::{log_debug, log_error, log_warning};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    pub fn error_code(&self) -> Code {
        match self {
            InputError::FileNotFound { .. } => codes::input::FILE_NOT_FOUND,
            InputError::FileTooLarge { .. } => codes::input::FILE_TOO_LARGE,
            InputError::InvalidEncoding { .. } => codes::input::INVALID_ENCODING,
            InputError::Io { .. } => codes::input::IO_ERROR,
        }
    }

    fn from_io(path: &Path, source: std::io::Error) -> Self {
        let path = path.display().to_string();
        match source.kind() {
            ErrorKind::NotFound => InputError::FileNotFound { path },
            ErrorKind::InvalidData => InputError::InvalidEncoding { path },
            _ => InputError::Io { path, source },
        }
    }
}

/// Read a whole file as UTF-8, refusing anything above `MAX_FILE_SIZE`
pub fn read_source(path: &Path) -> Result<String, InputError> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            let error = InputError::from_io(path, e);
            log_error!(error.error_code(), "Cannot stat input", "path" => path.display());
            return Err(error);
        }
    };

    if size > MAX_FILE_SIZE {
        let error = InputError::FileTooLarge {
            size,
            max_size: MAX_FILE_SIZE,
        };
        log_error!(error.error_code(), "Input exceeds maximum size",
            "path" => path.display(),
            "size" => size,
            "max_size" => MAX_FILE_SIZE
        );
        return Err(error);
    }
    if size > LARGE_INPUT_THRESHOLD {
        log_warning!("Large input", "path" => path.display(), "size" => size);
    }

    let source = fs::read_to_string(path).map_err(|e| {
        let error = InputError::from_io(path, e);
        log_error!(error.error_code(), "Cannot read input", "path" => path.display());
        error
    })?;

    log_debug!("Input read", "path" => path.display(), "bytes" => source.len());
    Ok(source)
}
