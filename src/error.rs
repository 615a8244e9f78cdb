use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Error types that can occur during model operations
///
/// # Variants
///
/// - `NotFitted` - Indicates that the model has not been fitted yet
/// - `InputValidationError` - indicates the input data provided does not meet the expected format, type, or validation rules
/// - `SchemaMismatch` - indicates the columns of a table do not match the columns the model was fitted on
/// - `DegenerateVariance` - indicates a numerical feature has zero (or undefined) spread within a class
/// - `NumericOverflow` - indicates a computation produced NaN or infinite values
/// - `ProcessingError` - indicates that there is something wrong while processing
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    NotFitted,
    InputValidationError(String),
    SchemaMismatch(String),
    DegenerateVariance { feature: String, class: i32 },
    NumericOverflow(String),
    ProcessingError(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::NotFitted => {
                write!(
                    f,
                    "Model has not been fitted. Certain methods require the model to be fitted before use."
                )
            }
            ModelError::InputValidationError(msg) => write!(f, "Input validation error: {}", msg),
            ModelError::SchemaMismatch(msg) => write!(f, "Schema mismatch: {}", msg),
            ModelError::DegenerateVariance { feature, class } => write!(
                f,
                "Degenerate variance: feature '{}' has zero or undefined standard deviation in class {}",
                feature, class
            ),
            ModelError::NumericOverflow(msg) => write!(f, "Numeric overflow: {}", msg),
            ModelError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

/// Implements the standard error trait for ModelError
impl std::error::Error for ModelError {}

/// Input/Output error types that can occur while reading datasets and persisting results
///
/// # Variants
///
/// - `StdIoError` - Wraps standard I/O errors from file system operations (reading, writing, file access)
/// - `JsonError` - Wraps JSON serialization/deserialization errors when working with JSON data formats
/// - `CsvError` - Wraps errors raised by the CSV reader
/// - `ModelError` - A record was read but its content failed validation
#[derive(Debug)]
pub enum IoError {
    StdIoError(std::io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    ModelError(ModelError),
}

impl IoError {
    pub fn load_in_buf_reader<P: AsRef<Path>>(path: P) -> Result<BufReader<File>, IoError> {
        let file = File::open(path).map_err(IoError::StdIoError)?;
        Ok(BufReader::new(file))
    }

    pub fn create_buf_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>, IoError> {
        let file = File::create(path).map_err(IoError::StdIoError)?;
        Ok(BufWriter::new(file))
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::StdIoError(e) => write!(f, "IO error: {}", e),
            IoError::JsonError(e) => write!(f, "JSON error: {}", e),
            IoError::CsvError(e) => write!(f, "CSV error: {}", e),
            IoError::ModelError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIoError(e) => Some(e),
            IoError::JsonError(e) => Some(e),
            IoError::CsvError(e) => Some(e),
            IoError::ModelError(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::StdIoError(e)
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::JsonError(e)
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::CsvError(e)
    }
}

impl From<ModelError> for IoError {
    fn from(e: ModelError) -> Self {
        IoError::ModelError(e)
    }
}
