use polars::prelude::PolarsError;
use rust_xlsxwriter::XlsxError;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ScheduleError {
    /// Required enrollment columns are missing or malformed.
    InvalidInputFormat(String),
    /// The schedule cannot be laid out (empty schedule, zero periods, ...).
    Render(String),
    /// Anything that went wrong while loading the enrollment file.
    BadSourceFile {
        path: PathBuf,
        source: Box<ScheduleError>,
    },
    InvalidConfig(String),
    DataFrame(PolarsError),
    Io(io::Error),
    Csv(csv::Error),
    Serialization(SerdeJsonError),
    Toml(toml::de::Error),
    Xlsx(XlsxError),
}

impl ScheduleError {
    pub fn bad_source_file(path: impl Into<PathBuf>, source: ScheduleError) -> Self {
        Self::BadSourceFile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::InvalidInputFormat(msg) => write!(f, "invalid input format: {msg}"),
            ScheduleError::Render(msg) => write!(f, "render error: {msg}"),
            ScheduleError::BadSourceFile { path, source } => write!(
                f,
                "{} is not a valid enrollment file ({source}). Please select a CSV file with SID, CourseSection and Time Slot columns",
                path.display()
            ),
            ScheduleError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            ScheduleError::DataFrame(err) => write!(f, "dataframe error: {err}"),
            ScheduleError::Io(err) => write!(f, "io error: {err}"),
            ScheduleError::Csv(err) => write!(f, "csv error: {err}"),
            ScheduleError::Serialization(err) => write!(f, "serialization error: {err}"),
            ScheduleError::Toml(err) => write!(f, "config parse error: {err}"),
            ScheduleError::Xlsx(err) => write!(f, "spreadsheet error: {err}"),
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleError::BadSourceFile { source, .. } => Some(source.as_ref()),
            ScheduleError::DataFrame(err) => Some(err),
            ScheduleError::Io(err) => Some(err),
            ScheduleError::Csv(err) => Some(err),
            ScheduleError::Serialization(err) => Some(err),
            ScheduleError::Toml(err) => Some(err),
            ScheduleError::Xlsx(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PolarsError> for ScheduleError {
    fn from(value: PolarsError) -> Self {
        Self::DataFrame(value)
    }
}

impl From<io::Error> for ScheduleError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ScheduleError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<SerdeJsonError> for ScheduleError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<toml::de::Error> for ScheduleError {
    fn from(value: toml::de::Error) -> Self {
        Self::Toml(value)
    }
}

impl From<XlsxError> for ScheduleError {
    fn from(value: XlsxError) -> Self {
        Self::Xlsx(value)
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
