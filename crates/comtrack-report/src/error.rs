use thiserror::Error;

/// Errors raised while producing reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A record did not serialize to a JSON object and has no fields.
    #[error("record {index} is not a key/value record")]
    NotARecord {
        /// Position of the offending record.
        index: usize,
    },

    /// The role may not export CSV.
    #[error("role {role:?} is not permitted to export CSV")]
    ExportDenied {
        /// The rejected role as supplied.
        role: String,
    },

    /// Record serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The CSV writer failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the CSV buffer failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV body was not valid UTF-8.
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
