pub mod query_plan;
pub mod records;
pub mod render;
pub mod resources;

use query_expr::QueryError;

/// Error type for failures while loading and querying result records
#[derive(Debug)]
pub enum CliError {
    InputRead {
        input: String,
        source: std::io::Error,
    },
    InvalidRecords {
        input: String,
        reason: String,
    },
    MissingSpecFile,
    SpecFileLoad {
        path: String,
        source: anyhow::Error,
    },
    Query(QueryError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::InputRead { input, source } => {
                write!(
                    f,
                    "Failed to read records from {input}: {source}\n\nPossible fixes:\n  - Check that the file exists and is readable\n  - Use --input - to read records from stdin"
                )
            }
            CliError::InvalidRecords { input, reason } => {
                write!(
                    f,
                    "Invalid records in {input}: {reason}\n\nRecords must be provided as a JSON array of objects, e.g.: [{{\"id\": 1, \"size\": \"4 KB\"}}]"
                )
            }
            CliError::MissingSpecFile => {
                write!(
                    f,
                    "Showing custom records requires a field spec.\n\nUse --spec-file <path> to provide one, e.g.: {{\"fields\": {{\"id\": \"int\", \"name\": \"str\"}}}}"
                )
            }
            CliError::SpecFileLoad { path, source } => {
                write!(
                    f,
                    "Failed to load field spec from {path}: {source:#}\n\nSupported field types are: bool, int, float, str"
                )
            }
            CliError::Query(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::InputRead { source, .. } => Some(source),
            CliError::InvalidRecords { .. } => None,
            CliError::MissingSpecFile => None,
            CliError::SpecFileLoad { source, .. } => Some(source.as_ref()),
            CliError::Query(e) => Some(e),
        }
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        CliError::Query(e)
    }
}
