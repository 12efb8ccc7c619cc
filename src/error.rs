use thiserror::Error;

/// Everything that can go wrong while building or evolving a planet.
///
/// Recoverable conditions (composition imbalance, missing property grids)
/// never reach this enum; they are resolved in place by normalization or by
/// documented defaults.
#[derive(Debug, Error)]
pub enum EvolveError {
    #[error("composition is empty or sums to zero; cannot normalize")]
    EmptyComposition,

    #[error("radial profile needs at least 2 shells, got {0}")]
    TooFewShells(usize),

    #[error("shell radii must be strictly monotonic; shell {index} has radius {radius_m} m")]
    NonMonotonicRadius { index: usize, radius_m: f64 },

    #[error("profile line {line}: expected {expected} fields, found {found}")]
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("profile line {line}, column '{column}': cannot parse '{value}' as a number")]
    NonNumericField {
        line: usize,
        column: String,
        value: String,
    },

    #[error("profile has no '{0}' column")]
    MissingColumn(String),

    #[error("unknown phase symbol '{0}'")]
    UnknownPhase(String),

    #[error("temperature {tp_k} K is outside the tabulated range {min_k}..={max_k} K")]
    TemperatureOutOfRange { tp_k: f64, min_k: f64, max_k: f64 },

    #[error("invalid run parameter: {0}")]
    InvalidParameter(String),

    #[error(
        "summary line {line}: expected 'PlanetID,Parameter,Value', found '{text}'"
    )]
    MalformedSummaryLine { line: usize, text: String },

    #[error("exceeded {max_steps} steps before reaching tmax; runaway integration aborted")]
    StepLimitExceeded { max_steps: usize },

    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EvolveError>;
