//! Aggregation-layer errors shared by the NPV cube, scenario data, and
//! post-processor (§7 `AggregationError`).

use thiserror::Error;

/// Errors raised while building or reading the NPV cube, scenario data, or
/// while running the post-processing pipeline.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// `AggregationScenarioData`'s date/sample dimensions don't match the cube's.
    #[error("scenario data dimensions ({dates}x{samples}) don't match cube ({cube_dates}x{cube_samples})")]
    DimensionMismatch {
        /// Scenario data date-grid length.
        dates: usize,
        /// Scenario data sample count.
        samples: usize,
        /// Cube date-grid length.
        cube_dates: usize,
        /// Cube sample count.
        cube_samples: usize,
    },

    /// A requested netting set is not present in the portfolio.
    #[error("unknown netting set: {0}")]
    UnknownNettingSet(String),

    /// A requested trade is not present in the cube.
    #[error("unknown trade: {0}")]
    UnknownTrade(String),

    /// A requested named series is not present in `AggregationScenarioData`.
    #[error("unknown scenario data key: {0}")]
    UnknownKey(String),

    /// Out-of-range index into the cube or scenario data.
    #[error("index out of bounds: {what} index {index} >= {bound}")]
    IndexOutOfBounds {
        /// Which dimension was out of bounds (trade/date/sample/slot).
        what: &'static str,
        /// The offending index.
        index: usize,
        /// The dimension's size.
        bound: usize,
    },

    /// Allocation requires a non-zero denominator that turned out to be exactly zero.
    #[error("allocation denominator is zero: {0}")]
    ZeroDenominator(String),

    /// A post-processor accessor was called before the pipeline stage that
    /// produces it had run.
    #[error("post-process stage not yet run: {0}")]
    StageNotRun(&'static str),

    /// Cube binary file read/write failure.
    #[error("cube I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed cube file contents (bad magic, truncated buffer, etc.).
    #[error("malformed cube file: {0}")]
    MalformedCubeFile(String),

    /// A trade's payoff script failed while a `Calculator` was evaluating
    /// it (§4.5/§7). The driver catches this per-trade, leaves the cell at
    /// zero, and logs an `ALOG` (§7) rather than aborting the run.
    #[error("script evaluation failed for trade {trade}: {error}")]
    ScriptFailure {
        /// The trade whose script raised the error.
        trade: String,
        /// The underlying script error, with source location if available.
        error: pricer_script::error::Located<pricer_script::error::ScriptError>,
    },

    /// A trade's result variable (e.g. `NPV`) was never assigned by its script.
    #[error("trade {trade} script never assigned result variable '{variable}'")]
    MissingResultVariable {
        /// The trade whose script is missing the assignment.
        trade: String,
        /// The expected result variable name.
        variable: String,
    },
}
