//! Command-line interface orchestration for cknn.
//!
//! The `graph` command loads a Parquet point matrix, a line-based UTF-8
//! corpus or a file of numeric rows, builds the CkNN graph and prints it as
//! an edge list.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, GraphCommand, GraphSource, ParquetArgs, RowsArgs,
    TextArgs, TextMetric, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
