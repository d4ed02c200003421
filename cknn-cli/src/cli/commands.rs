//! Command implementations and argument parsing for the cknn CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use cknn_core::{
    CkNearestNeighbors, CknnBuilder, CknnError, CknnGraph, Connectivity, DataSource, EdgeWeight,
    Metric, NeighborSelection,
};
use cknn_providers_dense::{DenseError, DensePoints};
use cknn_providers_text::{TextProvider, TextProviderError};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_N_NEIGHBORS: usize = 5;
const DEFAULT_DELTA: f64 = 1.0;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "cknn", about = "Build continuous k-nearest-neighbour graphs.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a CkNN graph and print its edge list.
    Graph(GraphCommand),
}

/// Options accepted by the `graph` command.
#[derive(Debug, Args, Clone)]
pub struct GraphCommand {
    /// Rank of the neighbour whose distance sets each point's local scale.
    #[arg(long = "n-neighbors", default_value_t = DEFAULT_N_NEIGHBORS)]
    pub n_neighbors: usize,

    /// Neighbour selection mode: `delta` (radius) or `k` (count).
    #[arg(long, default_value = "delta")]
    pub neighbors: String,

    /// Radius on the density-normalised distance, used in `delta` mode.
    #[arg(long, default_value_t = DEFAULT_DELTA)]
    pub delta: f64,

    /// Neighbour count, required in `k` mode.
    #[arg(long)]
    pub k: Option<usize>,

    /// Metric applied to numeric rows: `euclidean`, `cosine` or `precomputed`.
    #[arg(long, default_value = "euclidean")]
    pub metric: Metric,

    /// Heat-kernel bandwidth, or `inf` for binary weights.
    #[arg(long = "t", default_value = "inf")]
    pub edge_weight: EdgeWeight,

    /// Give every node a self-loop of weight one.
    #[arg(long = "include-self")]
    pub include_self: bool,

    /// Emit the dense adjacency instead of the sparse one.
    #[arg(long)]
    pub dense: bool,

    /// Keep count-mode edges one-directional.
    #[arg(long)]
    pub directed: bool,

    /// Connectivity enforcement: `none`, `nature` or `force`.
    #[arg(long = "conn-type", default_value = "none")]
    pub connectivity: Connectivity,

    /// Prune forced connections (`true`/`false`); defaults to the mode's policy.
    #[arg(long)]
    pub prune: Option<bool>,

    /// Data source configuration.
    #[command(subcommand)]
    pub source: GraphSource,
}

/// Input data sources accepted by the `graph` command.
#[derive(Debug, Subcommand, Clone)]
pub enum GraphSource {
    /// Read points from a Parquet `FixedSizeList<Float32 | Float64, D>` column.
    Parquet(ParquetArgs),
    /// Read a UTF-8 text corpus, one item per line.
    Text(TextArgs),
    /// Read numeric rows separated by commas or whitespace.
    Rows(RowsArgs),
}

/// Parquet ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct ParquetArgs {
    /// Path to the Parquet file containing feature vectors.
    pub path: PathBuf,

    /// Column containing the fixed-size float lists.
    #[arg(long)]
    pub column: String,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Text ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct TextArgs {
    /// Path to a UTF-8 text file with one string per line.
    pub path: PathBuf,

    /// Distance metric to use when comparing lines.
    #[arg(long, value_enum, default_value_t = TextMetric::Levenshtein)]
    pub metric: TextMetric,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Numeric row ingestion arguments.
///
/// Rows are points for the `euclidean` and `cosine` metrics and distance
/// matrix rows for `precomputed`.
#[derive(Debug, Args, Clone)]
pub struct RowsArgs {
    /// Path to the file holding one row per line.
    pub path: PathBuf,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Supported text metrics.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TextMetric {
    /// Compute Levenshtein edit distance between lines.
    Levenshtein,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while loading an input source.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A numeric row held a token that is not a number.
    #[error("`{path}` line {line}: `{value}` is not a number")]
    Parse {
        /// Path of the rows file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Offending token.
        value: String,
    },
    /// Dense matrix ingestion failed.
    #[error(transparent)]
    Dense(#[from] DenseError),
    /// Text ingestion failed.
    #[error(transparent)]
    Text(#[from] TextProviderError),
    /// Graph construction failed.
    #[error(transparent)]
    Core(#[from] CknnError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the data source the graph was built from.
    pub data_source: String,
    /// Graph produced by the command.
    pub graph: CknnGraph,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the input or building the graph fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use cknn_cli::cli::{Cli, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0\n1\n5\n6\n")?;
/// let path = file.path().to_str().ok_or("non-UTF-8 path")?;
/// let cli = Cli::try_parse_from(["cknn", "graph", "--n-neighbors", "1", "rows", path])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.graph.adjacency().edge_count(), 4);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Graph(graph) => {
            Span::current().record("command", field::display("graph"));
            graph_command(graph)
        }
    }
}

pub(super) fn builder_from(command: &GraphCommand) -> Result<CknnBuilder, CliError> {
    let neighbors =
        NeighborSelection::from_parts(&command.neighbors, Some(command.delta), command.k)?;
    let builder = CknnBuilder::new()
        .with_n_neighbors(command.n_neighbors)
        .with_neighbors(neighbors)
        .with_metric(command.metric)
        .with_edge_weight(command.edge_weight)
        .with_include_self(command.include_self)
        .with_sparse_output(!command.dense)
        .with_directed(command.directed)
        .with_connectivity(command.connectivity);
    Ok(match command.prune {
        Some(prune) => builder.with_prune(prune),
        None => builder,
    })
}

#[instrument(
    name = "cli.graph",
    err,
    skip(command),
    fields(
        n_neighbors = command.n_neighbors,
        neighbors = field::Empty,
        connectivity = %command.connectivity,
        source = field::Empty,
    ),
)]
pub(super) fn graph_command(command: GraphCommand) -> Result<ExecutionSummary, CliError> {
    let cknn = builder_from(&command)?.build()?;
    let span = Span::current();
    span.record("neighbors", field::display(cknn.neighbors()));

    let summary = match command.source {
        GraphSource::Parquet(args) => {
            span.record("source", field::display("parquet"));
            run_parquet(&cknn, args)?
        }
        GraphSource::Text(args) => {
            span.record("source", field::display("text"));
            run_text(&cknn, args)?
        }
        GraphSource::Rows(args) => {
            span.record("source", field::display("rows"));
            run_rows(&cknn, args)?
        }
    };

    let adjacency = summary.graph.adjacency();
    info!(
        data_source = summary.data_source.as_str(),
        nodes = adjacency.size(),
        edges = adjacency.edge_count(),
        components = adjacency.component_count(),
        "command completed"
    );
    Ok(summary)
}

#[instrument(
    name = "cli.run_parquet",
    err,
    skip(cknn, args),
    fields(path = field::Empty, column = field::Empty, override_name = field::Empty),
)]
pub(super) fn run_parquet(
    cknn: &CkNearestNeighbors,
    args: ParquetArgs,
) -> Result<ExecutionSummary, CliError> {
    let ParquetArgs { path, column, name } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("column", field::display(&column));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let points = DensePoints::from_parquet_path(chosen_name, &path, &column)?;
    let graph = cknn.fit(points.rows())?;
    Ok(ExecutionSummary {
        data_source: points.name().to_owned(),
        graph,
    })
}

#[instrument(
    name = "cli.run_text",
    err,
    skip(cknn, args),
    fields(path = field::Empty, metric = field::Empty, override_name = field::Empty),
)]
pub(super) fn run_text(
    cknn: &CkNearestNeighbors,
    args: TextArgs,
) -> Result<ExecutionSummary, CliError> {
    let TextArgs { path, metric, name } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    let metric_label = match metric {
        TextMetric::Levenshtein => "levenshtein",
    };
    span.record("metric", field::display(metric_label));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let reader = open_reader(&path)?;
    let provider = match metric {
        TextMetric::Levenshtein => TextProvider::try_from_reader(chosen_name, reader)?,
    };
    let graph = cknn.fit_source(&provider)?;
    Ok(ExecutionSummary {
        data_source: provider.name().to_owned(),
        graph,
    })
}

#[instrument(
    name = "cli.run_rows",
    err,
    skip(cknn, args),
    fields(path = field::Empty, metric = %cknn.metric()),
)]
pub(super) fn run_rows(
    cknn: &CkNearestNeighbors,
    args: RowsArgs,
) -> Result<ExecutionSummary, CliError> {
    let RowsArgs { path, name } = args;
    Span::current().record("path", field::display(path.display()));
    let rows = read_rows(&path, open_reader(&path)?)?;
    let graph = cknn.fit(&rows)?;
    Ok(ExecutionSummary {
        data_source: derive_data_source_name(&path, name.as_deref()),
        graph,
    })
}

pub(super) fn read_rows(path: &Path, reader: impl BufRead) -> Result<Vec<Vec<f64>>, CliError> {
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tokens: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.is_empty() {
            continue;
        }
        let row = tokens
            .into_iter()
            .map(|token| {
                token.parse::<f64>().map_err(|_| CliError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    value: token.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(rows)
}

#[instrument(name = "cli.open_reader", err, fields(path = field::Empty))]
pub(super) fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "data_source".to_owned())
}

/// Renders `summary` to `writer` as a header followed by a tab-separated
/// edge list.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use cknn_cli::cli::{ExecutionSummary, render_summary};
/// # use cknn_core::{CknnBuilder, build_cknn_graph};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let points = vec![vec![0.0], vec![1.0], vec![5.0], vec![6.0]];
/// let summary = ExecutionSummary {
///     data_source: "demo".into(),
///     graph: build_cknn_graph(&points, 1, CknnBuilder::new())?,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.starts_with("data source: demo\nnodes: 4\nedges: 4\ncomponents: 2\n"));
/// assert!(text.ends_with("3\t2\t1\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let adjacency = summary.graph.adjacency();
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "nodes: {}", adjacency.size())?;
    writeln!(writer, "edges: {}", adjacency.edge_count())?;
    writeln!(writer, "components: {}", adjacency.component_count())?;
    writeln!(writer, "selection: {}", summary.graph.selection())?;
    if let Some(report) = summary.graph.connectivity() {
        let threshold = report
            .threshold()
            .map_or_else(|| "-".to_owned(), |delta| delta.to_string());
        writeln!(
            writer,
            "connectivity: rounds={} threshold={threshold} critical={} pruned={}",
            report.rounds(),
            report.critical_edges(),
            report.pruned_edges(),
        )?;
    }
    for (from, to, weight) in adjacency.to_sparse().edges() {
        writeln!(writer, "{from}\t{to}\t{weight}")?;
    }
    Ok(())
}
