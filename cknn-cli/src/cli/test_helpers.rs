//! Small helpers shared across CLI tests.
//!
//! The CLI unit tests build temporary input files and assert error handling
//! behaviour. These helpers keep the test cases concise and consistent.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::{ArrayRef, FixedSizeListArray, Float32Array, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use clap::Parser;
use parquet::arrow::arrow_writer::ArrowWriter;
use tempfile::TempDir;

use super::{Cli, CliError, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

pub(super) fn create_parquet_file(
    dir: &TempDir,
    name: &str,
    rows: &[[f32; 2]],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.path().join(name);
    let item = Arc::new(Field::new("item", DataType::Float32, false));
    let field = Field::new("features", DataType::FixedSizeList(item.clone(), 2), false);
    let values = Float32Array::from_iter_values(rows.iter().flatten().copied());
    let array = FixedSizeListArray::new(item, 2, Arc::new(values) as ArrayRef, None);
    let schema = Arc::new(Schema::new(vec![field]));
    let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(array) as ArrayRef])?;
    let mut writer = ArrowWriter::try_new(File::create(&path)?, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(path)
}

/// Parses `args` after `cknn graph`, with `path` appended last.
pub(super) fn parse_graph(args: &[&str], path: &Path) -> Cli {
    let path = path.to_str().expect("temp paths are UTF-8");
    let argv = ["cknn", "graph"]
        .into_iter()
        .chain(args.iter().copied())
        .chain([path]);
    Cli::try_parse_from(argv).expect("arguments must parse")
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
