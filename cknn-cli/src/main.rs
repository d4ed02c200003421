//! `cknn` binary: builds a CkNN graph and prints it as an edge list.
//!
//! Exit status follows the failure class: 2 for invalid arguments, 3 when
//! pruning cannot keep the graph connected, 4 for data source failures and
//! 1 for anything else (I/O, parsing, logging setup).

use std::{
    io::{self, BufWriter, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use cknn_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging,
};
use cknn_core::{CknnError, ErrorKind};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let summary = run_cli(Cli::parse()).context("failed to build graph")?;
    let mut out = BufWriter::new(io::stdout().lock());
    render_summary(&summary, &mut out).context("failed to write graph")?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

fn core_error(err: &anyhow::Error) -> Option<&CknnError> {
    match err.downcast_ref::<CliError>()? {
        CliError::Core(core) => Some(core),
        _ => None,
    }
}

fn exit_code(core: Option<&CknnError>) -> ExitCode {
    match core.map(CknnError::kind) {
        Some(ErrorKind::InvalidArgument) => ExitCode::from(2),
        Some(ErrorKind::GraphInfeasible) => ExitCode::from(3),
        Some(ErrorKind::DataSource) => ExitCode::from(4),
        None => ExitCode::FAILURE,
    }
}

#[expect(
    clippy::print_stderr,
    reason = "no subscriber exists when logging setup fails"
)]
fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        eprintln!("failed to initialise logging: {err}");
        return ExitCode::FAILURE;
    }

    let Err(err) = try_main() else {
        return ExitCode::SUCCESS;
    };
    let core = core_error(&err);
    error!(
        error = %format!("{err:#}"),
        code = core.map(|core| field::display(core.code().as_str())),
        data_source_code = core
            .and_then(CknnError::data_source_code)
            .map(|code| field::display(code.as_str())),
        "command failed"
    );
    exit_code(core)
}
