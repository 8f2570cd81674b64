use std::fs::File;
use std::io::{self as stdio, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use flexi_logger::{Logger, LoggerHandle};
use is_terminal::IsTerminal;

use lattice_forge::Lattice;
use lattice_forge::io::{LatticeFormat, read_lattice, write_lattice};

pub mod convert;
pub mod info;
pub mod line;
pub mod select;

/// Aggregated IO parameters shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct IoParameters {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub input_format: Option<LatticeFormat>,
    pub output_format: Option<LatticeFormat>,
}

/// Starts the stderr logger. `RUST_LOG` takes precedence over the verbosity count.
pub fn init_logging(verbosity: u8) -> Result<LoggerHandle> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    Logger::try_with_env_or_str(level)
        .with_context(|| format!("Invalid log specification '{level}'"))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .context("Failed to start logger")
}

/// Loads a lattice from the configured input source.
pub fn load_input(params: &IoParameters) -> Result<(Lattice, LatticeFormat)> {
    let format = resolve_input_format(params)?;

    let lattice = if let Some(path) = &params.input {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        read_lattice(BufReader::new(file), format)
            .with_context(|| format!("Failed to parse {} input from {}", format, path.display()))?
    } else {
        let stdin = stdio::stdin();
        if stdin.is_terminal() {
            bail!(
                "No --input provided and stdin is a TTY. Provide -i/--input or pipe a lattice into latticeforge."
            );
        }
        read_lattice(BufReader::new(stdin.lock()), format)
            .with_context(|| format!("Failed to parse {} input from stdin", format))?
    };

    Ok((lattice, format))
}

/// Saves a lattice to the configured output destination.
pub fn save_output(lattice: &Lattice, params: &IoParameters) -> Result<()> {
    let format = resolve_output_format(params)?;

    match &params.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_lattice(&mut writer, lattice, format).with_context(|| {
                format!("Failed to write {} output to {}", format, path.display())
            })?;
            writer.flush().context("Failed to flush output writer")?;
        }
        None => {
            let stdout = stdio::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_lattice(&mut writer, lattice, format)
                .with_context(|| format!("Failed to write {} output to stdout", format))?;
            writer.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

fn resolve_input_format(params: &IoParameters) -> Result<LatticeFormat> {
    if let Some(explicit) = params.input_format {
        Ok(explicit)
    } else if let Some(path) = &params.input {
        LatticeFormat::from_path(path).ok_or_else(|| {
            anyhow!(
                "Unable to infer input format from '{}'. Please specify --format.",
                path.display()
            )
        })
    } else {
        Ok(LatticeFormat::default())
    }
}

/// Output format: explicit flag, then output extension, then the input format.
fn resolve_output_format(params: &IoParameters) -> Result<LatticeFormat> {
    if let Some(explicit) = params.output_format {
        return Ok(explicit);
    }

    if let Some(path) = &params.output {
        LatticeFormat::from_path(path).ok_or_else(|| {
            anyhow!(
                "Unable to infer output format from '{}'. Please specify --out-format.",
                path.display()
            )
        })
    } else {
        resolve_input_format(params)
    }
}

/// Returns true when stdout is a TTY and no explicit output file was supplied.
pub fn interactive_stdout_requested(params: &IoParameters) -> bool {
    params.output.is_none() && stdio::stdout().is_terminal()
}

/// Ensures commands do not dump lattice files directly into an interactive terminal.
pub fn ensure_noninteractive_stdout(command: &str, params: &IoParameters) -> Result<()> {
    if interactive_stdout_requested(params) {
        bail!(
            "Refusing to stream {command} results to an interactive terminal. Use -o/--output or pipe the command into a file."
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_falls_back_to_input_extension() {
        let params = IoParameters {
            input: Some(PathBuf::from("ring.json")),
            ..Default::default()
        };
        assert_eq!(resolve_output_format(&params).unwrap(), LatticeFormat::Json);
    }

    #[test]
    fn explicit_formats_win_over_extensions() {
        let params = IoParameters {
            input: Some(PathBuf::from("ring.json")),
            output: Some(PathBuf::from("ring.json")),
            input_format: Some(LatticeFormat::Toml),
            output_format: Some(LatticeFormat::Toml),
        };
        assert_eq!(resolve_input_format(&params).unwrap(), LatticeFormat::Toml);
        assert_eq!(resolve_output_format(&params).unwrap(), LatticeFormat::Toml);
    }

    #[test]
    fn unknown_extension_requires_explicit_format() {
        let params = IoParameters {
            input: Some(PathBuf::from("ring.seq")),
            ..Default::default()
        };
        assert!(resolve_input_format(&params).is_err());
    }
}
