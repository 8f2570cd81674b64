use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use lattice_forge::io::LatticeFormat;

mod commands;

use commands::IoParameters;
use commands::{convert, info, line, select};

#[derive(Parser, Debug)]
#[command(
    name = "latticeforge",
    about = "A command-line tool for inspecting, converting, and reshaping particle-accelerator lattices.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Input file path. When omitted, stdin is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    input: Option<PathBuf>,
    /// Output file path. When omitted, stdout is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,
    /// Force the input format (toml or json).
    #[arg(long = "format", value_name = "FORMAT", global = true)]
    input_format: Option<LatticeFormat>,
    /// Force the output format (toml or json).
    #[arg(long = "out-format", value_name = "FORMAT", global = true)]
    output_format: Option<LatticeFormat>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect the lattice without modifying the data stream.
    Info(info::InfoArgs),
    /// Re-encode the lattice, optionally stripping drifts.
    Convert(convert::ConvertArgs),
    /// Expand a sequence into a line with explicit drifts.
    Line(line::LineArgs),
    /// Extract elements by name range, position range, class, or pattern.
    Select(select::SelectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = commands::init_logging(cli.verbose)?;

    let io_params = IoParameters {
        input: cli.input.clone(),
        output: cli.output.clone(),
        input_format: cli.input_format,
        output_format: cli.output_format,
    };

    match cli.command {
        Command::Info(args) => {
            let (lattice, _) = commands::load_input(&io_params)?;
            info::run(&lattice, &args)?;
            if !commands::interactive_stdout_requested(&io_params) {
                commands::save_output(&lattice, &io_params)?;
            }
        }
        Command::Convert(args) => {
            commands::ensure_noninteractive_stdout("convert", &io_params)?;
            let (lattice, _) = commands::load_input(&io_params)?;
            let lattice = convert::run(lattice, &args)?;
            commands::save_output(&lattice, &io_params)?;
        }
        Command::Line(args) => {
            commands::ensure_noninteractive_stdout("line", &io_params)?;
            let (lattice, _) = commands::load_input(&io_params)?;
            let lattice = line::run(&lattice, &args)?;
            commands::save_output(&lattice, &io_params)?;
        }
        Command::Select(args) => {
            commands::ensure_noninteractive_stdout("select", &io_params)?;
            let (lattice, _) = commands::load_input(&io_params)?;
            let lattice = select::run(lattice, &args)?;
            commands::save_output(&lattice, &io_params)?;
        }
    }

    Ok(())
}
