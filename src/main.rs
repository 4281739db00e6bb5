use std::path::PathBuf;

use structopt::StructOpt;
use tracing::Level;

use crate::cell::CellKind;
use crate::generate::{generate, GenerateOptions, OutputFormat};

pub mod cell;
pub mod generate;
pub mod generator;
pub mod layout;
pub mod registry;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "redlogic-variants",
    about = "Generates every rotated variant of the redlogic gate cells"
)]
struct Opt {
    /// Output variant file
    #[structopt(parse(from_os_str))]
    output: PathBuf,

    /// Only generate these cells (PAD, NOT, XOR2, XNOR2, AND3, NAND3, OR3, NOR3)
    #[structopt(short, long = "cell", number_of_values = 1)]
    cells: Vec<CellKind>,

    /// Output format: xml or json
    #[structopt(short, long, default_value = "xml")]
    format: OutputFormat,

    /// Read the written file back and check it against the generated cells
    #[structopt(long)]
    verify: bool,

    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    tracing_subscriber::fmt()
        .with_max_level(if opt.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let options = GenerateOptions {
        kinds: opt.cells,
        format: opt.format,
        verify: opt.verify,
        ..GenerateOptions::new(opt.output)
    };
    generate(&options)?;

    Ok(())
}
