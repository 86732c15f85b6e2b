use anyhow::Result;
use clap::Parser;

use p16dis::{
    disassembler::{disassemble_file, DisassemblyArgs},
    instrumentation,
};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[clap(long)]
    #[clap(help = "Enable chrome tracing")]
    #[clap(long_help = "Enable chrome tracing which on program exit will generate
a json file to be opened with a chrome tracing compatible
viewer.")]
    trace: bool,
    #[clap(short, long, action = clap::ArgAction::Count)]
    #[clap(help = "Log more, repeat for even more")]
    verbose: u8,
    #[command(flatten)]
    args: DisassemblyArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _trace_guard = instrumentation::init(cli.trace, cli.verbose);

    let summary = disassemble_file(&cli.args)?;
    for (address, unknown) in &summary.unknown_opcodes {
        eprintln!("warning: {:#06x}: {}", address, unknown);
    }

    Ok(())
}
