mod cli;
mod report;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Command::Check(args) => run::check(args),
        Command::List(args) => run::list(args),
    }
}
