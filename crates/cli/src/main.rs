use clap::Parser;

use backoffice_cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    backoffice_observability::init_with(cli.log_format);

    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}
