mod cli;
mod generator;
mod quint;

use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let document = if cli.ast {
        quint::load(&cli.input)
            .with_context(|| format!("failed to load compiled AST from {}", cli.input.display()))?
    } else {
        quint::compile(&cli.quint, &cli.input)
            .with_context(|| format!("failed to compile {}", cli.input.display()))?
    };

    let rust = generator::generate(&document)?;
    print!("{rust}");
    Ok(())
}
