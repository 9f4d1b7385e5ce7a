use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// The Quint specification to compile, or a precompiled AST with --ast
    pub input: PathBuf,

    /// Treat the input as the JSON document produced by `quint compile`
    #[arg(long)]
    pub ast: bool,

    /// The quint executable used to compile the specification
    #[arg(long, default_value = "quint")]
    pub quint: String,
}
