use clap::{Parser, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates an epub-scaffold.toml config file
    Config,
    /// Scaffolds the EPUB container according to the contents of the epub-scaffold.toml config file
    Scaffold,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
