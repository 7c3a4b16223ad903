use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    #[clap(value_parser, help = "The service definition (service.json)")]
    pub input: PathBuf,

    #[clap(
        long,
        help = "Read the input as a generator invocation form instead of a bare service"
    )]
    pub invocation_form: bool,

    #[clap(
        long = "type",
        value_name = "NAME",
        help = "A type name to resolve, e.g. \"map[[reference]]\"; may be repeated"
    )]
    pub types: Vec<String>,

    #[clap(
        long,
        help = "Resolve every type referenced by the service; the default when no --type is given"
    )]
    pub all_fields: bool,

    #[clap(long, default_value = "text", value_enum)]
    pub format: Format,
}

impl Cli {
    pub fn resolves_all_fields(&self) -> bool {
        self.all_fields || self.types.is_empty()
    }
}
