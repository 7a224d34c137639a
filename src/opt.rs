use std::path::PathBuf;
use structopt::{clap, clap::arg_enum, StructOpt};

#[derive(Debug, StructOpt)]
#[structopt(name = "ber")]
#[structopt(long_version(option_env!("LONG_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))))]
#[structopt(setting(clap::AppSettings::ColoredHelp))]
pub struct Opt {
    #[structopt(long = "log-level", possible_values(&LogLevel::variants()))]
    pub log_level: Option<LogLevel>,
    /// Single expression given on the command line
    #[structopt(long = "expr", short = "e", conflicts_with = "input")]
    pub expr: Option<String>,
    /// File with one expression per line, optionally gzipped
    #[structopt(long = "input", short = "i", required_unless = "expr")]
    pub input: Option<PathBuf>,
    #[structopt(long = "comment", default_value = "#")]
    pub comment: char,
    #[structopt(long = "out-format", possible_values(&OutputFormat::variants()))]
    pub out_format: Option<OutputFormat>,
}

arg_enum! {
    #[derive(Debug)]
    pub enum LogLevel {
        DEBUG,
        INFO,
        WARN,
        ERROR,
    }
}

arg_enum! {
    #[derive(Debug)]
    pub enum OutputFormat {
        AST,
        EVAL,
    }
}
