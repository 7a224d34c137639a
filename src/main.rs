#[macro_use]
extern crate log;

use std::{env::set_var, error::Error};
use structopt::StructOpt;

mod opt;
mod parser;
mod reader;

use crate::opt::{LogLevel, Opt, OutputFormat};
use crate::parser::Expr;

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();

    match &opt.log_level {
        Some(log_level) => match log_level {
            LogLevel::DEBUG => set_var("RUST_LOG", "debug"),
            LogLevel::INFO => set_var("RUST_LOG", "info"),
            LogLevel::WARN => set_var("RUST_LOG", "warn"),
            LogLevel::ERROR => set_var("RUST_LOG", "error"),
        },
        None => set_var("RUST_LOG", "warn"),
    };

    pretty_env_logger::init_timed();
    debug!("{:?}", opt);

    let exprs: Vec<(String, Expr)> = match (&opt.expr, &opt.input) {
        (Some(text), _) => vec![(text.clone(), Expr::from_string(text)?)],
        (None, Some(path)) => {
            let bufreader = reader::read_with_gz(path)?;
            reader::ExprReader::new(bufreader)
                .with_comment(opt.comment)
                .finish()?
        }
        (None, None) => return Err("either --expr or --input is required".into()),
    };

    let out_format = opt.out_format.unwrap_or(OutputFormat::AST);

    match out_format {
        OutputFormat::AST => {
            for (_, expr) in exprs {
                println!("{}", expr)
            }
        }
        OutputFormat::EVAL => {
            for (source, expr) in exprs {
                println!("{}\t{}", source, expr.evaluate())
            }
        }
    }

    Ok(())
}
