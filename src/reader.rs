use std::{
    error::Error,
    ffi::OsStr,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use flate2::read::GzDecoder;

use crate::parser::Expr;

pub fn is_compressed<P: AsRef<Path>>(p: &P) -> bool {
    p.as_ref().extension() == Some(OsStr::new("gz"))
}

pub fn read_with_gz<P: AsRef<Path>>(p: &P) -> Result<Box<dyn BufRead>, Box<dyn Error>> {
    let file = File::open(p)?;

    if is_compressed(p) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Reads a batch of expressions, one per line. Comment and blank lines are
/// skipped; the first malformed expression aborts the whole batch.
#[must_use]
pub struct ExprReader<R: BufRead> {
    reader: R,
    comment: char,
}

impl<R: BufRead> ExprReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            comment: '#',
        }
    }

    pub fn with_comment(mut self, comment: char) -> Self {
        self.comment = comment;
        self
    }

    pub fn finish(self) -> Result<Vec<(String, Expr)>, Box<dyn Error>> {
        let mut exprs = Vec::new();

        for (lineno, line) in self.reader.lines().enumerate() {
            let line = line?;

            if line.starts_with(self.comment) {
                continue;
            }

            if line.trim().is_empty() {
                continue;
            }

            let expr = Expr::from_string(&line)
                .map_err(|e| format!("line {}: {}", lineno + 1, e))?;

            exprs.push((line, expr));
        }

        debug!("parsed {} expressions", exprs.len());

        Ok(exprs)
    }
}
