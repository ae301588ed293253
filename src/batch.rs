use anyhow::{bail, Context, Result};
use std::io::{stdin, stdout, Cursor};
use tracing::{debug, warn};

use crate::{
    cse::{eliminate_in_place_with_stats, eliminate_with_stats, Eliminated},
    expression::Expr,
    io::{Input, Output},
    parser::Parser,
    printer::render,
};

/// How the tree handed to the eliminator is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite the parsed tree in place.
    #[default]
    Destructive,
    /// Build a new tree, leaving the parsed one untouched.
    NonDestructive,
}

/// Runs CSE over a batch: a record count line followed by that many
/// expressions, one per line. Writes one output line per record.
pub struct CseBatch {
    mode: Mode,
}

impl CseBatch {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn eliminate(&self, mut expr: Expr) -> (Expr, Eliminated) {
        match self.mode {
            Mode::Destructive => {
                let stats = eliminate_in_place_with_stats(&mut expr);
                (expr, stats)
            }
            Mode::NonDestructive => eliminate_with_stats(&expr),
        }
    }

    /// Parses one expression and renders its CSE form.
    ///
    /// ```
    /// use cse_rust::{CseBatch, Mode};
    /// let batch = CseBatch::new(Mode::NonDestructive);
    /// assert_eq!(batch.eliminate_line("f(a,a)").unwrap(), "f(a,2)");
    /// ```
    pub fn eliminate_line(&self, line: &str) -> Result<String> {
        let expr = Parser::parse(line)?;
        let (result, stats) = self.eliminate(expr);
        debug!(
            slots = stats.slots_assigned,
            references = stats.references_emitted,
            "eliminated"
        );
        Ok(render(&result))
    }

    fn run(&self, mut input: Input, output: &mut Output) -> Result<()> {
        let count_line = input.read_line()?.unwrap_or_default();
        let count_line = String::from_utf8_lossy(&count_line);
        let count: usize = match count_line.trim().parse() {
            Ok(count) => count,
            Err(_) => bail!("Invalid record count: [{}]", count_line.trim()),
        };
        debug!(count, mode = ?self.mode, "processing batch");

        for index in 0..count {
            let Some(line) = input.read_line()? else {
                bail!("Expected {} records, found {}.", count, index);
            };
            let result = std::str::from_utf8(&line)
                .context("Record is not valid UTF-8.")
                .and_then(|line| self.eliminate_line(line));
            match result {
                Ok(result) => output.write_line(&result)?,
                Err(err) => {
                    warn!(record = index + 1, "skipping record: {:#}", err);
                    output.write_line("")?;
                }
            }
        }
        output.flush()
    }

    /// Runs batch as Vec<u8> -> Vec<u8> function.
    pub fn run_vec(&self, input: Vec<u8>) -> Result<Vec<u8>> {
        let input = Input::Reader(Box::new(Cursor::new(input)));
        let mut output = Output::Buffer(Vec::new());
        self.run(input, &mut output)?;
        match output {
            Output::Buffer(result) => Ok(result),
            _ => panic!("Unreachable code."),
        }
    }

    /// Runs batch as String -> String function.
    ///
    /// ```
    /// use cse_rust::{CseBatch, Mode};
    /// let batch = CseBatch::new(Mode::Destructive);
    /// assert_eq!(batch.run_string("2\nx\nf(a,a)\n").unwrap(), "x\nf(a,2)\n");
    /// ```
    pub fn run_string(&self, input: &str) -> Result<String> {
        let result = self.run_vec(input.as_bytes().to_owned())?;
        String::from_utf8(result).context("Output is not valid UTF-8.")
    }

    /// Runs batch, reading from standard input and writing to standard output.
    pub fn run_console(&self) -> Result<()> {
        let input = Input::Reader(Box::new(stdin().lock()));
        let mut output = Output::Writer(Box::new(stdout().lock()));
        self.run(input, &mut output)
    }
}
