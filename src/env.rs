//! Stack-oriented command evaluator.
//!
//! An [`Environment`] keeps a stack of sponges and maps one-line textual
//! commands onto the sponge and random-distribution APIs. Generated
//! values go to the output stream; state dumps and diagnostics go to the
//! error stream. Sponges enter the stack through `load`/`open` (or
//! programmatically through [`Environment::push`]) and multiply through
//! `copy`.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use crate::dump::DEFAULT_DELIMITER;
use crate::errors::Error;
use crate::random;
use crate::sponge::{Draupnir, SpongeInterface};

/// An error raised while parsing or executing an evaluator command.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The command name is not recognized.
    #[error("unknown command `{name}`")]
    UnknownCommand {
        /// The unrecognized first token.
        name: String,
    },
    /// A required argument is missing.
    #[error("command `{command}` is missing an argument")]
    MissingArgument {
        /// The command the argument belongs to.
        command: &'static str,
    },
    /// An argument does not parse as the expected type.
    #[error("cannot parse argument `{argument}`")]
    BadArgument {
        /// The offending token.
        argument: String,
    },
    /// A command needs a sponge but the stack is empty.
    #[error("the sponge stack is empty")]
    EmptyStack,
    /// A sponge or distribution call failed.
    #[error(transparent)]
    Sponge(#[from] Error),
    /// Reading a script or writing a result failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Stack-based execution environment.
pub struct Environment<'a> {
    stack: Vec<Draupnir>,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> Environment<'a> {
    /// Creates an environment writing results to `out` and dumps and
    /// diagnostics to `err`.
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Environment {
            stack: Vec::new(),
            out,
            err,
        }
    }

    /// Pushes a sponge onto the stack.
    pub fn push(&mut self, sponge: Draupnir) -> &mut Self {
        self.stack.push(sponge);
        self
    }

    /// The current stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Executes every command in `input`, one per line. Empty lines and
    /// `#` comments are skipped; execution stops early on `exit`.
    pub fn run_script<R: BufRead>(&mut self, input: R) -> Result<(), CommandError> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if !self.execute(trimmed)? {
                break;
            }
        }
        Ok(())
    }

    /// Executes a single command line; returns `false` once `exit` has
    /// run.
    pub fn execute(&mut self, line: &str) -> Result<bool, CommandError> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(CommandError::MissingArgument {
            command: "command",
        })?;
        let rest: Vec<&str> = tokens.collect();

        match name {
            "drop" => {
                let n = optional_usize(&rest, 0, 1)?;
                self.drop_sponges(n);
            }
            "copy" => {
                let n = optional_usize(&rest, 0, 1)?;
                let m = optional_usize(&rest, 1, 1)?;
                self.copy(n, m);
            }
            "sink" => {
                let n = optional_usize(&rest, 0, 1)?;
                let m = optional_usize(&rest, 1, 1)?;
                self.sink(n, m);
            }
            "raw" => {
                let count = optional_usize(&rest, 0, 10)?;
                let hex = optional_bool(&rest, 1, false)?;
                self.raw(count, hex)?;
            }
            "natural" => {
                let high = optional_u64(&rest, 0, 9)?;
                let value = random::natural_bounded(self.top()?, high);
                writeln!(self.out, "{value}")?;
            }
            "real" => {
                let high = optional_f64(&rest, 0, 1.0)?;
                let value = random::real(self.top()?) * high;
                writeln!(self.out, "{value}")?;
            }
            "permutation" => {
                let high = optional_usize(&rest, 0, 9)?;
                let values = random::permutation(self.top()?, high + 1);
                self.write_values(&values)?;
            }
            "cycle" => {
                let high = optional_usize(&rest, 0, 9)?;
                let values = random::cycle(self.top()?, high + 1);
                self.write_values(&values)?;
            }
            "derangement" => {
                let high = optional_usize(&rest, 0, 9)?;
                let values = random::derangement(self.top()?, high + 1)?;
                self.write_values(&values)?;
            }
            "sample" => {
                let count = optional_usize(&rest, 0, 1)?;
                let high = optional_usize(&rest, 1, 9)?;
                let (parts, replacements) = sample_tail(&rest)?;
                self.sample(count, high, &parts, replacements)?;
            }
            "load" => {
                let state = required(&rest, 0, "load")?;
                let sponge = Draupnir::load(state, DEFAULT_DELIMITER)?;
                self.stack.push(sponge);
            }
            "open" => {
                let file = required(&rest, 0, "open")?;
                let count = optional_usize(&rest, 1, 0)?;
                self.open(file, count)?;
            }
            "reset" => {
                let n = optional_usize(&rest, 0, 1)?;
                for sponge in self.top_sponges(n) {
                    sponge.reset();
                }
            }
            "soak" => {
                let data = required(&rest, 0, "soak")?.as_bytes().to_vec();
                let n = optional_usize(&rest, 1, 1)?;
                for sponge in self.top_sponges(n) {
                    sponge.soak(&data);
                }
            }
            "step" => {
                let n = optional_usize(&rest, 0, 1)?;
                let m = optional_usize(&rest, 1, 1)?;
                for sponge in self.top_sponges(n) {
                    sponge.step(m);
                }
            }
            "echo" => {
                writeln!(self.out, "{}", rest.join(" "))?;
            }
            "exit" => {
                let silent = optional_bool(&rest, 0, false)?;
                self.exit(silent)?;
                return Ok(false);
            }
            _ => {
                return Err(CommandError::UnknownCommand {
                    name: name.to_string(),
                })
            }
        }
        Ok(true)
    }

    fn top(&mut self) -> Result<&mut Draupnir, CommandError> {
        self.stack.last_mut().ok_or(CommandError::EmptyStack)
    }

    fn top_sponges(&mut self, n: usize) -> impl Iterator<Item = &mut Draupnir> + '_ {
        self.stack.iter_mut().rev().take(n)
    }

    fn drop_sponges(&mut self, n: usize) {
        let n = n.min(self.stack.len());
        self.stack.truncate(self.stack.len() - n);
    }

    fn copy(&mut self, n: usize, m: usize) {
        let m = m.min(self.stack.len());
        if m == 0 {
            return;
        }
        let top: Vec<Draupnir> = self.stack[self.stack.len() - m..].to_vec();
        for _ in 0..n {
            self.stack.extend(top.iter().cloned());
        }
    }

    fn sink(&mut self, n: usize, m: usize) {
        let n = n.min(self.stack.len());
        let m = m.min(self.stack.len() - n);
        if n == 0 || m == 0 {
            return;
        }
        let start = self.stack.len() - n - m;
        self.stack[start..].rotate_right(n);
    }

    fn raw(&mut self, count: usize, hex: bool) -> Result<(), CommandError> {
        let sponge = self.top()?;
        let bytes: Vec<u8> = (0..count).map(|_| sponge.squeeze()).collect();
        if hex {
            writeln!(self.out, "{}", hex::encode(&bytes))?;
        } else {
            self.out.write_all(&bytes)?;
        }
        Ok(())
    }

    fn sample(
        &mut self,
        count: usize,
        high: usize,
        parts: &[u64],
        replacements: bool,
    ) -> Result<(), CommandError> {
        let sponge = self.stack.last_mut().ok_or(CommandError::EmptyStack)?;
        let values = match (parts.is_empty(), replacements) {
            (true, true) => random::uniform_sample_with_replacement(sponge, high + 1, count)?,
            (true, false) => random::uniform_sample_without_replacement(sponge, high + 1, count)?,
            (false, true) => random::non_uniform_sample_with_replacement(sponge, parts, count)?,
            (false, false) => random::non_uniform_sample_without_replacement(sponge, parts, count)?,
        };
        self.write_values(&values)
    }

    fn open(&mut self, path: &str, count: usize) -> Result<(), CommandError> {
        let reader = BufReader::new(File::open(path)?);
        let mut loaded = 0usize;
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.stack.push(Draupnir::load(trimmed, DEFAULT_DELIMITER)?);
            loaded += 1;
            if count != 0 && loaded == count {
                break;
            }
        }
        Ok(())
    }

    fn exit(&mut self, silent: bool) -> Result<(), CommandError> {
        if !silent {
            for sponge in self.stack.iter_mut().rev() {
                writeln!(self.err, "{}", sponge.dump(DEFAULT_DELIMITER))?;
            }
        }
        self.stack.clear();
        Ok(())
    }

    fn write_values(&mut self, values: &[usize]) -> Result<(), CommandError> {
        let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        writeln!(self.out, "{}", rendered.join(" "))?;
        Ok(())
    }
}

fn required<'t>(
    tokens: &[&'t str],
    index: usize,
    command: &'static str,
) -> Result<&'t str, CommandError> {
    tokens
        .get(index)
        .copied()
        .ok_or(CommandError::MissingArgument { command })
}

fn optional_usize(tokens: &[&str], index: usize, default: usize) -> Result<usize, CommandError> {
    match tokens.get(index) {
        None => Ok(default),
        Some(token) => token.parse().map_err(|_| CommandError::BadArgument {
            argument: token.to_string(),
        }),
    }
}

fn optional_u64(tokens: &[&str], index: usize, default: u64) -> Result<u64, CommandError> {
    match tokens.get(index) {
        None => Ok(default),
        Some(token) => token.parse().map_err(|_| CommandError::BadArgument {
            argument: token.to_string(),
        }),
    }
}

fn optional_f64(tokens: &[&str], index: usize, default: f64) -> Result<f64, CommandError> {
    match tokens.get(index) {
        None => Ok(default),
        Some(token) => token.parse().map_err(|_| CommandError::BadArgument {
            argument: token.to_string(),
        }),
    }
}

fn optional_bool(tokens: &[&str], index: usize, default: bool) -> Result<bool, CommandError> {
    match tokens.get(index) {
        None => Ok(default),
        Some(&"true") | Some(&"1") => Ok(true),
        Some(&"false") | Some(&"0") => Ok(false),
        Some(token) => Err(CommandError::BadArgument {
            argument: token.to_string(),
        }),
    }
}

/// Splits a `sample` tail into part weights and the replacements flag.
fn sample_tail(tokens: &[&str]) -> Result<(Vec<u64>, bool), CommandError> {
    let mut parts = Vec::new();
    let mut replacements = true;
    for (offset, token) in tokens.iter().enumerate().skip(2) {
        if let Ok(weight) = token.parse::<u64>() {
            parts.push(weight);
        } else if offset == tokens.len() - 1 {
            replacements = optional_bool(tokens, offset, true)?;
        } else {
            return Err(CommandError::BadArgument {
                argument: token.to_string(),
            });
        }
    }
    Ok((parts, replacements))
}
