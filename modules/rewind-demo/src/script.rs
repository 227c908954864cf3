//! Frame scripts: a comma-separated list with one operation per frame.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Increment(i64),
    Slide(i64),
    Undo,
    Redo,
    Noop,
}

impl FromStr for Op {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let number = |arg: Option<&str>| -> Result<i64> {
            let arg = arg.with_context(|| format!("`{name}` needs a value, e.g. `{name}:3`"))?;
            arg.trim()
                .parse()
                .with_context(|| format!("invalid number in `{s}`"))
        };

        match (name, arg) {
            ("inc", arg) => Ok(Op::Increment(number(arg)?)),
            ("slide", arg) => Ok(Op::Slide(number(arg)?)),
            ("undo", None) => Ok(Op::Undo),
            ("redo", None) => Ok(Op::Redo),
            ("noop", None) => Ok(Op::Noop),
            _ => bail!("unknown script operation: `{s}`"),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Increment(n) => write!(f, "inc:{n}"),
            Op::Slide(n) => write!(f, "slide:{n}"),
            Op::Undo => f.write_str("undo"),
            Op::Redo => f.write_str("redo"),
            Op::Noop => f.write_str("noop"),
        }
    }
}

pub fn parse(script: &str) -> Result<Vec<Op>> {
    script
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}
