//! # Exchange files
//!
//! Reading and writing of the population files exchanged with the variator.
//! All files are whitespace-separated text.
//!
//! Population input (`ini`, `var`):
//!
//! ```text
//! 9
//! 0 1.0 5.0
//! 1 2.0 3.0
//! 2 5.0 5.0
//! END
//! ```
//!
//! The header is `(dim + 1) * records`. Each record is an identity followed by
//! `dim` objective values. Once read, the file is overwritten with `0`.
//!
//! Identity lists (`sel`, `arc`) carry a count, that many identities, and
//! `END`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::SplitWhitespace;

use tracing::{debug, info};

use crate::candidate::Identity;
use crate::error::{IoResultExt, Result, SelectorError};
use crate::population::Population;
use crate::protocol::parameters::RunParameters;

const END_MARKER: &str = "END";
const CONSUMED: &str = "0";

/// Reads the initial population from the `ini` file into `population`.
pub fn ingest_initial(
    path: &Path,
    params: &RunParameters,
    population: &mut Population,
) -> Result<Vec<Identity>> {
    ingest(path, params.alpha(), params.dimension(), population)
}

/// Reads offspring from the `var` file into `population`.
pub fn ingest_offspring(
    path: &Path,
    params: &RunParameters,
    population: &mut Population,
) -> Result<Vec<Identity>> {
    ingest(path, params.lambda(), params.dimension(), population)
}

/// Reads `expected_records` candidates of `dimension` objectives from `path`
/// into `population` and marks the file consumed.
///
/// Returns the identities in file order. A file that already holds the
/// consumed sentinel yields an empty list and is left untouched.
///
/// Candidates inserted before a malformed record stay in the population. Use
/// [`ingest_into`] to learn which ones they were.
///
/// # Errors
///
/// - [`SelectorError::FileAccess`] if the file cannot be read or rewritten.
/// - [`SelectorError::OutOfRange`] if the header does not match
///   `(dimension + 1) * expected_records`.
/// - [`SelectorError::Format`] for any malformed token or a missing `END`.
/// - Errors from [`Population::insert`], e.g. a duplicate identity.
pub fn ingest(
    path: &Path,
    expected_records: usize,
    dimension: usize,
    population: &mut Population,
) -> Result<Vec<Identity>> {
    let mut identities = Vec::with_capacity(expected_records);
    ingest_into(path, expected_records, dimension, population, &mut identities)?;
    Ok(identities)
}

/// Same as [`ingest`], but pushes each identity onto `inserted` as soon as
/// its candidate is in the population.
///
/// On error, `inserted` holds exactly the candidates this call added.
pub fn ingest_into(
    path: &Path,
    expected_records: usize,
    dimension: usize,
    population: &mut Population,
    inserted: &mut Vec<Identity>,
) -> Result<()> {
    let content = fs::read_to_string(path).with_path(path)?;
    let mut tokens = Tokens::new(path, &content);

    let count = tokens.count()?;
    if count == 0 {
        debug!(path = %path.display(), "input already consumed");
        return Ok(());
    }

    let expected = (dimension + 1) * expected_records;
    if count != expected {
        return Err(SelectorError::out_of_range(
            path,
            format!("header is {}, expected {}", count, expected),
        ));
    }

    let first = inserted.len();
    for _ in 0..expected_records {
        let identity = tokens.identity()?;
        let objectives = (0..dimension)
            .map(|_| tokens.objective())
            .collect::<Result<Vec<f64>>>()?;
        population.insert(identity, objectives)?;
        inserted.push(identity);
    }
    tokens.end()?;

    fs::write(path, CONSUMED).with_path(path)?;
    info!(path = %path.display(), records = inserted.len() - first, "ingested candidates");
    Ok(())
}

/// Writes the selected parents to the `sel` file.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidIdentity`] before touching the file if any
/// identity is not live in `population`.
pub fn emit_parents(path: &Path, parents: &[Identity], population: &Population) -> Result<()> {
    if let Some(&invalid) = parents.iter().find(|&&id| !population.contains(id)) {
        return Err(SelectorError::InvalidIdentity(invalid));
    }

    write_identities(path, parents.len(), parents.iter().copied())?;
    debug!(path = %path.display(), parents = parents.len(), "wrote parents");
    Ok(())
}

/// Writes every live identity, ascending, to the `arc` file.
pub fn emit_archive(path: &Path, population: &Population) -> Result<()> {
    write_identities(path, population.size(), population.identities())?;
    debug!(path = %path.display(), size = population.size(), "wrote archive");
    Ok(())
}

/// True iff the file's leading integer is zero.
///
/// A file without a leading integer counts as not consumed.
///
/// # Errors
///
/// Returns [`SelectorError::FileAccess`] if the file cannot be read.
pub fn is_consumed(path: &Path) -> Result<bool> {
    let content = fs::read_to_string(path).with_path(path)?;
    Ok(content
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<i64>().ok())
        == Some(0))
}

/// Parses a `sel` or `arc` file.
///
/// A consumed file (lone `0`) yields an empty list.
pub fn read_identities(path: &Path) -> Result<Vec<Identity>> {
    let content = fs::read_to_string(path).with_path(path)?;
    let mut tokens = Tokens::new(path, &content);

    let count = tokens.count()?;
    if count == 0 && tokens.is_exhausted() {
        return Ok(Vec::new());
    }

    let identities = (0..count)
        .map(|_| tokens.identity())
        .collect::<Result<Vec<_>>>()?;
    tokens.end()?;
    Ok(identities)
}

fn write_identities(
    path: &Path,
    count: usize,
    identities: impl Iterator<Item = Identity>,
) -> Result<()> {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", count);
    for identity in identities {
        let _ = writeln!(out, "{}", identity);
    }
    out.push_str(END_MARKER);
    fs::write(path, out).with_path(path)
}

struct Tokens<'a> {
    path: &'a Path,
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(path: &'a Path, content: &'a str) -> Self {
        Self {
            path,
            inner: content.split_whitespace(),
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| SelectorError::format(self.path, format!("missing {}", what)))
    }

    fn is_exhausted(&mut self) -> bool {
        self.inner.clone().next().is_none()
    }

    fn count(&mut self) -> Result<usize> {
        let raw = self.next("count header")?;
        raw.parse()
            .map_err(|_| SelectorError::format(self.path, format!("invalid count header: {}", raw)))
    }

    fn identity(&mut self) -> Result<Identity> {
        let raw = self.next("identity")?;
        raw.parse()
            .map_err(|_| SelectorError::format(self.path, format!("invalid identity: {}", raw)))
    }

    fn objective(&mut self) -> Result<f64> {
        let raw = self.next("objective value")?;
        match raw.parse::<f64>() {
            Ok(value) if !value.is_nan() => Ok(value),
            _ => Err(SelectorError::format(
                self.path,
                format!("invalid objective value: {}", raw),
            )),
        }
    }

    fn end(&mut self) -> Result<()> {
        match self.inner.next() {
            Some(END_MARKER) => Ok(()),
            Some(other) => Err(SelectorError::format(
                self.path,
                format!("expected {}, found {}", END_MARKER, other),
            )),
            None => Err(SelectorError::format(
                self.path,
                format!("missing {}", END_MARKER),
            )),
        }
    }
}
