//! # Parameters
//!
//! Two small tagged files configure a run. The common `cfg` file, shared with
//! the variator, fixes the population sizes and the number of objectives:
//!
//! ```text
//! alpha 50
//! mu 20
//! lambda 20
//! dim 2
//! ```
//!
//! The local parameter file belongs to the selector alone and starts with the
//! seed of its random number generator:
//!
//! ```text
//! seed 42
//! ```
//!
//! ## Example
//!
//! ```rust
//! use femo::protocol::RunParameters;
//!
//! let params = RunParameters::builder()
//!     .alpha(50)
//!     .mu(20)
//!     .lambda(20)
//!     .dimension(2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.initial_record_count(), 150);
//! ```

use std::fs;
use std::path::Path;
use std::str::SplitWhitespace;

use crate::error::{IoResultExt, Result, SelectorError};

/// Parameters shared by selector and variator, fixed for a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParameters {
    alpha: usize,
    mu: usize,
    lambda: usize,
    dimension: usize,
}

impl RunParameters {
    /// Reads the `cfg` file.
    ///
    /// # Errors
    ///
    /// - [`SelectorError::FileAccess`] if the file cannot be read.
    /// - [`SelectorError::Format`] if a tag is missing, misplaced or a value
    ///   is not an integer.
    /// - [`SelectorError::OutOfRange`] if a value is not positive.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_path(path)?;
        Self::parse(path, &content)
    }

    /// Parses `cfg` content. `path` is only used in error messages.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let mut tokens = content.split_whitespace();
        Ok(Self {
            alpha: positive_entry(path, &mut tokens, "alpha")?,
            mu: positive_entry(path, &mut tokens, "mu")?,
            lambda: positive_entry(path, &mut tokens, "lambda")?,
            dimension: positive_entry(path, &mut tokens, "dim")?,
        })
    }

    pub fn builder() -> RunParametersBuilder {
        RunParametersBuilder::default()
    }

    /// Size of the initial population.
    pub fn alpha(&self) -> usize {
        self.alpha
    }

    /// Parents selected per round.
    pub fn mu(&self) -> usize {
        self.mu
    }

    /// Offspring per round.
    pub fn lambda(&self) -> usize {
        self.lambda
    }

    /// Number of objectives.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Count header expected in the `ini` file: `(dim + 1) * alpha`.
    pub fn initial_record_count(&self) -> usize {
        (self.dimension + 1) * self.alpha
    }

    /// Count header expected in the `var` file: `(dim + 1) * lambda`.
    pub fn offspring_record_count(&self) -> usize {
        (self.dimension + 1) * self.lambda
    }
}

/// Builder for `RunParameters`.
#[derive(Debug, Clone, Default)]
pub struct RunParametersBuilder {
    alpha: Option<usize>,
    mu: Option<usize>,
    lambda: Option<usize>,
    dimension: Option<usize>,
}

impl RunParametersBuilder {
    pub fn alpha(mut self, value: usize) -> Self {
        self.alpha = Some(value);
        self
    }

    pub fn mu(mut self, value: usize) -> Self {
        self.mu = Some(value);
        self
    }

    pub fn lambda(mut self, value: usize) -> Self {
        self.lambda = Some(value);
        self
    }

    pub fn dimension(mut self, value: usize) -> Self {
        self.dimension = Some(value);
        self
    }

    /// Builds the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Configuration`] if a value is missing or zero.
    pub fn build(self) -> Result<RunParameters> {
        let require = |value: Option<usize>, name: &str| match value {
            Some(value) if value > 0 => Ok(value),
            Some(_) => Err(SelectorError::Configuration(format!(
                "{} must be positive",
                name
            ))),
            None => Err(SelectorError::Configuration(format!(
                "{} not specified",
                name
            ))),
        };

        Ok(RunParameters {
            alpha: require(self.alpha, "alpha")?,
            mu: require(self.mu, "mu")?,
            lambda: require(self.lambda, "lambda")?,
            dimension: require(self.dimension, "dim")?,
        })
    }
}

/// Parameters private to the selector.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalParameters {
    /// Seed for the selection random number generator.
    pub seed: u64,
}

impl LocalParameters {
    /// Reads the local parameter file. Only the leading `seed` entry is
    /// interpreted; anything after it is ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_path(path)?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let mut tokens = content.split_whitespace();
        expect_tag(path, &mut tokens, "seed")?;
        let raw = tokens
            .next()
            .ok_or_else(|| SelectorError::format(path, "missing value for seed"))?;
        let seed: i64 = raw
            .parse()
            .map_err(|_| SelectorError::format(path, format!("seed is not an integer: {}", raw)))?;
        // Negative seeds are legal in the file; only the bit pattern matters.
        Ok(Self { seed: seed as u64 })
    }
}

fn expect_tag(path: &Path, tokens: &mut SplitWhitespace<'_>, tag: &str) -> Result<()> {
    match tokens.next() {
        Some(found) if found == tag => Ok(()),
        Some(found) => Err(SelectorError::format(
            path,
            format!("expected tag '{}', found '{}'", tag, found),
        )),
        None => Err(SelectorError::format(path, format!("missing tag '{}'", tag))),
    }
}

fn positive_entry(path: &Path, tokens: &mut SplitWhitespace<'_>, tag: &str) -> Result<usize> {
    expect_tag(path, tokens, tag)?;
    let raw = tokens
        .next()
        .ok_or_else(|| SelectorError::format(path, format!("missing value for {}", tag)))?;
    let value: i64 = raw
        .parse()
        .map_err(|_| SelectorError::format(path, format!("{} is not an integer: {}", tag, raw)))?;
    if value <= 0 {
        return Err(SelectorError::out_of_range(
            path,
            format!("{} must be positive, got {}", tag, value),
        ));
    }
    usize::try_from(value)
        .map_err(|_| SelectorError::out_of_range(path, format!("{} is too large: {}", tag, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> &'static Path {
        Path::new("test_cfg")
    }

    #[test]
    fn test_parse_run_parameters() {
        let params = RunParameters::parse(cfg(), "alpha 10\nmu 4\nlambda 6\ndim 3\n").unwrap();
        assert_eq!(params.alpha(), 10);
        assert_eq!(params.mu(), 4);
        assert_eq!(params.lambda(), 6);
        assert_eq!(params.dimension(), 3);
        assert_eq!(params.initial_record_count(), 40);
        assert_eq!(params.offspring_record_count(), 24);
    }

    #[test]
    fn test_parse_rejects_misordered_tags() {
        let result = RunParameters::parse(cfg(), "mu 4\nalpha 10\nlambda 6\ndim 3\n");
        assert!(matches!(result, Err(SelectorError::Format { .. })));
    }

    #[test]
    fn test_parse_rejects_non_positive_values() {
        let result = RunParameters::parse(cfg(), "alpha 10\nmu 0\nlambda 6\ndim 3\n");
        assert!(matches!(result, Err(SelectorError::OutOfRange { .. })));

        let result = RunParameters::parse(cfg(), "alpha 10\nmu 4\nlambda -6\ndim 3\n");
        assert!(matches!(result, Err(SelectorError::OutOfRange { .. })));
    }

    #[test]
    fn test_parse_rejects_truncated_file() {
        let result = RunParameters::parse(cfg(), "alpha 10\nmu 4\nlambda 6\ndim");
        assert!(matches!(result, Err(SelectorError::Format { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = RunParameters::from_file(Path::new("/nonexistent/femo/cfg"));
        assert!(matches!(result, Err(SelectorError::FileAccess { .. })));
    }

    #[test]
    fn test_builder_validates() {
        let result = RunParameters::builder().alpha(1).mu(1).lambda(1).build();
        assert!(matches!(result, Err(SelectorError::Configuration(_))));

        let result = RunParameters::builder()
            .alpha(1)
            .mu(0)
            .lambda(1)
            .dimension(1)
            .build();
        assert!(matches!(result, Err(SelectorError::Configuration(_))));
    }

    #[test]
    fn test_builder_matches_parse() {
        let built = RunParameters::builder()
            .alpha(10)
            .mu(4)
            .lambda(6)
            .dimension(3)
            .build()
            .unwrap();
        let parsed = RunParameters::parse(cfg(), "alpha 10 mu 4 lambda 6 dim 3").unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn test_parse_local_parameters() {
        let path = Path::new("test_param");
        assert_eq!(LocalParameters::parse(path, "seed 42\n").unwrap().seed, 42);
        assert_eq!(
            LocalParameters::parse(path, "seed -1\nother 5").unwrap().seed,
            u64::MAX
        );
        assert!(LocalParameters::parse(path, "sead 42").is_err());
        assert!(LocalParameters::parse(path, "seed x").is_err());
        assert!(LocalParameters::parse(path, "").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let params = RunParameters::parse(cfg(), "alpha 10 mu 4 lambda 6 dim 3").unwrap();
        let json = serde_json::to_string(&params).unwrap();
        let back: RunParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
