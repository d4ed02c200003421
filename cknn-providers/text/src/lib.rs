//! Text provider for line-based UTF-8 sources.
//!
//! Each line becomes one item and items are compared by Levenshtein edit
//! distance over Unicode scalar values.
use std::io::BufRead;

use cknn_core::{DataSource, DataSourceError};
use thiserror::Error;

/// Errors raised while building a [`TextProvider`].
#[derive(Debug, Error)]
pub enum TextProviderError {
    /// The input held no lines.
    #[error("text input contains no lines")]
    EmptyInput,
    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// UTF-8 text lines measured by edit distance.
#[derive(Debug, Clone)]
pub struct TextProvider {
    name: String,
    lines: Vec<String>,
}

impl TextProvider {
    /// Creates a provider over `lines`.
    ///
    /// # Errors
    /// Returns [`TextProviderError::EmptyInput`] when `lines` is empty.
    ///
    /// # Examples
    /// ```
    /// use cknn_core::DataSource;
    /// use cknn_providers_text::TextProvider;
    ///
    /// let provider = TextProvider::new("demo", vec!["kitten".into(), "sitting".into()])?;
    /// assert_eq!(provider.distance(0, 1)?, 3.0);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Result<Self, TextProviderError> {
        if lines.is_empty() {
            return Err(TextProviderError::EmptyInput);
        }
        Ok(Self {
            name: name.into(),
            lines,
        })
    }

    /// Reads one item per line, stripping `\n` and `\r\n` terminators.
    ///
    /// # Errors
    /// Returns [`TextProviderError::Io`] when reading fails and
    /// [`TextProviderError::EmptyInput`] when no lines were read.
    pub fn try_from_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, TextProviderError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        Self::new(name, lines)
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn line(&self, index: usize) -> Result<&str, DataSourceError> {
        self.lines
            .get(index)
            .map(String::as_str)
            .ok_or(DataSourceError::OutOfBounds { index })
    }
}

impl DataSource for TextProvider {
    fn len(&self) -> usize {
        self.lines.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f64, DataSourceError> {
        let left = self.line(i)?;
        let right = self.line(j)?;
        Ok(strsim::levenshtein(left, right) as f64)
    }
}
