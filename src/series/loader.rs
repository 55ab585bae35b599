//! Price Series Loader
//!
//! Reads a header line followed by `timestamp_label,price` rows. The core
//! only ever sees the row position as the time index; the label is kept
//! around for display.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Failures surfaced while reading a series from storage
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file is absent or cannot be opened and read
    #[error("file not found: {}", path.display())]
    MissingSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An I/O failure on a reader that is not backed by a named file
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A row whose price column is not a number
    #[error("line {line}: malformed price {value:?}")]
    MalformedRecord { line: usize, value: String },

    /// A row with no price column at all
    #[error("line {line}: expected `timestamp,price`, found {content:?}")]
    MissingPrice { line: usize, content: String },
}

/// One minute of the series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Zero-based position in the series
    pub index: usize,
    pub price: f64,
}

/// Ordered, fully materialized price series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    samples: Vec<Sample>,
    labels: Vec<String>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from bare prices, labelling each sample with its index
    pub fn from_prices<I>(prices: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut series = Self::new();
        for price in prices {
            let label = series.len().to_string();
            series.push(label, price);
        }
        series
    }

    /// Append the next minute
    pub fn push(&mut self, label: impl Into<String>, price: f64) {
        let index = self.samples.len();
        self.samples.push(Sample { index, price });
        self.labels.push(label.into());
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn price(&self, index: usize) -> Option<f64> {
        self.samples.get(index).map(|s| s.price)
    }

    /// Original timestamp text for a sample
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

/// Load a series from a file on disk
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<PriceSeries, LoadError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| LoadError::MissingSource {
        path: path.to_path_buf(),
        source,
    })?;

    // a directory opens fine on unix and only fails on the first read
    let series = parse_series(BufReader::new(file)).map_err(|err| match err {
        LoadError::Io { source, .. } => LoadError::MissingSource {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    info!("Loaded {} samples from {}", series.len(), path.display());
    Ok(series)
}

/// Parse a series from any buffered reader. The first line is a header.
pub fn parse_series<R: BufRead>(reader: R) -> Result<PriceSeries, LoadError> {
    let mut series = PriceSeries::new();
    let read_failed = |source: io::Error| LoadError::Io {
        path: PathBuf::new(),
        source,
    };

    let mut lines = reader.lines();
    if let Some(header) = lines.next() {
        header.map_err(read_failed)?;
    }

    for (line_idx, line) in lines.enumerate() {
        let line = line.map_err(read_failed)?;
        // 1-based, counting the header
        let line_no = line_idx + 2;

        if line.trim().is_empty() {
            debug!("Skipping blank line {}", line_no);
            continue;
        }

        let mut fields = line.split(',');
        let label = fields.next().unwrap_or_default().trim();
        let Some(raw_price) = fields.next() else {
            return Err(LoadError::MissingPrice {
                line: line_no,
                content: line.clone(),
            });
        };

        let raw_price = raw_price.trim();
        let price: f64 = raw_price.parse().map_err(|_| LoadError::MalformedRecord {
            line: line_no,
            value: raw_price.to_string(),
        })?;

        series.push(label, price);
    }

    Ok(series)
}
