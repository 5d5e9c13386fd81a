//! Reader for the header-annotated delimited text format
//!
//! The first line is a header starting with the header marker (`#`), listing
//! one `name[:scale]` token per column. Every following line holds one object
//! with a field per column:
//!
//! ```text
//! # label:nom	weight:lin	height:lin
//! 0	70	100.0
//! 1	50	200
//! ```
//!
//! The header is validated when reading starts; data lines are parsed lazily
//! as the resulting [`Data`] is consumed.

use std::io::BufRead;

use pmll_core::{duplicated_features, Data, Feature, Row, RowStream, Scale, Value};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::options::DataReaderOptions;

/// Parses the text format into features and objects
#[derive(Debug, Clone, Default)]
pub struct DataReader {
    options: DataReaderOptions,
}

impl DataReader {
    /// Create a reader with the given options
    pub fn new(options: DataReaderOptions) -> Self {
        Self { options }
    }

    /// Get the options of this reader
    pub fn options(&self) -> &DataReaderOptions {
        &self.options
    }

    /// Parse a header line into one feature per column
    pub fn parse_header(&self, line: &str) -> Result<Vec<Feature>> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let rest = line.strip_prefix(self.options.header_marker).ok_or_else(|| {
            Error::Header(format!(
                "header must start with '{}'",
                self.options.header_marker
            ))
        })?;

        let mut tokens: Vec<&str> = rest
            .split(self.options.delimiter)
            .map(|token| if self.options.trim_fields { token.trim() } else { token })
            .collect();
        // Marker set off by its own delimiter: "#\tname\t..."
        if tokens.len() > 1 && tokens[0].is_empty() {
            tokens.remove(0);
        }

        let features = tokens
            .iter()
            .enumerate()
            .map(|(column, token)| self.parse_token(column, token))
            .collect::<Result<Vec<_>>>()?;

        let duplicated = duplicated_features(&features);
        if !duplicated.is_empty() {
            let names: Vec<String> = duplicated.iter().map(ToString::to_string).collect();
            return Err(Error::Header(format!(
                "duplicated features: {}",
                names.join(", ")
            )));
        }

        debug!(nfeatures = features.len(), "parsed header");
        Ok(features)
    }

    fn parse_token(&self, column: usize, token: &str) -> Result<Feature> {
        let (name, scale) = match token.rsplit_once(self.options.scale_separator) {
            Some((name, literal)) => {
                let scale = literal.trim().parse::<Scale>().map_err(|_| {
                    Error::Header(format!("unknown scale '{literal}' in column {column}"))
                })?;
                (name.trim(), scale)
            }
            None => (token, self.options.default_scale),
        };
        if name.is_empty() {
            return Err(Error::Header(format!("empty feature name in column {column}")));
        }
        Ok(Feature::with_scale(name, scale))
    }

    /// Split lines into a lazy object stream and the header's features
    ///
    /// The first line is parsed as the header right away. The remaining
    /// lines are coerced per column scale only when the stream is consumed;
    /// a malformed line surfaces as a parse error at that point.
    pub fn get_objects_features<I, S>(&self, lines: I) -> Result<(RowStream, Vec<Feature>)>
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'static,
        S: AsRef<str> + 'static,
    {
        self.split_lines(lines.into_iter().map(|line| Ok(line.as_ref().to_string())))
    }

    /// Read lines into streaming data
    pub fn read<I, S>(&self, lines: I) -> Result<Data>
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'static,
        S: AsRef<str> + 'static,
    {
        let (objects, features) = self.get_objects_features(lines)?;
        Ok(Data::from_stream(objects, Some(features))?)
    }

    /// Read from a buffered reader into streaming data
    pub fn read_buffered<R: BufRead + 'static>(&self, reader: R) -> Result<Data> {
        let lines = reader.lines().map(|line| line.map_err(pmll_core::Error::from));
        let (objects, features) = self.split_lines(lines)?;
        Ok(Data::from_stream(objects, Some(features))?)
    }

    fn split_lines<I>(&self, mut lines: I) -> Result<(RowStream, Vec<Feature>)>
    where
        I: Iterator<Item = pmll_core::Result<String>> + 'static,
    {
        let header = lines
            .next()
            .ok_or_else(|| Error::Header("input has no header line".into()))??;
        let features = self.parse_header(&header)?;

        let scales: Vec<Scale> = features.iter().map(Feature::scale).collect();
        let options = self.options.clone();
        let objects = lines.enumerate().filter_map(move |(i, line)| {
            // Header is line 1
            let number = i + 2;
            let line = match line {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            if options.skip_empty_lines && line.trim().is_empty() {
                return None;
            }
            Some(parse_object(line, number, &scales, &options))
        });

        Ok((Box::new(objects), features))
    }
}

/// Coerce the fields of one data line to the scales of their columns
fn parse_object(
    line: &str,
    number: usize,
    scales: &[Scale],
    options: &DataReaderOptions,
) -> pmll_core::Result<Row> {
    let fields: Vec<&str> = line.split(options.delimiter).collect();
    if fields.len() != scales.len() {
        return Err(pmll_core::Error::Parse {
            line: number,
            message: format!("expected {} fields, found {}", scales.len(), fields.len()),
        });
    }

    let row = fields
        .iter()
        .zip(scales)
        .map(|(field, &scale)| {
            let field = if options.trim_fields { field.trim() } else { field };
            Value::from_token(field, scale).map_err(|err| pmll_core::Error::Parse {
                line: number,
                message: err.to_string(),
            })
        })
        .collect::<pmll_core::Result<Row>>()?;

    trace!(line = number, "parsed object");
    Ok(row)
}
