use std::{error::Error, fmt::Display, io::BufRead};

use anyhow::{Context, Result};
use log::debug;

use crate::{dataset::FeatureMatrix, linalg::Matrix};

/// Parses a labelled feature file.
///
/// The first non comment line is the header: the classification column
/// label followed by the feature names. Every following line is a
/// classification label followed by one numeric value per feature. With
/// `labelled == false` neither the header nor the rows carry the label
/// column.
///
/// Any malformed line aborts the load.
pub fn from_csv(reader: Box<dyn BufRead>, delimiter: &str, labelled: bool) -> Result<FeatureMatrix> {
    let context = "Parsing CSV to feature matrix";

    let mut lines = reader.lines();
    let mut headers = String::from("#");
    let mut header_line = 0;
    while headers.starts_with('#') || headers.trim().is_empty() {
        header_line += 1;
        headers = match lines.next() {
            Some(l) => l.context(context)?,
            None => return Err(TableParserError::EmptyFile).context(context),
        };
    }
    let mut headers: Vec<String> = headers
        .split(delimiter)
        .map(|h| h.trim().to_string())
        .collect();
    if labelled {
        headers.remove(0);
    }
    let width = headers.len();

    let mut labels = Vec::new();
    let mut elements = Vec::new();
    let mut height = 0;
    for (line_num, line) in lines.enumerate().map(|(i, l)| (i + header_line + 1, l)) {
        let line = line.context(context)?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let mut entries: Vec<&str> = line.split(delimiter).map(|e| e.trim()).collect();
        if labelled {
            labels.push(entries.remove(0).to_string());
        }
        if entries.len() != width {
            return Err(TableParserError::LineSizeConflict(line_num)).context(context);
        }
        for (column, entry) in entries.iter().enumerate() {
            let value = entry.parse::<f64>().map_err(|_| TableParserError::NumericParse {
                line: line_num,
                column: column + usize::from(labelled),
                value: entry.to_string(),
            }).context(context)?;
            elements.push(value);
        }
        height += 1;
    }

    if height == 0 {
        return Err(TableParserError::NoData).context(context);
    }
    debug!("parsed {} samples with {} features", height, width);

    let data = Matrix::new(elements, height, width).context(context)?;
    let labels = if labelled { Some(labels) } else { None };
    FeatureMatrix::new(data, labels, headers).context(context)
}

/// Writes reduced rows under a `pc1..pck` header, prefixed by their
/// classification label when there is one.
pub fn reduced_to_csv(reduced: &Matrix, labels: Option<&[String]>, delimiter: &str) -> String {
    let mut lines = Vec::with_capacity(reduced.height() + 1);
    let mut headers: Vec<String> = (1..=reduced.width()).map(|i| format!("pc{}", i)).collect();
    if labels.is_some() {
        headers.insert(0, "label".to_string());
    }
    lines.push(headers.join(delimiter));
    for (i, row) in reduced.rows().enumerate() {
        let mut line: Vec<String> = Vec::with_capacity(row.len() + 1);
        if let Some(labels) = labels {
            line.push(labels[i].clone());
        }
        line.extend(row.iter().map(|v| v.to_string()));
        lines.push(line.join(delimiter));
    }
    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableParserError {
    EmptyFile,
    NoData,
    LineSizeConflict(usize),
    NumericParse {
        line: usize,
        column: usize,
        value: String,
    },
}

impl Display for TableParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableParserError::LineSizeConflict(l) => write!(f, "LineSizeConflict on line {}", l),
            TableParserError::NumericParse { line, column, value } => write!(
                f,
                "NumericParse: could not parse {:?} on line {}, col {}",
                value, line, column,
            ),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Error for TableParserError {}
