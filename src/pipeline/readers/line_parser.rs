use crate::error::{PipelineError, Result};

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// The first line of the input: column names.
    Header(Vec<String>),
    /// A data row with exactly as many slots as the header declared.
    /// Slots past the last field present on the line are `None`.
    Row(Vec<Option<String>>),
}

/// Splits delimiter-separated lines and enforces the header's column count.
///
/// The first parsed line is taken as the header. There is no quoting or escaping:
/// every occurrence of the delimiter separates two fields.
#[derive(Debug, Clone)]
pub struct LineParser {
    delimiter: String,
    columns: Option<Vec<String>>,
    lines_parsed: u64,
}

impl LineParser {
    pub fn new(delimiter: impl Into<String>) -> Self {
        LineParser {
            delimiter: delimiter.into(),
            columns: None,
            lines_parsed: 0,
        }
    }

    /// Column names from the header, once it has been parsed.
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn expected_columns(&self) -> Option<usize> {
        self.columns.as_ref().map(Vec::len)
    }

    /// 1-based number of the most recently parsed line.
    pub fn line_number(&self) -> u64 {
        self.lines_parsed
    }

    pub fn parse_line(&mut self, line: &str) -> Result<ParsedLine> {
        self.lines_parsed += 1;
        let fields = self.split(line);

        let expected = match self.expected_columns() {
            Some(expected) => expected,
            None => {
                let header: Vec<String> = fields.map(str::to_string).collect();
                self.columns = Some(header.clone());
                return Ok(ParsedLine::Header(header));
            }
        };

        let mut row: Vec<Option<String>> = vec![None; expected];
        for (i, field) in fields.enumerate() {
            if i >= expected {
                return Err(PipelineError::TooManyFields {
                    expected,
                    line_number: self.lines_parsed,
                });
            }
            row[i] = Some(field.to_string());
        }
        Ok(ParsedLine::Row(row))
    }

    // Trailing empty fields are dropped, interior empty fields are kept.
    fn split<'a>(&'a self, line: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_end_matches(self.delimiter.as_str());
        if trimmed.is_empty() {
            Box::new(std::iter::empty())
        } else {
            Box::new(trimmed.split(self.delimiter.as_str()))
        }
    }
}
