/*
    One line of the gene table
        field 0: primary key (the gene), defines the block
        field 1: secondary key, only the first 9 characters group entries
        field 2: length, carried along but never inspected
        field 3: size, parsed as f64, must be finite
*/

use super::error::FilterError;

pub const PREFIX_CHARS: usize = 9;
const MIN_FIELDS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub primary_key: String,
    pub secondary_key: String,
    pub length: String,
    pub size: f64,
    pub raw_line: String,
    pub line_number: usize,
}

impl Record {
    pub fn parse(line: &str, line_number: usize) -> Result<Record, FilterError> {
        let raw_line = line.trim_end_matches(['\r', '\n']).to_string();
        let fields: Vec<&str> = raw_line
            .trim_matches(['\r', '\n', '\t'])
            .split('\t')
            .collect();
        if fields.len() < MIN_FIELDS {
            return Err(FilterError::MalformedRecord {
                line: line_number,
                reason: format!("expected at least {} fields, found {}", MIN_FIELDS, fields.len()),
                raw: raw_line,
            });
        }
        let size = match fields[3].trim().parse::<f64>() {
            Ok(size) if size.is_finite() => size,
            Ok(size) => {
                return Err(FilterError::MalformedRecord {
                    line: line_number,
                    reason: format!("size column {:?} is not a finite number ({})", fields[3].trim(), size),
                    raw: raw_line,
                })
            }
            Err(x) => {
                return Err(FilterError::MalformedRecord {
                    line: line_number,
                    reason: format!("size column {:?} is not a number ({})", fields[3].trim(), x),
                    raw: raw_line,
                })
            }
        };
        Ok(Record {
            primary_key: fields[0].to_string(),
            secondary_key: fields[1].to_string(),
            length: fields[2].to_string(),
            size,
            raw_line,
            line_number,
        })
    }

    // first 9 characters of the secondary key
    pub fn prefix(&self) -> &str {
        key_prefix(&self.secondary_key)
    }
}

pub fn key_prefix(key: &str) -> &str {
    match key.char_indices().nth(PREFIX_CHARS) {
        Some((end, _)) => &key[..end],
        None => key,
    }
}
