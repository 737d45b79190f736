// struct to handle file buffers

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use log::{debug, trace};

use super::error::FilterError;
use super::record::Record;

pub struct FileBufferHelper<R> {
    pub path: PathBuf,
    pub buffer_reader: R,
    pub line: String,
    pub line_number: usize,
    exhausted: bool,
}

impl FileBufferHelper<BufReader<File>> {
    pub fn open(file: &Path) -> Result<Self, FilterError> {
        let file_open = File::open(file).map_err(|source| FilterError::UnreadableSource {
            path: file.to_path_buf(),
            source,
        })?;
        debug!("FileHelper created for: {:?}", file);
        Ok(Self::from_reader(BufReader::new(file_open), file))
    }
}

impl<R: BufRead> FileBufferHelper<R> {
    pub fn from_reader(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            buffer_reader: reader,
            line: String::new(),
            line_number: 0,
            exhausted: false,
        }
    }
}

// yields one parsed record per non-blank line, stops after the first read failure
impl<R: BufRead> Iterator for FileBufferHelper<R> {
    type Item = Result<Record, FilterError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            self.line.clear();
            match self.buffer_reader.read_line(&mut self.line) {
                Ok(0) => self.exhausted = true,
                Ok(_) => {
                    self.line_number += 1;
                    if self.line.trim().is_empty() {
                        trace!("Skipping blank line {}", self.line_number);
                        continue;
                    }
                    return Some(Record::parse(&self.line, self.line_number));
                }
                Err(source) => {
                    self.exhausted = true;
                    return Some(Err(FilterError::UnreadableSource {
                        path: self.path.clone(),
                        source,
                    }));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn counts_lines_including_blank_ones() {
        let input = "G1\ta\t1\t0\n\nG2\tb\t1\t0";
        let records: Vec<Record> = FileBufferHelper::from_reader(Cursor::new(input), "<memory>")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line_number, 1);
        assert_eq!(records[1].line_number, 3);
        assert_eq!(records[1].raw_line, "G2\tb\t1\t0");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let missing = Path::new("/definitely/not/here.txt");
        assert!(matches!(
            FileBufferHelper::open(missing),
            Err(FilterError::UnreadableSource { .. })
        ));
    }
}
