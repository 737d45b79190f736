// structs to handle file buffers

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use log::debug;

use super::error::ToolError;

pub struct FileBufferHelper {
    pub path: PathBuf,
    pub buffer_reader: BufReader<File>,
    pub line: String,
}

impl FileBufferHelper {
    pub fn new(file: &Path) -> Result<FileBufferHelper, ToolError> {
        if !file.is_file() {
            return Err(ToolError::NotFound(file.to_path_buf()));
        }
        let file_open = File::open(file).map_err(|source| ToolError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        debug!("FileHelper created for: {:?}", file);
        Ok(Self {
            path: file.to_path_buf(),
            buffer_reader: BufReader::new(file_open),
            line: String::new(),
        })
    }

    // call `handle` with every line (terminator included), returns the line count
    pub fn for_each_line<F>(&mut self, mut handle: F) -> Result<usize, ToolError>
    where
        F: FnMut(&str) -> Result<(), ToolError>,
    {
        let mut count = 0usize;
        loop {
            self.line.clear();
            let read = self.buffer_reader.read_line(&mut self.line).map_err(|source| ToolError::Read {
                path: self.path.clone(),
                source,
            })?;
            if read == 0 {
                break;
            }
            count += 1;
            handle(&self.line)?;
        }
        Ok(count)
    }

    pub fn read_all(mut self) -> Result<Vec<String>, ToolError> {
        let mut lines = Vec::new();
        self.for_each_line(|line| {
            lines.push(line.to_string());
            Ok(())
        })?;
        Ok(lines)
    }
}

pub struct LineWriter {
    pub path: PathBuf,
    writer: BufWriter<File>,
    pub written: usize,
}

impl LineWriter {
    // overwrites the file when it exists
    pub fn create(file: &Path) -> Result<LineWriter, ToolError> {
        let out = File::create(file).map_err(|source| ToolError::Write {
            path: file.to_path_buf(),
            source,
        })?;
        Ok(LineWriter {
            path: file.to_path_buf(),
            writer: BufWriter::new(out),
            written: 0,
        })
    }

    pub fn write_line(&mut self, line: &str) -> Result<(), ToolError> {
        writeln!(self.writer, "{}", line).map_err(|source| ToolError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize, ToolError> {
        self.writer.flush().map_err(|source| ToolError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.written)
    }
}

// strip the newline left by read_line
pub fn chomp(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

// file name with a suffix placed before `extension` when the name carries it,
// appended to the whole name otherwise
pub fn sibling_with_suffix(file: &Path, suffix: &str, extension: &str) -> PathBuf {
    let name = file.file_name().unwrap_or_default().to_string_lossy();
    let dotted = format!(".{}", extension);
    let new_name = match name.strip_suffix(&dotted) {
        Some(stem) => format!("{}{}{}", stem, suffix, dotted),
        None => format!("{}{}", name, suffix),
    };
    file.with_file_name(new_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_goes_before_known_extension() {
        assert_eq!(sibling_with_suffix(Path::new("d/a.txt"), "_out", "txt"), PathBuf::from("d/a_out.txt"));
        assert_eq!(sibling_with_suffix(Path::new("d/a.tsv"), "_out", "txt"), PathBuf::from("d/a.tsv_out"));
        assert_eq!(sibling_with_suffix(Path::new("a"), "_out", "txt"), PathBuf::from("a_out"));
    }

    #[test]
    fn chomp_keeps_inner_whitespace() {
        assert_eq!(chomp("a\tb \r\n"), "a\tb ");
        assert_eq!(chomp("\ta"), "\ta");
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            FileBufferHelper::new(Path::new("/no/such/file")),
            Err(ToolError::NotFound(_))
        ));
    }
}
