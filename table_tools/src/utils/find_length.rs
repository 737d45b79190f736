/*
    Append the lengths of some columns to every line
        + characters listed in `ignore` are not counted
        + lengths are written largest first
        + lines starting with '#' are copied as they are
        + lines too short to hold every selected column are left out
*/

use std::path::{Path, PathBuf};
use std::time::Instant;
use log::{debug, info};

use super::error::ToolError;
use super::struct_helper::{chomp, sibling_with_suffix, FileBufferHelper, LineWriter};

pub fn output_path(infile: &Path) -> PathBuf {
    sibling_with_suffix(infile, "_out", "txt")
}

pub fn counted_length(value: &str, ignore: &str) -> usize {
    value.chars().filter(|c| !ignore.contains(*c)).count()
}

pub fn append_lengths(line: &str, columns: &[usize], ignore: &str) -> Option<String> {
    if line.starts_with('#') {
        return Some(line.trim().to_string());
    }
    let fields: Vec<&str> = line.split('\t').collect();
    if columns.iter().any(|&col| col >= fields.len()) {
        return None;
    }
    let mut lengths: Vec<usize> = columns.iter().map(|&col| counted_length(fields[col], ignore)).collect();
    lengths.sort_unstable_by(|a, b| b.cmp(a));
    let appended = lengths.iter().map(|n| format!("\t{}", n)).collect::<String>();
    Some(format!("{}{}", line.trim(), appended))
}

pub fn find(infile: &Path, columns: &[usize], ignore: &str) -> Result<PathBuf, ToolError> {
    let start_time = Instant::now();
    let mut reader = FileBufferHelper::new(infile)?;
    let outfile = output_path(infile);
    let mut writer = LineWriter::create(&outfile)?;
    let mut skipped = 0usize;
    let lines = reader.for_each_line(|line| match append_lengths(chomp(line), columns, ignore) {
        Some(extended) => writer.write_line(&extended),
        None => {
            debug!("Line too short for columns {:?}: {}", columns, chomp(line));
            skipped += 1;
            Ok(())
        }
    })?;
    let written = writer.finish()?;
    info!("Finished {} lines ({} written, {} too short) in {:.3} sec",
        lines, written, skipped, start_time.elapsed().as_secs_f64());
    Ok(outfile)
}
