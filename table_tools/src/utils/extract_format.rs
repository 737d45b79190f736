/*
    Replace every VCF sample column with one sub-field of its FORMAT column

        FORMAT      GT:AD:DP:GQ:PL
        samples     .:0,0:0:.:0,0   0:4,0:4:99:0,169   1:0,25:25:99:1078,0
        field AD    0,0             4,0                0,25

    + lines starting with '#' are copied as they are
    + lines without a FORMAT column are copied with a "---->" mark
    + a field missing from FORMAT falls back to the first sub-field
*/

use std::path::{Path, PathBuf};
use std::time::Instant;
use log::{debug, info, warn};

use super::error::ToolError;
use super::struct_helper::{chomp, sibling_with_suffix, FileBufferHelper, LineWriter};

const SHORT_LINE_MARK: &str = "---->";
const MISSING_VALUE: &str = ".";

pub fn output_path(infile: &Path, field: &str) -> PathBuf {
    sibling_with_suffix(infile, &format!("_{}extract", field), "vcf")
}

pub fn field_index(format: &str, field: &str) -> Option<usize> {
    format.split(':').position(|name| name == field)
}

// returns the rewritten line and whether `field` was present in FORMAT
pub fn extract_line(line: &str, format_column: usize, field: &str) -> (String, bool) {
    let line = line.trim();
    if line.starts_with('#') {
        return (line.to_string(), true);
    }
    let mut columns: Vec<&str> = line.split('\t').collect();
    if columns.len() <= format_column {
        return (format!("{}{}", SHORT_LINE_MARK, line), true);
    }
    let found = field_index(columns[format_column], field);
    let index = found.unwrap_or(0);
    for sample in columns.iter_mut().skip(format_column + 1) {
        let value: &str = *sample;
        *sample = value.split(':').nth(index).unwrap_or(MISSING_VALUE);
    }
    (columns.join("\t"), found.is_some())
}

pub fn extract(infile: &Path, format_column: usize, field: &str) -> Result<PathBuf, ToolError> {
    let start_time = Instant::now();
    let mut reader = FileBufferHelper::new(infile)?;
    let outfile = output_path(infile, field);
    let mut writer = LineWriter::create(&outfile)?;
    let mut missing = 0usize;
    let lines = reader.for_each_line(|line| {
        let (rewritten, found) = extract_line(chomp(line), format_column, field);
        if !found {
            debug!("{} not in FORMAT of {}", field, rewritten);
            missing += 1;
        }
        writer.write_line(&rewritten)
    })?;
    writer.finish()?;
    if missing > 0 {
        warn!("{} lines had no {} in FORMAT, their first sub-field was used", missing, field);
    }
    info!("Extracted {} lines in {:.3} sec into {:?}", lines, start_time.elapsed().as_secs_f64(), outfile);
    Ok(outfile)
}
