/*
    Sort the ALLELE:FREQ columns of every line by frequency

    CHROM       POS     N_ALLELES  N_CHR  {ALLELE:FREQ}
    Bgt_chr-01  3895640 3          219    A:0.00913242  G:0.0273973  *:0.96347
    becomes
    Bgt_chr-01  3895640 3          219    *:0.96347  G:0.0273973  A:0.00913242

    + columns before `start_col` are left untouched
    + frequencies are compared as numbers when both parse, as text otherwise
    + equal frequencies keep their order
*/

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::Instant;
use log::info;

use super::error::ToolError;
use super::struct_helper::{chomp, FileBufferHelper, LineWriter};

const ALLELE_SEPARATOR: char = ':';

pub fn output_path(infile: &Path) -> PathBuf {
    let mut name = infile.as_os_str().to_os_string();
    name.push("_out");
    PathBuf::from(name)
}

fn frequency(entry: &str) -> &str {
    entry.split_once(ALLELE_SEPARATOR).map_or("", |(_, freq)| freq.trim())
}

pub fn compare_frequency(a: &str, b: &str) -> Ordering {
    let (fa, fb) = (frequency(a), frequency(b));
    match (fa.parse::<f64>(), fb.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => fa.cmp(fb),
    }
}

pub fn sort_line(line: &str, start_col: usize, descending: bool) -> String {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() <= start_col {
        return line.to_string();
    }
    let mut entries: Vec<&str> = fields[start_col..].iter().map(|e| e.trim()).collect();
    if descending {
        entries.sort_by(|a, b| compare_frequency(b, a));
    } else {
        entries.sort_by(|a, b| compare_frequency(a, b));
    }
    let mut sorted = fields[..start_col].to_vec();
    sorted.extend(entries);
    sorted.join("\t")
}

pub fn sort(infile: &Path, start_col: usize, descending: bool) -> Result<PathBuf, ToolError> {
    let start_time = Instant::now();
    let mut reader = FileBufferHelper::new(infile)?;
    let outfile = output_path(infile);
    let mut writer = LineWriter::create(&outfile)?;
    let lines = reader.for_each_line(|line| writer.write_line(&sort_line(chomp(line), start_col, descending)))?;
    writer.finish()?;
    info!("File sorted ({} lines)", lines);
    info!("Time elapsed: {:.3} seconds", start_time.elapsed().as_secs_f64());
    Ok(outfile)
}
