/*
    Complete the lines of a gene file with the matching line of a details file
        + a details line matches when it contains the whole gene line
        + the first matching details line is written in place of the gene line
        + gene lines without a match are written with a row of asterisks,
          unless they are skipped
*/

use std::path::{Path, PathBuf};
use std::time::Instant;
use log::{info, warn};

use super::error::ToolError;
use super::struct_helper::{FileBufferHelper, LineWriter};

const NOT_FOUND_MARK: &str = "*****************************************";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Completion {
    pub outfile: PathBuf,
    pub matched: usize,
    pub not_found: Vec<String>,
}

pub fn output_path(gene_file: &Path) -> PathBuf {
    let mut name = gene_file.as_os_str().to_os_string();
    name.push("_out");
    PathBuf::from(name)
}

pub fn find_match<'a>(gene_line: &str, details: &'a [String]) -> Option<&'a str> {
    details.iter().map(|d| d.as_str()).find(|d| d.contains(gene_line))
}

pub fn complete(gene_file: &Path, details_file: &Path, include_not_found: bool) -> Result<Completion, ToolError> {
    let start_time = Instant::now();
    let mut genes = FileBufferHelper::new(gene_file)?;
    let details: Vec<String> = FileBufferHelper::new(details_file)?
        .read_all()?
        .iter()
        .map(|line| line.trim().to_string())
        .collect();
    let outfile = output_path(gene_file);
    let mut writer = LineWriter::create(&outfile)?;
    let mut completion = Completion { outfile: outfile.clone(), ..Completion::default() };
    genes.for_each_line(|line| {
        let gene_line = line.trim();
        match find_match(gene_line, &details) {
            Some(found) => {
                completion.matched += 1;
                writer.write_line(found)
            }
            None => {
                completion.not_found.push(gene_line.to_string());
                if include_not_found {
                    writer.write_line(&format!("{}\t{}", gene_line, NOT_FOUND_MARK))
                } else {
                    Ok(())
                }
            }
        }
    })?;
    writer.finish()?;
    info!("Finished in {:.3} sec", start_time.elapsed().as_secs_f64());
    if completion.not_found.is_empty() {
        info!("For all lines in {:?} at least one match was found in {:?}", gene_file, details_file);
    } else {
        warn!("The following {} lines of {:?} were not found in {:?}",
            completion.not_found.len(), gene_file, details_file);
        for (idx, line) in completion.not_found.iter().enumerate() {
            warn!("{:<3}. {}", idx + 1, line);
        }
        let included = if include_not_found { "" } else { " NOT" };
        warn!("The 'not found' lines are{} included in the output file", included);
    }
    Ok(completion)
}
