/*
    Filter a gene table block by block
        records: gene, secondary key, length, size (tab separated)
        consecutive records with the same gene form a block
        a block is written only when it ends up with exactly max_genes
        entries, one per distinct secondary key prefix
        everything else goes to the drop file, marked with the reason

    Output files
        given outfile X.txt: accepted in X.txt, dropped in X_drop.txt
        otherwise: <infile stem>_out.txt and <infile stem>_out_drop.txt
*/

use std::path::{Path, PathBuf};
use log::debug;
pub mod lib_utils;

pub use lib_utils::block::{Block, Ingestion};
pub use lib_utils::driver::{BlockFilter, MalformedPolicy, DEFAULT_MAX_GENES, DEFAULT_SIZE_LIMIT};
pub use lib_utils::error::{AbortedRun, FilterError};
pub use lib_utils::output::{FilterSummary, OutputWriter};
pub use lib_utils::record::Record;
pub use lib_utils::resolver::{BlockReport, RejectReason, Routed, Verdict};

const TABLE_EXTENSION: &str = "txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPaths {
    pub infile: PathBuf,
    pub accepted: PathBuf,
    pub rejected: PathBuf,
}

// names without a .txt extension get one
pub fn with_table_extension(file: &Path) -> PathBuf {
    if file.extension().map_or(false, |ext| ext == TABLE_EXTENSION) {
        file.to_path_buf()
    } else {
        let mut name = file.as_os_str().to_os_string();
        name.push(".");
        name.push(TABLE_EXTENSION);
        PathBuf::from(name)
    }
}

fn with_suffix(file: &Path, suffix: &str) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    file.with_file_name(format!("{}{}.{}", stem, suffix, TABLE_EXTENSION))
}

pub fn derive_paths(infile: &Path, outfile: Option<&Path>) -> FilterPaths {
    let infile = with_table_extension(infile);
    let paths = match outfile {
        Some(outfile) => {
            let accepted = with_table_extension(outfile);
            let rejected = with_suffix(&accepted, "_drop");
            FilterPaths { infile, accepted, rejected }
        }
        None => {
            let accepted = with_suffix(&infile, "_out");
            let rejected = with_suffix(&infile, "_out_drop");
            FilterPaths { infile, accepted, rejected }
        }
    };
    debug!("Resolved paths {:?}", paths);
    paths
}
