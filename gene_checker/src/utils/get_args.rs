use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use block_filter::{MalformedPolicy, DEFAULT_MAX_GENES, DEFAULT_SIZE_LIMIT};

#[derive(Parser)]
#[command(author, version, about = "Keep gene blocks holding exactly max-gene distinct entries", long_about = None)]
pub struct Cli {
    /// Tab separated gene table (gene, secondary key, length, size). ".txt" is appended when missing
    #[arg(short='i', long="infile", required = true)]
    pub infile: PathBuf,
    /// File for the accepted blocks. Dropped lines go to the same name with "_drop". Default: <infile>_out.txt
    #[arg(short='o', long="outfile")]
    pub outfile: Option<PathBuf>,
    /// Number of distinct genes every block must hold. Default: 54
    #[arg(short='g', long="max-gene", value_parser=validate_max_gene, default_value_t=DEFAULT_MAX_GENES)]
    pub max_gene: usize,
    /// Largest size ratio between two variants of the same gene that is still accepted. Default: 1e-50
    #[arg(short='l', long="size-limit", value_parser=validate_size_limit, default_value_t=DEFAULT_SIZE_LIMIT)]
    pub size_limit: f64,
    /// Threads resolving blocks. Output order does not depend on it. Default: 1
    #[arg(short='n', long="threads", default_value_t=1)]
    pub nproc: usize,
    /// What to do with rows that cannot be parsed
    #[arg(short='m', long="malformed", value_enum, default_value_t=Malformed::Abort)]
    pub malformed: Malformed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Malformed {
    /// Stop at the first bad row
    Abort,
    /// Send bad rows to the drop file and continue
    Skip,
}

impl From<Malformed> for MalformedPolicy {
    fn from(mode: Malformed) -> Self {
        match mode {
            Malformed::Abort => MalformedPolicy::Abort,
            Malformed::Skip => MalformedPolicy::Skip,
        }
    }
}

fn validate_max_gene(input_str: &str) -> Result<usize, String> {
    match input_str.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("max-gene must be a positive integer, got {}", input_str)),
    }
}

fn validate_size_limit(input_str: &str) -> Result<f64, String> {
    match input_str.parse::<f64>() {
        Ok(limit) if limit.is_finite() && limit > 0f64 => Ok(limit),
        _ => Err(format!("size-limit must be a positive number, got {}", input_str)),
    }
}
