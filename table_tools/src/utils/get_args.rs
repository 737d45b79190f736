use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Column rewrites for VCF and allele tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replace VCF sample columns with one FORMAT sub-field
    ExtractFormat(ExtractFormatArgs),
    /// Append the lengths of selected columns, largest first
    FindLength(FindLengthArgs),
    /// Replace every gene line with the details line containing it
    Complete(CompleteArgs),
    /// Sort ALLELE:FREQ columns by frequency
    SortAlleles(SortAllelesArgs),
}

#[derive(Args)]
pub struct ExtractFormatArgs {
    /// VCF file
    #[arg(short='i', long="infile", required = true)]
    pub infile: PathBuf,
    /// Zero based index of the FORMAT column. Default: 8
    #[arg(short='c', long="format-column", default_value_t=8)]
    pub format_column: usize,
    /// FORMAT sub-field to keep (GT, AD, DP, GQ, PL, ...). Default: GT
    #[arg(short='f', long="field", value_parser=validate_field, default_value_t=String::from("GT"))]
    pub field: String,
}

#[derive(Args)]
pub struct FindLengthArgs {
    /// Tab separated file
    #[arg(short='i', long="infile", required = true)]
    pub infile: PathBuf,
    /// Zero based columns to measure. Default: 3,4,5
    #[arg(short='c', long="columns", value_delimiter=',', default_values_t=[3usize, 4, 5])]
    pub columns: Vec<usize>,
    /// Characters not counted in the lengths. Default: ",.*"
    #[arg(short='x', long="ignore", default_value_t=String::from(",.*"))]
    pub ignore: String,
}

#[derive(Args)]
pub struct CompleteArgs {
    /// File with the gene lines
    #[arg(short='g', long="gene-file", required = true)]
    pub gene_file: PathBuf,
    /// File with the gene lines plus their details
    #[arg(short='d', long="details-file", required = true)]
    pub details_file: PathBuf,
    /// Leave gene lines without details out of the output
    #[arg(long="skip-missing")]
    pub skip_missing: bool,
}

#[derive(Args)]
pub struct SortAllelesArgs {
    /// Tab separated allele frequency table
    #[arg(short='i', long="infile", required = true)]
    pub infile: PathBuf,
    /// Zero based column where the ALLELE:FREQ entries start. Default: 4
    #[arg(short='s', long="start-col", default_value_t=4)]
    pub start_col: usize,
    /// Smallest frequency first
    #[arg(long="ascending")]
    pub ascending: bool,
}

fn validate_field(input_str: &str) -> Result<String, String> {
    let field = input_str.trim();
    if field.is_empty() || field.contains(':') {
        Err(String::from("Field must be a single FORMAT key such as GT/AD/DP/GQ/PL"))
    } else {
        Ok(field.to_string())
    }
}
