/*
Column rewrites for VCF files and tab separated allele tables

Subcommands
    extract-format: keep one FORMAT sub-field in every sample column
    find-length: append the lengths of selected columns, largest first
    complete: replace gene lines with the details line that contains them
    sort-alleles: sort ALLELE:FREQ columns by frequency

Every subcommand writes a new file next to its input.
*/

mod utils;
use clap::Parser;
use log::{debug, error, info};
use utils::get_args::{Cli, Command};
use utils::{complete_file, extract_format, find_length, sort_alleles};

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    debug!("Parsing commandline arguments");
    let outcome = match cli.command {
        Command::ExtractFormat(args) => {
            extract_format::extract(&args.infile, args.format_column, &args.field)
        }
        Command::FindLength(args) => {
            find_length::find(&args.infile, &args.columns, &args.ignore)
        }
        Command::Complete(args) => {
            complete_file::complete(&args.gene_file, &args.details_file, !args.skip_missing)
                .map(|completion| completion.outfile)
        }
        Command::SortAlleles(args) => {
            sort_alleles::sort(&args.infile, args.start_col, !args.ascending)
        }
    };
    match outcome {
        Ok(outfile) => info!("Output written to {:?}", outfile),
        Err(x) => {
            error!("{}", x);
            std::process::exit(1);
        }
    }
}
