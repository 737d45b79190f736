/*
Filter a tab separated gene table block by block
    + a block is every consecutive line with the same gene in column 1
    + inside a block, the first 9 characters of column 2 name the entry
        + repeated entries must agree on size (column 4), else the block is dropped
        + the block must end with exactly max-gene distinct entries
        + surplus entries keep the smallest size
    + accepted blocks go to <outfile>, everything else to <outfile>_drop

Implement clap to parse cli

Arguments
    get path to gene table
    optional output file
    max-gene, size-limit, threads, malformed row handling
*/

mod utils;
use clap::Parser;
use utils::get_args::Cli;
use block_filter::{derive_paths, BlockFilter};
use log::{debug, error, info};
use env_logger;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    debug!("Parsing commandline arguments");
    let paths = derive_paths(&cli.infile, cli.outfile.as_deref());
    if !paths.infile.is_file() {
        error!("File path {:?} does not exist", paths.infile);
        std::process::exit(1);
    }
    let mut filter = BlockFilter::new(cli.max_gene);
    filter.set_size_limit(cli.size_limit);
    filter.set_threads(cli.nproc);
    filter.set_malformed_policy(cli.malformed.into());
    info!("Filtering {:?} with max-gene {} and size-limit {:e}", paths.infile, filter.max_genes(), filter.size_limit());
    match filter.filter_file(&paths.infile, &paths.accepted, &paths.rejected) {
        Ok(summary) => {
            info!("Blocks written: {}. Blocks dropped: {}. Lines processed: {}",
                summary.blocks_written, summary.blocks_dropped, summary.records_processed);
            info!("Time needed: {:.1} seconds ({:.3} ms per line)",
                summary.elapsed.as_secs_f64(), summary.ms_per_record());
            info!("Filtered data in file {:?}", paths.accepted);
            info!("Dropped data in file {:?}", paths.rejected);
        }
        Err(aborted) => {
            error!("{}", aborted);
            error!("Run did not complete: {} blocks written and {} dropped before the failure. \
                    {:?} and {:?} are incomplete",
                    aborted.summary.blocks_written, aborted.summary.blocks_dropped,
                    paths.accepted, paths.rejected);
            std::process::exit(1);
        }
    }
}
