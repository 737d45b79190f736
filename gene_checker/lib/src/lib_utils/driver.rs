/*
    Stream driver
        read records in file order
        group consecutive records with the same gene into a block
        resolve every sealed block, then write it out
        flush the last pending block at the end of the input

    With more than one thread, sealed blocks are resolved on a threadpool.
    Results come back tagged with their block number and are written in
    input order by this thread only.
*/

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use log::{debug, info, warn};
use threadpool::ThreadPool;

use super::block::Block;
use super::error::{AbortedRun, FilterError};
use super::output::{FilterSummary, OutputWriter};
use super::record::Record;
use super::resolver::{route, Routed};
use super::struct_helper::FileBufferHelper;

pub const DEFAULT_MAX_GENES: usize = 54;
pub const DEFAULT_SIZE_LIMIT: f64 = 1e-50;
// sealed blocks allowed in flight per worker before the reader waits
const IN_FLIGHT_PER_THREAD: usize = 4;
const WORKER_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone)]
pub struct BlockFilter {
    max_genes: usize,
    size_limit: f64,
    nproc: usize,
    malformed: MalformedPolicy,
}

impl Default for BlockFilter {
    fn default() -> Self {
        BlockFilter::new(DEFAULT_MAX_GENES)
    }
}

enum Admitted {
    Record(Record),
    Stray(Routed),
}

// open block plus the logic deciding when it gets sealed
struct Grouper {
    size_limit: f64,
    open: Option<Block>,
}

impl Grouper {
    // returns the block sealed by a change of gene, if any
    fn push(&mut self, record: Record) -> Option<Block> {
        if let Some(block) = self.open.as_mut() {
            if block.key == record.primary_key {
                block.ingest(record, self.size_limit);
                return None;
            }
        }
        self.open.replace(Block::new(record))
    }

    fn finish(&mut self) -> Option<Block> {
        self.open.take()
    }
}

// holds results that arrived ahead of their turn
struct Reorder {
    next: usize,
    pending: BTreeMap<usize, Routed>,
}

impl Reorder {
    fn flush<A: std::io::Write, R: std::io::Write>(
        &mut self,
        output: &mut OutputWriter<A, R>,
    ) -> Result<(), FilterError> {
        while let Some(routed) = self.pending.remove(&self.next) {
            output.write(routed)?;
            self.next += 1;
        }
        Ok(())
    }
}

impl BlockFilter {
    pub fn new(max_genes: usize) -> Self {
        BlockFilter {
            max_genes,
            size_limit: DEFAULT_SIZE_LIMIT,
            nproc: 1,
            malformed: MalformedPolicy::Abort,
        }
    }

    pub fn max_genes(&self) -> usize {
        self.max_genes
    }

    pub fn set_max_genes(&mut self, max_genes: usize) {
        self.max_genes = max_genes;
    }

    pub fn size_limit(&self) -> f64 {
        self.size_limit
    }

    pub fn set_size_limit(&mut self, size_limit: f64) {
        self.size_limit = size_limit;
    }

    pub fn threads(&self) -> usize {
        self.nproc
    }

    pub fn set_threads(&mut self, nproc: usize) {
        self.nproc = nproc.max(1);
    }

    pub fn malformed_policy(&self) -> MalformedPolicy {
        self.malformed
    }

    pub fn set_malformed_policy(&mut self, policy: MalformedPolicy) {
        self.malformed = policy;
    }

    pub fn filter_file(&self, infile: &Path, accepted: &Path, rejected: &Path) -> Result<FilterSummary, AbortedRun> {
        let abort = |source| AbortedRun { summary: FilterSummary::default(), source };
        let records = FileBufferHelper::open(infile).map_err(abort)?;
        let mut output = OutputWriter::create(accepted, rejected).map_err(abort)?;
        info!("Started filtering {:?}", infile);
        self.run(records, &mut output)
    }

    pub fn run<I, A, R>(&self, records: I, output: &mut OutputWriter<A, R>) -> Result<FilterSummary, AbortedRun>
    where
        I: IntoIterator<Item = Result<Record, FilterError>>,
        A: std::io::Write,
        R: std::io::Write,
    {
        let start_time = Instant::now();
        let mut processed = 0usize;
        let streamed = if self.nproc > 1 {
            self.run_pooled(records, output, &mut processed)
        } else {
            self.run_sequential(records, output, &mut processed)
        };
        let outcome = streamed.and_then(|_| output.flush());
        let mut summary = output.summary().clone();
        summary.records_processed = processed;
        summary.elapsed = start_time.elapsed();
        match outcome {
            Ok(()) => {
                summary.completed = true;
                info!("Blocks written: {}. Blocks dropped: {}", summary.blocks_written, summary.blocks_dropped);
                Ok(summary)
            }
            Err(source) => {
                // partial output stays on disk, the caller is told it is incomplete
                if let Err(flush_error) = output.flush() {
                    warn!("Partial output could not be flushed: {}", flush_error);
                }
                Err(AbortedRun { summary, source })
            }
        }
    }

    fn admit(&self, item: Result<Record, FilterError>) -> Result<Admitted, FilterError> {
        match item {
            Ok(record) => Ok(Admitted::Record(record)),
            Err(FilterError::MalformedRecord { line, reason, raw }) if self.malformed == MalformedPolicy::Skip => {
                warn!("Skipping line {}: {}", line, reason);
                Ok(Admitted::Stray(Routed::stray(raw)))
            }
            Err(x) => Err(x),
        }
    }

    fn run_sequential<I, A, R>(&self, records: I, output: &mut OutputWriter<A, R>, processed: &mut usize) -> Result<(), FilterError>
    where
        I: IntoIterator<Item = Result<Record, FilterError>>,
        A: std::io::Write,
        R: std::io::Write,
    {
        let mut grouper = Grouper { size_limit: self.size_limit, open: None };
        for item in records {
            *processed += 1;
            match self.admit(item)? {
                Admitted::Record(record) => {
                    if let Some(sealed) = grouper.push(record) {
                        output.write(route(sealed, self.max_genes))?;
                    }
                }
                Admitted::Stray(routed) => output.write(routed)?,
            }
        }
        if let Some(last) = grouper.finish() {
            output.write(route(last, self.max_genes))?;
        }
        Ok(())
    }

    fn run_pooled<I, A, R>(&self, records: I, output: &mut OutputWriter<A, R>, processed: &mut usize) -> Result<(), FilterError>
    where
        I: IntoIterator<Item = Result<Record, FilterError>>,
        A: std::io::Write,
        R: std::io::Write,
    {
        let pool = ThreadPool::new(self.nproc);
        let (tx, rx) = mpsc::channel::<(usize, Routed)>();
        let window = self.nproc * IN_FLIGHT_PER_THREAD;
        let mut grouper = Grouper { size_limit: self.size_limit, open: None };
        let mut reorder = Reorder { next: 0, pending: BTreeMap::new() };
        let mut issued = 0usize;
        debug!("Resolving blocks on {} threads", self.nproc);

        let submit = |block: Block, seq: usize| {
            let tx = tx.clone();
            let max_genes = self.max_genes;
            pool.execute(move || {
                let _ = tx.send((seq, route(block, max_genes)));
            });
        };

        for item in records {
            *processed += 1;
            match self.admit(item)? {
                Admitted::Record(record) => {
                    if let Some(sealed) = grouper.push(record) {
                        submit(sealed, issued);
                        issued += 1;
                    }
                }
                Admitted::Stray(routed) => {
                    reorder.pending.insert(issued, routed);
                    issued += 1;
                }
            }
            while let Ok((seq, routed)) = rx.try_recv() {
                reorder.pending.insert(seq, routed);
            }
            reorder.flush(output)?;
            while issued - reorder.next > window {
                let (seq, routed) = next_result(&rx, &pool, reorder.next)?;
                reorder.pending.insert(seq, routed);
                reorder.flush(output)?;
            }
        }
        if let Some(last) = grouper.finish() {
            submit(last, issued);
            issued += 1;
        }
        reorder.flush(output)?;
        while reorder.next < issued {
            let (seq, routed) = next_result(&rx, &pool, reorder.next)?;
            reorder.pending.insert(seq, routed);
            reorder.flush(output)?;
        }
        pool.join();
        Ok(())
    }
}

fn next_result(rx: &Receiver<(usize, Routed)>, pool: &ThreadPool, waiting_for: usize) -> Result<(usize, Routed), FilterError> {
    loop {
        match rx.recv_timeout(WORKER_POLL) {
            Ok(result) => return Ok(result),
            Err(RecvTimeoutError::Timeout) if pool.panic_count() == 0 => continue,
            Err(_) => return Err(FilterError::WorkerLost(waiting_for + 1)),
        }
    }
}
