// accepted and rejected streams, plus the run tallies they produce

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::{info, warn};

use super::error::FilterError;
use super::resolver::{Routed, Verdict};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSummary {
    pub blocks_written: usize,
    pub blocks_dropped: usize,
    pub records_processed: usize,
    pub records_accepted: usize,
    pub records_rejected: usize,
    pub malformed_skipped: usize,
    pub elapsed: Duration,
    pub completed: bool,
}

impl FilterSummary {
    pub fn ms_per_record(&self) -> f64 {
        if self.records_processed == 0 {
            0.0
        } else {
            self.elapsed.as_secs_f64() * 1000.0 / self.records_processed as f64
        }
    }
}

struct Destination<W> {
    path: PathBuf,
    writer: W,
}

impl<W: Write> Destination<W> {
    fn write_line(&mut self, marker: &str, line: &str) -> Result<(), FilterError> {
        writeln!(self.writer, "{}{}", marker, line).map_err(|source| self.failed(source))
    }

    fn flush(&mut self) -> Result<(), FilterError> {
        self.writer.flush().map_err(|source| self.failed(source))
    }

    fn failed(&self, source: io::Error) -> FilterError {
        FilterError::UnwritableDestination {
            path: self.path.clone(),
            source,
        }
    }
}

pub struct OutputWriter<A, R> {
    accepted: Destination<A>,
    rejected: Destination<R>,
    summary: FilterSummary,
}

impl OutputWriter<BufWriter<File>, BufWriter<File>> {
    pub fn create(accepted: &Path, rejected: &Path) -> Result<Self, FilterError> {
        let open = |path: &Path| {
            File::create(path)
                .map(BufWriter::new)
                .map_err(|source| FilterError::UnwritableDestination {
                    path: path.to_path_buf(),
                    source,
                })
        };
        Ok(Self::with_paths(open(accepted)?, accepted, open(rejected)?, rejected))
    }
}

impl<A: Write, R: Write> OutputWriter<A, R> {
    pub fn new(accepted: A, rejected: R) -> Self {
        Self::with_paths(accepted, "<accepted>", rejected, "<rejected>")
    }

    pub fn with_paths(
        accepted: A,
        accepted_path: impl AsRef<Path>,
        rejected: R,
        rejected_path: impl AsRef<Path>,
    ) -> Self {
        OutputWriter {
            accepted: Destination { path: accepted_path.as_ref().to_path_buf(), writer: accepted },
            rejected: Destination { path: rejected_path.as_ref().to_path_buf(), writer: rejected },
            summary: FilterSummary::default(),
        }
    }

    pub fn write(&mut self, routed: Routed) -> Result<(), FilterError> {
        for line in &routed.accepted {
            self.accepted.write_line("", line)?;
        }
        for (reason, line) in &routed.rejected {
            self.rejected.write_line(reason.marker(), line)?;
        }
        self.summary.records_accepted += routed.accepted.len();
        self.summary.records_rejected += routed.rejected.len();
        match routed.report {
            Some(report) => {
                let span = report.last_line + 1 - report.first_line;
                match report.verdict {
                    Verdict::KeepWhole => {
                        info!("Lines written {}-{} ({})", report.first_line, report.last_line, span);
                        self.summary.blocks_written += 1;
                    }
                    Verdict::KeepRepaired { .. } => {
                        info!("Lines written {}-{} ({}/{})", report.first_line, report.last_line,
                            report.written, report.dropped);
                        self.summary.blocks_written += 1;
                    }
                    Verdict::Drop(reason) => {
                        info!("Lines dropped {}-{} ({}) {:?}", report.first_line, report.last_line,
                            span, reason);
                        self.summary.blocks_dropped += 1;
                    }
                }
            }
            None => {
                warn!("Skipped {} malformed line(s)", routed.rejected.len());
                self.summary.malformed_skipped += routed.rejected.len();
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), FilterError> {
        self.accepted.flush()?;
        self.rejected.flush()
    }

    pub fn summary(&self) -> &FilterSummary {
        &self.summary
    }

    pub fn into_inner(self) -> (A, R) {
        (self.accepted.writer, self.rejected.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib_utils::resolver::{BlockReport, RejectReason};

    #[test]
    fn routes_lines_and_counts_blocks() {
        let mut output = OutputWriter::new(Vec::new(), Vec::new());
        output
            .write(Routed {
                report: Some(BlockReport {
                    verdict: Verdict::KeepRepaired { accepted: vec![0], rejected: vec![1] },
                    first_line: 4,
                    last_line: 5,
                    written: 1,
                    dropped: 1,
                }),
                accepted: vec!["keep".to_string()],
                rejected: vec![(RejectReason::Dominated, "lose".to_string())],
            })
            .unwrap();
        output.write(Routed::stray("bad line".to_string())).unwrap();
        let summary = output.summary().clone();
        assert_eq!(summary.blocks_written, 1);
        assert_eq!(summary.blocks_dropped, 0);
        assert_eq!(summary.records_accepted, 1);
        assert_eq!(summary.records_rejected, 2);
        assert_eq!(summary.malformed_skipped, 1);
        let (accepted, rejected) = output.into_inner();
        assert_eq!(String::from_utf8(accepted).unwrap(), "keep\n");
        assert_eq!(String::from_utf8(rejected).unwrap(), "--->lose\n???>bad line\n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_names_the_destination() {
        let mut output = OutputWriter::with_paths(Vec::new(), "kept.txt", Broken, "dropped.txt");
        match output.write(Routed::stray("x".to_string())) {
            Err(FilterError::UnwritableDestination { path, .. }) => {
                assert_eq!(path, PathBuf::from("dropped.txt"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
