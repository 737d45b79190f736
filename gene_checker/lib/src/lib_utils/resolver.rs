/*
    Decide what happens to a sealed block
        + flagged while open: drop everything (conflict)
        + fewer distinct prefixes than max_genes: drop everything (too few)
        + more distinct prefixes than max_genes: drop everything (too many)
        + exactly max_genes members: keep everything
        + otherwise keep the smallest size of every prefix and reject the rest

    Invariant: a kept block sends exactly max_genes lines to the accepted
    stream, one per distinct prefix. Too many prefixes can never satisfy it,
    so that case is dropped instead of repaired.
*/

use super::block::Block;
use super::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Conflict,
    TooFew,
    TooMany,
    Dominated,
    Malformed,
}

impl RejectReason {
    // prefix written in front of every rejected line
    pub fn marker(&self) -> &'static str {
        match self {
            RejectReason::Conflict => "###>",
            RejectReason::TooFew => "...>",
            RejectReason::TooMany => "+++>",
            RejectReason::Dominated => "--->",
            RejectReason::Malformed => "???>",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    KeepWhole,
    KeepRepaired { accepted: Vec<usize>, rejected: Vec<usize> },
    Drop(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReport {
    pub verdict: Verdict,
    pub first_line: usize,
    pub last_line: usize,
    pub written: usize,
    pub dropped: usize,
}

// everything the writer needs for one unit of output, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Routed {
    pub report: Option<BlockReport>,
    pub accepted: Vec<String>,
    pub rejected: Vec<(RejectReason, String)>,
}

impl Routed {
    pub fn stray(raw_line: String) -> Routed {
        Routed {
            report: None,
            accepted: Vec::new(),
            rejected: vec![(RejectReason::Malformed, raw_line)],
        }
    }
}

pub fn resolve(block: &Block, max_genes: usize) -> Verdict {
    if block.drop_block() {
        return Verdict::Drop(RejectReason::Conflict);
    }
    let distinct = block.distinct_prefixes();
    if distinct < max_genes {
        Verdict::Drop(RejectReason::TooFew)
    } else if distinct > max_genes {
        Verdict::Drop(RejectReason::TooMany)
    } else if block.members.len() == max_genes {
        Verdict::KeepWhole
    } else {
        let marks = dominated(&block.members);
        let (rejected, accepted): (Vec<usize>, Vec<usize>) =
            (0..marks.len()).partition(|&idx| marks[idx]);
        Verdict::KeepRepaired { accepted, rejected }
    }
}

// mark every member beaten by another member of the same prefix
// the larger size loses, on equal sizes the later member loses
pub fn dominated(members: &[Record]) -> Vec<bool> {
    let mut marks = vec![false; members.len()];
    for later in 0..members.len() {
        for earlier in 0..later {
            if members[later].prefix() != members[earlier].prefix() {
                continue;
            }
            if members[earlier].size > members[later].size {
                marks[earlier] = true;
            } else {
                marks[later] = true;
            }
        }
    }
    marks
}

pub fn route(block: Block, max_genes: usize) -> Routed {
    let verdict = resolve(&block, max_genes);
    let first_line = block.first_line();
    let last_line = block.last_line();
    let lines = block.members.into_iter().map(|r| r.raw_line);
    let (accepted, rejected): (Vec<String>, Vec<(RejectReason, String)>) = match &verdict {
        Verdict::KeepWhole => (lines.collect(), Vec::new()),
        Verdict::Drop(reason) => (Vec::new(), lines.map(|line| (*reason, line)).collect()),
        Verdict::KeepRepaired { rejected, .. } => {
            let mut keep = Vec::new();
            let mut reject = Vec::new();
            for (idx, line) in lines.enumerate() {
                if rejected.contains(&idx) {
                    reject.push((RejectReason::Dominated, line));
                } else {
                    keep.push(line);
                }
            }
            (keep, reject)
        }
    };
    Routed {
        report: Some(BlockReport {
            verdict,
            first_line,
            last_line,
            written: accepted.len(),
            dropped: rejected.len(),
        }),
        accepted,
        rejected,
    }
}
