/*
    A block is a run of consecutive records sharing the same gene (field 0)

    While the block is open every incoming record is kept, and may flip the
    drop flag:
        + unseen prefix: remember its size
        + identical full secondary key already in the block: accepted as is
        + same prefix, both sizes zero: drop the block
        + same prefix, prior/new <= size limit: accepted
        + anything else (including new size zero): drop the block
*/

use std::collections::{HashMap, HashSet};
use log::{debug, trace};

use super::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingestion {
    NewPrefix,
    VerbatimDuplicate,
    Consistent,
    ZeroConflict,
    RatioConflict,
}

impl Ingestion {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Ingestion::ZeroConflict | Ingestion::RatioConflict)
    }
}

#[derive(Debug)]
pub struct Block {
    pub key: String,
    pub members: Vec<Record>,
    prefixes: Vec<String>,
    first_sizes: HashMap<String, f64>,
    full_keys: HashSet<String>,
    drop_block: bool,
}

impl Block {
    pub fn new(record: Record) -> Block {
        let mut block = Block {
            key: record.primary_key.clone(),
            members: Vec::new(),
            prefixes: Vec::new(),
            first_sizes: HashMap::new(),
            full_keys: HashSet::new(),
            drop_block: false,
        };
        // first record of a block can only introduce a prefix
        block.ingest(record, f64::INFINITY);
        block
    }

    pub fn ingest(&mut self, record: Record, size_limit: f64) -> Ingestion {
        let prefix = record.prefix().to_string();
        let outcome = match self.first_sizes.get(&prefix) {
            None => {
                self.prefixes.push(prefix.clone());
                self.first_sizes.insert(prefix, record.size);
                Ingestion::NewPrefix
            }
            Some(_) if self.full_keys.contains(&record.secondary_key) => Ingestion::VerbatimDuplicate,
            Some(&prior) => {
                let new = record.size;
                if prior == 0.0 && new == 0.0 {
                    Ingestion::ZeroConflict
                } else if is_consistent(prior, new, size_limit) {
                    Ingestion::Consistent
                } else {
                    Ingestion::RatioConflict
                }
            }
        };
        if outcome.is_conflict() {
            if !self.drop_block {
                debug!("Block {} flagged for dropping at line {} ({:?})",
                    self.key, record.line_number, outcome);
            }
            self.drop_block = true;
        } else {
            trace!("Line {} in block {}: {:?}", record.line_number, self.key, outcome);
        }
        self.full_keys.insert(record.secondary_key.clone());
        self.members.push(record);
        outcome
    }

    pub fn drop_block(&self) -> bool {
        self.drop_block
    }

    // distinct prefixes in order of first appearance
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn distinct_prefixes(&self) -> usize {
        self.prefixes.len()
    }

    pub fn first_line(&self) -> usize {
        self.members.first().map_or(0, |r| r.line_number)
    }

    pub fn last_line(&self) -> usize {
        self.members.last().map_or(0, |r| r.line_number)
    }
}

// a zero new size can never be consistent with a non zero prior size
pub fn is_consistent(prior: f64, new: f64, size_limit: f64) -> bool {
    if new == 0.0 {
        return false;
    }
    prior / new <= size_limit
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: f64 = 1e-50;

    fn record(secondary: &str, size: f64, line: usize) -> Record {
        Record {
            primary_key: "G1".to_string(),
            secondary_key: secondary.to_string(),
            length: "5".to_string(),
            size,
            raw_line: format!("G1\t{}\t5\t{}", secondary, size),
            line_number: line,
        }
    }

    #[test]
    fn distinct_prefixes_keep_insertion_order() {
        let mut block = Block::new(record("abcdefghiX", 0.0, 1));
        assert_eq!(block.ingest(record("abcdefghjY", 0.0, 2), LIMIT), Ingestion::NewPrefix);
        assert_eq!(block.ingest(record("abcdefghiZ", 1.0, 3), LIMIT), Ingestion::Consistent);
        assert_eq!(block.prefixes(), &["abcdefghi".to_string(), "abcdefghj".to_string()]);
        assert_eq!(block.members.len(), 3);
        assert!(!block.drop_block());
        assert_eq!((block.first_line(), block.last_line()), (1, 3));
    }

    #[test]
    fn verbatim_duplicate_ignores_sizes() {
        let mut block = Block::new(record("abcdefghiX", 5.0, 1));
        assert_eq!(block.ingest(record("abcdefghiX", 0.0, 2), LIMIT), Ingestion::VerbatimDuplicate);
        assert_eq!(block.ingest(record("abcdefghiX", 9.0, 3), LIMIT), Ingestion::VerbatimDuplicate);
        assert!(!block.drop_block());
    }

    #[test]
    fn verbatim_match_against_a_later_variant() {
        let mut block = Block::new(record("abcdefghiX", 0.0, 1));
        block.ingest(record("abcdefghiY", 2.0, 2), LIMIT);
        assert_eq!(block.ingest(record("abcdefghiY", 3.0, 3), LIMIT), Ingestion::VerbatimDuplicate);
        assert!(!block.drop_block());
    }

    #[test]
    fn two_zero_variants_flag_the_block() {
        let mut block = Block::new(record("abcdefghiX", 0.0, 1));
        assert_eq!(block.ingest(record("abcdefghiY", 0.0, 2), LIMIT), Ingestion::ZeroConflict);
        // keeps accumulating after the flag is raised
        block.ingest(record("abcdefghjA", 0.0, 3), LIMIT);
        assert!(block.drop_block());
        assert_eq!(block.members.len(), 3);
    }

    #[test]
    fn ratio_above_limit_flags_the_block() {
        let mut block = Block::new(record("abcdefghiX", 1.0, 1));
        assert_eq!(block.ingest(record("abcdefghiY", 2.0, 2), LIMIT), Ingestion::RatioConflict);
        assert!(block.drop_block());
    }

    #[test]
    fn ratio_is_taken_against_first_seen_size() {
        let mut block = Block::new(record("abcdefghiX", 1e-60, 1));
        assert_eq!(block.ingest(record("abcdefghiY", 1.0, 2), LIMIT), Ingestion::Consistent);
        assert_eq!(block.ingest(record("abcdefghiZ", 1e-5, 3), LIMIT), Ingestion::Consistent);
        assert!(!block.drop_block());
    }

    #[test]
    fn zero_new_size_against_non_zero_prior_is_a_conflict() {
        assert!(!is_consistent(1e-70, 0.0, LIMIT));
        let mut block = Block::new(record("abcdefghiX", 1e-70, 1));
        assert_eq!(block.ingest(record("abcdefghiY", 0.0, 2), LIMIT), Ingestion::RatioConflict);
    }
}
