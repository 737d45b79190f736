use std::collections::HashSet;

use block_filter::lib_utils::resolver::dominated;
use block_filter::{BlockFilter, FilterError, MalformedPolicy, OutputWriter, Record};
use proptest::prelude::*;

// small alphabets so blocks collide on keys and prefixes often
fn rows() -> impl Strategy<Value = Vec<(u8, u8, u8, u8)>> {
    prop::collection::vec((0u8..4, 0u8..4, 0u8..2, 0u8..4), 0..60)
}

fn to_records(rows: &[(u8, u8, u8, u8)]) -> Vec<Record> {
    rows.iter()
        .enumerate()
        .map(|(idx, (gene, prefix, tail, size))| {
            let line = format!("G{}\tprefix00{}{}\t5\t{}", gene, prefix, tail, size);
            Record::parse(&line, idx + 1).unwrap()
        })
        .collect()
}

fn run(records: &[Record], max_genes: usize) -> (Vec<String>, Vec<String>) {
    let mut output = OutputWriter::new(Vec::new(), Vec::new());
    BlockFilter::new(max_genes)
        .run(records.iter().cloned().map(Ok), &mut output)
        .unwrap();
    let (accepted, rejected) = output.into_inner();
    let lines = |bytes: Vec<u8>| -> Vec<String> {
        String::from_utf8(bytes).unwrap().lines().map(str::to_string).collect()
    };
    (lines(accepted), lines(rejected))
}

const SIZES: [&str; 7] = ["0", "1", "2", "3", "NaN", "inf", "-inf"];

// same shape as rows(), sizes drawn from SIZES so some are not finite
fn rows_with_odd_sizes() -> impl Strategy<Value = Vec<(u8, u8, u8, usize)>> {
    prop::collection::vec((0u8..3, 0u8..3, 0u8..2, 0usize..SIZES.len()), 0..60)
}

fn parse_rows(rows: &[(u8, u8, u8, usize)]) -> Vec<Result<Record, FilterError>> {
    rows.iter()
        .enumerate()
        .map(|(idx, (gene, prefix, tail, size))| {
            let line = format!("G{}\tprefix00{}{}\t5\t{}", gene, prefix, tail, SIZES[*size]);
            Record::parse(&line, idx + 1)
        })
        .collect()
}

fn maximal_runs(records: &[Record]) -> Vec<&[Record]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for idx in 1..=records.len() {
        if idx == records.len() || records[idx].primary_key != records[start].primary_key {
            runs.push(&records[start..idx]);
            start = idx;
        }
    }
    runs
}

fn strip_marker(line: &str) -> &str {
    if line.len() > 4 && line.as_bytes()[3] == b'>' {
        &line[4..]
    } else {
        line
    }
}

proptest! {
    #[test]
    fn every_record_is_routed_exactly_once(rows in rows(), max_genes in 1usize..5) {
        let records = to_records(&rows);
        let (accepted, rejected) = run(&records, max_genes);
        let mut seen: Vec<String> = accepted.clone();
        seen.extend(rejected.iter().map(|l| strip_marker(l).to_string()));
        let mut expected: Vec<String> = records.iter().map(|r| r.raw_line.clone()).collect();
        seen.sort();
        expected.sort();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn blocks_resolve_independently_and_in_order(rows in rows(), max_genes in 1usize..5) {
        let records = to_records(&rows);
        let (accepted, rejected) = run(&records, max_genes);
        let mut joined_accepted = Vec::new();
        let mut joined_rejected = Vec::new();
        for block in maximal_runs(&records) {
            let (kept, dropped) = run(block, max_genes);
            let prefixes: HashSet<&str> = block
                .iter()
                .filter(|r| kept.contains(&r.raw_line))
                .map(|r| r.prefix())
                .collect();
            prop_assert!(kept.is_empty() || kept.len() == max_genes);
            prop_assert!(kept.is_empty() || prefixes.len() == max_genes);
            joined_accepted.extend(kept);
            joined_rejected.extend(dropped);
        }
        prop_assert_eq!(accepted, joined_accepted);
        prop_assert_eq!(rejected, joined_rejected);
    }

    #[test]
    fn non_finite_sizes_keep_blocks_at_max_genes(rows in rows_with_odd_sizes(), max_genes in 1usize..4) {
        let parsed = parse_rows(&rows);
        let valid: Vec<Record> = parsed.iter().filter_map(|r| r.as_ref().ok().cloned()).collect();
        let odd = parsed.len() - valid.len();
        let mut filter = BlockFilter::new(max_genes);
        filter.set_malformed_policy(MalformedPolicy::Skip);
        let mut output = OutputWriter::new(Vec::new(), Vec::new());
        let summary = filter.run(parsed, &mut output).unwrap();
        prop_assert_eq!(summary.malformed_skipped, odd);
        let (accepted, _) = output.into_inner();
        let accepted: Vec<String> = String::from_utf8(accepted).unwrap().lines().map(str::to_string).collect();
        // skipped rows do not split blocks, so blocks are runs of the valid rows
        let mut joined = Vec::new();
        for block in maximal_runs(&valid) {
            let (kept, _) = run(block, max_genes);
            prop_assert!(kept.is_empty() || kept.len() == max_genes);
            joined.extend(kept);
        }
        prop_assert_eq!(accepted.len(), summary.blocks_written * max_genes);
        prop_assert_eq!(accepted, joined);
    }

    #[test]
    fn dominance_repair_is_idempotent(rows in prop::collection::vec((0u8..3, 0u8..2, 0u8..4), 0..20)) {
        let records = to_records(&rows.iter().map(|(p, t, s)| (0u8, *p, *t, *s)).collect::<Vec<_>>());
        let survivors: Vec<Record> = records
            .iter()
            .zip(dominated(&records))
            .filter(|(_, marked)| !marked)
            .map(|(r, _)| r.clone())
            .collect();
        let distinct: HashSet<&str> = records.iter().map(|r| r.prefix()).collect();
        prop_assert_eq!(survivors.len(), distinct.len());
        prop_assert!(dominated(&survivors).iter().all(|marked| !marked));
    }

    #[test]
    fn identical_full_keys_never_conflict(size_a in 0u8..5, size_b in 0u8..5) {
        let records = to_records(&[(0, 1, 0, size_a), (0, 1, 0, size_b), (0, 2, 0, 0)]);
        let (accepted, rejected) = run(&records, 2);
        prop_assert_eq!(accepted.len(), 2);
        prop_assert!(rejected.iter().all(|l| l.starts_with("--->")));
    }
}
