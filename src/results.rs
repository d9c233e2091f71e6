use crate::models::{District, Election};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row of a district results table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateResult {
    pub candidate: String,
    pub votes: Option<u64>,
    pub percentage: Option<f64>,
}

/// Rank the election's candidates within a district by raw vote count, highest first.
///
/// Only candidates whose count field is present in the district are listed.
/// Equal counts keep the election's ballot order; unreadable counts go last.
pub fn sort_results(district: &District, election: &Election) -> Vec<CandidateResult> {
    let mut results: Vec<CandidateResult> = election
        .candidates
        .iter()
        .filter(|c| district.has_field(c))
        .map(|c| CandidateResult {
            candidate: c.clone(),
            votes: district.votes(c),
            percentage: district.percentage(c),
        })
        .collect();

    // sort_by is stable, so ties keep ballot order.
    results.sort_by(|a, b| match (a.votes, b.votes) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    results
}

/// The first `n` rows of a sorted table (popup view).
pub fn top_results(results: &[CandidateResult], n: usize) -> &[CandidateResult] {
    &results[..n.min(results.len())]
}

/// Sum of all readable counts (detail panel footer).
pub fn total_votes(results: &[CandidateResult]) -> u64 {
    results.iter().filter_map(|r| r.votes).sum()
}
