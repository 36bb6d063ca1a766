//! Similarity-based deduplication of ensemble findings.
//!
//! Pure domain logic: no I/O, no async, just text math. The ensemble
//! coordinator runs this single-threaded after all parallel extraction has
//! joined, so there is no concurrent access to the in-progress cluster list.
//!
//! # Algorithm
//!
//! | Step | Function |
//! |------|----------|
//! | Normalize + word set | [`word_set`] |
//! | Similarity metric | [`jaccard_similarity`] |
//! | Duplicate resolution | [`quality_score`] |
//! | Clustering scan | [`deduplicate`] |
//!
//! Issues are scanned incrementally; each newcomer is compared against every
//! retained representative and merged into the best match at or above the
//! threshold. Duplicate resolution is not first-seen-wins: a later duplicate
//! with a higher quality score replaces the retained representative, since
//! longer quoted spans and higher confidence are better proxies for
//! extraction quality than arrival order.

use super::issue::ExtractedIssue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default similarity threshold at or above which two issues merge
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 0.7;

/// Normalized word set of a text span: lower-cased, whitespace-collapsed.
pub fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect()
}

/// Jaccard similarity (intersection over union) of two texts' word sets.
///
/// Returns 0.0 when both texts are empty; identical word sets score 1.0.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a = word_set(a);
    let set_b = word_set(b);

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();

    intersection as f64 / union as f64
}

/// Quality score used to pick a cluster's representative.
///
/// `0.4·log10(len+1)/4 + 0.25·confidence/100 + 0.20·severity/100 + 0.15·importance/100`
///
/// The length term saturates around 10k characters; the score weighs span
/// length and model confidence above severity and importance.
pub fn quality_score(issue: &ExtractedIssue) -> f64 {
    let length_term = ((issue.exact_text.len() as f64) + 1.0).log10() / 4.0;
    0.4 * length_term
        + 0.25 * f64::from(issue.confidence) / 100.0
        + 0.20 * f64::from(issue.severity) / 100.0
        + 0.15 * f64::from(issue.importance) / 100.0
}

/// Outcome of one deduplication pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupOutput {
    /// Cluster representatives, in first-seen cluster order
    pub issues: Vec<ExtractedIssue>,
    /// Issues merged into an existing cluster
    pub duplicates_removed: usize,
    /// Issues dropped for missing/empty text spans before clustering
    pub malformed_removed: usize,
}

/// One cluster of near-duplicate issues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupCluster {
    /// The highest-quality issue seen in this cluster so far
    pub representative: ExtractedIssue,
    /// Positions (in the input sequence) of every issue in the cluster,
    /// including the representative's
    pub member_indices: Vec<usize>,
}

/// Outcome of one clustering pass, retaining cluster membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterOutput {
    /// Clusters in first-seen order
    pub clusters: Vec<DedupCluster>,
    /// Issues merged into an existing cluster
    pub duplicates_removed: usize,
    /// Issues dropped for missing/empty text spans before clustering
    pub malformed_removed: usize,
}

/// Cluster near-duplicate issues, keeping track of which input positions
/// fell into each cluster.
///
/// Malformed issues (empty text span) are filtered first and counted, not
/// treated as errors. For each remaining issue the best Jaccard match among
/// retained representatives decides: at or above `threshold` the issue joins
/// that cluster (replacing the representative only when strictly higher
/// quality), otherwise it starts a new cluster. Membership indices let the
/// caller map merged issues back to their producers.
pub fn cluster_issues(issues: Vec<ExtractedIssue>, threshold: f64) -> ClusterOutput {
    let total = issues.len();
    let mut clusters: Vec<DedupCluster> = Vec::new();
    let mut malformed_removed = 0;

    for (index, issue) in issues.into_iter().enumerate() {
        if !issue.has_text() {
            malformed_removed += 1;
            continue;
        }

        let best = clusters
            .iter()
            .enumerate()
            .map(|(idx, cluster)| {
                (
                    idx,
                    jaccard_similarity(&issue.exact_text, &cluster.representative.exact_text),
                )
            })
            .max_by(|a, b| a.1.total_cmp(&b.1));

        match best {
            Some((idx, similarity)) if similarity >= threshold => {
                let cluster = &mut clusters[idx];
                cluster.member_indices.push(index);
                if quality_score(&issue) > quality_score(&cluster.representative) {
                    cluster.representative = issue;
                }
            }
            _ => clusters.push(DedupCluster {
                representative: issue,
                member_indices: vec![index],
            }),
        }
    }

    let duplicates_removed = total - malformed_removed - clusters.len();
    ClusterOutput {
        clusters,
        duplicates_removed,
        malformed_removed,
    }
}

/// Collapse near-duplicate issues into one representative per cluster.
///
/// Same scan as [`cluster_issues`], discarding membership information.
pub fn deduplicate(issues: Vec<ExtractedIssue>, threshold: f64) -> DedupOutput {
    let ClusterOutput {
        clusters,
        duplicates_removed,
        malformed_removed,
    } = cluster_issues(issues, threshold);

    DedupOutput {
        issues: clusters.into_iter().map(|c| c.representative).collect(),
        duplicates_removed,
        malformed_removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(text: &str, severity: u8, confidence: u8) -> ExtractedIssue {
        ExtractedIssue::new(text, severity, confidence)
    }

    // ==================== jaccard_similarity Tests ====================

    #[test]
    fn test_jaccard_identical() {
        assert_eq!(jaccard_similarity("the sky is green", "the sky is green"), 1.0);
    }

    #[test]
    fn test_jaccard_case_and_whitespace_insensitive() {
        assert_eq!(
            jaccard_similarity("The  Sky   is GREEN", "the sky is green"),
            1.0
        );
    }

    #[test]
    fn test_jaccard_disjoint() {
        assert_eq!(jaccard_similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        // {the, sky, is, green} vs {the, sky, is, green, today} = 4/5
        let sim = jaccard_similarity("the sky is green", "the sky is green today");
        assert!((sim - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_jaccard_both_empty() {
        assert_eq!(jaccard_similarity("", ""), 0.0);
        assert_eq!(jaccard_similarity("  ", "\t\n"), 0.0);
    }

    #[test]
    fn test_jaccard_symmetric() {
        let a = "one two three";
        let b = "two three four five";
        assert_eq!(jaccard_similarity(a, b), jaccard_similarity(b, a));
    }

    // ==================== quality_score Tests ====================

    #[test]
    fn test_quality_formula() {
        let i = issue("the sky is green", 80, 90).with_importance(50);
        // len 16: 0.4 * log10(17)/4 + 0.25*0.9 + 0.20*0.8 + 0.15*0.5
        let expected = 0.4 * (17.0_f64).log10() / 4.0 + 0.225 + 0.16 + 0.075;
        assert!((quality_score(&i) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_quality_confidence_outweighs_length() {
        // Shorter but confident beats longer but weak
        let a = issue("the sky is green", 80, 90);
        let b = issue("the sky is green today", 60, 50);
        assert!(quality_score(&a) > quality_score(&b));
    }

    #[test]
    fn test_quality_longer_wins_when_scores_equal() {
        let short = issue("the sky is green", 60, 60);
        let long = issue("the sky is green every single day", 60, 60);
        assert!(quality_score(&long) > quality_score(&short));
    }

    // ==================== deduplicate Tests ====================

    #[test]
    fn test_merge_above_threshold() {
        let output = deduplicate(
            vec![
                issue("the sky is green", 80, 90),
                issue("the sky is green today", 60, 50),
            ],
            DEFAULT_DEDUP_THRESHOLD,
        );
        assert_eq!(output.issues.len(), 1);
        assert_eq!(output.duplicates_removed, 1);
        // Higher quality (confidence 90) wins despite being shorter
        assert_eq!(output.issues[0].exact_text, "the sky is green");
    }

    #[test]
    fn test_merge_is_order_independent() {
        let output = deduplicate(
            vec![
                issue("the sky is green today", 60, 50),
                issue("the sky is green", 80, 90),
            ],
            DEFAULT_DEDUP_THRESHOLD,
        );
        assert_eq!(output.issues.len(), 1);
        assert_eq!(output.issues[0].exact_text, "the sky is green");
    }

    #[test]
    fn test_below_threshold_stays_separate() {
        // {a, b} vs {a, c}: 1/3 < 0.7
        let output = deduplicate(
            vec![issue("alpha beta", 50, 50), issue("alpha gamma", 50, 50)],
            DEFAULT_DEDUP_THRESHOLD,
        );
        assert_eq!(output.issues.len(), 2);
        assert_eq!(output.duplicates_removed, 0);
    }

    #[test]
    fn test_malformed_filtered_and_counted() {
        let output = deduplicate(
            vec![
                issue("", 90, 90),
                issue("   ", 90, 90),
                issue("real issue text", 50, 50),
            ],
            DEFAULT_DEDUP_THRESHOLD,
        );
        assert_eq!(output.issues.len(), 1);
        assert_eq!(output.malformed_removed, 2);
        assert_eq!(output.duplicates_removed, 0);
    }

    #[test]
    fn test_idempotent() {
        let first = deduplicate(
            vec![
                issue("the sky is green", 80, 90),
                issue("the sky is green today", 60, 50),
                issue("unrelated claim about history", 40, 40),
                issue("claim about history, unrelated", 40, 45),
            ],
            DEFAULT_DEDUP_THRESHOLD,
        );
        let second = deduplicate(first.issues.clone(), DEFAULT_DEDUP_THRESHOLD);
        assert_eq!(second.issues, first.issues);
        assert_eq!(second.duplicates_removed, 0);
        assert_eq!(second.malformed_removed, 0);
    }

    #[test]
    fn test_three_way_cluster_keeps_best() {
        let output = deduplicate(
            vec![
                issue("the earth is flat", 50, 40),
                issue("the earth is flat actually", 90, 95),
                issue("actually the earth is flat", 60, 60),
            ],
            DEFAULT_DEDUP_THRESHOLD,
        );
        assert_eq!(output.issues.len(), 1);
        assert_eq!(output.duplicates_removed, 2);
        assert_eq!(output.issues[0].confidence, 95);
    }

    #[test]
    fn test_newcomer_joins_best_match_not_first_match() {
        // c is similar to both a and b but much closer to b
        let a = issue("shared words one two three four five", 50, 50);
        let b = issue("shared words one two six seven", 50, 50);
        let c = issue("shared words one two six seven eight", 50, 99);

        let output = deduplicate(vec![a, b, c], 0.5);
        // a and b stay separate (similarity 4/9 < 0.5); c merges into b
        assert_eq!(output.issues.len(), 2);
        assert!(output.issues.iter().any(|i| i.confidence == 99));
    }

    #[test]
    fn test_empty_input() {
        let output = deduplicate(vec![], DEFAULT_DEDUP_THRESHOLD);
        assert!(output.issues.is_empty());
        assert_eq!(output.duplicates_removed, 0);
        assert_eq!(output.malformed_removed, 0);
    }

    // ==================== cluster_issues Tests ====================

    #[test]
    fn test_cluster_membership_tracks_input_positions() {
        let output = cluster_issues(
            vec![
                issue("the sky is green", 80, 90),          // 0
                issue("completely different topic", 40, 40), // 1
                issue("the sky is green today", 60, 50),     // 2
            ],
            DEFAULT_DEDUP_THRESHOLD,
        );

        assert_eq!(output.clusters.len(), 2);
        assert_eq!(output.clusters[0].member_indices, vec![0, 2]);
        assert_eq!(output.clusters[1].member_indices, vec![1]);
    }

    #[test]
    fn test_cluster_malformed_positions_excluded() {
        let output = cluster_issues(
            vec![issue("", 50, 50), issue("valid text here", 50, 50)],
            DEFAULT_DEDUP_THRESHOLD,
        );
        assert_eq!(output.malformed_removed, 1);
        assert_eq!(output.clusters.len(), 1);
        // Indices refer to the original input sequence
        assert_eq!(output.clusters[0].member_indices, vec![1]);
    }

    #[test]
    fn test_cluster_representative_replaced_but_membership_kept() {
        let output = cluster_issues(
            vec![
                issue("the sky is green today", 60, 50),
                issue("the sky is green", 80, 90),
            ],
            DEFAULT_DEDUP_THRESHOLD,
        );
        assert_eq!(output.clusters.len(), 1);
        assert_eq!(output.clusters[0].representative.confidence, 90);
        assert_eq!(output.clusters[0].member_indices, vec![0, 1]);
    }
}
