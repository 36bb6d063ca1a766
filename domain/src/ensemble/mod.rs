//! Ensemble subdomain - extractor configs, per-extractor results, and the
//! deduplication algorithm that reconciles their overlapping findings.

pub mod config;
pub mod dedup;
pub mod issue;
pub mod result;

pub use config::{
    ExtractorConfig, ExtractorId, ReasoningEffort, Temperature, assign_extractor_ids,
};
pub use dedup::{
    ClusterOutput, DEFAULT_DEDUP_THRESHOLD, DedupCluster, DedupOutput, cluster_issues,
    deduplicate, jaccard_similarity, quality_score, word_set,
};
pub use issue::ExtractedIssue;
pub use result::{ExtractorResult, MultiExtractorResult};
