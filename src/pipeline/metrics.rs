//! Aggregate metrics for one consolidation run

use serde::{Deserialize, Serialize};

use crate::optimizer::{ClassMapping, RewriteReport};

/// Number of consolidations listed in [`RunMetrics::top`]
pub const TOP_N: usize = 10;

/// One line of the top-consolidations table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopConsolidation {
    /// Synthetic name
    pub name: String,
    /// Original tokens, space-joined
    pub tokens: String,
    /// Repeat count
    pub count: usize,
    /// Estimated byte savings
    pub savings: usize,
}

/// Run totals for the console summary and the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Artifacts scanned
    pub files_scanned: usize,
    /// Artifacts changed by the rewrite
    pub files_modified: usize,
    /// Distinct token groups found
    pub unique_patterns: usize,
    /// Token groups replaced by a synthetic name
    pub patterns_consolidated: usize,
    /// Bytes removed from artifacts
    pub bytes_saved: i64,
    /// Bytes added to the stylesheet
    pub css_overhead: usize,
    /// `bytes_saved - css_overhead`
    pub net_savings: i64,
    /// Highest-savings consolidations
    pub top: Vec<TopConsolidation>,
}

impl RunMetrics {
    /// Combine stage results into run totals
    pub fn collect(
        files_scanned: usize,
        unique_patterns: usize,
        mappings: &[ClassMapping],
        rewrite: &RewriteReport,
        css_overhead: usize,
    ) -> Self {
        let top = mappings
            .iter()
            .take(TOP_N)
            .map(|m| TopConsolidation {
                name: m.name.clone(),
                tokens: m.tokens.join(" "),
                count: m.count,
                savings: m.savings,
            })
            .collect();

        Self {
            files_scanned,
            files_modified: rewrite.files_modified,
            unique_patterns,
            patterns_consolidated: rewrite.replacements_by_name.len(),
            bytes_saved: rewrite.bytes_saved,
            css_overhead,
            net_savings: rewrite.bytes_saved - css_overhead as i64,
            top,
        }
    }

    /// Net savings as a share of the bytes removed
    pub fn efficiency_percent(&self) -> f64 {
        if self.bytes_saved <= 0 {
            return 0.0;
        }
        (self.net_savings as f64 / self.bytes_saved as f64) * 100.0
    }
}
