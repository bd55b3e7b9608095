//! Candidate selection: which repeated groups are worth consolidating.

use std::cmp::Ordering;

use super::mapping::Candidate;
use crate::config::ConfigFile;
use crate::scanner::{DynamicBaseSet, Occurrence};

/// Rough size of one declaration in the synthesized rule (`gap:0.5rem;`)
pub const AVG_DECLARATION_BYTES: usize = 12;

/// Why an occurrence was not selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Repeat count below `min-occurrences`
    TooFewOccurrences,
    /// Token count below `min-tokens`
    TooFewTokens,
    /// Consistency-safe mode and seen on one side only
    SingleSided,
    /// Carries preserved tokens while `reject-safelisted` is set
    HasSafelisted,
    /// Shares tokens with a dynamic base while `exclude-dynamic-overlap` is set
    DynamicOverlap,
    /// Savings below `min-savings`
    BelowMinSavings,
    /// Savings do not cover the synthesized rule
    BelowOverhead,
}

/// Estimated bytes saved: `(included length - name length) * count`
pub fn estimate_savings(occurrence: &Occurrence, name_len: usize) -> usize {
    occurrence.original_len().saturating_sub(name_len) * occurrence.count
}

/// Estimated bytes the synthesized rule adds to the stylesheet
pub fn estimate_overhead(name_len: usize, token_count: usize) -> usize {
    // `.` + `{` + `}` around the name, one declaration per token
    name_len + 3 + token_count * AVG_DECLARATION_BYTES
}

/// Run every filter against one occurrence
pub fn evaluate(
    occurrence: &Occurrence,
    bases: &DynamicBaseSet,
    config: &ConfigFile,
) -> Result<Candidate, Rejection> {
    let thresholds = &config.thresholds;
    let safety = &config.safety;

    if occurrence.count < thresholds.min_occurrences {
        return Err(Rejection::TooFewOccurrences);
    }
    if occurrence.token_count() < thresholds.min_tokens {
        return Err(Rejection::TooFewTokens);
    }
    if safety.consistency_safe && !occurrence.seen_on_both_sides() {
        return Err(Rejection::SingleSided);
    }
    if safety.reject_safelisted && !occurrence.preserved.is_empty() {
        return Err(Rejection::HasSafelisted);
    }
    if safety.exclude_dynamic_overlap && bases.overlaps(&occurrence.token_set()) {
        return Err(Rejection::DynamicOverlap);
    }

    let name_len = config.naming.name_len();
    let savings = estimate_savings(occurrence, name_len);
    if savings < thresholds.min_savings {
        return Err(Rejection::BelowMinSavings);
    }
    if !thresholds.force && savings <= estimate_overhead(name_len, occurrence.token_count()) {
        return Err(Rejection::BelowOverhead);
    }

    Ok(Candidate {
        key: occurrence.key.clone(),
        tokens: occurrence.original.clone(),
        preserved: occurrence.preserved.clone(),
        count: occurrence.count,
        savings,
        kinds: occurrence.kinds.clone(),
        name: None,
    })
}

/// Filter and rank occurrences: savings descending, then key ascending
pub fn select(
    occurrences: &[Occurrence],
    bases: &DynamicBaseSet,
    config: &ConfigFile,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = occurrences
        .iter()
        .filter_map(|occurrence| match evaluate(occurrence, bases, config) {
            Ok(candidate) => Some(candidate),
            Err(reason) => {
                log::debug!("not consolidating '{}': {:?}", occurrence.key, reason);
                None
            }
        })
        .collect();

    candidates.sort_by(rank);
    log::info!(
        "selected {} of {} token groups",
        candidates.len(),
        occurrences.len()
    );
    candidates
}

fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.savings.cmp(&a.savings).then_with(|| a.key.cmp(&b.key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{Location, SourceKind};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn occurrence(tokens: &[&str], count: usize, kinds: &[SourceKind]) -> Occurrence {
        let original: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        let mut sorted = original.clone();
        sorted.sort();
        Occurrence {
            key: sorted.join(" "),
            original,
            preserved: Vec::new(),
            count,
            locations: vec![
                Location {
                    file: PathBuf::from("index.html"),
                    line: 1,
                };
                count
            ],
            kinds: kinds.iter().copied().collect(),
        }
    }

    fn html(tokens: &[&str], count: usize) -> Occurrence {
        occurrence(tokens, count, &[SourceKind::Markup])
    }

    fn set(tokens: &[&str]) -> BTreeSet<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    mod thresholds {
        use super::*;

        #[test]
        fn test_savings_formula() {
            let occ = html(&["flex", "items-center", "gap-2"], 3);
            assert_eq!(estimate_savings(&occ, 5), (23 - 5) * 3);
            assert_eq!(estimate_overhead(5, 3), 44);
        }

        #[test]
        fn test_repeated_group_is_selected() {
            let occ = html(&["flex", "items-center", "gap-2"], 3);
            let candidate = evaluate(&occ, &DynamicBaseSet::new(), &ConfigFile::default()).unwrap();
            assert_eq!(candidate.savings, 54);
            assert_eq!(candidate.count, 3);
        }

        #[test]
        fn test_min_occurrences_and_tokens() {
            let config = ConfigFile::default();
            let bases = DynamicBaseSet::new();
            assert_eq!(
                evaluate(&html(&["flex", "items-center"], 1), &bases, &config),
                Err(Rejection::TooFewOccurrences)
            );
            assert_eq!(
                evaluate(&html(&["items-center"], 10), &bases, &config),
                Err(Rejection::TooFewTokens)
            );
        }

        #[test]
        fn test_min_savings_and_overhead() {
            let bases = DynamicBaseSet::new();
            let mut config = ConfigFile::default();
            let small = html(&["px-4", "py-2"], 2);
            assert_eq!(
                evaluate(&small, &bases, &config),
                Err(Rejection::BelowMinSavings)
            );

            config.thresholds.min_savings = 0;
            assert_eq!(
                evaluate(&small, &bases, &config),
                Err(Rejection::BelowOverhead)
            );

            config.thresholds.force = true;
            assert!(evaluate(&small, &bases, &config).is_ok());
        }
    }

    mod safety {
        use super::*;

        #[test]
        fn test_consistency_safe_requires_both_sides() {
            let mut config = ConfigFile::default();
            config.safety.consistency_safe = true;
            let bases = DynamicBaseSet::new();

            let script_only =
                occurrence(&["flex", "items-center", "gap-2"], 4, &[SourceKind::Script]);
            assert_eq!(
                evaluate(&script_only, &bases, &config),
                Err(Rejection::SingleSided)
            );

            let both = occurrence(
                &["flex", "items-center", "gap-2"],
                4,
                &[SourceKind::ServerFragment, SourceKind::Script],
            );
            assert!(evaluate(&both, &bases, &config).is_ok());
        }

        #[test]
        fn test_reject_safelisted() {
            let mut config = ConfigFile::default();
            config.safety.reject_safelisted = true;
            let mut occ = html(&["flex", "items-center", "gap-2"], 4);
            occ.preserved = vec!["js-toggle".to_string()];
            assert_eq!(
                evaluate(&occ, &DynamicBaseSet::new(), &config),
                Err(Rejection::HasSafelisted)
            );
        }

        #[test]
        fn test_dynamic_overlap_is_opt_in() {
            let mut bases = DynamicBaseSet::new();
            bases.insert(set(&["flex", "gap-2"]));
            let occ = html(&["flex", "items-center", "gap-2"], 4);

            let mut config = ConfigFile::default();
            assert!(evaluate(&occ, &bases, &config).is_ok());

            config.safety.exclude_dynamic_overlap = true;
            assert_eq!(
                evaluate(&occ, &bases, &config),
                Err(Rejection::DynamicOverlap)
            );
        }

        #[test]
        fn test_one_shared_token_is_an_overlap() {
            let mut bases = DynamicBaseSet::new();
            bases.insert(set(&["flex", "gap-2"]));
            let mut config = ConfigFile::default();
            config.safety.exclude_dynamic_overlap = true;

            let shared = html(&["flex", "items-center", "p-4"], 4);
            assert_eq!(
                evaluate(&shared, &bases, &config),
                Err(Rejection::DynamicOverlap)
            );

            let disjoint = html(&["grid", "items-center", "p-4"], 4);
            assert!(evaluate(&disjoint, &bases, &config).is_ok());
        }
    }

    #[test]
    fn test_select_ranks_by_savings_then_key() {
        let occurrences = vec![
            html(&["flex", "items-center", "gap-2"], 3),
            html(&["justify-between", "items-center"], 5),
            html(&["grid", "place-items-center"], 5),
            html(&["flex", "flex-col"], 1),
        ];
        let candidates = select(&occurrences, &DynamicBaseSet::new(), &ConfigFile::default());

        let keys: Vec<&str> = candidates.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "items-center justify-between",
                "grid place-items-center",
                "flex gap-2 items-center"
            ]
        );
    }

    #[test]
    fn test_select_with_nothing_repeated_is_empty() {
        let occurrences = vec![html(&["flex", "items-center"], 1)];
        assert!(select(&occurrences, &DynamicBaseSet::new(), &ConfigFile::default()).is_empty());
    }
}
