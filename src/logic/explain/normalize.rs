use super::registry::ExplanationRegistry;
use super::types::{Contributions, FeatureContribution, RawContribution};
use crate::constants::MAX_CONTRIBUTIONS;

/// Rank raw contributions and attach explanations.
///
/// Ordering is by descending absolute contribution; `sort_by` is stable, so
/// equal magnitudes keep the order the service sent them in.
pub fn normalize(raw: Option<&[RawContribution]>, registry: &ExplanationRegistry) -> Contributions {
    let raw = match raw {
        Some(items) if !items.is_empty() => items,
        _ => return Contributions::Unavailable,
    };

    let mut ranked: Vec<&RawContribution> = raw.iter().collect();
    ranked.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
    ranked.truncate(MAX_CONTRIBUTIONS);

    let items = ranked
        .into_iter()
        .map(|c| FeatureContribution {
            feature_id: c.feature_id.clone(),
            contribution: c.contribution,
            explanation: registry.explain(&c.feature_id).to_string(),
            display_value: display_value(c.contribution),
        })
        .collect();

    Contributions::Ranked(items)
}

/// Fractional scores (|c| <= 1) read as percentages, larger magnitudes as raw decimals
pub fn display_value(contribution: f64) -> String {
    if contribution.abs() <= 1.0 {
        format!("{:.2}%", contribution * 100.0)
    } else {
        format!("{:.4}", contribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(contributions: &Contributions) -> Vec<&str> {
        contributions.iter().map(|c| c.feature_id.as_str()).collect()
    }

    #[test]
    fn test_rank_by_absolute_value() {
        let registry = ExplanationRegistry::builtin();
        let raw = vec![
            RawContribution::new("a", 0.5),
            RawContribution::new("b", -0.9),
            RawContribution::new("c", 0.1),
        ];

        let result = normalize(Some(&raw), &registry);

        assert_eq!(ids(&result), vec!["b", "a", "c"]);
        let items = result.as_slice();
        assert_eq!(items[0].display_value, "-90.00%");
        assert_eq!(items[1].display_value, "50.00%");
        assert_eq!(items[2].display_value, "10.00%");
    }

    #[test]
    fn test_truncates_to_eight() {
        let registry = ExplanationRegistry::builtin();
        let raw: Vec<_> = (0..12)
            .map(|i| RawContribution::new(format!("f{}", i), i as f64 / 20.0))
            .collect();

        let result = normalize(Some(&raw), &registry);

        assert_eq!(result.len(), MAX_CONTRIBUTIONS);
        // largest magnitudes survive
        assert_eq!(result.as_slice()[0].feature_id, "f11");
        assert_eq!(result.as_slice()[7].feature_id, "f4");
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let registry = ExplanationRegistry::builtin();
        let raw = vec![
            RawContribution::new("first", 0.2),
            RawContribution::new("big", 0.7),
            RawContribution::new("second", -0.2),
            RawContribution::new("third", 0.2),
        ];

        let result = normalize(Some(&raw), &registry);

        assert_eq!(ids(&result), vec!["big", "first", "second", "third"]);
    }

    #[test]
    fn test_empty_and_absent_are_unavailable() {
        let registry = ExplanationRegistry::builtin();
        assert!(normalize(None, &registry).is_unavailable());
        assert!(normalize(Some(&[]), &registry).is_unavailable());
    }

    #[test]
    fn test_unknown_feature_gets_default_explanation() {
        let registry = ExplanationRegistry::builtin();
        let raw = vec![RawContribution::new("mystery_feature", 0.05)];

        let result = normalize(Some(&raw), &registry);

        let item = &result.as_slice()[0];
        assert_eq!(item.explanation, registry.default_explanation());
        assert!(!item.explanation.is_empty());
    }

    #[test]
    fn test_display_value_scales() {
        assert_eq!(display_value(0.31), "31.00%");
        assert_eq!(display_value(1.0), "100.00%");
        assert_eq!(display_value(-1.0), "-100.00%");
        assert_eq!(display_value(1.5), "1.5000");
        assert_eq!(display_value(-12.34567), "-12.3457");
        assert_eq!(display_value(0.0), "0.00%");
    }
}
