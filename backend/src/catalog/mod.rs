//! Built-in growth strategies
//!
//! Twelve single measures, four of which groups form synergy clusters. A
//! cluster's effect is the sum of its members scaled by `SYNERGY_BONUS`.
//! "Personalized Recommendations" belongs to no cluster.
//!
//! # Example
//! ```
//! use platform_sim_core::catalog;
//!
//! let monetization = catalog::cluster("Monetization").unwrap();
//! assert!((monetization.effect - 31.9).abs() < 1e-9); // (4 + 25) * 1.1
//! assert_eq!(catalog::find("freemium model").unwrap().effect, 25.0);
//! ```

use crate::models::strategy::StrategyEffect;

/// Multiplier applied to the summed effects of a cluster's members
pub const SYNERGY_BONUS: f64 = 1.1;

/// Single measures in catalog order
const MEASURES: &[(&str, f64)] = &[
    ("SEM", 5.16),
    ("Social Media Marketing", 2.0),
    ("Affiliate Marketing", 16.0),
    ("Reduced Fees", 4.0),
    ("Freemium Model", 25.0),
    ("Community Forum", 2.0),
    ("Loyalty Points", 20.0),
    ("Personalized Recommendations", 17.5),
    ("Sustainable Values", 10.0),
    ("CO2 Transparency", 5.0),
    ("Sustainable Product Filters", 5.0),
    ("Regional Partnerships", 10.0),
];

/// Clusters in catalog order, by member name
const CLUSTERS: &[(&str, &[&str])] = &[
    (
        "Visibility & User Acquisition",
        &["SEM", "Social Media Marketing", "Affiliate Marketing"],
    ),
    ("Monetization", &["Reduced Fees", "Freemium Model"]),
    ("Community & Retention", &["Community Forum", "Loyalty Points"]),
    (
        "Sustainability & Locality",
        &[
            "Sustainable Values",
            "CO2 Transparency",
            "Sustainable Product Filters",
            "Regional Partnerships",
        ],
    ),
];

/// Label of the scenario that adopts every cluster
pub const ALL_CLUSTERS: &str = "All Clusters";

fn measure_effect(name: &str) -> f64 {
    MEASURES
        .iter()
        .find(|(measure, _)| *measure == name)
        .map(|(_, effect)| *effect)
        .unwrap_or(0.0)
}

fn build_cluster(name: &str, members: &[&str]) -> StrategyEffect {
    let sum: f64 = members.iter().map(|m| measure_effect(m)).sum();
    StrategyEffect::new(name, sum * SYNERGY_BONUS)
}

/// Every single measure, in catalog order
pub fn single_measures() -> Vec<StrategyEffect> {
    MEASURES
        .iter()
        .map(|(name, effect)| StrategyEffect::new(*name, *effect))
        .collect()
}

/// Every cluster with its synergy effect, in catalog order
pub fn clusters() -> Vec<StrategyEffect> {
    CLUSTERS
        .iter()
        .map(|(name, members)| build_cluster(name, members))
        .collect()
}

/// Cluster by exact name
pub fn cluster(name: &str) -> Option<StrategyEffect> {
    CLUSTERS
        .iter()
        .find(|(cluster, _)| *cluster == name)
        .map(|(name, members)| build_cluster(name, members))
}

/// Member measures of a cluster
pub fn cluster_members(name: &str) -> Option<&'static [&'static str]> {
    CLUSTERS
        .iter()
        .find(|(cluster, _)| *cluster == name)
        .map(|(_, members)| *members)
}

/// Measure or cluster by name, ignoring ASCII case
pub fn find(name: &str) -> Option<StrategyEffect> {
    single_measures()
        .into_iter()
        .chain(clusters())
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
}

/// Cluster combinations: every pair, then every triple (lexicographic in
/// catalog order), then all clusters together
pub fn cluster_combinations() -> Vec<Vec<StrategyEffect>> {
    let all = clusters();
    let n = all.len();
    let mut combos = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            combos.push(vec![all[i].clone(), all[j].clone()]);
        }
    }
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                combos.push(vec![all[i].clone(), all[j].clone(), all[k].clone()]);
            }
        }
    }
    combos.push(all);

    combos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_twelve_measures_in_order() {
        let measures = single_measures();
        assert_eq!(measures.len(), 12);
        assert_eq!(measures[0], StrategyEffect::new("SEM", 5.16));
        assert_eq!(measures[11].name, "Regional Partnerships");
    }

    #[test]
    fn test_cluster_synergy_values() {
        let clusters = clusters();
        assert_eq!(clusters.len(), 4);
        assert!(approx(clusters[0].effect, 23.16 * 1.1));
        assert!(approx(clusters[1].effect, 31.9));
        assert!(approx(clusters[2].effect, 24.2));
        assert!(approx(clusters[3].effect, 33.0));
    }

    #[test]
    fn test_unclustered_measure() {
        let clustered: Vec<&str> = CLUSTERS
            .iter()
            .flat_map(|(_, members)| members.iter().copied())
            .collect();
        assert_eq!(clustered.len(), 11);
        assert!(!clustered.contains(&"Personalized Recommendations"));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("co2 transparency").unwrap().effect, 5.0);
        assert!(approx(find("COMMUNITY & RETENTION").unwrap().effect, 24.2));
        assert!(find("Blockchain").is_none());
    }

    #[test]
    fn test_cluster_combinations() {
        let combos = cluster_combinations();
        // C(4,2) + C(4,3) + 1
        assert_eq!(combos.len(), 11);
        assert_eq!(combos[0][0].name, "Visibility & User Acquisition");
        assert_eq!(combos[0][1].name, "Monetization");
        assert_eq!(combos[5][0].name, "Community & Retention");
        assert_eq!(combos[6].len(), 3);
        assert_eq!(combos[10].len(), 4);
    }

    #[test]
    fn test_cluster_members_lookup() {
        assert_eq!(
            cluster_members("Monetization"),
            Some(&["Reduced Fees", "Freemium Model"][..])
        );
        assert!(cluster_members("Unknown").is_none());
    }
}
