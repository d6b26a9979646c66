//! Bus-factor risk scoring from contributor concentration.

use crate::domain::Contributor;

/// Cumulative contribution share that defines the dominant group.
const DOMINANCE_SHARE: f64 = 0.80;

/// Bus factor is clamped into this range.
const MIN_BUS_FACTOR: u32 = 1;
/// Upper clamp for the bus factor.
const MAX_BUS_FACTOR: u32 = 4;

/// Teams at or above this size never report a bus factor of 1.
///
/// Tunable policy threshold: a single dominant contributor inside a
/// larger team is treated as less risky than in a one-or-two person
/// project.
const TEAM_SIZE_FLOOR_THRESHOLD: usize = 5;

/// Derive a 1-4 bus-factor risk score from contributor counts.
///
/// Walks contributors in descending contribution order and counts how
/// many are needed to reach 80% of all contributions, clamped to [1, 4].
/// Empty input yields 1; this function never fails.
pub fn calculate(contributors: &[Contributor]) -> u32 {
    let total: u64 = contributors.iter().map(|c| c.contributions).sum();
    if contributors.is_empty() || total == 0 {
        return MIN_BUS_FACTOR;
    }

    let mut sorted: Vec<u64> = contributors.iter().map(|c| c.contributions).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut cumulative = 0u64;
    let mut needed = 0u32;
    for contributions in sorted {
        cumulative += contributions;
        needed += 1;
        if cumulative as f64 / total as f64 >= DOMINANCE_SHARE {
            break;
        }
    }

    let factor = needed.clamp(MIN_BUS_FACTOR, MAX_BUS_FACTOR);
    if factor == 1 && contributors.len() >= TEAM_SIZE_FLOOR_THRESHOLD {
        return 2;
    }
    factor
}

#[cfg(test)]
mod tests {
    use super::calculate;
    use crate::domain::Contributor;

    fn contributors(counts: &[u64]) -> Vec<Contributor> {
        counts
            .iter()
            .enumerate()
            .map(|(index, contributions)| Contributor {
                id: index as u64,
                contributions: *contributions,
            })
            .collect()
    }

    #[test]
    fn empty_input_yields_one() {
        assert_eq!(calculate(&[]), 1);
    }

    #[test]
    fn zero_contributions_yield_one() {
        assert_eq!(calculate(&contributors(&[0, 0, 0])), 1);
    }

    #[test]
    fn single_contributor_is_always_one() {
        assert_eq!(calculate(&contributors(&[500])), 1);
    }

    #[test]
    fn dominant_contributor_in_small_team_is_one() {
        // 90% of contributions from one person, four total contributors:
        // the team-size floor does not apply below five contributors.
        assert_eq!(calculate(&contributors(&[900, 50, 30, 20])), 1);
    }

    #[test]
    fn dominant_contributor_in_larger_team_is_floored_to_two() {
        assert_eq!(calculate(&contributors(&[900, 30, 30, 20, 20])), 2);
    }

    #[test]
    fn equal_contributions_grow_toward_the_cap() {
        assert_eq!(calculate(&contributors(&[10, 10])), 2);
        assert_eq!(calculate(&contributors(&[10, 10, 10, 10, 10])), 4);
        assert_eq!(calculate(&contributors(&[10; 20])), 4);
    }

    #[test]
    fn result_is_always_in_range() {
        let cases: Vec<Vec<u64>> = vec![
            vec![],
            vec![1],
            vec![1, 1],
            vec![1000, 1, 1, 1, 1, 1, 1],
            vec![5; 100],
            vec![0, 0, 7],
        ];
        for counts in cases {
            let factor = calculate(&contributors(&counts));
            assert!((1..=4).contains(&factor), "factor {factor} out of range");
        }
    }

    #[test]
    fn unsorted_input_is_handled() {
        // Walk order must come from contribution counts, not input order.
        assert_eq!(calculate(&contributors(&[10, 900, 20])), 1);
    }
}
