//! Proportional reweighting of a sibling set.

use crate::error::{TreeError, TreeResult};
use crate::weight::Weight;

/// Move the sibling at `index` to `target` and return the new sibling set.
///
/// Every other sibling gives up (or receives) a share of the change in
/// proportion to its current weight, i.e. sibling `j` becomes
/// `w_j * (1 - target) / (1 - w_index)`. The integer remainder left by
/// flooring goes to the siblings with the largest fractional parts, so the
/// result sums to exactly the same total as the input.
///
/// Proportional scaling never pushes a sibling below zero. The call is
/// rejected when the other siblings carry no mass to scale (which covers a
/// node already at weight 1).
pub fn redistribute(weights: &[Weight], index: usize, target: Weight) -> TreeResult<Vec<Weight>> {
    let current = *weights.get(index).ok_or(TreeError::SiblingIndex {
        index,
        len: weights.len(),
    })?;

    if current == target {
        return Ok(weights.to_vec());
    }

    let rest: Vec<u64> = weights
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .map(|(_, w)| u64::from(w.basis_points()))
        .collect();
    let others: u64 = rest.iter().sum();
    let total = others + u64::from(current.basis_points());
    let target_bp = u64::from(target.basis_points());

    if target_bp > total {
        return Err(TreeError::RedistributionOverflow {
            index,
            target,
            reason: "target exceeds the mass of the sibling set",
        });
    }
    if others == 0 {
        return Err(TreeError::RedistributionOverflow {
            index,
            target,
            reason: "no sibling mass left to redistribute",
        });
    }

    let mut scaled = apportion(&rest, total - target_bp, others).into_iter();

    weights
        .iter()
        .enumerate()
        .map(|(j, _)| {
            let bp = if j == index {
                target_bp
            } else {
                scaled.next().unwrap_or(0)
            };
            Weight::from_basis_points(bp as u32)
        })
        .collect()
}

/// Scale a set of weights so it sums to exactly one, keeping their ratios.
///
/// Fails when every weight is zero, since there is nothing to scale.
pub fn normalize(weights: &[Weight]) -> TreeResult<Vec<Weight>> {
    let raw: Vec<u64> = weights.iter().map(|w| u64::from(w.basis_points())).collect();
    let sum: u64 = raw.iter().sum();
    if sum == 0 {
        return Err(TreeError::RedistributionOverflow {
            index: 0,
            target: Weight::ONE,
            reason: "cannot normalise a set of zero weights",
        });
    }
    apportion(&raw, u64::from(Weight::SCALE), sum)
        .into_iter()
        .map(|bp| Weight::from_basis_points(bp as u32))
        .collect()
}

/// Scale `values` by `numerator / denominator` (where `denominator` is their
/// sum) so the result sums to exactly `numerator`. Flooring leaves a
/// remainder that goes to the largest fractional parts; ties favour the
/// heavier, then the earlier entry.
fn apportion(values: &[u64], numerator: u64, denominator: u64) -> Vec<u64> {
    let mut scaled = Vec::with_capacity(values.len());
    let mut remainders = Vec::with_capacity(values.len());
    for (j, value) in values.iter().enumerate() {
        let product = value * numerator;
        scaled.push(product / denominator);
        remainders.push((product % denominator, *value, j));
    }

    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));
    let leftover = (numerator - scaled.iter().sum::<u64>()) as usize;
    for &(_, _, j) in remainders.iter().take(leftover) {
        scaled[j] += 1;
    }
    scaled
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn w(bp: u32) -> Weight {
        Weight::from_basis_points(bp).unwrap()
    }

    fn bps(weights: &[Weight]) -> Vec<u32> {
        weights.iter().map(|w| w.basis_points()).collect()
    }

    #[test]
    fn raises_one_sibling_and_shrinks_the_rest() {
        let set = [w(4000), w(5000), w(800), w(200)];
        let out = redistribute(&set, 0, Weight::ONE).unwrap();
        assert_eq!(bps(&out), vec![10_000, 0, 0, 0]);
    }

    #[test]
    fn lowering_spreads_proportionally() {
        let set = [w(5000), w(3000), w(2000)];
        let out = redistribute(&set, 0, w(0)).unwrap();
        assert_eq!(bps(&out), vec![0, 6000, 4000]);
    }

    #[test]
    fn remainder_keeps_sum_exact() {
        let set = [w(3334), w(3333), w(3333)];
        let out = redistribute(&set, 0, w(1)).unwrap();
        assert_eq!(Weight::total(&out), 10_000);
        assert_eq!(out[0], w(1));
    }

    #[test]
    fn same_weight_is_a_no_op() {
        let set = [w(5000), w(5000)];
        assert_eq!(redistribute(&set, 1, w(5000)).unwrap(), set.to_vec());
    }

    #[test]
    fn rejects_moving_a_certain_sibling() {
        let set = [Weight::ONE, w(0)];
        let err = redistribute(&set, 0, w(5000)).unwrap_err();
        assert!(matches!(err, TreeError::RedistributionOverflow { index: 0, .. }));
    }

    #[test]
    fn rejects_lone_node() {
        let err = redistribute(&[Weight::ONE], 0, w(5000)).unwrap_err();
        assert!(matches!(err, TreeError::RedistributionOverflow { .. }));
    }

    #[test]
    fn normalize_keeps_ratios() {
        let out = normalize(&[w(800), w(5000), w(4000)]).unwrap();
        assert_eq!(Weight::total(&out), 10_000);
        assert_eq!(bps(&out), vec![816, 5102, 4082]);
    }

    #[test]
    fn normalize_rejects_all_zero() {
        assert!(normalize(&[w(0), w(0)]).is_err());
    }

    #[test]
    fn rejects_bad_index() {
        let err = redistribute(&[Weight::ONE], 3, w(0)).unwrap_err();
        assert_eq!(err, TreeError::SiblingIndex { index: 3, len: 1 });
    }

    fn sibling_set() -> impl Strategy<Value = Vec<Weight>> {
        prop::collection::vec(1u32..1000, 2..8).prop_map(|raw| {
            let sum: u32 = raw.iter().sum();
            let mut scaled: Vec<u32> = raw.iter().map(|r| r * Weight::SCALE / sum).collect();
            let drift = Weight::SCALE - scaled.iter().sum::<u32>();
            scaled[0] += drift;
            scaled.into_iter().map(w).collect()
        })
    }

    proptest! {
        #[test]
        fn sum_stays_one(set in sibling_set(), pick in 0usize..8, target in 0u32..=10_000) {
            let index = pick % set.len();
            let out = redistribute(&set, index, w(target)).unwrap();
            prop_assert_eq!(Weight::total(&out), u64::from(Weight::SCALE));
            prop_assert_eq!(out[index], w(target));
        }

        #[test]
        fn siblings_keep_their_order(set in sibling_set(), target in 0u32..=10_000) {
            let out = redistribute(&set, 0, w(target)).unwrap();
            for j in 1..set.len() {
                for k in 1..set.len() {
                    if set[j] > set[k] {
                        prop_assert!(out[j].basis_points() + 1 >= out[k].basis_points());
                    }
                }
            }
        }
    }
}
