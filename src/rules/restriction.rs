//! Focus-mode card selection.
//!
//! Focus mode narrows play to four cards. The selection must leave the
//! player something to solve: whenever any entry still has both faces
//! unmatched, at least one such complete pair is among the four.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cards::PairId;
use crate::core::GameRng;

/// Number of cards active in focus mode.
pub const FOCUS_SIZE: usize = 4;

/// Indices of the cards active in focus mode.
pub type ActiveSet = SmallVec<[usize; FOCUS_SIZE]>;

/// Pick up to four distinct indices from the unmatched cards.
///
/// `unmatched` lists each unmatched card's table index with its pair.
/// Complete pairs are shuffled and up to two are taken whole; remaining
/// slots are filled with random unmatched cards. With no complete pair, four
/// random unmatched cards are returned.
pub fn select_four(unmatched: &[(usize, PairId)], rng: &mut GameRng) -> ActiveSet {
    let mut groups: FxHashMap<PairId, SmallVec<[usize; 2]>> = FxHashMap::default();
    let mut order: Vec<PairId> = Vec::new();
    for &(index, pair) in unmatched {
        let group = groups.entry(pair).or_insert_with(|| {
            order.push(pair);
            SmallVec::new()
        });
        group.push(index);
    }

    // First-seen order keeps selection a function of the seed alone
    let mut complete: Vec<[usize; 2]> = order
        .iter()
        .filter_map(|pair| match groups.get(pair).map(|g| g.as_slice()) {
            Some(&[a, b]) => Some([a, b]),
            _ => None,
        })
        .collect();

    let mut selected = ActiveSet::new();
    if !complete.is_empty() {
        rng.shuffle(&mut complete);
        for pair in complete.iter().take(FOCUS_SIZE / 2) {
            selected.extend_from_slice(pair);
        }
    }

    if selected.len() < FOCUS_SIZE {
        let mut rest: Vec<usize> = unmatched
            .iter()
            .map(|&(index, _)| index)
            .filter(|index| !selected.contains(index))
            .collect();
        rng.shuffle(&mut rest);
        let missing = FOCUS_SIZE - selected.len();
        selected.extend(rest.into_iter().take(missing));
    }

    selected
}
