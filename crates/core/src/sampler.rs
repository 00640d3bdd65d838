use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::Question;

/// Draw up to `n` distinct questions from `pool` in random order.
///
/// A pool shorter than `n` comes back whole, shuffled. Selection is by
/// position, so repeated question numbers in the source are still distinct
/// entries.
pub fn sample<R: Rng + ?Sized>(pool: &[Question], n: usize, rng: &mut R) -> Vec<Question> {
    let mut picked = pool.to_vec();
    picked.as_mut_slice().shuffle(rng);
    picked.truncate(n);
    picked
}
