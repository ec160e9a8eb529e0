use rand::Rng;

/// Fisher-Yates shuffle into a new vector; the input is left untouched.
/// Walks `i` from the last index down to 1, swapping with a uniform `j` in `[0, i]`.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// First `n` elements of a fresh shuffle; a full shuffle when `n >= items.len()`.
pub fn pick_random<T: Clone, R: Rng + ?Sized>(items: &[T], n: usize, rng: &mut R) -> Vec<T> {
    let mut out = shuffle(items, rng);
    out.truncate(n);
    out
}
