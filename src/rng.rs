use rand::SeedableRng;
use rand_pcg::Pcg64;

/// Deterministic RNG factory for a given (seed, stream, draw) triple.
///
/// Implementation detail:
/// - Derives a per-draw 64-bit seed as `seed ^ rotl(stream, 32) ^ draw`.
/// - Uses PCG 64-bit generator (rand_pcg::Pcg64) for reproducible sequences.
/// - Returned RNG is deterministic and reproducible across runs when inputs are equal.
#[inline]
pub fn rng_for_state(seed: u64, stream: u64, draw: u64) -> Pcg64 {
    let derived: u64 = seed ^ stream.rotate_left(32) ^ draw;
    Pcg64::seed_from_u64(derived)
}

/// Position in a deterministic random sequence, small enough to live inside
/// game states so that transitions stay pure: each random decision takes a
/// fresh generator from the cursor and moves it forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RngCursor {
    pub seed: u64,
    pub stream: u64,
    pub draws: u64,
}

impl RngCursor {
    #[inline]
    pub const fn new(seed: u64, stream: u64) -> Self {
        Self {
            seed,
            stream,
            draws: 0,
        }
    }

    #[inline]
    pub fn next_rng(&mut self) -> Pcg64 {
        let rng = rng_for_state(self.seed, self.stream, self.draws);
        self.draws += 1;
        rng
    }
}
