//! Bag module - seeded 7-bag piece generation
//!
//! Draws come from a bag holding one of each piece kind, shuffled; when the
//! bag empties it is refilled and reshuffled. A small LCG keeps the
//! sequence deterministic per seed without pulling in an RNG dependency.

use tetrion_types::PieceKind;

/// Linear congruential generator (Numerical Recipes constants).
#[derive(Debug, Clone)]
struct Lcg {
    state: u32,
}

impl Lcg {
    fn new(seed: u32) -> Self {
        // A zero state would never leave zero.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}

/// 7-bag piece generator.
#[derive(Debug, Clone)]
pub struct SevenBag {
    bag: [PieceKind; 7],
    index: usize,
    rng: Lcg,
}

impl SevenBag {
    /// Create a generator with the given seed.
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: PieceKind::VARIANTS,
            index: 0,
            rng: Lcg::new(seed),
        };
        bag.refill();
        bag
    }

    /// Fisher-Yates shuffle of a fresh bag.
    fn refill(&mut self) {
        self.bag = PieceKind::VARIANTS;
        for i in (1..self.bag.len()).rev() {
            let j = self.rng.next_range(i as u32 + 1) as usize;
            self.bag.swap(i, j);
        }
        self.index = 0;
    }

    /// The next piece without drawing it.
    pub fn peek(&self) -> PieceKind {
        self.bag[self.index]
    }

    /// Draw the next piece, refilling the bag when it runs out.
    pub fn draw(&mut self) -> PieceKind {
        let kind = self.bag[self.index];
        self.index += 1;
        if self.index >= self.bag.len() {
            self.refill();
        }
        kind
    }
}
