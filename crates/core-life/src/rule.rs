//! Rule descriptors.
//!
//! A rule is two bitmasks over neighbour counts 0..=8: `born` for dead
//! cells, `survives` for live ones. The kernel folds these into
//! including-self sum classes once at construction, so rule selection costs
//! nothing per tick.

/// Birth/survival bitmasks, bit `n` meaning "with exactly `n` live
/// neighbours".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    born: u16,
    survives: u16,
}

/// One including-self neighbourhood sum the kernel must test for, and which
/// cell polarity it applies to. A live cell with `m` neighbours sums to
/// `m + 1`; a dead cell with `n` neighbours sums to `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SumClass {
    pub sum: u32,
    pub applies_live: bool,
    pub applies_dead: bool,
}

impl Rule {
    const fn new(born: u16, survives: u16) -> Self {
        Self { born, survives }
    }

    /// Conway's Game of Life, B3/S23.
    pub const fn life() -> Self {
        Self::new(1 << 3, 1 << 2 | 1 << 3)
    }

    /// DryLife, B37/S23: dead cells are additionally born with exactly 7
    /// live neighbours.
    pub const fn drylife() -> Self {
        Self::new(1 << 3 | 1 << 7, 1 << 2 | 1 << 3)
    }

    pub fn born_with(&self, neighbours: u32) -> bool {
        neighbours <= 8 && self.born & (1 << neighbours) != 0
    }

    pub fn survives_with(&self, neighbours: u32) -> bool {
        neighbours <= 8 && self.survives & (1 << neighbours) != 0
    }

    /// The including-self sums this rule distinguishes. Sums range 0..=9
    /// (a 3×3 neighbourhood of cells valued 0 or 1).
    pub fn sum_classes(&self) -> Vec<SumClass> {
        let mut classes = Vec::new();
        for sum in 0..=9u32 {
            let applies_live = sum >= 1 && self.survives_with(sum - 1);
            let applies_dead = self.born_with(sum);
            if applies_live || applies_dead {
                classes.push(SumClass {
                    sum,
                    applies_live,
                    applies_dead,
                });
            }
        }
        classes
    }
}
