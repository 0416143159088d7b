//! The SWAR step kernel.
//!
//! One strip's cells live in a single [`WideUint`], one nibble per cell, and
//! a generation advances with a fixed sequence of whole-integer operations:
//! splice in the neighbour halo rows, copy the wrap columns, sum each 3×3
//! neighbourhood with four shifted adds, compare every nibble against the
//! rule's sum classes, and clamp back to the canvas. No per-cell loop
//! exists anywhere on this path.
//!
//! Layout recap (least significant nibble first): 2 spare nibbles, the
//! upper halo row, `height` canvas rows of `stride` nibbles, the lower halo
//! row, headroom. Nibble sums stay ≤ 9, so the shifted adds can never carry
//! across nibble boundaries.

use crate::geometry::StripGeometry;
use crate::masks::StripMasks;
use crate::rule::Rule;
use core_wide::WideUint;

struct Comparator {
    mask_not: WideUint,
    applies_live: bool,
    applies_dead: bool,
}

/// Advances one strip by one generation per call.
///
/// Owns the derived masks and all scratch integers, so stepping allocates
/// nothing.
pub struct StepKernel {
    geo: StripGeometry,
    rule: Rule,
    masks: StripMasks,
    comparators: Vec<Comparator>,
    sum: WideUint,
    eq: WideUint,
    shifted: WideUint,
    masked: WideUint,
    next: WideUint,
}

impl StepKernel {
    pub fn new(geo: StripGeometry, rule: Rule) -> Self {
        let masks = StripMasks::derive(&geo);
        let comparators = rule
            .sum_classes()
            .into_iter()
            .map(|class| Comparator {
                mask_not: masks.comparator(class.sum),
                applies_live: class.applies_live,
                applies_dead: class.applies_dead,
            })
            .collect();
        let capacity = geo.capacity_nibbles();
        Self {
            geo,
            rule,
            masks,
            comparators,
            sum: WideUint::zero(capacity),
            eq: WideUint::zero(capacity),
            shifted: WideUint::zero(capacity),
            masked: WideUint::zero(capacity),
            next: WideUint::zero(capacity),
        }
    }

    pub fn geometry(&self) -> &StripGeometry {
        &self.geo
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Build a working state from packed bytes. The canvas clamp makes any
    /// non-canonical input (stray nibble bits, dirty padding) legal.
    pub fn state_from_packed(&self, packed: &[u8]) -> WideUint {
        debug_assert_eq!(packed.len(), self.geo.state_bytes());
        let mut state = WideUint::zero(self.geo.capacity_nibbles());
        state.or_bytes_at(packed, self.geo.canvas_byte_offset());
        state.and_assign(&self.masks.canvas);
        state
    }

    /// Extract the packed canvas bytes of a working state.
    pub fn export_packed(&self, state: &WideUint) -> Vec<u8> {
        let mut packed = vec![0u8; self.geo.state_bytes()];
        state.copy_bytes_to(&mut packed, self.geo.canvas_byte_offset());
        packed
    }

    /// Advance one generation. `top_halo` is the bottom row of the strip
    /// above (canvas row −1 here); `bottom_halo` is the top row of the strip
    /// below (canvas row `height`). Both are one packed row.
    pub fn step(&mut self, state: &mut WideUint, top_halo: &[u8], bottom_halo: &[u8]) {
        let geo = &self.geo;
        debug_assert_eq!(top_halo.len(), geo.row_bytes());
        debug_assert_eq!(bottom_halo.len(), geo.row_bytes());

        // Vertical wrap: splice the halo rows into the extended grid.
        state.or_bytes_at(top_halo, geo.top_halo_byte_offset());
        state.or_bytes_at(bottom_halo, geo.bottom_halo_byte_offset());

        // Horizontal wrap: mirror each edge into the far side's padding.
        // Column −1 of a row is the last padding column of the row below it
        // in the flat nibble string, so a single whole-integer shift by
        // `width` nibbles lands every copy where the ±1 neighbour shifts
        // will find it.
        self.masked.assign(state);
        self.masked.and_assign(&self.masks.wrap_left);
        self.shifted.shl_from(&self.masked, geo.width_bits());
        state.or_assign(&self.shifted);
        self.masked.assign(state);
        self.masked.and_assign(&self.masks.wrap_right);
        self.shifted.shr_from(&self.masked, geo.width_bits());
        state.or_assign(&self.shifted);

        // Each nibble becomes the sum of its 3×3 neighbourhood, self
        // included: fold horizontally (±1 cell), then vertically (±1 row).
        self.sum.assign(state);
        self.shifted.shr_from(state, 4);
        self.sum.add_assign(&self.shifted);
        self.shifted.shl_from(state, 4);
        self.sum.add_assign(&self.shifted);
        self.shifted.shr_from(&self.sum, geo.colshift_bits());
        self.masked.shl_from(&self.sum, geo.colshift_bits());
        self.sum.add_assign(&self.shifted);
        self.sum.add_assign(&self.masked);

        // Per-nibble equality against each sum class, folded down to bit 0.
        self.next.clear();
        for comp in &self.comparators {
            self.eq.assign(&self.sum);
            self.eq.xor_assign(&comp.mask_not);
            self.shifted.shr_from(&self.eq, 2);
            self.eq.and_assign(&self.shifted);
            self.shifted.shr_from(&self.eq, 1);
            self.eq.and_assign(&self.shifted);
            match (comp.applies_live, comp.applies_dead) {
                (true, true) => {}
                (true, false) => self.eq.and_assign(state),
                // `state` keeps only bit 0 per nibble, so the complement's
                // bit 0 marks dead cells.
                (false, true) => self.eq.and_not_assign(state),
                (false, false) => unreachable!("empty sum class"),
            }
            self.next.or_assign(&self.eq);
        }

        // Clamp: clears halo rows, padding columns, and the fold garbage in
        // bits 1..3 of every nibble.
        self.next.and_assign(&self.masks.canvas);
        state.assign(&self.next);
    }

    /// Advance one generation treating this strip as the whole canvas:
    /// its own edge rows serve as the halos. This is the single-strip
    /// (`K = 1`) evaluator the pipeline equivalence tests compare against.
    pub fn step_wrapped(&mut self, state: &mut WideUint) {
        let packed = self.export_packed(state);
        let row_bytes = self.geo.row_bytes();
        let top_row = packed[..row_bytes].to_vec();
        let bottom_row = packed[packed.len() - row_bytes..].to_vec();
        self.step(state, &bottom_row, &top_row);
    }
}
