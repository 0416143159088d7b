#![allow(dead_code)] // Shared across test binaries; each uses a subset.

use core_life::{pack, Rule, StripGeometry};

/// Naive cell-by-cell toroidal evaluator. Slow and obviously correct; the
/// reference the SWAR kernel is checked against.
pub struct Oracle {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl Oracle {
    pub fn from_packed(geo: &StripGeometry, packed: &[u8]) -> Self {
        let (width, height) = (geo.width(), geo.height());
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(pack::cell(geo, packed, x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn to_packed(&self, geo: &StripGeometry) -> Vec<u8> {
        let mut packed = pack::empty_seed(geo);
        for y in 0..self.height {
            for x in 0..self.width {
                pack::set_cell(geo, &mut packed, x, y, self.get(x as i64, y as i64));
            }
        }
        packed
    }

    fn get(&self, x: i64, y: i64) -> bool {
        let x = x.rem_euclid(i64::from(self.width)) as u32;
        let y = y.rem_euclid(i64::from(self.height)) as u32;
        self.cells[(y * self.width + x) as usize]
    }

    fn live_neighbours(&self, x: i64, y: i64) -> u32 {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) != (0, 0) && self.get(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn step(&mut self, rule: Rule) {
        let mut next = Vec::with_capacity(self.cells.len());
        for y in 0..i64::from(self.height) {
            for x in 0..i64::from(self.width) {
                let n = self.live_neighbours(x, y);
                next.push(if self.get(x, y) {
                    rule.survives_with(n)
                } else {
                    rule.born_with(n)
                });
            }
        }
        self.cells = next;
    }
}

/// Place an `'X'`/`'.'` row pattern with its top-left corner at `(x0, y0)`.
pub fn stamp(geo: &StripGeometry, packed: &mut [u8], x0: u32, y0: u32, rows: &[&str]) {
    for (dy, row) in rows.iter().enumerate() {
        for (dx, ch) in row.chars().enumerate() {
            if ch == 'X' {
                pack::set_cell(geo, packed, x0 + dx as u32, y0 + dy as u32, true);
            }
        }
    }
}

/// Collect live-cell coordinates, for readable assertions.
pub fn live_cells(geo: &StripGeometry, packed: &[u8]) -> Vec<(u32, u32)> {
    let mut live = Vec::new();
    for y in 0..geo.height() {
        for x in 0..geo.width() {
            if pack::cell(geo, packed, x, y) {
                live.push((x, y));
            }
        }
    }
    live
}
