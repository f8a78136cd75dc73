/// 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A foreground/background colour pairing, addressed by integer id in a
/// [`ColorPairTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub fg_rgb: Rgb,
    pub bg_rgb: Rgb,
}

/// The colour pair table holds at least 256 entries; id 0 is the default
/// pair and must be defined before a [`crate::Grid`] is usable. The table is
/// append-only during normal operation (replacing an existing id is
/// permitted and forces a full-grid redraw — the caller's responsibility,
/// since the table itself has no redraw hook).
pub struct ColorPairTable {
    pairs: Vec<Option<ColorPair>>,
}

/// The pair table must hold at least this many entries (§3 Data Model).
pub const MIN_COLOR_PAIRS: usize = 256;

impl Default for ColorPairTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPairTable {
    pub fn new() -> Self {
        ColorPairTable { pairs: vec![None; MIN_COLOR_PAIRS] }
    }

    pub fn with_capacity(min_pairs: usize) -> Self {
        ColorPairTable { pairs: vec![None; min_pairs.max(MIN_COLOR_PAIRS)] }
    }

    /// Defines (or replaces) a pair, growing the table if `id` is beyond the
    /// current capacity.
    pub fn define(&mut self, id: u16, pair: ColorPair) {
        let idx = usize::from(id);
        if idx >= self.pairs.len() {
            self.pairs.resize(idx + 1, None);
        }
        self.pairs[idx] = Some(pair);
    }

    pub fn get(&self, id: u16) -> Option<ColorPair> {
        self.pairs.get(usize::from(id)).copied().flatten()
    }

    /// Resolves `id` to a defined pair, substituting pair 0 (which always
    /// exists once the table has been initialised) if `id` is unknown.
    pub fn resolve(&self, id: u16) -> ColorPair {
        self.get(id).or_else(|| self.get(0)).expect("pair 0 must be defined")
    }

    /// The effective background colour for a cell with this pair and flags:
    /// the pair's `bg_rgb`, or `fg_rgb` if REVERSE is set.
    pub fn effective_background(&self, id: u16, flags: crate::CellFlags) -> Rgb {
        let pair = self.resolve(id);
        if flags.contains(crate::CellFlags::REVERSE) {
            pair.fg_rgb
        } else {
            pair.bg_rgb
        }
    }

    /// The effective foreground colour, honouring REVERSE the same way.
    pub fn effective_foreground(&self, id: u16, flags: crate::CellFlags) -> Rgb {
        let pair = self.resolve(id);
        if flags.contains(crate::CellFlags::REVERSE) {
            pair.bg_rgb
        } else {
            pair.fg_rgb
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellFlags;

    fn pair(fg: Rgb, bg: Rgb) -> ColorPair {
        ColorPair { fg_rgb: fg, bg_rgb: bg }
    }

    #[test]
    fn table_holds_at_least_256_entries() {
        let table = ColorPairTable::new();
        assert!(table.pairs.len() >= MIN_COLOR_PAIRS);
    }

    #[test]
    fn unknown_pair_resolves_to_pair_zero() {
        let mut table = ColorPairTable::new();
        table.define(0, pair(Rgb(1, 1, 1), Rgb(2, 2, 2)));
        assert_eq!(table.resolve(99), pair(Rgb(1, 1, 1), Rgb(2, 2, 2)));
    }

    #[test]
    fn reverse_swaps_effective_background_and_foreground() {
        let mut table = ColorPairTable::new();
        table.define(1, pair(Rgb(255, 255, 255), Rgb(0, 0, 0)));
        assert_eq!(table.effective_background(1, CellFlags::empty()), Rgb(0, 0, 0));
        assert_eq!(table.effective_background(1, CellFlags::REVERSE), Rgb(255, 255, 255));
        assert_eq!(table.effective_foreground(1, CellFlags::REVERSE), Rgb(0, 0, 0));
    }

    #[test]
    fn define_grows_table_beyond_initial_capacity() {
        let mut table = ColorPairTable::new();
        table.define(0, pair(Rgb(0, 0, 0), Rgb(0, 0, 0)));
        table.define(500, pair(Rgb(9, 9, 9), Rgb(8, 8, 8)));
        assert_eq!(table.get(500), Some(pair(Rgb(9, 9, 9), Rgb(8, 8, 8))));
    }
}
