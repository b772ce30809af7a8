//! Mask module - canonical piece shapes and their pure rotations
//!
//! A mask is the square bounding-box grid of a piece: `0` for empty cells,
//! the piece's tile id for occupied ones. Each kind has one immutable
//! canonical mask (its spawn state); every other rotation state is derived
//! by pure grid rotation, never looked up. Kick offsets are applied to the
//! bounding-box origin, not baked into the shapes.

use tetrion_types::PieceKind;

/// Largest bounding box (the I piece).
const MAX_SIZE: usize = 4;

/// A piece shape inside its square bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mask {
    size: u8,
    cells: [[u8; MAX_SIZE]; MAX_SIZE],
}

impl Mask {
    /// The canonical spawn-state mask for a piece kind.
    #[rustfmt::skip]
    pub fn for_kind(kind: PieceKind) -> Self {
        let t = kind.tile_id();
        match kind {
            PieceKind::T => Self::from_rows(3, [
                [0, t, 0, 0],
                [t, t, t, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            PieceKind::S => Self::from_rows(3, [
                [0, t, t, 0],
                [t, t, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            PieceKind::Z => Self::from_rows(3, [
                [t, t, 0, 0],
                [0, t, t, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            PieceKind::L => Self::from_rows(3, [
                [0, 0, t, 0],
                [t, t, t, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            PieceKind::J => Self::from_rows(3, [
                [t, 0, 0, 0],
                [t, t, t, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            PieceKind::O => Self::from_rows(2, [
                [t, t, 0, 0],
                [t, t, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            PieceKind::I => Self::from_rows(4, [
                [0, 0, 0, 0],
                [t, t, t, t],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
        }
    }

    fn from_rows(size: u8, cells: [[u8; MAX_SIZE]; MAX_SIZE]) -> Self {
        Self { size, cells }
    }

    /// Bounding box edge length.
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Cell value inside the bounding box.
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.cells[y][x]
    }

    /// Iterate the occupied cells as `(x, y, value)` bounding-box offsets.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        let n = self.size();
        (0..n).flat_map(move |y| {
            (0..n).filter_map(move |x| {
                let value = self.cells[y][x];
                (value != 0).then_some((x, y, value))
            })
        })
    }

    /// The mask rotated 90 degrees clockwise.
    pub fn rotated_cw(&self) -> Self {
        let n = self.size();
        let mut out = Self::from_rows(self.size, [[0; MAX_SIZE]; MAX_SIZE]);
        for y in 0..n {
            for x in 0..n {
                out.cells[y][x] = self.cells[n - 1 - x][y];
            }
        }
        out
    }

    /// The mask rotated 90 degrees counter-clockwise.
    pub fn rotated_ccw(&self) -> Self {
        let n = self.size();
        let mut out = Self::from_rows(self.size, [[0; MAX_SIZE]; MAX_SIZE]);
        for y in 0..n {
            for x in 0..n {
                out.cells[y][x] = self.cells[x][n - 1 - y];
            }
        }
        out
    }

    /// The mask rotated 180 degrees.
    pub fn rotated_180(&self) -> Self {
        let n = self.size();
        let mut out = Self::from_rows(self.size, [[0; MAX_SIZE]; MAX_SIZE]);
        for y in 0..n {
            for x in 0..n {
                out.cells[y][x] = self.cells[n - 1 - y][n - 1 - x];
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(mask: &Mask) -> Vec<(usize, usize)> {
        mask.filled().map(|(x, y, _)| (x, y)).collect()
    }

    #[test]
    fn test_every_mask_has_four_cells() {
        for kind in PieceKind::VARIANTS {
            let mask = Mask::for_kind(kind);
            assert_eq!(mask.filled().count(), 4, "{:?}", kind);
            for (_, _, value) in mask.filled() {
                assert_eq!(value, kind.tile_id());
            }
        }
    }

    #[test]
    fn test_t_rotations() {
        let north = Mask::for_kind(PieceKind::T);
        assert_eq!(offsets(&north), vec![(1, 0), (0, 1), (1, 1), (2, 1)]);

        let east = north.rotated_cw();
        assert_eq!(offsets(&east), vec![(1, 0), (1, 1), (2, 1), (1, 2)]);

        let west = north.rotated_ccw();
        assert_eq!(offsets(&west), vec![(1, 0), (0, 1), (1, 1), (1, 2)]);

        let south = north.rotated_180();
        assert_eq!(offsets(&south), vec![(0, 1), (1, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn test_i_rotates_to_column() {
        let east = Mask::for_kind(PieceKind::I).rotated_cw();
        assert_eq!(offsets(&east), vec![(2, 0), (2, 1), (2, 2), (2, 3)]);

        let west = Mask::for_kind(PieceKind::I).rotated_ccw();
        assert_eq!(offsets(&west), vec![(1, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_o_is_rotation_invariant() {
        let mask = Mask::for_kind(PieceKind::O);
        assert_eq!(mask.rotated_cw(), mask);
        assert_eq!(mask.rotated_ccw(), mask);
        assert_eq!(mask.rotated_180(), mask);
    }

    #[test]
    fn test_rotations_compose() {
        for kind in PieceKind::VARIANTS {
            let mask = Mask::for_kind(kind);
            assert_eq!(mask.rotated_cw().rotated_ccw(), mask);
            assert_eq!(mask.rotated_cw().rotated_cw(), mask.rotated_180());
            assert_eq!(mask.rotated_180().rotated_180(), mask);
        }
    }
}
