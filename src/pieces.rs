//! Piece catalog: the seven tetromino shapes and their rotation states.

use rand::Rng;
use std::sync::LazyLock;

/// Side length of a piece's square bounding box.
pub const PIECE_SIZE: usize = 4;

/// Rotation states per definition. Every shape carries four; shapes with
/// rotational symmetry (like O) simply repeat the same mask.
pub const NUM_ROTATIONS: usize = 4;

/// Block stored in a matrix cell, one per tetromino family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    I,
    J,
    L,
    O,
    S,
    Z,
    T,
}

impl BlockType {
    pub const ALL: [Self; 7] = [
        Self::I,
        Self::J,
        Self::L,
        Self::O,
        Self::S,
        Self::Z,
        Self::T,
    ];

    /// Colour index 0..7 for `theme.block_color()`. The default palette
    /// follows the Atari/arcade scheme (I red, J yellow, L magenta,
    /// O blue, S cyan, Z orange, T green).
    pub fn color_index(self) -> u8 {
        match self {
            Self::I => 0,
            Self::J => 1,
            Self::L => 2,
            Self::O => 3,
            Self::S => 4,
            Self::Z => 5,
            Self::T => 6,
        }
    }
}

/// Occupancy mask over the bounding box; `mask[row][col]`.
type Mask = [[bool; PIECE_SIZE]; PIECE_SIZE];

/// Precomputed geometry for one tetromino family: one occupancy mask per
/// rotation state. Definitions are built once and shared read-only.
#[derive(Debug)]
pub struct PieceDefinition {
    kind: BlockType,
    masks: [Mask; NUM_ROTATIONS],
}

impl PieceDefinition {
    /// Builds the rotation states from a base layout by repeated 90°
    /// clockwise rotation. A cell-count mismatch between rotations is a
    /// table defect, caught here rather than mid-game.
    fn new(kind: BlockType, cells: [(usize, usize); 4]) -> Self {
        let mut base = [[false; PIECE_SIZE]; PIECE_SIZE];
        for (row, col) in cells {
            assert!(!base[row][col], "duplicate cell in {kind:?} layout");
            base[row][col] = true;
        }
        let mut masks = [base; NUM_ROTATIONS];
        for i in 1..NUM_ROTATIONS {
            masks[i] = rotate_cw(&masks[i - 1]);
        }
        let def = Self { kind, masks };
        for rot in 1..NUM_ROTATIONS {
            assert_eq!(
                def.occupied_count(rot),
                def.occupied_count(0),
                "rotation {rot} of {kind:?} changes the cell count"
            );
        }
        def
    }

    pub fn kind(&self) -> BlockType {
        self.kind
    }

    /// Block at local (row, col) for the given rotation, or None when the
    /// cell is unoccupied or outside the bounding box. Pure lookup; the
    /// rotation index wraps modulo the rotation count.
    pub fn block(&self, rotation: usize, row: usize, col: usize) -> Option<BlockType> {
        if row >= PIECE_SIZE || col >= PIECE_SIZE {
            return None;
        }
        self.masks[rotation % NUM_ROTATIONS][row][col].then_some(self.kind)
    }

    fn occupied_count(&self, rotation: usize) -> usize {
        self.masks[rotation % NUM_ROTATIONS]
            .iter()
            .flatten()
            .filter(|&&occupied| occupied)
            .count()
    }
}

/// Rotate a mask 90° clockwise within the bounding box.
fn rotate_cw(mask: &Mask) -> Mask {
    let mut out = [[false; PIECE_SIZE]; PIECE_SIZE];
    for (row, cells) in mask.iter().enumerate() {
        for (col, &occupied) in cells.iter().enumerate() {
            if occupied {
                out[col][PIECE_SIZE - 1 - row] = true;
            }
        }
    }
    out
}

/// The fixed set of seven definitions, shared across all games.
static CATALOG: LazyLock<[PieceDefinition; 7]> = LazyLock::new(|| {
    [
        PieceDefinition::new(BlockType::I, [(1, 0), (1, 1), (1, 2), (1, 3)]),
        PieceDefinition::new(BlockType::J, [(0, 0), (1, 0), (1, 1), (1, 2)]),
        PieceDefinition::new(BlockType::L, [(0, 2), (1, 0), (1, 1), (1, 2)]),
        PieceDefinition::new(BlockType::O, [(0, 1), (0, 2), (1, 1), (1, 2)]),
        PieceDefinition::new(BlockType::S, [(0, 1), (0, 2), (1, 0), (1, 1)]),
        PieceDefinition::new(BlockType::Z, [(0, 0), (0, 1), (1, 1), (1, 2)]),
        PieceDefinition::new(BlockType::T, [(0, 1), (1, 0), (1, 1), (1, 2)]),
    ]
});

/// Uniformly-random definition (1/7 each).
pub fn random_piece_definition<R: Rng>(rng: &mut R) -> &'static PieceDefinition {
    &CATALOG[rng.gen_range(0..CATALOG.len())]
}

/// The currently-controlled (or on-deck) piece: a definition plus a
/// rotation index. Replaced, never reshaped, when it locks or is promoted
/// from the next-piece slot.
#[derive(Debug, Clone)]
pub struct Piece {
    definition: &'static PieceDefinition,
    rotation: usize,
}

impl Piece {
    /// Random shape with a random initial orientation.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            definition: random_piece_definition(rng),
            rotation: rng.gen_range(0..NUM_ROTATIONS),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_rotation(definition: &'static PieceDefinition, rotation: usize) -> Self {
        Self {
            definition,
            rotation: rotation % NUM_ROTATIONS,
        }
    }

    pub fn kind(&self) -> BlockType {
        self.definition.kind()
    }

    /// Block at local (row, col) for the current rotation.
    pub fn block(&self, row: usize, col: usize) -> Option<BlockType> {
        self.definition.block(self.rotation, row, col)
    }

    /// Rotate counter-clockwise; always succeeds. Placement validity is
    /// the matrix's job.
    pub fn rotate_left(&mut self) {
        self.rotation = (self.rotation + NUM_ROTATIONS - 1) % NUM_ROTATIONS;
    }

    /// Rotate clockwise; always succeeds.
    pub fn rotate_right(&mut self) {
        self.rotation = (self.rotation + 1) % NUM_ROTATIONS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn occupied_cells(piece: &Piece) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for row in 0..PIECE_SIZE {
            for col in 0..PIECE_SIZE {
                if piece.block(row, col).is_some() {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    #[test]
    fn test_catalog_has_all_seven_kinds() {
        let kinds: Vec<BlockType> = CATALOG.iter().map(PieceDefinition::kind).collect();
        assert_eq!(kinds, BlockType::ALL.to_vec());
    }

    #[test]
    fn test_occupied_count_invariant_across_rotations() {
        for def in CATALOG.iter() {
            for rot in 0..NUM_ROTATIONS {
                assert_eq!(def.occupied_count(rot), 4, "{:?} rotation {rot}", def.kind());
            }
        }
    }

    #[test]
    fn test_rotation_closure_right() {
        for def in CATALOG.iter() {
            let mut piece = Piece::with_rotation(def, 1);
            let before = occupied_cells(&piece);
            for _ in 0..NUM_ROTATIONS {
                piece.rotate_right();
            }
            assert_eq!(occupied_cells(&piece), before, "{:?}", def.kind());
        }
    }

    #[test]
    fn test_rotation_closure_left() {
        for def in CATALOG.iter() {
            let mut piece = Piece::with_rotation(def, 2);
            let before = occupied_cells(&piece);
            for _ in 0..NUM_ROTATIONS {
                piece.rotate_left();
            }
            assert_eq!(occupied_cells(&piece), before, "{:?}", def.kind());
        }
    }

    #[test]
    fn test_rotate_left_then_right_is_identity() {
        let mut piece = Piece::with_rotation(&CATALOG[6], 0);
        let before = occupied_cells(&piece);
        piece.rotate_left();
        piece.rotate_right();
        assert_eq!(occupied_cells(&piece), before);
    }

    #[test]
    fn test_out_of_box_lookup_is_empty() {
        let def = &CATALOG[0];
        assert_eq!(def.block(0, PIECE_SIZE, 0), None);
        assert_eq!(def.block(0, 0, PIECE_SIZE), None);
    }

    #[test]
    fn test_o_piece_is_rotation_symmetric() {
        let def = CATALOG
            .iter()
            .find(|d| d.kind() == BlockType::O)
            .expect("O definition");
        let base = Piece::with_rotation(def, 0);
        for rot in 1..NUM_ROTATIONS {
            let turned = Piece::with_rotation(def, rot);
            assert_eq!(occupied_cells(&turned), occupied_cells(&base));
        }
    }

    #[test]
    fn test_random_piece_is_deterministic_under_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let pa = Piece::random(&mut a);
            let pb = Piece::random(&mut b);
            assert_eq!(pa.kind(), pb.kind());
            assert_eq!(occupied_cells(&pa), occupied_cells(&pb));
        }
    }
}
