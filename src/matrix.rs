//! Playfield: the authoritative board state and placement rules.

use crate::pieces::{BlockType, PIECE_SIZE, Piece};

/// Fixed-size grid of optional blocks; `rows[0]` is the top row. The grid
/// is the single source of truth for which board cells are occupied, the
/// falling piece included (it is placed, lifted and re-placed as it moves).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TetrisMatrix {
    num_rows: usize,
    num_cols: usize,
    rows: Vec<Vec<Option<BlockType>>>,
}

impl TetrisMatrix {
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        assert!(num_rows > 0 && num_cols > 0, "degenerate board");
        Self {
            num_rows,
            num_cols,
            rows: vec![vec![None; num_cols]; num_rows],
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Block at an absolute board cell. Out-of-range reads are a caller
    /// contract violation and panic via the indexing.
    pub fn block(&self, row: usize, col: usize) -> Option<BlockType> {
        self.rows[row][col]
    }

    /// Writes the piece's occupied cells at the given bounding-box origin.
    /// The caller must have validated the placement; nothing is re-checked
    /// here, which is what allows the tentative place → validate → undo
    /// protocol the controller uses.
    pub fn set_piece(&mut self, origin_row: i32, origin_col: i32, piece: &Piece) {
        self.write_piece(origin_row, origin_col, piece, true);
    }

    /// Inverse of `set_piece`: clears every board cell the piece occupies
    /// at the given origin.
    pub fn remove_piece(&mut self, origin_row: i32, origin_col: i32, piece: &Piece) {
        self.write_piece(origin_row, origin_col, piece, false);
    }

    fn write_piece(&mut self, origin_row: i32, origin_col: i32, piece: &Piece, place: bool) {
        for row in 0..PIECE_SIZE {
            for col in 0..PIECE_SIZE {
                if let Some(block) = piece.block(row, col) {
                    let board_row = (origin_row + row as i32) as usize;
                    let board_col = (origin_col + col as i32) as usize;
                    self.rows[board_row][board_col] = place.then_some(block);
                }
            }
        }
    }

    /// True iff every occupied cell of the piece lands inside the board on
    /// an empty cell. The piece must already be lifted off the board, or
    /// it would collide with itself. Origins are signed so candidate
    /// positions may run past any edge during validation.
    pub fn is_valid_piece(&self, origin_row: i32, origin_col: i32, piece: &Piece) -> bool {
        for row in 0..PIECE_SIZE {
            for col in 0..PIECE_SIZE {
                if piece.block(row, col).is_none() {
                    continue;
                }
                let board_row = origin_row + row as i32;
                let board_col = origin_col + col as i32;
                if board_row < 0
                    || board_row >= self.num_rows as i32
                    || board_col < 0
                    || board_col >= self.num_cols as i32
                {
                    return false;
                }
                if self.rows[board_row as usize][board_col as usize].is_some() {
                    return false;
                }
            }
        }
        true
    }

    /// Clears every full row with index below `below_row` (exclusive,
    /// clamped to the board), shifting the rows above down and inserting
    /// empty rows at the top. Returns the number of rows cleared.
    ///
    /// Only rows touched by the last lock can have become full, so callers
    /// pass the row just below the locked piece's vertical extent instead
    /// of scanning the whole board.
    pub fn check_and_clear(&mut self, below_row: usize) -> u32 {
        let end = below_row.min(self.num_rows);
        let mut cleared = 0;
        for row in 0..end {
            if self.rows[row].iter().all(Option::is_some) {
                self.rows.remove(row);
                self.rows.insert(0, vec![None; self.num_cols]);
                cleared += 1;
            }
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Piece;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn any_piece(seed: u64) -> Piece {
        Piece::random(&mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_new_matrix_is_empty() {
        let m = TetrisMatrix::new(20, 10);
        for row in 0..20 {
            for col in 0..10 {
                assert_eq!(m.block(row, col), None);
            }
        }
    }

    #[test]
    fn test_set_then_remove_restores_prior_state() {
        let mut m = TetrisMatrix::new(20, 10);
        m.rows[19] = vec![Some(BlockType::S); 10];
        let before = m.clone();

        let piece = any_piece(3);
        assert!(m.is_valid_piece(5, 3, &piece));
        m.set_piece(5, 3, &piece);
        assert_ne!(m, before);
        m.remove_piece(5, 3, &piece);
        assert_eq!(m, before);
    }

    #[test]
    fn test_set_piece_writes_the_block_type() {
        let mut m = TetrisMatrix::new(20, 10);
        let piece = any_piece(9);
        m.set_piece(0, 3, &piece);
        let mut written = 0;
        for row in 0..20 {
            for col in 0..10 {
                if let Some(block) = m.block(row, col) {
                    assert_eq!(block, piece.kind());
                    written += 1;
                }
            }
        }
        assert_eq!(written, 4);
    }

    #[test]
    fn test_invalid_outside_every_edge() {
        let m = TetrisMatrix::new(20, 10);
        let piece = any_piece(1);
        assert!(!m.is_valid_piece(-4, 3, &piece));
        assert!(!m.is_valid_piece(19, 3, &piece));
        assert!(!m.is_valid_piece(5, -4, &piece));
        assert!(!m.is_valid_piece(5, 9, &piece));
    }

    #[test]
    fn test_collision_with_occupied_cells() {
        let mut m = TetrisMatrix::new(20, 10);
        let piece = any_piece(4);
        assert!(m.is_valid_piece(8, 3, &piece));
        m.set_piece(8, 3, &piece);
        // The same footprint now collides with itself on the board.
        assert!(!m.is_valid_piece(8, 3, &piece));
        // Far away stays fine.
        assert!(m.is_valid_piece(0, 3, &piece));
    }

    #[test]
    fn test_single_line_clear_shifts_rows_down() {
        let mut m = TetrisMatrix::new(4, 4);
        // Distinct partial patterns above a full bottom row.
        m.rows[0] = vec![Some(BlockType::J), None, None, None];
        m.rows[1] = vec![None, Some(BlockType::L), None, None];
        m.rows[2] = vec![None, None, Some(BlockType::T), None];
        m.rows[3] = vec![Some(BlockType::I); 4];

        assert_eq!(m.check_and_clear(4), 1);
        assert_eq!(m.rows[0], vec![None; 4]);
        assert_eq!(m.rows[1], vec![Some(BlockType::J), None, None, None]);
        assert_eq!(m.rows[2], vec![None, Some(BlockType::L), None, None]);
        assert_eq!(m.rows[3], vec![None, None, Some(BlockType::T), None]);
    }

    #[test]
    fn test_multi_line_clear_in_one_call() {
        let mut m = TetrisMatrix::new(4, 4);
        m.rows[0] = vec![Some(BlockType::J), None, None, None];
        m.rows[1] = vec![None, Some(BlockType::L), None, None];
        m.rows[2] = vec![Some(BlockType::O); 4];
        m.rows[3] = vec![Some(BlockType::I); 4];

        assert_eq!(m.check_and_clear(4), 2);
        assert_eq!(m.rows[0], vec![None; 4]);
        assert_eq!(m.rows[1], vec![None; 4]);
        assert_eq!(m.rows[2], vec![Some(BlockType::J), None, None, None]);
        assert_eq!(m.rows[3], vec![None, Some(BlockType::L), None, None]);
    }

    #[test]
    fn test_clear_scan_respects_below_row_band() {
        let mut m = TetrisMatrix::new(8, 4);
        m.rows[7] = vec![Some(BlockType::Z); 4];
        // Band above the full row: nothing to clear.
        assert_eq!(m.check_and_clear(4), 0);
        assert_eq!(m.rows[7], vec![Some(BlockType::Z); 4]);
        // Band covering it, clamped past the board edge.
        assert_eq!(m.check_and_clear(12), 1);
        assert_eq!(m.rows[7], vec![None; 4]);
    }

    #[test]
    fn test_no_full_rows_clears_nothing() {
        let mut m = TetrisMatrix::new(4, 4);
        m.rows[3] = vec![Some(BlockType::S), Some(BlockType::S), None, Some(BlockType::S)];
        let before = m.clone();
        assert_eq!(m.check_and_clear(4), 0);
        assert_eq!(m, before);
    }
}
