use rand::Rng;
use serde::Serialize;

use crate::types::Color;

/// Shape templates for the puzzle tray. Offsets are (row, col) from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Shape {
    H2,
    V2,
    H3,
    V3,
    L,
    T,
    Square,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::H2,
        Shape::V2,
        Shape::H3,
        Shape::V3,
        Shape::L,
        Shape::T,
        Shape::Square,
    ];

    pub fn offsets(self) -> &'static [(usize, usize)] {
        match self {
            Shape::H2 => &[(0, 0), (0, 1)],
            Shape::V2 => &[(0, 0), (1, 0)],
            Shape::H3 => &[(0, 0), (0, 1), (0, 2)],
            Shape::V3 => &[(0, 0), (1, 0), (2, 0)],
            Shape::L => &[(0, 0), (1, 0), (1, 1)],
            Shape::T => &[(0, 0), (0, 1), (0, 2), (1, 1)],
            Shape::Square => &[(0, 0), (0, 1), (1, 0), (1, 1)],
        }
    }

    #[inline]
    pub fn cell_count(self) -> usize {
        self.offsets().len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub id: u32,
    pub shape: Shape,
    pub color: Color,
    pub is_penalty: bool,
}

/// Generate `count` base pieces followed by `penalty` penalty pieces.
/// Ids are taken from `next_id`, which is advanced past the last one.
pub fn generate_pieces<R: Rng + ?Sized>(
    rng: &mut R,
    next_id: &mut u32,
    count: usize,
    penalty: usize,
) -> Vec<Piece> {
    (0..count + penalty)
        .map(|i| {
            let shape = Shape::ALL[rng.gen_range(0..Shape::ALL.len())];
            let color = Color::ALL[rng.gen_range(0..Color::ALL.len())];
            *next_id += 1;
            Piece {
                id: *next_id,
                shape,
                color,
                is_penalty: i >= count,
            }
        })
        .collect()
}
