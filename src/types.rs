use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Github,
    Claude,
    Datefix,
    Terminal,
    Vercel,
}

impl Category {
    #[inline]
    pub fn all() -> [Category; 5] {
        [
            Category::Github,
            Category::Claude,
            Category::Datefix,
            Category::Terminal,
            Category::Vercel,
        ]
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Github => "github",
            Category::Claude => "claude",
            Category::Datefix => "datefix",
            Category::Terminal => "terminal",
            Category::Vercel => "vercel",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        let s = s.trim();
        Category::all()
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

/// Which face of a card is showing (match tiles, flashcards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Question,
    Answer,
}

impl Side {
    #[inline]
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Side::Question => Side::Answer,
            Side::Answer => Side::Question,
        }
    }
}

/// Block colors used by the puzzle grid (brand palette).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Pink,
    Gold,
    Green,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Blue, Color::Pink, Color::Gold, Color::Green];
}

/// Grid indexing helpers (8x8 puzzle grid)
pub const GRID_SIZE: usize = 8;

#[inline]
pub fn idx_to_rc(idx: usize) -> (usize, usize) {
    debug_assert!(idx < GRID_SIZE * GRID_SIZE);
    (idx / GRID_SIZE, idx % GRID_SIZE)
}

#[inline]
pub fn rc_to_idx(r: usize, c: usize) -> Option<usize> {
    if r < GRID_SIZE && c < GRID_SIZE {
        Some(r * GRID_SIZE + c)
    } else {
        None
    }
}
