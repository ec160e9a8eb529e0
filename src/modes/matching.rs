use log::{debug, info};
use serde::Serialize;

use crate::cards::{Deck, QuizCard};
use crate::config::MatchConfig;
use crate::cues::{Cue, CueQueue};
use crate::rng::RngCursor;
use crate::shuffle::{pick_random, shuffle};
use crate::timers::{RoundId, TimerQueue};
use crate::types::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStatus {
    Idle,
    Selected,
    Matched,
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub card_id: u32,
    pub side: Side,
    pub text: String,
    pub status: TileStatus,
}

impl Tile {
    /// A question tile matches only its own card's answer tile.
    #[inline]
    pub fn pairs_with(&self, other: &Tile) -> bool {
        self.card_id == other.card_id && self.side != other.side
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchTimer {
    Unflash(usize, usize),
}

/// Timed pairs game over a random sample of cards.
#[derive(Debug, Clone)]
pub struct MatchSession {
    pool: Vec<QuizCard>,
    tiles: Vec<Tile>,
    selected: Option<usize>,
    matched: usize,
    pairs: usize,
    finished: bool,
    locked: bool,
    elapsed_ms: u64,
    round: RoundId,
    timers: TimerQueue<MatchTimer>,
    rng: RngCursor,
    config: MatchConfig,
    cues: CueQueue,
}

fn build_tiles(pool: &[QuizCard], pairs: usize, rng: &mut RngCursor) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(pairs * 2);
    for card in pick_random(pool, pairs, &mut rng.next_rng()) {
        tiles.push(Tile {
            card_id: card.id,
            side: Side::Question,
            text: card.question.clone(),
            status: TileStatus::Idle,
        });
        tiles.push(Tile {
            card_id: card.id,
            side: Side::Answer,
            text: card.answer,
            status: TileStatus::Idle,
        });
    }
    shuffle(&tiles, &mut rng.next_rng())
}

impl MatchSession {
    pub fn new(deck: &Deck, seed: u64, config: MatchConfig) -> Self {
        let pool = deck.cards().to_vec();
        let pairs = config.pairs.min(pool.len());
        let mut rng = RngCursor::new(seed, 4);
        let tiles = build_tiles(&pool, pairs, &mut rng);
        Self {
            pool,
            tiles,
            selected: None,
            matched: 0,
            pairs,
            finished: false,
            locked: false,
            elapsed_ms: 0,
            round: RoundId::default(),
            timers: TimerQueue::new(),
            rng,
            config,
            cues: CueQueue::default(),
        }
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[inline]
    pub fn matched_count(&self) -> usize {
        self.matched
    }

    #[inline]
    pub fn pairs(&self) -> usize {
        self.pairs
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Seconds with one decimal, e.g. "12.3".
    pub fn formatted_time(&self) -> String {
        format!("{:.1}", self.elapsed_ms as f64 / 1000.0)
    }

    /// Handle a click on tile `index`. Returns false when the click is ignored.
    pub fn click(&mut self, index: usize) -> bool {
        if self.locked || self.finished {
            return false;
        }
        match self.tiles.get(index).map(|t| t.status) {
            Some(TileStatus::Idle | TileStatus::Selected) => {}
            _ => return false,
        }
        self.cues.push(Cue::Flip);

        let Some(first) = self.selected else {
            self.selected = Some(index);
            self.tiles[index].status = TileStatus::Selected;
            return true;
        };
        if first == index {
            self.selected = None;
            self.tiles[index].status = TileStatus::Idle;
            return true;
        }

        self.selected = None;
        if self.tiles[first].pairs_with(&self.tiles[index]) {
            self.tiles[first].status = TileStatus::Matched;
            self.tiles[index].status = TileStatus::Matched;
            self.matched += 1;
            self.cues.push(Cue::Correct);
            debug!("[match] pair {}/{}", self.matched, self.pairs);
            if self.matched == self.pairs {
                self.finished = true;
                self.cues.push(Cue::Celebrate);
                info!("[match] finished in {}s", self.formatted_time());
            }
        } else {
            self.tiles[first].status = TileStatus::Wrong;
            self.tiles[index].status = TileStatus::Wrong;
            self.locked = true;
            self.cues.push(Cue::Wrong);
            self.timers.schedule(
                self.config.wrong_cooldown_ms,
                self.round,
                MatchTimer::Unflash(first, index),
            );
        }
        true
    }

    /// Advance the clock; it stops for good once every pair is matched.
    pub fn tick(&mut self, dt_ms: u64) {
        if !self.finished {
            self.elapsed_ms += dt_ms;
        }
        let until = self.timers.now_ms() + dt_ms;
        while let Some(MatchTimer::Unflash(a, b)) = self.timers.pop_current(until, self.round) {
            for i in [a, b] {
                if self.tiles[i].status == TileStatus::Wrong {
                    self.tiles[i].status = TileStatus::Idle;
                }
            }
            self.locked = false;
        }
        self.timers.settle(until);
    }

    pub fn play_again(&mut self) {
        self.round = self.round.next();
        self.timers.clear();
        self.tiles = build_tiles(&self.pool, self.pairs, &mut self.rng);
        self.selected = None;
        self.matched = 0;
        self.finished = false;
        self.locked = false;
        self.elapsed_ms = 0;
    }

    #[inline]
    pub fn take_cues(&mut self) -> Vec<Cue> {
        self.cues.take()
    }
}
