//! Grid-clearing puzzle gated by quiz questions.
//!
//! [`reduce`] is a pure `(state, action) -> state` transition; randomness
//! comes from the cursor carried in the state, so equal inputs give equal
//! outputs. [`BlocksGame`] wraps it with the side effects: the clear
//! animation timer and the high-score store.

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::cards::{Deck, QuizCard};
use crate::config::BlocksConfig;
use crate::cues::{Cue, CueQueue};
use crate::grid::{Grid, Lines};
use crate::options::{build_options, find_option, AnswerOption};
use crate::persist::{load_high_score, save_high_score, KvStore};
use crate::piece::{generate_pieces, Piece};
use crate::rng::RngCursor;
use crate::shuffle::pick_random;
use crate::timers::{RoundId, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlocksPhase {
    Playing,
    Quiz,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocksQuiz {
    pub card_id: u32,
    pub question: String,
    pub options: Vec<AnswerOption>,
    pub wrong_count: u32,
    pub revealed: bool,
    /// Options already picked wrongly; they can't be picked again.
    pub disabled: BTreeSet<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlocksAction {
    SelectPiece(u32),
    /// Place `piece` (or the selected piece when `None`) with its anchor at (row, col).
    PlacePiece {
        row: usize,
        col: usize,
        piece: Option<u32>,
    },
    ClearLinesDone,
    AnswerQuiz(u8),
    ContinueFromQuiz,
    PlayAgain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlocksState {
    pub grid: Grid,
    pub pieces: Vec<Piece>,
    pub selected_piece: Option<u32>,
    pub score: u32,
    pub high_score: u32,
    pub lines_cleared: u32,
    pub questions_answered: u32,
    pub phase: BlocksPhase,
    pub quiz: Option<BlocksQuiz>,
    /// Lines awarded but not yet emptied (clear animation running).
    pub clearing: Option<Lines>,
    pub asked: BTreeSet<u32>,
    pub penalty_pieces: usize,
    pub config: BlocksConfig,
    next_piece_id: u32,
    rng: RngCursor,
}

impl BlocksState {
    /// An invalid config is replaced by the defaults.
    pub fn new(seed: u64, high_score: u32, config: BlocksConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("[blocks] {e}; using default settings");
                BlocksConfig::default()
            }
        };
        Self::from_cursor(RngCursor::new(seed, 6), high_score, config)
    }

    fn from_cursor(mut rng: RngCursor, high_score: u32, config: BlocksConfig) -> Self {
        let mut next_piece_id = 0;
        let pieces = generate_pieces(&mut rng.next_rng(), &mut next_piece_id, config.base_pieces, 0);
        Self {
            grid: Grid::new(),
            pieces,
            selected_piece: None,
            score: 0,
            high_score,
            lines_cleared: 0,
            questions_answered: 0,
            phase: BlocksPhase::Playing,
            quiz: None,
            clearing: None,
            asked: BTreeSet::new(),
            penalty_pieces: 0,
            config,
            next_piece_id,
            rng,
        }
    }

    /// Replace grid and tray, e.g. to set up a position by hand.
    #[must_use]
    pub fn with_position(mut self, grid: Grid, pieces: Vec<Piece>) -> Self {
        self.next_piece_id = pieces.iter().map(|p| p.id).max().unwrap_or(0).max(self.next_piece_id);
        self.grid = grid;
        self.pieces = pieces;
        self.selected_piece = None;
        self
    }

    #[inline]
    pub fn piece(&self, id: u32) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    fn game_over(&mut self) {
        self.phase = BlocksPhase::GameOver;
        self.high_score = self.high_score.max(self.score);
        info!("[blocks] game over: score {} best {}", self.score, self.high_score);
    }

    fn start_quiz(&mut self, deck: &Deck) {
        let fresh: Vec<QuizCard> = deck
            .iter()
            .filter(|c| !self.asked.contains(&c.id))
            .cloned()
            .collect();
        let pool = if fresh.is_empty() { deck.cards() } else { &fresh[..] };
        let mut rng = self.rng.next_rng();
        let Some(card) = pick_random(pool, 1, &mut rng).into_iter().next() else {
            return;
        };
        let options = build_options(&card, &mut rng);
        self.asked.insert(card.id);
        self.phase = BlocksPhase::Quiz;
        debug!("[blocks] quiz on card {}", card.id);
        self.quiz = Some(BlocksQuiz {
            card_id: card.id,
            question: card.question,
            options,
            wrong_count: 0,
            revealed: false,
            disabled: BTreeSet::new(),
        });
    }

    fn after_settle(&mut self, deck: &Deck) {
        if self.pieces.is_empty() {
            self.start_quiz(deck);
        } else if !self.grid.any_piece_fits(&self.pieces) {
            self.game_over();
        }
    }

    fn place(&mut self, deck: &Deck, row: usize, col: usize, piece: Option<u32>) {
        if self.phase != BlocksPhase::Playing || self.clearing.is_some() {
            return;
        }
        let Some(id) = piece.or(self.selected_piece) else {
            return;
        };
        let Some(pos) = self.pieces.iter().position(|p| p.id == id) else {
            return;
        };
        let placed = self.pieces[pos];
        if !self.grid.can_place(placed.shape, row, col) {
            return;
        }
        self.grid.place(&placed, row, col);
        self.pieces.remove(pos);
        self.selected_piece = None;

        let lines = self.grid.completed_lines();
        if lines.is_empty() {
            self.after_settle(deck);
            return;
        }
        let n = lines.count() as u32;
        self.score += self.config.line_points * n;
        self.lines_cleared += n;
        debug!("[blocks] {n} line(s) complete");
        self.clearing = Some(lines);
    }

    fn clear_done(&mut self, deck: &Deck) {
        let Some(lines) = self.clearing.take() else {
            return;
        };
        self.grid.clear_lines(&lines);
        if self.phase == BlocksPhase::Playing {
            self.after_settle(deck);
        }
    }

    fn answer(&mut self, option_id: u8) {
        if self.phase != BlocksPhase::Quiz {
            return;
        }
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        if quiz.revealed || quiz.disabled.contains(&option_id) {
            return;
        }
        let Some(option) = find_option(&quiz.options, option_id) else {
            return;
        };
        if option.is_correct {
            quiz.revealed = true;
            if quiz.wrong_count == 0 {
                self.score += self.config.first_try_bonus;
            }
            self.questions_answered += 1;
        } else {
            quiz.wrong_count += 1;
            quiz.disabled.insert(option_id);
            self.penalty_pieces += 1;
        }
    }

    fn continue_from_quiz(&mut self) {
        if self.phase != BlocksPhase::Quiz || !self.quiz.as_ref().is_some_and(|q| q.revealed) {
            return;
        }
        self.pieces = generate_pieces(
            &mut self.rng.next_rng(),
            &mut self.next_piece_id,
            self.config.base_pieces,
            self.penalty_pieces,
        );
        self.penalty_pieces = 0;
        self.quiz = None;
        self.selected_piece = None;
        if self.grid.any_piece_fits(&self.pieces) {
            self.phase = BlocksPhase::Playing;
        } else {
            self.game_over();
        }
    }

    /// Fresh grid, tray and quiz history; only the best score carries over.
    fn play_again(&mut self) {
        let best = self.high_score.max(self.score);
        *self = Self::from_cursor(self.rng, best, self.config.clone());
    }
}

/// Pure transition. Disallowed actions return an unchanged copy.
pub fn reduce(state: &BlocksState, deck: &Deck, action: BlocksAction) -> BlocksState {
    let mut s = state.clone();
    match action {
        BlocksAction::SelectPiece(id) => {
            if s.phase == BlocksPhase::Playing && s.piece(id).is_some() {
                s.selected_piece = if s.selected_piece == Some(id) { None } else { Some(id) };
            }
        }
        BlocksAction::PlacePiece { row, col, piece } => s.place(deck, row, col, piece),
        BlocksAction::ClearLinesDone => s.clear_done(deck),
        BlocksAction::AnswerQuiz(id) => s.answer(id),
        BlocksAction::ContinueFromQuiz => s.continue_from_quiz(),
        BlocksAction::PlayAgain => s.play_again(),
    }
    s
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlocksTimer {
    ClearLines,
}

/// Controller around [`reduce`]: schedules the clear animation, persists
/// the high score on game over and emits presentation cues.
pub struct BlocksGame<S: KvStore> {
    deck: Deck,
    state: BlocksState,
    store: S,
    round: RoundId,
    timers: TimerQueue<BlocksTimer>,
    cues: CueQueue,
}

impl<S: KvStore> BlocksGame<S> {
    pub fn new(deck: Deck, store: S, seed: u64, config: BlocksConfig) -> Self {
        let high = load_high_score(&store);
        Self::from_state(deck, store, BlocksState::new(seed, high, config))
    }

    /// Resume from an existing position. The stored best wins if it is higher.
    pub fn from_state(deck: Deck, store: S, mut state: BlocksState) -> Self {
        state.high_score = state.high_score.max(load_high_score(&store));
        Self {
            deck,
            state,
            store,
            round: RoundId::default(),
            timers: TimerQueue::new(),
            cues: CueQueue::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> &BlocksState {
        &self.state
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatch(&mut self, action: BlocksAction) {
        let before = self.state.clone();
        let after = reduce(&before, &self.deck, action);
        // A reset, or a clear finished by hand, retires the pending clear timer.
        if action == BlocksAction::PlayAgain || (before.clearing.is_some() && after.clearing.is_none()) {
            self.round = self.round.next();
            self.timers.clear();
        }
        if before.clearing.is_none() && after.clearing.is_some() {
            self.timers
                .schedule(after.config.clear_delay_ms, self.round, BlocksTimer::ClearLines);
        }
        if let (Some(b), Some(a)) = (&before.quiz, &after.quiz) {
            if a.wrong_count > b.wrong_count {
                self.cues.push(Cue::Wrong);
            } else if a.revealed && !b.revealed {
                self.cues.push(Cue::Correct);
            }
        }
        self.state = after;
        self.on_transition(&before);
    }

    pub fn tick(&mut self, dt_ms: u64) {
        let until = self.timers.now_ms() + dt_ms;
        while let Some(BlocksTimer::ClearLines) = self.timers.pop_current(until, self.round) {
            let before = self.state.clone();
            self.state = reduce(&before, &self.deck, BlocksAction::ClearLinesDone);
            self.on_transition(&before);
        }
        self.timers.settle(until);
    }

    fn on_transition(&mut self, before: &BlocksState) {
        if before.phase != BlocksPhase::GameOver && self.state.phase == BlocksPhase::GameOver {
            save_high_score(&mut self.store, self.state.high_score);
            if self.state.score > before.high_score {
                self.cues.push(Cue::Celebrate);
            }
        }
    }

    #[inline]
    pub fn take_cues(&mut self) -> Vec<Cue> {
        self.cues.take()
    }
}
