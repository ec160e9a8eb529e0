use log::{debug, info};
use serde::Serialize;

use crate::cards::{Deck, QuizCard};
use crate::config::LearnConfig;
use crate::cues::{Cue, CueQueue};
use crate::options::{build_options, find_option, AnswerOption};
use crate::rng::RngCursor;
use crate::shuffle::shuffle;
use crate::timers::{RoundId, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerState {
    Idle,
    Correct,
    Wrong,
    Revealed,
}

/// Qualitative reaction to a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Reaction {
    /// 100%
    Perfect,
    /// >= 80%
    Amazing,
    /// >= 60%
    Solid,
    /// >= 40%
    KeepStudying,
    RoomToGrow,
}

impl Reaction {
    /// Integer comparisons so 4/5 lands exactly on the 80% tier.
    pub fn from_score(score: usize, total: usize) -> Self {
        if total == 0 {
            return Reaction::RoomToGrow;
        }
        let s5 = score * 5;
        if score >= total {
            Reaction::Perfect
        } else if s5 >= total * 4 {
            Reaction::Amazing
        } else if s5 >= total * 3 {
            Reaction::Solid
        } else if s5 >= total * 2 {
            Reaction::KeepStudying
        } else {
            Reaction::RoomToGrow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Reaction::Perfect => "Perfect score!",
            Reaction::Amazing => "Amazing work!",
            Reaction::Solid => "Solid effort!",
            Reaction::KeepStudying => "Keep studying!",
            Reaction::RoomToGrow => "Room to grow!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LearnTimer {
    Advance,
}

/// Sequential multiple choice over the whole deck in one shuffled order.
#[derive(Debug, Clone)]
pub struct LearnSession {
    cards: Vec<QuizCard>,
    index: usize,
    score: usize,
    state: AnswerState,
    selected: Option<u8>,
    options: Vec<AnswerOption>,
    finished: bool,
    round: RoundId,
    timers: TimerQueue<LearnTimer>,
    rng: RngCursor,
    config: LearnConfig,
    cues: CueQueue,
}

impl LearnSession {
    pub fn new(deck: &Deck, seed: u64, config: LearnConfig) -> Self {
        let mut rng = RngCursor::new(seed, 2);
        let cards = shuffle(deck.cards(), &mut rng.next_rng());
        let options = build_options(&cards[0], &mut rng.next_rng());
        Self {
            cards,
            index: 0,
            score: 0,
            state: AnswerState::Idle,
            selected: None,
            options,
            finished: false,
            round: RoundId::default(),
            timers: TimerQueue::new(),
            rng,
            config,
            cues: CueQueue::default(),
        }
    }

    #[inline]
    pub fn current(&self) -> Option<&QuizCard> {
        if self.finished {
            None
        } else {
            self.cards.get(self.index)
        }
    }

    #[inline]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[inline]
    pub fn answer_state(&self) -> AnswerState {
        self.state
    }

    #[inline]
    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn score(&self) -> usize {
        self.score
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn order(&self) -> Vec<u32> {
        self.cards.iter().map(|c| c.id).collect()
    }

    pub fn progress_percent(&self) -> u32 {
        if self.finished {
            100
        } else {
            ((self.index as f64 / self.total() as f64) * 100.0).round() as u32
        }
    }

    /// Only available once the last card has been answered.
    pub fn reaction(&self) -> Option<Reaction> {
        self.finished
            .then(|| Reaction::from_score(self.score, self.total()))
    }

    /// Pick an option. Ignored unless the current question is idle.
    pub fn select(&mut self, option_id: u8) -> bool {
        if self.finished || self.state != AnswerState::Idle {
            return false;
        }
        let Some(option) = find_option(&self.options, option_id) else {
            return false;
        };
        self.selected = Some(option_id);
        if option.is_correct {
            self.state = AnswerState::Correct;
            self.score += 1;
            self.cues.push(Cue::Correct);
        } else {
            self.state = AnswerState::Wrong;
            self.cues.push(Cue::Wrong);
        }
        self.timers
            .schedule(self.config.answer_delay_ms, self.round, LearnTimer::Advance);
        true
    }

    /// Reveal the answer without scoring it either way.
    pub fn dont_know(&mut self) -> bool {
        if self.finished || self.state != AnswerState::Idle {
            return false;
        }
        self.state = AnswerState::Revealed;
        self.selected = self.options.iter().find(|o| o.is_correct).map(|o| o.id);
        self.timers
            .schedule(self.config.reveal_delay_ms, self.round, LearnTimer::Advance);
        true
    }

    pub fn tick(&mut self, dt_ms: u64) {
        let until = self.timers.now_ms() + dt_ms;
        while let Some(LearnTimer::Advance) = self.timers.pop_current(until, self.round) {
            self.advance();
        }
        self.timers.settle(until);
    }

    fn advance(&mut self) {
        self.round = self.round.next();
        if self.index + 1 >= self.cards.len() {
            self.finished = true;
            info!("[learn] finished {}/{}", self.score, self.total());
            return;
        }
        self.index += 1;
        self.state = AnswerState::Idle;
        self.selected = None;
        self.options = build_options(&self.cards[self.index], &mut self.rng.next_rng());
        debug!("[learn] question {}/{}", self.index + 1, self.total());
    }

    /// New shuffled order, back to the first question with a zero score.
    pub fn restart(&mut self) {
        self.round = self.round.next();
        self.timers.clear();
        self.cards = shuffle(&self.cards, &mut self.rng.next_rng());
        self.index = 0;
        self.score = 0;
        self.state = AnswerState::Idle;
        self.selected = None;
        self.finished = false;
        self.options = build_options(&self.cards[0], &mut self.rng.next_rng());
    }

    #[inline]
    pub fn take_cues(&mut self) -> Vec<Cue> {
        self.cues.take()
    }
}
