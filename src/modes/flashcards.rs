use crate::cards::{Deck, QuizCard};
use crate::cues::{Cue, CueQueue};
use crate::rng::RngCursor;
use crate::shuffle::shuffle;
use crate::types::Side;

/// Flip-through deck: one card at a time, question face first.
#[derive(Debug, Clone)]
pub struct FlashcardsSession {
    cards: Vec<QuizCard>,
    index: usize,
    face: Side,
    rng: RngCursor,
    cues: CueQueue,
}

impl FlashcardsSession {
    /// Starts in deck (id) order.
    pub fn new(deck: &Deck, seed: u64) -> Self {
        let mut cards = deck.cards().to_vec();
        cards.sort_by_key(|c| c.id);
        Self {
            cards,
            index: 0,
            face: Side::Question,
            rng: RngCursor::new(seed, 1),
            cues: CueQueue::default(),
        }
    }

    #[inline]
    pub fn current(&self) -> &QuizCard {
        &self.cards[self.index]
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    /// The face currently showing.
    #[inline]
    pub fn face(&self) -> Side {
        self.face
    }

    #[inline]
    pub fn is_flipped(&self) -> bool {
        self.face == Side::Answer
    }

    pub fn order(&self) -> Vec<u32> {
        self.cards.iter().map(|c| c.id).collect()
    }

    pub fn flip(&mut self) {
        self.face = self.face.other();
        self.cues.push(Cue::Flip);
    }

    pub fn next(&mut self) {
        self.face = Side::Question;
        self.index = (self.index + 1) % self.cards.len();
    }

    pub fn prev(&mut self) {
        self.face = Side::Question;
        self.index = if self.index == 0 {
            self.cards.len() - 1
        } else {
            self.index - 1
        };
    }

    pub fn shuffle(&mut self) {
        self.cards = shuffle(&self.cards, &mut self.rng.next_rng());
        self.index = 0;
        self.face = Side::Question;
    }

    #[inline]
    pub fn take_cues(&mut self) -> Vec<Cue> {
        self.cues.take()
    }
}
