use crate::error::{Result, StudyError};
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_DECK_JSON: &str = include_str!("../data/quiz_cards.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizCard {
    pub id: u32,
    /// Full question (Learn, Test, Flashcards, Match question tiles)
    pub question: String,
    /// Canonical correct answer
    pub answer: String,
    /// Short label for compact tiles
    pub term: String,
    /// Short definition paired with `term` (Blast asteroids)
    pub short_def: String,
    pub distractors: [String; 3],
    pub category: Category,
}

/// Only built through [`Deck::from_cards`], so never empty.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<QuizCard>,       // in file order
    by_id: HashMap<u32, usize>, // id -> position in `cards`
}

impl Deck {
    /// Build a validated deck. Rejects empty decks, duplicate ids and
    /// cards whose answer/distractors are not pairwise distinct.
    pub fn from_cards(cards: Vec<QuizCard>) -> Result<Self> {
        if cards.is_empty() {
            return Err(StudyError::EmptyDeck);
        }
        let mut by_id = HashMap::with_capacity(cards.len());
        for (pos, card) in cards.iter().enumerate() {
            validate_card(card)?;
            if by_id.insert(card.id, pos).is_some() {
                return Err(StudyError::DuplicateCardId(card.id));
            }
        }
        Ok(Self { cards, by_id })
    }

    #[inline]
    pub fn get(&self, id: u32) -> Option<&QuizCard> {
        self.by_id.get(&id).map(|&pos| &self.cards[pos])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &QuizCard> {
        self.cards.iter()
    }

    #[inline]
    pub fn cards(&self) -> &[QuizCard] {
        &self.cards
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &QuizCard> {
        self.cards.iter().filter(move |c| c.category == category)
    }
}

fn validate_card(card: &QuizCard) -> Result<()> {
    let invalid = |reason: &str| StudyError::InvalidCard {
        id: card.id,
        reason: reason.to_string(),
    };
    if card.id == 0 {
        return Err(invalid("id must be positive"));
    }
    if card.question.trim().is_empty() || card.answer.trim().is_empty() {
        return Err(invalid("question and answer must be non-empty"));
    }
    let texts = [
        &card.answer,
        &card.distractors[0],
        &card.distractors[1],
        &card.distractors[2],
    ];
    for (i, a) in texts.iter().enumerate() {
        if a.trim().is_empty() {
            return Err(invalid("empty distractor"));
        }
        if texts[i + 1..].iter().any(|b| b == a) {
            return Err(invalid("answer and distractors must be pairwise distinct"));
        }
    }
    Ok(())
}

/// Parse and validate a deck from JSON text.
pub fn parse_cards_json(data: &str) -> Result<Deck> {
    let raw: Vec<QuizCard> = serde_json::from_str(data)?;
    Deck::from_cards(raw)
}

/// Load cards from a JSON file (runtime), validating every record.
pub fn load_cards_from_json<P: AsRef<Path>>(path: P) -> Result<Deck> {
    let data = fs::read_to_string(path.as_ref())?;
    parse_cards_json(&data)
}

/// The deck shipped with the crate (`data/quiz_cards.json`).
pub fn builtin_deck() -> Result<Deck> {
    parse_cards_json(BUILTIN_DECK_JSON)
}
