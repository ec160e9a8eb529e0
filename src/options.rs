use rand::Rng;
use serde::Serialize;

use crate::cards::QuizCard;
use crate::shuffle::shuffle;

/// Number of options in every multiple-choice question.
pub const OPTION_COUNT: usize = 4;

/// Option id of a card's correct answer; distractor `i` gets id `i + 1`.
pub const ANSWER_OPTION_ID: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: u8,
    pub text: String,
    pub is_correct: bool,
}

/// The card's answer plus its own three distractors, shuffled.
/// Ids are stable per card regardless of the shuffled position.
pub fn build_options<R: Rng + ?Sized>(card: &QuizCard, rng: &mut R) -> Vec<AnswerOption> {
    let mut options = Vec::with_capacity(OPTION_COUNT);
    options.push(AnswerOption {
        id: ANSWER_OPTION_ID,
        text: card.answer.clone(),
        is_correct: true,
    });
    for (i, d) in card.distractors.iter().enumerate() {
        options.push(AnswerOption {
            id: i as u8 + 1,
            text: d.clone(),
            is_correct: false,
        });
    }
    shuffle(&options, rng)
}

#[inline]
pub fn find_option(options: &[AnswerOption], id: u8) -> Option<&AnswerOption> {
    options.iter().find(|o| o.id == id)
}
