use std::collections::BTreeSet;

use studydeck::config::BlocksConfig;
use studydeck::modes::blocks::{reduce, BlocksAction, BlocksGame, BlocksPhase, BlocksState};
use studydeck::persist::{load_high_score, save_high_score};
use studydeck::{builtin_deck, Category, Color, Cue, Deck, Grid, MemoryStore, Piece, QuizCard, Shape};

fn piece(id: u32, shape: Shape) -> Piece {
    Piece {
        id,
        shape,
        color: Color::Blue,
        is_penalty: false,
    }
}

fn card(id: u32) -> QuizCard {
    QuizCard {
        id,
        question: format!("Question {id}?"),
        answer: format!("Answer {id}"),
        term: format!("Term {id}"),
        short_def: format!("Short {id}"),
        distractors: [
            format!("Wrong {id}a"),
            format!("Wrong {id}b"),
            format!("Wrong {id}c"),
        ],
        category: Category::Vercel,
    }
}

fn place(row: usize, col: usize, id: u32) -> BlocksAction {
    BlocksAction::PlacePiece {
        row,
        col,
        piece: Some(id),
    }
}

/// Row 0 filled except its last two cells.
fn almost_full_row() -> Grid {
    let mut g = Grid::new();
    for c in 0..6 {
        g.set(0, c, Some(Color::Pink));
    }
    g
}

/// No 2x2 block free anywhere; the free cells of row 0 are (0,0), (0,1) and (0,4).
fn clogged_grid() -> Grid {
    let mut g = Grid::new();
    for r in 0..8 {
        for c in 0..8 {
            if c != r && c != (r + 4) % 8 {
                g.set(r, c, Some(Color::Gold));
            }
        }
    }
    g.set(0, 1, None);
    g
}

fn fresh(seed: u64) -> BlocksState {
    BlocksState::new(seed, 0, BlocksConfig::default())
}

fn correct_option(s: &BlocksState) -> u8 {
    s.quiz
        .as_ref()
        .and_then(|q| q.options.iter().find(|o| o.is_correct))
        .map(|o| o.id)
        .expect("quiz with a correct option")
}

fn wrong_option(s: &BlocksState) -> u8 {
    s.quiz
        .as_ref()
        .and_then(|q| q.options.iter().find(|o| !o.is_correct))
        .map(|o| o.id)
        .expect("quiz with a wrong option")
}

/// Place the last tray piece on an empty grid to open a quiz.
fn quiz_state(deck: &Deck, seed: u64) -> BlocksState {
    let s = fresh(seed).with_position(Grid::new(), vec![piece(100, Shape::H2)]);
    let s = reduce(&s, deck, place(3, 3, 100));
    assert_eq!(s.phase, BlocksPhase::Quiz);
    s
}

#[test]
fn new_game_deals_three_pieces() {
    let s = fresh(1);
    assert_eq!(s.phase, BlocksPhase::Playing);
    assert_eq!(s.pieces.len(), 3);
    assert!(s.pieces.iter().all(|p| !p.is_penalty));
    assert_eq!(s.grid.filled_count(), 0);
    assert_eq!(s, fresh(1), "same seed, same deal");
}

#[test]
fn placement_fills_exactly_the_piece_cells() {
    let deck = builtin_deck().expect("builtin");
    let s = fresh(2).with_position(
        Grid::new(),
        vec![piece(1, Shape::T), piece(2, Shape::V3)],
    );
    let s = reduce(&s, &deck, place(2, 2, 1));
    assert_eq!(s.grid.filled_count(), Shape::T.cell_count());
    for (r, c) in [(2, 2), (2, 3), (2, 4), (3, 3)] {
        assert_eq!(s.grid.get(r, c), Some(Color::Blue));
    }
    assert_eq!(s.pieces.len(), 1);
    assert_eq!(s.score, 0);
    assert_eq!(s.phase, BlocksPhase::Playing);
}

#[test]
fn illegal_placements_change_nothing() {
    let deck = builtin_deck().expect("builtin");
    let s = fresh(3).with_position(
        almost_full_row(),
        vec![piece(1, Shape::H3), piece(2, Shape::V3)],
    );
    assert_eq!(reduce(&s, &deck, place(0, 6, 1)), s, "runs off the right edge");
    assert_eq!(reduce(&s, &deck, place(0, 4, 1)), s, "overlaps filled cells");
    assert_eq!(reduce(&s, &deck, place(6, 0, 2)), s, "runs off the bottom");
    assert_eq!(reduce(&s, &deck, place(4, 4, 99)), s, "unknown piece");
    assert_eq!(
        reduce(
            &s,
            &deck,
            BlocksAction::PlacePiece {
                row: 4,
                col: 4,
                piece: None
            }
        ),
        s,
        "nothing selected"
    );
}

#[test]
fn selected_piece_is_used_when_none_is_given() {
    let deck = builtin_deck().expect("builtin");
    let s = fresh(4).with_position(Grid::new(), vec![piece(1, Shape::H2), piece(2, Shape::V2)]);
    let s = reduce(&s, &deck, BlocksAction::SelectPiece(2));
    assert_eq!(s.selected_piece, Some(2));
    let toggled = reduce(&s, &deck, BlocksAction::SelectPiece(2));
    assert_eq!(toggled.selected_piece, None);

    let s = reduce(
        &s,
        &deck,
        BlocksAction::PlacePiece {
            row: 5,
            col: 5,
            piece: None,
        },
    );
    assert_eq!(s.grid.get(6, 5), Some(Color::Blue));
    assert_eq!(s.selected_piece, None);
    assert!(s.piece(2).is_none());
}

#[test]
fn completing_a_row_scores_then_clears() {
    let deck = builtin_deck().expect("builtin");
    let s = fresh(5).with_position(
        almost_full_row(),
        vec![piece(1, Shape::H2), piece(2, Shape::V2)],
    );
    let s = reduce(&s, &deck, place(0, 6, 1));
    assert_eq!(s.score, 10);
    assert_eq!(s.lines_cleared, 1);
    let lines = s.clearing.clone().expect("clear animation pending");
    assert_eq!(lines.rows, vec![0]);
    assert!(lines.cols.is_empty());
    assert_eq!(s.grid.filled_count(), 8, "cells stay until the animation ends");

    let blocked = reduce(&s, &deck, place(4, 4, 2));
    assert_eq!(blocked, s, "no placing while lines clear");

    let s = reduce(&s, &deck, BlocksAction::ClearLinesDone);
    assert!(s.clearing.is_none());
    assert_eq!(s.grid.filled_count(), 0);
    assert_eq!(s.phase, BlocksPhase::Playing);
    assert_eq!(s.score, 10);
}

#[test]
fn three_cell_piece_finishes_row_zero() {
    let deck = builtin_deck().expect("builtin");
    let mut g = Grid::new();
    for c in 3..8 {
        g.set(0, c, Some(Color::Gold));
    }
    g.set(5, 5, Some(Color::Gold));
    let s = fresh(18).with_position(g, vec![piece(1, Shape::H3), piece(2, Shape::Square)]);
    let s = reduce(&s, &deck, place(0, 0, 1));
    assert_eq!(s.score, 10);
    let lines = s.clearing.clone().expect("pending clear");
    assert_eq!((lines.rows.clone(), lines.cols.len()), (vec![0], 0));
    let s = reduce(&s, &deck, BlocksAction::ClearLinesDone);
    assert!((0..8).all(|c| s.grid.is_empty(0, c)));
    assert_eq!(s.grid.get(5, 5), Some(Color::Gold), "other cells untouched");
}

#[test]
fn row_and_column_together_count_twice() {
    let deck = builtin_deck().expect("builtin");
    let mut g = Grid::new();
    for i in 0..8 {
        if i != 7 {
            g.set(7, i, Some(Color::Green));
            g.set(i, 7, Some(Color::Green));
        }
    }
    g.set(6, 7, None);
    let s = fresh(6).with_position(g, vec![piece(1, Shape::V2), piece(2, Shape::H2)]);
    let s = reduce(&s, &deck, place(6, 7, 1));
    assert_eq!(s.score, 20);
    assert_eq!(s.lines_cleared, 2);
    let s = reduce(&s, &deck, BlocksAction::ClearLinesDone);
    assert_eq!(s.grid.filled_count(), 0, "the shared corner clears once");
}

#[test]
fn game_over_when_nothing_fits() {
    let deck = builtin_deck().expect("builtin");
    let s = BlocksState::new(7, 50, BlocksConfig::default())
        .with_position(clogged_grid(), vec![piece(1, Shape::H2), piece(2, Shape::Square)]);
    let mut s = reduce(&s, &deck, place(0, 0, 1));
    assert_eq!(s.phase, BlocksPhase::GameOver);
    assert_eq!(s.high_score, 50, "a lower score leaves the best alone");

    s.score = 80;
    let s = reduce(&s, &deck, BlocksAction::PlayAgain);
    assert_eq!(s.phase, BlocksPhase::Playing);
    assert_eq!(s.score, 0);
    assert_eq!(s.high_score, 80);
    assert_eq!(s.grid.filled_count(), 0);
    assert_eq!(s.pieces.len(), 3);
}

#[test]
fn first_try_answer_earns_bonus() {
    let deck = builtin_deck().expect("builtin");
    let s = quiz_state(&deck, 8);
    let quiz = s.quiz.as_ref().expect("quiz");
    let card = deck.get(quiz.card_id).expect("quiz card in deck");
    assert_eq!(quiz.question, card.question);
    assert_eq!(quiz.options.len(), 4);
    assert!(s.asked.contains(&card.id));

    let refused = reduce(&s, &deck, BlocksAction::ContinueFromQuiz);
    assert_eq!(refused.phase, BlocksPhase::Quiz, "answer first");

    let s = reduce(&s, &deck, BlocksAction::AnswerQuiz(correct_option(&s)));
    assert_eq!(s.score, 5);
    assert_eq!(s.questions_answered, 1);
    assert!(s.quiz.as_ref().is_some_and(|q| q.revealed));

    let s = reduce(&s, &deck, BlocksAction::ContinueFromQuiz);
    assert_eq!(s.phase, BlocksPhase::Playing);
    assert!(s.quiz.is_none());
    assert_eq!(s.pieces.len(), 3);
    assert!(s.pieces.iter().all(|p| !p.is_penalty));
}

#[test]
fn wrong_answers_add_penalty_pieces() {
    let deck = builtin_deck().expect("builtin");
    let s = quiz_state(&deck, 9);
    let wrong = wrong_option(&s);
    let s = reduce(&s, &deck, BlocksAction::AnswerQuiz(wrong));
    assert_eq!(s.penalty_pieces, 1);
    assert_eq!(s.quiz.as_ref().map(|q| q.wrong_count), Some(1));
    assert_eq!(
        s.quiz.as_ref().map(|q| q.disabled.clone()),
        Some(BTreeSet::from([wrong]))
    );

    let again = reduce(&s, &deck, BlocksAction::AnswerQuiz(wrong));
    assert_eq!(again, s, "a disabled option can't be picked twice");

    let s = reduce(&s, &deck, BlocksAction::AnswerQuiz(correct_option(&s)));
    assert_eq!(s.score, 0, "no bonus after a miss");
    assert_eq!(s.questions_answered, 1);

    let s = reduce(&s, &deck, BlocksAction::ContinueFromQuiz);
    assert_eq!(s.pieces.len(), 4);
    assert_eq!(s.pieces.iter().filter(|p| p.is_penalty).count(), 1);
    assert!(s.pieces[3].is_penalty);
    assert_eq!(s.penalty_pieces, 0);
}

#[test]
fn quiz_prefers_unasked_cards_then_falls_back() {
    let deck = Deck::from_cards(vec![card(1), card(2)]).expect("deck");
    let mut s = fresh(10);
    let mut asked = Vec::new();
    for _ in 0..3 {
        s = s.with_position(Grid::new(), vec![piece(1_000, Shape::H2)]);
        s = reduce(&s, &deck, place(0, 0, 1_000));
        assert_eq!(s.phase, BlocksPhase::Quiz);
        asked.push(s.quiz.as_ref().map(|q| q.card_id).expect("quiz"));
        s = reduce(&s, &deck, BlocksAction::AnswerQuiz(correct_option(&s)));
        s = reduce(&s, &deck, BlocksAction::ContinueFromQuiz);
        assert_eq!(s.phase, BlocksPhase::Playing);
    }
    assert_ne!(asked[0], asked[1], "second quiz uses the card not yet asked");
    assert!(deck.get(asked[2]).is_some(), "pool refills from the whole deck");
    assert_eq!(s.asked, BTreeSet::from([1, 2]));
    assert_eq!(s.questions_answered, 3);
}

#[test]
fn new_round_that_cannot_fit_ends_the_game() {
    let deck = builtin_deck().expect("builtin");
    // No two free cells are adjacent, so no shape fits anywhere.
    let mut g = clogged_grid();
    g.set(0, 1, Some(Color::Gold));
    let s = quiz_state(&deck, 11);
    let mut s = s.with_position(g, Vec::new());
    s = reduce(&s, &deck, BlocksAction::AnswerQuiz(correct_option(&s)));
    s = reduce(&s, &deck, BlocksAction::ContinueFromQuiz);
    assert_eq!(s.pieces.len(), 3);
    assert_eq!(s.phase, BlocksPhase::GameOver);
    assert_eq!(s.high_score, 5);
}

#[test]
fn reduce_is_pure() {
    let deck = builtin_deck().expect("builtin");
    let s = quiz_state(&deck, 12);
    let snapshot = s.clone();
    let a = reduce(&s, &deck, BlocksAction::ContinueFromQuiz);
    let b = reduce(&s, &deck, BlocksAction::AnswerQuiz(correct_option(&s)));
    let b2 = reduce(&s, &deck, BlocksAction::AnswerQuiz(correct_option(&s)));
    assert_eq!(s, snapshot);
    assert_eq!(a, s);
    assert_eq!(b, b2);
}

#[test]
fn game_clears_lines_on_a_timer() {
    let deck = builtin_deck().expect("builtin");
    let cfg = BlocksConfig::default();
    let state = BlocksState::new(13, 0, cfg.clone())
        .with_position(almost_full_row(), vec![piece(1, Shape::H2), piece(2, Shape::V2)]);
    let mut game = BlocksGame::from_state(deck, MemoryStore::new(), state);

    game.dispatch(place(0, 6, 1));
    assert!(game.state().clearing.is_some());
    game.tick(cfg.clear_delay_ms - 1);
    assert_eq!(game.state().grid.filled_count(), 8);
    game.tick(1);
    assert!(game.state().clearing.is_none());
    assert_eq!(game.state().grid.filled_count(), 0);
}

#[test]
fn game_over_saves_a_new_best() {
    let deck = builtin_deck().expect("builtin");
    let mut store = MemoryStore::new();
    save_high_score(&mut store, 25);

    let mut state = BlocksState::new(14, 0, BlocksConfig::default())
        .with_position(clogged_grid(), vec![piece(1, Shape::H2), piece(2, Shape::Square)]);
    state.score = 40;
    let mut game = BlocksGame::from_state(deck, store, state);
    assert_eq!(game.state().high_score, 25, "stored best is loaded");

    game.dispatch(place(0, 0, 1));
    assert_eq!(game.state().phase, BlocksPhase::GameOver);
    assert_eq!(game.state().high_score, 40);
    assert_eq!(load_high_score(game.store()), 40);
    assert_eq!(game.take_cues(), vec![Cue::Celebrate]);
}

#[test]
fn game_over_below_best_keeps_it() {
    let deck = builtin_deck().expect("builtin");
    let mut store = MemoryStore::new();
    save_high_score(&mut store, 90);
    let state = BlocksState::new(15, 0, BlocksConfig::default())
        .with_position(clogged_grid(), vec![piece(1, Shape::H2), piece(2, Shape::Square)]);
    let mut game = BlocksGame::from_state(deck, store, state);
    game.dispatch(place(0, 0, 1));
    assert_eq!(game.state().phase, BlocksPhase::GameOver);
    assert_eq!(load_high_score(game.store()), 90);
    assert!(game.take_cues().is_empty());
}

#[test]
fn quiz_feedback_cues() {
    let deck = builtin_deck().expect("builtin");
    let state = fresh(16).with_position(Grid::new(), vec![piece(100, Shape::H2)]);
    let mut game = BlocksGame::from_state(deck, MemoryStore::new(), state);
    game.dispatch(place(3, 3, 100));
    let wrong = wrong_option(game.state());
    let right = correct_option(game.state());
    game.dispatch(BlocksAction::AnswerQuiz(wrong));
    game.dispatch(BlocksAction::AnswerQuiz(right));
    assert_eq!(game.take_cues(), vec![Cue::Wrong, Cue::Correct]);
}

#[test]
fn play_again_cancels_pending_clear() {
    let deck = builtin_deck().expect("builtin");
    let state = fresh(17)
        .with_position(almost_full_row(), vec![piece(1, Shape::H2), piece(2, Shape::V2)]);
    let mut game = BlocksGame::from_state(deck, MemoryStore::new(), state);
    game.dispatch(place(0, 6, 1));
    game.dispatch(BlocksAction::PlayAgain);
    assert!(game.state().clearing.is_none());
    assert_eq!(game.state().high_score, 10);
    let first = game.state().pieces[0].id;
    game.dispatch(place(0, 0, first));
    let filled = game.state().grid.filled_count();
    game.tick(10_000);
    assert_eq!(game.state().grid.filled_count(), filled);
}

#[test]
fn clearing_by_hand_retires_the_pending_timer() {
    let deck = builtin_deck().expect("builtin");
    let cfg = BlocksConfig::default();
    let mut g = almost_full_row();
    for c in 0..6 {
        g.set(1, c, Some(Color::Pink));
    }
    let state = BlocksState::new(19, 0, cfg.clone()).with_position(
        g,
        vec![piece(1, Shape::H2), piece(2, Shape::H2), piece(3, Shape::V2)],
    );
    let mut game = BlocksGame::from_state(deck, MemoryStore::new(), state);

    game.dispatch(place(0, 6, 1));
    game.dispatch(BlocksAction::ClearLinesDone);
    assert!(game.state().clearing.is_none());
    assert_eq!(game.state().grid.filled_count(), 6);

    game.tick(cfg.clear_delay_ms / 2);
    game.dispatch(place(1, 6, 2));
    assert!(game.state().clearing.is_some());
    game.tick(cfg.clear_delay_ms / 2);
    assert_eq!(
        game.state().grid.filled_count(),
        8,
        "the first clear's timer no longer fires"
    );
    game.tick(cfg.clear_delay_ms / 2);
    assert!(game.state().clearing.is_none());
    assert_eq!(game.state().grid.filled_count(), 0);
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let cfg = BlocksConfig {
        base_pieces: 0,
        ..BlocksConfig::default()
    };
    let s = BlocksState::new(20, 0, cfg);
    assert_eq!(s.config, BlocksConfig::default());
    assert_eq!(s.pieces.len(), 3);
}
