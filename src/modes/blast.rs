//! Arcade shooter: asteroids carry candidate definitions, the player shoots
//! the one matching the current card. Three levels of five questions each.
//!
//! The state is a plain value. [`apply`] handles player intents and
//! [`advance`] moves the simulation forward by a time step; both return a
//! new state and never touch the old one. Delayed transitions (flash,
//! fade, next question, per-second countdown) live in the state's timer
//! queue, stamped with the question's round id.

use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;
use std::f64::consts::TAU;

use crate::cards::{Deck, QuizCard};
use crate::config::{BlastConfig, LevelConfig};
use crate::cues::{Cue, CueQueue};
use crate::physics::{
    circles_overlap, resolve_collisions, step_body, Body, PlayArea, BULLET_RADIUS, FRAME_RATE,
};
use crate::rng::RngCursor;
use crate::shuffle::{pick_random, shuffle};
use crate::timers::{RoundId, TimerQueue};

pub const ASTEROID_COLORS: [&str; 6] = [
    "#94b8f2", "#d684cc", "#e0a958", "#a0c75d", "#b0c8f5", "#e0a0d8",
];

const SPAWN_PADDING: f64 = 80.0;
const MIN_RADIUS: f64 = 55.0;
const MAX_RADIUS: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlastPhase {
    Ready,
    Playing,
    LevelComplete,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AsteroidStatus {
    Idle,
    Correct,
    Wrong,
    Fading,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asteroid {
    pub id: u32,
    pub text: String,
    /// Card whose question this asteroid belongs to.
    pub card_id: u32,
    pub is_correct: bool,
    pub color: &'static str,
    pub status: AsteroidStatus,
    pub body: Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bullet {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlastAction {
    Start,
    NextLevel,
    PlayAgain,
    /// Bullet impact or direct tap on an asteroid.
    Hit(u32),
    Fire { x: f64, y: f64 },
    Aim { x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlastTimer {
    Countdown,
    Fade(u32),
    Revert(u32),
    Advance,
}

/// Streak ≥ 5 doubles points, streak ≥ 3 gives ×1.5.
#[inline]
pub fn multiplier(streak: u32) -> f64 {
    if streak >= 5 {
        2.0
    } else if streak >= 3 {
        1.5
    } else {
        1.0
    }
}

#[derive(Debug, Clone)]
pub struct BlastState {
    pub config: BlastConfig,
    pub area: PlayArea,
    pub phase: BlastPhase,
    /// Sample drawn once per run; question `n` of level `l` is
    /// `questions[sum(levels[..l].questions) + n]`.
    pub questions: Vec<QuizCard>,
    pub level_idx: usize,
    pub question_idx: usize,
    pub score: u32,
    pub streak: u32,
    pub total_correct: usize,
    pub total_answered: usize,
    /// Questions solved without a wrong hit.
    pub clean_answers: usize,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub time_left: u32,
    pub turret_angle: f64,
    pub locked: bool,
    /// Set once the question is answered correctly or times out.
    pub resolved: bool,
    pub round: RoundId,
    countdown_running: bool,
    had_wrong: bool,
    sim_secs: f64,
    timers: TimerQueue<BlastTimer>,
    cues: CueQueue,
    pool: Vec<QuizCard>,
    rng: RngCursor,
    next_id: u32,
}

impl BlastState {
    /// An invalid config is replaced by the defaults.
    pub fn new(deck: &Deck, seed: u64, config: BlastConfig, area: PlayArea) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("[blast] {e}; using default settings");
                BlastConfig::default()
            }
        };
        let pool = deck.cards().to_vec();
        let mut rng = RngCursor::new(seed, 5);
        let questions = pick_random(&pool, config.total_questions(), &mut rng.next_rng());
        Self {
            config,
            area,
            phase: BlastPhase::Ready,
            questions,
            level_idx: 0,
            question_idx: 0,
            score: 0,
            streak: 0,
            total_correct: 0,
            total_answered: 0,
            clean_answers: 0,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            time_left: 0,
            turret_angle: -std::f64::consts::FRAC_PI_2,
            locked: false,
            resolved: false,
            round: RoundId::default(),
            countdown_running: false,
            had_wrong: false,
            sim_secs: 0.0,
            timers: TimerQueue::new(),
            cues: CueQueue::default(),
            pool,
            rng,
            next_id: 0,
        }
    }

    #[inline]
    pub fn level(&self) -> &LevelConfig {
        &self.config.levels[self.level_idx]
    }

    pub fn global_index(&self) -> usize {
        self.config.levels[..self.level_idx]
            .iter()
            .map(|l| l.questions)
            .sum::<usize>()
            + self.question_idx
    }

    #[inline]
    pub fn current_card(&self) -> Option<&QuizCard> {
        self.questions.get(self.global_index())
    }

    #[inline]
    pub fn multiplier(&self) -> f64 {
        multiplier(self.streak)
    }

    pub fn accuracy(&self) -> u32 {
        if self.total_answered == 0 {
            0
        } else {
            ((self.total_correct as f64 / self.total_answered as f64) * 100.0).round() as u32
        }
    }

    #[inline]
    pub fn is_perfect(&self) -> bool {
        self.phase == BlastPhase::GameOver
            && !self.questions.is_empty()
            && self.clean_answers == self.questions.len()
    }

    /// Whether a frame loop should be driving [`advance`].
    #[inline]
    pub fn is_simulating(&self) -> bool {
        self.phase == BlastPhase::Playing
    }

    #[inline]
    pub fn take_cues(&mut self) -> Vec<Cue> {
        self.cues.take()
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn reset_run(&mut self) {
        self.level_idx = 0;
        self.question_idx = 0;
        self.score = 0;
        self.streak = 0;
        self.total_correct = 0;
        self.total_answered = 0;
        self.clean_answers = 0;
        self.asteroids.clear();
        self.bullets.clear();
        self.locked = false;
        self.resolved = false;
        self.countdown_running = false;
        self.round = self.round.next();
        self.timers.clear();
    }

    fn start(&mut self) {
        if self.phase != BlastPhase::Ready {
            return;
        }
        self.reset_run();
        self.phase = BlastPhase::Playing;
        self.spawn_question();
    }

    fn next_level(&mut self) {
        if self.phase != BlastPhase::LevelComplete {
            return;
        }
        self.level_idx += 1;
        self.question_idx = 0;
        self.phase = BlastPhase::Playing;
        self.spawn_question();
    }

    fn play_again(&mut self) {
        self.reset_run();
        self.questions = pick_random(
            &self.pool,
            self.config.total_questions(),
            &mut self.rng.next_rng(),
        );
        self.phase = BlastPhase::Ready;
    }

    fn spawn_question(&mut self) {
        let Some(card) = self.current_card().cloned() else {
            self.finish_run();
            return;
        };
        self.round = self.round.next();
        self.timers.clear();
        self.asteroids = self.generate_asteroids(&card);
        self.bullets.clear();
        self.time_left = self.level().time_per_question_secs;
        self.countdown_running = true;
        self.locked = false;
        self.resolved = false;
        self.had_wrong = false;
        self.timers.schedule(1000, self.round, BlastTimer::Countdown);
        debug!(
            "[blast] level {} question {} (card {})",
            self.level().level,
            self.question_idx + 1,
            card.id
        );
    }

    fn generate_asteroids(&mut self, card: &QuizCard) -> Vec<Asteroid> {
        let level = self.level().clone();
        let mut rng = self.rng.next_rng();

        let wanted = level.asteroid_count.saturating_sub(1).min(card.distractors.len());
        let mut items: Vec<(String, bool)> = vec![(card.short_def.clone(), true)];
        items.extend(
            pick_random(&card.distractors, wanted, &mut rng)
                .into_iter()
                .map(|d| (d, false)),
        );
        let items = shuffle(&items, &mut rng);

        let usable_w = (self.area.width - SPAWN_PADDING * 2.0).max(200.0);
        // Top 75% only; the turret sits below.
        let usable_h = ((self.area.height - SPAWN_PADDING * 2.0) * 0.75).max(150.0);

        let mut out = Vec::with_capacity(items.len());
        for (i, (text, is_correct)) in items.into_iter().enumerate() {
            let angle = rng.gen::<f64>() * TAU;
            let speed = level.speed * (0.6 + rng.gen::<f64>() * 0.8) * FRAME_RATE;
            let radius = (45.0 + text.chars().count() as f64 * 0.6).clamp(MIN_RADIUS, MAX_RADIUS);
            let body = Body {
                x: SPAWN_PADDING + rng.gen::<f64>() * usable_w,
                y: SPAWN_PADDING + rng.gen::<f64>() * usable_h,
                dx: angle.cos() * speed,
                dy: angle.sin() * speed,
                radius,
            };
            out.push(Asteroid {
                id: self.next_id(),
                text,
                card_id: card.id,
                is_correct,
                color: ASTEROID_COLORS[i % ASTEROID_COLORS.len()],
                status: AsteroidStatus::Idle,
                body,
            });
        }
        out
    }

    fn aim(&mut self, x: f64, y: f64) {
        let (tx, ty) = self.area.turret();
        self.turret_angle = (y - ty).atan2(x - tx);
    }

    fn fire(&mut self, x: f64, y: f64) {
        if self.locked || self.phase != BlastPhase::Playing {
            return;
        }
        self.aim(x, y);
        let (tx, ty) = self.area.turret();
        let speed = self.config.bullet_speed * FRAME_RATE;
        let id = self.next_id();
        self.bullets.push(Bullet {
            id,
            x: tx,
            y: ty - 20.0,
            dx: self.turret_angle.cos() * speed,
            dy: self.turret_angle.sin() * speed,
        });
    }

    fn hit(&mut self, asteroid_id: u32) {
        if self.locked || self.resolved || self.phase != BlastPhase::Playing {
            return;
        }
        let Some(pos) = self
            .asteroids
            .iter()
            .position(|a| a.id == asteroid_id && a.status == AsteroidStatus::Idle)
        else {
            return;
        };
        self.locked = true;
        self.total_answered += 1;

        if self.asteroids[pos].is_correct {
            self.resolved = true;
            self.countdown_running = false;
            let points = (f64::from(self.config.points_correct) * self.multiplier()).round() as u32;
            self.score += points;
            self.streak += 1;
            self.total_correct += 1;
            if !self.had_wrong {
                self.clean_answers += 1;
            }
            self.asteroids[pos].status = AsteroidStatus::Correct;
            self.cues.push(Cue::Correct);
            self.timers
                .schedule(self.config.fade_delay_ms, self.round, BlastTimer::Fade(asteroid_id));
            self.timers
                .schedule(self.config.advance_delay_ms, self.round, BlastTimer::Advance);
        } else {
            self.score = self.score.saturating_sub(self.config.points_wrong);
            self.streak = 0;
            self.had_wrong = true;
            self.asteroids[pos].status = AsteroidStatus::Wrong;
            self.cues.push(Cue::Wrong);
            self.timers
                .schedule(self.config.wrong_flash_ms, self.round, BlastTimer::Revert(asteroid_id));
        }
    }

    fn timeout(&mut self) {
        if self.resolved {
            return;
        }
        self.resolved = true;
        self.locked = true;
        self.countdown_running = false;
        self.streak = 0;
        self.total_answered += 1;
        self.score = self.score.saturating_sub(self.config.points_wrong);
        self.cues.push(Cue::Wrong);
        self.timers
            .schedule(self.config.timeout_advance_ms, self.round, BlastTimer::Advance);
        debug!("[blast] question timed out");
    }

    fn on_timer(&mut self, timer: BlastTimer) {
        match timer {
            BlastTimer::Countdown => {
                if !self.countdown_running {
                    return;
                }
                self.time_left = self.time_left.saturating_sub(1);
                if self.time_left == 0 {
                    self.timeout();
                } else {
                    self.timers.schedule(1000, self.round, BlastTimer::Countdown);
                }
            }
            BlastTimer::Fade(id) => {
                if let Some(a) = self.asteroids.iter_mut().find(|a| a.id == id) {
                    a.status = AsteroidStatus::Fading;
                }
            }
            BlastTimer::Revert(id) => {
                if let Some(a) = self
                    .asteroids
                    .iter_mut()
                    .find(|a| a.id == id && a.status == AsteroidStatus::Wrong)
                {
                    a.status = AsteroidStatus::Idle;
                }
                if !self.resolved {
                    self.locked = false;
                }
            }
            BlastTimer::Advance => self.advance_question(),
        }
    }

    fn advance_question(&mut self) {
        let next_q = self.question_idx + 1;
        let next_global = self.global_index() + 1;
        if next_q < self.level().questions && next_global < self.questions.len() {
            self.question_idx = next_q;
            self.spawn_question();
            return;
        }
        if self.level_idx + 1 < self.config.levels.len() && next_global < self.questions.len() {
            self.leave_playing();
            self.phase = BlastPhase::LevelComplete;
            self.cues.push(Cue::LevelComplete);
            info!("[blast] level {} complete, score {}", self.level().level, self.score);
        } else {
            self.finish_run();
        }
    }

    fn finish_run(&mut self) {
        self.leave_playing();
        self.phase = BlastPhase::GameOver;
        if self.is_perfect() {
            self.cues.push(Cue::Celebrate);
        }
        info!(
            "[blast] game over: score {} correct {}/{}",
            self.score,
            self.total_correct,
            self.questions.len()
        );
    }

    fn leave_playing(&mut self) {
        self.round = self.round.next();
        self.timers.clear();
        self.bullets.clear();
        self.countdown_running = false;
        self.locked = false;
    }

    fn step_physics(&mut self, dt: f64) {
        let area = self.area;
        for a in self
            .asteroids
            .iter_mut()
            .filter(|a| a.status == AsteroidStatus::Idle)
        {
            step_body(&mut a.body, &area, dt);
        }
        resolve_collisions(
            &mut self.asteroids,
            |a: &Asteroid| a.status == AsteroidStatus::Idle,
            |a: &mut Asteroid| &mut a.body,
        );

        let mut hits = Vec::new();
        let asteroids = &self.asteroids;
        self.bullets.retain_mut(|b| {
            b.x += b.dx * dt;
            b.y += b.dy * dt;
            if !area.contains_with_margin(b.x, b.y) {
                return false;
            }
            let target = asteroids.iter().find(|a| {
                a.status == AsteroidStatus::Idle
                    && circles_overlap(b.x, b.y, BULLET_RADIUS, a.body.x, a.body.y, a.body.radius)
            });
            match target {
                Some(a) => {
                    hits.push(a.id);
                    false
                }
                None => true,
            }
        });
        for id in hits {
            self.hit(id);
        }
    }
}

/// Apply a player intent. Intents that make no sense in the current phase
/// (or while an answer is being judged) return an unchanged copy.
pub fn apply(state: &BlastState, action: BlastAction) -> BlastState {
    let mut s = state.clone();
    match action {
        BlastAction::Start => s.start(),
        BlastAction::NextLevel => s.next_level(),
        BlastAction::PlayAgain => s.play_again(),
        BlastAction::Hit(id) => s.hit(id),
        BlastAction::Fire { x, y } => s.fire(x, y),
        BlastAction::Aim { x, y } => s.aim(x, y),
    }
    s
}

/// Move the simulation forward by `dt` seconds: bodies, bullets, hits and
/// due timers. Outside the playing phase nothing moves.
pub fn advance(state: &BlastState, dt: f64) -> BlastState {
    let mut s = state.clone();
    if s.phase != BlastPhase::Playing || dt.is_nan() || dt <= 0.0 {
        return s;
    }
    s.step_physics(dt);

    s.sim_secs += dt;
    let until = (s.sim_secs * 1000.0).round() as u64;
    while s.phase == BlastPhase::Playing {
        let Some(timer) = s.timers.pop_current(until, s.round) else {
            break;
        };
        s.on_timer(timer);
    }
    s.timers.settle(until);
    s
}
