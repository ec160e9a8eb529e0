/// Feedback the presentation layer turns into sound or confetti.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Correct,
    Wrong,
    Flip,
    LevelComplete,
    Celebrate,
}

#[derive(Debug, Clone, Default)]
pub struct CueQueue {
    cues: Vec<Cue>,
}

impl CueQueue {
    #[inline]
    pub fn push(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    #[inline]
    pub fn take(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    #[inline]
    pub fn peek(&self) -> &[Cue] {
        &self.cues
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cues.clear();
    }
}
