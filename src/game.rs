//! "Who's that Pokémon?" quiz state and the persisted score totals.

use serde::{Deserialize, Serialize};

pub const MAX_ROUNDS: u32 = 10;
pub const TIME_ATTACK_SECONDS: u32 = 60;
pub const TIME_BONUS_SECONDS: u32 = 3;
pub const INITIAL_BLUR: u32 = 30;
/// Blur above this level when answering earns a bonus point.
pub const BLUR_BONUS_THRESHOLD: u32 = 15;
/// How often the blur drops by one step.
pub const BLUR_STEP_MILLIS: u64 = 300;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameScores {
    pub high_score: u32,
    pub games_played: u32,
    pub total_correct: u32,
}

impl GameScores {
    pub fn record(&mut self, score: u32) {
        self.high_score = self.high_score.max(score);
        self.games_played += 1;
        self.total_correct += score;
    }

    /// Percentage of correct answers over every round played, rounded.
    pub fn accuracy(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }
        let rounds = f64::from(self.games_played) * f64::from(MAX_ROUNDS);
        (f64::from(self.total_correct) / rounds * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Highest national dex id drawn from.
    pub fn max_id(&self) -> u32 {
        match self {
            Difficulty::Easy => 151,
            Difficulty::Medium => 386,
            Difficulty::Hard => 898,
        }
    }

    pub fn options(&self) -> usize {
        match self {
            Difficulty::Easy | Difficulty::Medium => 4,
            Difficulty::Hard => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Gen 1 (Kanto)",
            Difficulty::Medium => "Gen 1-3",
            Difficulty::Hard => "All Gens",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    #[default]
    Classic,
    CryQuiz,
    TimeAttack,
    BlurMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    #[default]
    MultipleChoice,
    TextInput,
}

/// What [`Quiz::next_round`] decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Load another Pokémon.
    Continue,
    /// The game ended with this score; record it.
    Finished(u32),
}

#[derive(Debug, Clone)]
pub struct Quiz {
    pub game_type: GameType,
    pub answer_mode: AnswerMode,
    pub difficulty: Difficulty,
    score: u32,
    time_attack_score: u32,
    round: u32,
    streak: u32,
    results: Vec<bool>,
    answer: Option<String>,
    options: Vec<String>,
    revealed: bool,
    last_correct: Option<bool>,
    blur: u32,
    time_left: u32,
    finished: bool,
}

impl Quiz {
    pub fn new(game_type: GameType, answer_mode: AnswerMode, difficulty: Difficulty) -> Self {
        Self {
            game_type,
            answer_mode,
            difficulty,
            score: 0,
            time_attack_score: 0,
            round: 1,
            streak: 0,
            results: Vec::new(),
            answer: None,
            options: Vec::new(),
            revealed: false,
            last_correct: None,
            blur: INITIAL_BLUR,
            time_left: TIME_ATTACK_SECONDS,
            finished: false,
        }
    }

    /// Presents a new Pokémon. `options` is ignored in text-input mode.
    pub fn start_round(&mut self, answer: impl Into<String>, options: Vec<String>) {
        self.answer = Some(answer.into());
        self.options = match self.answer_mode {
            AnswerMode::MultipleChoice => options,
            AnswerMode::TextInput => Vec::new(),
        };
        self.revealed = false;
        self.last_correct = None;
        self.blur = INITIAL_BLUR;
    }

    /// Returns whether the guess was right, or `None` when there is nothing to
    /// answer (no round loaded, already revealed or game over).
    pub fn guess(&mut self, name: &str) -> Option<bool> {
        if self.revealed || self.finished {
            return None;
        }
        let answer = self.answer.as_deref()?;
        let correct = name.trim().to_lowercase() == answer.to_lowercase();

        self.reveal(correct);
        if correct {
            self.score += 1;
            self.streak += 1;
            match self.game_type {
                GameType::TimeAttack => {
                    self.time_attack_score += 1;
                    self.time_left = (self.time_left + TIME_BONUS_SECONDS).min(TIME_ATTACK_SECONDS);
                }
                GameType::BlurMode if self.blur > BLUR_BONUS_THRESHOLD => {
                    self.score += 1;
                }
                _ => {}
            }
        } else {
            self.streak = 0;
        }
        Some(correct)
    }

    pub fn skip(&mut self) {
        if self.revealed || self.finished || self.answer.is_none() {
            return;
        }
        self.reveal(false);
        self.streak = 0;
    }

    fn reveal(&mut self, correct: bool) {
        self.revealed = true;
        self.last_correct = Some(correct);
        self.results.push(correct);
    }

    pub fn next_round(&mut self) -> RoundOutcome {
        if self.finished {
            return RoundOutcome::Finished(self.final_score());
        }
        if self.game_type == GameType::TimeAttack {
            return RoundOutcome::Continue;
        }
        if self.round >= MAX_ROUNDS {
            self.finished = true;
            tracing::info!("Quiz finished with score {}", self.score);
            RoundOutcome::Finished(self.score)
        } else {
            self.round += 1;
            RoundOutcome::Continue
        }
    }

    /// Advances the time attack clock by one second.
    pub fn tick(&mut self) -> RoundOutcome {
        if self.game_type != GameType::TimeAttack || self.finished {
            return if self.finished {
                RoundOutcome::Finished(self.final_score())
            } else {
                RoundOutcome::Continue
            };
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.finished = true;
            tracing::info!("Time attack finished with score {}", self.time_attack_score);
            RoundOutcome::Finished(self.time_attack_score)
        } else {
            RoundOutcome::Continue
        }
    }

    /// Lowers the blur one step while the answer is hidden.
    pub fn reduce_blur(&mut self) {
        if !self.revealed {
            self.blur = self.blur.saturating_sub(1);
        }
    }

    pub fn final_score(&self) -> u32 {
        match self.game_type {
            GameType::TimeAttack => self.time_attack_score,
            _ => self.score,
        }
    }

    /// End-of-game verdict for a rounds-based game.
    pub fn verdict(&self) -> &'static str {
        let percentage = (f64::from(self.score) / f64::from(MAX_ROUNDS) * 100.0).round();
        if percentage >= 100.0 {
            "Pokémon Master!"
        } else if percentage >= 80.0 {
            "Excellent!"
        } else if percentage >= 60.0 {
            "Good job!"
        } else if percentage >= 40.0 {
            "Not bad!"
        } else {
            "Keep practicing!"
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn results(&self) -> &[bool] {
        &self.results
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn last_correct(&self) -> Option<bool> {
        self.last_correct
    }

    pub fn blur(&self) -> u32 {
        self.blur
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        ["pikachu", "eevee", "mew", "ditto"].map(String::from).to_vec()
    }

    #[test]
    fn test_scores_record_and_accuracy() {
        let mut scores = GameScores::default();
        assert_eq!(scores.accuracy(), 0);

        scores.record(7);
        scores.record(4);
        assert_eq!(
            scores,
            GameScores {
                high_score: 7,
                games_played: 2,
                total_correct: 11,
            }
        );
        assert_eq!(scores.accuracy(), 55);
    }

    #[test]
    fn test_scores_storage_format() {
        let json = serde_json::to_string(&GameScores::default()).unwrap();
        assert_eq!(json, r#"{"highScore":0,"gamesPlayed":0,"totalCorrect":0}"#);
    }

    #[test]
    fn test_guess_is_case_insensitive() {
        let mut quiz = Quiz::new(GameType::Classic, AnswerMode::TextInput, Difficulty::Easy);
        assert_eq!(quiz.guess("pikachu"), None);

        quiz.start_round("pikachu", options());
        assert!(quiz.options().is_empty());
        assert_eq!(quiz.guess("  PikaChu "), Some(true));
        assert_eq!(quiz.guess("pikachu"), None);
        assert_eq!(quiz.score(), 1);
        assert_eq!(quiz.streak(), 1);
    }

    #[test]
    fn test_wrong_answer_resets_streak() {
        let mut quiz = Quiz::new(GameType::Classic, AnswerMode::MultipleChoice, Difficulty::Easy);
        quiz.start_round("mew", options());
        quiz.guess("mew");
        quiz.next_round();
        quiz.start_round("ditto", options());
        assert_eq!(quiz.guess("mew"), Some(false));
        assert_eq!(quiz.streak(), 0);
        quiz.next_round();
        quiz.start_round("eevee", options());
        quiz.skip();
        assert_eq!(quiz.results(), &[true, false, false]);
        assert_eq!(quiz.score(), 1);
    }

    #[test]
    fn test_game_ends_after_ten_rounds() {
        let mut quiz = Quiz::new(GameType::Classic, AnswerMode::MultipleChoice, Difficulty::Hard);
        for round in 1..=MAX_ROUNDS {
            assert_eq!(quiz.round(), round);
            quiz.start_round("mew", options());
            quiz.guess("mew");
            let outcome = quiz.next_round();
            if round < MAX_ROUNDS {
                assert_eq!(outcome, RoundOutcome::Continue);
            } else {
                assert_eq!(outcome, RoundOutcome::Finished(10));
            }
        }
        assert!(quiz.is_finished());
        assert_eq!(quiz.verdict(), "Pokémon Master!");
    }

    #[test]
    fn test_time_attack_bonus_is_capped() {
        let mut quiz = Quiz::new(GameType::TimeAttack, AnswerMode::TextInput, Difficulty::Medium);
        for _ in 0..10 {
            quiz.tick();
        }
        assert_eq!(quiz.time_left(), 50);

        quiz.start_round("eevee", Vec::new());
        quiz.guess("eevee");
        assert_eq!(quiz.time_left(), 53);
        assert_eq!(quiz.next_round(), RoundOutcome::Continue);

        quiz.start_round("mew", Vec::new());
        for _ in 0..5 {
            quiz.tick();
        }
        quiz.guess("mew");
        assert_eq!(quiz.time_left(), 51);

        let mut outcome = RoundOutcome::Continue;
        while outcome == RoundOutcome::Continue {
            outcome = quiz.tick();
        }
        assert_eq!(outcome, RoundOutcome::Finished(2));
        assert_eq!(quiz.final_score(), 2);
    }

    #[test]
    fn test_time_attack_never_exceeds_sixty() {
        let mut quiz = Quiz::new(GameType::TimeAttack, AnswerMode::TextInput, Difficulty::Easy);
        quiz.tick();
        quiz.start_round("mew", Vec::new());
        quiz.guess("mew");
        assert_eq!(quiz.time_left(), TIME_ATTACK_SECONDS);
    }

    #[test]
    fn test_blur_bonus_only_while_blurry() {
        let mut quiz = Quiz::new(GameType::BlurMode, AnswerMode::MultipleChoice, Difficulty::Easy);
        quiz.start_round("mew", options());
        quiz.guess("mew");
        assert_eq!(quiz.score(), 2);

        quiz.next_round();
        quiz.start_round("ditto", options());
        for _ in 0..(INITIAL_BLUR - BLUR_BONUS_THRESHOLD) {
            quiz.reduce_blur();
        }
        assert_eq!(quiz.blur(), BLUR_BONUS_THRESHOLD);
        quiz.guess("ditto");
        assert_eq!(quiz.score(), 3);
    }

    #[test]
    fn test_difficulty_settings() {
        assert_eq!(Difficulty::Easy.max_id(), 151);
        assert_eq!(Difficulty::Medium.options(), 4);
        assert_eq!(Difficulty::Hard.max_id(), 898);
        assert_eq!(Difficulty::Hard.options(), 6);
    }
}
