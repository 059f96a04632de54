use crate::error::QuizError;
use crate::model::notice::Severity;

/// Final tally of a completed quiz, as reported by the quiz service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResults {
    final_score: u32,
    total: u32,
}

impl QuizResults {
    /// # Errors
    ///
    /// Returns `QuizError::InconsistentProgress` if the score exceeds the total.
    pub fn new(final_score: u32, total: u32) -> Result<Self, QuizError> {
        if final_score > total {
            return Err(QuizError::InconsistentProgress {
                index: total,
                total,
                score: final_score,
            });
        }
        Ok(Self { final_score, total })
    }

    #[must_use]
    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Share of correct answers, rounded half up to a whole percent.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let score = u64::from(self.final_score);
        let total = u64::from(self.total);
        let rounded = (score * 200 + total) / (total * 2);
        u32::try_from(rounded).unwrap_or(100)
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        match self.percentage() {
            80.. => Verdict::Excellent,
            60.. => Verdict::Good,
            _ => Verdict::KeepStudying,
        }
    }

    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "You got {} out of {} questions correct ({}%)",
            self.final_score,
            self.total,
            self.percentage()
        )
    }
}

/// Encouragement bucket for a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Excellent,
    Good,
    KeepStudying,
}

impl Verdict {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Excellent => "Excellent work! You're a master!",
            Verdict::Good => "Good job! Keep practicing!",
            Verdict::KeepStudying => "Keep studying! Practice makes perfect!",
        }
    }

    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Verdict::Excellent | Verdict::Good => Severity::Success,
            Verdict::KeepStudying => Severity::Info,
        }
    }
}
