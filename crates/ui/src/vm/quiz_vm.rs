use quiz_core::model::{QuizCard, QuizResults};
use services::PresenterEvent;

pub const CORRECT_TEXT: &str = "Correct!";
pub const INCORRECT_TEXT: &str = "Incorrect!";

#[must_use]
pub fn progress_label(index: u32, total: u32, score: u32) -> String {
    format!("Question {index} of {total} | Score: {score}")
}

/// `A.`, `B.`, ... for the option at `position`.
#[must_use]
pub fn option_label(position: usize) -> String {
    let letter = u8::try_from(position)
        .ok()
        .and_then(|offset| b'A'.checked_add(offset))
        .map_or('?', char::from);
    format!("{letter}.")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Plain,
    Selected,
    Correct,
    Incorrect,
}

impl OptionMark {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            OptionMark::Plain => "btn-option",
            OptionMark::Selected => "btn-option selected",
            OptionMark::Correct => "btn-option correct",
            OptionMark::Incorrect => "btn-option incorrect",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub label: String,
    pub text: String,
    pub mark: OptionMark,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub was_correct: bool,
    pub correct_answer: String,
    pub score: u32,
}

impl FeedbackVm {
    #[must_use]
    pub fn text(&self) -> &'static str {
        if self.was_correct {
            CORRECT_TEXT
        } else {
            INCORRECT_TEXT
        }
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.was_correct {
            "feedback correct"
        } else {
            "feedback incorrect"
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub question: String,
    pub index: u32,
    pub total: u32,
    pub score: u32,
    options: Vec<String>,
    selected: Option<String>,
    feedback: Option<FeedbackVm>,
}

impl QuestionVm {
    #[must_use]
    pub fn new(card: &QuizCard, index: u32, total: u32, score: u32) -> Self {
        Self {
            question: card.question().to_string(),
            index,
            total,
            score,
            options: card.options().to_vec(),
            selected: None,
            feedback: None,
        }
    }

    /// Score in the label follows the reveal until the next question arrives.
    #[must_use]
    pub fn progress_label(&self) -> String {
        let score = self.feedback.as_ref().map_or(self.score, |feedback| feedback.score);
        progress_label(self.index, self.total, score)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&FeedbackVm> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.feedback.is_some()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.is_revealed()
    }

    #[must_use]
    pub fn options(&self) -> Vec<QuizOptionVm> {
        self.options
            .iter()
            .enumerate()
            .map(|(position, text)| {
                let is_selected = self.selected.as_deref() == Some(text.as_str());
                let mark = match &self.feedback {
                    Some(feedback) if feedback.correct_answer == *text => OptionMark::Correct,
                    Some(feedback) if is_selected && !feedback.was_correct => {
                        OptionMark::Incorrect
                    }
                    Some(_) => OptionMark::Plain,
                    None if is_selected => OptionMark::Selected,
                    None => OptionMark::Plain,
                };
                QuizOptionVm {
                    label: option_label(position),
                    text: text.clone(),
                    mark,
                    disabled: self.is_revealed(),
                }
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub summary: String,
    pub percentage: u32,
    pub final_score: u32,
    pub total: u32,
}

impl ResultsVm {
    #[must_use]
    pub fn new(results: &QuizResults) -> Self {
        Self {
            summary: results.summary_line(),
            percentage: results.percentage(),
            final_score: results.final_score(),
            total: results.total(),
        }
    }
}

/// What the quiz area shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum QuizVm {
    #[default]
    Idle,
    Question(QuestionVm),
    Results(ResultsVm),
}

impl QuizVm {
    /// Fold a presenter event in. Returns false for events that are not about the quiz.
    pub fn apply(&mut self, event: &PresenterEvent) -> bool {
        match event {
            PresenterEvent::Question {
                card,
                index,
                total,
                score,
            } => {
                *self = QuizVm::Question(QuestionVm::new(card, *index, *total, *score));
            }
            PresenterEvent::Selection(selected) => {
                if let QuizVm::Question(question) = self {
                    question.selected = Some(selected.clone());
                }
            }
            PresenterEvent::Feedback {
                was_correct,
                correct_answer,
                selected_answer,
                score,
            } => {
                if let QuizVm::Question(question) = self {
                    question.selected = Some(selected_answer.clone());
                    question.feedback = Some(FeedbackVm {
                        was_correct: *was_correct,
                        correct_answer: correct_answer.clone(),
                        score: *score,
                    });
                }
            }
            PresenterEvent::Results(results) => *self = QuizVm::Results(ResultsVm::new(results)),
            PresenterEvent::QuizClosed => *self = QuizVm::Idle,
            _ => return false,
        }
        true
    }
}
