use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use quiz_core::model::{
    AnswerOutcome, Advance, Card, CardDraft, CardId, OPTION_COUNT, Progress, QuizCard,
    QuizResults,
};
use rand::rng;
use rand::seq::SliceRandom;

use crate::api::{CardStore, QuizService, RemoteError, StartedQuiz};

/// Fallback distractors for answers the table below does not know.
const GENERIC_DISTRACTORS: [&str; 4] = ["Option A", "Option B", "Option C", "Option D"];

/// Plausible wrong answers for the sample deck's answers.
const KNOWN_DISTRACTORS: &[(&str, [&str; 3])] = &[
    ("Paris", ["London", "Berlin", "Madrid"]),
    ("4", ["5", "6", "3"]),
    ("Jupiter", ["Saturn", "Mars", "Venus"]),
    ("Washington D.C.", ["New York", "Los Angeles", "Chicago"]),
    ("Tokyo", ["Seoul", "Beijing", "Bangkok"]),
    ("Australia", ["New Zealand", "Fiji", "Papua New Guinea"]),
    ("Blue", ["Red", "Green", "Yellow"]),
    ("Shakespeare", ["Dickens", "Hemingway", "Tolstoy"]),
    ("DNA", ["RNA", "Protein", "Enzyme"]),
    ("Gravity", ["Magnetism", "Electricity", "Friction"]),
];

/// Build the option set for `answer`: the answer plus three distinct distractors.
#[must_use]
pub fn generate_options(answer: &str, shuffle: bool) -> Vec<String> {
    let known = KNOWN_DISTRACTORS
        .iter()
        .find(|(candidate, _)| *candidate == answer)
        .map(|(_, wrong)| wrong.as_slice())
        .unwrap_or(&[]);

    let mut options = vec![answer.to_string()];
    for wrong in known.iter().chain(GENERIC_DISTRACTORS.iter()) {
        if options.len() == OPTION_COUNT {
            break;
        }
        if !options.iter().any(|existing| existing == wrong) {
            options.push((*wrong).to_string());
        }
    }

    if shuffle {
        options.shuffle(&mut rng());
    }
    options
}

#[derive(Debug, Clone)]
struct StoredCard {
    card: Card,
    options: Vec<String>,
}

impl StoredCard {
    fn to_quiz_card(&self) -> Result<QuizCard, RemoteError> {
        QuizCard::new(self.card.clone(), self.options.clone())
            .map_err(|err| RemoteError::Decode(err.to_string()))
    }
}

#[derive(Debug)]
struct ActiveQuiz {
    cards: Vec<StoredCard>,
    current: usize,
    score: u32,
}

#[derive(Debug)]
struct MemoryState {
    next_id: u64,
    cards: Vec<StoredCard>,
    quiz: Option<ActiveQuiz>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            next_id: 1,
            cards: Vec::new(),
            quiz: None,
        }
    }
}

/// In-process stand-in for the quiz service, for tests and prototyping.
///
/// Behaves like the reference server: options are fixed when a card is
/// created, a quiz walks a shuffled copy of the deck, and scoring happens here.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<MemoryState>>,
    deterministic: bool,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep deck order and option order exactly as created.
    #[must_use]
    pub fn deterministic() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            deterministic: true,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, RemoteError> {
        self.state
            .lock()
            .map_err(|err| RemoteError::Transport(err.to_string()))
    }

    fn total(cards: &[StoredCard]) -> Result<u32, RemoteError> {
        u32::try_from(cards.len()).map_err(|_| RemoteError::Decode("deck too large".into()))
    }
}

#[async_trait]
impl CardStore for InMemoryBackend {
    async fn list_cards(&self) -> Result<Vec<Card>, RemoteError> {
        let guard = self.lock()?;
        Ok(guard.cards.iter().map(|stored| stored.card.clone()).collect())
    }

    async fn create_card(&self, draft: CardDraft) -> Result<Card, RemoteError> {
        let validated = draft
            .validate()
            .map_err(|err| RemoteError::Validation(err.to_string()))?;
        let options = generate_options(validated.answer(), !self.deterministic);

        let mut guard = self.lock()?;
        let id = CardId::new(guard.next_id);
        guard.next_id += 1;
        let card = validated.assign_id(id);
        guard.cards.push(StoredCard {
            card: card.clone(),
            options,
        });
        Ok(card)
    }

    async fn delete_card(&self, id: CardId) -> Result<(), RemoteError> {
        let mut guard = self.lock()?;
        let before = guard.cards.len();
        guard.cards.retain(|stored| stored.card.id != id);
        if guard.cards.len() == before {
            return Err(RemoteError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl QuizService for InMemoryBackend {
    async fn start_session(&self) -> Result<StartedQuiz, RemoteError> {
        let mut guard = self.lock()?;
        if guard.cards.is_empty() {
            return Err(RemoteError::EmptyDeck);
        }

        let mut cards = guard.cards.clone();
        if !self.deterministic {
            cards.shuffle(&mut rng());
        }
        let total_questions = Self::total(&cards)?;
        let first_card = cards[0].to_quiz_card()?;
        guard.quiz = Some(ActiveQuiz {
            cards,
            current: 0,
            score: 0,
        });

        Ok(StartedQuiz {
            first_card,
            total_questions,
        })
    }

    async fn submit_answer(&self, selected_answer: &str) -> Result<AnswerOutcome, RemoteError> {
        let mut guard = self.lock()?;
        let quiz = guard.quiz.as_mut().ok_or(RemoteError::NoActiveSession)?;
        let Some(current) = quiz.cards.get(quiz.current) else {
            return Err(RemoteError::QuizCompleted);
        };

        let was_correct = selected_answer == current.card.answer;
        if was_correct {
            quiz.score += 1;
        }
        quiz.current += 1;

        let total = Self::total(&quiz.cards)?;
        let advance = match quiz.cards.get(quiz.current) {
            None => Advance::Finished(
                QuizResults::new(quiz.score, total)
                    .map_err(|err| RemoteError::Decode(err.to_string()))?,
            ),
            Some(next) => {
                let index = Self::total(&quiz.cards[..=quiz.current])?;
                let progress = Progress::new(index, total, quiz.score)
                    .map_err(|err| RemoteError::Decode(err.to_string()))?;
                Advance::Next {
                    card: next.to_quiz_card()?,
                    progress,
                }
            }
        };

        Ok(AnswerOutcome {
            was_correct,
            advance,
        })
    }

    async fn end_session(&self) -> Result<(), RemoteError> {
        let mut guard = self.lock()?;
        guard.quiz = None;
        Ok(())
    }
}
