use reqwest::StatusCode;

use crate::api::RemoteError;

/// Service call a response belongs to; error statuses mean different things per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    ListCards,
    CreateCard,
    DeleteCard,
    StartQuiz,
    SubmitAnswer,
    EndQuiz,
}

impl Endpoint {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Endpoint::ListCards => "list_cards",
            Endpoint::CreateCard => "create_card",
            Endpoint::DeleteCard => "delete_card",
            Endpoint::StartQuiz => "start_quiz",
            Endpoint::SubmitAnswer => "submit_answer",
            Endpoint::EndQuiz => "end_quiz",
        }
    }
}

const NO_CARDS_DETAIL: &str = "no flashcards available";
const NO_SESSION_DETAIL: &str = "no active quiz session";
const COMPLETED_DETAIL: &str = "quiz already completed";

/// Map a non-2xx response to the contract error it stands for.
///
/// `detail` is the server's error text, or `None` when the body had none.
/// A 400 only becomes a specific contract error when its detail says which;
/// anything else keeps its status and message.
pub(crate) fn classify(endpoint: Endpoint, status: StatusCode, detail: Option<String>) -> RemoteError {
    let message = detail.unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    let says = |expected: &str| message.trim().eq_ignore_ascii_case(expected);

    match (endpoint, status) {
        (Endpoint::DeleteCard, StatusCode::NOT_FOUND) => RemoteError::NotFound,
        (Endpoint::CreateCard, StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY) => {
            RemoteError::Validation(message)
        }
        (Endpoint::StartQuiz, StatusCode::BAD_REQUEST) if says(NO_CARDS_DETAIL) => {
            RemoteError::EmptyDeck
        }
        (Endpoint::SubmitAnswer, StatusCode::BAD_REQUEST) if says(COMPLETED_DETAIL) => {
            RemoteError::QuizCompleted
        }
        (Endpoint::SubmitAnswer, StatusCode::BAD_REQUEST) if says(NO_SESSION_DETAIL) => {
            RemoteError::NoActiveSession
        }
        _ => RemoteError::Service {
            status: status.as_u16(),
            message,
        },
    }
}
