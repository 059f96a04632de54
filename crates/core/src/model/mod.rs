mod card;
mod ids;
pub mod notice;
mod quiz;
mod results;

pub use ids::CardId;

pub use card::{Card, CardDraft, OPTION_COUNT, QuizCard, ValidatedCard};
pub use notice::{NOTICE_TTL_SECS, Notice, NoticeBoard, Severity};
pub use quiz::{AnswerOutcome, Advance, Progress, QuizPhase, QuizSession, Step};
pub use results::{QuizResults, Verdict};
