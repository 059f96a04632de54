mod cards;
mod notices;
mod quiz;

pub use cards::CardsView;
pub use notices::NoticeStack;
pub use quiz::QuizView;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
