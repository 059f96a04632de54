#![forbid(unsafe_code)]

pub mod api;
pub mod http;
pub mod memory;
pub mod wire;

pub use api::{CardStore, QuizService, Remote, RemoteError, StartedQuiz};
pub use http::{HttpBackend, HttpConfig, HttpInitError};
pub use memory::InMemoryBackend;
