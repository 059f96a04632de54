#![forbid(unsafe_code)]

pub mod app_services;
pub mod card_service;
pub mod error;
pub mod presenter;
pub mod quiz_controller;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use card_service::{CardService, SAMPLE_CARDS};
pub use error::{
    AppServicesError, CardServiceError, ControllerError, ServiceError, StateError,
    ValidationError,
};
pub use presenter::{EventSink, LogPresenter, Presenter, PresenterEvent, RecordingPresenter};
pub use quiz_controller::{DEFAULT_REVEAL_DELAY, QuizController, QuizIntent};
