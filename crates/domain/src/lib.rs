#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod draft;
pub mod error;
pub mod exercise;
pub mod name;
pub mod routine;
pub mod service;
pub mod session;
pub mod trivia;

pub use draft::{EntryUpdate, RoutineDraft};
pub use error::{CreateError, ReadError, StorageError, SubmitError, ValidationError};
pub use exercise::{
    Difficulty, DifficultyError, Exercise, ExerciseID, ExerciseRepository, ExerciseService,
};
pub use name::{Name, NameError};
pub use routine::{
    Routine, RoutineEntry, RoutineID, RoutineRepository, RoutineService, RoutineWithEntries,
};
pub use service::Service;
pub use session::{SessionRepository, SessionService, UserID};
pub use trivia::{
    QuestionCard, Quiz, RefreshToken, TriviaRepository, TriviaService, parse_questions,
};
