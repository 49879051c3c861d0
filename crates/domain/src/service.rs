use log::{debug, error};
use serde_json::Value;

use crate::{
    Exercise, ExerciseRepository, ExerciseService, Name, QuestionCard, ReadError, Routine,
    RoutineDraft, RoutineEntry, RoutineID, RoutineRepository, RoutineService, RoutineWithEntries,
    SessionRepository, SessionService, StorageError, SubmitError, TriviaRepository, TriviaService,
    UserID, parse_questions,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: SessionRepository> SessionService for Service<R> {
    async fn get_current_user_id(&self) -> Result<UserID, ReadError> {
        log_on_error!(
            self.repository.current_user_id(),
            ReadError,
            "get",
            "session"
        )
    }
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn get_liked_exercises(&self, user_id: UserID) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_liked_exercises(user_id),
            ReadError,
            "get",
            "liked exercises"
        )
    }
}

impl<R: RoutineRepository + SessionRepository> RoutineService for Service<R> {
    async fn get_routines(&self, owner: UserID) -> Result<Vec<Routine>, ReadError> {
        log_on_error!(
            self.repository.read_routines(owner),
            ReadError,
            "get",
            "routines"
        )
    }

    async fn get_routine_with_entries(
        &self,
        id: RoutineID,
    ) -> Result<RoutineWithEntries, ReadError> {
        log_on_error!(
            self.repository.read_routine_with_entries(id),
            ReadError,
            "get",
            "routine"
        )
    }

    /// Commits `draft` as one logical two-step write: the header first to
    /// obtain the generated id, then the entry list referencing it.
    ///
    /// On success the draft is reset. On failure the draft is kept intact
    /// for a retry and the error propagates; a header without entries may
    /// remain on the backend if the second write fails.
    async fn create_routine(&self, draft: &mut RoutineDraft) -> Result<Routine, SubmitError> {
        if draft.is_submitting() {
            return Err(SubmitError::InProgress);
        }

        let (name, description) = draft.validate()?;

        draft.begin_submission();
        let result = self
            .persist_routine(name, description, draft.entries())
            .await;
        match result {
            Ok(routine) => {
                draft.reset();
                Ok(routine)
            }
            Err(err) => {
                match err {
                    SubmitError::Storage(StorageError::NoConnection) => {
                        debug!("failed to create routine: {err}");
                    }
                    ref err => {
                        error!("failed to create routine: {err}");
                    }
                }
                draft.abort_submission();
                Err(err)
            }
        }
    }
}

impl<R: RoutineRepository + SessionRepository> Service<R> {
    async fn persist_routine(
        &self,
        name: Name,
        description: Option<String>,
        entries: &[RoutineEntry],
    ) -> Result<Routine, SubmitError> {
        let owner = self.repository.current_user_id().await?;
        let routine = self
            .repository
            .create_routine(owner, name, description)
            .await?;
        self.repository
            .create_routine_entries(routine.id, entries)
            .await?;
        Ok(routine)
    }
}

impl<R: TriviaRepository> TriviaService for Service<R> {
    /// Fetches raw text from the generative endpoint and reconstructs the
    /// questions. Transport and JSON syntax errors surface as [`ReadError`];
    /// a merely malformed shape degrades silently into fewer questions.
    async fn get_questions(&self, prompt: &str) -> Result<Vec<QuestionCard>, ReadError> {
        let text = log_on_error!(
            self.repository.generate_questions(prompt),
            ReadError,
            "generate",
            "questions"
        )?;
        let payload =
            serde_json::from_str::<Value>(&text).map_err(|err| ReadError::Other(err.into()))?;
        Ok(parse_questions(&payload))
    }
}
