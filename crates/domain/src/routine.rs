use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, Exercise, ExerciseID, Name, ReadError, RoutineDraft, SubmitError, UserID,
};

#[allow(async_fn_in_trait)]
pub trait RoutineService {
    async fn get_routines(&self, owner: UserID) -> Result<Vec<Routine>, ReadError>;
    async fn get_routine_with_entries(&self, id: RoutineID)
    -> Result<RoutineWithEntries, ReadError>;
    async fn create_routine(&self, draft: &mut RoutineDraft) -> Result<Routine, SubmitError>;
}

#[allow(async_fn_in_trait)]
pub trait RoutineRepository {
    async fn read_routines(&self, owner: UserID) -> Result<Vec<Routine>, ReadError>;
    async fn read_routine_with_entries(
        &self,
        id: RoutineID,
    ) -> Result<RoutineWithEntries, ReadError>;
    async fn create_routine(
        &self,
        owner: UserID,
        name: Name,
        description: Option<String>,
    ) -> Result<Routine, CreateError>;
    async fn create_routine_entries(
        &self,
        id: RoutineID,
        entries: &[RoutineEntry],
    ) -> Result<(), CreateError>;
}

/// A persisted routine header. Entries are stored separately and read back
/// via [`RoutineWithEntries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    pub id: RoutineID,
    pub owner: UserID,
    pub name: Name,
    pub description: Option<String>,
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoutineID(Uuid);

impl RoutineID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for RoutineID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for RoutineID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// One exercise occurrence within a routine, with its own parameters.
///
/// The same exercise may appear at multiple positions, so an entry is
/// identified by the pair (`exercise.id`, `position`).
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineEntry {
    pub exercise: Exercise,
    pub position: u32,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub rest_seconds: Option<u32>,
    pub notes: Option<String>,
}

impl RoutineEntry {
    #[must_use]
    pub fn new(exercise: Exercise, position: u32) -> Self {
        Self {
            exercise,
            position,
            sets: None,
            reps: None,
            weight: None,
            rest_seconds: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn matches(&self, exercise_id: ExerciseID, position: Option<u32>) -> bool {
        self.exercise.id == exercise_id && position.is_none_or(|p| self.position == p)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutineWithEntries {
    pub routine: Routine,
    pub entries: Vec<RoutineEntry>,
}
