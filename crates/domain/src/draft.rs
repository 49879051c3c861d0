use crate::{Exercise, ExerciseID, Name, RoutineEntry, ValidationError};

/// An in-memory routine under construction.
///
/// Entry positions form a dense 1..N sequence at all times. The sequence is
/// re-derived after every mutation, so callers must not assume that a
/// position assignment survives later mutations.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoutineDraft {
    name: String,
    description: String,
    entries: Vec<RoutineEntry>,
    submitting: bool,
}

/// A partial update of entry parameters.
///
/// The outer `Option` marks a field as part of the update, the inner value
/// is the new, possibly unset, parameter.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EntryUpdate {
    pub sets: Option<Option<u32>>,
    pub reps: Option<Option<u32>>,
    pub weight: Option<Option<f64>>,
    pub rest_seconds: Option<Option<u32>>,
    pub notes: Option<Option<String>>,
}

impl RoutineDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    #[must_use]
    pub fn entries(&self) -> &[RoutineEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Appends an entry for `exercise` with all parameters unset. Adding the
    /// same exercise twice yields two distinct entries.
    pub fn add_exercise(&mut self, exercise: Exercise) {
        let position = u32::try_from(self.entries.len() + 1).unwrap_or(u32::MAX);
        self.entries.push(RoutineEntry::new(exercise, position));
        self.normalize_positions();
    }

    /// Removes all entries for `exercise_id`, or only the one at `position`
    /// if given. Removing nothing is a no-op.
    pub fn remove_exercise(&mut self, exercise_id: ExerciseID, position: Option<u32>) {
        self.entries
            .retain(|entry| !entry.matches(exercise_id, position));
        self.normalize_positions();
    }

    /// Applies `update` to all entries for `exercise_id`, or only to the one
    /// at `position` if given. Fields absent from the update are unchanged.
    pub fn update_entries(
        &mut self,
        exercise_id: ExerciseID,
        update: &EntryUpdate,
        position: Option<u32>,
    ) {
        for entry in &mut self.entries {
            if !entry.matches(exercise_id, position) {
                continue;
            }
            if let Some(sets) = update.sets {
                entry.sets = sets;
            }
            if let Some(reps) = update.reps {
                entry.reps = reps;
            }
            if let Some(weight) = update.weight {
                entry.weight = weight;
            }
            if let Some(rest_seconds) = update.rest_seconds {
                entry.rest_seconds = rest_seconds;
            }
            if let Some(ref notes) = update.notes {
                entry.notes = notes.clone();
            }
        }
        self.normalize_positions();
    }

    /// Checks the submission preconditions and returns the validated name
    /// and the trimmed description. Does not change the draft.
    pub fn validate(&self) -> Result<(Name, Option<String>), ValidationError> {
        let name = Name::new(&self.name)?;
        if self.entries.is_empty() {
            return Err(ValidationError::NoEntries);
        }
        let description = self.description.trim();
        let description = (!description.is_empty()).then(|| description.to_string());
        Ok((name, description))
    }

    /// Marks the draft as having an in-flight submission. Used to reject a
    /// second submission attempt while one is outstanding.
    pub(crate) fn begin_submission(&mut self) {
        self.submitting = true;
    }

    /// Clears the in-flight flag after a failed submission, keeping the
    /// draft intact for a retry.
    pub(crate) fn abort_submission(&mut self) {
        self.submitting = false;
    }

    /// Returns the draft to its initial empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Single source of truth for entry ordering: stable sort by current
    /// position, then reassign 1..N.
    fn normalize_positions(&mut self) {
        self.entries.sort_by_key(|entry| entry.position);
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.position = u32::try_from(index + 1).unwrap_or(u32::MAX);
        }
    }
}
