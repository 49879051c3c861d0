//! REST adapter for the hosted relational backend.
//!
//! Uses PostgREST conventions: `eq.` filters, `order=` parameters, embedded
//! selects for joined rows, and `Prefer: return=representation` on inserts
//! that need the generated row back.

use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use fitkit_domain as domain;

use crate::http::{HttpRequest, HttpResponse, ReqwestSendRequest, SendRequest};

pub struct Rest<S: SendRequest> {
    sender: S,
    base_url: String,
    api_key: String,
    access_token: String,
}

impl Rest<ReqwestSendRequest> {
    #[must_use]
    pub fn new(base_url: &str, api_key: &str, access_token: &str) -> Self {
        Self::with_sender(
            ReqwestSendRequest::default(),
            base_url,
            api_key,
            access_token,
        )
    }
}

impl<S: SendRequest> Rest<S> {
    #[must_use]
    pub fn with_sender(sender: S, base_url: &str, api_key: &str, access_token: &str) -> Self {
        Self {
            sender,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: access_token.to_string(),
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, domain::StorageError> {
        let request = request
            .header("apikey", &self.api_key)
            .header("Authorization", &format!("Bearer {}", self.access_token));
        let response = self
            .sender
            .send(request)
            .await
            .map_err(|_| domain::StorageError::NoConnection)?;
        if response.status == 401 {
            return Err(domain::StorageError::NoSession);
        }
        if !response.is_success() {
            return Err(domain::StorageError::Other(
                format!("{} {}", response.status, response.body).into(),
            ));
        }
        Ok(response)
    }
}

impl<S: SendRequest> domain::SessionRepository for Rest<S> {
    async fn current_user_id(&self) -> Result<domain::UserID, domain::ReadError> {
        let response = self
            .send(HttpRequest::get(&format!("{}/auth/v1/user", self.base_url)))
            .await?;
        let user: UserDto = decode(&response).map_err(domain::ReadError::Other)?;
        Ok(user.id.into())
    }
}

impl<S: SendRequest> domain::ExerciseRepository for Rest<S> {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        let response = self
            .send(HttpRequest::get(&format!(
                "{}/rest/v1/exercises?select=*&order=name.asc",
                self.base_url
            )))
            .await?;
        let exercises: Vec<ExerciseDto> = decode(&response).map_err(domain::ReadError::Other)?;
        exercises
            .into_iter()
            .map(|dto| dto.try_into().map_err(domain::ReadError::Other))
            .collect()
    }

    async fn read_liked_exercises(
        &self,
        user_id: domain::UserID,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        let response = self
            .send(HttpRequest::get(&format!(
                "{}/rest/v1/exercise_likes?select=exercises(*)&profile_id=eq.{}&order=created_at.desc",
                self.base_url, *user_id
            )))
            .await?;
        let likes: Vec<LikeDto> = decode(&response).map_err(domain::ReadError::Other)?;
        likes
            .into_iter()
            .filter_map(|like| like.exercises)
            .map(|dto| dto.try_into().map_err(domain::ReadError::Other))
            .collect()
    }
}

impl<S: SendRequest> domain::RoutineRepository for Rest<S> {
    async fn read_routines(
        &self,
        owner: domain::UserID,
    ) -> Result<Vec<domain::Routine>, domain::ReadError> {
        let response = self
            .send(HttpRequest::get(&format!(
                "{}/rest/v1/routines?select=*&profile_id=eq.{}&order=created_at.desc",
                self.base_url, *owner
            )))
            .await?;
        let routines: Vec<RoutineDto> = decode(&response).map_err(domain::ReadError::Other)?;
        routines
            .into_iter()
            .map(|dto| dto.try_into().map_err(domain::ReadError::Other))
            .collect()
    }

    async fn read_routine_with_entries(
        &self,
        id: domain::RoutineID,
    ) -> Result<domain::RoutineWithEntries, domain::ReadError> {
        let response = self
            .send(HttpRequest::get(&format!(
                "{}/rest/v1/routines?id=eq.{}&select=*,routine_exercises(*,exercises:exercise_id(*))",
                self.base_url, *id
            )))
            .await?;
        let mut details: Vec<RoutineDetailDto> =
            decode(&response).map_err(domain::ReadError::Other)?;
        if details.is_empty() {
            return Err(domain::ReadError::NotFound);
        }
        let detail = details.remove(0);

        let routine = detail
            .routine
            .try_into()
            .map_err(domain::ReadError::Other)?;
        let mut entries = detail
            .routine_exercises
            .into_iter()
            .map(|dto| dto.try_into().map_err(domain::ReadError::Other))
            .collect::<Result<Vec<domain::RoutineEntry>, _>>()?;
        entries.sort_by_key(|entry| entry.position);

        Ok(domain::RoutineWithEntries { routine, entries })
    }

    async fn create_routine(
        &self,
        owner: domain::UserID,
        name: domain::Name,
        description: Option<String>,
    ) -> Result<domain::Routine, domain::CreateError> {
        let response = self
            .send(
                HttpRequest::post(
                    &format!("{}/rest/v1/routines", self.base_url),
                    json!({
                        "profile_id": *owner,
                        "name": name.to_string(),
                        "description": description,
                    }),
                )
                .header("Prefer", "return=representation"),
            )
            .await?;
        let mut routines: Vec<RoutineDto> = decode(&response).map_err(domain::CreateError::Other)?;
        if routines.is_empty() {
            return Err(domain::CreateError::Other(
                "created routine missing from response".into(),
            ));
        }
        routines
            .remove(0)
            .try_into()
            .map_err(domain::CreateError::Other)
    }

    async fn create_routine_entries(
        &self,
        id: domain::RoutineID,
        entries: &[domain::RoutineEntry],
    ) -> Result<(), domain::CreateError> {
        let payload = entries
            .iter()
            .map(|entry| {
                json!({
                    "routine_id": *id,
                    "exercise_id": *entry.exercise.id,
                    "position": entry.position,
                    "sets": entry.sets,
                    "reps": entry.reps,
                    "weight": entry.weight,
                    "rest_seconds": entry.rest_seconds,
                    "notes": entry.notes,
                })
            })
            .collect::<Vec<_>>();
        self.send(
            HttpRequest::post(
                &format!("{}/rest/v1/routine_exercises", self.base_url),
                Value::Array(payload),
            )
            .header("Prefer", "return=minimal"),
        )
        .await?;
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    response: &HttpResponse,
) -> Result<T, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(&response.body)?)
}

#[derive(Deserialize)]
struct UserDto {
    id: Uuid,
}

#[derive(Deserialize)]
struct ExerciseDto {
    id: Uuid,
    name: String,
    muscle_group: String,
    difficulty: String,
}

impl TryFrom<ExerciseDto> for domain::Exercise {
    type Error = Box<dyn std::error::Error>;

    fn try_from(dto: ExerciseDto) -> Result<Self, Self::Error> {
        Ok(domain::Exercise {
            id: dto.id.into(),
            name: domain::Name::new(&dto.name)?,
            muscle_group: dto.muscle_group,
            difficulty: dto.difficulty.parse()?,
        })
    }
}

#[derive(Deserialize)]
struct LikeDto {
    exercises: Option<ExerciseDto>,
}

#[derive(Deserialize)]
struct RoutineDto {
    id: Uuid,
    profile_id: Uuid,
    name: String,
    description: Option<String>,
}

impl TryFrom<RoutineDto> for domain::Routine {
    type Error = Box<dyn std::error::Error>;

    fn try_from(dto: RoutineDto) -> Result<Self, Self::Error> {
        Ok(domain::Routine {
            id: dto.id.into(),
            owner: dto.profile_id.into(),
            name: domain::Name::new(&dto.name)?,
            description: dto.description,
        })
    }
}

#[derive(Deserialize)]
struct RoutineDetailDto {
    #[serde(flatten)]
    routine: RoutineDto,
    #[serde(default)]
    routine_exercises: Vec<RoutineEntryDto>,
}

#[derive(Deserialize)]
struct RoutineEntryDto {
    position: u32,
    sets: Option<u32>,
    reps: Option<u32>,
    weight: Option<f64>,
    rest_seconds: Option<u32>,
    notes: Option<String>,
    exercises: Option<ExerciseDto>,
}

impl TryFrom<RoutineEntryDto> for domain::RoutineEntry {
    type Error = Box<dyn std::error::Error>;

    fn try_from(dto: RoutineEntryDto) -> Result<Self, Self::Error> {
        let exercise = dto.exercises.ok_or("entry without embedded exercise")?;
        Ok(domain::RoutineEntry {
            exercise: exercise.try_into()?,
            position: dto.position,
            sets: dto.sets,
            reps: dto.reps,
            weight: dto.weight,
            rest_seconds: dto.rest_seconds,
            notes: dto.notes,
        })
    }
}
