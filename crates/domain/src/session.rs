use derive_more::Deref;
use uuid::Uuid;

use crate::ReadError;

#[allow(async_fn_in_trait)]
pub trait SessionService {
    async fn get_current_user_id(&self) -> Result<UserID, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait SessionRepository {
    async fn current_user_id(&self) -> Result<UserID, ReadError>;
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(Uuid);

impl UserID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for UserID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for UserID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}
