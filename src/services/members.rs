use crate::{
    entities::{member, Member},
    errors::ServiceError,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Member account service
#[derive(Clone)]
pub struct MemberService {
    db: Arc<DatabaseConnection>,
}

impl MemberService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Register a new member. Email addresses are unique.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterMemberInput) -> Result<member::Model, ServiceError> {
        if input.password.is_empty() {
            return Err(ServiceError::InvalidInput(
                "password cannot be empty".to_string(),
            ));
        }

        let existing = Member::find()
            .filter(member::Column::Email.eq(&input.email))
            .one(&*self.db)
            .await?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Email {} is already registered",
                input.email
            )));
        }

        let password_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)
            .map_err(|e| ServiceError::InternalError(format!("Failed to hash password: {e}")))?;

        let member = member::ActiveModel {
            email: Set(input.email),
            name: Set(input.name),
            address: Set(input.address),
            password_hash: Set(password_hash),
            ..Default::default()
        };

        let member = member.insert(&*self.db).await?;

        info!("Registered member: {}", member.id);
        Ok(member)
    }

    /// Get a member by ID
    #[instrument(skip(self))]
    pub async fn get_member(&self, member_id: i64) -> Result<member::Model, ServiceError> {
        Member::find_by_id(member_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Member {} not found", member_id)))
    }

    /// Look up a member by email
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<member::Model>, ServiceError> {
        Member::find()
            .filter(member::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }
}

/// Input for registering a member
#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterMemberInput {
    pub email: String,
    pub name: String,
    pub address: String,
    pub password: String,
}
