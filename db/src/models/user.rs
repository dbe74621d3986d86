use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents an account in the `users` table.
///
/// Students, supervisors, examiners and course coordinators all share this
/// table; the `role` column is what the grading layer keys its permission
/// checks on.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User's unique email address.
    pub email: String,
    /// Unique login handle, derived from the email local part.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Securely hashed password string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Primary role of the account.
    pub role: Role,
    /// Whether the user may be placed on a student's evaluator panel.
    pub is_examiner: bool,
    /// Whether the user is currently accepting evaluation work.
    pub is_available: bool,
    /// Whether the user has admin privileges.
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Primary role of a user account.
/// Backed by a `user_role_type` enum in the database.
#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "student")]
    Student,

    #[sea_orm(string_value = "supervisor")]
    Supervisor,

    #[sea_orm(string_value = "examiner")]
    Examiner,

    #[sea_orm(string_value = "course_coordinator")]
    CourseCoordinator,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a new user with a freshly hashed password.
    ///
    /// The username is derived from the email local part, with a numeric
    /// suffix appended until it is unique. Students are never examiners;
    /// the eligibility flags are forced accordingly.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        email: &str,
        name: &str,
        role: Role,
        password: &str,
        admin: bool,
    ) -> Result<Self, DbErr> {
        let password_hash = hash_password(password)
            .map_err(|e| DbErr::Custom(format!("Password hashing failed: {e}")))?;

        let base_username = email.split('@').next().unwrap_or(email).to_string();
        let mut username = base_username.clone();
        let mut counter = 1;
        while Entity::find()
            .filter(Column::Username.eq(username.clone()))
            .one(db)
            .await?
            .is_some()
        {
            username = format!("{base_username}{counter}");
            counter += 1;
        }

        let examiner_eligible = matches!(role, Role::Supervisor | Role::Examiner);
        let now = Utc::now();
        let user = ActiveModel {
            id: NotSet,
            email: Set(email.to_owned()),
            username: Set(username),
            name: Set(name.to_owned()),
            password_hash: Set(password_hash),
            role: Set(role),
            is_examiner: Set(examiner_eligible),
            is_available: Set(examiner_eligible),
            admin: Set(admin),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(db).await
    }

    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find().filter(Column::Email.eq(email)).one(db).await
    }

    /// Looks up a user by email and checks the password against the stored
    /// argon2 hash. Returns `None` on unknown email or wrong password.
    pub async fn verify_credentials<C: ConnectionTrait>(
        db: &C,
        email: &str,
        password: &str,
    ) -> Result<Option<Self>, DbErr> {
        let Some(user) = Self::get_by_email(db, email).await? else {
            return Ok(None);
        };
        if verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
