use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, QueryFilter, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A student's project record, linked one-to-one to a `users` row.
///
/// The grading layer reads `course`, `mode`, `supervisor_id` and the
/// evaluator panel (via `student_evaluators`) to decide which rubrics apply
/// and who may grade them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Foreign key to `users` (role `student`).
    pub user_id: i64,
    /// Institutional student number.
    pub student_number: String,
    /// Course the student is currently enrolled in.
    pub course: Course,
    /// Project track; filters which criteria apply.
    pub mode: ProjectMode,
    /// Assigned supervisor (foreign key to `users`), if any.
    pub supervisor_id: Option<i64>,
    /// Project topic.
    pub topic: Option<String>,
    pub cgpa: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course enrollment. Backed by a `course_type` enum in the database.
#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize,
    Serialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "course_type")]
#[strum(ascii_case_insensitive)]
pub enum Course {
    #[sea_orm(string_value = "FYP1")]
    #[serde(rename = "FYP1")]
    #[strum(serialize = "FYP1")]
    Fyp1,

    #[sea_orm(string_value = "FYP2")]
    #[serde(rename = "FYP2")]
    #[strum(serialize = "FYP2")]
    Fyp2,

    #[sea_orm(string_value = "inactive")]
    #[serde(rename = "inactive")]
    #[strum(serialize = "inactive")]
    Inactive,
}

/// Project track. Backed by a `project_mode_type` enum in the database.
#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_mode_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ProjectMode {
    #[sea_orm(string_value = "development")]
    Development,

    #[sea_orm(string_value = "research")]
    Research,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The account backing this student.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    /// The supervisor account, if assigned.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SupervisorId",
        to = "super::user::Column::Id"
    )]
    Supervisor,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        student_number: &str,
        course: Course,
        mode: ProjectMode,
        supervisor_id: Option<i64>,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let student = ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            student_number: Set(student_number.to_owned()),
            course: Set(course),
            mode: Set(mode),
            supervisor_id: Set(supervisor_id),
            topic: Set(None),
            cgpa: Set(0.0),
            created_at: Set(now),
            updated_at: Set(now),
        };
        student.insert(db).await
    }

    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Adds a user to this student's evaluator panel. A no-op if already on it.
    pub async fn add_evaluator<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        evaluator_id: i64,
    ) -> Result<(), DbErr> {
        use super::student_evaluator;

        let exists = student_evaluator::Entity::find_by_id((student_id, evaluator_id))
            .one(db)
            .await?
            .is_some();
        if !exists {
            student_evaluator::ActiveModel {
                student_id: Set(student_id),
                evaluator_id: Set(evaluator_id),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    /// IDs of the users on this student's evaluator panel.
    pub async fn evaluator_ids<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
    ) -> Result<Vec<i64>, DbErr> {
        use super::student_evaluator::{Column as EvalCol, Entity as EvalEntity};

        EvalEntity::find()
            .filter(EvalCol::StudentId.eq(student_id))
            .select_only()
            .column(EvalCol::EvaluatorId)
            .into_tuple()
            .all(db)
            .await
    }

    /// Whether the given user sits on this student's evaluator panel.
    pub async fn has_evaluator<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        user_id: i64,
    ) -> Result<bool, DbErr> {
        use super::student_evaluator;

        Ok(student_evaluator::Entity::find_by_id((student_id, user_id))
            .one(db)
            .await?
            .is_some())
    }
}
