use sea_orm::entity::prelude::*;
use sea_orm::QueryFilter;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::student::Course;

/// A coordinator appointment scoping a user to one course (or both).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "course_coordinators")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub course: CoordinatorScope,
}

/// Which course(s) the appointment covers.
/// Backed by a `coordinator_scope_type` enum in the database.
#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize,
    Serialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "coordinator_scope_type")]
#[strum(ascii_case_insensitive)]
pub enum CoordinatorScope {
    #[sea_orm(string_value = "FYP1")]
    #[serde(rename = "FYP1")]
    #[strum(serialize = "FYP1")]
    Fyp1,

    #[sea_orm(string_value = "FYP2")]
    #[serde(rename = "FYP2")]
    #[strum(serialize = "FYP2")]
    Fyp2,

    #[sea_orm(string_value = "Both")]
    #[serde(rename = "Both")]
    #[strum(serialize = "Both")]
    Both,
}

impl CoordinatorScope {
    /// Whether this appointment covers students of the given course.
    /// Inactive students are covered by no scope.
    pub fn covers(&self, course: &Course) -> bool {
        match (self, course) {
            (CoordinatorScope::Both, Course::Fyp1 | Course::Fyp2) => true,
            (CoordinatorScope::Fyp1, Course::Fyp1) => true,
            (CoordinatorScope::Fyp2, Course::Fyp2) => true,
            _ => false,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
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
        course: CoordinatorScope,
    ) -> Result<Self, DbErr> {
        use sea_orm::{ActiveValue::NotSet, Set};

        ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            course: Set(course),
        }
        .insert(db)
        .await
    }

    /// Returns the coordinator appointment for a user, if one exists.
    pub async fn find_for_user<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await
    }
}
