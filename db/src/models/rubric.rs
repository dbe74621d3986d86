use chrono::{DateTime, Utc};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

use super::student::Course;

/// A named, weighted component of a course's grading scheme
/// (e.g. "Proposal", "Final Report").
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "rubrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub label: String,
    /// Percentage contribution to the course total (0-100).
    pub weightage: f64,
    pub course: Course,
    /// Manually curated ordering key controlling grading/presentation order.
    pub steps: i32,
    /// Evaluator roles allowed to grade this rubric.
    #[sea_orm(column_type = "Json")]
    pub pic: PicSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An evaluator role that can appear in a rubric's `pic` set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PicRole {
    Supervisor,
    Examiner,
    CourseCoordinator,
}

/// The set of roles in charge of a rubric, stored as a JSON array.
///
/// Deserialization rejects unknown role strings, so a malformed catalog row
/// surfaces as a decode error instead of silently granting or denying access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PicSet(pub Vec<PicRole>);

impl PicSet {
    /// Builds a set from the given roles, dropping duplicates while keeping
    /// first-occurrence order.
    pub fn new(roles: impl IntoIterator<Item = PicRole>) -> Self {
        let mut set = Vec::new();
        for role in roles {
            if !set.contains(&role) {
                set.push(role);
            }
        }
        Self(set)
    }

    pub fn contains(&self, role: PicRole) -> bool {
        self.0.contains(&role)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Criteria owned by this rubric (cascade-deleted with it).
    #[sea_orm(has_many = "super::criteria::Entity")]
    Criteria,
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criteria.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        label: &str,
        weightage: f64,
        course: Course,
        steps: i32,
        pic: PicSet,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        ActiveModel {
            id: NotSet,
            label: Set(label.to_owned()),
            weightage: Set(weightage),
            course: Set(course),
            steps: Set(steps),
            pic: Set(pic),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }
}
