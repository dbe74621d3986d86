use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::student::ProjectMode;

/// A leaf scoring line within a rubric, bounded by a maximum raw mark.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "criteria")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning rubric (cascade delete).
    pub rubric_id: i64,
    pub label: String,
    /// Percentage weight within the owning rubric (0-100).
    pub weightage: f64,
    /// Upper bound for raw marks on this criterion.
    pub max_mark: f64,
    /// Which project track this criterion applies to.
    pub mode: CriteriaMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Applicability filter for a criterion.
/// Backed by a `criteria_mode_type` enum in the database.
#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "criteria_mode_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CriteriaMode {
    #[sea_orm(string_value = "both")]
    Both,

    #[sea_orm(string_value = "development")]
    Development,

    #[sea_orm(string_value = "research")]
    Research,
}

impl From<ProjectMode> for CriteriaMode {
    fn from(mode: ProjectMode) -> Self {
        match mode {
            ProjectMode::Development => CriteriaMode::Development,
            ProjectMode::Research => CriteriaMode::Research,
        }
    }
}

impl CriteriaMode {
    /// Whether a criterion with this mode applies to a student on the given
    /// project track.
    pub fn applies_to(&self, mode: &ProjectMode) -> bool {
        matches!(self, CriteriaMode::Both) || *self == CriteriaMode::from(mode.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rubric::Entity",
        from = "Column::RubricId",
        to = "super::rubric::Column::Id"
    )]
    Rubric,
}

impl Related<super::rubric::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rubric.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        rubric_id: i64,
        label: &str,
        weightage: f64,
        max_mark: f64,
        mode: CriteriaMode,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        ActiveModel {
            id: NotSet,
            rubric_id: Set(rubric_id),
            label: Set(label.to_owned()),
            weightage: Set(weightage),
            max_mark: Set(max_mark),
            mode: Set(mode),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }
}
