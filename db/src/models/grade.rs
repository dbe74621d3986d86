use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, QueryFilter, QueryOrder, Set};
use serde::Serialize;

/// An administrator-defined letter-grade band over the 0-100 total-mark
/// space. Bounds are inclusive on both ends.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub letter: String,
    pub gpa: f64,
    pub min_mark: f64,
    pub max_mark: f64,
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
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        letter: &str,
        gpa: f64,
        min_mark: f64,
        max_mark: f64,
    ) -> Result<Self, DbErr> {
        ActiveModel {
            id: NotSet,
            letter: Set(letter.to_owned()),
            gpa: Set(gpa),
            min_mark: Set(min_mark),
            max_mark: Set(max_mark),
        }
        .insert(db)
        .await
    }

    /// Returns the first band whose inclusive `[min_mark, max_mark]` range
    /// contains the total, scanning in ascending `min_mark` order.
    ///
    /// Bands are administrator data and expected not to overlap; overlap is
    /// a configuration error, not detected here. No matching band yields
    /// `None` (rendered as "N/A" downstream).
    pub async fn classify<C: ConnectionTrait>(
        db: &C,
        total_mark: f64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::MinMark.lte(total_mark))
            .filter(Column::MaxMark.gte(total_mark))
            .order_by_asc(Column::MinMark)
            .one(db)
            .await
    }
}
