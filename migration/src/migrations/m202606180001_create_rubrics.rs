use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202606180001_create_rubrics"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("rubrics"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("label")).string().not_null())
                    .col(ColumnDef::new(Alias::new("weightage")).double().not_null())
                    .col(
                        ColumnDef::new(Alias::new("course"))
                            .enumeration(
                                Alias::new("rubric_course_type"),
                                vec![Alias::new("FYP1"), Alias::new("FYP2")],
                            )
                            .not_null(),
                    )
                    // Manually curated presentation/grading order, not alphabetical.
                    .col(ColumnDef::new(Alias::new("steps")).integer().not_null())
                    // JSON array of evaluator roles allowed to grade this rubric.
                    .col(ColumnDef::new(Alias::new("pic")).json().not_null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("rubrics")).to_owned())
            .await
    }
}
