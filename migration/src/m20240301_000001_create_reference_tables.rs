use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(pk_auto(Genres::Id))
                    .col(string_uniq(Genres::Name))
                    .col(string(Genres::SearchKey))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Qualities::Table)
                    .if_not_exists()
                    .col(pk_auto(Qualities::Id))
                    .col(string_uniq(Qualities::Name))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Qualities::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
    SearchKey,
}

#[derive(DeriveIden)]
enum Qualities {
    Table,
    Id,
    Name,
}
