use sea_orm_migration::prelude::*;

const GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Fantasy",
    "Horror",
    "Romance",
    "Sci-Fi",
    "Thriller",
];

const QUALITIES: &[&str] = &["SD", "HD", "Full HD", "4K"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut genres = Query::insert();
        genres.into_table(Genres::Table).columns([Genres::Name, Genres::SearchKey]);
        for name in GENRES {
            genres.values_panic([(*name).into(), name.to_lowercase().into()]);
        }
        manager.exec_stmt(genres).await?;

        let mut qualities = Query::insert();
        qualities.into_table(Qualities::Table).columns([Qualities::Name]);
        for name in QUALITIES {
            qualities.values_panic([(*name).into()]);
        }
        manager.exec_stmt(qualities).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Qualities::Table)
                    .and_where(Expr::col(Qualities::Name).is_in(QUALITIES.iter().copied()))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Genres::Table)
                    .and_where(Expr::col(Genres::Name).is_in(GENRES.iter().copied()))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Name,
    SearchKey,
}

#[derive(DeriveIden)]
enum Qualities {
    Table,
    Name,
}
