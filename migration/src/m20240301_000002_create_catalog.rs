use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string(Movies::Title))
                    .col(string(Movies::SearchKey))
                    .col(integer(Movies::Year))
                    .col(string(Movies::ImageUrl))
                    .col(string(Movies::WatchUrl))
                    .col(string(Movies::Country))
                    .col(integer(Movies::Duration))
                    .col(integer(Movies::AgeLimit))
                    .col(text(Movies::Description))
                    .col(double(Movies::Rating).default(0.0))
                    .col(integer(Movies::GenreId))
                    .col(integer(Movies::QualityId))
                    .col(string(Movies::CreatorId))
                    .col(boolean(Movies::IsDeleted).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_genre")
                            .from(Movies::Table, Movies::GenreId)
                            .to(Genres::Table, Genres::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_quality")
                            .from(Movies::Table, Movies::QualityId)
                            .to(Qualities::Table, Qualities::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_creator_deleted")
                    .table(Movies::Table)
                    .col(Movies::CreatorId)
                    .col(Movies::IsDeleted)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Directors::Table)
                    .if_not_exists()
                    .col(pk_auto(Directors::Id))
                    .col(string(Directors::FirstName))
                    .col(string(Directors::LastName))
                    .col(string(Directors::FullName))
                    .to_owned(),
            )
            .await?;

        // Lookup-or-create relies on this index to reject concurrent duplicates.
        manager
            .create_index(
                Index::create()
                    .name("idx_directors_full_name_unique")
                    .table(Directors::Table)
                    .col(Directors::FullName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(pk_auto(Actors::Id))
                    .col(string(Actors::FirstName))
                    .col(string(Actors::LastName))
                    .col(string(Actors::FullName))
                    .col(string(Actors::SearchKey))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_actors_full_name_unique")
                    .table(Actors::Table)
                    .col(Actors::FullName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieDirectors::Table)
                    .if_not_exists()
                    .col(integer(MovieDirectors::MovieId))
                    .col(integer(MovieDirectors::DirectorId))
                    .col(integer(MovieDirectors::Position))
                    .primary_key(
                        Index::create()
                            .col(MovieDirectors::MovieId)
                            .col(MovieDirectors::DirectorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_directors_movie")
                            .from(MovieDirectors::Table, MovieDirectors::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_directors_director")
                            .from(MovieDirectors::Table, MovieDirectors::DirectorId)
                            .to(Directors::Table, Directors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieActors::Table)
                    .if_not_exists()
                    .col(integer(MovieActors::MovieId))
                    .col(integer(MovieActors::ActorId))
                    .col(integer(MovieActors::Position))
                    .primary_key(Index::create().col(MovieActors::MovieId).col(MovieActors::ActorId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_actors_movie")
                            .from(MovieActors::Table, MovieActors::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_actors_actor")
                            .from(MovieActors::Table, MovieActors::ActorId)
                            .to(Actors::Table, Actors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieActors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieDirectors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Directors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    SearchKey,
    Year,
    ImageUrl,
    WatchUrl,
    Country,
    Duration,
    AgeLimit,
    Description,
    Rating,
    GenreId,
    QualityId,
    CreatorId,
    IsDeleted,
}

#[derive(DeriveIden)]
enum Directors {
    Table,
    Id,
    FirstName,
    LastName,
    FullName,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    FirstName,
    LastName,
    FullName,
    SearchKey,
}

#[derive(DeriveIden)]
enum MovieDirectors {
    Table,
    MovieId,
    DirectorId,
    Position,
}

#[derive(DeriveIden)]
enum MovieActors {
    Table,
    MovieId,
    ActorId,
    Position,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Qualities {
    Table,
    Id,
}
