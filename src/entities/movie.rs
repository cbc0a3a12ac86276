use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Case-folded title used by catalog search.
    pub search_key: String,
    pub year: i32,
    pub image_url: String,
    pub watch_url: String,
    pub country: String,
    pub duration: i32,
    pub age_limit: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub genre_id: i32,
    pub quality_id: i32,
    pub creator_id: String,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::genre::Entity",
        from = "Column::GenreId",
        to = "super::genre::Column::Id"
    )]
    Genre,
    #[sea_orm(
        belongs_to = "super::quality::Entity",
        from = "Column::QualityId",
        to = "super::quality::Column::Id"
    )]
    Quality,
    #[sea_orm(has_many = "super::movie_director::Entity")]
    MovieDirectors,
    #[sea_orm(has_many = "super::movie_actor::Entity")]
    MovieActors,
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genre.def()
    }
}

impl Related<super::quality::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quality.def()
    }
}

impl Related<super::movie_director::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieDirectors.def()
    }
}

impl Related<super::movie_actor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieActors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
