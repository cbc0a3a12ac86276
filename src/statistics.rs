use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::{entities::movie, error::AppResult, models::TotalStatistics};

/// Aggregate counts over the catalog.
#[derive(Clone)]
pub struct StatisticsService {
    db: DatabaseConnection,
}

impl StatisticsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn total(&self) -> AppResult<TotalStatistics> {
        let total_movies =
            movie::Entity::find().filter(movie::Column::IsDeleted.eq(false)).count(&self.db).await?;

        Ok(TotalStatistics { total_movies })
    }
}
