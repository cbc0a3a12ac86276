use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
    sea_query::{Expr, LikeExpr, OnConflict, Query},
};
use tracing::{debug, info, warn};

use crate::{
    entities::{actor, director, genre, movie, movie_actor, movie_director, quality},
    error::{AppError, AppResult},
    mapper::{self, Projection},
    models::{GenreOption, MovieDetails, MovieForm, MovieQuery, MovieSummary, QualityOption},
    names::{self, PersonName},
    statistics::StatisticsService,
};

#[derive(Clone)]
pub struct MovieService {
    db: DatabaseConnection,
    statistics: StatisticsService,
}

impl MovieService {
    pub fn new(db: DatabaseConnection, statistics: StatisticsService) -> Self {
        Self { db, statistics }
    }

    /// Every visible movie, newest first.
    pub async fn index(&self) -> AppResult<MovieQuery> {
        let movies = movie::Entity::find()
            .filter(movie::Column::IsDeleted.eq(false))
            .order_by_desc(movie::Column::Id)
            .all(&self.db)
            .await?;

        let summaries = self.summaries(&movies).await?;
        let total = self.statistics.total().await?;

        Ok(MovieQuery {
            matching_movies: summaries.len() as u64,
            page_size: summaries.len() as u64,
            current_page: 1,
            movies: summaries,
            total_movies: total.total_movies,
            ..Default::default()
        })
    }

    /// One page of visible movies matching `search_term`, newest first.
    ///
    /// Filtering and ordering happen before the page is cut so deleted rows
    /// never take up a slot.
    pub async fn list_all(
        &self,
        current_page: u64,
        page_size: u64,
        search_term: &str,
    ) -> AppResult<MovieQuery> {
        let current_page = current_page.max(1);
        let page_size = page_size.max(1);

        let mut query = movie::Entity::find().filter(movie::Column::IsDeleted.eq(false));
        let term = search_term.trim();
        if !term.is_empty() {
            query = query.filter(search_condition(term));
        }

        let (offset, limit) = page_window(current_page, page_size);
        let matching_movies = query.clone().count(&self.db).await?;
        let movies = query
            .order_by_desc(movie::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        debug!(
            current_page,
            page_size,
            matching_movies,
            returned = movies.len(),
            "listed movies"
        );

        Ok(MovieQuery {
            movies: self.summaries(&movies).await?,
            total_movies: self.statistics.total().await?.total_movies,
            matching_movies,
            current_page,
            page_size,
            genres: self.genre_categories().await?,
            qualities: self.qualities().await?,
        })
    }

    pub async fn list_mine(&self, creator_id: &str) -> AppResult<MovieQuery> {
        let movies = movie::Entity::find()
            .filter(movie::Column::CreatorId.eq(creator_id))
            .filter(movie::Column::IsDeleted.eq(false))
            .order_by_desc(movie::Column::Id)
            .all(&self.db)
            .await?;

        let summaries = self.summaries(&movies).await?;
        let count = summaries.len() as u64;

        Ok(MovieQuery {
            movies: summaries,
            total_movies: count,
            matching_movies: count,
            current_page: 1,
            page_size: count,
            ..Default::default()
        })
    }

    pub async fn list_all_api(&self) -> AppResult<Vec<MovieSummary>> {
        let movies = movie::Entity::find()
            .filter(movie::Column::IsDeleted.eq(false))
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;

        self.summaries(&movies).await
    }

    pub async fn details(&self, id: i32) -> AppResult<Option<MovieDetails>> {
        let Some(movie) = self.find_visible(id).await? else {
            return Ok(None);
        };

        let projection = self.projection(std::slice::from_ref(&movie)).await?;
        Ok(Some(projection.details(&movie)))
    }

    /// Stores a new movie and links it to its directors and actors, creating
    /// people that are not known yet. Returns the new movie id.
    pub async fn create(
        &self,
        directors: &[String],
        creator_id: &str,
        form: &MovieForm,
        actors: &[String],
    ) -> AppResult<i32> {
        let directors = names::parse_all(directors)?;
        let actors = names::parse_all(actors)?;

        let txn = self.db.begin().await?;

        let movie = movie::ActiveModel {
            title: Set(form.title.clone()),
            search_key: Set(search_key(&form.title)),
            year: Set(form.year),
            image_url: Set(form.image_url.clone()),
            watch_url: Set(form.watch_url.clone()),
            country: Set(form.country.clone()),
            duration: Set(form.duration),
            age_limit: Set(form.age_limit),
            description: Set(form.description.clone()),
            rating: Set(0.0),
            genre_id: Set(form.genre_id),
            quality_id: Set(form.quality_id),
            creator_id: Set(creator_id.to_string()),
            is_deleted: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        link_credits(&txn, movie.id, &directors, &actors).await?;
        txn.commit().await?;

        info!(movie_id = movie.id, creator_id, "movie created");
        Ok(movie.id)
    }

    /// Updates a movie's editable fields and re-links its credits.
    ///
    /// Rating, quality and age limit keep their stored values. Shared
    /// director/actor rows are never renamed; the movie is linked to the
    /// people matching the submitted full names instead.
    pub async fn edit(
        &self,
        id: i32,
        directors: &[String],
        creator_id: &str,
        form: &MovieForm,
        actors: &[String],
    ) -> AppResult<bool> {
        let Some(existing) = self.find_visible(id).await? else {
            debug!(movie_id = id, "edit of unknown movie");
            return Ok(false);
        };
        ensure_owner(&existing, creator_id)?;

        let directors = names::parse_all(directors)?;
        let actors = names::parse_all(actors)?;

        let txn = self.db.begin().await?;

        let mut movie = existing.into_active_model();
        movie.title = Set(form.title.clone());
        movie.search_key = Set(search_key(&form.title));
        movie.year = Set(form.year);
        movie.image_url = Set(form.image_url.clone());
        movie.watch_url = Set(form.watch_url.clone());
        movie.country = Set(form.country.clone());
        movie.duration = Set(form.duration);
        movie.description = Set(form.description.clone());
        movie.genre_id = Set(form.genre_id);
        movie.update(&txn).await?;

        movie_director::Entity::delete_many()
            .filter(movie_director::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;
        movie_actor::Entity::delete_many()
            .filter(movie_actor::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;
        link_credits(&txn, id, &directors, &actors).await?;

        txn.commit().await?;

        info!(movie_id = id, creator_id, "movie edited");
        Ok(true)
    }

    /// Soft-deletes a movie owned by `creator_id`.
    pub async fn delete(&self, id: i32, creator_id: &str) -> AppResult<bool> {
        let Some(existing) = self.find_visible(id).await? else {
            return Ok(false);
        };
        ensure_owner(&existing, creator_id)?;

        let mut movie = existing.into_active_model();
        movie.is_deleted = Set(true);
        movie.update(&self.db).await?;

        info!(movie_id = id, creator_id, "movie deleted");
        Ok(true)
    }

    pub async fn genre_categories(&self) -> AppResult<Vec<GenreOption>> {
        let genres = genre::Entity::find().order_by_asc(genre::Column::Id).all(&self.db).await?;
        Ok(genres.into_iter().map(mapper::genre_option).collect())
    }

    pub async fn qualities(&self) -> AppResult<Vec<QualityOption>> {
        let qualities =
            quality::Entity::find().order_by_asc(quality::Column::Id).all(&self.db).await?;
        Ok(qualities.into_iter().map(mapper::quality_option).collect())
    }

    pub async fn genre_exists(&self, genre_id: i32) -> AppResult<bool> {
        Ok(genre::Entity::find_by_id(genre_id).count(&self.db).await? > 0)
    }

    pub async fn quality_exists(&self, quality_id: i32) -> AppResult<bool> {
        Ok(quality::Entity::find_by_id(quality_id).count(&self.db).await? > 0)
    }

    async fn find_visible(&self, id: i32) -> AppResult<Option<movie::Model>> {
        let movie = movie::Entity::find_by_id(id)
            .filter(movie::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;
        Ok(movie)
    }

    async fn summaries(&self, movies: &[movie::Model]) -> AppResult<Vec<MovieSummary>> {
        let projection = self.projection(movies).await?;
        Ok(movies.iter().map(|m| projection.summary(m)).collect())
    }

    async fn projection(&self, movies: &[movie::Model]) -> AppResult<Projection> {
        let mut projection = Projection::default();
        if movies.is_empty() {
            return Ok(projection);
        }
        let ids: Vec<i32> = movies.iter().map(|m| m.id).collect();

        let (genre_ids, quality_ids) = mapper::referenced_ids(movies);

        projection.genres = genre::Entity::find()
            .filter(genre::Column::Id.is_in(genre_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();
        projection.qualities = quality::Entity::find()
            .filter(quality::Column::Id.is_in(quality_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|q| (q.id, q.name))
            .collect();

        let directors = movie_director::Entity::find()
            .filter(movie_director::Column::MovieId.is_in(ids.clone()))
            .order_by_asc(movie_director::Column::Position)
            .find_also_related(director::Entity)
            .all(&self.db)
            .await?;
        for (link, person) in directors {
            if let Some(person) = person {
                projection.directors.entry(link.movie_id).or_default().push(person.full_name);
            }
        }

        let actors = movie_actor::Entity::find()
            .filter(movie_actor::Column::MovieId.is_in(ids))
            .order_by_asc(movie_actor::Column::Position)
            .find_also_related(actor::Entity)
            .all(&self.db)
            .await?;
        for (link, person) in actors {
            if let Some(person) = person {
                projection.actors.entry(link.movie_id).or_default().push(person.full_name);
            }
        }

        Ok(projection)
    }
}

/// SQLite binds OFFSET and LIMIT as signed 64-bit integers.
const MAX_SQL_BOUND: u64 = i64::MAX as u64;

/// Offset and limit for a 1-based page, saturating instead of overflowing so a
/// page far past the end simply selects nothing.
fn page_window(current_page: u64, page_size: u64) -> (u64, u64) {
    let offset = current_page
        .saturating_sub(1)
        .checked_mul(page_size)
        .map_or(MAX_SQL_BOUND, |o| o.min(MAX_SQL_BOUND));
    (offset, page_size.min(MAX_SQL_BOUND))
}

/// Case folding shared by stored search keys and search terms.
fn search_key(text: &str) -> String {
    text.to_lowercase()
}

fn ensure_owner(movie: &movie::Model, creator_id: &str) -> AppResult<()> {
    if movie.creator_id == creator_id {
        return Ok(());
    }
    warn!(movie_id = movie.id, creator_id, "rejected change by non-owner");
    Err(AppError::Forbidden)
}

/// Title, genre name or any credited actor contains `term`, ignoring case.
///
/// Matches against the stored `search_key` columns, which are folded in Rust
/// the same way as the term; SQLite's own `LOWER` only folds ASCII.
fn search_condition(term: &str) -> Condition {
    let pattern = like_pattern(term);

    let genres = Query::select()
        .column(genre::Column::Id)
        .from(genre::Entity)
        .and_where(Expr::col(genre::Column::SearchKey).like(pattern.clone()))
        .to_owned();

    let actors = Query::select()
        .column((movie_actor::Entity, movie_actor::Column::MovieId))
        .from(movie_actor::Entity)
        .inner_join(
            actor::Entity,
            Expr::col((actor::Entity, actor::Column::Id))
                .equals((movie_actor::Entity, movie_actor::Column::ActorId)),
        )
        .and_where(Expr::col((actor::Entity, actor::Column::SearchKey)).like(pattern.clone()))
        .to_owned();

    Condition::any()
        .add(Expr::col((movie::Entity, movie::Column::SearchKey)).like(pattern))
        .add(movie::Column::GenreId.in_subquery(genres))
        .add(movie::Column::Id.in_subquery(actors))
}

fn like_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in search_key(term).chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

async fn link_credits<C: ConnectionTrait>(
    conn: &C,
    movie_id: i32,
    directors: &[PersonName],
    actors: &[PersonName],
) -> AppResult<()> {
    let mut director_ids = Vec::with_capacity(directors.len());
    for name in directors {
        let id = resolve_director(conn, name).await?;
        if !director_ids.contains(&id) {
            director_ids.push(id);
        }
    }
    if !director_ids.is_empty() {
        movie_director::Entity::insert_many(director_ids.into_iter().zip(0..).map(
            |(director_id, position)| movie_director::ActiveModel {
                movie_id: Set(movie_id),
                director_id: Set(director_id),
                position: Set(position),
            },
        ))
        .exec_without_returning(conn)
        .await?;
    }

    let mut actor_ids = Vec::with_capacity(actors.len());
    for name in actors {
        let id = resolve_actor(conn, name).await?;
        if !actor_ids.contains(&id) {
            actor_ids.push(id);
        }
    }
    if !actor_ids.is_empty() {
        movie_actor::Entity::insert_many(actor_ids.into_iter().zip(0..).map(
            |(actor_id, position)| movie_actor::ActiveModel {
                movie_id: Set(movie_id),
                actor_id: Set(actor_id),
                position: Set(position),
            },
        ))
        .exec_without_returning(conn)
        .await?;
    }

    Ok(())
}

/// Lookup-or-create keyed on the unique full name. The insert is a no-op when
/// another writer got there first, so the follow-up select always finds a row.
async fn resolve_director<C: ConnectionTrait>(conn: &C, name: &PersonName) -> AppResult<i32> {
    let row = director::ActiveModel {
        first_name: Set(name.first.clone()),
        last_name: Set(name.last.clone()),
        full_name: Set(name.full.clone()),
        ..Default::default()
    };
    director::Entity::insert(row)
        .on_conflict(OnConflict::column(director::Column::FullName).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await?;

    director::Entity::find()
        .filter(director::Column::FullName.eq(name.full.as_str()))
        .one(conn)
        .await?
        .map(|d| d.id)
        .ok_or_else(|| DbErr::RecordNotFound(format!("director '{}'", name.full)).into())
}

async fn resolve_actor<C: ConnectionTrait>(conn: &C, name: &PersonName) -> AppResult<i32> {
    let row = actor::ActiveModel {
        first_name: Set(name.first.clone()),
        last_name: Set(name.last.clone()),
        full_name: Set(name.full.clone()),
        search_key: Set(search_key(&name.full)),
        ..Default::default()
    };
    actor::Entity::insert(row)
        .on_conflict(OnConflict::column(actor::Column::FullName).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await?;

    actor::Entity::find()
        .filter(actor::Column::FullName.eq(name.full.as_str()))
        .one(conn)
        .await?
        .map(|a| a.id)
        .ok_or_else(|| DbErr::RecordNotFound(format!("actor '{}'", name.full)).into())
}
