use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::database::models::{MediaAsset, NewMediaAsset, Room, RoomAttrs};
use crate::database::store::{ListingStore, RoomQuery, StoreError};
use crate::filter::{sql, SqlParam};

/// Column list shared across queries to avoid repetition.
const ROOM_COLUMNS: &str = "id, owner_id, name, address, description, bedrooms, bathrooms, \
    price, area, kind, is_available, created_at, updated_at, deleted_at";

const MEDIA_COLUMNS: &str =
    "id, room_id, collection, file_name, mime_type, size_bytes, position, created_at";

pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Translate a unique-index violation on the room name into the
    /// dedicated conflict error; everything else passes through.
    fn map_insert_error(err: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("23505") {
                return StoreError::Duplicate { field: "name" };
            }
        }
        StoreError::Sqlx(err)
    }
}

fn bind_params<'q>(
    mut query: QueryAs<'q, Postgres, Room, PgArguments>,
    params: &'q [SqlParam],
) -> QueryAs<'q, Postgres, Room, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Decimal(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v),
            SqlParam::Bool(v) => query.bind(*v),
        };
    }
    query
}

fn bind_scalar_params<'q>(
    mut query: sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments>,
    params: &'q [SqlParam],
) -> sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Decimal(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v),
            SqlParam::Bool(v) => query.bind(*v),
        };
    }
    query
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn insert(&self, owner_id: Option<Uuid>, attrs: RoomAttrs) -> Result<Room, StoreError> {
        let sql = format!(
            "INSERT INTO rooms
                (id, owner_id, name, address, description, bedrooms, bathrooms,
                 price, area, kind, is_available)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {ROOM_COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner_id)
            .bind(&attrs.name)
            .bind(&attrs.address)
            .bind(&attrs.description)
            .bind(attrs.bedrooms)
            .bind(attrs.bathrooms)
            .bind(attrs.price)
            .bind(attrs.area)
            .bind(&attrs.kind)
            .bind(attrs.is_available)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_insert_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Room>, StoreError> {
        let sql = format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, Room>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update(&self, id: Uuid, attrs: RoomAttrs) -> Result<Room, StoreError> {
        let sql = format!(
            "UPDATE rooms
             SET name = $2, address = $3, description = $4, bedrooms = $5, bathrooms = $6,
                 price = $7, area = $8, kind = $9, is_available = $10, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {ROOM_COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&sql)
            .bind(id)
            .bind(&attrs.name)
            .bind(&attrs.address)
            .bind(&attrs.description)
            .bind(attrs.bedrooms)
            .bind(attrs.bathrooms)
            .bind(attrs.price)
            .bind(attrs.area)
            .bind(&attrs.kind)
            .bind(attrs.is_available)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_insert_error)?
            .ok_or(StoreError::NotFound)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE rooms SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, query: &RoomQuery) -> Result<(Vec<Room>, i64), StoreError> {
        let predicate = sql::compile(&query.filter, query.audience);

        let count_sql = format!("SELECT COUNT(*) FROM rooms WHERE {}", predicate.clause);
        let total = bind_scalar_params(sqlx::query_scalar::<_, i64>(&count_sql), &predicate.params)
            .fetch_one(&self.pool)
            .await?;

        // Stable insertion order keeps pagination repeatable.
        let rows_sql = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE {} \
             ORDER BY created_at ASC, id ASC LIMIT {} OFFSET {}",
            predicate.clause,
            query.per_page,
            query.offset()
        );
        let rooms = bind_params(sqlx::query_as::<_, Room>(&rows_sql), &predicate.params)
            .fetch_all(&self.pool)
            .await?;

        Ok((rooms, total))
    }

    async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool, StoreError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM rooms
                WHERE name = $1 AND deleted_at IS NULL
                  AND ($2::uuid IS NULL OR id <> $2)
             )",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn attach_media(&self, asset: NewMediaAsset) -> Result<MediaAsset, StoreError> {
        let sql = format!(
            "INSERT INTO room_media
                (id, room_id, collection, file_name, mime_type, size_bytes, position)
             VALUES ($1, $2, $3, $4, $5, $6,
                 (SELECT COALESCE(MAX(position) + 1, 0) FROM room_media
                  WHERE room_id = $2 AND collection = $3))
             RETURNING {MEDIA_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, MediaAsset>(&sql)
            .bind(asset.id)
            .bind(asset.room_id)
            .bind(asset.collection.as_str())
            .bind(&asset.file_name)
            .bind(&asset.mime_type)
            .bind(asset.size_bytes)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn media_for_room(&self, room_id: Uuid) -> Result<Vec<MediaAsset>, StoreError> {
        let sql = format!(
            "SELECT {MEDIA_COLUMNS} FROM room_media
             WHERE room_id = $1 ORDER BY position ASC, created_at ASC"
        );
        Ok(sqlx::query_as::<_, MediaAsset>(&sql)
            .bind(room_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn media_for_rooms(&self, room_ids: &[Uuid]) -> Result<Vec<MediaAsset>, StoreError> {
        if room_ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT {MEDIA_COLUMNS} FROM room_media
             WHERE room_id = ANY($1) ORDER BY room_id, position ASC, created_at ASC"
        );
        Ok(sqlx::query_as::<_, MediaAsset>(&sql)
            .bind(room_ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_media(&self, room_id: Uuid, media_id: Uuid) -> Result<Option<MediaAsset>, StoreError> {
        let sql = format!(
            "SELECT {MEDIA_COLUMNS} FROM room_media WHERE id = $1 AND room_id = $2"
        );
        Ok(sqlx::query_as::<_, MediaAsset>(&sql)
            .bind(media_id)
            .bind(room_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_media(&self, media_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM room_media WHERE id = $1")
            .bind(media_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
