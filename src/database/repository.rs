use std::marker::PhantomData;

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::changeset::{Changeset, Field};
use crate::database::manager::DatabaseError;
use crate::database::models::Model;

/// Optional narrowing for list queries
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// CRUD access to one model's table
pub struct Repository<'a, T> {
    pool: &'a PgPool,
    _phantom: PhantomData<T>,
}

impl<'a, T: Model> Repository<'a, T> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    pub async fn select_all(&self, filter: &ListFilter) -> Result<Vec<T>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM {}", T::COLUMNS, T::TABLE));

        if let (Some(column), Some(term)) = (T::SEARCH_COLUMN, filter.search.as_deref()) {
            let term = term.trim();
            if !term.is_empty() {
                qb.push(format!(" WHERE strpos(lower({}), lower(", column))
                    .push_bind(term.to_string())
                    .push(")) > 0");
            }
        }

        qb.push(" ORDER BY id");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit.max(0));
        }
        if let Some(offset) = filter.offset {
            qb.push(" OFFSET ").push_bind(offset.max(0));
        }

        Ok(qb.build_query_as::<T>().fetch_all(self.pool).await?)
    }

    pub async fn select_one(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", T::COLUMNS, T::TABLE);
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    pub async fn select_404(&self, id: i64) -> Result<T, DatabaseError> {
        self.select_one(id).await?.ok_or_else(|| not_found::<T>(id))
    }

    pub async fn insert(&self, changes: &Changeset) -> Result<T, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO {}", T::TABLE));
        changes.push_insert(&mut qb);
        qb.push(" RETURNING ").push(T::COLUMNS);

        qb.build_query_as::<T>()
            .fetch_one(self.pool)
            .await
            .map_err(|e| reference_error::<T>(e, changes))
    }

    /// Applies `changes` to row `id`. An empty changeset just re-reads the row.
    pub async fn update(&self, id: i64, changes: &Changeset) -> Result<T, DatabaseError> {
        if changes.is_empty() {
            return self.select_404(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", T::TABLE));
        changes.push_assignments(&mut qb);
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(T::COLUMNS);

        qb.build_query_as::<T>()
            .fetch_optional(self.pool)
            .await
            .map_err(|e| reference_error::<T>(e, changes))?
            .ok_or_else(|| not_found::<T>(id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<T>(id));
        }
        Ok(())
    }
}

fn not_found<T: Model>(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("record {} not found in {}", id, T::TABLE))
}

/// Foreign key violations on a known relation become field-level errors
fn reference_error<T: Model>(err: sqlx::Error, changes: &Changeset) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            if let Some((field, column)) = db_err.constraint().and_then(T::relation) {
                let value = match changes.get(column) {
                    Some(Field::Key(id)) => id.to_string(),
                    _ => String::new(),
                };
                return DatabaseError::InvalidReference { field, value };
            }
        }
    }
    DatabaseError::Sqlx(err)
}
