/// Generic record mapper
///
/// Users, groups and tasks are read, listed and deleted with structurally
/// identical statements. A model describes its table once through the
/// [`Record`] trait and the helpers below build the SQL and scan the rows.
///
/// Table and column names come from `&'static str` constants on the model,
/// never from user input; values are always bound as parameters.
///
/// # Example
///
/// ```no_run
/// use stormtask_shared::db::mapper;
/// use stormtask_shared::models::group::Group;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let group: Option<Group> = mapper::fetch_by(&pool, "id", 42_i64).await?;
/// let groups: Vec<Group> = mapper::fetch_all_by(&pool, "owner_id", 7_i64).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{postgres::PgRow, Encode, FromRow, PgPool, Postgres, Type};

/// A row type backed by a single table
pub trait Record: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Table name
    const TABLE: &'static str;

    /// Comma-separated column list, in the order used by `RETURNING` and `SELECT`
    const COLUMNS: &'static str;

    /// Column used to order listings
    const ORDER_BY: &'static str = "id";
}

/// Builds `SELECT <columns> FROM <table> WHERE <filter>`
pub fn select_sql<R: Record>(filter: &str) -> String {
    format!("SELECT {} FROM {} WHERE {}", R::COLUMNS, R::TABLE, filter)
}

/// Builds the listing variant of [`select_sql`], ordered by the record's key
pub fn select_ordered_sql<R: Record>(filter: &str) -> String {
    format!("{} ORDER BY {}", select_sql::<R>(filter), R::ORDER_BY)
}

/// Builds `DELETE FROM <table> WHERE <column> = $1`
pub fn delete_sql<R: Record>(column: &str) -> String {
    format!("DELETE FROM {} WHERE {} = $1", R::TABLE, column)
}

/// Builds `... RETURNING <columns>` for inserts and updates
pub fn returning_sql<R: Record>(statement: &str) -> String {
    format!("{} RETURNING {}", statement, R::COLUMNS)
}

/// Fetches the single row where `column = value`
///
/// Returns `None` when no row matches.
pub async fn fetch_by<R, V>(pool: &PgPool, column: &str, value: V) -> Result<Option<R>, sqlx::Error>
where
    R: Record,
    V: for<'q> Encode<'q, Postgres> + Type<Postgres> + Send,
{
    let sql = select_sql::<R>(&format!("{} = $1", column));
    sqlx::query_as::<_, R>(&sql)
        .bind(value)
        .fetch_optional(pool)
        .await
}

/// Fetches every row where `column = value`, ordered by key
///
/// Returns an empty vector when no row matches.
pub async fn fetch_all_by<R, V>(pool: &PgPool, column: &str, value: V) -> Result<Vec<R>, sqlx::Error>
where
    R: Record,
    V: for<'q> Encode<'q, Postgres> + Type<Postgres> + Send,
{
    let sql = select_ordered_sql::<R>(&format!("{} = $1", column));
    sqlx::query_as::<_, R>(&sql)
        .bind(value)
        .fetch_all(pool)
        .await
}

/// Deletes every row where `column = value` and returns the number removed
pub async fn delete_by<R, V>(pool: &PgPool, column: &str, value: V) -> Result<u64, sqlx::Error>
where
    R: Record,
    V: for<'q> Encode<'q, Postgres> + Type<Postgres> + Send,
{
    let sql = delete_sql::<R>(column);
    let result = sqlx::query(&sql).bind(value).execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{group::Group, task::Task, user::User};

    #[test]
    fn test_select_sql_uses_record_columns() {
        assert_eq!(
            select_sql::<User>("email = $1"),
            "SELECT id, email, name, password_hash, is_admin FROM users WHERE email = $1"
        );
    }

    #[test]
    fn test_select_ordered_sql() {
        assert_eq!(
            select_ordered_sql::<Group>("owner_id = $1"),
            "SELECT id, owner_id, name FROM task_groups WHERE owner_id = $1 ORDER BY id"
        );
    }

    #[test]
    fn test_delete_sql() {
        assert_eq!(delete_sql::<Task>("group_id"), "DELETE FROM tasks WHERE group_id = $1");
    }

    #[test]
    fn test_returning_sql() {
        let sql = returning_sql::<Group>("UPDATE task_groups SET name = $2 WHERE id = $1");
        assert_eq!(
            sql,
            "UPDATE task_groups SET name = $2 WHERE id = $1 RETURNING id, owner_id, name"
        );
    }
}
