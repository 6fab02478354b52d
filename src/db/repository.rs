use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;

use crate::models::{NewTodo, Todo, TodoChanges};

pub async fn fetch_todos(db: &SqlitePool) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, title, description, completed, due_date, created_at
        FROM todos
        ORDER BY id ASC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_todo(db: &SqlitePool, id: i64) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, title, description, completed, due_date, created_at
        FROM todos
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_todo(db: &SqlitePool, new: NewTodo) -> Result<Todo, sqlx::Error> {
    let created_at = Utc::now().trunc_subsecs(6);

    let result = sqlx::query(
        r#"
        INSERT INTO todos
            (title, description, completed, due_date, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.completed)
    .bind(new.due_date)
    .bind(created_at)
    .execute(db)
    .await?;

    Ok(Todo {
        id: result.last_insert_rowid(),
        title: new.title,
        description: new.description,
        completed: new.completed,
        due_date: new.due_date,
        created_at,
    })
}

/// Applies `changes` to the stored record in one statement, so concurrent
/// writers only ever wait on SQLite's busy handler. Returns `None` when no
/// todo has that id.
pub async fn update_todo(
    db: &SqlitePool,
    id: i64,
    changes: TodoChanges,
) -> Result<Option<Todo>, sqlx::Error> {
    let (set_description, description) = match changes.description {
        Some(description) => (true, description),
        None => (false, None),
    };
    let (set_due_date, due_date) = match changes.due_date {
        Some(due_date) => (true, due_date),
        None => (false, None),
    };

    sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todos
        SET title = COALESCE(?1, title),
            description = CASE WHEN ?2 THEN ?3 ELSE description END,
            completed = COALESCE(?4, completed),
            due_date = CASE WHEN ?5 THEN ?6 ELSE due_date END
        WHERE id = ?7
        RETURNING id, title, description, completed, due_date, created_at
        "#,
    )
    .bind(changes.title)
    .bind(set_description)
    .bind(description)
    .bind(changes.completed)
    .bind(set_due_date)
    .bind(due_date)
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Returns `false` when there was nothing to delete.
pub async fn delete_todo(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
