mod common;

use chrono::{TimeZone, Utc};

use todo_api::db::repository;
use todo_api::models::{NewTodo, TodoChanges};

fn new_todo(title: &str) -> NewTodo {
    NewTodo {
        title: title.to_string(),
        description: None,
        completed: false,
        due_date: None,
    }
}

#[tokio::test]
async fn insert_then_fetch_round_trips() {
    let pool = common::test_pool().await;

    let due = Utc.with_ymd_and_hms(2024, 12, 24, 18, 0, 0).unwrap();
    let inserted = repository::insert_todo(
        &pool,
        NewTodo {
            due_date: Some(due),
            description: Some("for the party".to_string()),
            ..new_todo("Buy candles")
        },
    )
    .await
    .expect("insert failed");

    let fetched = repository::fetch_todo(&pool, inserted.id)
        .await
        .expect("fetch failed")
        .expect("todo missing");
    assert_eq!(fetched, inserted);
    assert_eq!(fetched.due_date, Some(due));
}

#[tokio::test]
async fn created_at_follows_insertion_order() {
    let pool = common::test_pool().await;

    let first = repository::insert_todo(&pool, new_todo("first")).await.unwrap();
    let second = repository::insert_todo(&pool, new_todo("second")).await.unwrap();

    assert!(second.id > first.id);
    assert!(second.created_at >= first.created_at);
}

#[tokio::test]
async fn completed_is_stored_as_a_real_bool() {
    let pool = common::test_pool().await;
    let todo = repository::insert_todo(&pool, new_todo("flag")).await.unwrap();

    let changes = TodoChanges {
        completed: Some(true),
        ..Default::default()
    };
    repository::update_todo(&pool, todo.id, changes).await.unwrap();

    let todos = repository::fetch_todos(&pool).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert!(todos[0].completed);
}

#[tokio::test]
async fn update_missing_returns_none() {
    let pool = common::test_pool().await;
    let result = repository::update_todo(&pool, 42, TodoChanges::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_reports_whether_a_row_went_away() {
    let pool = common::test_pool().await;
    let todo = repository::insert_todo(&pool, new_todo("gone soon")).await.unwrap();

    assert!(repository::delete_todo(&pool, todo.id).await.unwrap());
    assert!(!repository::delete_todo(&pool, todo.id).await.unwrap());
    assert!(repository::fetch_todo(&pool, todo.id).await.unwrap().is_none());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let pool = common::test_pool().await;
    repository::insert_todo(&pool, new_todo("kept")).await.unwrap();

    todo_api::db::run_migrations(&pool)
        .await
        .expect("second migration run failed");

    assert_eq!(repository::fetch_todos(&pool).await.unwrap().len(), 1);
}
