use crate::error::AppError;
use crate::models::user::{NewUser, User};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, username, password_hash, name, role, assigned_stage, created_at";

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY name, username"
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn count_users(pool: &SqlitePool) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn create_user(
    pool: &SqlitePool,
    id: &str,
    username: &str,
    password_hash: &str,
    name: &str,
    role: &str,
    assigned_stage: Option<&str>,
) -> Result<User, AppError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, password_hash, name, role, assigned_stage)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(name)
    .bind(role)
    .bind(assigned_stage)
    .execute(pool)
    .await?;

    get_user(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

/// 초기 직원 목록을 하나의 트랜잭션으로 저장합니다.
///
/// ## 반환값
/// - `Ok(Some(n))`: `n`명 저장
/// - `Ok(None)`: 이미 직원이 있어 아무것도 하지 않음
///
/// 중간에 한 명이라도 실패하면 트랜잭션이 롤백되어 아무도 남지 않습니다.
pub async fn seed_users(pool: &SqlitePool, users: &[NewUser]) -> Result<Option<usize>, AppError> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        return Ok(None);
    }

    for user in users {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, name, role, assigned_stage)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.role)
        .bind(&user.assigned_stage)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(Some(users.len()))
}

/// 직원 정보를 교체합니다. `password_hash`가 `None`이면 기존 해시를 유지합니다.
pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    username: &str,
    password_hash: Option<&str>,
    name: &str,
    role: &str,
    assigned_stage: Option<&str>,
) -> Result<Option<User>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET username = ?,
            password_hash = COALESCE(?, password_hash),
            name = ?,
            role = ?,
            assigned_stage = ?
        WHERE id = ?
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(name)
    .bind(role)
    .bind(assigned_stage)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_user(pool, id).await
}

pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 특정 부서에 배정된 직원들의 이름. 작업 세션의 부서 필터에 사용합니다.
pub async fn list_worker_names_in_stage(
    pool: &SqlitePool,
    stage: &str,
) -> Result<Vec<String>, AppError> {
    let names: Vec<String> =
        sqlx::query_scalar("SELECT name FROM users WHERE assigned_stage = ? ORDER BY name")
            .bind(stage)
            .fetch_all(pool)
            .await?;

    Ok(names)
}
