//! # 부서 데이터베이스 쿼리 모듈
//!
//! 부서(공정 단계) 목록의 조회, 추가, 삭제를 담당합니다.
//! 목록은 항상 `position` 오름차순으로 반환되며, 이것이 공정 순서입니다.

use crate::error::AppError;
use crate::models::Department;
use sqlx::SqlitePool;

pub async fn list_departments(pool: &SqlitePool) -> Result<Vec<Department>, AppError> {
    let departments = sqlx::query_as::<_, Department>(
        "SELECT id, name, position FROM departments ORDER BY position, name",
    )
    .fetch_all(pool)
    .await?;

    Ok(departments)
}

pub async fn get_department(pool: &SqlitePool, id: &str) -> Result<Option<Department>, AppError> {
    let department = sqlx::query_as::<_, Department>(
        "SELECT id, name, position FROM departments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(department)
}

pub async fn find_department_by_name(
    pool: &SqlitePool,
    name: &str,
) -> Result<Option<Department>, AppError> {
    let department = sqlx::query_as::<_, Department>(
        "SELECT id, name, position FROM departments WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(department)
}

/// 새 부서를 추가합니다.
///
/// `position`이 `None`이면 현재 가장 큰 position 다음 자리에 붙입니다.
/// 빈 테이블에서는 `MAX()`가 NULL이므로 `COALESCE`로 0부터 시작합니다.
pub async fn create_department(
    pool: &SqlitePool,
    name: &str,
    position: Option<i64>,
) -> Result<Department, AppError> {
    let id = super::new_id();

    let position = match position {
        Some(p) => p,
        None => {
            sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(position) + 1, 0) FROM departments")
                .fetch_one(pool)
                .await?
        }
    };

    sqlx::query("INSERT INTO departments (id, name, position) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(position)
        .execute(pool)
        .await?;

    get_department(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created department".to_string()))
}

pub async fn delete_department(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
