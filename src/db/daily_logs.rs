//! # 작업자 이벤트 로그 쿼리 모듈
//!
//! `daily_logs`는 추가 전용(append-only) 테이블입니다.
//! 수정/삭제 함수는 의도적으로 두지 않습니다.

use crate::error::AppError;
use crate::models::DailyLog;
use sqlx::SqlitePool;

const DAILY_LOG_COLUMNS: &str = "id, worker_name, type, photo_url, timestamp, related_event_id";

/// 이벤트를 시간순으로 조회합니다. `worker`가 있으면 해당 작업자의 이벤트만.
///
/// 정렬은 저장된 문자열 기준입니다. 세션 재구성은 시각을 해석해서
/// 다시 정렬하므로 이 순서에 의존하지 않습니다.
pub async fn list_daily_logs(
    pool: &SqlitePool,
    worker: Option<&str>,
) -> Result<Vec<DailyLog>, AppError> {
    let logs = sqlx::query_as::<_, DailyLog>(&format!(
        r#"
        SELECT {DAILY_LOG_COLUMNS}
        FROM daily_logs
        WHERE (?1 IS NULL OR worker_name = ?1)
        ORDER BY timestamp, id
        "#
    ))
    .bind(worker)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}

pub async fn get_daily_log(pool: &SqlitePool, id: &str) -> Result<Option<DailyLog>, AppError> {
    let log = sqlx::query_as::<_, DailyLog>(&format!(
        "SELECT {DAILY_LOG_COLUMNS} FROM daily_logs WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(log)
}

/// 검증이 끝난 이벤트 한 건을 추가합니다.
pub async fn insert_daily_log(pool: &SqlitePool, log: &DailyLog) -> Result<DailyLog, AppError> {
    sqlx::query(
        r#"
        INSERT INTO daily_logs (id, worker_name, type, photo_url, timestamp, related_event_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&log.id)
    .bind(&log.worker_name)
    .bind(&log.kind)
    .bind(&log.photo_url)
    .bind(&log.timestamp)
    .bind(&log.related_event_id)
    .execute(pool)
    .await?;

    get_daily_log(pool, &log.id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created log".to_string()))
}
