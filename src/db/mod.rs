//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 라우트 핸들러(routes/)에서 호출하는 SQL 쿼리 함수들입니다.
//! 모든 함수는 `SqlitePool` 참조를 받아 비동기로 실행됩니다.
//!
//! 각 하위 모듈:
//! - `daily_logs`: 작업자 이벤트 로그 (추가/조회만 가능)
//! - `departments`: 부서(공정 단계) 목록
//! - `jobs`: 작업과 공정 이동 이력
//! - `users`: 직원 계정

pub mod daily_logs;
pub mod departments;
pub mod jobs;
pub mod users;

pub use daily_logs::*;
pub use departments::*;
pub use jobs::*;
pub use users::*;

use chrono::{SecondsFormat, Utc};

/// 서버가 채우는 타임스탬프 형식 (예: "2026-10-19T05:12:00.123Z")
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 서버가 생성하는 ID. UUIDv7이라 생성 순서대로 정렬됩니다.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// 테스트용 인메모리 DB. 마이그레이션까지 적용된 상태로 반환합니다.
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로
/// 연결을 하나로 고정하고 만료되지 않게 합니다.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}
