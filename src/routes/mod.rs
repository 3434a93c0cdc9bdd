//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들입니다. 모든 경로는 `/api` 아래에 붙습니다.
//!
//! 각 하위 모듈:
//! - `departments`: 부서(공정 단계) 목록 관리
//! - `health`: 서버/DB 상태 확인
//! - `jobs`: 작업 CRUD와 공정 이동 이력
//! - `logs`: 작업자 이벤트 기록과 작업 세션 조회
//! - `seed`: 빈 DB에 초기 직원 데이터 입력
//! - `users`: 직원 관리

pub mod departments;
pub mod health;
pub mod jobs;
pub mod logs;
pub mod seed;
pub mod users;

pub use departments::*;
pub use health::*;
pub use jobs::*;
pub use logs::*;
pub use seed::*;
pub use users::*;

use chrono::FixedOffset;
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 요청마다 달라지는 값(날짜, 작업자 필터 등)은 여기에 두지 않고
/// 각 요청의 쿼리 파라미터로 받습니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// 요청에 시간대가 없을 때 쓰는 기본 UTC 오프셋
    pub local_offset: FixedOffset,
}

/// 핸들러 테스트용 상태
#[cfg(test)]
pub(crate) async fn test_state() -> AppState {
    AppState {
        pool: crate::db::test_pool().await,
        local_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
    }
}
