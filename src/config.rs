//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수(또는 `.env` 파일)에서 서버 설정값을 읽어옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`: 서버 바인딩 주소 (기본값 `0.0.0.0`)
//! - `PORT`: 서버 포트 번호 (기본값 `3000`)
//! - `FRONTEND_DIST`: 빌드된 대시보드 정적 파일 경로 (기본값 `../frontend/dist`)
//! - `LOCAL_UTC_OFFSET_MINUTES`: 작업 세션의 "하루"를 자를 기준 시간대.
//!   없으면 서버의 현재 로컬 오프셋을 사용합니다.

use chrono::{FixedOffset, Local};
use std::env;

/// 애플리케이션 전체 설정
///
/// 서버 시작 시 한 번 읽은 후 `AppState`에 필요한 값만 복사해 공유합니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/jewel.db")
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_dist: String,
    /// 요청에 `utcOffsetMinutes`가 없을 때 사용하는 기본 시간대
    pub local_offset: FixedOffset,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`이 없으면 `VarError`를 반환합니다.
    /// 나머지 항목은 값이 없거나 잘못되어 있으면 기본값으로 대체됩니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "../frontend/dist".to_string()),
            local_offset: env::var("LOCAL_UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|raw| raw.parse::<i32>().ok())
                .and_then(offset_from_minutes)
                .unwrap_or_else(|| *Local::now().offset()),
        })
    }
}

/// 분 단위 UTC 오프셋을 `FixedOffset`으로 변환합니다.
///
/// 범위(±24시간)를 벗어나면 `None`을 반환합니다.
/// 예: `540` → UTC+09:00, `-300` → UTC-05:00
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}
