//! # 데이터 모델 모듈
//!
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `daily_log`: 작업자 이벤트(출퇴근, 작업 시작/완료)
//! - `department`: 부서(공정 단계) 목록
//! - `job`: 작업(job)과 공정 이동 이력
//! - `user`: 직원 계정
//! - `work_session`: 이벤트를 짝지어 만든 작업 세션 (저장되지 않는 파생 데이터)
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Job`처럼 짧게 접근합니다.

pub mod daily_log;
pub mod department;
pub mod job;
pub mod user;
pub mod work_session;

pub use daily_log::*;
pub use department::*;
pub use job::*;
pub use user::*;
pub use work_session::*;
