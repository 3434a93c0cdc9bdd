//! # 서비스 모듈
//!
//! DB나 HTTP와 무관한 도메인 로직입니다.
//! - `password`: 직원 비밀번호 해싱
//! - `work_sessions`: 작업자 이벤트를 작업 세션으로 재구성

pub mod password;
pub mod work_sessions;
