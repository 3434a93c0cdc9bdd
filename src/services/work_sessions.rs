//! # 작업 세션 재구성 서비스
//!
//! 작업자 이벤트 목록을 작업 세션(시작~완료 구간)으로 바꾸는 순수 함수들입니다.
//! DB나 전역 상태에 접근하지 않으므로 같은 입력에는 항상 같은 결과를 냅니다.
//!
//! ## 알고리즘 (작업자 한 명 기준)
//! 1. `StartWork`와 `CompleteWork`만 골라냅니다. 출근/퇴근(`Start`/`End`)은 무시합니다.
//! 2. **명시적 연결**: `relatedEventId`가 있는 완료 이벤트를 해당 시작 이벤트와 짝짓습니다.
//!    여러 작업을 동시에 진행하는 작업자도 이 단계에서 구분됩니다.
//! 3. **시간순 짝짓기(legacy)**: 남은 이벤트를 시각 오름차순으로 훑으며
//!    열린 시작 이벤트를 최대 하나만 유지합니다.
//!    - 열린 시작이 있는데 또 시작 → 이전 것은 `Abandoned`
//!    - 열린 시작이 있고 완료 → `Completed`
//!    - 열린 시작 없이 완료 → 시작 정보가 빈 고아 `Completed` (소요 시간 `"--"`)
//! 4. 끝까지 닫히지 않은 시작은 `InProgress`입니다.
//!
//! 타임스탬프나 이벤트 타입을 해석할 수 없는 행은 경고 로그만 남기고 건너뜁니다.

use crate::models::{DailyLog, EventType, WorkEvent, WorkSession, WorkerSessions};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashSet},
};

/// 시간대가 없는 타임스탬프에 시도하는 형식들
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// 세션 묶음을 만들 때 적용하는 요청 단위 조건
#[derive(Debug, Clone)]
pub struct SessionFilter {
    /// 기준 이벤트의 로컬 날짜가 이 날인 세션만 포함
    pub date: Option<NaiveDate>,
    /// 이 이름의 작업자만 포함
    pub worker: Option<String>,
    /// 부서 필터를 적용한 경우, 해당 부서 작업자 이름 목록
    pub department_workers: Option<HashSet<String>>,
    /// 로컬 날짜 계산에 쓰는 시간대
    pub offset: FixedOffset,
}

impl SessionFilter {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            date: None,
            worker: None,
            department_workers: None,
            offset,
        }
    }

    fn includes_worker(&self, worker_name: &str) -> bool {
        let by_name = self
            .worker
            .as_deref()
            .map_or(true, |wanted| wanted == worker_name);
        let by_department = self
            .department_workers
            .as_ref()
            .map_or(true, |names| names.contains(worker_name));
        by_name && by_department
    }

    fn includes_session(&self, session: &WorkSession) -> bool {
        match self.date {
            Some(day) => session.local_date() == Some(day),
            None => true,
        }
    }
}

/// 저장된 타임스탬프 문자열을 해석하여 `offset` 시간대로 변환합니다.
///
/// RFC 3339(`2026-10-19T09:00:00.000Z`)를 먼저 시도하고,
/// 시간대 표기가 없는 형식은 `offset` 기준의 로컬 시각으로 간주합니다.
pub fn parse_timestamp(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&offset));
    }

    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .and_then(|naive| naive.and_local_timezone(offset).single())
    })
}

/// `DailyLog` 행을 `WorkEvent`로 변환합니다. 해석할 수 없으면 경고 후 `None`.
pub fn to_work_event(log: &DailyLog, offset: FixedOffset) -> Option<WorkEvent> {
    let kind = match log.kind.parse::<EventType>() {
        Ok(kind) => kind,
        Err(e) => {
            tracing::warn!(event_id = %log.id, worker = %log.worker_name, "Skipping event: {}", e);
            return None;
        }
    };

    let Some(timestamp) = parse_timestamp(&log.timestamp, offset) else {
        tracing::warn!(
            event_id = %log.id,
            worker = %log.worker_name,
            timestamp = %log.timestamp,
            "Skipping event with unparseable timestamp"
        );
        return None;
    };

    Some(WorkEvent {
        id: log.id.clone(),
        worker_name: log.worker_name.clone(),
        kind,
        timestamp,
        photo_url: log.photo_url.clone(),
        related_event_id: log.related_event_id.clone(),
    })
}

/// 시간순 짝짓기의 정렬 기준.
/// 같은 시각이면 시작이 완료보다 먼저, 그다음은 ID 순서입니다.
fn timeline_order(a: &WorkEvent, b: &WorkEvent) -> Ordering {
    let rank = |event: &WorkEvent| match event.kind {
        EventType::StartWork => 0u8,
        EventType::CompleteWork => 1,
        EventType::Start | EventType::End => 2,
    };
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| rank(a).cmp(&rank(b)))
        .then_with(|| a.id.cmp(&b.id))
}

/// 작업자 한 명의 이벤트로 작업 세션을 만듭니다.
///
/// 결과는 필터링·정렬 전의 생성 순서입니다 (명시적 연결 → 시간순 짝짓기 → 진행 중).
pub fn reconstruct(events: &[WorkEvent]) -> Vec<WorkSession> {
    let mut starts: Vec<&WorkEvent> = Vec::new();
    let mut completes: Vec<&WorkEvent> = Vec::new();
    for event in events {
        match event.kind {
            EventType::StartWork => starts.push(event),
            EventType::CompleteWork => completes.push(event),
            EventType::Start | EventType::End => {}
        }
    }
    starts.sort_by(|a, b| timeline_order(a, b));
    completes.sort_by(|a, b| timeline_order(a, b));

    let mut sessions = Vec::new();
    let mut start_used = vec![false; starts.len()];
    let mut complete_used = vec![false; completes.len()];

    // 1차: relatedEventId로 명시적으로 연결된 쌍
    for (ci, complete) in completes.iter().enumerate() {
        let Some(link) = complete.related_event_id.as_deref() else {
            continue;
        };
        let matched = (0..starts.len()).find(|&si| {
            !start_used[si] && starts[si].id == link && starts[si].timestamp <= complete.timestamp
        });
        if let Some(si) = matched {
            start_used[si] = true;
            complete_used[ci] = true;
            sessions.push(WorkSession::completed(
                starts[si].clone(),
                (*complete).clone(),
            ));
        }
    }

    // 2차: 남은 이벤트를 시간순으로 훑으며 짝짓기
    let mut timeline: Vec<&WorkEvent> = starts
        .iter()
        .zip(&start_used)
        .chain(completes.iter().zip(&complete_used))
        .filter(|(_, used)| !**used)
        .map(|(event, _)| *event)
        .collect();
    timeline.sort_by(|a, b| timeline_order(a, b));

    let mut open: Option<&WorkEvent> = None;
    for event in timeline {
        match event.kind {
            EventType::StartWork => {
                if let Some(previous) = open.replace(event) {
                    sessions.push(WorkSession::abandoned(previous.clone()));
                }
            }
            EventType::CompleteWork => match open.take() {
                Some(start) => {
                    sessions.push(WorkSession::completed(start.clone(), event.clone()))
                }
                None => sessions.push(WorkSession::orphan(event.clone())),
            },
            EventType::Start | EventType::End => {}
        }
    }

    if let Some(start) = open {
        sessions.push(WorkSession::in_progress(start.clone()));
    }

    sessions
}

/// 최신 세션이 먼저 오도록 정렬합니다. 같은 시각이면 기준 이벤트 ID 역순.
fn sort_newest_first(sessions: &mut [WorkSession]) {
    sessions.sort_by(|a, b| match (a.anchor(), b.anchor()) {
        (Some(x), Some(y)) => y
            .timestamp
            .cmp(&x.timestamp)
            .then_with(|| y.id.cmp(&x.id)),
        (x, y) => y.is_some().cmp(&x.is_some()),
    });
}

/// 전체 이벤트 로그를 작업자별 세션 묶음으로 만듭니다.
///
/// - 작업자 묶음은 이름 오름차순 (`BTreeMap` 순서)
/// - 각 묶음의 세션은 최신순
/// - 필터 적용 후 세션이 하나도 없는 작업자는 결과에서 빠집니다
pub fn group_sessions(logs: &[DailyLog], filter: &SessionFilter) -> Vec<WorkerSessions> {
    let mut by_worker: BTreeMap<&str, Vec<WorkEvent>> = BTreeMap::new();
    for log in logs {
        if !filter.includes_worker(&log.worker_name) {
            continue;
        }
        if let Some(event) = to_work_event(log, filter.offset) {
            by_worker
                .entry(log.worker_name.as_str())
                .or_default()
                .push(event);
        }
    }

    by_worker
        .into_iter()
        .filter_map(|(worker_name, events)| {
            let mut sessions: Vec<WorkSession> = reconstruct(&events)
                .into_iter()
                .filter(|session| filter.includes_session(session))
                .collect();
            if sessions.is_empty() {
                return None;
            }
            sort_newest_first(&mut sessions);
            Some(WorkerSessions {
                worker_name: worker_name.to_string(),
                sessions,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn log(id: &str, worker: &str, kind: &str, timestamp: &str) -> DailyLog {
        DailyLog {
            id: id.to_string(),
            worker_name: worker.to_string(),
            kind: kind.to_string(),
            photo_url: format!("/photos/{id}.jpg"),
            timestamp: timestamp.to_string(),
            related_event_id: None,
        }
    }

    fn linked(mut entry: DailyLog, related: &str) -> DailyLog {
        entry.related_event_id = Some(related.to_string());
        entry
    }

    fn events(logs: &[DailyLog]) -> Vec<WorkEvent> {
        logs.iter()
            .filter_map(|l| to_work_event(l, kst()))
            .collect()
    }

    fn ids(session: &WorkSession) -> (Option<&str>, Option<&str>) {
        (
            session.start_event.as_ref().map(|e| e.id.as_str()),
            session.end_event.as_ref().map(|e| e.id.as_str()),
        )
    }

    #[test]
    fn pairs_start_and_complete_without_link() {
        let sessions = reconstruct(&events(&[
            log("s1", "Mina", "START_WORK", "2026-03-02T09:00:00+09:00"),
            log("c1", "Mina", "COMPLETE_WORK", "2026-03-02T09:30:00+09:00"),
        ]));

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].status, SessionStatus::Completed);
        assert_eq!(sessions[0].duration, "0h 30m");
        assert_eq!(sessions[0].duration_minutes, Some(30));
        assert_eq!(ids(&sessions[0]), (Some("s1"), Some("c1")));
    }

    #[test]
    fn explicit_links_pair_overlapping_tasks() {
        let sessions = reconstruct(&events(&[
            log("a", "Mina", "START_WORK", "2026-03-02T09:00:00+09:00"),
            log("b", "Mina", "START_WORK", "2026-03-02T09:10:00+09:00"),
            linked(
                log("cb", "Mina", "COMPLETE_WORK", "2026-03-02T09:40:00+09:00"),
                "b",
            ),
            linked(
                log("ca", "Mina", "COMPLETE_WORK", "2026-03-02T11:05:30+09:00"),
                "a",
            ),
        ]));

        assert_eq!(sessions.len(), 2);
        assert!(sessions
            .iter()
            .all(|s| s.status == SessionStatus::Completed));

        let a = sessions
            .iter()
            .find(|s| ids(s) == (Some("a"), Some("ca")))
            .unwrap();
        assert_eq!(a.duration_minutes, Some(125));
        assert_eq!(a.duration, "2h 5m");

        let b = sessions
            .iter()
            .find(|s| ids(s) == (Some("b"), Some("cb")))
            .unwrap();
        assert_eq!(b.duration_minutes, Some(30));
    }

    #[test]
    fn explicit_link_duration_matches_timestamp_difference() {
        let input = events(&[
            log("s", "Jun", "START_WORK", "2026-03-02T08:15:45Z"),
            linked(log("c", "Jun", "COMPLETE_WORK", "2026-03-02T10:02:10Z"), "s"),
        ]);
        let expected = (input[1].timestamp - input[0].timestamp).num_minutes();

        let sessions = reconstruct(&input);
        assert_eq!(sessions[0].duration_minutes, Some(expected));
        assert_eq!(expected, 106);
    }

    #[test]
    fn superseded_start_is_abandoned_and_last_is_in_progress() {
        let sessions = reconstruct(&events(&[
            log("s1", "Mina", "START_WORK", "2026-03-02T09:00:00+09:00"),
            log("s2", "Mina", "START_WORK", "2026-03-02T09:10:00+09:00"),
        ]));

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].status, SessionStatus::Abandoned);
        assert_eq!(ids(&sessions[0]), (Some("s1"), None));
        assert_eq!(sessions[0].duration, "--");
        assert_eq!(sessions[1].status, SessionStatus::InProgress);
        assert_eq!(ids(&sessions[1]), (Some("s2"), None));
    }

    #[test]
    fn complete_without_start_is_an_orphan() {
        let sessions = reconstruct(&events(&[log(
            "c1",
            "Mina",
            "COMPLETE_WORK",
            "2026-03-02T09:30:00+09:00",
        )]));

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].status, SessionStatus::Completed);
        assert!(sessions[0].start_event.is_none());
        assert_eq!(sessions[0].duration, "--");
        assert_eq!(sessions[0].duration_minutes, None);
    }

    #[test]
    fn shift_events_are_not_work_sessions() {
        let sessions = reconstruct(&events(&[
            log("in", "Mina", "START", "2026-03-02T08:00:00+09:00"),
            log("out", "Mina", "END", "2026-03-02T18:00:00+09:00"),
        ]));
        assert!(sessions.is_empty());
    }

    #[test]
    fn link_to_later_start_falls_back_to_chronological_pairing() {
        let sessions = reconstruct(&events(&[
            linked(log("c", "Mina", "COMPLETE_WORK", "2026-03-02T09:00:00+09:00"), "s"),
            log("s", "Mina", "START_WORK", "2026-03-02T10:00:00+09:00"),
        ]));

        assert_eq!(sessions.len(), 2);
        assert_eq!(ids(&sessions[0]), (None, Some("c")));
        assert_eq!(sessions[1].status, SessionStatus::InProgress);
    }

    #[test]
    fn second_link_to_same_start_is_paired_chronologically() {
        let sessions = reconstruct(&events(&[
            log("s", "Mina", "START_WORK", "2026-03-02T09:00:00+09:00"),
            linked(log("c1", "Mina", "COMPLETE_WORK", "2026-03-02T09:20:00+09:00"), "s"),
            linked(log("c2", "Mina", "COMPLETE_WORK", "2026-03-02T09:40:00+09:00"), "s"),
        ]));

        assert_eq!(sessions.len(), 2);
        assert_eq!(ids(&sessions[0]), (Some("s"), Some("c1")));
        assert_eq!(ids(&sessions[1]), (None, Some("c2")));
    }

    #[test]
    fn unparseable_timestamps_are_skipped() {
        let logs = vec![
            log("bad", "Mina", "START_WORK", "yesterday-ish"),
            log("s", "Mina", "START_WORK", "2026-03-02T09:00:00+09:00"),
            log("c", "Mina", "COMPLETE_WORK", "2026-03-02T09:45:00+09:00"),
            log("weird", "Mina", "LUNCH", "2026-03-02T12:00:00+09:00"),
        ];

        let groups = group_sessions(&logs, &SessionFilter::new(kst()));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sessions.len(), 1);
        assert_eq!(ids(&groups[0].sessions[0]), (Some("s"), Some("c")));
    }

    #[test]
    fn naive_timestamps_use_the_request_offset() {
        let parsed = parse_timestamp("2026-03-02 23:30:00", kst()).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-02T23:30:00+09:00");

        let converted = parse_timestamp("2026-03-02T15:30:00.000Z", kst()).unwrap();
        assert_eq!(converted.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());

        assert!(parse_timestamp("", kst()).is_none());
        assert!(parse_timestamp("not a date", kst()).is_none());
    }

    #[test]
    fn date_filter_uses_local_start_date_regardless_of_order() {
        let logs = vec![
            // UTC 날짜로는 3월 2일이지만 KST로는 3월 3일 새벽인 작업
            log("late-c", "Mina", "COMPLETE_WORK", "2026-03-02T16:00:00Z"),
            log("day2-s", "Mina", "START_WORK", "2026-03-03T10:00:00+09:00"),
            log("late-s", "Mina", "START_WORK", "2026-03-02T15:30:00Z"),
            log("day1-c", "Mina", "COMPLETE_WORK", "2026-03-02T10:00:00+09:00"),
            log("day1-s", "Mina", "START_WORK", "2026-03-02T09:00:00+09:00"),
        ];

        let mut filter = SessionFilter::new(kst());
        filter.date = NaiveDate::from_ymd_opt(2026, 3, 3);
        let groups = group_sessions(&logs, &filter);

        assert_eq!(groups.len(), 1);
        let sessions = &groups[0].sessions;
        assert_eq!(sessions.len(), 2);
        // 최신순
        assert_eq!(ids(&sessions[0]), (Some("day2-s"), None));
        assert_eq!(ids(&sessions[1]), (Some("late-s"), Some("late-c")));
        assert!(sessions
            .iter()
            .all(|s| s.local_date() == NaiveDate::from_ymd_opt(2026, 3, 3)));

        let mut reversed = logs.clone();
        reversed.reverse();
        assert_eq!(group_sessions(&reversed, &filter), groups);
    }

    #[test]
    fn groups_are_sorted_by_name_and_empty_workers_omitted() {
        let logs = vec![
            log("z1", "Yuna", "START_WORK", "2026-03-02T09:00:00+09:00"),
            log("a1", "Ara", "START_WORK", "2026-03-02T08:00:00+09:00"),
            log("a2", "Ara", "COMPLETE_WORK", "2026-03-02T08:50:00+09:00"),
            log("m1", "Minho", "START_WORK", "2026-03-01T09:00:00+09:00"),
        ];

        let mut filter = SessionFilter::new(kst());
        filter.date = NaiveDate::from_ymd_opt(2026, 3, 2);
        let names: Vec<String> = group_sessions(&logs, &filter)
            .into_iter()
            .map(|g| g.worker_name)
            .collect();

        assert_eq!(names, vec!["Ara".to_string(), "Yuna".to_string()]);
    }

    #[test]
    fn worker_and_department_filters_restrict_groups() {
        let logs = vec![
            log("a1", "Ara", "START_WORK", "2026-03-02T08:00:00+09:00"),
            log("m1", "Minho", "START_WORK", "2026-03-02T09:00:00+09:00"),
            log("y1", "Yuna", "START_WORK", "2026-03-02T09:00:00+09:00"),
        ];

        let mut by_worker = SessionFilter::new(kst());
        by_worker.worker = Some("Minho".to_string());
        let groups = group_sessions(&logs, &by_worker);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].worker_name, "Minho");

        let mut by_department = SessionFilter::new(kst());
        by_department.department_workers =
            Some(["Ara", "Yuna"].iter().map(|s| s.to_string()).collect());
        let names: Vec<_> = group_sessions(&logs, &by_department)
            .into_iter()
            .map(|g| g.worker_name)
            .collect();
        assert_eq!(names, vec!["Ara".to_string(), "Yuna".to_string()]);
    }

    #[test]
    fn reconstruction_is_idempotent() {
        let logs = vec![
            log("s1", "Mina", "START_WORK", "2026-03-02T09:00:00+09:00"),
            log("s2", "Mina", "START_WORK", "2026-03-02T09:10:00+09:00"),
            linked(log("c2", "Mina", "COMPLETE_WORK", "2026-03-02T09:50:00+09:00"), "s2"),
            log("c0", "Mina", "COMPLETE_WORK", "2026-03-02T10:30:00+09:00"),
            log("x1", "Jun", "COMPLETE_WORK", "2026-03-02T07:00:00+09:00"),
        ];
        let filter = SessionFilter::new(kst());

        let first = group_sessions(&logs, &filter);
        let second = group_sessions(&logs, &filter);
        assert_eq!(first, second);
    }
}
