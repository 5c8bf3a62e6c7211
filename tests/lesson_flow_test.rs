use std::path::PathBuf;
use std::time::Duration;
use chrono::NaiveDate;
use tokio_stream::StreamExt;
use planmaker_lib::commands;
use planmaker_lib::config::settings::AppConfig;
use planmaker_lib::db::generate_id;
use planmaker_lib::lessons::LessonDraft;
use planmaker_lib::state::app::AppState;
use planmaker_lib::students::{Goal, GoalType, SchoolType};
use planmaker_lib::suggestion::feed::SuggestionState;
use planmaker_lib::suggestion::Confidence;
use planmaker_lib::units::UnitStatus;
use planmaker_lib::validators::StudentForm;

struct TestDir(PathBuf);

impl TestDir {
    fn new(name: &str) -> Self {
        TestDir(std::env::temp_dir().join(format!("planmaker-{}-{}", name, generate_id())))
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn state_in(dir: &TestDir) -> AppState {
    AppState::new(AppConfig {
        data_dir: Some(dir.0.clone()),
        record_page_size: 2,
        ..AppConfig::default()
    })
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
}

fn form() -> StudentForm {
    StudentForm {
        student_id: "S001".into(),
        name: "鈴木".into(),
        grade: "J1".into(),
        school_type: SchoolType::JuniorHigh,
        subjects: vec!["数学".into()],
        goals: vec![Goal {
            goal_type: GoalType::RegularTest,
            target_date: day(30),
            target_score: Some(80),
            description: "中間テスト80点".into(),
        }],
    }
}

#[tokio::test]
async fn full_lesson_cycle_raises_confidence() {
    let dir = TestDir::new("cycle");
    let state = state_in(&dir);
    let student = commands::register_student(&state, form()).await.unwrap();

    let u1 = commands::add_unit(&state, &student.id, "数学", "正負の数").await.unwrap();
    let u2 = commands::add_unit(&state, &student.id, "数学", "文字と式").await.unwrap();
    let u3 = commands::add_unit(&state, &student.id, "数学", "方程式").await.unwrap();
    assert_eq!((u1.order, u2.order, u3.order), (1, 2, 3));

    // cold start: first untouched unit
    let prepared = commands::prepare_lesson_draft(&state, &student.id, day(1)).await.unwrap();
    assert_eq!(prepared.suggestion.confidence, Confidence::Low);
    assert_eq!(prepared.draft.unit_ids, vec![u1.id.clone()]);
    assert_eq!(prepared.draft.next_class_plan, u2.id);

    let mut draft = prepared.draft;
    draft.understanding = 4;
    draft.set_status(&u1.id, UnitStatus::Completed);
    commands::save_class_record(&state, &student.id, &draft).await.unwrap();

    let units = commands::list_units(&state, &student.id).await.unwrap();
    assert_eq!(units[0].status, UnitStatus::Completed);
    assert!(units[0].completion_date.is_some());

    // the saved plan now drives a high confidence suggestion
    let s = commands::get_suggestion(&state, &student.id).await.unwrap();
    assert_eq!(s.confidence, Confidence::High);
    assert_eq!(s.suggested_unit_ids, vec![u2.id.clone()]);
    assert_eq!(s.suggested_next_unit_id, Some(u3.id.clone()));

    let summary = commands::student_summary(&state, &student.id).await.unwrap();
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.completion_rate, 33);
    assert_eq!(summary.latest_understanding, Some(4));

    assert_eq!(state.metrics.snapshot().records_saved, 1);
}

#[tokio::test]
async fn invalid_draft_is_rejected_without_writes() {
    let dir = TestDir::new("invalid");
    let state = state_in(&dir);
    let student = commands::register_student(&state, form()).await.unwrap();
    commands::add_unit(&state, &student.id, "数学", "正負の数").await.unwrap();

    let prepared = commands::prepare_lesson_draft(&state, &student.id, day(2)).await.unwrap();
    // understanding left unset
    let err = commands::save_class_record(&state, &student.id, &prepared.draft)
        .await
        .unwrap_err();
    assert_eq!(err.stage, "validation");

    let history = commands::class_record_history(&state, &student.id, true).await.unwrap();
    assert!(history.records.is_empty());
}

#[tokio::test]
async fn history_is_paged_newest_first() {
    let dir = TestDir::new("history");
    let state = state_in(&dir);
    let student = commands::register_student(&state, form()).await.unwrap();
    let unit = commands::add_unit(&state, &student.id, "数学", "正負の数").await.unwrap();

    for d in [3, 1, 2] {
        let mut draft = commands::prepare_lesson_draft(&state, &student.id, day(d))
            .await
            .unwrap()
            .draft;
        draft.understanding = 3;
        draft.set_status(&unit.id, UnitStatus::Practicing);
        commands::save_class_record(&state, &student.id, &draft).await.unwrap();
    }

    let page = commands::class_record_history(&state, &student.id, false).await.unwrap();
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.hidden, 1);
    assert_eq!(page.records[0].date, day(3));
    assert_eq!(page.records[1].date, day(2));

    let all = commands::class_record_history(&state, &student.id, true).await.unwrap();
    assert_eq!(all.records.len(), 3);
    assert_eq!(all.hidden, 0);
}

#[tokio::test]
async fn feed_publishes_after_writes() {
    let dir = TestDir::new("feed");
    let state = state_in(&dir);
    let student = commands::register_student(&state, form()).await.unwrap();

    let mut stream = state.feed.subscribe(&student.id);
    assert_eq!(stream.next().await, Some(SuggestionState::Loading));

    let unit = commands::add_unit(&state, &student.id, "数学", "正負の数").await.unwrap();
    match stream.next().await {
        Some(SuggestionState::Ready(s)) => {
            assert_eq!(s.confidence, Confidence::Low);
            assert_eq!(s.suggested_unit_ids, vec![unit.id.clone()]);
        }
        other => panic!("unexpected feed state: {:?}", other),
    }

    commands::update_unit_status(&state, &unit.id, UnitStatus::Practicing).await.unwrap();
    match state.feed.current(&student.id) {
        SuggestionState::Ready(s) => assert_eq!(s.confidence, Confidence::Medium),
        other => panic!("unexpected feed state: {:?}", other),
    }

    commands::delete_unit(&state, &unit.id).await.unwrap();
    match state.feed.current(&student.id) {
        SuggestionState::Ready(s) => assert!(s.is_empty()),
        other => panic!("unexpected feed state: {:?}", other),
    }
    assert!(state.metrics.snapshot().feed_refreshes >= 3);
}

#[tokio::test]
async fn unchanged_refresh_does_not_wake_subscribers() {
    let dir = TestDir::new("feed-quiet");
    let state = state_in(&dir);
    let student = commands::register_student(&state, form()).await.unwrap();
    commands::add_unit(&state, &student.id, "数学", "正負の数").await.unwrap();

    let mut stream = state.feed.subscribe(&student.id);
    assert!(matches!(stream.next().await, Some(SuggestionState::Ready(_))));

    state.feed.refresh(&student.id).await.unwrap();
    state.feed.refresh(&student.id).await.unwrap();
    let woke = tokio::time::timeout(Duration::from_millis(100), stream.next()).await;
    assert!(woke.is_err(), "identical suggestion was published again: {:?}", woke);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_leave_feed_current() {
    let dir = TestDir::new("feed-race");
    let state = state_in(&dir);
    let student = commands::register_student(&state, form()).await.unwrap();
    let mut units = Vec::new();
    for name in ["正負の数", "文字と式", "方程式", "比例", "反比例", "平面図形"] {
        units.push(commands::add_unit(&state, &student.id, "数学", name).await.unwrap());
    }
    let _stream = state.feed.subscribe(&student.id);

    let mut tasks = Vec::new();
    for unit in &units {
        let state = state.clone();
        let unit_id = unit.id.clone();
        tasks.push(tokio::spawn(async move {
            commands::update_unit_status(&state, &unit_id, UnitStatus::Practicing).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let fresh = commands::get_suggestion(&state, &student.id).await.unwrap();
    assert_eq!(fresh.suggested_unit_ids.len(), units.len());
    assert_eq!(state.feed.current(&student.id), SuggestionState::Ready(fresh));
}

#[tokio::test]
async fn idle_channels_are_dropped() {
    let dir = TestDir::new("feed-idle");
    let state = state_in(&dir);
    let a = commands::register_student(&state, form()).await.unwrap();
    let mut second = form();
    second.student_id = "S002".into();
    let b = commands::register_student(&state, second).await.unwrap();

    let stream = state.feed.subscribe(&a.id);
    state.feed.refresh(&b.id).await.unwrap();
    assert_eq!(state.feed.channel_count(), 2);

    drop(stream);
    state.feed.refresh(&b.id).await.unwrap();
    assert_eq!(state.feed.channel_count(), 1);
    assert_eq!(state.feed.current(&a.id), SuggestionState::Loading);
}

#[tokio::test]
async fn added_unit_order_stays_unique_after_delete() {
    let dir = TestDir::new("order");
    let state = state_in(&dir);
    let student = commands::register_student(&state, form()).await.unwrap();
    let a = commands::add_unit(&state, &student.id, "数学", "正負の数").await.unwrap();
    commands::add_unit(&state, &student.id, "数学", "文字と式").await.unwrap();
    commands::add_unit(&state, &student.id, "数学", "方程式").await.unwrap();

    commands::delete_unit(&state, &a.id).await.unwrap();
    let d = commands::add_unit(&state, &student.id, "数学", "比例").await.unwrap();
    assert_eq!(d.order, 4);

    let orders: Vec<i64> = commands::list_units(&state, &student.id)
        .await
        .unwrap()
        .iter()
        .map(|u| u.order)
        .collect();
    assert_eq!(orders, vec![2, 3, 4]);
}

#[tokio::test]
async fn unticked_unit_keeps_its_status() {
    let dir = TestDir::new("untick");
    let state = state_in(&dir);
    let student = commands::register_student(&state, form()).await.unwrap();
    let u1 = commands::add_unit(&state, &student.id, "数学", "正負の数").await.unwrap();
    let u2 = commands::add_unit(&state, &student.id, "数学", "文字と式").await.unwrap();
    commands::update_unit_status(&state, &u1.id, UnitStatus::Practicing).await.unwrap();
    commands::update_unit_status(&state, &u2.id, UnitStatus::Practicing).await.unwrap();

    let mut draft = commands::prepare_lesson_draft(&state, &student.id, day(4))
        .await
        .unwrap()
        .draft;
    assert_eq!(draft.unit_ids.len(), 2);
    draft.toggle_unit(&u2.id, false);
    draft.understanding = 3;
    let record = commands::save_class_record(&state, &student.id, &draft).await.unwrap();
    assert_eq!(record.unit_ids, vec![u1.id.clone()]);

    let units = commands::list_units(&state, &student.id).await.unwrap();
    assert_eq!(units[0].status, UnitStatus::WaitingConfirmation);
    assert_eq!(units[1].status, UnitStatus::Practicing);
}

#[tokio::test]
async fn zero_page_size_hides_all_records() {
    let dir = TestDir::new("page-zero");
    let state = AppState::new(AppConfig {
        data_dir: Some(dir.0.clone()),
        record_page_size: 0,
        ..AppConfig::default()
    });
    let student = commands::register_student(&state, form()).await.unwrap();
    let unit = commands::add_unit(&state, &student.id, "数学", "正負の数").await.unwrap();
    for d in [1, 2] {
        let units = commands::list_units(&state, &student.id).await.unwrap();
        let mut draft = LessonDraft::new(day(d));
        draft.toggle_unit(&unit.id, true);
        draft.sync_status_updates(&units);
        draft.understanding = 2;
        commands::save_class_record(&state, &student.id, &draft).await.unwrap();
    }

    let page = commands::class_record_history(&state, &student.id, false).await.unwrap();
    assert!(page.records.is_empty());
    assert_eq!(page.hidden, 2);
}

#[tokio::test]
async fn unknown_ids_are_lookup_errors() {
    let dir = TestDir::new("lookup");
    let state = state_in(&dir);
    let err = commands::add_unit(&state, "nobody", "数学", "x").await.unwrap_err();
    assert_eq!(err.stage, "lookup");
    let err = commands::update_unit_status(&state, "missing", UnitStatus::Completed)
        .await
        .unwrap_err();
    assert_eq!(err.entity.as_deref(), Some("missing"));
}

#[tokio::test]
async fn dashboard_counts_everything() {
    let dir = TestDir::new("dashboard");
    let state = state_in(&dir);
    let a = commands::register_student(&state, form()).await.unwrap();
    let mut second = form();
    second.student_id = "S002".into();
    let b = commands::register_student(&state, second).await.unwrap();

    let unit = commands::add_unit(&state, &a.id, "数学", "正負の数").await.unwrap();
    commands::add_unit(&state, &b.id, "英語", "be動詞").await.unwrap();
    commands::update_unit_status(&state, &unit.id, UnitStatus::Completed).await.unwrap();

    let d = commands::dashboard(&state).await.unwrap();
    assert_eq!(d.total_students, 2);
    assert_eq!(d.total_units, 2);
    assert_eq!(d.completed_units, 1);
    assert_eq!(d.progress[0].student_id, a.id);
    assert_eq!(d.progress[0].completed, 1);

    let students = commands::list_students(&state).await.unwrap();
    assert_eq!(students.len(), 2);
    assert_eq!(students[0].student_id, "S001");
}
