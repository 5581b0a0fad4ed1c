use chrono::{NaiveDate, TimeZone, Utc};
use impulsepad::db::DbPool;
use impulsepad::models::goal::GoalCreateInput;
use impulsepad::models::impulse::{ImpulseCreateInput, ImpulseKind, ImpulseUpdateInput};
use impulsepad::services::goal_service::GoalService;
use impulsepad::services::impulse_service::ImpulseService;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> (tempfile::TempDir, GoalService, ImpulseService) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("history.sqlite")).expect("db pool");
    let goals = GoalService::new(pool.clone());
    let impulses = ImpulseService::new(pool);
    (dir, goals, impulses)
}

fn log(
    service: &ImpulseService,
    goal_id: &str,
    kind: ImpulseKind,
    acted_on: bool,
    created_at: &str,
) -> impulsepad::models::impulse::Impulse {
    service
        .log_impulse(ImpulseCreateInput {
            goal_id: goal_id.into(),
            description: "logged impulse".into(),
            kind,
            acted_on,
            notes: None,
            created_at: Some(created_at.into()),
        })
        .expect("log impulse")
}

#[test]
fn week_history_aggregates_a_monday_start_week() {
    let (_dir, goals, impulses) = setup();
    let goal = goals
        .create_goal(GoalCreateInput {
            title: "Quit doomscrolling".into(),
            image_url: None,
        })
        .expect("create goal");

    // Week of Mon 2024-01-01 .. Sun 2024-01-07.
    log(&impulses, &goal.id, ImpulseKind::Positive, true, "2024-01-01T09:00:00+00:00");
    log(&impulses, &goal.id, ImpulseKind::Negative, false, "2024-01-01T21:15:00+00:00");
    log(&impulses, &goal.id, ImpulseKind::Positive, false, "2024-01-02T08:30:00+00:00");
    let sunday_slip = log(
        &impulses,
        &goal.id,
        ImpulseKind::Negative,
        true,
        "2024-01-07T23:30:00+00:00",
    );
    // The following Monday; must not appear in this page.
    log(&impulses, &goal.id, ImpulseKind::Positive, true, "2024-01-08T10:00:00+00:00");

    let history = impulses.week_history(date(2024, 1, 3)).expect("history");
    assert_eq!(history.range.start.date_naive(), date(2024, 1, 1));
    assert_eq!(history.range.end.date_naive(), date(2024, 1, 7));
    assert_eq!(history.totals.good, 2);
    assert_eq!(history.totals.bad, 2);
    assert_eq!(history.impulses.len(), 4);

    // Buckets are dense over the seven days, in ascending order.
    assert_eq!(history.buckets.len(), 7);
    assert_eq!(history.buckets[0].day, date(2024, 1, 1));
    assert_eq!(history.buckets[0].good, 2);
    assert_eq!(history.buckets[0].bad, 0);
    assert_eq!(history.buckets[1].good, 0);
    assert_eq!(history.buckets[1].bad, 1);
    assert_eq!(history.buckets[2].good, 0);
    assert_eq!(history.buckets[2].bad, 0);
    assert_eq!(history.buckets[6].bad, 1);
    assert_eq!(history.max_daily_count, 2);

    // Newest first for the list view.
    assert_eq!(history.impulses[0].id, sunday_slip.id);

    // A Sunday reference is the last day of the same week, not the
    // first day of the next one.
    let from_sunday = impulses.week_history(date(2024, 1, 7)).expect("history");
    assert_eq!(from_sunday.range, history.range);
    assert_eq!(from_sunday.totals, history.totals);

    // The next page picks up the Monday impulse.
    let next_week = impulses.week_history(date(2024, 1, 8)).expect("history");
    assert_eq!(next_week.range.start.date_naive(), date(2024, 1, 8));
    assert_eq!(next_week.totals.good, 1);
    assert_eq!(next_week.totals.bad, 0);
    assert_eq!(next_week.max_daily_count, 1);
}

#[test]
fn editing_an_impulse_reclassifies_it() {
    let (_dir, goals, impulses) = setup();
    let goal = goals
        .create_goal(GoalCreateInput {
            title: "Save money".into(),
            image_url: None,
        })
        .expect("create goal");

    let slip = log(&impulses, &goal.id, ImpulseKind::Negative, true, "2024-01-02T12:00:00+00:00");
    let history = impulses.week_history(date(2024, 1, 2)).expect("history");
    assert_eq!(history.totals.bad, 1);

    // Correcting the entry to "resisted" flips it to good on re-read.
    impulses
        .update_impulse(
            &slip.id,
            ImpulseUpdateInput {
                acted_on: Some(false),
                notes: Some(Some("walked away".into())),
                ..Default::default()
            },
        )
        .expect("update impulse");

    let history = impulses.week_history(date(2024, 1, 2)).expect("history");
    assert_eq!(history.totals.good, 1);
    assert_eq!(history.totals.bad, 0);
    assert_eq!(history.impulses[0].notes.as_deref(), Some("walked away"));

    impulses.delete_impulse(&slip.id).expect("delete impulse");
    let history = impulses.week_history(date(2024, 1, 2)).expect("history");
    assert_eq!(history.impulses.len(), 0);
    assert_eq!(history.max_daily_count, 1, "empty week keeps a chart floor of 1");
}

#[test]
fn list_today_is_bounded_by_the_calendar_day() {
    let (_dir, goals, impulses) = setup();
    let goal = goals
        .create_goal(GoalCreateInput {
            title: "Sleep earlier".into(),
            image_url: None,
        })
        .expect("create goal");

    log(&impulses, &goal.id, ImpulseKind::Positive, true, "2024-01-02T00:00:00+00:00");
    log(&impulses, &goal.id, ImpulseKind::Positive, true, "2024-01-02T23:59:00+00:00");
    log(&impulses, &goal.id, ImpulseKind::Positive, true, "2024-01-03T00:10:00+00:00");

    let now = Utc.with_ymd_and_hms(2024, 1, 2, 14, 0, 0).unwrap();
    let today = impulses.list_today(now).expect("today");
    assert_eq!(today.len(), 2);
}

#[test]
fn deleting_a_goal_keeps_its_logged_impulses() {
    let (_dir, goals, impulses) = setup();
    let goal = goals
        .create_goal(GoalCreateInput {
            title: "Less caffeine".into(),
            image_url: None,
        })
        .expect("create goal");

    log(&impulses, &goal.id, ImpulseKind::Negative, false, "2024-01-02T12:00:00+00:00");
    goals.delete_goal(&goal.id).expect("delete goal");

    let history = impulses.week_history(date(2024, 1, 2)).expect("history");
    assert_eq!(history.impulses.len(), 1);
    assert_eq!(history.impulses[0].goal_id, goal.id);
}

#[test]
fn goals_list_in_sort_order_and_reorder() {
    let (_dir, goals, _impulses) = setup();
    let first = goals
        .create_goal(GoalCreateInput { title: "Read more".into(), image_url: None })
        .expect("goal");
    let second = goals
        .create_goal(GoalCreateInput { title: "Exercise".into(), image_url: None })
        .expect("goal");

    let listed = goals.list_goals().expect("list");
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);

    let listed = goals
        .reorder_goals(&[second.id.clone(), first.id.clone()])
        .expect("reorder");
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[test]
fn logging_against_a_missing_goal_fails() {
    let (_dir, _goals, impulses) = setup();
    let result = impulses.log_impulse(ImpulseCreateInput {
        goal_id: "missing".into(),
        description: "tempted".into(),
        kind: ImpulseKind::Positive,
        acted_on: true,
        notes: None,
        created_at: None,
    });
    assert!(result.is_err());
}
