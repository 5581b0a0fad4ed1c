use chrono::{Duration, NaiveDate, Utc};
use impulsepad::db::DbPool;
use impulsepad::models::budget::{BudgetCreateInput, BudgetKind, BudgetPeriod, BudgetUpdateInput};
use impulsepad::models::transaction::TransactionCreateInput;
use impulsepad::services::budget_service::BudgetService;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn budget_service(db_name: &str) -> (tempfile::TempDir, BudgetService) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join(db_name)).expect("db pool");
    (dir, BudgetService::new(pool))
}

#[test]
fn fortnightly_budget_cycle_and_spend_flow() {
    let (_dir, service) = budget_service("budgets.sqlite");

    let budget = service
        .create_budget(BudgetCreateInput {
            name: "Groceries".into(),
            kind: None,
            period: "fortnightly".into(),
            goal_amount: 200.0,
            renew_anchor: Some("2024-01-01".into()),
        })
        .expect("create budget");
    assert_eq!(budget.kind, BudgetKind::Spending);
    assert_eq!(budget.period, BudgetPeriod::Fortnightly);
    assert_eq!(budget.renew_anchor, date(2024, 1, 1));

    // Anchor 2024-01-01 evaluated on 2024-01-20: current cycle is
    // Jan 15 .. Jan 28, renewing Jan 29.
    let overview = service
        .cycle_overview(&budget.id, date(2024, 1, 20))
        .expect("overview");
    assert_eq!(overview.window.start, date(2024, 1, 15));
    assert_eq!(overview.window.end, date(2024, 1, 28));
    assert_eq!(overview.window.next_renewal, date(2024, 1, 29));
    assert_eq!(overview.spent, 0.0);
    assert_eq!(overview.remaining, 200.0);

    // One spend inside the current window, one in the previous cycle.
    service
        .add_transaction(TransactionCreateInput {
            budget_id: budget.id.clone(),
            amount: 45.5,
            description: Some("weekly shop".into()),
            created_at: Some("2024-01-16T10:00:00+00:00".into()),
        })
        .expect("transaction inside window");
    service
        .add_transaction(TransactionCreateInput {
            budget_id: budget.id.clone(),
            amount: 80.0,
            description: None,
            created_at: Some("2024-01-10T18:30:00+00:00".into()),
        })
        .expect("transaction in previous cycle");

    let overview = service
        .cycle_overview(&budget.id, date(2024, 1, 20))
        .expect("overview");
    assert!((overview.spent - 45.5).abs() < 1e-9);
    assert!((overview.remaining - 154.5).abs() < 1e-9);

    // Fourteen days later the window shifts by exactly one cycle; the
    // anchor's phase never drifts.
    let later = service
        .cycle_overview(&budget.id, date(2024, 2, 3))
        .expect("overview two weeks on");
    assert_eq!(later.window.start, date(2024, 1, 29));
    assert_eq!(later.window.next_renewal, date(2024, 2, 12));
    assert_eq!(later.spent, 0.0);

    let transactions = service.list_transactions(&budget.id).expect("transactions");
    assert_eq!(transactions.len(), 2);

    service.delete_budget(&budget.id).expect("delete budget");
    assert!(service.get_budget(&budget.id).is_err());
    let transactions = service.list_transactions(&budget.id).expect("transactions");
    assert!(transactions.is_empty());
}

#[test]
fn weekly_budget_renews_on_anchor_weekday() {
    let (_dir, service) = budget_service("budgets.sqlite");

    // 2024-01-03 is a Wednesday; only its weekday matters.
    let budget = service
        .create_budget(BudgetCreateInput {
            name: "Eating out".into(),
            kind: None,
            period: "weekly".into(),
            goal_amount: 60.0,
            renew_anchor: Some("2024-01-03".into()),
        })
        .expect("create budget");

    let overview = service
        .cycle_overview(&budget.id, date(2024, 1, 15))
        .expect("overview");
    assert_eq!(overview.window.start, date(2024, 1, 10));
    assert_eq!(overview.window.end, date(2024, 1, 16));
    assert_eq!(overview.window.next_renewal, date(2024, 1, 17));
}

#[test]
fn monthly_budget_clamps_short_months() {
    let (_dir, service) = budget_service("budgets.sqlite");

    let budget = service
        .create_budget(BudgetCreateInput {
            name: "Rent".into(),
            kind: Some(BudgetKind::Subscription),
            period: "monthly".into(),
            goal_amount: 1200.0,
            renew_anchor: Some("2024-01-31".into()),
        })
        .expect("create budget");

    // A day-31 renewal clamps to Feb 29 in a leap year.
    let overview = service
        .cycle_overview(&budget.id, date(2024, 2, 15))
        .expect("overview");
    assert_eq!(overview.window.start, date(2024, 1, 31));
    assert_eq!(overview.window.end, date(2024, 2, 28));
    assert_eq!(overview.window.next_renewal, date(2024, 2, 29));
}

#[test]
fn updating_anchor_rephases_the_current_window() {
    let (_dir, service) = budget_service("budgets.sqlite");

    let budget = service
        .create_budget(BudgetCreateInput {
            name: "Fuel".into(),
            kind: None,
            period: "fortnightly".into(),
            goal_amount: 90.0,
            renew_anchor: Some("2024-01-01".into()),
        })
        .expect("create budget");

    let budget = service
        .update_budget(
            &budget.id,
            BudgetUpdateInput {
                renew_anchor: Some("2024-03-04".into()),
                ..Default::default()
            },
        )
        .expect("update anchor");
    assert_eq!(budget.renew_anchor, date(2024, 3, 4));

    // The new phase applies to the current evaluation immediately.
    let overview = service
        .cycle_overview(&budget.id, date(2024, 3, 10))
        .expect("overview");
    assert_eq!(overview.window.start, date(2024, 3, 4));
    assert_eq!(overview.window.next_renewal, date(2024, 3, 18));
}

#[test]
fn period_change_without_anchor_falls_back_to_default() {
    let (_dir, service) = budget_service("budgets.sqlite");

    let budget = service
        .create_budget(BudgetCreateInput {
            name: "Subscriptions".into(),
            kind: None,
            period: "monthly".into(),
            goal_amount: 40.0,
            renew_anchor: Some("2024-01-05".into()),
        })
        .expect("create budget");

    let budget = service
        .update_budget(
            &budget.id,
            BudgetUpdateInput {
                period: Some("4-weekly".into()),
                ..Default::default()
            },
        )
        .expect("switch period");
    assert_eq!(budget.period, BudgetPeriod::FourWeekly);

    // The default anchor for a fixed-length period is today, so the
    // fresh cycle starts today and runs 28 days.
    let today = Utc::now().date_naive();
    assert_eq!(budget.renew_anchor, today);
    let overview = service.cycle_overview(&budget.id, today).expect("overview");
    assert_eq!(overview.window.start, today);
    assert_eq!(overview.window.next_renewal, today + Duration::days(28));
}

#[test]
fn rejects_invalid_inputs() {
    let (_dir, service) = budget_service("budgets.sqlite");

    let result = service.create_budget(BudgetCreateInput {
        name: "Misc".into(),
        kind: None,
        period: "biweekly".into(),
        goal_amount: 50.0,
        renew_anchor: None,
    });
    assert!(result.is_err(), "unknown period must be rejected");

    let result = service.create_budget(BudgetCreateInput {
        name: "Misc".into(),
        kind: None,
        period: "weekly".into(),
        goal_amount: 50.0,
        renew_anchor: Some("05/01/2024".into()),
    });
    assert!(result.is_err(), "malformed anchor must be rejected");

    let result = service.create_budget(BudgetCreateInput {
        name: "Misc".into(),
        kind: None,
        period: "weekly".into(),
        goal_amount: 0.0,
        renew_anchor: None,
    });
    assert!(result.is_err(), "zero amount must be rejected");

    let result = service.add_transaction(TransactionCreateInput {
        budget_id: "missing".into(),
        amount: 10.0,
        description: None,
        created_at: None,
    });
    assert!(result.is_err(), "transaction against unknown budget must fail");
}

#[test]
fn persisted_anchor_round_trips_exactly() {
    let (_dir, service) = budget_service("budgets.sqlite");

    let budget = service
        .create_budget(BudgetCreateInput {
            name: "Savings".into(),
            kind: None,
            period: "4-weekly".into(),
            goal_amount: 300.0,
            renew_anchor: Some("2024-02-29".into()),
        })
        .expect("create budget");

    let reloaded = service.get_budget(&budget.id).expect("reload");
    assert_eq!(reloaded.renew_anchor, date(2024, 2, 29));
    assert_eq!(reloaded.period, BudgetPeriod::FourWeekly);

    let listed = service.list_budgets().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], reloaded);
}
