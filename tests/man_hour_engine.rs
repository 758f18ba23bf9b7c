mod common;

use atd_check::models::EmployeeFilter;
use atd_check::screens::layout::man_hour;
use atd_check::{ManHourEngine, ReportingPeriod};

use common::{fast_waits, ymd, FakeEmployee, FakeHrApp, Fault, Screen};

fn march() -> ReportingPeriod {
    ReportingPeriod::new(ymd(2024, 3, 1), ymd(2024, 3, 31)).unwrap()
}

#[tokio::test]
async fn test_walks_weeks_and_reports_mismatches_inside_period() {
    let mut app = FakeHrApp::new()
        .with_employee(
            FakeEmployee::new("00012", "山田 太郎")
                .man_hour(ymd(2024, 2, 28), "8:00", "0:00")
                .man_hour(ymd(2024, 3, 4), "8:00", "8:00")
                .man_hour(ymd(2024, 3, 5), "7:30", "7:00")
                .man_hour(ymd(2024, 3, 31), "1:00", "2:00")
                .man_hour(ymd(2024, 4, 1), "8:00", "1:00"),
        )
        .start_term(ymd(2024, 3, 11))
        .on_screen(Screen::ManHour);

    let rows = ManHourEngine::new(&mut app, march(), fast_waits(), 3, 20)
        .run(&EmployeeFilter::all())
        .await
        .unwrap();

    let dates: Vec<_> = rows.iter().map(|r| r.target_date).collect();
    assert_eq!(dates, vec![ymd(2024, 3, 5), ymd(2024, 3, 31)]);
    assert_eq!(rows[0].employee_id, "00012");
    assert_eq!(rows[0].name, "山田 太郎");
    assert_eq!(rows[0].detail(), "就業時間 7:30 / 合計 7:00");

    // 回退两周 (3/11 → 3/4 → 2/26)，再前进五次 (→ 4/1)
    assert_eq!(app.term_clicks, 7);
}

#[tokio::test]
async fn test_each_employee_starts_from_its_own_term() {
    let mut app = FakeHrApp::new()
        .with_employee(FakeEmployee::new("1", "一").man_hour(ymd(2024, 3, 12), "8:00", "6:00"))
        .with_employee(FakeEmployee::new("2", "二").man_hour(ymd(2024, 3, 13), "8:00", "7:00"))
        .with_employee(FakeEmployee::new("3", "三").man_hour(ymd(2024, 3, 14), "8:00", "5:00"))
        .start_term(ymd(2024, 3, 11))
        .on_screen(Screen::ManHour);

    let rows = ManHourEngine::new(&mut app, march(), fast_waits(), 3, 20)
        .run(&EmployeeFilter::only(["1", "3"]))
        .await
        .unwrap();

    let found: Vec<_> = rows
        .iter()
        .map(|r| (r.employee_id.as_str(), r.target_date))
        .collect();
    assert_eq!(found, vec![("1", ymd(2024, 3, 12)), ("3", ymd(2024, 3, 14))]);
}

#[tokio::test]
async fn test_rewind_is_bounded() {
    let mut app = FakeHrApp::new()
        .with_employee(FakeEmployee::new("9", "未来").man_hour(ymd(2024, 3, 5), "8:00", "0:00"))
        .start_term(ymd(2025, 1, 6))
        .on_screen(Screen::ManHour);

    let rows = ManHourEngine::new(&mut app, march(), fast_waits(), 3, 4)
        .run(&EmployeeFilter::all())
        .await
        .unwrap();

    assert!(rows.is_empty());
    assert_eq!(app.term_clicks, 4);
}

#[tokio::test]
async fn test_dialog_at_employee_list_ends_with_empty_result() {
    let mut app = FakeHrApp::new()
        .with_employee(FakeEmployee::new("1", "一").man_hour(ymd(2024, 3, 12), "8:00", "6:00"))
        .fail_once(man_hour::picker_button(), Fault::Modal)
        .on_screen(Screen::ManHour);

    let rows = ManHourEngine::new(&mut app, march(), fast_waits(), 3, 20)
        .run(&EmployeeFilter::all())
        .await
        .unwrap();

    assert!(rows.is_empty());
    assert_eq!(app.term_clicks, 0);
}
