use chrono::NaiveDate;
use juritoolbox_core::{
    CalculatorConfig, CountingMode, DeadlineInput, DeadlineService, HolidayImport,
    HolidayParseError, ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn input(start: &str, amount: i64, mode: CountingMode) -> DeadlineInput {
    DeadlineInput {
        start: start.to_string(),
        amount,
        mode,
        postpone_if_non_business: false,
        holidays_csv: None,
    }
}

#[test]
fn unparseable_holidays_do_not_abort_calculation() {
    let mut request = input("2024-01-01", 6, CountingMode::CalendarDays);
    request.postpone_if_non_business = true;
    request.holidays_csv = Some("sem datas aqui\nnada\n".to_string());

    let report = DeadlineService::default().calculate(&request).unwrap();
    assert_eq!(report.holidays_loaded, 0);
    assert!(matches!(
        report.holiday_warning,
        Some(HolidayParseError::NoDates { .. })
    ));
    // Sunday postponed to Monday since no holiday was loaded.
    assert_eq!(report.result.end_date, date(2024, 1, 8));
}

#[test]
fn uploaded_holidays_drive_postponement_and_report_drops() {
    let mut request = input("2024-01-01", 6, CountingMode::CalendarDays);
    request.postpone_if_non_business = true;
    request.holidays_csv = Some("data\n2024-01-07\n2024-01-08\n??\n".to_string());

    let report = DeadlineService::default().calculate(&request).unwrap();
    assert_eq!(report.result.end_date, date(2024, 1, 9));
    assert_eq!(report.holidays_loaded, 2);
    assert_eq!(report.dropped_holiday_rows, 1);
    assert!(report.holiday_warning.is_none());
}

#[test]
fn zero_amount_fails_without_report() {
    let err = DeadlineService::default()
        .calculate(&input("2024-01-01", 0, CountingMode::BusinessDays))
        .unwrap_err();
    assert_eq!(err, ValidationError::NonPositiveAmount(0));
}

#[test]
fn garbage_start_date_fails() {
    let err = DeadlineService::default()
        .calculate(&input("amanhã", 3, CountingMode::BusinessDays))
        .unwrap_err();
    assert_eq!(err, ValidationError::InvalidStartDate("amanhã".to_string()));
}

#[test]
fn two_digit_year_start_date_fails() {
    let err = DeadlineService::default()
        .calculate(&input("10/11/24", 5, CountingMode::BusinessDays))
        .unwrap_err();
    assert_eq!(err, ValidationError::InvalidStartDate("10/11/24".to_string()));
}

#[test]
fn configured_amount_limit_is_enforced() {
    let config = CalculatorConfig {
        max_amount: 30,
        ..CalculatorConfig::default()
    };
    let err = DeadlineService::new(&config)
        .calculate(&input("2024-01-01", 31, CountingMode::CalendarDays))
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::AmountTooLarge {
            amount: 31,
            limit: 30
        }
    );
}

#[test]
fn pre_ingested_holidays_override_csv_field() {
    let mut request = input("2024-01-01", 1, CountingMode::BusinessDays);
    request.holidays_csv = Some("2024-01-03\n".to_string());
    let import = juritoolbox_core::import_holidays_str("2024-01-02\n");

    let report = DeadlineService::default()
        .calculate_with_import(&request, import)
        .unwrap();
    assert_eq!(report.result.end_date, date(2024, 1, 3));

    let report = DeadlineService::default()
        .calculate_with_import(&request, HolidayImport::empty())
        .unwrap();
    assert_eq!(report.result.end_date, date(2024, 1, 2));
}
