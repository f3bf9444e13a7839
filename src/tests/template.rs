use super::Template;
use crate::error::Error;
use chrono::NaiveDate;

#[test]
fn test_daily_template_renders_date() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let daily = Template::named("daily").unwrap();

    assert_eq!(daily.render(date), "## 2024.01.05\n### Daily Summary\n\n");
}

#[test]
fn test_lookup_ignores_case() {
    assert_eq!(Template::named("DAILY").unwrap().name, "daily");
}

#[test]
fn test_unknown_template() {
    let err = Template::named("weekly").unwrap_err();
    assert!(matches!(err, Error::UnknownTemplate(ref name) if name == "weekly"));
    assert_eq!(err.to_string(), "template 'weekly' not found");
}

#[test]
fn test_registry_lists_daily() {
    assert!(Template::all().iter().any(|t| t.name == "daily"));
}
