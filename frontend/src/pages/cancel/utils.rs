use chrono::NaiveDateTime;

/// `"{h}h {m}m until appointment"`, or `"Past appointment"` once the start
/// time has gone by.
pub fn time_until_label(scheduled_at: NaiveDateTime, now: NaiveDateTime) -> String {
    let remaining = scheduled_at - now;
    if remaining < chrono::Duration::zero() {
        return "Past appointment".into();
    }
    format!(
        "{}h {}m until appointment",
        remaining.num_hours(),
        remaining.num_minutes() % 60
    )
}
