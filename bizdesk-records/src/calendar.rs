//! Activities grouped by calendar day.

use std::collections::BTreeMap;

use crate::entities::Activity;

/// Day part of a date or date-time string (`2024-06-10T10:00` -> `2024-06-10`).
pub fn day_key(raw: &str) -> Option<&str> {
    raw.split('T').next().map(str::trim).filter(|d| !d.is_empty())
}

/// Why an activity appears on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarReason {
    Due,
    Reminder,
}

/// Activities keyed by day, earliest day first.
///
/// An activity appears on its due day, and again on its reminder day when
/// that is a different day. Within a day activities keep input order.
pub fn calendar(activities: &[Activity]) -> BTreeMap<String, Vec<(&Activity, CalendarReason)>> {
    let mut days: BTreeMap<String, Vec<_>> = BTreeMap::new();
    for activity in activities {
        let due = day_key(&activity.due);
        if let Some(due) = due {
            days.entry(due.to_string())
                .or_default()
                .push((activity, CalendarReason::Due));
        }
        let reminder = activity.reminder.as_deref().and_then(day_key);
        if let Some(reminder) = reminder.filter(|r| Some(*r) != due) {
            days.entry(reminder.to_string())
                .or_default()
                .push((activity, CalendarReason::Reminder));
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: u64, due: &str, reminder: Option<&str>) -> Activity {
        Activity {
            id,
            due: due.into(),
            reminder: reminder.map(Into::into),
            ..Activity::default()
        }
    }

    #[test]
    fn day_key_strips_time() {
        assert_eq!(day_key("2024-06-10T10:00"), Some("2024-06-10"));
        assert_eq!(day_key("2024-06-10"), Some("2024-06-10"));
        assert_eq!(day_key(""), None);
    }

    #[test]
    fn same_day_reminder_is_listed_once() {
        let acts = vec![activity(1, "2024-06-10", Some("2024-06-10T10:00"))];
        let cal = calendar(&acts);
        assert_eq!(cal.len(), 1);
        assert_eq!(cal["2024-06-10"].len(), 1);
        assert_eq!(cal["2024-06-10"][0].1, CalendarReason::Due);
    }

    #[test]
    fn earlier_reminder_gets_its_own_day() {
        let acts = vec![
            activity(1, "2024-06-12", Some("2024-06-11T09:00")),
            activity(2, "2024-06-12", None),
            activity(3, "", None),
        ];
        let cal = calendar(&acts);

        let days: Vec<_> = cal.keys().map(String::as_str).collect();
        assert_eq!(days, vec!["2024-06-11", "2024-06-12"]);

        let ids: Vec<_> = cal["2024-06-12"].iter().map(|(a, _)| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(cal["2024-06-11"][0].1, CalendarReason::Reminder);
    }
}
