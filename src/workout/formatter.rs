//! Renders workouts into the Telegram message posted to subscribers.

use chrono::NaiveDate;

use crate::workout::PLACEHOLDER;
use crate::workout::WorkoutRecord;
use crate::workout::date_window::day_prefix;

pub const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
pub const NO_WORKOUTS_TODAY: &str = "No workouts found for today.";
pub const TOMORROW_NOT_PUBLISHED: &str = "⚠️ Sorry… Tomorrow's WOD hasn't been published yet.";

/// Workouts split by the day they are scheduled on.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub today: Vec<&'a WorkoutRecord>,
    pub tomorrow: Vec<&'a WorkoutRecord>,
}

/// Records scheduled on neither day are dropped.
pub fn partition(workouts: &[WorkoutRecord], today: NaiveDate) -> Partition<'_> {
    let today_prefix = day_prefix(today);
    let tomorrow_prefix = today.succ_opt().map(day_prefix);

    let mut parts = Partition::default();
    for workout in workouts {
        if workout.is_scheduled_on(&today_prefix) {
            parts.today.push(workout);
        } else if let Some(prefix) = &tomorrow_prefix
            && workout.is_scheduled_on(prefix)
        {
            parts.tomorrow.push(workout);
        }
    }
    parts
}

/// Renders the message with `today` as the primary day.
///
/// The tomorrow section is only present when `include_tomorrow` is set.
pub fn render_on(today: NaiveDate, workouts: &[WorkoutRecord], include_tomorrow: bool) -> String {
    let parts = partition(workouts, today);

    let mut message = format!("🏋️‍♂️ *Today's Workouts* ({}):\n\n", day_prefix(today));
    if parts.today.is_empty() {
        message.push_str(NO_WORKOUTS_TODAY);
        message.push('\n');
    } else {
        for workout in &parts.today {
            push_entry(&mut message, workout);
        }
    }

    if include_tomorrow {
        let tomorrow = today
            .succ_opt()
            .map_or_else(|| PLACEHOLDER.to_string(), day_prefix);
        message.push_str(&format!("\n📅 *Tomorrow's Workouts* ({tomorrow}):\n\n"));
        if parts.tomorrow.is_empty() {
            message.push_str(TOMORROW_NOT_PUBLISHED);
            message.push('\n');
        } else {
            for workout in &parts.tomorrow {
                push_entry(&mut message, workout);
            }
        }
    }

    message
}

fn push_entry(message: &mut String, workout: &WorkoutRecord) {
    message.push_str(&format!(
        "🔹 *Title*: {}\n📆 *Date*: {}\n📝 *Description*: {}\n{}\n",
        escape_markdown(workout.title_or_placeholder()),
        escape_markdown(workout.scheduled_day()),
        escape_markdown(workout.description_or_placeholder()),
        DIVIDER
    ));
}

/// Escapes the entity markers of Telegram's legacy `Markdown` parse mode.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn workout(id: &str, title: &str, date: &str) -> WorkoutRecord {
        WorkoutRecord {
            id: id.to_string(),
            title: Some(title.to_string()),
            description: Some(format!("{title} description")),
            scheduled_date: Some(format!("{date}T00:00:00.000Z")),
        }
    }

    #[test]
    fn test_partition_by_prefix() {
        let workouts = vec![
            workout("1", "Fran", "2024-03-20"),
            workout("2", "Grace", "2024-03-21"),
            workout("3", "Helen", "2024-03-19"),
            workout("4", "Isabel", "2024-03-20"),
            WorkoutRecord {
                id: "5".to_string(),
                ..Default::default()
            },
        ];

        let parts = partition(&workouts, today());
        let today_ids: Vec<&str> = parts.today.iter().map(|w| w.id.as_str()).collect();
        let tomorrow_ids: Vec<&str> = parts.tomorrow.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(today_ids, vec!["1", "4"]);
        assert_eq!(tomorrow_ids, vec!["2"]);
    }

    #[test]
    fn test_partition_keeps_duplicates() {
        let workouts = vec![
            workout("1", "Fran", "2024-03-20"),
            workout("1", "Fran", "2024-03-20"),
        ];
        assert_eq!(partition(&workouts, today()).today.len(), 2);
    }

    #[test]
    fn test_empty_today_only() {
        let message = render_on(today(), &[], false);
        assert!(message.contains(NO_WORKOUTS_TODAY));
        assert!(!message.contains("*Title*"));
        assert!(!message.contains("Tomorrow"));
    }

    #[test]
    fn test_empty_both_days() {
        let message = render_on(today(), &[], true);
        assert!(message.contains("*Today's Workouts* (2024-03-20)"));
        assert!(message.contains("*Tomorrow's Workouts* (2024-03-21)"));
        assert!(!message.contains("*Title*"));

        let no_today = message.find(NO_WORKOUTS_TODAY).unwrap();
        let tomorrow_header = message.find("Tomorrow's Workouts").unwrap();
        let not_published = message.find(TOMORROW_NOT_PUBLISHED).unwrap();
        assert!(no_today < tomorrow_header);
        assert!(tomorrow_header < not_published);
    }

    #[test]
    fn test_today_without_tomorrow_warns() {
        let workouts = vec![workout("1", "Fran", "2024-03-20")];
        let message = render_on(today(), &workouts, true);

        assert_eq!(message.matches("*Title*").count(), 1);
        assert!(message.contains("Fran"));
        assert!(message.contains("📆 *Date*: 2024-03-20"));
        assert!(!message.contains(NO_WORKOUTS_TODAY));
        assert!(message.contains(TOMORROW_NOT_PUBLISHED));

        let tomorrow_header = message.find("Tomorrow's Workouts").unwrap();
        assert!(message.find("Fran").unwrap() < tomorrow_header);
        assert!(message.find(TOMORROW_NOT_PUBLISHED).unwrap() > tomorrow_header);
    }

    #[test]
    fn test_both_days_rendered() {
        let workouts = vec![
            workout("2", "Grace", "2024-03-21"),
            workout("1", "Fran", "2024-03-20"),
        ];
        let message = render_on(today(), &workouts, true);

        assert!(!message.contains(TOMORROW_NOT_PUBLISHED));
        assert_eq!(message.matches(DIVIDER).count(), 2);
        let tomorrow_header = message.find("Tomorrow's Workouts").unwrap();
        assert!(message.find("Fran").unwrap() < tomorrow_header);
        assert!(message.find("Grace").unwrap() > tomorrow_header);
    }

    #[test]
    fn test_missing_fields_render_placeholder() {
        let workouts = vec![WorkoutRecord {
            id: "1".to_string(),
            title: None,
            description: None,
            scheduled_date: Some("2024-03-20T05:00:00.000Z".to_string()),
        }];
        let message = render_on(today(), &workouts, false);
        assert!(message.contains("🔹 *Title*: N/A"));
        assert!(message.contains("📝 *Description*: N/A"));
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("3_rounds *fast*"), "3\\_rounds \\*fast\\*");
        assert_eq!(escape_markdown("plain"), "plain");
    }
}
