use chrono::{DateTime, Utc};

use crate::locale::LocaleTag;
use crate::render::CommitInfo;

/// Length of the abbreviated commit hash.
const SHORT_SHA_LEN: usize = 7;

/// Render `date` relative to `now`, e.g. "2 days ago" or "2 天前".
///
/// The largest non-zero unit wins and is floored. Dates in the future read as
/// "just now".
pub fn format_relative_time(date: DateTime<Utc>, now: DateTime<Utc>, locale: LocaleTag) -> String {
    let elapsed = now.signed_duration_since(date);
    let days = elapsed.num_days();
    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes();

    let plural = |n: i64| if n > 1 { "s" } else { "" };
    match locale {
        LocaleTag::ZhCn => {
            if days > 0 {
                format!("{days} 天前")
            } else if hours > 0 {
                format!("{hours} 小时前")
            } else if minutes > 0 {
                format!("{minutes} 分钟前")
            } else {
                "刚刚".to_string()
            }
        }
        LocaleTag::EnUs => {
            if days > 0 {
                format!("{days} day{} ago", plural(days))
            } else if hours > 0 {
                format!("{hours} hour{} ago", plural(hours))
            } else if minutes > 0 {
                format!("{minutes} minute{} ago", plural(minutes))
            } else {
                "just now".to_string()
            }
        }
    }
}

/// Inner HTML of the latest-commit statistic: short hash plus relative time.
pub fn render_commit_stat(info: &CommitInfo, now: DateTime<Utc>, locale: LocaleTag) -> String {
    let sha = info.sha.as_deref().unwrap_or("");
    let short: String = sha.chars().take(SHORT_SHA_LEN).collect();
    let relative = format_relative_time(info.committed_at, now, locale);
    format!(
        "<span class=\"commit-sha\" title=\"{}\">{}</span> {}",
        escape_html(sha),
        escape_html(&short),
        relative
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn ninety_minutes_is_one_hour() {
        let then = now() - Duration::minutes(90);
        assert_eq!(format_relative_time(then, now(), LocaleTag::EnUs), "1 hour ago");
        assert_eq!(format_relative_time(then, now(), LocaleTag::ZhCn), "1 小时前");
    }

    #[test]
    fn picks_largest_unit_and_pluralizes() {
        let cases = [
            (Duration::days(3), "3 days ago", "3 天前"),
            (Duration::hours(25), "1 day ago", "1 天前"),
            (Duration::hours(5), "5 hours ago", "5 小时前"),
            (Duration::minutes(1), "1 minute ago", "1 分钟前"),
            (Duration::minutes(59), "59 minutes ago", "59 分钟前"),
            (Duration::seconds(59), "just now", "刚刚"),
            (Duration::seconds(-30), "just now", "刚刚"),
        ];
        for (ago, en, zh) in cases {
            let then = now() - ago;
            assert_eq!(format_relative_time(then, now(), LocaleTag::EnUs), en);
            assert_eq!(format_relative_time(then, now(), LocaleTag::ZhCn), zh);
        }
    }

    #[test]
    fn commit_stat_markup() {
        let info = CommitInfo {
            sha: Some("0123456789abcdef".into()),
            committed_at: now() - Duration::days(2),
        };
        assert_eq!(
            render_commit_stat(&info, now(), LocaleTag::EnUs),
            "<span class=\"commit-sha\" title=\"0123456789abcdef\">0123456</span> 2 days ago"
        );
        let no_sha = CommitInfo {
            sha: None,
            committed_at: now(),
        };
        assert_eq!(
            render_commit_stat(&no_sha, now(), LocaleTag::ZhCn),
            "<span class=\"commit-sha\" title=\"\"></span> 刚刚"
        );
    }
}
