use chrono::{DateTime, Utc};

/// How long ago the cache was last replaced, for status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheAge {
    pub refreshed_at: DateTime<Utc>,
}

impl CacheAge {
    pub fn new(refreshed_at: DateTime<Utc>) -> Self {
        Self { refreshed_at }
    }

    pub fn age_minutes(&self) -> i64 {
        self.age_minutes_at(Utc::now())
    }

    fn age_minutes_at(&self, now: DateTime<Utc>) -> i64 {
        (now - self.refreshed_at).num_minutes()
    }

    pub fn display(&self) -> String {
        self.display_at(Utc::now())
    }

    pub fn display_at(&self, now: DateTime<Utc>) -> String {
        let minutes = self.age_minutes_at(now);
        if minutes < 1 {
            // Negative ages come from clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                // Round up: 1d 12h+ becomes 2d
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    /// Describe an optional refresh time, `"never"` when the cache is empty
    pub fn describe(refreshed_at: Option<DateTime<Utc>>) -> String {
        refreshed_at
            .map(|at| Self::new(at).display())
            .unwrap_or_else(|| "never".to_string())
    }
}
