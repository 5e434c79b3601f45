//! Plain-text rendering of launches and cache status.

use anyhow::Result;

use launchcache_core::utils::truncate;
use launchcache_core::{CacheAge, LaunchDatabase, LaunchRecord};

/// Width of the mission column, longer names are truncated
const MISSION_WIDTH: usize = 28;

pub fn launches_table(launches: &[LaunchRecord]) -> String {
    if launches.is_empty() {
        return "No launches".to_string();
    }

    let mut lines = Vec::with_capacity(launches.len() + 2);
    lines.push(format!(
        "{:<5} {:<width$} {:<5} {}",
        "#",
        "Mission",
        "Year",
        "Outcome",
        width = MISSION_WIDTH
    ));

    for launch in launches {
        lines.push(format!(
            "{:<5} {:<width$} {:<5} {}",
            launch.id,
            truncate(&launch.mission_name, MISSION_WIDTH),
            launch.launch_year,
            launch.outcome_label(),
            width = MISSION_WIDTH
        ));
    }

    lines.push(format!(
        "{} launch{}",
        launches.len(),
        if launches.len() == 1 { "" } else { "es" }
    ));
    lines.join("\n")
}

pub fn launches_json(launches: &[LaunchRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(launches)?)
}

pub fn status(count: usize, location: &str, age: &str) -> String {
    format!(
        "Cached launches: {}\nDatabase:        {}\nLast refreshed:  {}",
        count, location, age
    )
}

/// Status text for a store, counted in SQL rather than loading every row
pub fn store_status(store: &LaunchDatabase) -> Result<String> {
    let count = store.count_launches()?;
    let age = CacheAge::describe(store.last_refreshed()?);
    let location = store
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in memory)".to_string());

    Ok(status(count, &location, &age))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn falcon_1() -> LaunchRecord {
        LaunchRecord::new("1", "Falcon 1", "2006", Some(false), None)
    }

    #[test]
    fn test_table_single_launch() {
        let table = launches_table(&[falcon_1()]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#     Mission"));
        assert!(lines[1].starts_with("1     Falcon 1"));
        assert!(lines[1].ends_with("2006  Failure"));
        assert_eq!(lines[2], "1 launch");
    }

    #[test]
    fn test_table_truncates_long_mission_names() {
        let launch = LaunchRecord::new(
            "73",
            "Iridium NEXT Mission 7 and GRACE-FO Rideshare",
            "2018",
            Some(true),
            None,
        );
        let table = launches_table(&[launch, falcon_1()]);

        assert!(table.contains("Iridium NEXT Mission 7 an..."));
        assert!(table.ends_with("2 launches"));
    }

    #[test]
    fn test_table_empty() {
        assert_eq!(launches_table(&[]), "No launches");
    }

    #[test]
    fn test_json_output() {
        let json = launches_json(&[falcon_1()]).expect("Serialize failed");
        let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");

        assert_eq!(value[0]["id"], "1");
        assert_eq!(value[0]["missionName"], "Falcon 1");
        assert_eq!(value[0]["launchSuccess"], false);
        assert!(value[0]["details"].is_null());
    }

    #[test]
    fn test_status() {
        let text = status(3, "/tmp/launches.db", "5m ago");
        assert_eq!(
            text,
            "Cached launches: 3\nDatabase:        /tmp/launches.db\nLast refreshed:  5m ago"
        );
    }

    #[test]
    fn test_store_status_empty() {
        let store = LaunchDatabase::open_memory().expect("Failed to open store");
        let text = store_status(&store).expect("Status failed");

        assert_eq!(
            text,
            "Cached launches: 0\nDatabase:        (in memory)\nLast refreshed:  never"
        );
    }

    #[test]
    fn test_store_status_counts_cached_launches() {
        let store = LaunchDatabase::open_memory().expect("Failed to open store");
        let demosat = LaunchRecord::new("2", "DemoSat", "2007", Some(false), None);
        store
            .replace_launches(&[falcon_1(), demosat])
            .expect("Replace failed");

        let text = store_status(&store).expect("Status failed");
        assert!(text.starts_with("Cached launches: 2\n"));
        assert!(text.ends_with("Last refreshed:  just now"));
    }
}
