use serde::{Deserialize, Serialize};

/// A single rocket launch.
///
/// `id` doubles as the API key and the cache primary key. Records are never
/// mutated; a reload replaces the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub id: String,
    #[serde(rename = "missionName")]
    pub mission_name: String,
    #[serde(rename = "launchYear")]
    pub launch_year: String,
    #[serde(rename = "launchSuccess")]
    pub launch_success: Option<bool>,
    pub details: Option<String>,
}

impl LaunchRecord {
    pub fn new(
        id: impl Into<String>,
        mission_name: impl Into<String>,
        launch_year: impl Into<String>,
        launch_success: Option<bool>,
        details: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            mission_name: mission_name.into(),
            launch_year: launch_year.into(),
            launch_success,
            details,
        }
    }

    pub fn outcome_label(&self) -> &'static str {
        match self.launch_success {
            Some(true) => "Success",
            Some(false) => "Failure",
            None => "Unknown",
        }
    }

    pub fn details_display(&self) -> &str {
        self.details.as_deref().filter(|d| !d.is_empty()).unwrap_or("-")
    }
}

/// Launch as returned by `GET /v3/launches`. Unlisted fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiLaunch {
    pub flight_number: i64,
    pub mission_name: Option<String>,
    pub launch_year: Option<String>,
    pub launch_success: Option<bool>,
    pub details: Option<String>,
}

impl ApiLaunch {
    pub fn to_record(&self) -> LaunchRecord {
        LaunchRecord {
            id: self.flight_number.to_string(),
            mission_name: self.mission_name.clone().unwrap_or_default(),
            launch_year: self.launch_year.clone().unwrap_or_default(),
            launch_success: self.launch_success,
            details: self.details.clone(),
        }
    }
}
