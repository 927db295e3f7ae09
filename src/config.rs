use std::collections::HashMap;
use std::fs;

use chrono::TimeDelta;

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if (value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\''))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    // MAX_EVENT_DURATION_HOURS, if set and numeric. Anything else falls back
    // to the compiler default.
    pub fn max_event_duration(&self) -> Option<TimeDelta> {
        self.get("MAX_EVENT_DURATION_HOURS")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|hours| *hours > 0)
            .map(TimeDelta::hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_export_lines_and_quotes() {
        let dir = std::env::temp_dir().join(format!("calendarbot_cfg_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.env");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "export OPENAI_API_KEY=\"sk-test\"").unwrap();
        writeln!(file, "DEFAULT_TIME_ZONE='America/New_York'").unwrap();
        writeln!(file, "MAX_EVENT_DURATION_HOURS=8").unwrap();

        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.get("OPENAI_API_KEY").as_deref(), Some("sk-test"));
        assert_eq!(
            config.get("DEFAULT_TIME_ZONE").as_deref(),
            Some("America/New_York")
        );
        assert_eq!(config.max_event_duration(), Some(TimeDelta::hours(8)));
    }
}
