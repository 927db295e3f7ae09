use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DAILY" => Some(Frequency::Daily),
            "WEEKLY" => Some(Frequency::Weekly),
            "MONTHLY" => Some(Frequency::Monthly),
            "YEARLY" => Some(Frequency::Yearly),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// RFC 5545 two-letter weekday codes. Ordered Monday-first so a BTreeSet
// renders in week order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Weekday {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl Weekday {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MO" => Some(Weekday::Mo),
            "TU" => Some(Weekday::Tu),
            "WE" => Some(Weekday::We),
            "TH" => Some(Weekday::Th),
            "FR" => Some(Weekday::Fr),
            "SA" => Some(Weekday::Sa),
            "SU" => Some(Weekday::Su),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Mo => "MO",
            Weekday::Tu => "TU",
            Weekday::We => "WE",
            Weekday::Th => "TH",
            Weekday::Fr => "FR",
            Weekday::Sa => "SA",
            Weekday::Su => "SU",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A normalized recurrence rule. At most one of `count`/`until` is set and
/// `by_month_day` only appears with `Frequency::Monthly`; the normalizer
/// rejects anything else before this struct is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default)]
    pub by_day: BTreeSet<Weekday>,
    pub by_month_day: Option<u8>,
    pub count: Option<u32>,
    pub until: Option<DateTime<Utc>>,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            by_day: BTreeSet::new(),
            by_month_day: None,
            count: None,
            until: None,
        }
    }
}

// Canonical RFC 5545 rendering. Feeding this back through the normalizer
// yields an equal rule.
impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.frequency)?;
        if !self.by_day.is_empty() {
            let days: Vec<&str> = self.by_day.iter().map(|d| d.code()).collect();
            write!(f, ";BYDAY={}", days.join(","))?;
        }
        if let Some(day) = self.by_month_day {
            write!(f, ";BYMONTHDAY={}", day)?;
        }
        if let Some(count) = self.count {
            write!(f, ";COUNT={}", count)?;
        }
        if let Some(until) = self.until {
            write!(f, ";UNTIL={}", until.format("%Y%m%dT%H%M%SZ"))?;
        }
        Ok(())
    }
}
