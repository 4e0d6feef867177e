use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one task. Stored as a bare JSON number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    // Records written before timestamps existed fall back to the epoch.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub fn matches(self, item: &Item) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !item.completed,
            FilterMode::Completed => item.completed,
        }
    }

    /// Next mode in All -> Active -> Completed -> All order.
    pub fn cycle(self) -> Self {
        match self {
            FilterMode::All => FilterMode::Active,
            FilterMode::Active => FilterMode::Completed,
            FilterMode::Completed => FilterMode::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Active => "active",
            FilterMode::Completed => "completed",
        }
    }

    /// Message shown when nothing matches this filter.
    pub fn empty_message(self) -> String {
        match self {
            FilterMode::All => "No tasks yet!".to_string(),
            other => format!("No {} tasks", other.as_str()),
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "active" => Ok(FilterMode::Active),
            "completed" => Ok(FilterMode::Completed),
            other => Err(format!("invalid filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// The three items installed when storage holds no tasks.
pub fn seed_items(now: DateTime<Utc>) -> Vec<Item> {
    [("Learn React", true), ("Build Task Manager", false), ("Style with Tailwind CSS", false)]
        .into_iter()
        .zip(1..)
        .map(|((text, completed), id)| Item { id: ItemId(id), text: text.to_string(), completed, created_at: now })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_uses_camel_case_wire_format() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap().with_timezone(&Utc);
        let item = Item { id: ItemId(1714557600000), text: "Write tests".into(), completed: false, created_at };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, serde_json::json!({
            "id": 1714557600000i64,
            "text": "Write tests",
            "completed": false,
            "createdAt": "2024-05-01T10:00:00Z",
        }));
    }

    #[test]
    fn record_without_created_at_still_loads() {
        let item: Item = serde_json::from_str(r#"{"id":2,"text":"Build Task Manager","completed":false}"#).unwrap();
        assert_eq!(item.id, ItemId(2));
        assert_eq!(item.created_at, DateTime::<Utc>::default());
    }

    #[test]
    fn filter_parses_and_cycles() {
        assert_eq!("Active".parse::<FilterMode>().unwrap(), FilterMode::Active);
        assert!("done".parse::<FilterMode>().is_err());
        assert_eq!(FilterMode::Completed.cycle(), FilterMode::All);
        assert_eq!(FilterMode::Completed.empty_message(), "No completed tasks");
    }

    #[test]
    fn seeds_have_one_completed_item() {
        let seeds = seed_items(Utc::now());
        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds.iter().filter(|i| i.completed).map(|i| i.text.as_str()).collect::<Vec<_>>(), vec!["Learn React"]);
        assert_eq!(seeds.iter().map(|i| i.id.0).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
