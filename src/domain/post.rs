use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A remote record as it arrives; text fields may be missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        let title = raw.title.filter(|t| !t.is_empty()).unwrap_or_else(|| format!("Post Title {}", raw.id));
        let body = raw.body.filter(|b| !b.is_empty()).unwrap_or_else(|| {
            format!("This is the content for post {}. This post was created by user {}.", raw.id, raw.user_id)
        });
        Post { id: raw.id, user_id: raw.user_id, title, body }
    }
}

impl Post {
    /// Case-insensitive substring match on title or body.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.body.to_lowercase().contains(&term)
    }
}

/// Source of fixed-size pages of remote records, numbered from 1.
#[async_trait]
pub trait PostSource: Send + Sync + 'static {
    async fn fetch_page(&self, page: u32, limit: u32) -> anyhow::Result<Vec<RawPost>>;
}
