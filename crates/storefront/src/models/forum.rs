//! Forum topics and replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toiletpro_core::UserId;

/// Category used when a topic is created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Number of characters of topic content shown in the forum listing.
const EXCERPT_CHARS: usize = 150;

/// A forum topic with its replies embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumTopic {
    /// Time-ordered unique token.
    pub id: String,
    pub user_id: UserId,
    pub user_name: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub replies: Vec<ForumReply>,
    #[serde(default)]
    pub last_reply: Option<DateTime<Utc>>,
}

/// A reply to a forum topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumReply {
    pub id: String,
    pub user_id: UserId,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ForumTopic {
    /// Most recent activity: the last reply, or creation when there are none.
    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_reply.unwrap_or(self.created_at)
    }

    #[must_use]
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// The first 150 characters of the content, with `...` when truncated.
    #[must_use]
    pub fn excerpt(&self) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    /// Creation date as shown in the listing, e.g. `Mar 4, 2026`.
    #[must_use]
    pub fn posted_on(&self) -> String {
        self.created_at.format("%b %-d, %Y").to_string()
    }

    /// Creation time as shown on the topic page, e.g. `March 4, 2026, 3:07 pm`.
    #[must_use]
    pub fn posted_at(&self) -> String {
        format_long(self.created_at)
    }

    /// Last reply date for the listing.
    #[must_use]
    pub fn last_activity_label(&self) -> String {
        self.last_reply.map_or_else(
            || "No replies yet".to_string(),
            |at| at.format("%b %-d, %Y").to_string(),
        )
    }

    /// Whether `user_id` wrote this topic.
    #[must_use]
    pub fn is_author(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

impl ForumReply {
    /// Uppercased first letter of the author's name.
    #[must_use]
    pub fn author_initial(&self) -> String {
        self.user_name
            .chars()
            .next()
            .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
    }

    #[must_use]
    pub fn posted_at(&self) -> String {
        format_long(self.created_at)
    }
}

fn format_long(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y, %-I:%M %P").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn topic(content: &str) -> ForumTopic {
        ForumTopic {
            id: "0190".to_string(),
            user_id: UserId::new(1),
            user_name: "mike".to_string(),
            title: "Leaky flapper".to_string(),
            content: content.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 4, 15, 7, 0).unwrap(),
            views: 0,
            replies: Vec::new(),
            last_reply: None,
        }
    }

    #[test]
    fn test_excerpt_truncates_at_150_chars() {
        let short = topic("Short post");
        assert_eq!(short.excerpt(), "Short post");

        let exact = topic(&"x".repeat(150));
        assert_eq!(exact.excerpt().len(), 150);

        let long = topic(&"é".repeat(200));
        let excerpt = long.excerpt();
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 153);
    }

    #[test]
    fn test_last_activity_falls_back_to_created_at() {
        let mut t = topic("body");
        assert_eq!(t.last_activity(), t.created_at);
        assert_eq!(t.last_activity_label(), "No replies yet");

        let replied = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
        t.last_reply = Some(replied);
        assert_eq!(t.last_activity(), replied);
        assert_eq!(t.last_activity_label(), "Mar 5, 2026");
    }

    #[test]
    fn test_date_formats() {
        let t = topic("body");
        assert_eq!(t.posted_on(), "Mar 4, 2026");
        assert_eq!(t.posted_at(), "March 4, 2026, 3:07 pm");
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{
            "id": "abc",
            "user_id": 2,
            "user_name": "sarah",
            "title": "Hello",
            "content": "World",
            "category": "General",
            "created_at": "2026-01-02T03:04:05Z"
        }"#;
        let t: ForumTopic = serde_json::from_str(json).unwrap();
        assert_eq!(t.views, 0);
        assert_eq!(t.reply_count(), 0);
        assert!(t.last_reply.is_none());
    }
}
