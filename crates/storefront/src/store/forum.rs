//! Forum topics kept in `forum_topics.json`, replies embedded in their topic.

use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use toiletpro_core::UserId;

use super::{JsonFile, StoreError};
use crate::models::{ForumReply, ForumTopic};

/// File name of the forum inside the data directory.
pub const FILE_NAME: &str = "forum_topics.json";

/// Input for a new topic.
#[derive(Debug, Clone)]
pub struct NewTopic {
    pub user_id: UserId,
    pub user_name: String,
    pub title: String,
    pub content: String,
    pub category: String,
}

/// Topic and reply storage.
pub struct ForumStore {
    file: JsonFile<ForumTopic>,
}

impl ForumStore {
    /// Open the forum inside `data_dir`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join(FILE_NAME)),
        }
    }

    /// All topics, most recently active first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or parsed.
    pub async fn list_recent(&self) -> Result<Vec<ForumTopic>, StoreError> {
        let mut topics = self.file.load().await?;
        topics.sort_by_key(|topic| std::cmp::Reverse(topic.last_activity()));
        Ok(topics)
    }

    /// Look up one topic.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or parsed.
    pub async fn get(&self, id: &str) -> Result<Option<ForumTopic>, StoreError> {
        Ok(self
            .file
            .load()
            .await?
            .into_iter()
            .find(|topic| topic.id == id))
    }

    /// Append a topic with no replies.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read, parsed or written.
    pub async fn create_topic(&self, new: NewTopic) -> Result<ForumTopic, StoreError> {
        let topic = ForumTopic {
            id: new_token(),
            user_id: new.user_id,
            user_name: new.user_name,
            title: new.title,
            content: new.content,
            category: new.category,
            created_at: Utc::now(),
            views: 0,
            replies: Vec::new(),
            last_reply: None,
        };

        self.file.append(topic.clone()).await?;
        tracing::info!(topic_id = %topic.id, "Forum topic created");
        Ok(topic)
    }

    /// Append a reply to the topic with `topic_id` and bump its `last_reply`.
    /// Returns `None` when the topic does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read, parsed or written.
    pub async fn add_reply(
        &self,
        topic_id: &str,
        user_id: UserId,
        user_name: String,
        content: String,
    ) -> Result<Option<ForumReply>, StoreError> {
        self.file
            .update(|topics| {
                let topic = topics.iter_mut().find(|t| t.id == topic_id)?;
                let reply = ForumReply {
                    id: new_token(),
                    user_id,
                    user_name,
                    content,
                    created_at: Utc::now(),
                };
                topic.last_reply = Some(reply.created_at);
                topic.replies.push(reply.clone());
                Some(reply)
            })
            .await
    }
}

/// Time-ordered unique token.
fn new_token() -> String {
    Uuid::now_v7().simple().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_topic(title: &str) -> NewTopic {
        NewTopic {
            user_id: UserId::new(1),
            user_name: "Mike".to_string(),
            title: title.to_string(),
            content: format!("{title} body"),
            category: "General".to_string(),
        }
    }

    #[tokio::test]
    async fn test_new_topic_is_listed_with_zero_replies() {
        let dir = tempfile::tempdir().unwrap();
        let forum = ForumStore::new(dir.path());

        let topic = forum.create_topic(new_topic("Running toilet")).await.unwrap();

        let topics = forum.list_recent().await.unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].id, topic.id);
        assert_eq!(topics[0].reply_count(), 0);
        assert_eq!(topics[0].views, 0);
        assert!(topics[0].last_reply.is_none());
    }

    #[tokio::test]
    async fn test_reply_sets_last_reply_and_reorders() {
        let dir = tempfile::tempdir().unwrap();
        let forum = ForumStore::new(dir.path());

        let older = forum.create_topic(new_topic("Older")).await.unwrap();
        let newer = forum.create_topic(new_topic("Newer")).await.unwrap();

        let reply = forum
            .add_reply(&older.id, UserId::new(2), "Sarah".to_string(), "Try a new flapper".to_string())
            .await
            .unwrap()
            .unwrap();

        let stored = forum.get(&older.id).await.unwrap().unwrap();
        assert_eq!(stored.reply_count(), 1);
        assert_eq!(stored.replies[0], reply);
        assert_eq!(stored.last_reply, Some(reply.created_at));

        let ids: Vec<_> = forum
            .list_recent()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![older.id, newer.id]);
    }

    #[tokio::test]
    async fn test_reply_to_missing_topic() {
        let dir = tempfile::tempdir().unwrap();
        let forum = ForumStore::new(dir.path());

        let missing = forum
            .add_reply("nope", UserId::new(2), "Sarah".to_string(), "Hello".to_string())
            .await
            .unwrap();
        assert!(missing.is_none());
        assert!(!dir.path().join(FILE_NAME).exists());

        forum.create_topic(new_topic("Only")).await.unwrap();
        assert!(forum.get("nope").await.unwrap().is_none());
    }

    #[test]
    fn test_tokens_are_time_ordered() {
        let first = new_token();
        let second = new_token();
        assert_eq!(first.len(), 32);
        assert!(first < second);
    }
}
