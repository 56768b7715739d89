//! Chat session and message persistence.

use chrono::Utc;
use tracing::debug;

use leadgate_core::{ChatMessage, ChatSession};

use crate::{Store, StoreError};

impl Store {
    /// Fetch the session, creating it when unknown. Touches
    /// `last_activity` either way.
    pub async fn get_or_create_session(&self, id: &str) -> Result<ChatSession, StoreError> {
        let now = Utc::now();
        let session = sqlx::query_as::<_, ChatSession>(
            r#"
            INSERT INTO chat_sessions (id, created_at, last_activity)
            VALUES (?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET last_activity = excluded.last_activity
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    /// Append one user/bot exchange to a session.
    pub async fn append_message(
        &self,
        session_id: &str,
        user_message: &str,
        bot_response: &str,
        lead_score: u8,
    ) -> Result<ChatMessage, StoreError> {
        let now = Utc::now();
        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages
                (session_id, user_message, bot_response, lead_score, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(session_id)
        .bind(user_message)
        .bind(bot_response)
        .bind(i64::from(lead_score))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(session_id, score = lead_score, "chat message stored");
        Ok(message)
    }

    /// Most recent messages of a session, oldest first.
    pub async fn session_history(
        &self,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let mut messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT * FROM chat_messages
            WHERE session_id = ?
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(session_id)
        .bind(limit.max(1))
        .fetch_all(&self.pool)
        .await?;
        messages.reverse();
        Ok(messages)
    }

    /// All user text of a session joined together, for contact
    /// extraction over the whole conversation.
    pub async fn session_user_text(&self, session_id: &str) -> Result<String, StoreError> {
        let messages = self.session_history(session_id, 200).await?;
        Ok(messages
            .iter()
            .map(|m| m.user_message.as_str())
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// Recently active sessions.
    pub async fn list_sessions(&self, limit: i64) -> Result<Vec<ChatSession>, StoreError> {
        let sessions = sqlx::query_as::<_, ChatSession>(
            "SELECT * FROM chat_sessions ORDER BY last_activity DESC LIMIT ?",
        )
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_store;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = test_store().await;
        let first = store.get_or_create_session("s1").await.unwrap();
        let second = store.get_or_create_session("s1").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);

        let sessions = store.list_sessions(10).await.unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_history_order_and_limit() {
        let store = test_store().await;
        store.get_or_create_session("s1").await.unwrap();
        for i in 0..5 {
            store
                .append_message("s1", &format!("u{i}"), &format!("b{i}"), 30)
                .await
                .unwrap();
        }

        let history = store.session_history("s1", 3).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].user_message, "u2");
        assert_eq!(history[2].user_message, "u4");
    }

    #[tokio::test]
    async fn test_session_user_text_joins_messages() {
        let store = test_store().await;
        store.get_or_create_session("s1").await.unwrap();
        store
            .append_message("s1", "soy Juan", "hola Juan", 40)
            .await
            .unwrap();
        store
            .append_message("s1", "mi email es juan@mail.com", "anotado", 60)
            .await
            .unwrap();

        let text = store.session_user_text("s1").await.unwrap();
        assert_eq!(text, "soy Juan mi email es juan@mail.com");
    }
}
