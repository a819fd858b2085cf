//! Notification service.

use bloodlink_common::{AppError, AppResult, IdGenerator};
use bloodlink_db::{
    entities::notification::{self, NotificationType},
    repositories::NotificationRepository,
};
use sea_orm::{ConnectionTrait, Set};
use serde::Serialize;
use tracing::info;

use crate::matching::NotificationDraft;

/// Inbox totals for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    pub total: u64,
    pub unread: u64,
}

/// Notification service: writes notifications and serves a user's inbox.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a single notification.
    pub async fn create(
        &self,
        user_id: &str,
        notification_type: NotificationType,
        related_id: Option<&str>,
        message: &str,
    ) -> AppResult<notification::Model> {
        let draft = NotificationDraft {
            user_id: user_id.to_string(),
            notification_type,
            related_id: related_id.map(ToString::to_string),
            message: message.to_string(),
        };
        self.notification_repo.create(self.active_model(draft)).await
    }

    /// Write `drafts` on `conn`, typically the caller's open transaction.
    pub async fn apply_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        drafts: Vec<NotificationDraft>,
    ) -> AppResult<u64> {
        let models = drafts
            .into_iter()
            .map(|draft| self.active_model(draft))
            .collect();
        self.notification_repo.create_many_in(conn, models).await
    }

    fn active_model(&self, draft: NotificationDraft) -> notification::ActiveModel {
        notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(draft.user_id),
            notification_type: Set(draft.notification_type),
            related_id: Set(draft.related_id),
            message: Set(draft.message),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        }
    }

    /// All of a user's notifications, newest first.
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_by_user(user_id, false).await
    }

    /// A user's unread notifications, newest first.
    pub async fn list_unread(&self, user_id: &str) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_by_user(user_id, true).await
    }

    /// Count a user's unread notifications.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }

    /// Mark one of the user's notifications as read.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        self.get_owned(user_id, notification_id).await?;
        self.notification_repo.mark_as_read(notification_id).await
    }

    /// Mark all of the user's notifications as read.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        let count = self.notification_repo.mark_all_as_read(user_id).await?;
        info!(user_id = %user_id, count, "Marked notifications as read");
        Ok(count)
    }

    /// Delete one of the user's notifications.
    pub async fn delete(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        self.get_owned(user_id, notification_id).await?;
        self.notification_repo.delete(notification_id).await
    }

    /// Total and unread counts for a user.
    pub async fn summary(&self, user_id: &str) -> AppResult<NotificationSummary> {
        let total = self.notification_repo.count_by_user(user_id).await?;
        let unread = self.notification_repo.count_unread(user_id).await?;
        Ok(NotificationSummary { total, unread })
    }

    async fn get_owned(
        &self,
        user_id: &str,
        notification_id: &str,
    ) -> AppResult<notification::Model> {
        let notification = self
            .notification_repo
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| AppError::not_found("notification", notification_id))?;

        if notification.user_id != user_id {
            return Err(AppError::Forbidden(
                "Notification belongs to another user".to_string(),
            ));
        }
        Ok(notification)
    }
}
