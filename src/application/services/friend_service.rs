//! Friend Service
//!
//! Owns the friend-request lifecycle and the symmetric friend relation.
//!
//! The state machine per ordered pair (A, B) is
//! `NONE -> REQUESTED(A->B) -> FRIENDS -> NONE`. Only A can cancel a
//! pending request, only B can accept it. At most one request may exist
//! per unordered pair; sending a duplicate silently succeeds without
//! creating a second row.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Fanout, Friend, FriendRepository, FriendRequestItem, Recipient, SocialEvent, User,
    UserRepository, REQUEST_INCOMING,
};
use crate::shared::error::AppError;

/// Friend service trait defining the friend-graph operations.
#[async_trait]
pub trait FriendService: Send + Sync {
    /// Send a friend request from `actor_id` to `target_id`.
    async fn send_request(&self, actor_id: i64, target_id: i64) -> Result<(), FriendError>;

    /// Accept a pending request that `target_id` sent to `actor_id`.
    async fn accept_request(&self, actor_id: i64, target_id: i64) -> Result<(), FriendError>;

    /// Cancel a pending request the actor sent to `target_id`.
    async fn cancel_request(&self, actor_id: i64, target_id: i64) -> Result<(), FriendError>;

    /// Dissolve the friendship between the actor and `target_id`.
    async fn remove_friend(&self, actor_id: i64, target_id: i64) -> Result<(), FriendError>;

    /// List the actor's friends.
    async fn get_friends(&self, user_id: i64) -> Result<Vec<Friend>, FriendError>;

    /// List the actor's pending requests, incoming and outgoing.
    async fn get_requests(&self, user_id: i64) -> Result<Vec<FriendRequestItem>, FriendError>;
}

/// Friend service errors.
#[derive(Debug, thiserror::Error)]
pub enum FriendError {
    #[error("User not found")]
    NotFound,

    #[error("You cannot perform this action on yourself")]
    SelfAction,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for FriendError {
    fn from(err: AppError) -> Self {
        FriendError::Internal(err.to_string())
    }
}

/// Friend service implementation.
pub struct FriendServiceImpl<R, U, F>
where
    R: FriendRepository,
    U: UserRepository,
    F: Fanout,
{
    friend_repo: Arc<R>,
    user_repo: Arc<U>,
    fanout: Arc<F>,
}

impl<R, U, F> FriendServiceImpl<R, U, F>
where
    R: FriendRepository,
    U: UserRepository,
    F: Fanout,
{
    /// Create a new FriendServiceImpl.
    pub fn new(friend_repo: Arc<R>, user_repo: Arc<U>, fanout: Arc<F>) -> Self {
        Self {
            friend_repo,
            user_repo,
            fanout,
        }
    }

    async fn load_user(&self, id: i64) -> Result<User, FriendError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(FriendError::NotFound)
    }
}

#[async_trait]
impl<R, U, F> FriendService for FriendServiceImpl<R, U, F>
where
    R: FriendRepository + 'static,
    U: UserRepository + 'static,
    F: Fanout + 'static,
{
    async fn send_request(&self, actor_id: i64, target_id: i64) -> Result<(), FriendError> {
        if actor_id == target_id {
            return Err(FriendError::SelfAction);
        }

        let actor = self.load_user(actor_id).await?;
        self.load_user(target_id).await?;

        // Already friends, or a request pending in either direction:
        // silent success, nothing to persist or notify.
        if self.friend_repo.is_friend(actor_id, target_id).await? {
            return Ok(());
        }
        if self.friend_repo.request_exists(actor_id, target_id).await?
            || self.friend_repo.request_exists(target_id, actor_id).await?
        {
            return Ok(());
        }

        let created = self.friend_repo.create_request(actor_id, target_id).await?;

        if created {
            self.fanout.emit(
                Recipient::User(target_id),
                SocialEvent::FriendRequestReceived(FriendRequestItem {
                    id: actor.id,
                    username: actor.username,
                    image: actor.image,
                    request_type: REQUEST_INCOMING,
                }),
            );
        }

        Ok(())
    }

    async fn accept_request(&self, actor_id: i64, target_id: i64) -> Result<(), FriendError> {
        if actor_id == target_id {
            return Err(FriendError::SelfAction);
        }

        let actor = self.load_user(actor_id).await?;
        self.load_user(target_id).await?;

        // Acceptance only succeeds for the addressed party: the stored
        // request must point target -> actor. A missing request (never
        // sent, cancelled, or lost to a concurrent accept) is a no-op.
        let accepted = self.friend_repo.accept_request(target_id, actor_id).await?;

        if accepted {
            self.fanout.emit(
                Recipient::User(target_id),
                SocialEvent::FriendAdded(Friend {
                    id: actor.id,
                    username: actor.username,
                    image: actor.image,
                }),
            );
        }

        Ok(())
    }

    async fn cancel_request(&self, actor_id: i64, target_id: i64) -> Result<(), FriendError> {
        if actor_id == target_id {
            return Err(FriendError::SelfAction);
        }

        self.load_user(actor_id).await?;
        self.load_user(target_id).await?;

        // The target was never notified of a cancellation, so no fanout.
        self.friend_repo.delete_request(actor_id, target_id).await?;

        Ok(())
    }

    async fn remove_friend(&self, actor_id: i64, target_id: i64) -> Result<(), FriendError> {
        if actor_id == target_id {
            return Err(FriendError::SelfAction);
        }

        self.load_user(actor_id).await?;
        self.load_user(target_id).await?;

        let removed = self.friend_repo.remove_friend(actor_id, target_id).await?;

        if removed {
            self.fanout.emit(
                Recipient::User(target_id),
                SocialEvent::FriendRemoved { user_id: actor_id },
            );
        }

        Ok(())
    }

    async fn get_friends(&self, user_id: i64) -> Result<Vec<Friend>, FriendError> {
        self.load_user(user_id).await?;
        Ok(self.friend_repo.friends_list(user_id).await?)
    }

    async fn get_requests(&self, user_id: i64) -> Result<Vec<FriendRequestItem>, FriendError> {
        self.load_user(user_id).await?;
        Ok(self.friend_repo.request_list(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockFanout, MockFriendRepository, MockUserRepository};
    use chrono::Utc;

    fn user(id: i64, name: &str) -> User {
        User {
            id,
            username: name.to_string(),
            email: format!("{name}@example.com"),
            image: format!("https://gravatar.com/avatar/{name}"),
            created_at: Utc::now(),
        }
    }

    fn service(
        friend_repo: MockFriendRepository,
        user_repo: MockUserRepository,
        fanout: MockFanout,
    ) -> FriendServiceImpl<MockFriendRepository, MockUserRepository, MockFanout> {
        FriendServiceImpl::new(Arc::new(friend_repo), Arc::new(user_repo), Arc::new(fanout))
    }

    #[tokio::test]
    async fn send_request_to_self_is_rejected_before_any_read() {
        let svc = service(
            MockFriendRepository::new(),
            MockUserRepository::new(),
            MockFanout::new(),
        );

        let err = svc.send_request(1, 1).await.unwrap_err();
        assert!(matches!(err, FriendError::SelfAction));
    }

    #[tokio::test]
    async fn send_request_to_unknown_user_is_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|id| Ok((id == 1).then(|| user(1, "alice"))));

        let svc = service(MockFriendRepository::new(), user_repo, MockFanout::new());

        let err = svc.send_request(1, 2).await.unwrap_err();
        assert!(matches!(err, FriendError::NotFound));
    }

    #[tokio::test]
    async fn send_request_persists_then_notifies_target() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, if id == 1 { "alice" } else { "bob" }))));

        let mut friend_repo = MockFriendRepository::new();
        friend_repo.expect_is_friend().returning(|_, _| Ok(false));
        friend_repo
            .expect_request_exists()
            .returning(|_, _| Ok(false));
        friend_repo
            .expect_create_request()
            .withf(|s, r| *s == 1 && *r == 2)
            .times(1)
            .returning(|_, _| Ok(true));

        let mut fanout = MockFanout::new();
        fanout
            .expect_emit()
            .withf(|to, event| {
                *to == Recipient::User(2)
                    && matches!(
                        event,
                        SocialEvent::FriendRequestReceived(item)
                            if item.id == 1 && item.request_type == REQUEST_INCOMING
                    )
            })
            .times(1)
            .return_const(());

        let svc = service(friend_repo, user_repo, fanout);
        svc.send_request(1, 2).await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_send_is_a_silent_noop_without_fanout() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "u"))));

        let mut friend_repo = MockFriendRepository::new();
        friend_repo.expect_is_friend().returning(|_, _| Ok(false));
        // A pending request already exists in the opposite direction.
        friend_repo
            .expect_request_exists()
            .returning(|s, _| Ok(s == 2));
        friend_repo.expect_create_request().never();

        let fanout = MockFanout::new();

        let svc = service(friend_repo, user_repo, fanout);
        svc.send_request(1, 2).await.unwrap();
    }

    #[tokio::test]
    async fn send_request_between_friends_is_a_noop() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "u"))));

        let mut friend_repo = MockFriendRepository::new();
        friend_repo.expect_is_friend().returning(|_, _| Ok(true));
        friend_repo.expect_create_request().never();

        let svc = service(friend_repo, user_repo, MockFanout::new());
        svc.send_request(1, 2).await.unwrap();
    }

    #[tokio::test]
    async fn accept_notifies_the_original_requester() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, if id == 2 { "bob" } else { "alice" }))));

        let mut friend_repo = MockFriendRepository::new();
        // Request was 1 -> 2, so accepting actor 2 consumes (requester=1, acceptor=2).
        friend_repo
            .expect_accept_request()
            .withf(|requester, acceptor| *requester == 1 && *acceptor == 2)
            .times(1)
            .returning(|_, _| Ok(true));

        let mut fanout = MockFanout::new();
        fanout
            .expect_emit()
            .withf(|to, event| {
                *to == Recipient::User(1)
                    && matches!(event, SocialEvent::FriendAdded(f) if f.id == 2)
            })
            .times(1)
            .return_const(());

        let svc = service(friend_repo, user_repo, fanout);
        svc.accept_request(2, 1).await.unwrap();
    }

    #[tokio::test]
    async fn accept_without_pending_request_is_a_silent_noop() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "u"))));

        let mut friend_repo = MockFriendRepository::new();
        friend_repo
            .expect_accept_request()
            .returning(|_, _| Ok(false));

        // The race loser must not emit anything.
        let fanout = MockFanout::new();

        let svc = service(friend_repo, user_repo, fanout);
        svc.accept_request(2, 1).await.unwrap();
    }

    #[tokio::test]
    async fn remove_friend_when_not_friends_is_a_noop() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "u"))));

        let mut friend_repo = MockFriendRepository::new();
        friend_repo.expect_remove_friend().returning(|_, _| Ok(false));

        let svc = service(friend_repo, user_repo, MockFanout::new());
        svc.remove_friend(1, 2).await.unwrap();
    }

    #[tokio::test]
    async fn remove_friend_notifies_the_removed_party() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "u"))));

        let mut friend_repo = MockFriendRepository::new();
        friend_repo.expect_remove_friend().returning(|_, _| Ok(true));

        let mut fanout = MockFanout::new();
        fanout
            .expect_emit()
            .withf(|to, event| {
                *to == Recipient::User(2)
                    && matches!(event, SocialEvent::FriendRemoved { user_id: 1 })
            })
            .times(1)
            .return_const(());

        let svc = service(friend_repo, user_repo, fanout);
        svc.remove_friend(1, 2).await.unwrap();
    }

    #[tokio::test]
    async fn cancel_request_never_emits() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "u"))));

        let mut friend_repo = MockFriendRepository::new();
        friend_repo
            .expect_delete_request()
            .withf(|s, r| *s == 1 && *r == 2)
            .times(1)
            .returning(|_, _| Ok(true));

        let fanout = MockFanout::new();

        let svc = service(friend_repo, user_repo, fanout);
        svc.cancel_request(1, 2).await.unwrap();
    }

    #[tokio::test]
    async fn persistence_failure_suppresses_fanout() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "u"))));

        let mut friend_repo = MockFriendRepository::new();
        friend_repo.expect_is_friend().returning(|_, _| Ok(false));
        friend_repo
            .expect_request_exists()
            .returning(|_, _| Ok(false));
        friend_repo
            .expect_create_request()
            .returning(|_, _| Err(AppError::Internal("connection reset".into())));

        let fanout = MockFanout::new();

        let svc = service(friend_repo, user_repo, fanout);
        let err = svc.send_request(1, 2).await.unwrap_err();
        assert!(matches!(err, FriendError::Internal(_)));
    }
}
