//! Common Test Utilities
//!
//! In-memory implementations of the repository and store traits, plus a
//! recording fan-out, so service behavior can be exercised end to end
//! without Postgres or Redis.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;

use concord::domain::{
    BannedUser, Fanout, Friend, FriendRepository, FriendRequestItem, Guild, GuildRepository,
    InviteStore, Member, MemberProfile, MemberRepository, MemberSettings, Recipient, SocialEvent,
    User, UserRepository, REQUEST_INCOMING, REQUEST_OUTGOING,
};
use concord::shared::error::AppError;

pub fn user(id: i64) -> User {
    User {
        id,
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        image: format!("https://gravatar.com/avatar/{id}"),
        created_at: Utc::now(),
    }
}

pub fn guild(id: i64, owner_id: i64) -> Guild {
    Guild {
        id,
        name: format!("guild{id}"),
        owner_id,
        icon: None,
        created_at: Utc::now(),
    }
}

fn pair(a: i64, b: i64) -> (i64, i64) {
    (a.min(b), a.max(b))
}

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<i64, User>>,
}

impl InMemoryUsers {
    pub fn with(ids: &[i64]) -> Self {
        let repo = Self::default();
        {
            let mut users = repo.users.lock().unwrap();
            for &id in ids {
                users.insert(id, user(id));
            }
        }
        repo
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

/// In-memory guild repository.
#[derive(Default)]
pub struct InMemoryGuilds {
    guilds: Mutex<HashMap<i64, Guild>>,
}

impl InMemoryGuilds {
    pub fn with(guilds: Vec<Guild>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.guilds.lock().unwrap();
            for g in guilds {
                map.insert(g.id, g);
            }
        }
        repo
    }
}

#[async_trait]
impl GuildRepository for InMemoryGuilds {
    async fn find_by_id(&self, id: i64) -> Result<Option<Guild>, AppError> {
        Ok(self.guilds.lock().unwrap().get(&id).cloned())
    }
}

/// In-memory friend graph: normalized friendship pairs plus directed
/// pending requests. Each trait method takes the lock once, so the
/// conditional-write semantics match the SQL implementations.
#[derive(Default)]
pub struct InMemoryFriendGraph {
    state: Mutex<FriendState>,
    users: Mutex<HashMap<i64, User>>,
}

#[derive(Default)]
struct FriendState {
    friendships: HashSet<(i64, i64)>,
    requests: HashSet<(i64, i64)>,
}

impl InMemoryFriendGraph {
    pub fn with_users(ids: &[i64]) -> Self {
        let repo = Self::default();
        {
            let mut users = repo.users.lock().unwrap();
            for &id in ids {
                users.insert(id, user(id));
            }
        }
        repo
    }

    pub fn friendship_count(&self) -> usize {
        self.state.lock().unwrap().friendships.len()
    }

    pub fn pending_request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    fn profile(&self, id: i64) -> Friend {
        let users = self.users.lock().unwrap();
        let u = users.get(&id).cloned().unwrap_or_else(|| user(id));
        Friend {
            id: u.id,
            username: u.username,
            image: u.image,
        }
    }
}

#[async_trait]
impl FriendRepository for InMemoryFriendGraph {
    async fn friends_list(&self, user_id: i64) -> Result<Vec<Friend>, AppError> {
        let ids: Vec<i64> = {
            let state = self.state.lock().unwrap();
            state
                .friendships
                .iter()
                .filter_map(|&(a, b)| {
                    if a == user_id {
                        Some(b)
                    } else if b == user_id {
                        Some(a)
                    } else {
                        None
                    }
                })
                .collect()
        };
        Ok(ids.into_iter().map(|id| self.profile(id)).collect())
    }

    async fn request_list(&self, user_id: i64) -> Result<Vec<FriendRequestItem>, AppError> {
        let entries: Vec<(i64, u8)> = {
            let state = self.state.lock().unwrap();
            state
                .requests
                .iter()
                .filter_map(|&(sender, receiver)| {
                    if receiver == user_id {
                        Some((sender, REQUEST_INCOMING))
                    } else if sender == user_id {
                        Some((receiver, REQUEST_OUTGOING))
                    } else {
                        None
                    }
                })
                .collect()
        };
        Ok(entries
            .into_iter()
            .map(|(id, request_type)| {
                let p = self.profile(id);
                FriendRequestItem {
                    id: p.id,
                    username: p.username,
                    image: p.image,
                    request_type,
                }
            })
            .collect())
    }

    async fn is_friend(&self, a: i64, b: i64) -> Result<bool, AppError> {
        Ok(self.state.lock().unwrap().friendships.contains(&pair(a, b)))
    }

    async fn request_exists(&self, sender: i64, receiver: i64) -> Result<bool, AppError> {
        Ok(self.state.lock().unwrap().requests.contains(&(sender, receiver)))
    }

    async fn create_request(&self, sender: i64, receiver: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        if state.requests.contains(&(receiver, sender)) {
            return Ok(false);
        }
        Ok(state.requests.insert((sender, receiver)))
    }

    async fn delete_request(&self, sender: i64, receiver: i64) -> Result<bool, AppError> {
        Ok(self.state.lock().unwrap().requests.remove(&(sender, receiver)))
    }

    async fn accept_request(&self, requester: i64, acceptor: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        if !state.requests.remove(&(requester, acceptor)) {
            return Ok(false);
        }
        state.friendships.insert(pair(requester, acceptor));
        Ok(true)
    }

    async fn remove_friend(&self, a: i64, b: i64) -> Result<bool, AppError> {
        Ok(self.state.lock().unwrap().friendships.remove(&pair(a, b)))
    }
}

/// In-memory membership and ban store.
#[derive(Default)]
pub struct InMemoryMembers {
    members: Mutex<HashMap<(i64, i64), Member>>,
    bans: Mutex<HashSet<(i64, i64)>>,
    users: Mutex<HashMap<i64, User>>,
}

impl InMemoryMembers {
    pub fn with_users(ids: &[i64]) -> Self {
        let repo = Self::default();
        {
            let mut users = repo.users.lock().unwrap();
            for &id in ids {
                users.insert(id, user(id));
            }
        }
        repo
    }

    pub fn add_member(&self, guild_id: i64, user_id: i64) {
        self.members
            .lock()
            .unwrap()
            .insert((guild_id, user_id), Member::new(guild_id, user_id));
    }

    pub fn member_count(&self, guild_id: i64) -> usize {
        self.members
            .lock()
            .unwrap()
            .keys()
            .filter(|(g, _)| *g == guild_id)
            .count()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMembers {
    async fn is_member(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self.members.lock().unwrap().contains_key(&(guild_id, user_id)))
    }

    async fn create(&self, member: &Member) -> Result<bool, AppError> {
        let mut members = self.members.lock().unwrap();
        let key = (member.guild_id, member.user_id);
        if members.contains_key(&key) {
            return Ok(false);
        }
        members.insert(key, member.clone());
        Ok(true)
    }

    async fn delete(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .remove(&(guild_id, user_id))
            .is_some())
    }

    async fn member_ids(&self, guild_id: i64) -> Result<Vec<i64>, AppError> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .keys()
            .filter(|(g, _)| *g == guild_id)
            .map(|&(_, u)| u)
            .collect())
    }

    async fn guild_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .keys()
            .filter(|(_, u)| *u == user_id)
            .map(|&(g, _)| g)
            .collect())
    }

    async fn find_users_by_ids(
        &self,
        ids: &[i64],
        guild_id: i64,
    ) -> Result<Vec<MemberProfile>, AppError> {
        let members = self.members.lock().unwrap();
        let users = self.users.lock().unwrap();
        let mut profiles: Vec<MemberProfile> = ids
            .iter()
            .filter_map(|&id| {
                let member = members.get(&(guild_id, id))?;
                let u = users.get(&id).cloned().unwrap_or_else(|| user(id));
                Some(MemberProfile {
                    id: u.id,
                    username: u.username,
                    image: u.image,
                    nickname: member.nickname.clone(),
                    color: member.color.clone(),
                })
            })
            .collect();
        profiles.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(profiles)
    }

    async fn get_settings(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Option<MemberSettings>, AppError> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(&(guild_id, user_id))
            .map(|m| MemberSettings {
                nickname: m.nickname.clone(),
                color: m.color.clone(),
            }))
    }

    async fn update_settings(
        &self,
        guild_id: i64,
        user_id: i64,
        settings: &MemberSettings,
    ) -> Result<(), AppError> {
        let mut members = self.members.lock().unwrap();
        let member = members
            .get_mut(&(guild_id, user_id))
            .ok_or_else(|| AppError::NotFound("Member not found".into()))?;
        member.nickname = settings.nickname.clone();
        member.color = settings.color.clone();
        Ok(())
    }

    async fn update_last_seen(&self, guild_id: i64, user_id: i64) -> Result<(), AppError> {
        if let Some(member) = self.members.lock().unwrap().get_mut(&(guild_id, user_id)) {
            member.last_seen = Utc::now();
        }
        Ok(())
    }

    async fn create_ban(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self.bans.lock().unwrap().insert((guild_id, user_id)))
    }

    async fn delete_ban(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self.bans.lock().unwrap().remove(&(guild_id, user_id)))
    }

    async fn is_banned(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self.bans.lock().unwrap().contains(&(guild_id, user_id)))
    }

    async fn list_bans(&self, guild_id: i64) -> Result<Vec<BannedUser>, AppError> {
        let bans = self.bans.lock().unwrap();
        let users = self.users.lock().unwrap();
        let mut list: Vec<BannedUser> = bans
            .iter()
            .filter(|(g, _)| *g == guild_id)
            .map(|&(_, id)| {
                let u = users.get(&id).cloned().unwrap_or_else(|| user(id));
                BannedUser {
                    id: u.id,
                    username: u.username,
                    image: u.image,
                }
            })
            .collect();
        list.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(list)
    }
}

/// In-memory invite store honoring TTLs with wall-clock deadlines.
#[derive(Default)]
pub struct InMemoryInviteStore {
    tokens: Mutex<HashMap<String, (i64, Option<Instant>)>>,
}

impl InMemoryInviteStore {
    pub fn stored_token_count(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }
}

#[async_trait]
impl InviteStore for InMemoryInviteStore {
    async fn put(
        &self,
        token: &str,
        guild_id: i64,
        permanent: bool,
        ttl: Duration,
    ) -> Result<(), AppError> {
        let deadline = if permanent {
            None
        } else {
            Some(Instant::now() + ttl)
        };
        let mut tokens = self.tokens.lock().unwrap();
        let now = Instant::now();
        tokens.retain(|_, &mut (_, deadline)| match deadline {
            Some(d) => now < d,
            None => true,
        });
        tokens.insert(token.to_string(), (guild_id, deadline));
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<i64>, AppError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.get(token).and_then(|&(guild_id, deadline)| {
            match deadline {
                Some(d) if Instant::now() >= d => None,
                _ => Some(guild_id),
            }
        }))
    }

    async fn delete_all_for_guild(&self, guild_id: i64) -> Result<(), AppError> {
        self.tokens
            .lock()
            .unwrap()
            .retain(|_, &mut (g, _)| g != guild_id);
        Ok(())
    }
}

/// Fan-out that records every dispatched event for assertions.
#[derive(Default)]
pub struct RecordingFanout {
    events: Mutex<Vec<(Recipient, SocialEvent)>>,
}

impl RecordingFanout {
    pub fn events(&self) -> Vec<(Recipient, SocialEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_for(&self, recipient: Recipient) -> Vec<SocialEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == recipient)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.event_name())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl Fanout for RecordingFanout {
    fn emit(&self, recipient: Recipient, event: SocialEvent) {
        self.events.lock().unwrap().push((recipient, event));
    }
}
