//! In-memory fakes of the game API and the guild service.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use warbot_core::report::Report;
use warbot_core::types::{ChannelId, MemberId, RoleId};
use warbot_gameapi::{
    Country, GameApi, GameApiError, GameUser, Government, Leveling, SearchResult, Skill,
    UserResolver,
};
use warbot_guild::{GuildError, GuildService, Member};

pub const CITIZEN: RoleId = 1;
pub const ECONOMY: RoleId = 2;
pub const FIGHT: RoleId = 3;
pub const REPORTS: ChannelId = 900;

// ---------------------------------------------------------------------------
// Game API
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeGame {
    users: Mutex<HashMap<String, GameUser>>,
    failing_names: Mutex<HashSet<String>>,
    /// Names the search finds but whose account fetch fails.
    failing_fetches: Mutex<HashSet<String>>,
    countries: Mutex<Vec<Country>>,
    governments: Mutex<HashMap<String, Government>>,
    failing_governments: Mutex<HashSet<String>>,
    pub list_countries_calls: AtomicUsize,
}

impl FakeGame {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, user: GameUser) {
        self.users
            .lock()
            .unwrap()
            .insert(user.username.clone(), user);
    }

    pub fn fail_lookups_for(&self, name: &str) {
        self.failing_names.lock().unwrap().insert(name.to_string());
    }

    pub fn fail_fetches_for(&self, name: &str) {
        self.failing_fetches.lock().unwrap().insert(name.to_string());
    }

    pub fn add_country(&self, id: &str, name: &str, government: serde_json::Value) {
        self.countries.lock().unwrap().push(Country {
            id: id.to_string(),
            name: name.to_string(),
        });
        self.governments
            .lock()
            .unwrap()
            .insert(id.to_string(), serde_json::from_value(government).unwrap());
    }

    pub fn fail_government_for(&self, country_id: &str) {
        self.failing_governments
            .lock()
            .unwrap()
            .insert(country_id.to_string());
    }

    pub fn resolver(self: &Arc<Self>) -> Arc<UserResolver> {
        Arc::new(UserResolver::new(self.clone()))
    }
}

fn unavailable() -> GameApiError {
    GameApiError::ApiError {
        status: 503,
        body: "unavailable".into(),
    }
}

#[async_trait]
impl GameApi for FakeGame {
    async fn search_user(&self, display_name: &str) -> Result<Option<SearchResult>, GameApiError> {
        if self.failing_names.lock().unwrap().contains(display_name) {
            return Err(unavailable());
        }
        if self.failing_fetches.lock().unwrap().contains(display_name) {
            return Ok(Some(SearchResult {
                has_data: true,
                user_ids: vec![format!("id-{display_name}")],
            }));
        }
        let users = self.users.lock().unwrap();
        Ok(Some(match users.get(display_name) {
            Some(user) => SearchResult {
                has_data: true,
                user_ids: vec![user.id.clone()],
            },
            None => SearchResult::default(),
        }))
    }

    async fn get_user_lite(&self, user_id: &str) -> Result<Option<GameUser>, GameApiError> {
        let failing = self
            .failing_fetches
            .lock()
            .unwrap()
            .iter()
            .any(|name| format!("id-{name}") == user_id);
        if failing {
            return Err(unavailable());
        }
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.id == user_id).cloned())
    }

    async fn list_countries(&self) -> Result<Vec<Country>, GameApiError> {
        self.list_countries_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.countries.lock().unwrap().clone())
    }

    async fn get_country_government(
        &self,
        country_id: &str,
    ) -> Result<Option<Government>, GameApiError> {
        if self.failing_governments.lock().unwrap().contains(country_id) {
            return Err(unavailable());
        }
        Ok(self.governments.lock().unwrap().get(country_id).cloned())
    }
}

/// A player with the given skill levels.
pub fn player(
    username: &str,
    skills: &[(&str, u64)],
    total_skill_points: u64,
    available_skill_points: u64,
) -> GameUser {
    GameUser {
        id: format!("id-{username}"),
        username: username.to_string(),
        skills: skills
            .iter()
            .map(|(name, level)| (name.to_string(), Skill { level: *level }))
            .collect(),
        leveling: Leveling {
            total_skill_points,
            available_skill_points,
        },
        military_unit_id: None,
    }
}

/// A government payload with the vacant key set.
pub fn vacant_government() -> serde_json::Value {
    serde_json::json!({"_id": "g", "country": "c", "__v": 0, "congressMembers": []})
}

// ---------------------------------------------------------------------------
// Guild
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleCall {
    Add {
        member: MemberId,
        roles: Vec<RoleId>,
        reason: String,
    },
    Remove {
        member: MemberId,
        roles: Vec<RoleId>,
        reason: String,
    },
}

#[derive(Default)]
pub struct FakeGuild {
    members: Mutex<Vec<Member>>,
    calls: Mutex<Vec<RoleCall>>,
    reports: Mutex<Vec<(ChannelId, Report)>>,
    failing_members: Mutex<HashSet<MemberId>>,
}

impl FakeGuild {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_member(&self, id: MemberId, display_name: &str, roles: &[RoleId]) {
        self.members.lock().unwrap().push(Member {
            id,
            display_name: display_name.to_string(),
            roles: roles.iter().copied().collect::<BTreeSet<_>>(),
        });
    }

    pub fn roles_of(&self, id: MemberId) -> BTreeSet<RoleId> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.roles.clone())
            .unwrap_or_default()
    }

    pub fn fail_mutations_for(&self, id: MemberId) {
        self.failing_members.lock().unwrap().insert(id);
    }

    pub fn heal(&self, id: MemberId) {
        self.failing_members.lock().unwrap().remove(&id);
    }

    pub fn calls(&self) -> Vec<RoleCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<(ChannelId, Report)> {
        self.reports.lock().unwrap().clone()
    }

    fn check(&self, member: MemberId) -> Result<(), GuildError> {
        if self.failing_members.lock().unwrap().contains(&member) {
            return Err(GuildError::ApiError {
                status: 403,
                body: "Missing Permissions".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GuildService for FakeGuild {
    async fn members_with_role(&self, role: RoleId) -> Result<Vec<Member>, GuildError> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.has_role(role))
            .cloned()
            .collect())
    }

    async fn add_roles(
        &self,
        member: MemberId,
        roles: &[RoleId],
        reason: &str,
    ) -> Result<(), GuildError> {
        self.check(member)?;
        self.calls.lock().unwrap().push(RoleCall::Add {
            member,
            roles: roles.to_vec(),
            reason: reason.to_string(),
        });
        if let Some(m) = self.members.lock().unwrap().iter_mut().find(|m| m.id == member) {
            m.roles.extend(roles.iter().copied());
        }
        Ok(())
    }

    async fn remove_roles(
        &self,
        member: MemberId,
        roles: &[RoleId],
        reason: &str,
    ) -> Result<(), GuildError> {
        self.check(member)?;
        self.calls.lock().unwrap().push(RoleCall::Remove {
            member,
            roles: roles.to_vec(),
            reason: reason.to_string(),
        });
        if let Some(m) = self.members.lock().unwrap().iter_mut().find(|m| m.id == member) {
            for role in roles {
                m.roles.remove(role);
            }
        }
        Ok(())
    }

    async fn post_report(&self, channel: ChannelId, report: &Report) -> Result<(), GuildError> {
        self.reports.lock().unwrap().push((channel, report.clone()));
        Ok(())
    }
}
