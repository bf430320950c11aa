//! Typed endpoint lookups.
//!
//! Helix endpoints need a client id and fail with
//! [`ApiError::MissingCredential`] before any request when it is missing.
//! The chatters endpoint is anonymous and always available.

use tracing::debug;

use super::client::{Auth, RestClient};
use super::error::ApiError;
use super::types::{Chatters, ChattersResponse, FollowInfo, GameInfo, Page, StreamInfo, UserInfo};

/// Chatter groups from most to least privileged.
const ROLE_ORDER: &[&str] = &[
    "broadcaster",
    "vips",
    "moderators",
    "staff",
    "admins",
    "global_mods",
    "viewers",
];

impl RestClient {
    /// Look up a user account by login name.
    pub async fn user_info(&self, login: &str) -> Result<UserInfo, ApiError> {
        self.require_client_id()?;
        let url = format!("{}/users?login={login}", self.helix_url);
        let page: Page<UserInfo> = self.get_json(&url, Auth::Helix).await?;
        page.data
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::UserNotFound(login.to_string()))
    }

    /// Resolve a login name to a user id.
    ///
    /// Ids are cached for the lifetime of the client, so a name only ever
    /// costs one request.
    pub async fn user_id(&self, login: &str) -> Result<String, ApiError> {
        if let Some(id) = self.user_ids.get(login) {
            return Ok(id.clone());
        }

        let id = self.user_info(login).await?.id;
        debug!(login, id = %id, "cached user id");
        self.user_ids.insert(login.to_string(), id.clone());
        Ok(id)
    }

    /// The live stream of `login`.
    ///
    /// An offline channel is [`ApiError::StreamerNotLive`].
    pub async fn stream_info(&self, login: &str) -> Result<StreamInfo, ApiError> {
        self.require_client_id()?;
        let url = format!("{}/streams?user_login={login}", self.helix_url);
        let page: Page<StreamInfo> = self.get_json(&url, Auth::Helix).await?;
        page.data
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::StreamerNotLive(login.to_string()))
    }

    /// Follow relationships from `from`, to `to`, or between the two.
    ///
    /// At least one side must be given. Walks every page.
    pub async fn following_info(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<FollowInfo>, ApiError> {
        self.require_client_id()?;

        if from.is_none() && to.is_none() {
            return Err(ApiError::MissingFollowTarget);
        }

        let mut url = format!("{}/users/follows?first=100", self.helix_url);
        if let Some(from) = from {
            url.push_str(&format!("&from_id={}", self.user_id(from).await?));
        }
        if let Some(to) = to {
            url.push_str(&format!("&to_id={}", self.user_id(to).await?));
        }

        self.paginate(&url).await
    }

    /// Name of the game with the given id.
    pub async fn game_name(&self, game_id: &str) -> Result<String, ApiError> {
        self.require_client_id()?;
        let url = format!("{}/games?id={game_id}", self.helix_url);
        let page: Page<GameInfo> = self.get_json(&url, Auth::Helix).await?;
        page.data
            .into_iter()
            .next()
            .map(|game| game.name)
            .ok_or_else(|| ApiError::GameNotFound(game_id.to_string()))
    }

    /// Users present in `channel`, grouped by role.
    ///
    /// Uses the legacy chatters endpoint, which takes no credentials.
    pub async fn chatters(&self, channel: &str) -> Result<Chatters, ApiError> {
        let url = format!("{}/{channel}/chatters", self.chatters_url);
        let response: ChattersResponse = self.get_json(&url, Auth::Anonymous).await?;
        Ok(response.chatters)
    }

    /// Every user present in `channel`, roles flattened, most privileged first.
    pub async fn chatters_no_roles(&self, channel: &str) -> Result<Vec<String>, ApiError> {
        let chatters = self.chatters(channel).await?;
        Ok(roles_by_rank(&chatters)
            .flat_map(|(_, users)| users.iter().cloned())
            .collect())
    }

    /// Highest role of `user` in `channel`, singular (`moderator`, `viewer`).
    pub async fn user_role(&self, channel: &str, user: &str) -> Result<String, ApiError> {
        let chatters = self.chatters(channel).await?;
        roles_by_rank(&chatters)
            .find(|(_, users)| users.iter().any(|u| u == user))
            .map(|(role, _)| role.trim_end_matches('s').to_string())
            .ok_or_else(|| ApiError::UserNotInChatters {
                user: user.to_string(),
                channel: channel.to_string(),
            })
    }
}

/// Chatter groups in rank order; unknown groups follow the known ones.
fn roles_by_rank(chatters: &Chatters) -> impl Iterator<Item = (&str, &Vec<String>)> {
    let known = ROLE_ORDER
        .iter()
        .filter_map(move |role| chatters.get(*role).map(|users| (*role, users)));
    let unknown = chatters
        .iter()
        .filter(|(role, _)| !ROLE_ORDER.contains(&role.as_str()))
        .map(|(role, users)| (role.as_str(), users));
    known.chain(unknown)
}
