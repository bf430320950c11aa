//! Typed records returned by the API endpoints.

use serde::Deserialize;
use std::collections::BTreeMap;

/// One page of a list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Response body of the legacy chatters endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ChattersResponse {
    pub chatters: Chatters,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub login: String,
    pub display_name: String,
    /// `partner`, `affiliate`, or empty.
    #[serde(default)]
    pub broadcaster_type: String,
    #[serde(default)]
    pub description: String,
}

/// A live stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamInfo {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub game_id: String,
    pub title: String,
    pub viewer_count: u64,
}

/// One follow relationship.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FollowInfo {
    pub from_id: String,
    pub from_name: String,
    pub to_id: String,
    pub to_name: String,
    #[serde(default)]
    pub followed_at: String,
}

/// A game or category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameInfo {
    pub id: String,
    pub name: String,
}

/// Chatters grouped by role (`broadcaster`, `vips`, `moderators`, ...).
pub type Chatters = BTreeMap<String, Vec<String>>;
