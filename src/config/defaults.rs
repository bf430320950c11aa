//! Default value functions for serde deserialization.

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_host() -> String {
    "irc.chat.twitch.tv".to_string()
}

pub fn default_port() -> u16 {
    6667
}

pub fn default_max_line_len() -> usize {
    tmi_proto::DEFAULT_MAX_LINE_LEN
}

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_prefix() -> String {
    "!".to_string()
}

// =============================================================================
// API Defaults
// =============================================================================

pub fn default_retry_limit() -> u32 {
    5
}

pub fn default_backoff_base_ms() -> u64 {
    1000
}

pub fn default_backoff_max_ms() -> u64 {
    5000
}

pub fn default_helix_url() -> String {
    "https://api.twitch.tv/helix".to_string()
}

pub fn default_chatters_url() -> String {
    "https://tmi.twitch.tv/group/user".to_string()
}
