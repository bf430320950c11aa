//! Bot lifecycle state machine.
//!
//! ```text
//! ┌──────────────┐  connect  ┌───────────┐  join  ┌──────────┐  run  ┌─────────┐
//! │ Disconnected ├──────────►│ Connected ├───────►│  Joined  ├──────►│ Running │
//! └──────────────┘           └─────┬─────┘        └──────────┘       └─────────┘
//!                                  │                   run                ▲
//!                                  └──────────────────────────────────────┘
//! ```
//!
//! Joining is valid from `Connected` and `Joined`. Running with no channel
//! joined is allowed; the bot then only answers pings.

use std::collections::BTreeSet;

use super::ChannelRef;
use crate::error::BotError;

/// Where the bot is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Connected,
    Joined,
    Running,
}

/// Lifecycle phase plus the set of joined channels.
#[derive(Debug, Clone)]
pub struct BotState {
    phase: Phase,
    channels: BTreeSet<ChannelRef>,
}

impl Default for BotState {
    fn default() -> Self {
        Self {
            phase: Phase::Disconnected,
            channels: BTreeSet::new(),
        }
    }
}

impl BotState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.phase != Phase::Disconnected
    }

    /// Joined channels, sorted by name.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelRef> {
        self.channels.iter()
    }

    /// Disconnected -> Connected. Reconnecting resets the joined set.
    pub fn connected(&mut self) {
        self.phase = Phase::Connected;
        self.channels.clear();
    }

    /// Record a join. Returns `false` if the channel was already joined.
    pub fn join(&mut self, channel: ChannelRef) -> Result<bool, BotError> {
        match self.phase {
            Phase::Disconnected => Err(BotError::NotConnected),
            Phase::Connected | Phase::Joined => {
                self.phase = Phase::Joined;
                Ok(self.channels.insert(channel))
            }
            // Running never hands out `&mut` access, so this only happens
            // after the loop has stopped.
            Phase::Running => Ok(self.channels.insert(channel)),
        }
    }

    /// Record a part. Returns `false` if the channel was not joined.
    pub fn part(&mut self, channel: &ChannelRef) -> Result<bool, BotError> {
        if self.phase == Phase::Disconnected {
            return Err(BotError::NotConnected);
        }
        let removed = self.channels.remove(channel);
        if self.phase == Phase::Joined && self.channels.is_empty() {
            self.phase = Phase::Connected;
        }
        Ok(removed)
    }

    /// Connected/Joined -> Running.
    pub fn running(&mut self) -> Result<(), BotError> {
        match self.phase {
            Phase::Disconnected => Err(BotError::NotConnected),
            _ => {
                self.phase = Phase::Running;
                Ok(())
            }
        }
    }

    /// Any -> Disconnected, e.g. after the transport closed.
    pub fn disconnected(&mut self) {
        self.phase = Phase::Disconnected;
        self.channels.clear();
    }
}
