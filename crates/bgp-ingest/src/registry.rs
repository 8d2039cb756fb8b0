//! Game name -> stable id, with a unique display colour tag per game.

use std::fmt;

use bgp_db::{GameRow, GameStore};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_CHANNEL_MIN: u8 = 10;
pub const DEFAULT_CHANNEL_MAX: u8 = 240;
pub const DEFAULT_MAX_TAG_ATTEMPTS: u32 = 1_000;

#[derive(Debug)]
pub enum RegistryError {
    /// The backing store failed a read or write.
    StoreUnavailable(anyhow::Error),
    /// Every drawn tag was already claimed.
    TagSpaceExhausted { attempts: u32 },
    /// The policy's channel range is empty.
    InvalidChannelRange { min: u8, max: u8 },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::StoreUnavailable(e) => write!(f, "game store unavailable: {e:#}"),
            RegistryError::TagSpaceExhausted { attempts } => {
                write!(f, "colour tag space exhausted after {attempts} attempts")
            }
            RegistryError::InvalidChannelRange { min, max } => {
                write!(f, "colour tag channel range is empty: min {min} > max {max}")
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::StoreUnavailable(e) => Some(&**e),
            RegistryError::TagSpaceExhausted { .. } | RegistryError::InvalidChannelRange { .. } => None,
        }
    }
}

/// Channel range and retry cap for tag generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTagPolicy {
    pub channel_min: u8,
    pub channel_max: u8,
    pub max_attempts: u32,
}

impl Default for ColorTagPolicy {
    fn default() -> Self {
        Self {
            channel_min: DEFAULT_CHANNEL_MIN,
            channel_max: DEFAULT_CHANNEL_MAX,
            max_attempts: DEFAULT_MAX_TAG_ATTEMPTS,
        }
    }
}

impl ColorTagPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.channel_min > self.channel_max {
            return Err(RegistryError::InvalidChannelRange {
                min: self.channel_min,
                max: self.channel_max,
            });
        }
        Ok(())
    }
}

pub fn format_color_tag(r: u8, g: u8, b: u8) -> String {
    format!("rgb({r},{g},{b})")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGame {
    pub game_id: Uuid,
    /// True when this call registered the game.
    pub created: bool,
}

pub struct GameRegistry<'a, S: GameStore + ?Sized> {
    store: &'a S,
    policy: ColorTagPolicy,
    rng: StdRng,
}

impl<'a, S: GameStore + ?Sized> GameRegistry<'a, S> {
    pub fn new(store: &'a S, policy: ColorTagPolicy) -> Self {
        Self::with_rng(store, policy, StdRng::from_entropy())
    }

    /// Deterministic tag draws for tests.
    pub fn with_rng(store: &'a S, policy: ColorTagPolicy, rng: StdRng) -> Self {
        Self { store, policy, rng }
    }

    pub fn policy(&self) -> ColorTagPolicy {
        self.policy
    }

    /// Look up `name`, registering it with a fresh colour tag if unknown.
    pub async fn resolve(&mut self, name: &str) -> Result<ResolvedGame, RegistryError> {
        let existing = self
            .store
            .find_game_by_name(name)
            .await
            .map_err(RegistryError::StoreUnavailable)?;
        if let Some(game) = existing {
            return Ok(ResolvedGame {
                game_id: game.game_id,
                created: false,
            });
        }

        let color_tag = self.claim_fresh_tag().await?;
        let row = GameRow {
            game_id: Uuid::new_v4(),
            name: name.to_string(),
            color_tag,
        };
        self.store
            .insert_game(&row)
            .await
            .map_err(RegistryError::StoreUnavailable)?;

        info!(game = %row.name, game_id = %row.game_id, color_tag = %row.color_tag, "registered new game");
        Ok(ResolvedGame {
            game_id: row.game_id,
            created: true,
        })
    }

    async fn claim_fresh_tag(&mut self) -> Result<String, RegistryError> {
        self.policy.validate()?;
        for attempt in 1..=self.policy.max_attempts {
            let tag = self.draw_tag();
            let claimed = self
                .store
                .claim_color_tag(&tag)
                .await
                .map_err(RegistryError::StoreUnavailable)?;
            if claimed {
                return Ok(tag);
            }
            debug!(attempt, %tag, "colour tag already in use");
        }
        Err(RegistryError::TagSpaceExhausted {
            attempts: self.policy.max_attempts,
        })
    }

    fn draw_tag(&mut self) -> String {
        let range = self.policy.channel_min..=self.policy.channel_max;
        let r = self.rng.gen_range(range.clone());
        let g = self.rng.gen_range(range.clone());
        let b = self.rng.gen_range(range);
        format_color_tag(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_format() {
        assert_eq!(format_color_tag(10, 128, 240), "rgb(10,128,240)");
    }

    #[test]
    fn default_policy_avoids_extreme_channels() {
        let p = ColorTagPolicy::default();
        assert_eq!((p.channel_min, p.channel_max), (10, 240));
        assert_eq!(p.max_attempts, 1_000);
    }

    #[test]
    fn exhaustion_message_names_attempts() {
        let e = RegistryError::TagSpaceExhausted { attempts: 7 };
        assert_eq!(e.to_string(), "colour tag space exhausted after 7 attempts");
    }

    #[tokio::test]
    async fn inverted_channel_range_is_an_error_not_a_panic() {
        let store = bgp_testkit::MemoryLedgerStore::new();
        let policy = ColorTagPolicy {
            channel_min: 20,
            channel_max: 10,
            max_attempts: 5,
        };
        let mut registry = GameRegistry::with_rng(&store, policy, StdRng::seed_from_u64(3));

        let err = registry.resolve("Azul").await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidChannelRange { min: 20, max: 10 }));
        assert_eq!(err.to_string(), "colour tag channel range is empty: min 20 > max 10");
        assert!(store.game("Azul").is_none());
        assert_eq!(store.claimed_tags(), 0);

        // A single-value range is valid.
        let policy = ColorTagPolicy {
            channel_min: 77,
            channel_max: 77,
            max_attempts: 1,
        };
        let mut registry = GameRegistry::with_rng(&store, policy, StdRng::seed_from_u64(3));
        registry.resolve("Azul").await.unwrap();
        assert_eq!(store.game("Azul").unwrap().color_tag, "rgb(77,77,77)");
    }
}
