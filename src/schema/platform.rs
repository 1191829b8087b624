use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Platform {
    BattleNet,
    Steam,
}

pub const ALL_PLATFORMS: [Platform; 2] = [Platform::BattleNet, Platform::Steam];

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BattleNet => "BattleNet",
            Self::Steam => "Steam",
        }
    }

    /// Name shown to users; the wire name of Battle.net has no dot.
    pub fn label(self) -> &'static str {
        match self {
            Self::BattleNet => "Battle.net",
            Self::Steam => "Steam",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim() {
            "BattleNet" => Ok(Self::BattleNet),
            "Steam" => Ok(Self::Steam),
            other => Err(format!(
                "platform must be one of: BattleNet, Steam (got `{other}`)"
            )),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drops repeated platforms, keeping first-seen order.
pub fn dedup_platforms(platforms: &[Platform]) -> Vec<Platform> {
    let mut unique = Vec::with_capacity(platforms.len());
    for platform in platforms {
        if !unique.contains(platform) {
            unique.push(*platform);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_serializes_with_wire_names() {
        let encoded = serde_json::to_string(&ALL_PLATFORMS).expect("encode");
        assert_eq!(encoded, r#"["BattleNet","Steam"]"#);
        assert_eq!(Platform::parse("Steam"), Ok(Platform::Steam));
        assert!(Platform::parse("battle.net").is_err());
    }

    #[test]
    fn dedup_platforms_keeps_first_seen_order() {
        assert_eq!(
            dedup_platforms(&[Platform::Steam, Platform::BattleNet, Platform::Steam]),
            vec![Platform::Steam, Platform::BattleNet]
        );
    }
}
