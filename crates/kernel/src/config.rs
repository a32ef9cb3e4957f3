use glyphworld_common::Position;
use std::collections::BTreeSet;

/// Invalid or missing startup parameters. Always fatal, always reported
/// before the simulation loop starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("save name must not be empty")]
    EmptySaveName,
    #[error("save name {name:?} contains invalid character {ch:?}")]
    InvalidSaveName { name: String, ch: char },
    #[error("starter grass listed twice at {0}")]
    DuplicateStarter(Position),
    #[error("viewport radius must be at least 1")]
    ZeroViewportRadius,
    #[error("viewport radius {radius} exceeds the maximum of {max}")]
    ViewportTooLarge { radius: u32, max: u32 },
    #[error("cannot parse {input:?} as a position, expected X,Y")]
    InvalidPosition { input: String },
}

/// Parameters for new-world generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    /// One grass entity is placed at each position, in order.
    pub starter_grass: Vec<Position>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            starter_grass: vec![Position::new(10, 10)],
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for p in &self.starter_grass {
            if !seen.insert((p.x, p.y)) {
                return Err(ConfigError::DuplicateStarter(*p));
            }
        }
        Ok(())
    }
}

/// Parse `"X,Y"` into a position.
pub fn parse_position(input: &str) -> Result<Position, ConfigError> {
    let err = || ConfigError::InvalidPosition {
        input: input.to_string(),
    };
    let (x, y) = input.split_once(',').ok_or_else(err)?;
    let x = x.trim().parse().map_err(|_| err())?;
    let y = y.trim().parse().map_err(|_| err())?;
    Ok(Position::new(x, y))
}

/// A validated persistence identifier: non-empty, made of ASCII letters,
/// digits, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SaveName(String);

impl SaveName {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptySaveName);
        }
        if let Some(ch) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(ConfigError::InvalidSaveName {
                name: name.to_string(),
                ch,
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SaveName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
