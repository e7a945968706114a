use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{cell::Position, shape::Shape},
};

/// Field dimensions and spawn coordinate of a session.
///
/// Every field is optional when deserializing; missing values fall back to a
/// 10x20 field with pieces spawning at `(width / 2, 0)`.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Position, SessionConfig};
///
/// let config: SessionConfig = serde_json::from_str(r#"{ "width": 8 }"#).unwrap();
/// assert_eq!(config.height, 20);
/// assert_eq!(config.spawn_position().unwrap(), Position::new(4, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    /// Spawn column, `width / 2` when unset.
    pub spawn_x: Option<i32>,
    pub spawn_y: i32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(10, 20)
    }
}

impl SessionConfig {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;

    /// Creates a config for a `width` x `height` field with the default spawn.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            spawn_x: None,
            spawn_y: 0,
        }
    }

    #[must_use]
    pub const fn with_spawn(self, spawn: Position) -> Self {
        Self {
            spawn_x: Some(spawn.x),
            spawn_y: spawn.y,
            ..self
        }
    }

    /// Validates the config and resolves the spawn coordinate.
    ///
    /// Every shape must fit the field when spawned; a field that cannot host
    /// some piece would end the session on its first appearance.
    pub fn spawn_position(&self) -> Result<Position, ConfigError> {
        let Self { width, height, .. } = *self;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyField { width, height });
        }
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(ConfigError::FieldTooLarge { width, height });
        };

        let position = Position::new(self.spawn_x.unwrap_or(w / 2), self.spawn_y);
        let inside = |p: Position| (0..w).contains(&p.x) && (0..h).contains(&p.y);
        if !inside(position) {
            return Err(ConfigError::SpawnOutOfBounds { position });
        }
        for shape in Shape::ALL {
            if !shape
                .offsets()
                .iter()
                .all(|&(dx, dy)| inside(position.offset(dx, dy)))
            {
                return Err(ConfigError::TemplateOutOfBounds { shape, position });
            }
        }
        Ok(position)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spawn_position().map(|_| ())
    }
}
