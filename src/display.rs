//! Single-display descriptor codec
//!
//! A descriptor is the quoted argument the display tool prints and accepts,
//! e.g. `id:1 degree:0 res:1920x1080 hz:60 scaling:off origin:(0,0)`.
//! Decoding goes through a fixed schema: every recognized key has a typed
//! parser and a default, and keys outside the schema follow [`UnknownKeyPolicy`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::constants::keys;
use crate::error::{LayoutError, Result};

/// What to do with descriptor keys outside the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeyPolicy {
    /// Fail the decode, surfacing format drift in the display tool
    #[default]
    Reject,
    /// Log and drop the key
    Ignore,
}

impl FromStr for UnknownKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!("unknown key policy '{other}' (expected reject or ignore)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Top-left corner of a display in virtual desktop space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Origin {
    pub x: i32,
    pub y: i32,
}

impl Origin {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Normal,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Normal),
            90 => Some(Self::Quarter),
            180 => Some(Self::Half),
            270 => Some(Self::ThreeQuarter),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::Normal => 0,
            Self::Quarter => 90,
            Self::Half => 180,
            Self::ThreeQuarter => 270,
        }
    }
}

/// Placement of one display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub id: String,
    pub resolution: Resolution,
    pub origin: Origin,
    pub refresh_hz: Option<u32>,
    /// Read from the tool's listing but never written back
    pub color_depth: Option<u32>,
    pub scaling: bool,
    pub rotation: Rotation,
}

impl DisplayConfig {
    /// Display at the desktop origin with every optional field at its default
    pub fn new(id: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            id: id.into(),
            resolution,
            origin: Origin::default(),
            refresh_hz: None,
            color_depth: None,
            scaling: false,
            rotation: Rotation::Normal,
        }
    }

    /// Render the descriptor in the key order the display tool accepts
    pub fn encode(&self) -> String {
        let mut out = format!(
            "{}:{} {}:{} {}:{}",
            keys::ID,
            self.id,
            keys::DEGREE,
            self.rotation.degrees(),
            keys::RESOLUTION,
            self.resolution,
        );
        if let Some(hz) = self.refresh_hz {
            out.push_str(&format!(" {}:{hz}", keys::REFRESH_HZ));
        }
        let scaling = if self.scaling { keys::SCALING_ON } else { keys::SCALING_OFF };
        out.push_str(&format!(" {}:{scaling} {}:{}", keys::SCALING, keys::ORIGIN, self.origin));
        out
    }

    pub fn decode(descriptor: &str, policy: UnknownKeyPolicy) -> Result<Self> {
        let mut fields: HashMap<&str, &str> = HashMap::new();
        for token in descriptor.split_whitespace() {
            let (key, value) = token.split_once(':').ok_or_else(|| {
                LayoutError::malformed(descriptor, format!("token '{token}' is not key:value"))
            })?;
            if fields.insert(key, value).is_some() {
                return Err(LayoutError::malformed(descriptor, format!("duplicate key '{key}'")));
            }
        }

        let id = fields
            .remove(keys::ID)
            .ok_or_else(|| LayoutError::malformed(descriptor, "missing id"))?;
        validate_id(descriptor, id)?;

        let resolution = fields
            .remove(keys::RESOLUTION)
            .ok_or_else(|| LayoutError::malformed(descriptor, "missing res"))
            .and_then(|raw| parse_resolution(descriptor, raw))?;

        let origin = match fields.remove(keys::ORIGIN) {
            Some(raw) => parse_origin(descriptor, raw)?,
            None => Origin::default(),
        };

        let refresh_hz = fields
            .remove(keys::REFRESH_HZ)
            .map(|raw| parse_positive(descriptor, keys::REFRESH_HZ, raw))
            .transpose()?;

        let color_depth = fields
            .remove(keys::COLOR_DEPTH)
            .map(|raw| parse_positive(descriptor, keys::COLOR_DEPTH, raw))
            .transpose()?;

        let scaling = match fields.remove(keys::SCALING) {
            Some(keys::SCALING_ON) => true,
            Some(keys::SCALING_OFF) | None => false,
            Some(other) => {
                return Err(LayoutError::malformed(
                    descriptor,
                    format!("scaling must be on or off, got '{other}'"),
                ));
            }
        };

        let rotation = match fields.remove(keys::DEGREE) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .and_then(Rotation::from_degrees)
                .ok_or_else(|| {
                    LayoutError::malformed(descriptor, format!("degree must be 0, 90, 180 or 270, got '{raw}'"))
                })?,
            None => Rotation::Normal,
        };

        if let Some(raw) = fields.remove(keys::ENABLED) {
            if raw != "true" && raw != "false" {
                return Err(LayoutError::malformed(
                    descriptor,
                    format!("enabled must be true or false, got '{raw}'"),
                ));
            }
        }

        if !fields.is_empty() {
            let mut unknown: Vec<&str> = fields.keys().copied().collect();
            unknown.sort_unstable();
            match policy {
                UnknownKeyPolicy::Reject => {
                    return Err(LayoutError::malformed(
                        descriptor,
                        format!("unknown key(s): {}", unknown.join(", ")),
                    ));
                }
                UnknownKeyPolicy::Ignore => {
                    warn!(id = %id, keys = ?unknown, "Ignoring unknown descriptor keys");
                }
            }
        }

        let config = Self {
            origin,
            refresh_hz,
            color_depth,
            scaling,
            rotation,
            ..Self::new(id, resolution)
        };
        debug!(config = ?config, "Decoded display descriptor");
        Ok(config)
    }
}

impl fmt::Display for DisplayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for DisplayConfig {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s, UnknownKeyPolicy::Reject)
    }
}

/// Characters a shell would interpret inside a stored command line
const SHELL_SPECIAL: &[char] = &[
    '"', '\'', '`', '$', '\\', ';', '|', '&', '<', '>', '(', ')', '{', '}', '*', '?', '!', '~', '#',
];

/// Ids are opaque (mirrored displays join theirs with `+`) but end up inside
/// a shell command line in the store
fn validate_id(descriptor: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(LayoutError::malformed(descriptor, "empty id"));
    }
    if let Some(bad) = id
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || SHELL_SPECIAL.contains(c))
    {
        return Err(LayoutError::malformed(descriptor, format!("id contains '{bad}'")));
    }
    Ok(())
}

fn parse_resolution(descriptor: &str, raw: &str) -> Result<Resolution> {
    let invalid = || LayoutError::malformed(descriptor, format!("res must be WIDTHxHEIGHT, got '{raw}'"));
    let (w, h) = raw.split_once('x').ok_or_else(invalid)?;
    let width: u32 = w.parse().map_err(|_| invalid())?;
    let height: u32 = h.parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(LayoutError::malformed(descriptor, format!("res must be positive, got '{raw}'")));
    }
    Ok(Resolution::new(width, height))
}

fn parse_origin(descriptor: &str, raw: &str) -> Result<Origin> {
    let invalid = || LayoutError::malformed(descriptor, format!("origin must be (X,Y), got '{raw}'"));
    let (x, y) = raw
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .and_then(|r| r.split_once(','))
        .ok_or_else(invalid)?;
    let x: i32 = x.trim().parse().map_err(|_| invalid())?;
    let y: i32 = y.trim().parse().map_err(|_| invalid())?;
    Ok(Origin::new(x, y))
}

fn parse_positive(descriptor: &str, key: &str, raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(LayoutError::malformed(
            descriptor,
            format!("{key} must be a positive integer, got '{raw}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> DisplayConfig {
        DisplayConfig {
            id: "37D8832A-2D66-02CA-B9F7-8F30A301B230".to_string(),
            resolution: Resolution::new(2560, 1440),
            origin: Origin::new(-2560, 120),
            refresh_hz: Some(144),
            color_depth: Some(8),
            scaling: true,
            rotation: Rotation::Quarter,
        }
    }

    #[test]
    fn test_encode_key_order() {
        let config = full_config();
        assert_eq!(
            config.encode(),
            "id:37D8832A-2D66-02CA-B9F7-8F30A301B230 degree:90 res:2560x1440 hz:144 scaling:on origin:(-2560,120)"
        );
    }

    #[test]
    fn test_encode_omits_unset_refresh() {
        let config = DisplayConfig::new("1", Resolution::new(1920, 1080));
        assert_eq!(config.encode(), "id:1 degree:0 res:1920x1080 scaling:off origin:(0,0)");
    }

    #[test]
    fn test_round_trip_drops_color_depth_only() {
        let config = full_config();
        let decoded: DisplayConfig = config.encode().parse().unwrap();

        assert_eq!(decoded.color_depth, None);
        assert_eq!(decoded, DisplayConfig { color_depth: None, ..config });
    }

    #[test]
    fn test_decode_applies_defaults() {
        let config: DisplayConfig = "id:s42 res:1280x800".parse().unwrap();
        assert_eq!(config.id, "s42");
        assert_eq!(config.resolution, Resolution::new(1280, 800));
        assert_eq!(config.origin, Origin::new(0, 0));
        assert_eq!(config.refresh_hz, None);
        assert_eq!(config.color_depth, None);
        assert!(!config.scaling);
        assert_eq!(config.rotation, Rotation::Normal);
    }

    #[test]
    fn test_decode_tool_listing_descriptor() {
        let raw = "id:1 res:1920x1080 hz:60 color_depth:8 enabled:true scaling:off origin:(1920,0) degree:180";
        let config: DisplayConfig = raw.parse().unwrap();
        assert_eq!(config.refresh_hz, Some(60));
        assert_eq!(config.color_depth, Some(8));
        assert_eq!(config.origin, Origin::new(1920, 0));
        assert_eq!(config.rotation, Rotation::Half);
    }

    #[test]
    fn test_decode_token_without_separator() {
        let err = "id:1 res:1920x1080 bogus".parse::<DisplayConfig>().unwrap_err();
        assert!(matches!(err, LayoutError::MalformedConfig { .. }));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_decode_missing_required_fields() {
        assert!(matches!(
            "res:1920x1080".parse::<DisplayConfig>(),
            Err(LayoutError::MalformedConfig { .. })
        ));
        assert!(matches!(
            "id:1 origin:(0,0)".parse::<DisplayConfig>(),
            Err(LayoutError::MalformedConfig { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_non_positive_resolution() {
        assert!("id:1 res:0x1080".parse::<DisplayConfig>().is_err());
        assert!("id:1 res:1920x0".parse::<DisplayConfig>().is_err());
        assert!("id:1 res:-1920x1080".parse::<DisplayConfig>().is_err());
    }

    #[test]
    fn test_decode_rejects_bad_values() {
        assert!("id:1 res:1920x1080 degree:45".parse::<DisplayConfig>().is_err());
        assert!("id:1 res:1920x1080 scaling:maybe".parse::<DisplayConfig>().is_err());
        assert!("id:1 res:1920x1080 origin:0,0".parse::<DisplayConfig>().is_err());
        assert!("id:1 res:1920x1080 hz:0".parse::<DisplayConfig>().is_err());
        assert!("id:1 res:1920x1080 enabled:yes".parse::<DisplayConfig>().is_err());
        assert!("id: res:1920x1080".parse::<DisplayConfig>().is_err());
        assert!("id:1 id:2 res:1920x1080".parse::<DisplayConfig>().is_err());
    }

    #[test]
    fn test_decode_rejects_shell_characters_in_id() {
        assert!("id:1;reboot res:1920x1080".parse::<DisplayConfig>().is_err());
        assert!("id:$(x) res:1920x1080".parse::<DisplayConfig>().is_err());
        assert!("id:a\"b res:1920x1080".parse::<DisplayConfig>().is_err());
        assert!("id:a`b` res:1920x1080".parse::<DisplayConfig>().is_err());
        assert!("id:a&b res:1920x1080".parse::<DisplayConfig>().is_err());
    }

    #[test]
    fn test_decode_mirrored_display_id() {
        let raw = "id:AAA-1+BBB-2 res:1920x1080 hz:60 color_depth:8 scaling:off origin:(0,0) degree:0";
        let config: DisplayConfig = raw.parse().unwrap();
        assert_eq!(config.id, "AAA-1+BBB-2");
        assert_eq!(config.to_string(), "id:AAA-1+BBB-2 degree:0 res:1920x1080 hz:60 scaling:off origin:(0,0)");
    }

    #[test]
    fn test_unknown_key_policy() {
        let raw = "id:1 res:1920x1080 mode:7";
        assert!(DisplayConfig::decode(raw, UnknownKeyPolicy::Reject).is_err());

        let config = DisplayConfig::decode(raw, UnknownKeyPolicy::Ignore).unwrap();
        assert_eq!(config.id, "1");
    }

    #[test]
    fn test_unknown_key_policy_from_str() {
        assert_eq!("Reject".parse::<UnknownKeyPolicy>(), Ok(UnknownKeyPolicy::Reject));
        assert_eq!(" ignore ".parse::<UnknownKeyPolicy>(), Ok(UnknownKeyPolicy::Ignore));
        assert!("warn".parse::<UnknownKeyPolicy>().is_err());
    }
}
