//! Declarative sidebar configuration.
//!
//! Every option is expressed as a host attribute (`name` / optional `value`),
//! following HTML semantics: presence flags are `true` whenever the attribute
//! exists regardless of its value. [`SidebarConfig::set_attribute`] is the
//! attribute-changed hook and reports which concern the change affects.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default expanded sidebar width in pixels.
pub const DEFAULT_WIDTH: u16 = 250;
/// Default collapsed sidebar width in pixels.
pub const DEFAULT_COLLAPSED_WIDTH: u16 = 60;
/// Title used when the host does not set one.
pub const DEFAULT_TITLE: &str = "Sidebar";

/// Errors raised while parsing attribute values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid width '{0}': expected '<n>px' or '<n>'")]
    InvalidWidth(String),
    #[error("invalid value '{value}' for attribute '{name}'")]
    InvalidValue { name: String, value: String },
    #[error("invalid refresh interval '{0}': expected milliseconds")]
    InvalidInterval(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeName::Light => ThemeName::Dark,
            ThemeName::Dark => ThemeName::Light,
        }
    }
}

impl std::str::FromStr for ThemeName {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeName::Light),
            "dark" => Ok(ThemeName::Dark),
            other => Err(ConfigError::InvalidValue {
                name: "theme".into(),
                value: other.into(),
            }),
        }
    }
}

/// Side of the page the sidebar is docked to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Left,
    Right,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Right => "right",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Position {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Position::Left),
            "right" => Ok(Position::Right),
            other => Err(ConfigError::InvalidValue {
                name: "position".into(),
                value: other.into(),
            }),
        }
    }
}

/// Parses a CSS-like length restricted to pixel values (`"280px"`, `"280"`).
pub fn parse_width(value: &str) -> Result<u16, ConfigError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    digits
        .parse::<u16>()
        .ok()
        .filter(|width| *width > 0)
        .ok_or_else(|| ConfigError::InvalidWidth(value.to_string()))
}

/// Where item data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Remote JSON document fetched over HTTP.
    Remote(Url),
    /// JSON carried directly in the attribute value.
    Inline(String),
}

impl DataSource {
    /// Classifies an attribute value: absolute http(s) URLs are remote,
    /// anything else is treated as inline JSON.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => DataSource::Remote(url),
            _ => DataSource::Inline(trimmed.to_string()),
        }
    }
}

/// Concern affected by an attribute change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeChange {
    /// Nothing observable changed (same value or unknown attribute).
    None,
    /// Only presentation flags changed; a structural render is needed.
    Render,
    /// Position or widths changed; layout must be reconciled.
    Layout,
    /// Auto-layout was switched on or off.
    AutoLayout,
    /// The item source changed; items must be reloaded.
    DataSource,
    /// Polling endpoint or interval changed.
    Polling,
    /// Instance identity changed; the persistence key moved.
    Identity,
}

/// Parsed host attributes of one sidebar instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarConfig {
    pub id: Option<String>,
    pub theme: ThemeName,
    pub position: Position,
    pub width: u16,
    pub collapsed_width: u16,
    pub collapsible: bool,
    pub show_header: bool,
    pub show_footer: bool,
    pub searchable: bool,
    pub animations: bool,
    pub responsive: bool,
    pub remember_state: bool,
    pub auto_layout: bool,
    pub title: String,
    pub data_source: Option<DataSource>,
    pub api_endpoint: Option<Url>,
    pub refresh_interval: Option<Duration>,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            id: None,
            theme: ThemeName::Light,
            position: Position::Left,
            width: DEFAULT_WIDTH,
            collapsed_width: DEFAULT_COLLAPSED_WIDTH,
            collapsible: false,
            show_header: false,
            show_footer: false,
            searchable: false,
            animations: false,
            responsive: false,
            remember_state: false,
            auto_layout: true,
            title: DEFAULT_TITLE.to_string(),
            data_source: None,
            api_endpoint: None,
            refresh_interval: None,
        }
    }
}

impl SidebarConfig {
    /// Builds a configuration from `(name, value)` attribute pairs, ignoring
    /// values that fail to parse (the default is kept).
    pub fn from_attributes<'a, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut config = Self::default();
        for (name, value) in attributes {
            if let Err(error) = config.set_attribute(name, value) {
                tracing::warn!(attribute = name, error = %error, "ignoring invalid sidebar attribute");
            }
        }
        config
    }

    /// Applies one attribute. `None` removes the attribute (flag cleared,
    /// value reset to default).
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<AttributeChange, ConfigError> {
        let before = self.clone();
        let present = value.is_some();
        let change = match name {
            "id" => {
                self.id = value.map(str::to_string).filter(|id| !id.trim().is_empty());
                AttributeChange::Identity
            }
            "theme" => {
                self.theme = value.map(str::parse::<ThemeName>).transpose()?.unwrap_or_default();
                AttributeChange::Render
            }
            "position" => {
                self.position = value.map(str::parse::<Position>).transpose()?.unwrap_or_default();
                AttributeChange::Layout
            }
            "width" => {
                self.width = value.map(parse_width).transpose()?.unwrap_or(DEFAULT_WIDTH);
                AttributeChange::Layout
            }
            "collapsed-width" => {
                self.collapsed_width = value.map(parse_width).transpose()?.unwrap_or(DEFAULT_COLLAPSED_WIDTH);
                AttributeChange::Layout
            }
            "collapsible" => {
                self.collapsible = present;
                AttributeChange::Render
            }
            "show-header" => {
                self.show_header = present;
                AttributeChange::Render
            }
            "show-footer" => {
                self.show_footer = present;
                AttributeChange::Render
            }
            "searchable" => {
                self.searchable = present;
                AttributeChange::Render
            }
            "animations" => {
                self.animations = present;
                AttributeChange::Render
            }
            "responsive" => {
                self.responsive = present;
                AttributeChange::Layout
            }
            "remember-state" => {
                self.remember_state = present;
                AttributeChange::Identity
            }
            "auto-layout" => {
                self.auto_layout = value.is_none_or(|value| value.trim() != "false");
                AttributeChange::AutoLayout
            }
            "title" => {
                self.title = value.unwrap_or(DEFAULT_TITLE).to_string();
                AttributeChange::Render
            }
            "data-source" => {
                self.data_source = value.filter(|value| !value.trim().is_empty()).map(DataSource::parse);
                AttributeChange::DataSource
            }
            "api-endpoint" => {
                self.api_endpoint = value
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| {
                        Url::parse(value.trim()).map_err(|_| ConfigError::InvalidValue {
                            name: name.to_string(),
                            value: value.to_string(),
                        })
                    })
                    .transpose()?;
                AttributeChange::Polling
            }
            "refresh-interval" => {
                self.refresh_interval = value
                    .map(|value| {
                        value
                            .trim()
                            .parse::<u64>()
                            .map_err(|_| ConfigError::InvalidInterval(value.to_string()))
                    })
                    .transpose()?
                    .filter(|millis| *millis > 0)
                    .map(Duration::from_millis);
                AttributeChange::Polling
            }
            _ => AttributeChange::None,
        };

        if *self == before {
            return Ok(AttributeChange::None);
        }
        Ok(change)
    }

    /// Persistence key derived from instance identity.
    pub fn state_key(&self) -> String {
        format!("navtree-sidebar-{}", self.id.as_deref().unwrap_or("default"))
    }

    /// Whether a remote polling loop should run.
    pub fn polling(&self) -> Option<(&Url, Duration)> {
        match (&self.api_endpoint, self.refresh_interval) {
            (Some(endpoint), Some(interval)) => Some((endpoint, interval)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_flags_follow_html_semantics() {
        let config = SidebarConfig::from_attributes([("collapsible", Some("")), ("searchable", Some("false"))]);
        assert!(config.collapsible);
        assert!(config.searchable);
        assert!(!config.show_header);
    }

    #[test]
    fn width_accepts_px_and_bare_numbers() {
        assert_eq!(parse_width("280px"), Ok(280));
        assert_eq!(parse_width(" 60 "), Ok(60));
        assert!(parse_width("20rem").is_err());
        assert!(parse_width("0px").is_err());
    }

    #[test]
    fn default_widths_match_their_pixel_attributes() {
        let config = SidebarConfig::default();
        assert_eq!(parse_width("250px"), Ok(config.width));
        assert_eq!(parse_width("60px"), Ok(config.collapsed_width));
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = SidebarConfig::from_attributes([("width", Some("wide")), ("position", Some("top"))]);
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.position, Position::Left);
    }

    #[test]
    fn set_attribute_reports_the_affected_concern() {
        let mut config = SidebarConfig::default();
        assert_eq!(config.set_attribute("position", Some("right")), Ok(AttributeChange::Layout));
        assert_eq!(config.set_attribute("position", Some("right")), Ok(AttributeChange::None));
        assert_eq!(config.set_attribute("theme", Some("dark")), Ok(AttributeChange::Render));
        assert_eq!(config.set_attribute("unknown", Some("x")), Ok(AttributeChange::None));
        assert_eq!(config.set_attribute("auto-layout", Some("false")), Ok(AttributeChange::AutoLayout));
        assert!(!config.auto_layout);
    }

    #[test]
    fn data_source_distinguishes_urls_from_inline_json() {
        assert!(matches!(DataSource::parse("https://example.com/items.json"), DataSource::Remote(_)));
        assert!(matches!(DataSource::parse(r#"[{"id":"a"}]"#), DataSource::Inline(_)));
    }

    #[test]
    fn polling_requires_endpoint_and_interval() {
        let mut config = SidebarConfig::default();
        config.set_attribute("api-endpoint", Some("http://localhost:8080/menu")).unwrap();
        assert!(config.polling().is_none());
        config.set_attribute("refresh-interval", Some("5000")).unwrap();
        let (_, interval) = config.polling().unwrap();
        assert_eq!(interval, Duration::from_millis(5000));
    }

    #[test]
    fn state_key_uses_instance_identity() {
        let mut config = SidebarConfig::default();
        assert_eq!(config.state_key(), "navtree-sidebar-default");
        config.set_attribute("id", Some("main")).unwrap();
        assert_eq!(config.state_key(), "navtree-sidebar-main");
    }
}
