use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::chat::ReplyRule;
use crate::error::{Error, ErrorKind, Result};
use crate::geo::{PointOfInterest, Position};

const CONFIG_PATH_ENV_VAR: &str = "TIPSY_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("tipsy").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".tipsy.toml"));
    }

    locations
}

/// Loads the config at `path`, or the first config found in the default
/// locations. Falls back to defaults if there is none.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => Config::from_file(&location),
        None => {
            log::info!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub first_weekday: Weekday,
    pub proximity: ProximityConfig,
    pub chat: ChatConfig,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            first_weekday: Weekday::Sat,
            proximity: ProximityConfig::default(),
            chat: ChatConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        log::debug!("Loading configuration from '{}'", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| Error::from(e).with_msg(&format!("'{}'", path.display())))?;
        content.parse()
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;

        let radius = config.proximity.radius_meters;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::new(
                ErrorKind::ConfigParse,
                &format!("proximity radius must be positive and finite, got {}", radius),
            ));
        }

        for point in config.proximity.points.iter() {
            if let Err(e) = Position::new(point.latitude, point.longitude) {
                return Err(Error::new(
                    ErrorKind::ConfigParse,
                    &format!("point of interest '{}': {}", point.label(), e),
                ));
            }
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub radius_meters: f64,
    pub title: String,
    pub body: String,
    pub points: Vec<PointOfInterest>,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        ProximityConfig {
            radius_meters: 20.0,
            title: "Heads up".to_owned(),
            body: "You are close to a bar. Remember why you started.".to_owned(),
            points: vec![PointOfInterest::new(
                Some("Southside".to_owned()),
                37.867993,
                -122.259592,
            )],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub default_reply: String,
    pub fallback: String,
    pub replies: Vec<ReplyRule>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        ChatConfig {
            default_reply: "I'm here for you. Tell me more about how today is going.".to_owned(),
            fallback: "Sorry, I can't answer right now. Try again in a moment.".to_owned(),
            replies: vec![
                ReplyRule::new(
                    vec!["drink".to_owned(), "bar".to_owned(), "beer".to_owned()],
                    "Cravings pass. Drink a glass of water and wait ten minutes.".to_owned(),
                ),
                ReplyRule::new(
                    vec!["relapse".to_owned(), "slipped".to_owned()],
                    "One day does not undo your progress. Start again today.".to_owned(),
                ),
                ReplyRule::new(
                    vec!["sober".to_owned(), "streak".to_owned()],
                    "That's worth celebrating. Keep it going!".to_owned(),
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub today_symbol: char,
    pub other_month_marker: char,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            today_symbol: '*',
            other_month_marker: '.',
        }
    }
}
