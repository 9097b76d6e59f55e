use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Priority marker. Doubles as the calendar tile highlight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Orange,
    #[default]
    Green,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Orange, Color::Green];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Green => "green",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_lowercase();
        Color::ALL
            .into_iter()
            .find(|color| color.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Color::ALL.iter().map(Color::as_str).collect();
                format!("unknown color: {wanted} (expected {})", known.join(", "))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "crate::dates::day_timestamp")]
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default, with = "client_name")]
    pub client: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub history: Vec<String>,
}

impl Task {
    pub fn new(text: impl Into<String>, date: NaiveDate, client: Option<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
            date,
            notes: String::new(),
            color: Color::default(),
            client: client.filter(|name| !name.is_empty()),
            attachments: Vec::new(),
            comments: Vec::new(),
            history: Vec::new(),
        }
    }
}

/// The client link is stored by value; an unset link is written as `""`.
mod client_name {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.filter(|name| !name.is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: default_dark_mode(),
        }
    }
}

fn default_dark_mode() -> bool {
    true
}
