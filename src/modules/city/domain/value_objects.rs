use serde::{Deserialize, Serialize};

/// Climate of a city, as named by the import service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Climate {
    RainForest,
    #[serde(rename = "HUMIDSUBTROPICAL")]
    HumidSubtropical,
    Tundra,
}

impl Climate {
    pub const ALL: [Climate; 3] = [Climate::RainForest, Climate::HumidSubtropical, Climate::Tundra];

    pub fn as_str(&self) -> &'static str {
        match self {
            Climate::RainForest => "RAIN_FOREST",
            Climate::HumidSubtropical => "HUMIDSUBTROPICAL",
            Climate::Tundra => "TUNDRA",
        }
    }
}

impl std::fmt::Display for Climate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Climate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Climate::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Invalid climate: {}", s))
    }
}

/// Form of government of a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Government {
    Demarchy,
    Kleptocracy,
    Corporatocracy,
    Plutocracy,
    Thalassocracy,
}

impl Government {
    pub const ALL: [Government; 5] = [
        Government::Demarchy,
        Government::Kleptocracy,
        Government::Corporatocracy,
        Government::Plutocracy,
        Government::Thalassocracy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Government::Demarchy => "DEMARCHY",
            Government::Kleptocracy => "KLEPTOCRACY",
            Government::Corporatocracy => "CORPORATOCRACY",
            Government::Plutocracy => "PLUTOCRACY",
            Government::Thalassocracy => "THALASSOCRACY",
        }
    }
}

impl std::fmt::Display for Government {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Government {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Government::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("Invalid government: {}", s))
    }
}

/// Comma separated list of accepted names, used in diagnostics
pub fn joined_names<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
