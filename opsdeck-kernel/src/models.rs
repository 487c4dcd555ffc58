use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ConsoleError, Result};

/// Statut d'un device simulé. Exactement une valeur à tout instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Warning,
}

impl DeviceStatus {
    pub const ALL: [DeviceStatus; 3] = [DeviceStatus::Online, DeviceStatus::Offline, DeviceStatus::Warning];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Warning => "warning",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label "last contact" typé : secondes pour un device online,
/// minutes pour offline/warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastContact {
    Seconds(u32),
    Minutes(u32),
}

impl LastContact {
    /// Vrai si la catégorie du label correspond au statut.
    pub fn matches(&self, status: DeviceStatus) -> bool {
        match (self, status) {
            (LastContact::Seconds(_), DeviceStatus::Online) => true,
            (LastContact::Minutes(_), DeviceStatus::Offline | DeviceStatus::Warning) => true,
            _ => false,
        }
    }
}

impl fmt::Display for LastContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastContact::Seconds(n) => write!(f, "{n}s ago"),
            LastContact::Minutes(n) => write!(f, "{n}m ago"),
        }
    }
}

/// Placement 2D normalisé, chaque coordonnée dans [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

#[derive(Deserialize)]
struct RawPosition {
    x: f64,
    y: f64,
}

impl TryFrom<RawPosition> for Position {
    type Error = ConsoleError;

    fn try_from(raw: RawPosition) -> Result<Self> {
        Position::new(raw.x, raw.y)
    }
}

impl Position {
    pub fn new(x: f64, y: f64) -> Result<Self> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if in_range(x) && in_range(y) {
            Ok(Self { x, y })
        } else {
            Err(ConsoleError::PositionOutOfRange { x, y })
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

/// Une paire (commande soumise, sortie rendue). Immuable une fois ajoutée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    command: String,
    output: String,
}

impl HistoryEntry {
    pub fn new(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self { command: command.into(), output: output.into() }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

/// Sélecteur de vue de la couche de présentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Terminal,
    Dashboard,
    Experience,
    Education,
    Projects,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Terminal => "terminal",
            View::Dashboard => "dashboard",
            View::Experience => "experience",
            View::Education => "education",
            View::Projects => "projects",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origine d'un changement de vue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewCause {
    Exit,
    Pitch,
    Manual,
}

/// Événement publié à chaque changement de vue (immédiat ou différé).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewChange {
    pub view: View,
    pub cause: ViewCause,
}
