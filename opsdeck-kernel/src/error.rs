use std::path::PathBuf;

/// Erreurs de construction et de configuration du kernel.
///
/// Les résultats de commandes (commande inconnue, device introuvable,
/// métrique absente) ne passent jamais par ici : ils sont rendus en texte.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Duplicate metric: {0}")]
    DuplicateMetric(String),
    #[error("Duplicate device: {0}")]
    DuplicateDevice(String),
    #[error("Position out of range: ({x}, {y}) must lie within [0, 100]")]
    PositionOutOfRange { x: f64, y: f64 },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Profile error in {path}: {source}")]
    Profile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
