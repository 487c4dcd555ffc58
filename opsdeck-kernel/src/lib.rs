/**
 * OPSDECK KERNEL - Cœur de la console opérateur simulée
 *
 * RÔLE : Interpréteur de commandes + simulation continue de l'état système
 * (métriques synthétiques, devices réseau) + historique de session.
 *
 * ARCHITECTURE : Session unique derrière un mutex, alimentée par la boucle de
 * simulation (ClockSource) et par les commandes de la couche de présentation.
 * UTILITÉ : Tout ce qui a de la logique ; la présentation ne fait que lire et relayer.
 */

pub mod catalog;
pub mod clock;
pub mod config;
pub mod devices;
pub mod error;
pub mod history;
pub mod interpreter;
pub mod metrics;
pub mod models;
pub mod profile;
pub mod session;
pub mod simulation;
pub mod state;

pub use clock::{format_timestamp, spawn_wall_clock, ClockSource, Tick};
pub use config::{load_config, ConsoleConfig};
pub use devices::{Device, DeviceRegistry, DeviceTransition};
pub use error::{ConsoleError, Result};
pub use history::SessionHistory;
pub use interpreter::{CommandInterpreter, RenderedOutput};
pub use metrics::{Metric, MetricStore};
pub use models::{DeviceStatus, HistoryEntry, LastContact, Position, View, ViewCause, ViewChange};
pub use profile::Profile;
pub use session::{Session, SessionSnapshot, SessionState, SimRng, TickReport, ViewEvents};
pub use simulation::spawn_simulation;
