/**
 * SESSION - Point de sérialisation unique de l'état de la console
 *
 * RÔLE :
 * Possède métriques, devices, historique, vue courante et RNG derrière un
 * seul mutex. Les ticks de simulation et les commandes utilisateur passent
 * tous par ce verrou : aucune lecture ne voit un device à moitié mis à jour.
 *
 * FONCTIONNEMENT :
 * - execute(line)  : dispatch via l'interpréteur + application des effets (clear, vue)
 * - advance(tick)  : un pas de simulation (métriques puis devices)
 * - `pitch`        : bascule différée vers le dashboard = tâche tokio annulable,
 *                    livrée comme `ViewChange` sur le canal d'événements
 */

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::clock::Tick;
use crate::config::ConsoleConfig;
use crate::devices::{DeviceRegistry, DeviceTransition};
use crate::history::SessionHistory;
use crate::interpreter::{CommandInterpreter, Effect, RenderedOutput};
use crate::metrics::MetricStore;
use crate::models::{HistoryEntry, View, ViewCause, ViewChange};
use crate::profile::Profile;
use crate::state::{new_state, Shared};

/// Source aléatoire injectable (ChaCha8 seedé en test)
pub type SimRng = Box<dyn RngCore + Send>;

/// Flux des changements de vue pour la couche de présentation
pub type ViewEvents = mpsc::UnboundedReceiver<ViewChange>;

pub struct SessionState {
    metrics: MetricStore,
    devices: DeviceRegistry,
    history: SessionHistory,
    view: View,
    pending_input: String,
    rng: SimRng,
}

impl SessionState {
    pub fn new(metrics: MetricStore, devices: DeviceRegistry, rng: SimRng) -> Self {
        Self {
            metrics,
            devices,
            history: SessionHistory::new(),
            view: View::default(),
            pending_input: String::new(),
            rng,
        }
    }

    pub fn metrics(&self) -> &MetricStore {
        &self.metrics
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn view(&self) -> View {
        self.view
    }
}

/// Copie cohérente de l'état, prise sous le verrou
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub metrics: MetricStore,
    pub devices: DeviceRegistry,
    pub history: Vec<HistoryEntry>,
    pub view: View,
}

/// Résultat d'un pas de simulation
#[derive(Debug, Clone)]
pub struct TickReport {
    pub seq: u64,
    pub transition: Option<DeviceTransition>,
}

#[derive(Clone)]
pub struct Session {
    state: Shared<SessionState>,
    interpreter: Arc<CommandInterpreter>,
    events: mpsc::UnboundedSender<ViewChange>,
    pending_switch: Shared<Option<JoinHandle<()>>>,
}

impl Session {
    /// Session amorcée avec le parc de référence ; RNG seedé si `simulation.seed` est fixé
    pub fn new(config: &ConsoleConfig, profile: Arc<Profile>) -> (Self, ViewEvents) {
        let rng: SimRng = match config.simulation.seed {
            Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
            None => Box::new(ChaCha8Rng::from_entropy()),
        };
        Self::with_rng(config, profile, rng)
    }

    pub fn with_rng(config: &ConsoleConfig, profile: Arc<Profile>, rng: SimRng) -> (Self, ViewEvents) {
        let sim = &config.simulation;
        let state = SessionState::new(
            MetricStore::seeded(sim.history_capacity, sim.metric_max_delta),
            DeviceRegistry::seeded(sim.device_flip_probability),
            rng,
        );
        let interpreter = CommandInterpreter::new(profile, config.console.pitch_delay());
        let (session, events) = Self::from_state(state, interpreter);

        for line in &config.console.boot_commands {
            session.execute(line);
        }
        tracing::info!(
            "session ready ({} metrics, {} devices, {} history entries)",
            session.with_state(|s| s.metrics.len()),
            session.with_state(|s| s.devices.len()),
            session.with_state(|s| s.history.len()),
        );

        (session, events)
    }

    /// Construction à partir d'un état arbitraire, sans commandes de boot
    pub fn from_state(state: SessionState, interpreter: CommandInterpreter) -> (Self, ViewEvents) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            state: new_state(state),
            interpreter: Arc::new(interpreter),
            events,
            pending_switch: new_state(None),
        };
        (session, rx)
    }

    /// Exécute une ligne soumise. Une ligne vide est ignorée.
    pub fn execute(&self, raw: &str) -> RenderedOutput {
        if raw.trim().is_empty() {
            return RenderedOutput::empty();
        }

        let outcome = {
            let mut state = self.state.lock();
            let outcome = self.interpreter.dispatch(raw, &state.metrics, &state.devices);

            match outcome.effect {
                Effect::ClearHistory => state.history.clear(),
                Effect::SwitchView(view) => self.apply_view(&mut state, view, ViewCause::Exit),
                Effect::None | Effect::ScheduleView { .. } => {}
            }

            if outcome.record {
                state.history.append(HistoryEntry::new(raw, outcome.output.as_str()));
                state.pending_input.clear();
            }
            outcome
        };

        if let Effect::ScheduleView { view, after } = outcome.effect {
            self.schedule_view(view, after);
        }

        outcome.output
    }

    /// Un pas de simulation : métriques puis devices, sous le même verrou
    pub fn advance(&self, tick: &Tick) -> TickReport {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.metrics.tick(&mut *state.rng);
        let transition = state.devices.tick(&mut *state.rng);

        TickReport { seq: tick.seq, transition }
    }

    pub fn set_pending_input(&self, text: &str) {
        let mut state = self.state.lock();
        state.pending_input.clear();
        state.pending_input.push_str(text);
    }

    pub fn pending_input(&self) -> String {
        self.state.lock().pending_input.clone()
    }

    /// Soumet le buffer d'entrée courant
    pub fn submit_pending(&self) -> RenderedOutput {
        let line = self.pending_input();
        self.execute(&line)
    }

    /// Navigation explicite de la présentation (onglets)
    pub fn set_view(&self, view: View) {
        let mut state = self.state.lock();
        self.apply_view(&mut state, view, ViewCause::Manual);
    }

    pub fn view(&self) -> View {
        self.state.lock().view
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().history.all().to_vec()
    }

    /// Accès en lecture seule à l'état, sous le verrou
    pub fn with_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.state.lock())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            metrics: state.metrics.clone(),
            devices: state.devices.clone(),
            history: state.history.all().to_vec(),
            view: state.view,
        }
    }

    /// Annule la bascule différée en attente. Retourne true si une bascule
    /// était encore en attente.
    pub fn cancel_pending_switch(&self) -> bool {
        match self.pending_switch.lock().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    fn apply_view(&self, state: &mut SessionState, view: View, cause: ViewCause) {
        state.view = view;
        // receiver droppé = présentation arrêtée, pas une erreur
        let _ = self.events.send(ViewChange { view, cause });
        tracing::debug!(%view, ?cause, "view switched");
    }

    fn schedule_view(&self, view: View, after: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime, deferred switch to {view} dropped");
            return;
        };

        let session = self.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(after).await;
            let mut state = session.state.lock();
            session.apply_view(&mut state, view, ViewCause::Pitch);
        });

        if let Some(previous) = self.pending_switch.lock().replace(task) {
            previous.abort();
        }
    }
}
