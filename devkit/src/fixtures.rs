/*!
Fixtures pour sessions OpsDeck

Construit des devices, métriques et profils minimaux sans passer par
la config ni par le parc de référence.
*/

use anyhow::Result;
use opsdeck_kernel::metrics::{CPU_USAGE, LATENCY, MEMORY, NETWORK};
use opsdeck_kernel::profile::{Experience, Identity};
use opsdeck_kernel::{
    CommandInterpreter, Device, DeviceRegistry, DeviceStatus, LastContact, Metric, MetricStore,
    Position, Profile, Session, SessionState, SimRng, ViewEvents,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;

/// Device au centre de la carte, label cohérent avec le statut
pub fn device(id: &str, status: DeviceStatus) -> Result<Device> {
    let contact = match status {
        DeviceStatus::Online => LastContact::Seconds(1),
        DeviceStatus::Offline | DeviceStatus::Warning => LastContact::Minutes(5),
    };
    let position = Position::new(50.0, 50.0)?;

    Ok(Device::new(id, format!("Fixture {id}"), "sensor", status, contact, position, "Test Bench"))
}

pub fn registry(devices: Vec<Device>, flip_probability: f64) -> Result<DeviceRegistry> {
    Ok(DeviceRegistry::new(devices, flip_probability)?)
}

/// Les quatre métriques nommées à la même valeur, sans dérive (delta max 0)
pub fn flat_metrics(value: f64) -> Result<MetricStore> {
    let metrics = [(CPU_USAGE, "%"), (MEMORY, "GB"), (NETWORK, "Mbps"), (LATENCY, "ms")]
        .into_iter()
        .map(|(name, unit)| Metric::new(name, unit, value, [value; 6], 6))
        .collect();
    Ok(MetricStore::new(metrics, 0.0)?)
}

pub fn seeded_rng(seed: u64) -> SimRng {
    Box::new(ChaCha8Rng::seed_from_u64(seed))
}

pub fn minimal_profile() -> Profile {
    Profile {
        identity: Identity {
            name: "Test Operator".into(),
            title: "Fixture Engineer".into(),
            location: "Nowhere".into(),
            email: "operator@example.test".into(),
            github: "github.com/operator".into(),
            pitch_url: None,
        },
        experience: vec![Experience {
            role: "Tester".into(),
            company: "Fixture Labs".into(),
            period: "2020 - Present".into(),
            highlights: vec!["Wrote fixtures".into()],
        }],
        ..Profile::default()
    }
}

/// Session sans commandes de boot (historique vide)
pub fn session_with(
    metrics: MetricStore,
    devices: DeviceRegistry,
    seed: u64,
    pitch_delay: Duration,
) -> (Session, ViewEvents) {
    let state = SessionState::new(metrics, devices, seeded_rng(seed));
    let interpreter = CommandInterpreter::new(Arc::new(minimal_profile()), pitch_delay);
    Session::from_state(state, interpreter)
}
