/**
 * DEVICE REGISTRY - Parc de devices réseau simulés
 *
 * RÔLE : Registre fixe de devices (statut, dernier contact, placement 2D).
 * Transitions de statut aléatoires à chaque tick de simulation.
 *
 * ARCHITECTURE : Vec ordonné (ordre d'affichage) + lookup par id.
 * Statut et label "last contact" ne changent qu'ensemble via `Device::transition`.
 * UTILITÉ : Alimente `ping <id>`, `system --status` et la carte du dashboard.
 */

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::{ConsoleError, Result};
use crate::models::DeviceStatus::{self, Offline, Online, Warning};
use crate::models::LastContact::{self, Minutes, Seconds};
use crate::models::Position;

/// Probabilité par défaut qu'un tick change le statut d'un device
pub const DEFAULT_FLIP_PROBABILITY: f64 = 0.3;

type SeedRow = (
    &'static str,
    &'static str,
    &'static str,
    DeviceStatus,
    LastContact,
    f64,
    f64,
    &'static str,
);

// (id, nom, type, statut, dernier contact, x, y, localisation)
const REFERENCE_FLEET: [SeedRow; 8] = [
    ("dev-001", "Temperature Sensor", "sensor", Online, Seconds(2), 20.0, 30.0, "Server Room"),
    ("dev-002", "Humidity Sensor", "sensor", Online, Seconds(5), 60.0, 40.0, "Lab Area"),
    ("dev-003", "Motion Detector", "security", Warning, Minutes(1), 80.0, 70.0, "Entry Point"),
    ("dev-004", "Gateway Node", "network", Online, Seconds(1), 50.0, 50.0, "Central Hub"),
    ("dev-005", "Power Monitor", "utility", Offline, Minutes(15), 30.0, 80.0, "Power Room"),
    ("dev-006", "Air Quality", "sensor", Online, Seconds(3), 70.0, 20.0, "Work Area"),
    ("dev-007", "Backup System", "security", Online, Seconds(7), 25.0, 35.0, "Server Room"),
    ("dev-008", "Light Controller", "utility", Offline, Minutes(22), 85.0, 60.0, "Common Area"),
];

fn sanitize_probability(p: f64) -> f64 {
    if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 }
}

#[derive(Debug, Clone, Serialize)]
pub struct Device {
    // immuable après création (ex: dev-004)
    id: String,
    name: String,
    status: DeviceStatus,
    // sensor, security, network, utility
    #[serde(rename = "type")]
    device_type: String,
    last_contact: LastContact,
    position: Position,
    location: String,
}

impl Device {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        device_type: impl Into<String>,
        status: DeviceStatus,
        last_contact: LastContact,
        position: Position,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            device_type: device_type.into(),
            last_contact,
            position,
            location: location.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    pub fn last_contact(&self) -> LastContact {
        self.last_contact
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Applique statut + label en une seule opération
    pub fn transition(&mut self, status: DeviceStatus, last_contact: LastContact) {
        self.status = status;
        self.last_contact = last_contact;
    }
}

/// Trace d'une transition appliquée par `DeviceRegistry::tick`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTransition {
    pub device_id: String,
    pub from: DeviceStatus,
    pub to: DeviceStatus,
    pub last_contact: LastContact,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    #[serde(skip)]
    flip_probability: f64,
}

impl DeviceRegistry {
    pub fn new(devices: Vec<Device>, flip_probability: f64) -> Result<Self> {
        for (idx, device) in devices.iter().enumerate() {
            if devices[..idx].iter().any(|d| d.id == device.id) {
                return Err(ConsoleError::DuplicateDevice(device.id.clone()));
            }
        }

        Ok(Self {
            devices,
            flip_probability: sanitize_probability(flip_probability),
        })
    }

    /// Parc de référence : 8 devices dev-001..dev-008
    pub fn seeded(flip_probability: f64) -> Self {
        let devices = REFERENCE_FLEET
            .into_iter()
            .map(|(id, name, kind, status, contact, x, y, location)| Device {
                id: id.to_string(),
                name: name.to_string(),
                status,
                device_type: kind.to_string(),
                last_contact: contact,
                position: Position { x, y },
                location: location.to_string(),
            })
            .collect();

        Self {
            devices,
            flip_probability: sanitize_probability(flip_probability),
        }
    }

    /// Un tick : avec la probabilité configurée, un device tiré au hasard
    /// reçoit un nouveau statut et un label cohérent. Les autres ne bougent pas.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<DeviceTransition> {
        if self.devices.is_empty() || !rng.gen_bool(self.flip_probability) {
            return None;
        }

        let idx = rng.gen_range(0..self.devices.len());
        let status = *DeviceStatus::ALL.choose(rng)?;
        let last_contact = match status {
            Online => Seconds(rng.gen_range(0..10)),
            Offline | Warning => Minutes(rng.gen_range(0..30)),
        };

        let device = &mut self.devices[idx];
        let from = device.status;
        device.transition(status, last_contact);

        Some(DeviceTransition {
            device_id: device.id.clone(),
            from,
            to: status,
            last_contact,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn count_by_status(&self, status: DeviceStatus) -> usize {
        self.devices.iter().filter(|d| d.status == status).count()
    }
}
