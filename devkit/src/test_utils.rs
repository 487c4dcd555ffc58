/*!
Test Harness pour sessions OpsDeck

Facilite l'écriture de tests de session avec:
- Session seedée (simulation reproductible)
- Ticks de simulation pilotés à la main, sans horloge
- Assertions sur les sorties, l'historique et la cohérence des devices
*/

use anyhow::Result;
use opsdeck_kernel::{
    ConsoleConfig, DeviceStatus, DeviceTransition, Profile, Session, Tick, ViewChange, ViewEvents,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::timeout;

/// Harness pilotant une session console
pub struct TestHarness {
    pub session: Session,
    pub events: ViewEvents,
    seq: u64,
    transitions: Vec<DeviceTransition>,
    outputs: Vec<(String, String)>,
}

impl TestHarness {
    /// Session de référence seedée, historique amorcé par les commandes de boot
    pub fn new(seed: u64) -> Self {
        let mut config = ConsoleConfig::default();
        config.simulation.seed = Some(seed);
        Self::with_config(&config)
    }

    pub fn with_config(config: &ConsoleConfig) -> Self {
        env_logger::try_init().ok(); // Init logging pour tests

        let (session, events) = Session::new(config, Arc::new(Profile::builtin()));
        Self::from_session(session, events)
    }

    pub fn from_session(session: Session, events: ViewEvents) -> Self {
        Self {
            session,
            events,
            seq: 0,
            transitions: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Soumet une ligne et conserve la sortie pour les assertions
    pub fn submit(&mut self, line: &str) -> String {
        let output = self.session.execute(line).into_string();
        log::info!("⌨️ {} -> {} bytes", line, output.len());
        self.outputs.push((line.to_string(), output.clone()));
        output
    }

    /// Avance de `n` ticks ; retourne le nombre de transitions de devices
    pub fn step(&mut self, n: usize) -> usize {
        let before = self.transitions.len();
        for _ in 0..n {
            self.seq += 1;
            let tick = Tick { seq: self.seq, at: OffsetDateTime::now_utc() };
            if let Some(t) = self.session.advance(&tick).transition {
                log::debug!("🔀 {} {} -> {}", t.device_id, t.from, t.to);
                self.transitions.push(t);
            }
        }
        self.transitions.len() - before
    }

    pub fn transitions(&self) -> &[DeviceTransition] {
        &self.transitions
    }

    /// Attend la prochaine bascule de vue (avec temps pausé, le timeout est virtuel)
    pub async fn next_view_change(&mut self, timeout_ms: u64) -> Option<ViewChange> {
        match timeout(Duration::from_millis(timeout_ms), self.events.recv()).await {
            Ok(change) => change,
            Err(_) => {
                log::warn!("⏰ No view change within {}ms", timeout_ms);
                None
            }
        }
    }

    /// Assert que la dernière sortie contient `needle`
    pub fn assert_output_contains(&self, needle: &str) -> Result<()> {
        match self.outputs.last() {
            Some((_, out)) if out.contains(needle) => Ok(()),
            Some((line, out)) => anyhow::bail!("Output of '{}' lacks '{}':\n{}", line, needle, out),
            None => anyhow::bail!("No command submitted yet"),
        }
    }

    pub fn assert_history_len(&self, expected: usize) -> Result<()> {
        let actual = self.session.history().len();
        if actual != expected {
            anyhow::bail!("History length mismatch: expected {}, got {}", expected, actual);
        }
        Ok(())
    }

    /// Assert que chaque label "last contact" correspond au statut de son device
    pub fn assert_devices_consistent(&self) -> Result<()> {
        self.session.with_state(|state| {
            for device in state.devices().iter() {
                if !device.last_contact().matches(device.status()) {
                    anyhow::bail!(
                        "Device {} is {} but last contact reads '{}'",
                        device.id(),
                        device.status(),
                        device.last_contact()
                    );
                }
            }
            Ok(())
        })
    }

    /// Devices sérialisés, pour inspection champ par champ
    pub fn devices_json(&self) -> Result<Value> {
        let devices = self.session.with_state(|state| state.devices().clone());
        let json = serde_json::to_value(devices.iter().collect::<Vec<_>>())?;
        Ok(json)
    }

    pub fn get_stats(&self) -> TestStats {
        self.session.with_state(|state| TestStats {
            commands: self.outputs.len(),
            ticks: self.seq,
            transitions: self.transitions.len(),
            history_len: state.history().len(),
            online: state.devices().count_by_status(DeviceStatus::Online),
            devices: state.devices().len(),
        })
    }

    /// Reset le harness : historique de session vidé, compteurs remis à zéro
    pub fn reset(&mut self) {
        self.session.cancel_pending_switch();
        self.session.execute("clear");
        self.outputs.clear();
        self.transitions.clear();
        self.seq = 0;
        while self.events.try_recv().is_ok() {}
        log::info!("🧹 Test harness reset");
    }
}

#[derive(Debug)]
pub struct TestStats {
    pub commands: usize,
    pub ticks: u64,
    pub transitions: usize,
    pub history_len: usize,
    pub online: usize,
    pub devices: usize,
}

impl TestStats {
    pub fn print(&self) {
        println!("📊 Session Statistics:");
        println!("  Commands submitted: {}", self.commands);
        println!("  Ticks: {} ({} device transitions)", self.ticks, self.transitions);
        println!("  History entries: {}", self.history_len);
        println!("  Devices online: {}/{}", self.online, self.devices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_basic_functionality() {
        let mut harness = TestHarness::new(7);
        harness.assert_history_len(2).unwrap();

        harness.submit("ping dev-004");
        harness.assert_output_contains("PING dev-004 (Gateway Node)").unwrap();
        harness.assert_history_len(3).unwrap();

        let stats = harness.get_stats();
        assert_eq!(stats.commands, 1);
        assert_eq!(stats.devices, 8);
        stats.print();
    }

    #[test]
    fn test_step_keeps_devices_consistent() {
        let mut harness = TestHarness::new(11);
        harness.step(200);
        assert_eq!(harness.get_stats().ticks, 200);
        assert!(!harness.transitions().is_empty());
        harness.assert_devices_consistent().unwrap();
    }

    #[test]
    fn test_devices_json_uses_type_field() {
        let harness = TestHarness::new(1);
        let json = harness.devices_json().unwrap();
        assert_eq!(json[3]["id"], "dev-004");
        assert_eq!(json[3]["type"], "network");
    }

    #[test]
    fn test_reset() {
        let mut harness = TestHarness::new(3);
        harness.submit("deploy");
        harness.step(5);
        harness.reset();

        harness.assert_history_len(0).unwrap();
        let stats = harness.get_stats();
        assert_eq!((stats.commands, stats.ticks, stats.transitions), (0, 0, 0));
        assert!(harness.assert_output_contains("anything").is_err());
    }
}
