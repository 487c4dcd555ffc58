use std::time::Duration;
use tokio::task::{self, JoinHandle};

use crate::clock::ClockSource;
use crate::session::Session;

/// Démarre la boucle de simulation : un `Session::advance` par tick
/// (5s en référence). La tâche tourne jusqu'à son abort.
pub fn spawn_simulation(session: Session, period: Duration) -> JoinHandle<()> {
    tracing::info!("starting simulation loop (tick: {}ms)", period.as_millis());

    task::spawn(async move {
        let mut clock = ClockSource::new(period);

        loop {
            let tick = clock.tick().await;
            let report = session.advance(&tick);

            match &report.transition {
                Some(t) => tracing::debug!(
                    seq = report.seq,
                    device = %t.device_id,
                    from = %t.from,
                    to = %t.to,
                    "device status changed (last contact {})",
                    t.last_contact
                ),
                None => tracing::trace!(seq = report.seq, "simulation tick"),
            }
        }
    })
}
