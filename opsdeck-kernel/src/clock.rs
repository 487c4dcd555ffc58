use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Un tick d'horloge : numéro de séquence (à partir de 1) + instant UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub seq: u64,
    pub at: OffsetDateTime,
}

/// Source de ticks périodiques. Le premier tick tombe une période après
/// la création, jamais immédiatement.
pub struct ClockSource {
    interval: Interval,
    seq: u64,
}

impl ClockSource {
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, seq: 0 }
    }

    pub async fn tick(&mut self) -> Tick {
        self.interval.tick().await;
        self.seq += 1;
        Tick {
            seq: self.seq,
            at: OffsetDateTime::now_utc(),
        }
    }
}

/// Horodatage RFC 3339 pour l'affichage ; repli sur le timestamp Unix
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// Horloge affichée : publie l'heure courante à chaque période (1s en référence).
/// La tâche s'arrête quand tous les receivers sont droppés.
pub fn spawn_wall_clock(period: Duration) -> watch::Receiver<String> {
    let (tx, rx) = watch::channel(format_timestamp(OffsetDateTime::now_utc()));

    tokio::spawn(async move {
        let mut clock = ClockSource::new(period);
        loop {
            let tick = clock.tick().await;
            if tx.send(format_timestamp(tick.at)).is_err() {
                tracing::debug!("wall clock has no more listeners, stopping");
                break;
            }
        }
    });

    rx
}
