//! Text rendering of the presentation views
//!
//! The kernel only produces command output; everything here is layout:
//! - Terminal history replay
//! - Dashboard (metric sparklines, device map, online summary)
//! - Static profile sections (experience, education, projects)

use opsdeck_kernel::{DeviceStatus, HistoryEntry, Metric, Profile, SessionSnapshot, View};

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const MAP_WIDTH: usize = 40;
const MAP_HEIGHT: usize = 10;

/// Replays history the way the terminal view shows it
pub fn render_history(entries: &[HistoryEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("$ {}\n{}", e.command(), e.output()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sparkline of a metric's history, scaled against 1.2x its peak
pub fn sparkline(metric: &Metric) -> String {
    let max = metric.history_peak() * 1.2;
    if max <= 0.0 {
        return SPARK[0].to_string().repeat(metric.history().len());
    }
    metric
        .history()
        .map(|v| {
            let idx = ((v / max) * (SPARK.len() - 1) as f64).round() as usize;
            SPARK[idx.min(SPARK.len() - 1)]
        })
        .collect()
}

fn status_glyph(status: DeviceStatus) -> char {
    match status {
        DeviceStatus::Online => '●',
        DeviceStatus::Warning => '▲',
        DeviceStatus::Offline => '○',
    }
}

pub fn render_dashboard(snapshot: &SessionSnapshot, clock: &str) -> String {
    let mut out = format!("== DASHBOARD == {clock}\n\n-- System metrics --\n");

    for metric in snapshot.metrics.iter() {
        out.push_str(&format!(
            "{:<10} {:>7} {:<4} {}\n",
            metric.name(),
            metric.value(),
            metric.unit(),
            sparkline(metric)
        ));
    }

    let online = snapshot.devices.count_by_status(DeviceStatus::Online);
    out.push_str(&format!(
        "\n-- IoT network ({online}/{} online) --\n",
        snapshot.devices.len()
    ));

    let mut grid = vec![vec!['·'; MAP_WIDTH]; MAP_HEIGHT];
    for device in snapshot.devices.iter() {
        let pos = device.position();
        let col = ((pos.x() / 100.0) * (MAP_WIDTH - 1) as f64).round() as usize;
        let row = ((pos.y() / 100.0) * (MAP_HEIGHT - 1) as f64).round() as usize;
        grid[row.min(MAP_HEIGHT - 1)][col.min(MAP_WIDTH - 1)] = status_glyph(device.status());
    }
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push('\n');
    for device in snapshot.devices.iter() {
        out.push_str(&format!(
            "{} {:<8} {:<18} {:<8} {:<12} {}\n",
            status_glyph(device.status()),
            device.id(),
            device.name(),
            device.status(),
            device.location(),
            device.last_contact()
        ));
    }
    out
}

/// Static sections; `None` for views that are not profile listings
pub fn render_section(view: View, profile: &Profile) -> Option<String> {
    let body = match view {
        View::Experience => profile
            .experience
            .iter()
            .map(|e| {
                let mut block = format!("{} @ {} ({})", e.role, e.company, e.period);
                for h in &e.highlights {
                    block.push_str(&format!("\n    * {h}"));
                }
                block
            })
            .collect::<Vec<_>>()
            .join("\n"),
        View::Education => profile
            .education
            .iter()
            .map(|e| format!("{} - {} ({})", e.degree, e.institution, e.period))
            .collect::<Vec<_>>()
            .join("\n"),
        View::Projects => profile
            .projects
            .iter()
            .map(|p| format!("{}\n    {}\n    [{}]", p.title, p.description, p.technologies.join(", ")))
            .collect::<Vec<_>>()
            .join("\n"),
        View::Terminal | View::Dashboard => return None,
    };
    Some(format!("== {} ==\n{body}", view.as_str().to_uppercase()))
}
