/**
 * COMMAND INTERPRETER - Parsing + dispatch des commandes de la console
 *
 * RÔLE :
 * Transforme une ligne brute en `Command`, la dispatche vers son handler et
 * rend un texte à partir des snapshots courants (métriques, devices, profil).
 *
 * FONCTIONNEMENT :
 * - Normalisation : trim + minuscules pour le matching, texte original gardé pour l'historique
 * - Matching sur les tokens séparés par des espaces
 * - Aucun handler ne modifie MetricStore ni DeviceRegistry : les effets de bord
 *   (clear, changement de vue) sont décrits dans `Outcome` et appliqués par la Session
 * - Les échecs (commande inconnue, device absent, métrique absente) deviennent du texte
 */

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::CommandCatalog;
use crate::devices::DeviceRegistry;
use crate::metrics::{MetricStore, CPU_USAGE, MEMORY, NETWORK};
use crate::models::View;
use crate::profile::Profile;

/// Capacité mémoire affichée par `system --status`
const MEMORY_TOTAL_GB: u32 = 16;

const DEPLOY_OUTPUT: &str = "Initiating deployment sequence...
[====                ] 20%
[========            ] 40%
[============        ] 60%
[================    ] 80%
[====================] 100%
Deployment successful. All services running.";

/// Texte rendu par une commande
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedOutput {
    text: String,
}

impl RenderedOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for RenderedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Clear,
    Whoami,
    Skills,
    Experience,
    Education,
    Achievements,
    Projects,
    SystemStatus,
    Ping(&'a str),
    Deploy,
    Pitch,
    Exit,
    Unknown,
}

/// Trim + minuscules
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl<'a> Command<'a> {
    /// Parse une ligne déjà normalisée
    pub fn parse(normalized: &'a str) -> Self {
        let mut tokens = normalized.split_whitespace();
        let Some(head) = tokens.next() else {
            return Command::Unknown;
        };

        if head == "ping" {
            // `ping` seul => lookup de "" (jamais trouvé)
            return Command::Ping(tokens.next().unwrap_or(""));
        }

        let rest: Vec<&str> = tokens.collect();
        match (head, rest.as_slice()) {
            ("help" | "--help", []) => Command::Help,
            ("clear", []) => Command::Clear,
            ("whoami", []) => Command::Whoami,
            ("skills", []) => Command::Skills,
            ("experience", []) => Command::Experience,
            ("education", []) => Command::Education,
            ("achievements", []) => Command::Achievements,
            ("projects", []) => Command::Projects,
            ("system", ["--status"]) => Command::SystemStatus,
            ("deploy", []) => Command::Deploy,
            ("pitch", []) => Command::Pitch,
            ("exit", []) => Command::Exit,
            _ => Command::Unknown,
        }
    }
}

/// Effet de bord demandé par une commande, appliqué par la Session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    ClearHistory,
    SwitchView(View),
    ScheduleView { view: View, after: Duration },
}

/// Résultat d'un dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: RenderedOutput,
    /// false pour `clear` et `exit` : rien n'est ajouté à l'historique
    pub record: bool,
    pub effect: Effect,
}

impl Outcome {
    fn recorded(text: impl Into<String>) -> Self {
        Self {
            output: RenderedOutput::new(text),
            record: true,
            effect: Effect::None,
        }
    }

    fn silent(effect: Effect) -> Self {
        Self {
            output: RenderedOutput::empty(),
            record: false,
            effect,
        }
    }
}

pub struct CommandInterpreter {
    catalog: CommandCatalog,
    profile: Arc<Profile>,
    pitch_delay: Duration,
}

impl CommandInterpreter {
    pub fn new(profile: Arc<Profile>, pitch_delay: Duration) -> Self {
        Self {
            catalog: CommandCatalog::new(),
            profile,
            pitch_delay,
        }
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Dispatch pur : lit les snapshots, ne modifie rien
    pub fn dispatch(&self, raw: &str, metrics: &MetricStore, devices: &DeviceRegistry) -> Outcome {
        let normalized = normalize(raw);
        let command = Command::parse(&normalized);
        tracing::debug!(?command, "dispatching command");

        match command {
            Command::Help => Outcome::recorded(self.catalog.render_help()),
            Command::Clear => Outcome::silent(Effect::ClearHistory),
            Command::Whoami => Outcome::recorded(self.render_whoami()),
            Command::Skills => Outcome::recorded(render_list(
                "skills",
                self.profile.skills.iter().map(|s| s.name.clone()),
            )),
            Command::Experience => Outcome::recorded(render_list(
                "experience",
                self.profile
                    .experience
                    .iter()
                    .map(|e| format!("{} at {} ({})", e.role, e.company, e.period)),
            )),
            Command::Education => Outcome::recorded(render_list(
                "education",
                self.profile
                    .education
                    .iter()
                    .map(|e| format!("{} at {} ({})", e.degree, e.institution, e.period)),
            )),
            Command::Achievements => Outcome::recorded(render_list(
                "achievements",
                self.profile.achievements.iter().map(|a| a.title.clone()),
            )),
            Command::Projects => Outcome::recorded(render_list(
                "projects",
                self.profile
                    .projects
                    .iter()
                    .map(|p| format!("{}: {}", p.title, p.description)),
            )),
            Command::SystemStatus => Outcome::recorded(render_status(metrics, devices)),
            Command::Ping(id) => Outcome::recorded(render_ping(id, devices)),
            Command::Deploy => Outcome::recorded(DEPLOY_OUTPUT),
            Command::Pitch => Outcome {
                output: RenderedOutput::new(self.render_pitch()),
                record: true,
                effect: Effect::ScheduleView {
                    view: View::Dashboard,
                    after: self.pitch_delay,
                },
            },
            Command::Exit => Outcome::silent(Effect::SwitchView(View::Dashboard)),
            Command::Unknown => Outcome::recorded(format!(
                "Command not found: {raw}\nType 'help' for available commands."
            )),
        }
    }

    fn render_whoami(&self) -> String {
        let id = &self.profile.identity;
        format!(
            "{} - {}\nLocation: {}\nEmail: {}\nGitHub: {}",
            id.name, id.title, id.location, id.email, id.github
        )
    }

    fn render_pitch(&self) -> String {
        let target = match &self.profile.identity.pitch_url {
            Some(url) => format!("Opening YouTube embed: {url}"),
            None => "No pitch video configured.".to_string(),
        };
        format!(
            "Loading video pitch...\n{target}\n\nNOTE: Video will be displayed in the dashboard view. Type 'exit' to switch to dashboard."
        )
    }
}

fn render_list(section: &str, items: impl Iterator<Item = String>) -> String {
    let lines: Vec<String> = items.map(|item| format!("- {item}")).collect();
    if lines.is_empty() {
        format!("No {section} available.")
    } else {
        lines.join("\n")
    }
}

/// Ligne de statut composite, lue au moment de l'appel. Une métrique absente
/// est omise plutôt que de faire échouer la commande.
fn render_status(metrics: &MetricStore, devices: &DeviceRegistry) -> String {
    let mut lines = vec!["All systems operational.".to_string()];

    match metrics.get(CPU_USAGE) {
        Some(cpu) => lines.push(format!("CPU: {}%", cpu.value())),
        None => tracing::warn!("metric '{CPU_USAGE}' missing from status report"),
    }
    match metrics.get(MEMORY) {
        Some(mem) => lines.push(format!("Memory: {}GB/{MEMORY_TOTAL_GB}GB", mem.value())),
        None => tracing::warn!("metric '{MEMORY}' missing from status report"),
    }
    match metrics.get(NETWORK) {
        Some(net) => {
            let down = net.value();
            let up = (down / 3.0).floor();
            lines.push(format!("Network: {down}Mbps↓ {up}Mbps↑"));
        }
        None => tracing::warn!("metric '{NETWORK}' missing from status report"),
    }

    let online = devices.count_by_status(crate::models::DeviceStatus::Online);
    lines.push(format!("Active IoT devices: {}/{}", online, devices.len()));
    lines.join("\n")
}

fn render_ping(id: &str, devices: &DeviceRegistry) -> String {
    match devices.get(id) {
        Some(device) => format!(
            "PING {} ({})\nStatus: {}\nLocation: {}\nLast seen: {}\nType: {}",
            device.id(),
            device.name(),
            device.status().as_str().to_uppercase(),
            device.location(),
            device.last_contact(),
            device.device_type(),
        ),
        None => format!("Error: Device {id} not found. Use 'system --status' to see available devices."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metric;

    fn interpreter() -> CommandInterpreter {
        CommandInterpreter::new(Arc::new(Profile::builtin()), Duration::from_secs(2))
    }

    fn stores() -> (MetricStore, DeviceRegistry) {
        (MetricStore::seeded(6, 3.0), DeviceRegistry::seeded(0.3))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse("--help"), Command::Help);
        assert_eq!(Command::parse("system --status"), Command::SystemStatus);
        assert_eq!(Command::parse("system   --status"), Command::SystemStatus);
        assert_eq!(Command::parse("system"), Command::Unknown);
        assert_eq!(Command::parse("ping dev-004"), Command::Ping("dev-004"));
        assert_eq!(Command::parse("ping dev-004 extra"), Command::Ping("dev-004"));
        assert_eq!(Command::parse("ping"), Command::Ping(""));
        assert_eq!(Command::parse("pingdev-004"), Command::Unknown);
        assert_eq!(Command::parse("help me"), Command::Unknown);
        assert_eq!(Command::parse(""), Command::Unknown);
    }

    #[test]
    fn test_normalize_folds_case_and_trims() {
        assert_eq!(normalize("  WhoAmI \n"), "whoami");
        assert_eq!(Command::parse(&normalize(" PING DEV-004 ")), Command::Ping("dev-004"));
    }

    #[test]
    fn test_status_reads_current_state() {
        let (metrics, devices) = stores();
        let outcome = interpreter().dispatch("system --status", &metrics, &devices);
        assert_eq!(
            outcome.output.as_str(),
            "All systems operational.\nCPU: 12%\nMemory: 3.2GB/16GB\nNetwork: 42Mbps↓ 14Mbps↑\nActive IoT devices: 5/8"
        );
        assert!(outcome.record);
        assert_eq!(outcome.effect, Effect::None);
    }

    #[test]
    fn test_status_degrades_without_metrics() {
        let metrics = MetricStore::new(vec![Metric::new(CPU_USAGE, "%", 50.0, [50.0], 6)], 3.0).unwrap();
        let devices = DeviceRegistry::seeded(0.3);
        let out = interpreter().dispatch("system --status", &metrics, &devices).output.into_string();
        assert!(out.contains("CPU: 50%"));
        assert!(!out.contains("Memory"));
        assert!(!out.contains("Network"));
        assert!(out.ends_with("Active IoT devices: 5/8"));
    }

    #[test]
    fn test_ping_found_and_missing() {
        let (metrics, devices) = stores();
        let found = interpreter().dispatch("ping dev-004", &metrics, &devices).output.into_string();
        assert_eq!(
            found,
            "PING dev-004 (Gateway Node)\nStatus: ONLINE\nLocation: Central Hub\nLast seen: 1s ago\nType: network"
        );

        let missing = interpreter().dispatch("ping nope-999", &metrics, &devices);
        assert!(missing.record);
        assert_eq!(
            missing.output.as_str(),
            "Error: Device nope-999 not found. Use 'system --status' to see available devices."
        );
    }

    #[test]
    fn test_unknown_echoes_original_input() {
        let (metrics, devices) = stores();
        let out = interpreter().dispatch("FrobNicate", &metrics, &devices).output.into_string();
        assert_eq!(out, "Command not found: FrobNicate\nType 'help' for available commands.");
    }

    #[test]
    fn test_clear_and_exit_are_silent() {
        let (metrics, devices) = stores();
        let clear = interpreter().dispatch("clear", &metrics, &devices);
        assert!(!clear.record);
        assert!(clear.output.is_empty());
        assert_eq!(clear.effect, Effect::ClearHistory);

        let exit = interpreter().dispatch("EXIT", &metrics, &devices);
        assert!(!exit.record);
        assert_eq!(exit.effect, Effect::SwitchView(View::Dashboard));
    }

    #[test]
    fn test_pitch_schedules_dashboard() {
        let (metrics, devices) = stores();
        let pitch = interpreter().dispatch("pitch", &metrics, &devices);
        assert!(pitch.record);
        assert!(pitch.output.as_str().starts_with("Loading video pitch..."));
        assert_eq!(
            pitch.effect,
            Effect::ScheduleView { view: View::Dashboard, after: Duration::from_secs(2) }
        );
    }

    #[test]
    fn test_reference_listings() {
        let (metrics, devices) = stores();
        let interp = interpreter();

        let skills = interp.dispatch("skills", &metrics, &devices).output.into_string();
        assert_eq!(skills.lines().count(), interp.profile().skills.len());
        assert!(skills.lines().all(|l| l.starts_with("- ")));

        let exp = interp.dispatch("experience", &metrics, &devices).output.into_string();
        assert!(exp.starts_with("- Undergraduate Student Researcher at Embedded Vision Lab (August 2024 - Present)"));

        let who = interp.dispatch("whoami", &metrics, &devices).output.into_string();
        assert!(who.starts_with("Alex Rivera - Systems & Telematics Engineer\nLocation: "));

        let deploy = interp.dispatch("deploy", &metrics, &devices).output.into_string();
        assert!(deploy.ends_with("Deployment successful. All services running."));
        assert_eq!(deploy.lines().count(), 7);
    }

    #[test]
    fn test_empty_section_renders_placeholder() {
        let mut profile = Profile::builtin();
        profile.achievements.clear();
        let interp = CommandInterpreter::new(Arc::new(profile), Duration::from_secs(2));
        let (metrics, devices) = stores();
        let out = interp.dispatch("achievements", &metrics, &devices).output.into_string();
        assert_eq!(out, "No achievements available.");
    }
}
