use serde::Serialize;

/// Une commande reconnue par l'interpréteur
#[derive(Debug, Clone, Serialize)]
pub struct CommandSpec {
    pub usage: &'static str,
    pub description: &'static str,
}

/// Catalogue ordonné des commandes, source unique du texte de `help`
#[derive(Debug, Clone)]
pub struct CommandCatalog {
    commands: Vec<CommandSpec>,
}

const USAGE_WIDTH: usize = 21;

impl CommandCatalog {
    pub fn new() -> Self {
        let entries: [(&'static str, &'static str); 13] = [
            ("help", "Show this help message"),
            ("clear", "Clear terminal history"),
            ("whoami", "Display user information"),
            ("skills", "List technical skills"),
            ("experience", "Show work experience"),
            ("education", "Show educational background"),
            ("achievements", "List achievements and awards"),
            ("projects", "Show projects"),
            ("system --status", "Display system status"),
            ("ping [device-id]", "Check device status"),
            ("deploy", "Simulate deployment"),
            ("pitch", "Display video pitch"),
            ("exit", "Exit terminal (switch to dashboard)"),
        ];

        Self {
            commands: entries
                .into_iter()
                .map(|(usage, description)| CommandSpec { usage, description })
                .collect(),
        }
    }

    pub fn list_commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Recherche par premier mot de l'usage (ex: "ping" -> "ping [device-id]")
    pub fn get_command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands
            .iter()
            .find(|c| c.usage.split_whitespace().next() == Some(name))
    }

    /// Texte rendu par `help`
    pub fn render_help(&self) -> String {
        let mut out = String::from("Available commands:\n");
        for cmd in &self.commands {
            out.push_str(&format!("  {:<width$}{}\n", cmd.usage, cmd.description, width = USAGE_WIDTH));
        }
        out
    }
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_command() {
        let catalog = CommandCatalog::new();
        let help = catalog.render_help();
        assert!(help.starts_with("Available commands:"));
        for cmd in catalog.list_commands() {
            assert!(help.contains(cmd.usage), "missing {}", cmd.usage);
            assert!(help.contains(cmd.description));
        }
        assert!(help.contains("  ping [device-id]     Check device status"));
    }

    #[test]
    fn test_get_command_by_first_word() {
        let catalog = CommandCatalog::new();
        assert_eq!(catalog.get_command("ping").unwrap().usage, "ping [device-id]");
        assert_eq!(catalog.get_command("system").unwrap().usage, "system --status");
        assert!(catalog.get_command("frobnicate").is_none());
    }
}
