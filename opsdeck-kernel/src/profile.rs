/**
 * PROFILE - Données de référence statiques (identité, skills, parcours...)
 *
 * RÔLE : Données possédées par la couche de présentation, lues par
 * whoami / skills / experience / education / achievements / projects.
 *
 * FONCTIONNEMENT :
 * - Profile::builtin() = profil d'exemple embarqué
 * - Profile::load(path) = profil YAML fourni au démarrage (console.profile_path)
 */

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub github: String,
    pub pitch_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub period: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub identity: Identity,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Profile {
    pub fn from_yaml_str(txt: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(txt)?)
    }

    /// Charge un profil depuis un fichier YAML
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = tokio::fs::read_to_string(path).await?;
        serde_yaml::from_str(&txt).map_err(|source| ConsoleError::Profile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Profil d'exemple embarqué
    pub fn builtin() -> Self {
        let skills = [
            "Backend Development", "Rust", "Go", "Python", "Kubernetes",
            "AWS", "Terraform", "CI/CD", "Embedded Systems", "Competitive Programming",
        ]
        .into_iter()
        .map(|name| Skill { name: name.to_string() })
        .collect();

        Self {
            identity: Identity {
                name: "Alex Rivera".into(),
                title: "Systems & Telematics Engineer".into(),
                location: "Lyon, France".into(),
                email: "alex.rivera@example.com".into(),
                github: "github.com/alex-rivera".into(),
                pitch_url: Some("https://www.youtube.com/embed/opsdeck-pitch".into()),
            },
            skills,
            experience: vec![
                Experience {
                    role: "Undergraduate Student Researcher".into(),
                    company: "Embedded Vision Lab".into(),
                    period: "August 2024 - Present".into(),
                    highlights: vec![
                        "Maintained a desktop capture tool for depth-camera skeleton data.".into(),
                        "Built a BLE firmware streaming IMU data from a microcontroller.".into(),
                    ],
                },
                Experience {
                    role: "Software Developer Apprentice".into(),
                    company: "Northwind Labs".into(),
                    period: "June 2024 - July 2024".into(),
                    highlights: vec!["Built a document comparison service backed by a vision model.".into()],
                },
                Experience {
                    role: "Competitive Programming Club Mentor".into(),
                    company: "Institute of Engineering".into(),
                    period: "February 2024 - Present".into(),
                    highlights: vec![],
                },
                Experience {
                    role: "Applied Mathematics Teaching Assistant".into(),
                    company: "Institute of Engineering".into(),
                    period: "January 2022 - Present".into(),
                    highlights: vec![],
                },
            ],
            education: vec![
                Education {
                    degree: "Systems Engineering".into(),
                    institution: "Institute of Engineering".into(),
                    period: "July 2022 - June 2026".into(),
                },
                Education {
                    degree: "Telematics Engineering".into(),
                    institution: "Institute of Engineering".into(),
                    period: "January 2021 - July 2026".into(),
                },
                Education {
                    degree: "Electronics Technician".into(),
                    institution: "Technical Training Centre".into(),
                    period: "January 2018 - December 2020".into(),
                },
            ],
            achievements: vec![
                Achievement { title: "40th Place in National Programming Marathon 2023".into() },
                Achievement { title: "17th Place in Regional Programming Marathon 2023".into() },
                Achievement { title: "First category honorary scholarship".into() },
            ],
            projects: vec![
                Project {
                    title: "Packaging PDF Comparator".into(),
                    description: "Automatically identifies differences between product packaging PDFs.".into(),
                    technologies: vec!["Python".into(), "Flask".into()],
                },
                Project {
                    title: "IoT Data Collection System".into(),
                    description: "Embedded system streaming IMU sensor data over Bluetooth Low Energy.".into(),
                    technologies: vec!["Kotlin".into(), "Arduino".into(), "BLE".into()],
                },
            ],
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
identity:
  name: Sam Ops
  title: Operator
  location: Nowhere
  email: sam@example.com
  github: github.com/sam
skills:
  - name: Rust
projects:
  - title: Console
    description: A console
"#;

    #[test]
    fn test_profile_from_yaml() {
        let profile = Profile::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(profile.identity.name, "Sam Ops");
        assert!(profile.identity.pitch_url.is_none());
        assert_eq!(profile.skills.len(), 1);
        assert!(profile.experience.is_empty());
        assert_eq!(profile.projects[0].title, "Console");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(matches!(
            Profile::from_yaml_str("identity: [1, 2"),
            Err(ConsoleError::Yaml(_))
        ));
    }

    #[tokio::test]
    async fn test_load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.yaml");
        std::fs::write(&path, "skills: not-a-list").unwrap();

        match Profile::load(&path).await {
            Err(ConsoleError::Profile { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Profile::load(dir.path().join("absent.yaml")).await;
        assert!(matches!(result, Err(ConsoleError::Io(_))));
    }

    #[test]
    fn test_builtin_profile_is_populated() {
        let profile = Profile::builtin();
        assert!(!profile.skills.is_empty());
        assert!(!profile.experience.is_empty());
        assert!(!profile.education.is_empty());
        assert!(!profile.achievements.is_empty());
        assert!(!profile.projects.is_empty());
        assert!(profile.identity.pitch_url.is_some());
    }
}
