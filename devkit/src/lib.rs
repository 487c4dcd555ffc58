/*!
# OpsDeck DevKit - Fixtures et harness de test

Bibliothèque facilitant les tests de sessions console avec:
- Fixtures (devices, métriques, profils) construites sans fichier
- RNG seedé pour des simulations reproductibles
- Harness pilotant une session : commandes, ticks, assertions
*/

pub mod fixtures;
pub mod test_utils;

pub use fixtures::{device, flat_metrics, minimal_profile, registry, seeded_rng, session_with};
pub use test_utils::{TestHarness, TestStats};
