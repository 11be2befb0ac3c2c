//! Editable workload form state
//!
//! `WorkloadForm` holds the Apps and Components a user is describing before
//! submission. Every edit is a pure transition: it takes `&self` and returns a
//! new form, leaving Apps and Components it does not target untouched.
//!
//! Two structural invariants hold for every reachable form:
//! - there is always at least one App
//! - every App has at least one Component
//!
//! Indices are zero-based. Out-of-range indices leave the form unchanged.

use crate::error::{CostctlError, Result};
use crate::model::{App, Component};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadForm {
    #[serde(default)]
    apps: Vec<App>,
}

impl Default for WorkloadForm {
    fn default() -> Self {
        Self {
            apps: vec![App::blank("App1")],
        }
    }
}

impl WorkloadForm {
    /// Build a form from existing Apps, restoring the structural invariants.
    pub fn from_apps(apps: Vec<App>) -> Self {
        if apps.is_empty() {
            return Self::default();
        }
        let apps = apps
            .into_iter()
            .map(|mut app| {
                if app.components.is_empty() {
                    app.components.push(Component::default());
                }
                app
            })
            .collect();
        Self { apps }
    }

    pub fn apps(&self) -> &[App] {
        &self.apps
    }

    pub fn app(&self, index: usize) -> Option<&App> {
        self.apps.get(index)
    }

    pub fn component(&self, app_index: usize, comp_index: usize) -> Option<&Component> {
        self.apps.get(app_index)?.components.get(comp_index)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Always false for a form built through this module.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Append an App named after the new count, with one blank Component.
    pub fn add_app(&self) -> Self {
        let mut apps = self.apps.clone();
        apps.push(App::blank(format!("App{}", apps.len() + 1)));
        Self { apps }
    }

    /// Remove an App. No-op when it is the last one.
    pub fn remove_app(&self, index: usize) -> Self {
        if self.apps.len() <= 1 || index >= self.apps.len() {
            return self.clone();
        }
        let apps = self
            .apps
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, app)| app.clone())
            .collect();
        Self { apps }
    }

    /// Replace an App. A replacement without Components gains a blank one.
    pub fn update_app(&self, index: usize, app: App) -> Self {
        if index >= self.apps.len() {
            return self.clone();
        }
        let mut app = app;
        if app.components.is_empty() {
            app.components.push(Component::default());
        }
        let mut apps = self.apps.clone();
        apps[index] = app;
        Self { apps }
    }

    pub fn add_component(&self, app_index: usize) -> Self {
        self.with_app(app_index, |app| app.components.push(Component::default()))
    }

    /// Remove a Component. No-op when it would leave its App empty.
    pub fn remove_component(&self, app_index: usize, comp_index: usize) -> Self {
        self.with_app(app_index, |app| {
            if app.components.len() > 1 && comp_index < app.components.len() {
                app.components.remove(comp_index);
            }
        })
    }

    pub fn update_component(&self, app_index: usize, comp_index: usize, component: Component) -> Self {
        self.with_app(app_index, |app| {
            if let Some(slot) = app.components.get_mut(comp_index) {
                *slot = component;
            }
        })
    }

    fn with_app(&self, app_index: usize, edit: impl FnOnce(&mut App)) -> Self {
        let mut apps = self.apps.clone();
        if let Some(app) = apps.get_mut(app_index) {
            edit(app);
        }
        Self { apps }
    }

    /// Load a workload draft. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CostctlError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read workload {}: {}", path.display(), e),
            ))
        })?;
        let parsed = if is_json(path) {
            serde_json::from_str::<Self>(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str::<Self>(&content).map_err(|e| e.to_string())
        };
        // Drafts are user input in either format
        let form = parsed.map_err(|reason| CostctlError::Validation {
            field: "workload".to_string(),
            reason: format!("Failed to parse workload {}: {}", path.display(), reason),
        })?;
        Ok(Self::from_apps(form.apps))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self).map_err(|e| {
                CostctlError::Io(std::io::Error::other(format!(
                    "Failed to serialize workload: {}",
                    e
                )))
            })?
        };
        fs::write(path, content)?;
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_form() {
        let form = WorkloadForm::default();
        assert_eq!(form.len(), 1);
        let app = form.app(0).unwrap();
        assert_eq!(app.app, "App1");
        assert!(app.share);
        assert_eq!(app.components.len(), 1);
        assert!(!app.components[0].is_complete());
    }

    #[test]
    fn test_add_app_names_by_count() {
        let form = WorkloadForm::default().add_app().add_app();
        let labels: Vec<&str> = form.apps().iter().map(|a| a.app.as_str()).collect();
        assert_eq!(labels, vec!["App1", "App2", "App3"]);
        assert!(form.apps().iter().all(|a| a.components.len() == 1));
    }

    #[test]
    fn test_remove_last_app_is_noop() {
        let form = WorkloadForm::default();
        assert_eq!(form.remove_app(0), form);
    }

    #[test]
    fn test_remove_app_keeps_others() {
        let form = WorkloadForm::default()
            .add_app()
            .update_component(0, 0, Component::new("web", 2, 4));
        let after = form.remove_app(1);
        assert_eq!(after.len(), 1);
        assert_eq!(after.component(0, 0).unwrap().name, "web");
        // input form untouched
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn test_remove_last_component_is_noop() {
        let form = WorkloadForm::default();
        assert_eq!(form.remove_component(0, 0), form);
    }

    #[test]
    fn test_component_edits_are_scoped() {
        let form = WorkloadForm::default()
            .add_app()
            .add_component(1)
            .update_component(1, 1, Component::new("db", 4, 16));
        assert_eq!(form.app(0).unwrap().components.len(), 1);
        assert_eq!(form.app(1).unwrap().components.len(), 2);
        assert_eq!(form.component(1, 1).unwrap().name, "db");

        let removed = form.remove_component(1, 0);
        assert_eq!(removed.app(1).unwrap().components.len(), 1);
        assert_eq!(removed.component(1, 0).unwrap().name, "db");
    }

    #[test]
    fn test_update_app_refills_empty_components() {
        let form = WorkloadForm::default().update_app(
            0,
            App {
                app: "frontend".to_string(),
                share: false,
                components: Vec::new(),
            },
        );
        let app = form.app(0).unwrap();
        assert_eq!(app.app, "frontend");
        assert!(!app.share);
        assert_eq!(app.components.len(), 1);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let form = WorkloadForm::default();
        assert_eq!(form.update_component(3, 0, Component::new("x", 1, 1)), form);
        assert_eq!(form.add_component(9), form);
        assert_eq!(form.update_app(2, App::blank("x")), form);
    }

    #[test]
    fn test_save_and_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("workload.toml");
        let form = WorkloadForm::default()
            .update_component(0, 0, Component::new("web", 2, 4))
            .add_app();
        form.save(&path).unwrap();

        let loaded = WorkloadForm::load(&path).unwrap();
        assert_eq!(loaded, form);
    }

    #[test]
    fn test_load_json_restores_invariants() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("workload.json");
        std::fs::write(&path, r#"{"apps": [{"app": "api", "components": []}]}"#).unwrap();

        let loaded = WorkloadForm::load(&path).unwrap();
        let app = loaded.app(0).unwrap();
        assert!(app.share);
        assert_eq!(app.components.len(), 1);

        std::fs::write(&path, r#"{"apps": []}"#).unwrap();
        assert_eq!(WorkloadForm::load(&path).unwrap(), WorkloadForm::default());
    }

    #[test]
    fn test_load_toml_with_wire_names() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("workload.toml");
        std::fs::write(
            &path,
            r#"
[[apps]]
app = "shop"
share = false

[[apps.components]]
name = "web"
vCPUs = 2
memory = 4
behavior = "stop"
frequency = 1
"#,
        )
        .unwrap();

        let loaded = WorkloadForm::load(&path).unwrap();
        let component = loaded.component(0, 0).unwrap();
        assert_eq!(component.vcpus, 2);
        assert_eq!(component.effective_frequency().band(), 1);
        assert!(!loaded.app(0).unwrap().share);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = WorkloadForm::load(&temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(CostctlError::Io(_))));
    }
}
