//! Load and persist `config.json`.

use std::io;

use tracing::{debug, info, warn};

use crate::domain::config::CONFIG_FILE;
use crate::domain::identities::DEFAULT_PROJECT_ID;
use crate::domain::{AppError, ConfigUpdate, ProjectMeta, SystemConfig, paths};
use crate::ports::DataStore;

/// Load the system config. A missing file yields the default config; an
/// active project that is no longer registered falls back to `default`.
pub fn load<S: DataStore>(store: &S) -> Result<SystemConfig, AppError> {
    let content = match store.read_file(&paths::config()) {
        Ok(content) => content,
        Err(AppError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            debug!(root = %store.describe_root(), "no config file, using defaults");
            return Ok(SystemConfig::default());
        }
        Err(err) => return Err(err),
    };

    let mut config: SystemConfig = serde_json::from_str(&content).map_err(|err| {
        AppError::ParseError { what: CONFIG_FILE.to_string(), details: err.to_string() }
    })?;
    if let Some(dropped) = config.repair_active_project() {
        warn!(project = %dropped, "active project is not registered, using default");
    }
    config.validate()?;
    Ok(config)
}

pub fn save<S: DataStore>(store: &S, config: &SystemConfig) -> Result<(), AppError> {
    let mut content = serde_json::to_string_pretty(config)?;
    content.push('\n');
    store.write_file(&paths::config(), &content)
}

/// Merge a partial update into the stored config and save it.
pub fn update<S: DataStore>(store: &S, update: ConfigUpdate) -> Result<SystemConfig, AppError> {
    let mut config = load(store)?;
    if let Some(project) = &update.active_project {
        if config.project(project).is_none() {
            return Err(AppError::ProjectNotFound(project.clone()));
        }
    }
    config.apply(update);
    config.validate()?;
    save(store, &config)?;
    info!(active_project = %config.active_project, model = %config.defaults.model, "config updated");
    Ok(config)
}

pub fn set_active_project<S: DataStore>(store: &S, project_id: &str) -> Result<(), AppError> {
    let mut config = load(store)?;
    if config.project(project_id).is_none() {
        return Err(AppError::ProjectNotFound(project_id.to_string()));
    }
    config.active_project = project_id.to_string();
    save(store, &config)?;
    info!(project = project_id, "active project changed");
    Ok(())
}

pub fn add_project_meta<S: DataStore>(store: &S, meta: ProjectMeta) -> Result<(), AppError> {
    let mut config = load(store)?;
    if config.project(&meta.id).is_some() {
        return Err(AppError::ProjectExists(meta.id));
    }
    config.projects.push(meta);
    save(store, &config)
}

/// Unregister a project. Removing the active project makes `default` active.
pub fn remove_project_meta<S: DataStore>(store: &S, project_id: &str) -> Result<(), AppError> {
    if project_id == DEFAULT_PROJECT_ID {
        return Err(AppError::DefaultProjectProtected);
    }
    let mut config = load(store)?;
    if config.project(project_id).is_none() {
        return Err(AppError::ProjectNotFound(project_id.to_string()));
    }
    config.projects.retain(|project| project.id != project_id);
    if config.active_project == project_id {
        config.active_project = DEFAULT_PROJECT_ID.to_string();
    }
    save(store, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutputMode;
    use crate::testing::MemoryDataStore;

    fn meta(id: &str) -> ProjectMeta {
        ProjectMeta {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: None,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let store = MemoryDataStore::new();
        let config = load(&store).unwrap();
        assert_eq!(config.active_project, "default");
        assert!(store.paths().is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let store = MemoryDataStore::new().with_file("config.json", "{ not json");
        let err = load(&store).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config.json"));
    }

    #[test]
    fn dangling_active_project_can_be_repaired() {
        let store = MemoryDataStore::new().with_file(
            "config.json",
            r#"{"activeProject":"gone","projects":[{"id":"default","name":"Default Project","createdAt":"2026-01-01T00:00:00Z"},{"id":"web","name":"Web","createdAt":"2026-01-01T00:00:00Z"}]}"#,
        );
        assert_eq!(load(&store).unwrap().active_project, "default");

        let config = update(
            &store,
            ConfigUpdate { active_project: Some("web".into()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(config.active_project, "web");
        assert_eq!(load(&store).unwrap().active_project, "web");

        remove_project_meta(&store, "web").unwrap();
        assert_eq!(load(&store).unwrap().active_project, "default");
    }

    #[test]
    fn save_then_load_preserves_projects() {
        let store = MemoryDataStore::new();
        add_project_meta(&store, meta("web")).unwrap();
        let content = store.read_file(&paths::config()).unwrap();
        assert!(content.contains("\"activeProject\": \"default\""));
        assert!(content.ends_with("}\n"));
        assert!(load(&store).unwrap().project("web").is_some());
    }

    #[test]
    fn duplicate_project_is_rejected() {
        let store = MemoryDataStore::new();
        add_project_meta(&store, meta("web")).unwrap();
        assert!(matches!(add_project_meta(&store, meta("web")), Err(AppError::ProjectExists(_))));
    }

    #[test]
    fn removing_active_project_resets_to_default() {
        let store = MemoryDataStore::new();
        add_project_meta(&store, meta("web")).unwrap();
        set_active_project(&store, "web").unwrap();
        remove_project_meta(&store, "web").unwrap();

        let config = load(&store).unwrap();
        assert_eq!(config.active_project, "default");
        assert!(config.project("web").is_none());
    }

    #[test]
    fn default_project_cannot_be_removed() {
        let store = MemoryDataStore::new();
        assert!(matches!(
            remove_project_meta(&store, "default"),
            Err(AppError::DefaultProjectProtected)
        ));
    }

    #[test]
    fn unknown_active_project_is_rejected() {
        let store = MemoryDataStore::new();
        assert!(matches!(set_active_project(&store, "ghost"), Err(AppError::ProjectNotFound(_))));
        let err = update(
            &store,
            ConfigUpdate { active_project: Some("ghost".into()), ..Default::default() },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ProjectNotFound(_)));
    }

    #[test]
    fn update_merges_and_saves() {
        let store = MemoryDataStore::new();
        let config = update(
            &store,
            ConfigUpdate {
                output_mode: Some(OutputMode::PromptAndDoc),
                model: Some("gpt-4.1".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(config.defaults.model, "gpt-4.1");

        let reloaded = load(&store).unwrap();
        assert_eq!(reloaded.defaults.output_mode, OutputMode::PromptAndDoc);
        assert_eq!(reloaded.active_project, "default");
    }

    #[test]
    fn blank_model_is_rejected() {
        let store = MemoryDataStore::new();
        let err =
            update(&store, ConfigUpdate { model: Some("  ".into()), ..Default::default() })
                .unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }
}
