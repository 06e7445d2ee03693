// Input configuration and remapping system

use super::action::{Action, InputSource};
use std::collections::HashMap;

/// Input configuration
/// Maps input sources (keys/buttons) to game actions
#[derive(Debug, Clone, Default)]
pub struct InputConfig {
    /// Mapping from input sources to actions
    bindings: HashMap<InputSource, Action>,

    /// Reverse mapping for quick lookups (action -> all sources)
    action_to_sources: HashMap<Action, Vec<InputSource>>,
}

impl InputConfig {
    /// Create an empty input configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(bindings: Vec<(InputSource, Action)>) -> Self {
        let mut config = Self::new();
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    /// Bind an input source to an action
    pub fn bind(&mut self, source: InputSource, action: Action) {
        // Remove any existing binding for this source
        self.unbind_source(source);

        self.bindings.insert(source, action);
        self.action_to_sources.entry(action).or_default().push(source);
    }

    /// Unbind an input source
    pub fn unbind_source(&mut self, source: InputSource) {
        if let Some(action) = self.bindings.remove(&source) {
            if let Some(sources) = self.action_to_sources.get_mut(&action) {
                sources.retain(|s| *s != source);
                if sources.is_empty() {
                    self.action_to_sources.remove(&action);
                }
            }
        }
    }

    /// Get the action bound to an input source
    pub fn get_action(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }

    /// Get all input sources bound to an action
    pub fn get_sources(&self, action: Action) -> Vec<InputSource> {
        self.action_to_sources
            .get(&action)
            .cloned()
            .unwrap_or_default()
    }

    /// Check if an action has any bindings
    pub fn has_binding(&self, action: Action) -> bool {
        self.action_to_sources.contains_key(&action)
    }

    /// Clear all bindings
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.action_to_sources.clear();
    }

    /// Reset to the default knight bindings
    pub fn reset_to_defaults(&mut self) {
        self.clear();
        for (source, action) in super::action::default_bindings() {
            self.bind(source, action);
        }
    }
}

/// Character bindings plus global bindings
#[derive(Debug)]
pub struct InputConfigManager {
    config: InputConfig,
    global_config: InputConfig,
}

impl InputConfigManager {
    /// Create a config manager with default bindings
    pub fn new() -> Self {
        let mut config = InputConfig::new();
        config.reset_to_defaults();

        Self {
            config,
            global_config: InputConfig::from_bindings(super::action::global_bindings()),
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut InputConfig {
        &mut self.config
    }

    /// Get the action for a given input source
    /// Checks character bindings first, then global bindings
    pub fn get_action(&self, source: InputSource) -> Option<Action> {
        self.config
            .get_action(source)
            .or_else(|| self.global_config.get_action(source))
    }

    /// Reset the character bindings to defaults
    pub fn reset_to_defaults(&mut self) {
        self.config.reset_to_defaults();
    }
}

impl Default for InputConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bind_action() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyA);
        config.bind(source, Action::MoveLeft);

        assert_eq!(config.get_action(source), Some(Action::MoveLeft));
    }

    #[test]
    fn test_unbind_source_keeps_other_sources() {
        let mut config = InputConfig::new();
        let source1 = InputSource::key(KeyCode::KeyA);
        let source2 = InputSource::key(KeyCode::ArrowLeft);

        config.bind(source1, Action::MoveLeft);
        config.bind(source2, Action::MoveLeft);
        config.unbind_source(source1);

        assert_eq!(config.get_action(source1), None);
        assert_eq!(config.get_sources(Action::MoveLeft), vec![source2]);
    }

    #[test]
    fn test_get_sources() {
        let config = InputConfig::from_bindings(vec![
            (InputSource::key(KeyCode::KeyX), Action::Attack),
            (InputSource::key(KeyCode::KeyJ), Action::Attack),
        ]);

        let sources = config.get_sources(Action::Attack);
        assert_eq!(sources.len(), 2);
        assert!(sources.contains(&InputSource::key(KeyCode::KeyJ)));
    }

    #[test]
    fn test_rebind_source() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyA);

        config.bind(source, Action::MoveLeft);
        config.bind(source, Action::Dash);

        assert_eq!(config.get_action(source), Some(Action::Dash));
        assert!(!config.has_binding(Action::MoveLeft));
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut config = InputConfig::new();
        config.bind(InputSource::key(KeyCode::KeyZ), Action::MoveLeft);
        config.reset_to_defaults();

        assert_eq!(config.get_action(InputSource::key(KeyCode::KeyZ)), None);
        assert!(config.has_binding(Action::HeavyAttack));
        assert!(config.has_binding(Action::DashModifier));
    }

    #[test]
    fn test_manager_falls_back_to_global_bindings() {
        let manager = InputConfigManager::new();
        assert_eq!(
            manager.get_action(InputSource::key(KeyCode::Escape)),
            Some(Action::Pause)
        );
        assert_eq!(
            manager.get_action(InputSource::key(KeyCode::Space)),
            Some(Action::Jump)
        );
    }

    #[test]
    fn test_manager_reset() {
        let mut manager = InputConfigManager::new();
        manager.config_mut().clear();
        manager.reset_to_defaults();

        assert!(manager.config().has_binding(Action::MoveLeft));
    }
}
