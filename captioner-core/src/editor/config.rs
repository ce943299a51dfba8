/// Whether locking and unlocking a layer is an undoable step.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPolicy {
    /// Lock state changes immediately and is not recorded.
    #[default]
    Untracked,
    /// Lock state changes are recorded like any other edit.
    Undoable,
}

/// Tunables of the editor. Every field has a sensible default, so a partial
/// config file fills in the rest.
#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo steps. Oldest are dropped first.
    pub history_depth: usize,
    pub lock_policy: LockPolicy,
    /// Pixels moved by an arrow key.
    pub nudge_step: f32,
    /// Pixels moved by shift + arrow key.
    pub nudge_step_large: f32,
    /// Offset of a duplicate from its source, on both axes.
    pub duplicate_offset: f32,
    /// New layers cascade by this much per existing layer...
    pub add_offset_step: f32,
    /// ...for at most this many steps.
    pub add_offset_cap: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: crate::history::DEFAULT_DEPTH,
            lock_policy: LockPolicy::Untracked,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            duplicate_offset: 24.0,
            add_offset_step: 24.0,
            add_offset_cap: 8,
        }
    }
}

impl EditorConfig {
    /// Offset of the next new layer, given how many layers exist.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn add_offset(&self, existing_layers: usize) -> f32 {
        // Capped well below f32's exact integer range.
        existing_layers.min(self.add_offset_cap) as f32 * self.add_offset_step
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn cascade_caps() {
        let config = EditorConfig::default();
        assert_eq!(config.add_offset(0), 0.0);
        assert_eq!(config.add_offset(3), 72.0);
        assert_eq!(config.add_offset(8), 192.0);
        assert_eq!(config.add_offset(50), 192.0);
    }
    #[test]
    fn partial_config_fills_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"history_depth": 5, "lock_policy": "undoable"}"#).unwrap();
        assert_eq!(config.history_depth, 5);
        assert_eq!(config.lock_policy, LockPolicy::Undoable);
        assert_eq!(config.nudge_step_large, 10.0);
    }
}
