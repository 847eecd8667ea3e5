//! Whole-tree active item tracking: at most one id is active at any time.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveItemTracker {
    active: Option<String>,
}

impl ActiveItemTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the only active item. Returns the previously active id when
    /// the active item actually changed.
    pub fn set_active(&mut self, id: &str) -> Option<Option<String>> {
        if self.active.as_deref() == Some(id) {
            return None;
        }
        Some(self.active.replace(id.to_string()))
    }

    pub fn clear(&mut self) -> Option<String> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_a_new_active_replaces_the_previous() {
        let mut tracker = ActiveItemTracker::new();
        assert_eq!(tracker.set_active("a"), Some(None));
        assert_eq!(tracker.set_active("b"), Some(Some("a".to_string())));
        assert_eq!(tracker.active(), Some("b"));
        assert!(!tracker.is_active("a"));
    }

    #[test]
    fn reactivating_the_same_id_is_not_a_change() {
        let mut tracker = ActiveItemTracker::new();
        tracker.set_active("a");
        assert_eq!(tracker.set_active("a"), None);
        assert_eq!(tracker.clear(), Some("a".to_string()));
        assert_eq!(tracker.active(), None);
    }
}
