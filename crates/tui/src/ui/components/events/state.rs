use std::collections::VecDeque;

use chrono::{DateTime, Local};
use navtree_types::SidebarEvent;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use serde_json::{Value, json};

/// Oldest entries are dropped past this many.
pub const MAX_EVENT_ENTRIES: usize = 200;

/// One sidebar notification as shown in the log.
#[derive(Debug, Clone)]
pub struct EventEntry {
    pub at: DateTime<Local>,
    pub name: &'static str,
    /// Event payload without the `type` tag.
    pub detail: String,
}

impl EventEntry {
    pub fn from_event(event: &SidebarEvent) -> Self {
        if let SidebarEvent::DataRefreshed { items, timestamp } = event {
            let detail = json!({ "items": items.len(), "timestamp": timestamp }).to_string();
            return Self {
                at: Local::now(),
                name: event.name(),
                detail,
            };
        }
        let detail = match serde_json::to_value(event) {
            Ok(Value::Object(mut fields)) => {
                fields.remove("type");
                Value::Object(fields).to_string()
            }
            Ok(other) => other.to_string(),
            Err(error) => format!("<unserializable: {error}>"),
        };
        Self {
            at: Local::now(),
            name: event.name(),
            detail,
        }
    }
}

#[derive(Debug)]
pub struct EventLogState {
    entries: VecDeque<EventEntry>,
    /// Lines scrolled up from the newest entry.
    pub scroll: usize,
    pub focus: FocusFlag,
    pub last_area: Rect,
}

impl Default for EventLogState {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_EVENT_ENTRIES),
            scroll: 0,
            focus: FocusFlag::named("events"),
            last_area: Rect::default(),
        }
    }
}

impl EventLogState {
    pub fn record(&mut self, event: &SidebarEvent) {
        if self.entries.len() == MAX_EVENT_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(EventEntry::from_event(event));
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &EventEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scroll_up(&mut self) {
        if self.scroll + 1 < self.entries.len() {
            self.scroll += 1;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll = 0;
    }
}

impl HasFocus for EventLogState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use navtree_types::SidebarItem;

    #[test]
    fn detail_omits_the_type_tag() {
        let entry = EventEntry::from_event(&SidebarEvent::ItemExpansion {
            id: "users".into(),
            expanded: true,
        });
        assert_eq!(entry.name, "item-expansion");
        assert_eq!(entry.detail, r#"{"expanded":true,"id":"users"}"#);
    }

    #[test]
    fn refreshed_items_are_summarized_by_count() {
        let entry = EventEntry::from_event(&SidebarEvent::DataRefreshed {
            items: vec![SidebarItem::new("a", "Alpha"), SidebarItem::new("b", "Beta")],
            timestamp: Utc::now(),
        });
        assert_eq!(entry.name, "data-refreshed");
        assert!(entry.detail.starts_with(r#"{"items":2,"timestamp":"#));
    }

    #[test]
    fn log_is_capped() {
        let mut log = EventLogState::default();
        for open in (0..MAX_EVENT_ENTRIES + 5).map(|index| index % 2 == 0) {
            log.record(&SidebarEvent::MobileToggle { open });
        }
        assert_eq!(log.len(), MAX_EVENT_ENTRIES);
        log.scroll_up();
        log.scroll_down();
        log.scroll_down();
        assert_eq!(log.scroll, 0);
    }
}
