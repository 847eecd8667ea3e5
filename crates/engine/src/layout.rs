//! Layout reconciliation for regions adjacent to the sidebar.
//!
//! The sidebar pushes neighbouring regions aside by its effective width: a
//! left-docked sidebar sets `margin_left`, a right-docked one `margin_right`.
//! At or below the mobile breakpoint every region's margins drop to zero,
//! whatever the `responsive` attribute says; that attribute only decides
//! whether the sidebar turns into an overlay drawer.

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use navtree_types::{LayoutInfo, MOBILE_BREAKPOINT, Position, RegionMargins};

/// Quiescence window used to coalesce bursts of resize events.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Inputs of a single layout computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutInput {
    pub position: Position,
    pub collapsed: bool,
    pub width_expanded: u16,
    pub width_collapsed: u16,
    /// Current viewport width; `None` when unknown (treated as desktop).
    pub viewport_width: Option<u16>,
}

/// Pure mapping from layout inputs to margins.
pub fn compute_layout(input: &LayoutInput) -> LayoutInfo {
    let width = if input.collapsed {
        input.width_collapsed
    } else {
        input.width_expanded
    };
    let is_mobile = input.viewport_width.is_some_and(|viewport| viewport <= MOBILE_BREAKPOINT);
    LayoutInfo {
        position: input.position,
        collapsed: input.collapsed,
        width,
        margin_left: if input.position == Position::Left { width } else { 0 },
        margin_right: if input.position == Position::Right { width } else { 0 },
        is_mobile,
    }
}

/// Result of applying a layout to the registered regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedLayout {
    pub info: LayoutInfo,
    /// Regions whose margins changed, with their new margins.
    pub updates: Vec<(String, RegionMargins)>,
    /// `true` when `info` differs from the previously applied layout.
    pub info_changed: bool,
}

/// Tracks adjacent regions and the margins last applied to each.
#[derive(Debug, Clone)]
pub struct LayoutReconciler {
    enabled: bool,
    regions: IndexMap<String, RegionMargins>,
    last: Option<LayoutInfo>,
}

impl Default for LayoutReconciler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LayoutReconciler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            regions: IndexMap::new(),
            last: None,
        }
    }

    /// Start managing regions again. The caller reconciles right after.
    pub fn enable(&mut self) -> bool {
        if self.enabled {
            return false;
        }
        self.enabled = true;
        self.last = None;
        true
    }

    /// Stop managing regions and reset every one of them to zero margins.
    pub fn disable(&mut self) -> Vec<(String, RegionMargins)> {
        if !self.enabled {
            return Vec::new();
        }
        self.enabled = false;
        self.last = None;
        self.reset_all()
    }

    /// Add a region to the managed set. New regions start with zero margins.
    pub fn register_region(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.regions.contains_key(&name) {
            return false;
        }
        self.regions.insert(name, RegionMargins::ZERO);
        self.last = None;
        true
    }

    pub fn regions(&self) -> impl Iterator<Item = (&str, RegionMargins)> {
        self.regions.iter().map(|(name, margins)| (name.as_str(), *margins))
    }

    pub fn margins(&self, name: &str) -> RegionMargins {
        self.regions.get(name).copied().unwrap_or_default()
    }

    /// Apply `info` to every region. Returns `None` when auto-layout is off.
    pub fn reconcile(&mut self, info: LayoutInfo) -> Option<AppliedLayout> {
        if !self.enabled {
            return None;
        }
        let target = RegionMargins::from(&info);
        let mut updates = Vec::new();
        for (name, margins) in self.regions.iter_mut() {
            if *margins != target {
                *margins = target;
                updates.push((name.clone(), target));
            }
        }
        let info_changed = self.last != Some(info);
        self.last = Some(info);
        Some(AppliedLayout {
            info,
            updates,
            info_changed,
        })
    }

    fn reset_all(&mut self) -> Vec<(String, RegionMargins)> {
        let mut updates = Vec::new();
        for (name, margins) in self.regions.iter_mut() {
            if *margins != RegionMargins::ZERO {
                *margins = RegionMargins::ZERO;
                updates.push((name.clone(), RegionMargins::ZERO));
            }
        }
        updates
    }
}

/// Coalesces bursts of viewport resizes into one update after a quiet window.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    window: Duration,
    pending: Option<(u16, Instant)>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DEBOUNCE)
    }
}

impl ResizeDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, pending: None }
    }

    /// Record a resize observed at `now`, restarting the quiet window.
    pub fn note(&mut self, viewport_width: u16, now: Instant) {
        self.pending = Some((viewport_width, now));
    }

    /// When the pending width becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at + self.window)
    }

    /// Take the latest width once the window has elapsed without new resizes.
    pub fn poll(&mut self, now: Instant) -> Option<u16> {
        let (width, at) = self.pending?;
        if now.duration_since(at) < self.window {
            return None;
        }
        self.pending = None;
        Some(width)
    }
}
