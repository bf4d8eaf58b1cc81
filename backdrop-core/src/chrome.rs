/// Page chrome: mobile menu state and one-shot scroll reveal
///
/// Independent of the 3D scene. Both pieces only track state; applying the
/// `active` class is left to the front-end.
use std::collections::BTreeSet;

use log::debug;

use crate::input::{Control, EventKind, InputEvent, InputSource};

/// Open/closed state of the mobile navigation panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MobileMenu {
    active: bool,
}

impl MobileMenu {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn open(&mut self) {
        self.active = true;
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    /// Apply a control click; nav links close the menu like the close button
    pub fn handle(&mut self, control: Control) {
        match control {
            Control::MenuToggle => self.open(),
            Control::CloseMenu | Control::NavLink => self.close(),
        }
    }
}

/// Elements waiting for their first reveal.
///
/// An element leaves the pending set the moment it activates, so later
/// intersection reports for it are ignored.
#[derive(Debug, Clone)]
pub struct RevealTracker<K: Ord> {
    pending: BTreeSet<K>,
    threshold: f32,
}

impl<K: Ord + Clone> RevealTracker<K> {
    pub fn new(threshold: f32) -> Self {
        Self {
            pending: BTreeSet::new(),
            threshold,
        }
    }

    pub fn observe(&mut self, key: K) {
        self.pending.insert(key);
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Feed `(element, visible ratio)` reports; returns newly activated elements
    pub fn check<I>(&mut self, entries: I) -> Vec<K>
    where
        I: IntoIterator<Item = (K, f32)>,
    {
        let mut activated = Vec::new();
        for (key, ratio) in entries {
            if ratio >= self.threshold && self.pending.remove(&key) {
                activated.push(key);
            }
        }
        activated
    }
}

/// Menu plus reveal tracking for one page
#[derive(Debug, Clone)]
pub struct PageChrome<K: Ord> {
    pub menu: MobileMenu,
    pub reveals: RevealTracker<K>,
    revealed: usize,
}

impl<K: Ord + Clone> PageChrome<K> {
    pub fn new(reveal_threshold: f32) -> Self {
        Self {
            menu: MobileMenu::default(),
            reveals: RevealTracker::new(reveal_threshold),
            revealed: 0,
        }
    }

    /// Handlers for the events the chrome reacts to
    pub fn input_source() -> InputSource<Self> {
        let mut source = InputSource::new();
        source.on(EventKind::Click, Self::on_click);
        source
    }

    fn on_click(chrome: &mut Self, event: &InputEvent, _now: f64) {
        if let InputEvent::Click(control) = event {
            chrome.menu.handle(*control);
            debug!("menu {:?} -> active={}", control, chrome.menu.is_active());
        }
    }

    /// Run a reveal pass; returns the elements to mark active
    pub fn check_reveals<I>(&mut self, entries: I) -> Vec<K>
    where
        I: IntoIterator<Item = (K, f32)>,
    {
        let activated = self.reveals.check(entries);
        if !activated.is_empty() {
            self.revealed += activated.len();
            debug!(
                "revealed {} element(s), {} still pending",
                activated.len(),
                self.reveals.pending_count()
            );
        }
        activated
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_controls() {
        let mut menu = MobileMenu::default();
        menu.handle(Control::MenuToggle);
        assert!(menu.is_active());
        menu.handle(Control::MenuToggle);
        assert!(menu.is_active());
        menu.handle(Control::NavLink);
        assert!(!menu.is_active());
        menu.handle(Control::MenuToggle);
        menu.handle(Control::CloseMenu);
        assert!(!menu.is_active());
    }

    #[test]
    fn test_each_element_reveals_once() {
        let mut tracker = RevealTracker::new(0.1);
        for id in 0..5 {
            tracker.observe(id);
        }

        let mut activations = vec![0; 5];
        for pass in 0..20 {
            // Elements scroll in and out repeatedly
            let ratio = if pass % 2 == 0 { 0.6 } else { 0.0 };
            for id in tracker.check((0..5).map(|id| (id, ratio))) {
                activations[id] += 1;
            }
        }

        assert_eq!(activations, vec![1; 5]);
        assert_eq!(tracker.pending_count(), 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut tracker = RevealTracker::new(0.1);
        tracker.observe("intro");
        tracker.observe("about");

        assert!(tracker.check([("intro", 0.05), ("about", 0.0)]).is_empty());
        assert_eq!(tracker.check([("intro", 0.1), ("about", 0.09)]), vec!["intro"]);
        assert!(tracker.is_pending(&"about"));
    }

    #[test]
    fn test_unobserved_elements_ignored() {
        let mut tracker = RevealTracker::new(0.1);
        tracker.observe(1);
        assert_eq!(tracker.check([(2, 1.0), (1, 1.0), (1, 1.0)]), vec![1]);
    }

    #[test]
    fn test_chrome_routes_clicks() {
        let source = PageChrome::<u32>::input_source();
        let mut chrome = PageChrome::new(0.1);

        source.dispatch(&mut chrome, &InputEvent::Click(Control::MenuToggle), 0.0);
        assert!(chrome.menu.is_active());
        source.dispatch(&mut chrome, &InputEvent::Click(Control::CloseMenu), 0.0);
        assert!(!chrome.menu.is_active());

        chrome.reveals.observe(3);
        assert_eq!(chrome.check_reveals([(3, 0.5)]), vec![3]);
        assert_eq!(chrome.revealed_count(), 1);
    }
}
