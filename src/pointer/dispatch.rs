//! Action dispatch
//!
//! Turns a fired action into a synthesized pointer event delivered at the
//! element under the pointer. Clicks on links also open the destination in a
//! new browsing context, since a synthetic click is not guaranteed to trigger
//! navigation. Every dispatch leaves a short "activated" pulse on the target.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::DispatchConfig;
use crate::document::{ancestors, DocumentHost, Marker};
use crate::input::error::{InputError, Result};
use crate::input::{ActionKind, Point, PointerEvent};

/// What a successful dispatch did
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched<N> {
    /// Element the event was delivered to
    pub target: N,
    /// The synthesized event
    pub event: PointerEvent,
    /// Link destination opened alongside the event
    pub opened_url: Option<String>,
}

/// Synthesizes and delivers pointer events
#[derive(Debug)]
pub struct ActionDispatcher<N> {
    pulse: Duration,
    open_links: bool,
    /// Activated markers waiting to be removed
    pulses: Vec<(N, Instant)>,
}

impl<N: Copy + Eq + std::fmt::Debug + 'static> ActionDispatcher<N> {
    /// Create a dispatcher
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            pulse: Duration::from_millis(config.pulse_ms),
            open_links: config.open_links,
            pulses: Vec::new(),
        }
    }

    /// Deliver `kind` at `at`
    ///
    /// Returns [`InputError::NoTarget`] when nothing is under the point; the
    /// caller treats that as a no-op.
    pub fn dispatch<D>(
        &mut self,
        document: &mut D,
        kind: ActionKind,
        at: Point,
        now: Instant,
    ) -> Result<Dispatched<N>>
    where
        D: DocumentHost<Node = N>,
    {
        let target = document
            .element_at(at)
            .ok_or(InputError::NoTarget { x: at.x, y: at.y })?;

        let event = PointerEvent::new(kind, at, now);
        document.dispatch(target, &event);
        info!(
            "Dispatched {} to {:?} at ({:.1}, {:.1})",
            event.event_type.as_str(),
            target,
            at.x,
            at.y
        );

        let opened_url = if kind == ActionKind::Primary && self.open_links {
            let link = ancestors(&*document, target).find_map(|n| document.link_target(n));
            if let Some(url) = &link {
                info!("Following link {}", url);
                document.open_in_new_context(url);
            }
            link
        } else {
            None
        };

        self.start_pulse(document, target, now);

        Ok(Dispatched {
            target,
            event,
            opened_url,
        })
    }

    /// Remove activated markers whose pulse has run out
    pub fn expire_pulses<D>(&mut self, document: &mut D, now: Instant)
    where
        D: DocumentHost<Node = N>,
    {
        self.pulses.retain(|(node, deadline)| {
            if now >= *deadline {
                document.set_marker(*node, Marker::Activated, false);
                false
            } else {
                true
            }
        });
    }

    /// Remove all activated markers immediately
    pub fn clear<D>(&mut self, document: &mut D)
    where
        D: DocumentHost<Node = N>,
    {
        for (node, _) in self.pulses.drain(..) {
            document.set_marker(node, Marker::Activated, false);
        }
    }

    /// Number of pulses still showing
    pub fn pending_pulses(&self) -> usize {
        self.pulses.len()
    }

    fn start_pulse<D>(&mut self, document: &mut D, node: N, now: Instant)
    where
        D: DocumentHost<Node = N>,
    {
        let deadline = now + self.pulse;
        document.set_marker(node, Marker::Activated, true);
        match self.pulses.iter_mut().find(|(n, _)| *n == node) {
            Some(entry) => entry.1 = deadline,
            None => self.pulses.push((node, deadline)),
        }
        debug!("Activated pulse on {:?} until +{:?}", node, self.pulse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ClassNames, Element, ElementId, MemoryDocument, Rect};
    use crate::input::{PointerEventType, Viewport};

    fn document() -> (MemoryDocument, ElementId, ElementId, ElementId) {
        let mut doc =
            MemoryDocument::new(Viewport::new(1000.0, 800.0).unwrap(), ClassNames::default());
        let root = doc.root();
        let button = doc.append(root, Element::new("button", Rect::new(0.0, 0.0, 100.0, 50.0)));
        let link = doc.append(
            root,
            Element::new("a", Rect::new(200.0, 0.0, 200.0, 50.0)).with_href("https://example.com"),
        );
        let link_text = doc.append(link, Element::new("span", Rect::new(210.0, 10.0, 50.0, 20.0)));
        (doc, button, link, link_text)
    }

    #[test]
    fn test_click_dispatches_at_point() {
        let (mut doc, button, _, _) = document();
        let mut dispatcher = ActionDispatcher::new(&DispatchConfig::default());
        let now = Instant::now();

        let result = dispatcher
            .dispatch(&mut doc, ActionKind::Primary, Point::new(50.0, 25.0), now)
            .unwrap();

        assert_eq!(result.target, button);
        assert_eq!(result.opened_url, None);
        assert_eq!(doc.dispatched().len(), 1);
        let (target, event) = &doc.dispatched()[0];
        assert_eq!(*target, button);
        assert_eq!(event.event_type, PointerEventType::Click);
        assert_eq!(event.position(), Point::new(50.0, 25.0));
    }

    #[test]
    fn test_click_on_anchor_opens_link() {
        let (mut doc, _, link, _) = document();
        let mut dispatcher = ActionDispatcher::new(&DispatchConfig::default());

        let result = dispatcher
            .dispatch(&mut doc, ActionKind::Primary, Point::new(350.0, 25.0), Instant::now())
            .unwrap();

        assert_eq!(result.target, link);
        assert_eq!(result.opened_url.as_deref(), Some("https://example.com"));
        assert_eq!(doc.opened_urls(), ["https://example.com".to_string()]);
    }

    #[test]
    fn test_click_inside_anchor_follows_ancestor() {
        let (mut doc, _, _, link_text) = document();
        let mut dispatcher = ActionDispatcher::new(&DispatchConfig::default());

        let result = dispatcher
            .dispatch(&mut doc, ActionKind::Primary, Point::new(220.0, 20.0), Instant::now())
            .unwrap();

        assert_eq!(result.target, link_text);
        assert_eq!(result.opened_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_context_menu_does_not_navigate() {
        let (mut doc, _, _, _) = document();
        let mut dispatcher = ActionDispatcher::new(&DispatchConfig::default());

        let result = dispatcher
            .dispatch(&mut doc, ActionKind::Context, Point::new(350.0, 25.0), Instant::now())
            .unwrap();

        assert_eq!(result.event.event_type, PointerEventType::ContextMenu);
        assert!(doc.opened_urls().is_empty());
    }

    #[test]
    fn test_no_target_is_reported() {
        let (mut doc, _, _, _) = document();
        let mut dispatcher = ActionDispatcher::new(&DispatchConfig::default());

        let result = dispatcher.dispatch(
            &mut doc,
            ActionKind::Primary,
            Point::new(5000.0, 25.0),
            Instant::now(),
        );
        assert!(matches!(result, Err(InputError::NoTarget { .. })));
        assert!(doc.dispatched().is_empty());
        assert_eq!(dispatcher.pending_pulses(), 0);
    }

    #[test]
    fn test_pulse_expires() {
        let (mut doc, button, _, _) = document();
        let mut dispatcher = ActionDispatcher::new(&DispatchConfig::default());
        let now = Instant::now();

        dispatcher
            .dispatch(&mut doc, ActionKind::Primary, Point::new(50.0, 25.0), now)
            .unwrap();
        assert!(doc.has_class(button, "active"));

        dispatcher.expire_pulses(&mut doc, now + Duration::from_millis(50));
        assert!(doc.has_class(button, "active"));

        dispatcher.expire_pulses(&mut doc, now + Duration::from_millis(100));
        assert!(!doc.has_class(button, "active"));
        assert_eq!(dispatcher.pending_pulses(), 0);
    }

    #[test]
    fn test_repeated_pulse_extends_deadline() {
        let (mut doc, button, _, _) = document();
        let mut dispatcher = ActionDispatcher::new(&DispatchConfig::default());
        let now = Instant::now();
        let at = Point::new(50.0, 25.0);

        dispatcher.dispatch(&mut doc, ActionKind::Primary, at, now).unwrap();
        dispatcher
            .dispatch(&mut doc, ActionKind::Primary, at, now + Duration::from_millis(80))
            .unwrap();
        assert_eq!(dispatcher.pending_pulses(), 1);

        dispatcher.expire_pulses(&mut doc, now + Duration::from_millis(120));
        assert!(doc.has_class(button, "active"));
    }

    #[test]
    fn test_links_disabled() {
        let (mut doc, _, _, _) = document();
        let config = DispatchConfig {
            open_links: false,
            ..Default::default()
        };
        let mut dispatcher = ActionDispatcher::new(&config);

        dispatcher
            .dispatch(&mut doc, ActionKind::Primary, Point::new(350.0, 25.0), Instant::now())
            .unwrap();
        assert!(doc.opened_urls().is_empty());
    }
}
