//! Change notifications for a grid instance.
//!
//! The presentation layer subscribes once per grid and re-renders on each
//! event instead of diffing state. Subscribers belong to the grid that
//! registered them; `Grid::teardown` drops them all.

use gridkit_core::CellKey;

/// Events emitted by `Grid` after a state transition completes.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// A mutation was committed; row data is final for this input event.
    DataChanged,

    /// Cell values were written (edit commit or paste).
    CellsChanged(CellsChangedEvent),

    /// A row was inserted at `index`.
    RowsInserted { index: usize },

    /// Rows were removed. Indices are pre-removal positions, highest first.
    RowsDeleted { indices: Vec<usize> },

    /// Cell or row selection changed.
    SelectionChanged,

    EditStarted(CellKey),
    EditCommitted(CellKey),
    EditCancelled(CellKey),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellsChangedEvent {
    /// Cells written, in write order.
    pub cells: Vec<CellKey>,
}

/// Callback type for receiving grid events.
pub type EventCallback = Box<dyn FnMut(&GridEvent)>;

/// Callback receiving the full row sequence after every committed mutation.
pub type DataChangeCallback<R> = Box<dyn FnMut(&[R])>;

/// Handle returned by `Grid::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, EventCallback)>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self, callback: EventCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, event: &GridEvent) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<GridEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GridEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only CellsChanged events.
    pub fn cells_changed(&self) -> Vec<&CellsChangedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::CellsChanged(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Number of DataChanged events.
    pub fn data_changes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GridEvent::DataChanged))
            .count()
    }

    /// Number of SelectionChanged events.
    pub fn selection_changes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GridEvent::SelectionChanged))
            .count()
    }

    /// Edit lifecycle events in order.
    pub fn edit_events(&self) -> Vec<&GridEvent> {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GridEvent::EditStarted(_) | GridEvent::EditCommitted(_) | GridEvent::EditCancelled(_)
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_event_collector_filtering() {
        let mut collector = EventCollector::new();

        collector.push(GridEvent::SelectionChanged);
        collector.push(GridEvent::EditStarted(CellKey::new(0, "n")));
        collector.push(GridEvent::CellsChanged(CellsChangedEvent {
            cells: vec![CellKey::new(0, "n")],
        }));
        collector.push(GridEvent::EditCommitted(CellKey::new(0, "n")));

        assert_eq!(collector.len(), 4);
        assert_eq!(collector.cells_changed().len(), 1);
        assert_eq!(collector.selection_changes(), 1);
        assert_eq!(collector.edit_events().len(), 2);
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let seen = Rc::new(RefCell::new(0));
        let mut subs = Subscribers::default();

        let counter = seen.clone();
        let id = subs.subscribe(Box::new(move |_| *counter.borrow_mut() += 1));
        subs.emit(&GridEvent::SelectionChanged);
        assert_eq!(*seen.borrow(), 1);

        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        subs.emit(&GridEvent::SelectionChanged);
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(subs.len(), 0);
    }
}
