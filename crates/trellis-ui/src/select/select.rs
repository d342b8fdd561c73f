use tracing::trace;
use trellis_core::NodeId;
use trellis_core::alloc::HashMap;

use crate::context::UiContext;
use crate::event::{Emitter, PointerEvent, PointerKind};
use crate::group::{Group, GroupItem};
use crate::select::option::{OptionValue, OptionWidget};
use crate::widget::{Widget, WidgetBase};

/// Notifications emitted by a [`SelectWidget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEvent<D> {
    /// Highlight moved to the item with this data, or was cleared.
    Highlight(Option<D>),
    /// Selection moved to the item with this data, or was cleared.
    Select(Option<D>),
    /// Items were added at `index`.
    Add { data: Vec<D>, index: usize },
    /// Items were removed.
    Remove(Vec<D>),
}

/// Direction of a relative traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(&self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Ordered option list with exclusive selection and highlight.
///
/// At most one option is selected and at most one is highlighted at any time.
/// Options are unique by data: adding an option whose data is already present
/// moves the existing option and discards the new one.
#[derive(Debug)]
pub struct SelectWidget<D: OptionValue> {
    base: WidgetBase,
    group: Group<OptionWidget<D>>,
    hashes: HashMap<D, NodeId>,
    pressed: bool,
    selecting: Option<NodeId>,
    events: Emitter<SelectEvent<D>>,
}

impl<D: OptionValue> SelectWidget<D> {
    pub fn new(ctx: &UiContext) -> Self {
        Self::with_class(ctx, "trellis-select")
    }

    pub(crate) fn with_class(ctx: &UiContext, class: &str) -> Self {
        let base = WidgetBase::new(ctx, "div", "trellis-select");
        base.element().add_class(class);
        let group = Group::new(ctx, base.element().node());
        Self {
            base,
            group,
            hashes: HashMap::new(),
            pressed: false,
            selecting: None,
            events: Emitter::new(),
        }
    }

    pub fn events_mut(&mut self) -> &mut Emitter<SelectEvent<D>> {
        &mut self.events
    }

    pub fn items(&self) -> &[OptionWidget<D>] {
        self.group.items()
    }

    pub fn len(&self) -> usize {
        self.group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }

    pub fn item(&self, node: NodeId) -> Option<&OptionWidget<D>> {
        self.group.get(node)
    }

    pub fn item_mut(&mut self, node: NodeId) -> Option<&mut OptionWidget<D>> {
        self.group.get_mut(node)
    }

    /// Node of the item carrying `data`.
    pub fn item_from_data(&self, data: &D) -> Option<NodeId> {
        self.hashes.get(data).copied()
    }

    pub fn selected_item(&self) -> Option<NodeId> {
        self.group.iter().find(|i| i.is_selected()).map(GroupItem::node)
    }

    pub fn highlighted_item(&self) -> Option<NodeId> {
        self.group
            .iter()
            .find(|i| i.is_highlighted())
            .map(GroupItem::node)
    }

    fn data_of(&self, node: Option<NodeId>) -> Option<D> {
        node.and_then(|n| self.group.get(n)).map(|i| i.data().clone())
    }

    /// Highlight exactly `item`, or nothing.
    pub fn highlight_item(&mut self, item: Option<NodeId>) {
        for option in self.group.iter_mut() {
            option.set_highlighted(Some(option.node()) == item);
        }
        let data = self.data_of(self.highlighted_item());
        self.events.emit(&SelectEvent::Highlight(data));
    }

    /// Select exactly `item`, or nothing.
    pub fn select_item(&mut self, item: Option<NodeId>) {
        for option in self.group.iter_mut() {
            option.set_selected(Some(option.node()) == item);
        }
        let data = self.data_of(self.selected_item());
        self.events.emit(&SelectEvent::Select(data));
    }

    /// Select and highlight `item` without emitting notifications.
    ///
    /// Used to sync the list with external state without echoing the change
    /// back to listeners.
    pub fn initialize_selection(&mut self, item: Option<NodeId>) {
        for option in self.group.iter_mut() {
            let on = Some(option.node()) == item;
            option.set_selected(on);
            option.set_highlighted(on);
        }
    }

    /// Next selectable item after (or before) `item`, wrapping around.
    ///
    /// With no `item` the scan starts at the boundary in the direction of travel.
    /// Every slot is visited at most once, `item` itself last.
    pub fn relative_selectable_item(&self, item: Option<NodeId>, direction: Direction) -> Option<NodeId> {
        let len = self.group.len() as isize;
        if len == 0 {
            return None;
        }
        let step = direction.step();
        let start = match item.and_then(|n| self.group.position(n)) {
            Some(index) => index as isize,
            None if step > 0 => -1,
            None => len,
        };

        (1..=len)
            .map(|i| (start + step * i).rem_euclid(len) as usize)
            .map(|index| &self.group.items()[index])
            .find(|option| option.is_selectable())
            .map(GroupItem::node)
    }

    pub fn first_selectable_item(&self) -> Option<NodeId> {
        self.group
            .iter()
            .find(|option| option.is_selectable())
            .map(GroupItem::node)
    }

    /// Add options at `index`, appending by default.
    ///
    /// An option whose data is already present is destroyed; the existing
    /// option with that data takes its place in the inserted run.
    pub fn add_items(&mut self, items: Vec<OptionWidget<D>>, index: Option<usize>) {
        let mut index = index;
        let mut pending: Vec<OptionWidget<D>> = Vec::with_capacity(items.len());

        for item in items {
            let Some(&existing) = self.hashes.get(item.data()) else {
                self.hashes.insert(item.data().clone(), item.node());
                pending.push(item);
                continue;
            };
            trace!("Option already present, reusing existing item");
            item.destroy();

            if pending.iter().any(|p| p.node() == existing) {
                continue;
            }
            if let Some(pos) = self.group.position(existing) {
                if let Some(i) = index.as_mut()
                    && pos < *i
                {
                    *i -= 1;
                }
                pending.extend(self.group.remove_items(&[existing]));
            }
        }

        let count = pending.len();
        let data: Vec<D> = pending.iter().map(|i| i.data().clone()).collect();
        let at = index.map_or(self.group.len(), |i| i.min(self.group.len()));
        self.group.add_items(pending, Some(at));

        let index = if index.is_some() { at } else { self.group.len() - count };
        self.events.emit(&SelectEvent::Add { data, index });
    }

    /// Detach the options at `nodes` and hand them back for reuse.
    ///
    /// Removing the selected option clears the selection.
    pub fn remove_items(&mut self, nodes: &[NodeId]) -> Vec<OptionWidget<D>> {
        let removes_selected = self
            .selected_item()
            .is_some_and(|selected| nodes.contains(&selected));
        if removes_selected {
            self.select_item(None);
        }

        let removed = self.group.remove_items(nodes);
        for item in &removed {
            self.hashes.remove(item.data());
        }
        let data = removed.iter().map(|i| i.data().clone()).collect();
        self.events.emit(&SelectEvent::Remove(data));
        removed
    }

    /// Detach every option and hand them back; the selection is cleared.
    pub fn clear_items(&mut self) -> Vec<OptionWidget<D>> {
        self.select_item(None);
        self.hashes.clear();
        let removed = self.group.clear_items();
        let data = removed.iter().map(|i| i.data().clone()).collect();
        self.events.emit(&SelectEvent::Remove(data));
        removed
    }

    /// Item whose element contains `target`.
    pub fn target_item(&self, target: Option<NodeId>) -> Option<NodeId> {
        let target = target?;
        self.group
            .iter()
            .find(|option| option.element().contains(target))
            .map(GroupItem::node)
    }

    fn selectable_target(&self, target: Option<NodeId>) -> Option<NodeId> {
        self.target_item(target)
            .filter(|node| self.group.get(*node).is_some_and(|o| o.is_selectable()))
    }

    /// Press, drag and release selection plus hover highlighting.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let (handled, commit) = self.track_pointer(event);
        if commit.is_some() {
            self.select_item(commit);
        }
        handled
    }

    /// Pointer tracking without the final commit. Returns whether the event was
    /// consumed and the item a release should select.
    pub(crate) fn track_pointer(&mut self, event: &PointerEvent) -> (bool, Option<NodeId>) {
        let disabled = self.base.is_disabled();
        match event.kind {
            PointerKind::Down => {
                if disabled || !event.is_left() {
                    return (false, None);
                }
                self.pressed = true;
                if let Some(item) = self.selectable_target(event.target) {
                    self.initialize_selection(Some(item));
                    self.selecting = Some(item);
                }
                (true, None)
            }
            PointerKind::Up => {
                self.pressed = false;
                if self.selecting.is_none() {
                    self.selecting = self.selectable_target(event.target);
                }
                if !disabled && event.is_left() && self.selecting.is_some() {
                    return (true, self.selecting.take());
                }
                (true, None)
            }
            PointerKind::Move => {
                if disabled || !self.pressed {
                    return (false, None);
                }
                if let Some(item) = self.selectable_target(event.target)
                    && self.selecting != Some(item)
                {
                    self.initialize_selection(Some(item));
                    self.selecting = Some(item);
                }
                (true, None)
            }
            PointerKind::Over => {
                if disabled {
                    return (false, None);
                }
                let target = self
                    .target_item(event.target)
                    .filter(|node| self.group.get(*node).is_some_and(|o| o.is_highlightable()));
                if target.is_some() {
                    self.highlight_item(target);
                }
                (true, None)
            }
            PointerKind::Leave => {
                if disabled {
                    return (false, None);
                }
                self.highlight_item(None);
                (true, None)
            }
            PointerKind::Out => (false, None),
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn destroy(mut self) {
        self.events.clear();
        for item in self.group.clear_items() {
            item.destroy();
        }
        self.base.destroy();
    }
}

impl<D: OptionValue> Widget for SelectWidget<D> {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn debug_name(&self) -> &str {
        "SelectWidget"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::OptionConfig;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use trellis_test_utils::MockDocument;

    fn setup() -> (Arc<MockDocument>, UiContext, SelectWidget<&'static str>) {
        let doc = Arc::new(MockDocument::new());
        let ctx = UiContext::new(doc.clone());
        let select = SelectWidget::new(&ctx);
        (doc, ctx, select)
    }

    fn option(ctx: &UiContext, data: &'static str) -> OptionWidget<&'static str> {
        OptionWidget::new(ctx, data, OptionConfig::labeled(data.to_uppercase()))
    }

    fn node(select: &SelectWidget<&'static str>, data: &'static str) -> NodeId {
        select.item_from_data(&data).unwrap()
    }

    #[test]
    fn test_select_is_exclusive() {
        let (_doc, ctx, mut select) = setup();
        let items = ["a", "b", "c"].map(|d| option(&ctx, d)).into_iter().collect();
        select.add_items(items, None);

        select.select_item(Some(node(&select, "a")));
        select.select_item(Some(node(&select, "c")));

        let selected: Vec<_> = select.items().iter().filter(|i| i.is_selected()).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(*selected[0].data(), "c");

        select.select_item(None);
        assert_eq!(select.selected_item(), None);
    }

    #[test]
    fn test_initialize_selection_is_silent() {
        let (_doc, ctx, mut select) = setup();
        select.add_items(vec![option(&ctx, "a"), option(&ctx, "b")], None);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        select.events_mut().subscribe(move |e| sink.lock().push(e.clone()));

        let b = node(&select, "b");
        select.initialize_selection(Some(b));

        assert_eq!(select.selected_item(), Some(b));
        assert_eq!(select.highlighted_item(), Some(b));
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_relative_skips_unselectable() {
        let (_doc, ctx, mut select) = setup();
        let section = OptionWidget::new(&ctx, "s", OptionConfig::section("Section"));
        let disabled = OptionWidget::new(&ctx, "d", OptionConfig::labeled("D").disabled());
        select.add_items(vec![option(&ctx, "a"), section, disabled, option(&ctx, "b")], None);

        let a = node(&select, "a");
        let b = node(&select, "b");
        assert_eq!(select.relative_selectable_item(Some(a), Direction::Forward), Some(b));
        assert_eq!(select.relative_selectable_item(Some(b), Direction::Forward), Some(a));
        assert_eq!(select.relative_selectable_item(Some(a), Direction::Backward), Some(b));
        assert_eq!(select.relative_selectable_item(None, Direction::Forward), Some(a));
        assert_eq!(select.relative_selectable_item(None, Direction::Backward), Some(b));
    }

    #[test]
    fn test_relative_with_single_selectable_returns_itself() {
        let (_doc, ctx, mut select) = setup();
        let section = OptionWidget::new(&ctx, "s", OptionConfig::section("Section"));
        select.add_items(vec![section, option(&ctx, "a")], None);

        let a = node(&select, "a");
        assert_eq!(select.relative_selectable_item(Some(a), Direction::Forward), Some(a));
    }

    #[test]
    fn test_add_index_reported() {
        let (_doc, ctx, mut select) = setup();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        select.events_mut().subscribe(move |e| sink.lock().push(e.clone()));

        select.add_items(vec![option(&ctx, "a"), option(&ctx, "b")], None);
        select.add_items(vec![option(&ctx, "c")], Some(1));

        assert_eq!(
            *events.lock(),
            vec![
                SelectEvent::Add { data: vec!["a", "b"], index: 0 },
                SelectEvent::Add { data: vec!["c"], index: 1 },
            ]
        );
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let (doc, ctx, mut select) = setup();
        select.add_items(vec![option(&ctx, "a"), option(&ctx, "b")], None);
        let a = node(&select, "a");
        select.select_item(Some(a));

        let removed = select.remove_items(&[a]);
        assert_eq!(removed.len(), 1);
        assert!(!removed[0].is_selected());
        assert_eq!(select.selected_item(), None);
        assert_eq!(select.item_from_data(&"a"), None);
        assert!(!doc.is_removed(a));
    }
}
