use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use trellis_core::NodeId;

use crate::context::UiContext;
use crate::element::Element;
use crate::event::{Emitter, PointerEvent};
use crate::group::{Group, GroupItem};
use crate::tool::factory::{Registrations, ToolFactory};
use crate::tool::group::{ToolGroup, ToolGroupConfig, ToolGroupKind, ToolReservations, ToolServices};
use crate::tool::tool::Tool;

type AcceleratorFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

fn no_accelerator(_name: &str) -> Option<String> {
    None
}

/// Configuration for a [`Toolbar`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolbarConfig {
    /// Add an actions area next to the tool groups.
    pub actions: bool,
    /// Add a shadow below the bar.
    pub shadow: bool,
}

/// Events emitted by a toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarEvent {
    /// Tools refreshed their state from the host.
    UpdateState,
}

/// A bar of tool groups sharing one tool factory.
///
/// Each tool name is shown by at most one group of a toolbar. Registrations
/// made on the factory after [`setup`](Self::setup) take effect the next time
/// the host calls [`process_registrations`](Self::process_registrations).
///
/// # Example
///
/// ```ignore
/// let mut toolbar = Toolbar::new(&ctx, factory.clone(), ToolbarConfig::default());
/// toolbar.setup(vec![
///     ToolGroupConfig::include(vec![ToolSelector::group("history")]),
///     ToolGroupConfig::include(vec![ToolSelector::All]),
/// ]);
/// factory.register(descriptor);
/// toolbar.process_registrations();
/// ```
pub struct Toolbar {
    ctx: UiContext,
    element: Element,
    bar: Element,
    actions: Option<Element>,
    factory: ToolFactory,
    registrations: Registrations,
    groups: Group<ToolGroup>,
    reservations: ToolReservations,
    accelerator: AcceleratorFn,
    events: Emitter<ToolbarEvent>,
}

impl Toolbar {
    pub fn new(ctx: &UiContext, factory: ToolFactory, config: ToolbarConfig) -> Self {
        let document = ctx.document().clone();
        let element = Element::with_class(document.clone(), "div", "trellis-toolbar");
        let bar = Element::with_class(document.clone(), "div", "trellis-toolbar-bar");
        let tools = Element::with_class(document.clone(), "div", "trellis-toolbar-tools");
        bar.append(&tools);
        let actions = config.actions.then(|| {
            let actions = Element::with_class(document.clone(), "div", "trellis-toolbar-actions");
            bar.append(&actions);
            actions
        });
        if config.shadow {
            let shadow = Element::with_class(document.clone(), "div", "trellis-toolbar-shadow");
            bar.append(&shadow);
        }
        element.append(&bar);

        let registrations = factory.subscribe();
        Self {
            ctx: ctx.clone(),
            element,
            bar,
            actions,
            factory,
            registrations,
            groups: Group::new(ctx, tools.node()),
            reservations: ToolReservations::default(),
            accelerator: Arc::new(no_accelerator),
            events: Emitter::new(),
        }
    }

    /// Provide accelerator labels for tools, e.g. `"Ctrl+B"` for `bold`.
    pub fn with_accelerators<F>(mut self, accelerator: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.accelerator = Arc::new(accelerator);
        self
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn actions(&self) -> Option<&Element> {
        self.actions.as_ref()
    }

    pub fn factory(&self) -> &ToolFactory {
        &self.factory
    }

    pub fn events_mut(&mut self) -> &mut Emitter<ToolbarEvent> {
        &mut self.events
    }

    pub fn groups(&self) -> &[ToolGroup] {
        self.groups.items()
    }

    pub fn groups_mut(&mut self) -> &mut [ToolGroup] {
        self.groups.items_mut()
    }

    /// Live tool with `name`, in whichever group shows it.
    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.groups.iter().find_map(|group| group.tool(name))
    }

    pub fn tool_mut(&mut self, name: &str) -> Option<&mut Tool> {
        self.groups.iter_mut().find_map(|group| group.tool_mut(name))
    }

    /// Whether no group of this toolbar has claimed `name`.
    pub fn is_tool_available(&self, name: &str) -> bool {
        !self.reservations.is_reserved(name)
    }

    pub fn tool_accelerator(&self, name: &str) -> Option<String> {
        (self.accelerator)(name)
    }

    /// Replace every group with groups built from `configs`.
    ///
    /// A group whose include list is only the universal wildcard defaults to a
    /// [`ToolGroupKind::List`] labeled `trellis-toolbar-more`; any other group
    /// defaults to [`ToolGroupKind::Bar`].
    pub fn setup(&mut self, configs: Vec<ToolGroupConfig>) {
        self.reset();
        // Registrations before setup are already reflected by populating below.
        self.registrations.drain();

        let mut groups = Vec::with_capacity(configs.len());
        for mut config in configs {
            if config.is_catch_all() {
                config.kind.get_or_insert(ToolGroupKind::List);
                config.label.get_or_insert_with(|| "trellis-toolbar-more".to_string());
            }
            let kind = config.kind.unwrap_or_default();
            let mut group = ToolGroup::new(&self.ctx, kind, config);
            group.populate(&mut ToolServices {
                factory: &self.factory,
                reservations: &mut self.reservations,
                accelerator: &*self.accelerator,
            });
            groups.push(group);
        }
        debug!("Toolbar set up with {} groups", groups.len());
        self.groups.add_items(groups, None);
    }

    /// Repopulate every group if tools were registered since the last call.
    ///
    /// Registrations made while repopulating are picked up by another pass
    /// instead of interrupting the current one. Returns whether anything ran.
    pub fn process_registrations(&mut self) -> bool {
        let mut ran = false;
        loop {
            let names = self.registrations.drain();
            if names.is_empty() {
                return ran;
            }
            debug!("Repopulating toolbar after registering {:?}", names);
            ran = true;
            for group in self.groups.iter_mut() {
                group.populate(&mut ToolServices {
                    factory: &self.factory,
                    reservations: &mut self.reservations,
                    accelerator: &*self.accelerator,
                });
            }
        }
    }

    /// Ask every tool to refresh its state, then emit `UpdateState`.
    pub fn update_state(&mut self) {
        for group in self.groups.iter_mut() {
            group.update_state();
        }
        self.events.emit(&ToolbarEvent::UpdateState);
    }

    /// Offer pointer input to every group; returns whether any consumed it.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let mut handled = false;
        for group in self.groups.iter_mut() {
            handled |= group.handle_pointer(event);
        }
        handled
    }

    pub fn update(&mut self, dt: Duration) {
        for group in self.groups.iter_mut() {
            group.update(dt);
        }
    }

    /// Destroy every group and release every tool.
    pub fn reset(&mut self) {
        for group in self.groups.clear_items() {
            group.destroy(&mut self.reservations);
        }
        self.reservations.clear();
    }

    pub fn destroy(mut self) {
        self.reset();
        self.events.clear();
        if let Some(actions) = self.actions.take() {
            actions.destroy();
        }
        self.bar.destroy();
        self.element.destroy();
    }

    /// Root nodes of the groups in display order.
    pub fn group_nodes(&self) -> Vec<NodeId> {
        self.groups.iter().map(GroupItem::node).collect()
    }
}

impl fmt::Debug for Toolbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolbar")
            .field("element", &self.element)
            .field("groups", &self.groups.len())
            .finish_non_exhaustive()
    }
}
