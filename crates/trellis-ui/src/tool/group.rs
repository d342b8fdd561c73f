use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, trace};
use trellis_core::alloc::HashMap;
use trellis_core::{ListenKind, ListenTarget, ListenerId, NodeId};

use crate::clip::Clippable;
use crate::context::UiContext;
use crate::element::Element;
use crate::event::{PointerEvent, PointerKind};
use crate::group::{Group, GroupItem};
use crate::tool::factory::{ToolFactory, ToolSelector};
use crate::tool::tool::{Tool, TooltipParts};
use crate::widget::{Icon, Label, Widget, WidgetBase, WidgetId};

/// Presentation of a tool group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolGroupKind {
    /// Tools laid out inline.
    #[default]
    Bar,
    /// Drop-down list of labeled tools.
    List,
    /// Drop-down menu labeled with the titles of its active tools.
    Menu,
}

impl ToolGroupKind {
    pub fn is_popup(&self) -> bool {
        !matches!(self, ToolGroupKind::Bar)
    }

    pub fn tooltips(&self) -> TooltipParts {
        match self {
            ToolGroupKind::Bar => TooltipParts {
                title: true,
                accel: true,
            },
            ToolGroupKind::List | ToolGroupKind::Menu => TooltipParts {
                title: false,
                accel: true,
            },
        }
    }

    fn class(&self) -> &'static str {
        match self {
            ToolGroupKind::Bar => "trellis-barToolGroup",
            ToolGroupKind::List => "trellis-listToolGroup",
            ToolGroupKind::Menu => "trellis-menuToolGroup",
        }
    }
}

/// Configuration of one group in a toolbar.
#[derive(Debug, Clone, Default)]
pub struct ToolGroupConfig {
    /// Defaults to [`ToolGroupKind::List`] for a catch-all group, otherwise [`ToolGroupKind::Bar`].
    pub kind: Option<ToolGroupKind>,
    pub include: Vec<ToolSelector>,
    pub exclude: Vec<ToolSelector>,
    pub promote: Vec<ToolSelector>,
    pub demote: Vec<ToolSelector>,
    /// Message key of the handle label of popup groups.
    pub label: Option<String>,
    /// Handle icon of popup groups; defaults to `down`.
    pub icon: Option<String>,
}

impl ToolGroupConfig {
    pub fn include(include: Vec<ToolSelector>) -> Self {
        Self {
            include,
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: ToolGroupKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn exclude(mut self, exclude: Vec<ToolSelector>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn promote(mut self, promote: Vec<ToolSelector>) -> Self {
        self.promote = promote;
        self
    }

    pub fn demote(mut self, demote: Vec<ToolSelector>) -> Self {
        self.demote = demote;
        self
    }

    pub fn with_label(mut self, key: impl Into<String>) -> Self {
        self.label = Some(key.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Whether the include list is exactly the universal wildcard.
    pub fn is_catch_all(&self) -> bool {
        matches!(self.include.as_slice(), [ToolSelector::All])
    }
}

/// Names reserved by groups of one toolbar, so no two groups show the same tool.
#[derive(Debug, Default)]
pub struct ToolReservations {
    owners: HashMap<String, WidgetId>,
}

impl ToolReservations {
    /// Whether `owner` may claim `name`: unreserved, or already its own.
    pub fn is_available(&self, name: &str, owner: WidgetId) -> bool {
        self.owners.get(name).is_none_or(|o| *o == owner)
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.owners.contains_key(name)
    }

    pub fn reserve(&mut self, name: &str, owner: WidgetId) {
        self.owners.insert(name.to_string(), owner);
    }

    /// Release `name` if `owner` holds it.
    pub fn release(&mut self, name: &str, owner: WidgetId) {
        if self.owners.get(name) == Some(&owner) {
            self.owners.remove(name);
        }
    }

    pub fn clear(&mut self) {
        self.owners.clear();
    }
}

/// Toolbar-wide state groups need while populating.
pub(crate) struct ToolServices<'a> {
    pub factory: &'a ToolFactory,
    pub reservations: &'a mut ToolReservations,
    pub accelerator: &'a dyn Fn(&str) -> Option<String>,
}

/// Handle, label and clipping of a drop-down group.
#[derive(Debug)]
struct PopupHandle {
    handle: Element,
    icon: Icon,
    label: Label,
    clippable: Clippable,
    active: bool,
    blur_listener: Option<ListenerId>,
}

/// A set of tools resolved from the factory and kept in sync with it.
#[derive(Debug)]
pub struct ToolGroup {
    base: WidgetBase,
    ctx: UiContext,
    kind: ToolGroupKind,
    config: ToolGroupConfig,
    tools: Group<Tool>,
    pressed: Option<NodeId>,
    capture: Option<ListenerId>,
    popup: Option<PopupHandle>,
}

impl ToolGroup {
    /// Build an empty group; the toolbar populates it right after.
    pub fn new(ctx: &UiContext, kind: ToolGroupKind, config: ToolGroupConfig) -> Self {
        let base = WidgetBase::new(ctx, "div", "trellis-toolGroup");
        let container = Element::with_class(ctx.document().clone(), "div", "trellis-toolGroup-tools");
        base.element().append(&container);
        base.element().add_class(kind.class());
        let tools = Group::new(ctx, container.node());

        let popup = kind.is_popup().then(|| {
            let handle = Element::with_class(ctx.document().clone(), "span", "trellis-popupToolGroup-handle");
            let mut icon = Icon::new(ctx);
            let mut label = Label::new(ctx);
            handle.append(label.element());
            handle.append(icon.element());
            base.element().add_class("trellis-popupToolGroup");
            ctx.document()
                .insert_before(base.element().node(), handle.node(), container.node());
            icon.set_icon(Some(config.icon.as_deref().unwrap_or("down")));
            let text = config.label.as_deref().map(|key| ctx.msg(key, &[]));
            label.set_label(text.as_deref());
            PopupHandle {
                handle,
                icon,
                label,
                clippable: Clippable::new(ctx, container.node()),
                active: false,
                blur_listener: None,
            }
        });

        Self {
            base,
            ctx: ctx.clone(),
            kind,
            config,
            tools,
            pressed: None,
            capture: None,
            popup,
        }
    }

    pub fn kind(&self) -> ToolGroupKind {
        self.kind
    }

    pub fn config(&self) -> &ToolGroupConfig {
        &self.config
    }

    pub fn tools(&self) -> &[Tool] {
        self.tools.items()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(Tool::name).collect()
    }

    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn tool_mut(&mut self, name: &str) -> Option<&mut Tool> {
        self.tools.iter_mut().find(|t| t.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Handle label of a popup group.
    pub fn label(&self) -> Option<&str> {
        self.popup.as_ref().and_then(|p| p.label.label())
    }

    pub fn handle(&self) -> Option<&Element> {
        self.popup.as_ref().map(|p| &p.handle)
    }

    /// Whether a popup group is open.
    pub fn is_active(&self) -> bool {
        self.popup.as_ref().is_some_and(|p| p.active)
    }

    /// Re-derive the member tools from the factory.
    ///
    /// Tools whose name still resolves are reused and moved into the new order,
    /// new names are instantiated and reserved, and tools no longer resolved are
    /// released and destroyed.
    pub(crate) fn populate(&mut self, services: &mut ToolServices<'_>) {
        let owner = self.base.id();
        let names = services.factory.get_tools(
            &self.config.include,
            &self.config.exclude,
            &self.config.promote,
            &self.config.demote,
        );

        let mut existing: IndexMap<String, Tool> = self
            .tools
            .clear_items()
            .into_iter()
            .map(|tool| (tool.name().to_string(), tool))
            .collect();
        let tooltips = self.kind.tooltips();
        let mut add = Vec::new();

        for name in names {
            if !services.reservations.is_available(&name, owner) {
                continue;
            }
            let tool = match existing.shift_remove(&name) {
                Some(tool) => tool,
                None => match services.factory.descriptor(&name) {
                    Ok(descriptor) => Tool::new(&self.ctx, &descriptor),
                    Err(err) => {
                        debug!("Skipping tool: {}", err);
                        continue;
                    }
                },
            };
            services.reservations.reserve(&name, owner);
            add.push(tool);
        }

        for (name, tool) in existing {
            trace!("Dropping tool {}", name);
            services.reservations.release(&name, owner);
            if self.pressed == Some(tool.node()) {
                self.pressed = None;
            }
            tool.destroy();
        }

        for tool in add.iter_mut() {
            let accel = (services.accelerator)(tool.name());
            tool.update_label(accel.as_deref(), tooltips);
        }
        self.base.element().toggle_class("trellis-toolGroup-empty", add.is_empty());
        debug!("Populated tool group with {} tools", add.len());
        self.tools.add_items(add, None);
    }

    /// Open or close a popup group.
    pub fn set_active(&mut self, active: bool) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        if popup.active == active {
            return;
        }
        popup.active = active;
        popup.clippable.set_clipping(active);
        self.base
            .element()
            .toggle_class("trellis-popupToolGroup-active", active);
        let document = self.ctx.document();
        if active {
            popup.blur_listener = Some(document.listen(ListenTarget::Document, ListenKind::PointerUp));
        } else if let Some(listener) = popup.blur_listener.take() {
            document.unlisten(listener);
        }
    }

    /// Enabled tool whose link contains `target`.
    fn target_tool(&self, target: Option<NodeId>) -> Option<NodeId> {
        let target = target?;
        self.tools
            .iter()
            .find(|tool| tool.link_contains(target))
            .filter(|tool| !tool.is_disabled())
            .map(GroupItem::node)
    }

    fn release_capture(&mut self) -> bool {
        match self.capture.take() {
            Some(listener) => {
                self.ctx.document().unlisten(listener);
                true
            }
            None => false,
        }
    }

    /// Pointer model: a left press on a tool makes it pressed and active,
    /// hovering out of and back into it toggles `active`, and a release over the
    /// same tool selects it. Popup groups toggle on a handle press and close on
    /// any release outside the group.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let mut handled = false;
        for tool in self.tools.iter_mut() {
            handled |= tool.handle_action_pointer(event);
        }

        let inside = event.target.is_some_and(|t| self.base.element().contains(t));
        let in_handle = event
            .target
            .zip(self.popup.as_ref())
            .is_some_and(|(t, p)| p.handle.contains(t));

        match event.kind {
            PointerKind::Down => {
                if !inside || self.base.is_disabled() || !event.is_left() {
                    return handled;
                }
                if in_handle {
                    let active = self.is_active();
                    self.set_active(!active);
                    return true;
                }
                let Some(node) = self.target_tool(event.target) else {
                    return handled;
                };
                self.pressed = Some(node);
                if let Some(tool) = self.tools.get_mut(node) {
                    tool.set_active(true);
                }
                if self.capture.is_none() {
                    self.capture = Some(
                        self.ctx
                            .document()
                            .listen(ListenTarget::Document, ListenKind::PointerUp),
                    );
                }
                true
            }
            PointerKind::Up => {
                let captured = self.release_capture();
                let was_active = self.is_active();
                if was_active && !inside {
                    self.set_active(false);
                }
                if in_handle {
                    return true;
                }
                if !inside && !captured {
                    return handled || was_active;
                }
                if inside {
                    self.set_active(false);
                }
                let target = self.target_tool(event.target);
                if let Some(pressed) = self.pressed.take()
                    && !self.base.is_disabled()
                    && event.is_left()
                    && target == Some(pressed)
                    && let Some(tool) = self.tools.get_mut(pressed)
                {
                    tool.select();
                }
                true
            }
            PointerKind::Over | PointerKind::Out => {
                let Some(pressed) = self.pressed else {
                    return handled;
                };
                if self.target_tool(event.target) != Some(pressed) {
                    return handled;
                }
                if let Some(tool) = self.tools.get_mut(pressed) {
                    tool.set_active(event.kind == PointerKind::Over);
                }
                true
            }
            _ => handled,
        }
    }

    /// Run every tool's state update; menu groups then relabel themselves with
    /// the titles of their active tools.
    pub(crate) fn update_state(&mut self) {
        for tool in self.tools.iter_mut() {
            tool.update_state();
        }
        if self.kind == ToolGroupKind::Menu
            && let Some(popup) = self.popup.as_mut()
        {
            let titles: Vec<&str> = self
                .tools
                .iter()
                .filter(|tool| tool.is_active())
                .map(Tool::title)
                .collect();
            popup.label.set_label(Some(&titles.join(", ")));
        }
    }

    pub fn update(&mut self, dt: Duration) {
        for tool in self.tools.iter_mut() {
            tool.update(dt);
        }
    }

    /// Release every reservation and destroy the tools and the group.
    pub(crate) fn destroy(mut self, reservations: &mut ToolReservations) {
        let owner = self.base.id();
        self.release_capture();
        self.set_active(false);
        for tool in self.tools.clear_items() {
            reservations.release(tool.name(), owner);
            tool.destroy();
        }
        if let Some(popup) = self.popup.take() {
            popup.icon.destroy();
            popup.label.destroy();
            popup.handle.destroy();
        }
        self.base.destroy();
    }
}

impl GroupItem for ToolGroup {
    fn node(&self) -> NodeId {
        self.base.element().node()
    }
}

impl Widget for ToolGroup {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn debug_name(&self) -> &str {
        "ToolGroup"
    }

    fn as_iconed(&self) -> Option<&Icon> {
        self.popup.as_ref().map(|p| &p.icon)
    }

    fn as_iconed_mut(&mut self) -> Option<&mut Icon> {
        self.popup.as_mut().map(|p| &mut p.icon)
    }

    fn as_labeled(&self) -> Option<&Label> {
        self.popup.as_ref().map(|p| &p.label)
    }

    fn as_labeled_mut(&mut self) -> Option<&mut Label> {
        self.popup.as_mut().map(|p| &mut p.label)
    }

    fn as_clippable(&self) -> Option<&Clippable> {
        self.popup.as_ref().map(|p| &p.clippable)
    }

    fn as_clippable_mut(&mut self) -> Option<&mut Clippable> {
        self.popup.as_mut().map(|p| &mut p.clippable)
    }
}
