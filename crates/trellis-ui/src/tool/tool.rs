use std::fmt;
use std::time::Duration;

use tracing::trace;
use trellis_core::NodeId;

use crate::context::UiContext;
use crate::element::Element;
use crate::event::{Emitter, PointerEvent};
use crate::group::GroupItem;
use crate::popup::{PopupConfig, Popuppable};
use crate::tool::factory::ToolDescriptor;
use crate::widget::{Icon, Label, Widget, WidgetBase};

/// Events emitted by a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolEvent {
    Select,
}

/// Which parts of a tool feed its tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TooltipParts {
    pub title: bool,
    pub accel: bool,
}

/// Everything a tool owns apart from its action.
#[derive(Debug)]
pub struct ToolCore {
    base: WidgetBase,
    link: Element,
    icon: Icon,
    label: Label,
    accel: Element,
    name: String,
    title: String,
    active: bool,
}

impl ToolCore {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element(&self) -> &Element {
        self.base.element()
    }

    /// The clickable part of the tool; content an action adds elsewhere in
    /// the tool never triggers tool interaction.
    pub fn link(&self) -> &Element {
        &self.link
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_disabled(&self) -> bool {
        self.base.is_disabled()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.base.element().toggle_class("trellis-tool-active", active);
    }
}

/// Behavior of a tool kind.
pub trait ToolAction: Send {
    /// The user chose the tool.
    fn on_select(&mut self, tool: &mut ToolCore);

    /// The owning toolbar asked every tool to refresh its state.
    fn on_update_state(&mut self, _tool: &mut ToolCore) {}

    /// Pointer input reaching the tool outside its link.
    fn handle_pointer(&mut self, _tool: &mut ToolCore, _event: &PointerEvent) -> bool {
        false
    }

    fn update(&mut self, _dt: Duration) {}

    fn destroy(self: Box<Self>) {}
}

type Command = Box<dyn FnMut() + Send>;
type StateQuery = Box<dyn FnMut() -> bool + Send>;

/// Runs a closure on select and optionally mirrors external state as `active`.
pub struct CommandTool {
    command: Command,
    state: Option<StateQuery>,
}

impl CommandTool {
    pub fn new<F>(command: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self {
            command: Box::new(command),
            state: None,
        }
    }

    /// Query polled on every state update to decide whether the tool is active.
    pub fn with_state<F>(mut self, state: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.state = Some(Box::new(state));
        self
    }
}

impl ToolAction for CommandTool {
    fn on_select(&mut self, _tool: &mut ToolCore) {
        (self.command)();
    }

    fn on_update_state(&mut self, tool: &mut ToolCore) {
        if let Some(state) = self.state.as_mut() {
            tool.set_active(state());
        }
    }
}

impl fmt::Debug for CommandTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTool")
            .field("stateful", &self.state.is_some())
            .finish()
    }
}

/// Toggles an owned popup on select; never stays active.
#[derive(Debug)]
pub struct PopupTool {
    popuppable: Popuppable,
}

impl PopupTool {
    /// Build the popup inside `root`, the tool's root element.
    pub fn new(ctx: &UiContext, root: &Element, config: PopupConfig) -> Self {
        let popuppable = Popuppable::new(
            ctx,
            PopupConfig {
                auto_close: true,
                auto_close_ignore: Some(root.node()),
                ..config
            },
        );
        root.add_class("trellis-popupTool");
        root.append(popuppable.popup().element());
        Self { popuppable }
    }

    pub fn popuppable(&self) -> &Popuppable {
        &self.popuppable
    }

    pub fn popuppable_mut(&mut self) -> &mut Popuppable {
        &mut self.popuppable
    }
}

impl ToolAction for PopupTool {
    fn on_select(&mut self, tool: &mut ToolCore) {
        if !tool.is_disabled() {
            self.popuppable.toggle_popup();
        }
        tool.set_active(false);
    }

    fn on_update_state(&mut self, tool: &mut ToolCore) {
        tool.set_active(false);
    }

    fn handle_pointer(&mut self, _tool: &mut ToolCore, event: &PointerEvent) -> bool {
        self.popuppable.popup_mut().handle_pointer(event)
    }

    fn update(&mut self, dt: Duration) {
        self.popuppable.popup_mut().update(dt);
    }

    fn destroy(self: Box<Self>) {
        self.popuppable.destroy();
    }
}

/// Class suffix for a tool name: `"a/b/c"` becomes `"a-b"`.
fn name_class(name: &str) -> String {
    let mut parts = name.split('/');
    match (parts.next(), parts.next()) {
        (Some(first), Some(second)) if !first.is_empty() && !second.is_empty() => {
            format!("{}-{}", first, second)
        }
        _ => name.to_string(),
    }
}

/// A live instance of a registered tool.
pub struct Tool {
    core: ToolCore,
    action: Box<dyn ToolAction>,
    events: Emitter<ToolEvent>,
}

impl Tool {
    pub fn new(ctx: &UiContext, descriptor: &ToolDescriptor) -> Self {
        let base = WidgetBase::new(ctx, "span", "trellis-tool");
        base.element()
            .add_class(&format!("trellis-tool-name-{}", name_class(descriptor.name())));

        let link = Element::with_class(ctx.document().clone(), "a", "trellis-tool-link");
        let mut icon = Icon::new(ctx);
        let label = Label::new(ctx);
        let accel = Element::with_class(ctx.document().clone(), "span", "trellis-tool-accel");
        label.element().add_class("trellis-tool-title");
        link.append(icon.element());
        link.append(label.element());
        link.append(&accel);
        base.element().append(&link);
        icon.set_icon(descriptor.icon());

        let title = descriptor
            .title()
            .map(|title| title.resolve(ctx))
            .unwrap_or_default();
        let action = descriptor.build_action(ctx, base.element());

        Self {
            core: ToolCore {
                base,
                link,
                icon,
                label,
                accel,
                name: descriptor.name().to_string(),
                title,
                active: false,
            },
            action,
            events: Emitter::new(),
        }
    }

    pub fn core(&self) -> &ToolCore {
        &self.core
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn title(&self) -> &str {
        &self.core.title
    }

    pub fn is_active(&self) -> bool {
        self.core.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.core.set_active(active);
    }

    pub fn events_mut(&mut self) -> &mut Emitter<ToolEvent> {
        &mut self.events
    }

    /// Render title and accelerator and rebuild the link tooltip from the parts
    /// the owning group shows.
    pub fn update_label(&mut self, accel: Option<&str>, tooltips: TooltipParts) {
        let core = &mut self.core;
        core.label.set_label(Some(core.title.as_str()));
        core.accel.set_text(accel.unwrap_or(""));

        let mut parts = Vec::new();
        if tooltips.title && !core.title.is_empty() {
            parts.push(core.title.as_str());
        }
        if tooltips.accel
            && let Some(accel) = accel.filter(|a| !a.is_empty())
        {
            parts.push(accel);
        }
        if parts.is_empty() {
            core.link.remove_attribute("title");
        } else {
            core.link.set_attribute("title", &parts.join(" "));
        }
    }

    /// Run the tool's action. Disabled tools ignore the request.
    pub fn select(&mut self) -> bool {
        if self.core.is_disabled() {
            return false;
        }
        trace!("Tool {} selected", self.core.name);
        self.action.on_select(&mut self.core);
        self.events.emit(&ToolEvent::Select);
        true
    }

    pub fn update_state(&mut self) {
        self.action.on_update_state(&mut self.core);
    }

    /// Whether `node` is inside this tool's link.
    pub fn link_contains(&self, node: NodeId) -> bool {
        self.core.link.contains(node)
    }

    pub(crate) fn handle_action_pointer(&mut self, event: &PointerEvent) -> bool {
        self.action.handle_pointer(&mut self.core, event)
    }

    pub fn update(&mut self, dt: Duration) {
        self.action.update(dt);
    }

    pub fn destroy(mut self) {
        self.events.clear();
        self.action.destroy();
        self.core.icon.destroy();
        self.core.label.destroy();
        self.core.accel.destroy();
        self.core.link.destroy();
        self.core.base.destroy();
    }
}

impl GroupItem for Tool {
    fn node(&self) -> NodeId {
        self.core.base.element().node()
    }
}

impl Widget for Tool {
    fn base(&self) -> &WidgetBase {
        &self.core.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.core.base
    }

    fn debug_name(&self) -> &str {
        "Tool"
    }

    fn as_iconed(&self) -> Option<&Icon> {
        Some(&self.core.icon)
    }

    fn as_iconed_mut(&mut self) -> Option<&mut Icon> {
        Some(&mut self.core.icon)
    }

    fn as_labeled(&self) -> Option<&Label> {
        Some(&self.core.label)
    }

    fn as_labeled_mut(&mut self) -> Option<&mut Label> {
        Some(&mut self.core.label)
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.core.name)
            .field("active", &self.core.active)
            .finish_non_exhaustive()
    }
}
