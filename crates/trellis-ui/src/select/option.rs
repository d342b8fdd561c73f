use std::hash::Hash;

use trellis_core::NodeId;

use crate::context::UiContext;
use crate::group::GroupItem;
use crate::widget::{Icon, Label, Widget, WidgetBase};

/// Values that can identify an option.
///
/// Options are deduplicated by value, so the data must hash consistently.
pub trait OptionValue: Clone + Eq + Hash + Send + 'static {}

impl<T> OptionValue for T where T: Clone + Eq + Hash + Send + 'static {}

/// Role of an option inside a selection engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionKind {
    /// Plain selectable option.
    #[default]
    Option,
    /// Menu entry with a check icon.
    MenuItem,
    /// Non-interactive heading between menu entries.
    MenuSection,
}

impl OptionKind {
    pub fn selectable(&self) -> bool {
        !matches!(self, OptionKind::MenuSection)
    }

    pub fn highlightable(&self) -> bool {
        !matches!(self, OptionKind::MenuSection)
    }

    fn class(&self) -> &'static str {
        match self {
            OptionKind::Option => "trellis-option",
            OptionKind::MenuItem => "trellis-menu-item",
            OptionKind::MenuSection => "trellis-menu-section",
        }
    }
}

/// Configuration for an [`OptionWidget`].
#[derive(Debug, Clone, Default)]
pub struct OptionConfig {
    pub kind: OptionKind,
    pub label: Option<String>,
    /// Overrides the kind's default icon.
    pub icon: Option<String>,
    pub disabled: bool,
}

impl OptionConfig {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn menu_item(label: impl Into<String>) -> Self {
        Self {
            kind: OptionKind::MenuItem,
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn section(label: impl Into<String>) -> Self {
        Self {
            kind: OptionKind::MenuSection,
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// An item of a selection engine carrying an opaque data value.
#[derive(Debug)]
pub struct OptionWidget<D> {
    base: WidgetBase,
    icon: Icon,
    label: Label,
    kind: OptionKind,
    data: D,
    selected: bool,
    highlighted: bool,
}

impl<D: OptionValue> OptionWidget<D> {
    pub fn new(ctx: &UiContext, data: D, config: OptionConfig) -> Self {
        let mut base = WidgetBase::new(ctx, "div", config.kind.class());
        let mut icon = Icon::new(ctx);
        let mut label = Label::new(ctx);
        base.element().append(icon.element());
        base.element().append(label.element());

        let default_icon = match config.kind {
            OptionKind::MenuItem => Some("check"),
            _ => None,
        };
        icon.set_icon(config.icon.as_deref().or(default_icon));
        label.set_label(config.label.as_deref());
        if config.disabled {
            base.set_disabled(true);
        }

        Self {
            base,
            icon,
            label,
            kind: config.kind,
            data,
            selected: false,
            highlighted: false,
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.label()
    }

    pub fn is_selectable(&self) -> bool {
        self.kind.selectable() && !self.base.is_disabled()
    }

    pub fn is_highlightable(&self) -> bool {
        self.kind.highlightable() && !self.base.is_disabled()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Set the selected state. Turning it on requires a selectable option;
    /// turning it off always succeeds so exclusivity holds for disabled items.
    pub fn set_selected(&mut self, selected: bool) {
        if selected && !self.is_selectable() {
            return;
        }
        self.selected = selected;
        self.base.element().toggle_class("trellis-option-selected", selected);
    }

    /// Set the highlighted state; the same asymmetry as [`set_selected`](Self::set_selected) applies.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        if highlighted && !self.is_highlightable() {
            return;
        }
        self.highlighted = highlighted;
        self.show_highlight(highlighted);
    }

    /// Toggle only the visual highlight, leaving state untouched (used by flashing).
    pub(crate) fn show_highlight(&self, on: bool) {
        self.base.element().toggle_class("trellis-option-highlighted", on);
    }

    pub fn destroy(self) {
        self.icon.destroy();
        self.label.destroy();
        self.base.destroy();
    }
}

impl<D> GroupItem for OptionWidget<D> {
    fn node(&self) -> NodeId {
        self.base.element().node()
    }
}

impl<D> Widget for OptionWidget<D> {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn debug_name(&self) -> &str {
        "OptionWidget"
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.base.set_disabled(disabled);
    }

    fn as_iconed(&self) -> Option<&Icon> {
        Some(&self.icon)
    }

    fn as_iconed_mut(&mut self) -> Option<&mut Icon> {
        Some(&mut self.icon)
    }

    fn as_labeled(&self) -> Option<&Label> {
        Some(&self.label)
    }

    fn as_labeled_mut(&mut self) -> Option<&mut Label> {
        Some(&mut self.label)
    }
}
