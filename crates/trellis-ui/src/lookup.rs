//! Autocomplete lookups.
//!
//! [`LookupCoordinator`] owns a query-keyed result cache and at most one
//! request in flight. Issuing a request for a different query cancels the
//! previous one, so a superseded response is never observed.
//! [`LookupWidget`] wires a coordinator to a [`TextInput`] and an anchored
//! [`MenuWidget`].

use std::fmt;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use tracing::{debug, trace};
use trellis_core::alloc::HashMap;
use trellis_core::{Request, RequestError, RequestSource};

use crate::context::UiContext;
use crate::event::{KeyEvent, PointerEvent, PointerKind};
use crate::input::{TextInput, TextInputConfig};
use crate::select::{MenuConfig, MenuWidget, OptionValue, OptionWidget};
use crate::widget::{Widget, WidgetBase};

/// Outcome of asking the coordinator for a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The value was blank; nothing to look up.
    Empty,
    /// A request for this exact query is already in flight.
    Waiting,
    /// Result served from the cache.
    Cached(T),
    /// A new request was issued.
    Requested,
}

/// Result of [`LookupCoordinator::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub struct LookupStep<T> {
    pub lookup: Lookup<T>,
    /// Query of the in-flight request cancelled to make room, if any.
    pub cancelled: Option<String>,
}

/// A completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResponse<T> {
    pub query: String,
    pub result: Result<T, RequestError>,
}

/// Request cache with a single in-flight slot.
pub struct LookupCoordinator<T> {
    source: Box<dyn RequestSource<T>>,
    cache: HashMap<String, T>,
    current: Option<(String, Request<T>)>,
}

impl<T: Clone + Send + 'static> LookupCoordinator<T> {
    pub fn new(source: impl RequestSource<T> + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: HashMap::new(),
            current: None,
        }
    }

    /// Look up `value`.
    ///
    /// An in-flight request for a different query is cancelled first, even when
    /// `value` is then answered from the cache.
    pub fn lookup(&mut self, value: &str) -> LookupStep<T> {
        if self.in_flight_query() == Some(value) && !value.trim().is_empty() {
            return LookupStep {
                lookup: Lookup::Waiting,
                cancelled: None,
            };
        }
        let cancelled = self.cancel();
        let lookup = if value.trim().is_empty() {
            Lookup::Empty
        } else if let Some(data) = self.cache.get(value) {
            trace!("Lookup cache hit for {:?}", value);
            Lookup::Cached(data.clone())
        } else {
            self.current = Some((value.to_string(), self.source.request(value)));
            Lookup::Requested
        };
        LookupStep { lookup, cancelled }
    }

    /// Poll the in-flight request. A successful result is cached before it is
    /// returned.
    pub fn poll(&mut self, cx: &mut Context<'_>) -> Option<LookupResponse<T>> {
        let (_, request) = self.current.as_mut()?;
        let result = match request.poll(cx) {
            Poll::Ready(result) => result,
            Poll::Pending => return None,
        };
        let (query, _) = self.current.take()?;
        if let Ok(data) = &result {
            self.cache.insert(query.clone(), data.clone());
        }
        Some(LookupResponse { query, result })
    }

    /// Cancel the in-flight request, returning its query.
    pub fn cancel(&mut self) -> Option<String> {
        let (query, request) = self.current.take()?;
        debug!("Cancelling lookup for {:?}", query);
        request.cancel();
        Some(query)
    }

    pub fn is_in_flight(&self) -> bool {
        self.current.is_some()
    }

    pub fn in_flight_query(&self) -> Option<&str> {
        self.current.as_ref().map(|(query, _)| query.as_str())
    }

    pub fn cached(&self, query: &str) -> Option<&T> {
        self.cache.get(query)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl<T> fmt::Debug for LookupCoordinator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupCoordinator")
            .field("cached", &self.cache.len())
            .field("in_flight", &self.current.as_ref().map(|(query, _)| query))
            .finish_non_exhaustive()
    }
}

type ItemBuilder<D, T> = Box<dyn Fn(&UiContext, &T) -> Vec<OptionWidget<D>> + Send>;

/// Text input with an autocomplete menu fed by asynchronous lookups.
///
/// The host routes focus changes to [`handle_focus`](Self::handle_focus) and
/// [`handle_blur`](Self::handle_blur), and drives completion through
/// [`poll`](Self::poll) or [`poll_lookup`](Self::poll_lookup). Choosing a menu
/// item copies its label into the input without starting a new lookup.
///
/// # Example
///
/// ```ignore
/// let mut lookup = LookupWidget::new(&ctx, TextInputConfig::default(), source, |ctx, names: &Vec<String>| {
///     names.iter().map(|n| OptionWidget::new(ctx, n.clone(), OptionConfig::labeled(n.as_str()))).collect()
/// });
/// lookup.handle_focus();
/// lookup.edited("ca");
/// lookup.poll_lookup();
/// ```
pub struct LookupWidget<D: OptionValue, T> {
    ctx: UiContext,
    input: TextInput,
    menu: MenuWidget<D>,
    coordinator: LookupCoordinator<T>,
    items: ItemBuilder<D, T>,
    lookups_disabled: bool,
}

impl<D: OptionValue, T: Clone + Send + 'static> LookupWidget<D, T> {
    pub fn new<S, F>(ctx: &UiContext, config: TextInputConfig, source: S, items: F) -> Self
    where
        S: RequestSource<T> + 'static,
        F: Fn(&UiContext, &T) -> Vec<OptionWidget<D>> + Send + 'static,
    {
        let input = TextInput::new(ctx, config);
        input.element().add_class("trellis-lookupWidget");
        let menu = MenuWidget::new(
            ctx,
            MenuConfig {
                input: Some(input.input().node()),
                anchor: Some(input.element().node()),
            },
        );
        menu.element().add_class("trellis-lookupWidget-menu");
        menu.element().add_class("trellis-textInputMenu");
        input.element().append(menu.element());

        Self {
            ctx: ctx.clone(),
            input,
            menu,
            coordinator: LookupCoordinator::new(source),
            items: Box::new(items),
            lookups_disabled: false,
        }
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut TextInput {
        &mut self.input
    }

    pub fn menu(&self) -> &MenuWidget<D> {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut MenuWidget<D> {
        &mut self.menu
    }

    pub fn coordinator(&self) -> &LookupCoordinator<T> {
        &self.coordinator
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn set_value(&mut self, value: Option<&str>) -> bool {
        let changed = self.input.set_value(value);
        if changed {
            self.on_change();
        }
        changed
    }

    /// The host reports that the user edited the input.
    pub fn edited(&mut self, raw: &str) -> bool {
        let changed = self.input.edited(raw);
        if changed {
            self.on_change();
        }
        changed
    }

    fn on_change(&mut self) {
        if !self.lookups_disabled {
            self.open_menu();
        }
    }

    pub fn handle_focus(&mut self) {
        self.open_menu();
    }

    pub fn handle_blur(&mut self) {
        self.menu.hide();
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if self.menu.is_visible() {
            let was_flashing = self.menu.is_flashing();
            if self.menu.handle_key(event) {
                if !was_flashing && self.menu.is_flashing() {
                    self.choose();
                }
                return true;
            }
        }
        self.input.handle_key(event)
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        if self.input.is_disabled() {
            return false;
        }
        if self.input.handle_pointer(event) {
            return true;
        }
        let on_input = event
            .target
            .is_some_and(|target| self.input.input().contains(target));
        if event.kind == PointerKind::Down && on_input {
            self.open_menu();
            return true;
        }
        if !self.menu.is_visible() {
            return false;
        }
        let was_flashing = self.menu.is_flashing();
        let handled = self.menu.handle_pointer(event);
        if !was_flashing && self.menu.is_flashing() {
            self.choose();
        }
        handled
    }

    /// Advance the menu's selection flash.
    pub fn update(&mut self, dt: Duration) {
        self.menu.update(dt);
    }

    /// Copy the chosen item's label into the input.
    fn choose(&mut self) {
        let Some(label) = self
            .menu
            .select()
            .selected_item()
            .and_then(|node| self.menu.select().item(node))
            .and_then(|option| option.label().map(str::to_string))
        else {
            return;
        };
        self.lookups_disabled = true;
        self.input.set_value(Some(&label));
        self.lookups_disabled = false;
    }

    /// Show the menu for the current value when the input is focused and the
    /// value is not blank; hide it otherwise.
    ///
    /// Leaving the input unfocused also abandons the in-flight lookup.
    pub fn open_menu(&mut self) {
        if !self.input.is_focused() {
            if self.coordinator.cancel().is_some() {
                self.input.pop_pending();
            }
            self.menu.hide();
        } else if self.input.value().trim().is_empty() {
            self.menu.hide();
        } else {
            self.populate_menu();
        }
    }

    fn populate_menu(&mut self) {
        let value = self.input.value().to_string();
        let step = self.coordinator.lookup(&value);
        if step.cancelled.is_some() {
            self.input.pop_pending();
        }
        match step.lookup {
            Lookup::Cached(data) => self.apply(&data),
            Lookup::Requested => {
                self.input.push_pending();
                self.clear_menu();
            }
            Lookup::Waiting | Lookup::Empty => self.clear_menu(),
        }
    }

    /// Destroy every item and hide.
    fn clear_menu(&mut self) {
        for option in self.menu.clear_items() {
            option.destroy();
        }
        self.menu.hide();
    }

    fn apply(&mut self, data: &T) {
        let items = (self.items)(&self.ctx, data);
        if items.is_empty() {
            self.clear_menu();
            return;
        }
        for option in self.menu.clear_items() {
            option.destroy();
        }
        self.menu.add_items(items, None);
        self.menu.show();
        let select = self.menu.select_mut();
        if select.selected_item().is_none() {
            let first = select.first_selectable_item();
            select.initialize_selection(first);
        }
        let selected = select.selected_item();
        select.highlight_item(selected);
    }

    /// Poll the in-flight lookup. Returns whether a request completed.
    ///
    /// A response only repopulates the menu while the input still holds the
    /// query it was issued for. Failures count as no results.
    pub fn poll(&mut self, cx: &mut Context<'_>) -> bool {
        let Some(response) = self.coordinator.poll(cx) else {
            return false;
        };
        self.input.pop_pending();
        let current = response.query == self.input.value();
        match response.result {
            Ok(_) if current => self.open_menu(),
            Ok(_) => trace!("Discarding lookup response for {:?}", response.query),
            Err(err) => {
                debug!("Lookup for {:?} failed: {}", response.query, err);
                if current {
                    self.clear_menu();
                }
            }
        }
        true
    }

    /// [`poll`](Self::poll) with a no-op waker, for hosts that poll every frame.
    pub fn poll_lookup(&mut self) -> bool {
        let mut cx = Context::from_waker(Waker::noop());
        self.poll(&mut cx)
    }

    pub fn destroy(mut self) {
        if self.coordinator.cancel().is_some() {
            self.input.pop_pending();
        }
        self.menu.destroy();
        self.input.destroy();
    }
}

impl<D: OptionValue, T> Widget for LookupWidget<D, T> {
    fn base(&self) -> &WidgetBase {
        self.input.base()
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        self.input.base_mut()
    }

    fn debug_name(&self) -> &str {
        "LookupWidget"
    }
}

impl<D: OptionValue, T> fmt::Debug for LookupWidget<D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupWidget")
            .field("input", &self.input)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}
