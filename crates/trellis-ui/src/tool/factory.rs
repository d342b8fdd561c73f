use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::debug;
use trellis_core::alloc::HashSet;

use crate::context::UiContext;
use crate::element::Element;
use crate::error::{UiError, UiResult};
use crate::tool::tool::ToolAction;

/// One entry of an include/exclude/promote/demote list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolSelector {
    /// Every registered tool that opts into automatic inclusion.
    All,
    /// Every tool of a group that opts into automatic inclusion.
    Group(String),
    /// One tool by name, regardless of automatic inclusion.
    Name(String),
}

impl ToolSelector {
    pub fn group(group: impl Into<String>) -> Self {
        ToolSelector::Group(group.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        ToolSelector::Name(name.into())
    }
}

impl From<&str> for ToolSelector {
    /// `"*"` selects everything; any other string names one tool.
    fn from(value: &str) -> Self {
        match value {
            "*" => ToolSelector::All,
            name => ToolSelector::Name(name.to_string()),
        }
    }
}

/// Parse a list of selector strings.
pub fn selectors(values: &[&str]) -> Vec<ToolSelector> {
    values.iter().map(|v| ToolSelector::from(*v)).collect()
}

/// Tool title, either literal text or a message key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolTitle {
    Text(String),
    Message(String),
}

impl ToolTitle {
    pub(crate) fn resolve(&self, ctx: &UiContext) -> String {
        match self {
            ToolTitle::Text(text) => text.clone(),
            ToolTitle::Message(key) => ctx.msg(key, &[]),
        }
    }
}

type ActionConstructor = Arc<dyn Fn(&UiContext, &Element) -> Box<dyn ToolAction> + Send + Sync>;

/// Immutable description of a tool kind.
///
/// The action constructor builds the per-instance behavior; it receives the
/// tool's root element so actions can attach their own content to it.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    group: String,
    icon: Option<String>,
    title: Option<ToolTitle>,
    auto_add: bool,
    action: ActionConstructor,
}

impl ToolDescriptor {
    pub fn new<F>(name: impl Into<String>, group: impl Into<String>, action: F) -> Self
    where
        F: Fn(&UiContext, &Element) -> Box<dyn ToolAction> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            group: group.into(),
            icon: None,
            title: None,
            auto_add: true,
            action: Arc::new(action),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(ToolTitle::Text(title.into()));
        self
    }

    pub fn with_title_msg(mut self, key: impl Into<String>) -> Self {
        self.title = Some(ToolTitle::Message(key.into()));
        self
    }

    /// Exclude the tool from wildcard and group expansion; it is then only
    /// included when named explicitly.
    pub fn manual(mut self) -> Self {
        self.auto_add = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn title(&self) -> Option<&ToolTitle> {
        self.title.as_ref()
    }

    pub fn auto_add(&self) -> bool {
        self.auto_add
    }

    pub(crate) fn build_action(&self, ctx: &UiContext, root: &Element) -> Box<dyn ToolAction> {
        (self.action)(ctx, root)
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("icon", &self.icon)
            .field("auto_add", &self.auto_add)
            .finish_non_exhaustive()
    }
}

type Mailbox = Arc<Mutex<VecDeque<String>>>;

#[derive(Default)]
struct Registry {
    tools: IndexMap<String, ToolDescriptor>,
    subscribers: Vec<Weak<Mutex<VecDeque<String>>>>,
}

/// Registry of tool descriptors shared by every toolbar that uses it.
///
/// Clones share one registry. Registering a tool never calls back into the
/// subscribers; it appends the name to each subscriber's mailbox, and the
/// owner drains it with [`Registrations::drain`] when it is ready to
/// repopulate.
#[derive(Clone, Default)]
pub struct ToolFactory {
    registry: Arc<Mutex<Registry>>,
}

impl ToolFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `descriptor`, replacing any tool with the same name.
    pub fn register(&self, descriptor: ToolDescriptor) {
        let mut registry = self.registry.lock();
        let name = descriptor.name.clone();
        debug!("Registered tool {}", name);
        registry.tools.insert(name.clone(), descriptor);
        registry.subscribers.retain(|mailbox| match mailbox.upgrade() {
            Some(mailbox) => {
                mailbox.lock().push_back(name.clone());
                true
            }
            None => false,
        });
    }

    /// Open a mailbox that receives the name of every later registration.
    pub fn subscribe(&self) -> Registrations {
        let mailbox: Mailbox = Arc::new(Mutex::new(VecDeque::new()));
        self.registry.lock().subscribers.push(Arc::downgrade(&mailbox));
        Registrations { mailbox }
    }

    pub fn lookup(&self, name: &str) -> bool {
        self.registry.lock().tools.contains_key(name)
    }

    pub fn descriptor(&self, name: &str) -> UiResult<ToolDescriptor> {
        self.registry
            .lock()
            .tools
            .get(name)
            .cloned()
            .ok_or_else(|| UiError::UnknownTool {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.registry.lock().tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve selector lists into an ordered list of registered tool names.
    ///
    /// `included = include - exclude` keeps the order of `include`. Promoted and
    /// demoted names are taken first and marked used; the rest of `included`
    /// follows in its relative order. The result is
    /// `promoted ++ remaining ++ demoted`. Names that are not registered are
    /// dropped.
    pub fn get_tools(
        &self,
        include: &[ToolSelector],
        exclude: &[ToolSelector],
        promote: &[ToolSelector],
        demote: &[ToolSelector],
    ) -> Vec<String> {
        let registry = self.registry.lock();
        let excluded: HashSet<String> = extract(&registry, exclude, None).into_iter().collect();
        let included: Vec<String> = extract(&registry, include, None)
            .into_iter()
            .filter(|name| !excluded.contains(name))
            .collect();

        let mut used = HashSet::default();
        let promoted = extract(&registry, promote, Some(&mut used));
        let demoted = extract(&registry, demote, Some(&mut used));

        let mut names = promoted;
        for name in included {
            if used.insert(name.clone()) {
                names.push(name);
            }
        }
        names.extend(demoted);
        names
    }
}

/// Expand selectors against the registry. With `used`, names already used are
/// skipped and every returned name is marked used.
fn extract(registry: &Registry, selectors: &[ToolSelector], mut used: Option<&mut HashSet<String>>) -> Vec<String> {
    let mut names = Vec::new();
    let mut take = |name: &str, names: &mut Vec<String>| {
        let fresh = match used.as_deref_mut() {
            Some(used) => used.insert(name.to_string()),
            None => true,
        };
        if fresh {
            names.push(name.to_string());
        }
    };

    for selector in selectors {
        match selector {
            ToolSelector::All => {
                for (name, tool) in &registry.tools {
                    if tool.auto_add {
                        take(name, &mut names);
                    }
                }
            }
            ToolSelector::Group(group) => {
                for (name, tool) in &registry.tools {
                    if tool.auto_add && tool.group == *group {
                        take(name, &mut names);
                    }
                }
            }
            ToolSelector::Name(name) => {
                if registry.tools.contains_key(name) {
                    take(name, &mut names);
                }
            }
        }
    }
    names
}

impl fmt::Debug for ToolFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("ToolFactory")
            .field("tools", &registry.tools.keys().collect::<Vec<_>>())
            .field("subscribers", &registry.subscribers.len())
            .finish()
    }
}

/// Pending registration notices for one subscriber.
#[derive(Debug)]
pub struct Registrations {
    mailbox: Mailbox,
}

impl Registrations {
    /// Take every name registered since the last drain.
    pub fn drain(&self) -> Vec<String> {
        self.mailbox.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.mailbox.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::tool::CommandTool;

    fn tool(name: &str, group: &str) -> ToolDescriptor {
        ToolDescriptor::new(name, group, |_, _| Box::new(CommandTool::new(|| {})))
    }

    fn factory() -> ToolFactory {
        let factory = ToolFactory::new();
        factory.register(tool("a", "G1"));
        factory.register(tool("b", "G1"));
        factory.register(tool("c", "G2"));
        factory
    }

    #[test]
    fn test_promote_and_demote() {
        let names = factory().get_tools(&selectors(&["*"]), &[], &selectors(&["c"]), &selectors(&["a"]));
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_exclude_and_group() {
        let factory = factory();
        let names = factory.get_tools(&[ToolSelector::group("G1")], &selectors(&["a"]), &[], &[]);
        assert_eq!(names, vec!["b"]);

        let names = factory.get_tools(&selectors(&["*"]), &[ToolSelector::group("G1")], &[], &[]);
        assert_eq!(names, vec!["c"]);
    }

    #[test]
    fn test_manual_tools_need_explicit_names() {
        let factory = factory();
        factory.register(tool("d", "G2").manual());

        let names = factory.get_tools(&selectors(&["*"]), &[], &[], &[]);
        assert_eq!(names, vec!["a", "b", "c"]);
        let names = factory.get_tools(&[ToolSelector::group("G2"), ToolSelector::name("d")], &[], &[], &[]);
        assert_eq!(names, vec!["c", "d"]);
    }

    #[test]
    fn test_unregistered_names_dropped() {
        let names = factory().get_tools(&selectors(&["x", "b"]), &[], &selectors(&["y"]), &[]);
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn test_registration_notifies_mailboxes() {
        let factory = factory();
        let first = factory.subscribe();
        let second = factory.subscribe();

        factory.register(tool("d", "G2"));
        assert_eq!(first.drain(), vec!["d".to_string()]);
        assert!(first.is_empty());
        assert_eq!(second.drain(), vec!["d".to_string()]);

        drop(second);
        factory.register(tool("e", "G2"));
        assert!(format!("{:?}", factory).contains("subscribers: 1"));
    }

    #[test]
    fn test_unknown_descriptor() {
        let err = factory().descriptor("zz").unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: zz");
    }
}
