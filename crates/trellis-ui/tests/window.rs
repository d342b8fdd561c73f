//! Window lifecycle: deferred open until the frame loads, ignored re-entrant
//! transitions, dialog close delay and window-set mutual exclusion.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use trellis_test_utils::MockDocument;
use trellis_ui::{
    Key, KeyEvent, UiContext, UiError, Window, WindowConfig, WindowContent, WindowData,
    WindowEvent, WindowFactory, WindowParts, WindowSet, WindowSetEvent,
};

type Log = Arc<Mutex<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl WindowContent for Recorder {
    fn initialize(&mut self, _parts: &WindowParts<'_>) {
        self.log.lock().push(format!("{} initialize", self.name));
    }

    fn setup(&mut self, _parts: &WindowParts<'_>, _data: &WindowData) {
        self.log.lock().push(format!("{} setup", self.name));
    }

    fn teardown(&mut self, _parts: &WindowParts<'_>, data: &WindowData) {
        let action = data.action().unwrap_or("none");
        self.log.lock().push(format!("{} teardown {}", self.name, action));
    }
}

fn ctx() -> (Arc<MockDocument>, UiContext) {
    let doc = Arc::new(MockDocument::new());
    let ctx = UiContext::new(doc.clone());
    (doc, ctx)
}

fn window(ctx: &UiContext, name: &'static str, log: &Log, config: WindowConfig) -> Window {
    let content = Recorder {
        name,
        log: log.clone(),
    };
    Window::new(ctx, Box::new(content), config)
}

fn set_events(set: &mut WindowSet) -> Arc<Mutex<Vec<String>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    set.events_mut().subscribe(move |event| {
        let line = match event {
            WindowSetEvent::Opening { name, .. } => format!("opening {}", name),
            WindowSetEvent::Open { name, .. } => format!("open {}", name),
            WindowSetEvent::Closing { name, .. } => format!("closing {}", name),
            WindowSetEvent::Close { name, .. } => format!("close {}", name),
        };
        sink.lock().push(line);
    });
    events
}

#[test]
fn test_open_waits_for_frame_and_ignores_reentry() {
    let (_doc, ctx) = ctx();
    let log = Log::default();
    let mut window = window(&ctx, "main", &log, WindowConfig::default());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    window.events_mut().subscribe(move |e| sink.lock().push(e.clone()));

    let data = WindowData::new().with("page", "1");
    assert!(window.open(data.clone()));
    assert!(window.is_opening());
    assert!(!window.open(WindowData::new()));
    assert!(events.lock().is_empty());

    window.frame_loaded();
    assert!(!window.is_opening());
    assert!(window.is_visible());
    assert_eq!(
        *events.lock(),
        vec![
            WindowEvent::Initialize,
            WindowEvent::Opening(data.clone()),
            WindowEvent::Open(data),
        ]
    );
    assert_eq!(*log.lock(), vec!["main initialize", "main setup"]);
    assert!(!window.open(WindowData::new()));
}

#[test]
fn test_close_ignored_unless_open() {
    let (_doc, ctx) = ctx();
    let log = Log::default();
    let mut window = window(&ctx, "main", &log, WindowConfig::default());

    assert!(!window.close(WindowData::new()));
    window.frame_loaded();
    window.open(WindowData::new());
    assert!(window.close(WindowData::new()));
    assert!(!window.is_visible());
    assert!(!window.close(WindowData::new()));
    assert_eq!(log.lock().last().map(String::as_str), Some("main teardown none"));
}

#[test]
fn test_dialog_close_is_delayed() {
    let (doc, ctx) = ctx();
    let log = Log::default();
    let mut dialog = window(&ctx, "confirm", &log, WindowConfig::dialog());
    dialog.frame_loaded();
    dialog.open(WindowData::new());
    let node = dialog.element().node();

    assert!(dialog.close(WindowData::new().with("action", "accept")));
    assert!(dialog.is_closing());
    assert!(doc.has_class(node, "trellis-dialog-closing"));
    assert!(!dialog.open(WindowData::new()));

    dialog.update(Duration::from_millis(100));
    assert!(dialog.is_visible());
    dialog.update(Duration::from_millis(150));
    assert!(!dialog.is_visible());
    assert!(!dialog.is_closing());
    assert!(!doc.has_class(node, "trellis-dialog-closing"));
    assert_eq!(log.lock().last().map(String::as_str), Some("confirm teardown accept"));
}

#[test]
fn test_dialog_keys() {
    let (_doc, ctx) = ctx();
    let log = Log::default();
    let mut dialog = window(&ctx, "confirm", &log, WindowConfig::dialog());
    dialog.frame_loaded();
    dialog.open(WindowData::new());

    assert!(dialog.handle_key(&KeyEvent::new(Key::PageDown)));
    assert!(!dialog.handle_key(&KeyEvent::new(Key::Character('x'))));
    assert!(dialog.handle_key(&KeyEvent::new(Key::Escape)));
    dialog.update(Duration::from_millis(250));
    assert_eq!(log.lock().last().map(String::as_str), Some("confirm teardown cancel"));
}

#[test]
fn test_set_closes_previous_before_opening_next() {
    let (_doc, ctx) = ctx();
    let log = Log::default();
    let mut factory = WindowFactory::new();
    let (a_log, b_log) = (log.clone(), log.clone());
    factory.register("a", move |ctx| window(ctx, "a", &a_log, WindowConfig::dialog()));
    factory.register("b", move |ctx| window(ctx, "b", &b_log, WindowConfig::default()));

    let mut set = WindowSet::new(&ctx, factory);
    let events = set_events(&mut set);

    assert_eq!(set.open("a", WindowData::new()), Ok(true));
    set.frame_loaded("a").unwrap();
    assert_eq!(set.current_window(), Some("a"));

    set.open("b", WindowData::new()).unwrap();
    set.frame_loaded("b").unwrap();

    assert_eq!(
        *events.lock(),
        vec!["opening a", "open a", "closing a", "close a", "opening b", "open b"]
    );
    assert_eq!(set.current_window(), Some("b"));
    assert!(!set.get("a").unwrap().is_visible());
    assert!(log.lock().contains(&"a teardown none".to_string()));
}

#[test]
fn test_set_close_reports_completion() {
    let (_doc, ctx) = ctx();
    let log = Log::default();
    let mut factory = WindowFactory::new();
    let a_log = log.clone();
    factory.register("a", move |ctx| window(ctx, "a", &a_log, WindowConfig::dialog()));

    let mut set = WindowSet::new(&ctx, factory);
    let events = set_events(&mut set);
    set.open("a", WindowData::new()).unwrap();
    set.frame_loaded("a").unwrap();

    assert_eq!(set.close("a", WindowData::new()), Ok(true));
    assert_eq!(events.lock().len(), 2);
    set.update(Duration::from_millis(250));

    assert_eq!(events.lock()[2..], ["closing a".to_string(), "close a".to_string()]);
    assert_eq!(set.current_window(), None);
}

#[test]
fn test_set_unknown_window() {
    let (_doc, ctx) = ctx();
    let mut set = WindowSet::new(&ctx, WindowFactory::new());

    let err = set.open("missing", WindowData::new()).unwrap_err();
    assert_eq!(
        err,
        UiError::UnknownWindow {
            name: "missing".into()
        }
    );
}
