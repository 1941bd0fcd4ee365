use std::cell::RefCell;
use std::rc::Rc;

use tui_mastermind::engine::{EventBus, SubscriberId, Widget, WidgetCtx, WidgetScheduler};
use tui_mastermind::term::ScreenBuffer;
use tui_mastermind::types::{
    Event, EventMask, InputEvent, Key, KeyInput, MouseButton, Pos, Propagation, Scene, SceneMask,
    Size,
};

const A: Scene = Scene(0);
const B: Scene = Scene(1);

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
    consume_keys: bool,
    consume_clicks: bool,
}

impl Recorder {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Rc::clone(log),
            consume_keys: false,
            consume_clicks: false,
        }
    }

    fn push(&self, what: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.name, what));
    }
}

impl Widget for Recorder {
    fn on_enable(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.push("enable");
    }

    fn on_disable(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.push("disable");
    }

    fn on_redraw(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.push("redraw");
    }

    fn on_input(&mut self, _key: KeyInput, _ctx: &mut WidgetCtx<'_>) -> bool {
        self.push("input");
        self.consume_keys
    }

    fn on_mouse_click(&mut self, _pos: Pos, _button: MouseButton, _ctx: &mut WidgetCtx<'_>) -> bool {
        self.push("click");
        self.consume_clicks
    }
}

fn setup() -> (ScreenBuffer, EventBus, WidgetScheduler, Log) {
    (
        ScreenBuffer::new(Size::new(80, 24)),
        EventBus::new(),
        WidgetScheduler::new(),
        Rc::new(RefCell::new(Vec::new())),
    )
}

fn entries(log: &Log, prefix: &str) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|e| e.starts_with(prefix))
        .cloned()
        .collect()
}

#[test]
fn only_the_topmost_consumer_sees_the_key() {
    let (mut screen, bus, mut sched, log) = setup();
    sched.register(SceneMask::ALL, Recorder::new("a", &log));
    sched.register(SceneMask::ALL, Recorder::new("b", &log));
    sched.register(
        SceneMask::ALL,
        Recorder {
            consume_keys: true,
            ..Recorder::new("c", &log)
        },
    );
    sched.change_scene(A, &mut screen, &bus);
    log.borrow_mut().clear();

    let key = InputEvent::KeyDown(KeyInput::new(Key::Char('x')));
    assert!(sched.dispatch_input(&key, &mut screen, &bus));
    assert_eq!(*log.borrow(), vec!["c:input"]);
}

#[test]
fn unconsumed_input_walks_every_enabled_widget_in_reverse() {
    let (mut screen, bus, mut sched, log) = setup();
    sched.register(SceneMask::ALL, Recorder::new("a", &log));
    sched.register(SceneMask::of(&[B]), Recorder::new("hidden", &log));
    sched.register(SceneMask::ALL, Recorder::new("c", &log));
    sched.change_scene(A, &mut screen, &bus);
    log.borrow_mut().clear();

    let click = InputEvent::MouseClick {
        pos: Pos::new(1, 1),
        button: MouseButton::Left,
    };
    assert!(!sched.dispatch_input(&click, &mut screen, &bus));
    assert_eq!(*log.borrow(), vec!["c:click", "a:click"]);
}

#[test]
fn widget_in_both_scenes_keeps_state_across_a_change() {
    let (mut screen, bus, mut sched, log) = setup();
    let shared = sched
        .register(SceneMask::of(&[A, B]), Recorder::new("shared", &log))
        .unwrap();
    sched.register(SceneMask::of(&[A]), Recorder::new("only_a", &log));
    sched.register(SceneMask::of(&[B]), Recorder::new("only_b", &log));

    sched.change_scene(A, &mut screen, &bus);
    sched.run_frame(&mut screen, &bus);
    let before = entries(&log, "shared:");
    assert_eq!(before, vec!["shared:enable", "shared:redraw"]);

    sched.change_scene(B, &mut screen, &bus);
    assert!(sched.is_enabled(shared));
    assert_eq!(entries(&log, "shared:"), before);
    assert_eq!(entries(&log, "only_a:"), vec!["only_a:enable", "only_a:redraw", "only_a:disable"]);
    assert_eq!(entries(&log, "only_b:"), vec!["only_b:enable"]);
}

#[test]
fn scene_change_disables_all_leavers_before_enabling_joiners() {
    let (mut screen, bus, mut sched, log) = setup();
    sched.register(SceneMask::of(&[B]), Recorder::new("b1", &log));
    sched.register(SceneMask::of(&[A]), Recorder::new("a1", &log));
    sched.register(SceneMask::of(&[B]), Recorder::new("b2", &log));
    sched.register(SceneMask::of(&[A]), Recorder::new("a2", &log));
    sched.change_scene(A, &mut screen, &bus);
    log.borrow_mut().clear();

    sched.change_scene(B, &mut screen, &bus);
    assert_eq!(
        *log.borrow(),
        vec!["a1:disable", "a2:disable", "b1:enable", "b2:enable"]
    );
}

#[test]
fn scene_change_is_published_on_the_bus() {
    let (mut screen, bus, mut sched, _log) = setup();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    bus.register(SubscriberId(1), move |_, _, ev| {
        if let Event::SceneChanged { from, to } = ev {
            sink.borrow_mut().push((*from, *to));
        }
        Propagation::Continue
    });
    bus.subscribe(SubscriberId(1), EventMask::SCENE);

    sched.change_scene(A, &mut screen, &bus);
    sched.change_scene(A, &mut screen, &bus);
    sched.change_scene(B, &mut screen, &bus);

    assert_eq!(*seen.borrow(), vec![(None, A), (Some(A), B)]);
}

struct GoTo(Scene);

impl Widget for GoTo {
    fn on_input(&mut self, _key: KeyInput, ctx: &mut WidgetCtx<'_>) -> bool {
        ctx.change_scene(self.0);
        true
    }
}

#[test]
fn widget_requested_scene_change_applies_after_dispatch() {
    let (mut screen, bus, mut sched, log) = setup();
    let a_only = sched
        .register(SceneMask::of(&[A]), Recorder::new("a", &log))
        .unwrap();
    sched.register(SceneMask::of(&[A]), GoTo(B));
    sched.change_scene(A, &mut screen, &bus);

    let key = InputEvent::KeyDown(KeyInput::new(Key::Enter));
    assert!(sched.dispatch_input(&key, &mut screen, &bus));
    assert_eq!(sched.current_scene(), Some(B));
    assert!(!sched.is_enabled(a_only));
}
