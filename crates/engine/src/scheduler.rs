//! Widget registry and per-frame lifecycle driver.
//!
//! Widgets are registered once at startup with the set of scenes they are
//! active in. The scheduler enables and disables them on scene changes, runs
//! their frame and redraw hooks once per tick, and routes input to them
//! topmost-first (last registered wins).

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::bus::EventBus;
use crate::term::ScreenBuffer;
use crate::types::{
    Event, InputEvent, KeyInput, MouseButton, Pos, Scene, SceneMask, Size, MAX_WIDGETS,
};

/// Index of a widget in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub usize);

/// Lifecycle hooks. Every method is optional.
///
/// Input hooks return `true` to consume the input and stop it from reaching
/// widgets registered earlier.
pub trait Widget {
    fn on_enable(&mut self, _ctx: &mut WidgetCtx<'_>) {}
    fn on_disable(&mut self, _ctx: &mut WidgetCtx<'_>) {}
    fn on_frame(&mut self, _ctx: &mut WidgetCtx<'_>) {}
    fn on_redraw(&mut self, _ctx: &mut WidgetCtx<'_>) {}
    fn on_input(&mut self, _key: KeyInput, _ctx: &mut WidgetCtx<'_>) -> bool {
        false
    }
    fn on_mouse_move(&mut self, _pos: Pos, _ctx: &mut WidgetCtx<'_>) -> bool {
        false
    }
    fn on_mouse_click(&mut self, _pos: Pos, _button: MouseButton, _ctx: &mut WidgetCtx<'_>) -> bool {
        false
    }
    fn on_resize(&mut self, _old: Size, _new: Size, _ctx: &mut WidgetCtx<'_>) {}
}

#[derive(Debug, Default)]
struct Requests {
    scene: Option<Scene>,
    quit: bool,
}

/// What a widget callback can reach: the canvas, the bus, and requests back
/// to the scheduler.
pub struct WidgetCtx<'a> {
    pub screen: &'a mut ScreenBuffer,
    pub bus: &'a EventBus,
    id: WidgetId,
    scene: Option<Scene>,
    redraw: bool,
    requests: &'a mut Requests,
}

impl WidgetCtx<'_> {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn scene(&self) -> Option<Scene> {
        self.scene
    }

    /// Ask for `on_redraw` on the next pass.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Switch scenes once the current dispatch has finished.
    pub fn change_scene(&mut self, scene: Scene) {
        self.requests.scene = Some(scene);
    }

    pub fn request_quit(&mut self) {
        self.requests.quit = true;
    }
}

struct WidgetSlot {
    id: WidgetId,
    scenes: SceneMask,
    enabled: bool,
    redraw_pending: bool,
    widget: Box<dyn Widget>,
}

fn invoke<R>(
    slot: &mut WidgetSlot,
    screen: &mut ScreenBuffer,
    bus: &EventBus,
    scene: Option<Scene>,
    requests: &mut Requests,
    f: impl FnOnce(&mut dyn Widget, &mut WidgetCtx<'_>) -> R,
) -> R {
    let mut ctx = WidgetCtx {
        screen,
        bus,
        id: slot.id,
        scene,
        redraw: false,
        requests,
    };
    let result = f(slot.widget.as_mut(), &mut ctx);
    if ctx.redraw {
        slot.redraw_pending = true;
    }
    result
}

#[derive(Default)]
pub struct WidgetScheduler {
    slots: ArrayVec<WidgetSlot, MAX_WIDGETS>,
    scene: Option<Scene>,
    requests: Requests,
}

impl WidgetScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget active in `scenes`. It starts disabled and is enabled by
    /// the next scene change that includes it. Returns `None` when full.
    pub fn register(&mut self, scenes: SceneMask, widget: impl Widget + 'static) -> Option<WidgetId> {
        let id = WidgetId(self.slots.len());
        let slot = WidgetSlot {
            id,
            scenes,
            enabled: false,
            redraw_pending: false,
            widget: Box::new(widget),
        };
        match self.slots.try_push(slot) {
            Ok(()) => Some(id),
            Err(_) => {
                warn!(capacity = MAX_WIDGETS, "widget registry full, registration rejected");
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn current_scene(&self) -> Option<Scene> {
        self.scene
    }

    pub fn is_enabled(&self, id: WidgetId) -> bool {
        self.slots.get(id.0).is_some_and(|s| s.enabled)
    }

    pub fn is_redraw_pending(&self, id: WidgetId) -> bool {
        self.slots.get(id.0).is_some_and(|s| s.redraw_pending)
    }

    pub fn request_redraw(&mut self, id: WidgetId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.redraw_pending = true;
        }
    }

    /// Mark every enabled widget for redraw.
    pub fn request_redraw_all(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            slot.redraw_pending = true;
        }
    }

    /// Set once any widget has called [`WidgetCtx::request_quit`].
    pub fn quit_requested(&self) -> bool {
        self.requests.quit
    }

    /// One tick: `on_frame` for every enabled widget in registration order,
    /// then `on_redraw` if a redraw is pending.
    pub fn run_frame(&mut self, screen: &mut ScreenBuffer, bus: &EventBus) {
        let scene = self.scene;
        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            invoke(slot, screen, bus, scene, &mut self.requests, |w, ctx| {
                w.on_frame(ctx)
            });
            if slot.redraw_pending {
                slot.redraw_pending = false;
                invoke(slot, screen, bus, scene, &mut self.requests, |w, ctx| {
                    w.on_redraw(ctx)
                });
            }
        }
        self.apply_scene_request(screen, bus);
    }

    /// Offer `input` to enabled widgets, most recently registered first, until
    /// one consumes it. Resize records are not widget input and are never
    /// consumed here.
    pub fn dispatch_input(
        &mut self,
        input: &InputEvent,
        screen: &mut ScreenBuffer,
        bus: &EventBus,
    ) -> bool {
        if let InputEvent::Resize(_) = input {
            return false;
        }
        let scene = self.scene;
        let mut consumed = false;
        for slot in self.slots.iter_mut().rev().filter(|s| s.enabled) {
            consumed = invoke(slot, screen, bus, scene, &mut self.requests, |w, ctx| {
                match *input {
                    InputEvent::KeyDown(key) => w.on_input(key, ctx),
                    InputEvent::MouseMove(pos) => w.on_mouse_move(pos, ctx),
                    InputEvent::MouseClick { pos, button } => w.on_mouse_click(pos, button, ctx),
                    InputEvent::Resize(_) => false,
                }
            });
            if consumed {
                break;
            }
        }
        self.apply_scene_request(screen, bus);
        consumed
    }

    /// Tell every enabled widget the terminal changed size.
    pub fn dispatch_resize(&mut self, old: Size, new: Size, screen: &mut ScreenBuffer, bus: &EventBus) {
        let scene = self.scene;
        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            invoke(slot, screen, bus, scene, &mut self.requests, |w, ctx| {
                w.on_resize(old, new, ctx)
            });
        }
        self.apply_scene_request(screen, bus);
    }

    /// Switch to `scene`.
    ///
    /// All widgets leaving are disabled first, then all widgets joining are
    /// enabled, both in registration order, so widgets from the two scenes
    /// never share the screen. Widgets active in both scenes are left alone.
    /// Newly enabled widgets are marked for redraw.
    pub fn change_scene(&mut self, scene: Scene, screen: &mut ScreenBuffer, bus: &EventBus) {
        if self.scene == Some(scene) {
            return;
        }
        let from = self.scene;
        self.scene = Some(scene);
        debug!(from = ?from.map(|s| s.0), to = scene.0, "scene change");

        for slot in self.slots.iter_mut() {
            if slot.enabled && !slot.scenes.contains(scene) {
                invoke(slot, screen, bus, Some(scene), &mut self.requests, |w, ctx| {
                    w.on_disable(ctx)
                });
                slot.enabled = false;
                slot.redraw_pending = false;
            }
        }
        for slot in self.slots.iter_mut() {
            if !slot.enabled && slot.scenes.contains(scene) {
                invoke(slot, screen, bus, Some(scene), &mut self.requests, |w, ctx| {
                    w.on_enable(ctx)
                });
                slot.enabled = true;
                slot.redraw_pending = true;
            }
        }

        bus.trigger(&Event::SceneChanged { from, to: scene });
    }

    fn apply_scene_request(&mut self, screen: &mut ScreenBuffer, bus: &EventBus) {
        // Requests raised during the change itself wait for the next dispatch.
        if let Some(scene) = self.requests.scene.take() {
            self.change_scene(scene, screen, bus);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::types::{Key, Style};

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        log: Log,
        consume: bool,
    }

    impl Probe {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Rc::clone(log),
                consume: false,
            }
        }

        fn record(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, what));
        }
    }

    impl Widget for Probe {
        fn on_enable(&mut self, _ctx: &mut WidgetCtx<'_>) {
            self.record("enable");
        }
        fn on_disable(&mut self, _ctx: &mut WidgetCtx<'_>) {
            self.record("disable");
        }
        fn on_frame(&mut self, _ctx: &mut WidgetCtx<'_>) {
            self.record("frame");
        }
        fn on_redraw(&mut self, ctx: &mut WidgetCtx<'_>) {
            self.record("redraw");
            ctx.screen.write_at(Pos::HOME, Style::default(), self.name);
        }
        fn on_input(&mut self, _key: KeyInput, _ctx: &mut WidgetCtx<'_>) -> bool {
            self.record("input");
            self.consume
        }
    }

    fn fixture() -> (ScreenBuffer, EventBus, Log) {
        (
            ScreenBuffer::new(Size::new(20, 5)),
            EventBus::new(),
            Rc::new(RefCell::new(Vec::new())),
        )
    }

    const MENU: Scene = Scene(0);
    const GAME: Scene = Scene(1);

    #[test]
    fn registered_widgets_start_disabled() {
        let (mut screen, bus, log) = fixture();
        let mut sched = WidgetScheduler::new();
        let a = sched.register(SceneMask::of(&[MENU]), Probe::new("a", &log)).unwrap();
        assert!(!sched.is_enabled(a));
        sched.run_frame(&mut screen, &bus);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn enabling_schedules_a_redraw_once() {
        let (mut screen, bus, log) = fixture();
        let mut sched = WidgetScheduler::new();
        let a = sched.register(SceneMask::of(&[MENU]), Probe::new("a", &log)).unwrap();
        sched.change_scene(MENU, &mut screen, &bus);
        assert!(sched.is_redraw_pending(a));

        sched.run_frame(&mut screen, &bus);
        sched.run_frame(&mut screen, &bus);
        assert_eq!(
            *log.borrow(),
            vec!["a:enable", "a:frame", "a:redraw", "a:frame"]
        );
        assert_eq!(screen.get(Pos::HOME).unwrap().ch, 'a');
    }

    #[test]
    fn change_to_current_scene_is_a_no_op() {
        let (mut screen, bus, log) = fixture();
        let mut sched = WidgetScheduler::new();
        sched.register(SceneMask::of(&[MENU]), Probe::new("a", &log));
        sched.change_scene(MENU, &mut screen, &bus);
        sched.change_scene(MENU, &mut screen, &bus);
        assert_eq!(*log.borrow(), vec!["a:enable"]);
    }

    #[test]
    fn scene_change_disables_all_before_enabling_any() {
        let (mut screen, bus, log) = fixture();
        let mut sched = WidgetScheduler::new();
        sched.register(SceneMask::of(&[GAME]), Probe::new("g1", &log));
        sched.register(SceneMask::of(&[MENU]), Probe::new("m1", &log));
        sched.register(SceneMask::of(&[GAME]), Probe::new("g2", &log));
        sched.register(SceneMask::of(&[MENU]), Probe::new("m2", &log));
        sched.change_scene(MENU, &mut screen, &bus);
        log.borrow_mut().clear();

        sched.change_scene(GAME, &mut screen, &bus);
        assert_eq!(
            *log.borrow(),
            vec!["m1:disable", "m2:disable", "g1:enable", "g2:enable"]
        );
        assert_eq!(sched.current_scene(), Some(GAME));
    }

    #[test]
    fn input_stops_at_first_consumer_from_the_top() {
        let (mut screen, bus, log) = fixture();
        let mut sched = WidgetScheduler::new();
        sched.register(SceneMask::ALL, Probe::new("a", &log));
        let mut b = Probe::new("b", &log);
        b.consume = true;
        sched.register(SceneMask::ALL, b);
        sched.register(SceneMask::ALL, Probe::new("c", &log));
        sched.change_scene(MENU, &mut screen, &bus);
        log.borrow_mut().clear();

        let consumed = sched.dispatch_input(
            &InputEvent::KeyDown(KeyInput::new(Key::Enter)),
            &mut screen,
            &bus,
        );
        assert!(consumed);
        assert_eq!(*log.borrow(), vec!["c:input", "b:input"]);
    }

    #[test]
    fn unconsumed_input_visits_everyone_and_returns_false() {
        let (mut screen, bus, log) = fixture();
        let mut sched = WidgetScheduler::new();
        sched.register(SceneMask::ALL, Probe::new("a", &log));
        sched.register(SceneMask::ALL, Probe::new("b", &log));
        sched.change_scene(MENU, &mut screen, &bus);
        log.borrow_mut().clear();

        let consumed = sched.dispatch_input(
            &InputEvent::KeyDown(KeyInput::new(Key::Tab)),
            &mut screen,
            &bus,
        );
        assert!(!consumed);
        assert_eq!(*log.borrow(), vec!["b:input", "a:input"]);
    }

    #[test]
    fn redraw_all_skips_disabled_widgets() {
        let (mut screen, bus, log) = fixture();
        let mut sched = WidgetScheduler::new();
        let a = sched.register(SceneMask::of(&[MENU]), Probe::new("a", &log)).unwrap();
        let g = sched.register(SceneMask::of(&[GAME]), Probe::new("g", &log)).unwrap();
        sched.change_scene(MENU, &mut screen, &bus);
        sched.run_frame(&mut screen, &bus);
        assert!(!sched.is_redraw_pending(a));

        sched.request_redraw_all();
        assert!(sched.is_redraw_pending(a));
        assert!(!sched.is_redraw_pending(g));
    }

    #[test]
    fn disabled_widgets_get_no_input() {
        let (mut screen, bus, log) = fixture();
        let mut sched = WidgetScheduler::new();
        sched.register(SceneMask::of(&[GAME]), Probe::new("g", &log));
        sched.change_scene(MENU, &mut screen, &bus);
        sched.dispatch_input(
            &InputEvent::KeyDown(KeyInput::new(Key::Enter)),
            &mut screen,
            &bus,
        );
        assert!(log.borrow().is_empty());
    }

    struct SceneSwitcher;

    impl Widget for SceneSwitcher {
        fn on_input(&mut self, key: KeyInput, ctx: &mut WidgetCtx<'_>) -> bool {
            match key.key {
                Key::Enter => {
                    ctx.change_scene(GAME);
                    true
                }
                Key::Char('q') => {
                    ctx.request_quit();
                    true
                }
                _ => false,
            }
        }
    }

    #[test]
    fn widgets_can_request_scene_change_and_quit() {
        let (mut screen, bus, log) = fixture();
        let mut sched = WidgetScheduler::new();
        sched.register(SceneMask::ALL, SceneSwitcher);
        let g = sched.register(SceneMask::of(&[GAME]), Probe::new("g", &log)).unwrap();
        sched.change_scene(MENU, &mut screen, &bus);

        sched.dispatch_input(
            &InputEvent::KeyDown(KeyInput::new(Key::Enter)),
            &mut screen,
            &bus,
        );
        assert_eq!(sched.current_scene(), Some(GAME));
        assert!(sched.is_enabled(g));
        assert!(!sched.quit_requested());

        sched.dispatch_input(
            &InputEvent::KeyDown(KeyInput::new(Key::Char('q'))),
            &mut screen,
            &bus,
        );
        assert!(sched.quit_requested());
    }

    #[test]
    fn registry_capacity_is_enforced() {
        let mut sched = WidgetScheduler::new();
        for _ in 0..MAX_WIDGETS {
            assert!(sched.register(SceneMask::ALL, SceneSwitcher).is_some());
        }
        assert!(sched.register(SceneMask::ALL, SceneSwitcher).is_none());
        assert_eq!(sched.len(), MAX_WIDGETS);
    }
}
