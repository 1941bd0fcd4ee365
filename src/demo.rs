//! Demo widget set: a title scene and a code-entry scene.

use tracing::debug;

use tui_mastermind::engine::{Runtime, SubscriberId, Widget, WidgetCtx};
use tui_mastermind::input::should_quit;
use tui_mastermind::types::{
    Color, EventMask, Key, KeyInput, MouseButton, Pos, Propagation, Scene, SceneMask, Size,
    Style, StyleProps,
};

pub const MENU: Scene = Scene(0);
pub const BOARD: Scene = Scene(1);

const PEG_COLORS: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

const LOG_SUBSCRIBER: SubscriberId = SubscriberId(1);

pub fn install<W: std::io::Write>(runtime: &mut Runtime<W>) {
    let scheduler = &mut runtime.scheduler;
    scheduler.register(SceneMask::of(&[MENU]), Title);
    scheduler.register(SceneMask::of(&[BOARD]), CodeRow::default());
    scheduler.register(SceneMask::of(&[BOARD]), Spinner::default());
    scheduler.register(SceneMask::ALL, StatusBar::default());
    // Last registered is offered input first.
    scheduler.register(SceneMask::ALL, QuitKeys);

    runtime.bus.register(LOG_SUBSCRIBER, |_, _, event| {
        debug!(?event, "ui event");
        Propagation::Continue
    });
    runtime
        .bus
        .subscribe(LOG_SUBSCRIBER, EventMask::SCENE | EventMask::RESIZE);

    runtime.change_scene(MENU);
}

fn blank(ctx: &mut WidgetCtx<'_>, origin: Pos, size: Size) {
    ctx.screen.set_style(Style::default());
    ctx.screen.fill_rect(origin, size, ' ');
}

struct Title;

impl Title {
    const ORIGIN: Pos = Pos::new(2, 3);
    const AREA: Size = Size::new(40, 3);
}

impl Widget for Title {
    fn on_disable(&mut self, ctx: &mut WidgetCtx<'_>) {
        blank(ctx, Self::ORIGIN, Self::AREA);
    }

    fn on_redraw(&mut self, ctx: &mut WidgetCtx<'_>) {
        let title = Style::new(Color::BrightYellow, Color::Black).with_props(StyleProps::BOLD);
        ctx.screen.write_at(Self::ORIGIN, title, "M A S T E R M I N D");
        let hint = Style::new(Color::White, Color::Black).with_props(StyleProps::FAINT);
        ctx.screen
            .write_at(Pos::new(Self::ORIGIN.row + 2, Self::ORIGIN.col), hint, "Enter: play   q: quit");
    }

    fn on_input(&mut self, key: KeyInput, ctx: &mut WidgetCtx<'_>) -> bool {
        if key.key == Key::Enter {
            ctx.change_scene(BOARD);
            return true;
        }
        false
    }
}

/// Four peg slots; number keys or clicks cycle their colors.
#[derive(Default)]
struct CodeRow {
    pegs: [Option<usize>; 4],
}

impl CodeRow {
    const ORIGIN: Pos = Pos::new(2, 3);
    const SLOT_WIDTH: u16 = 4;
    const HINT: &'static str = "1-4/click: peg  Esc: menu";

    fn cycle(&mut self, slot: usize) {
        self.pegs[slot] = match self.pegs[slot] {
            None => Some(0),
            Some(i) if i + 1 < PEG_COLORS.len() => Some(i + 1),
            Some(_) => None,
        };
    }

    fn slot_at(pos: Pos) -> Option<usize> {
        if pos.row != Self::ORIGIN.row || pos.col < Self::ORIGIN.col {
            return None;
        }
        let slot = ((pos.col - Self::ORIGIN.col) / Self::SLOT_WIDTH) as usize;
        (slot < 4).then_some(slot)
    }
}

impl Widget for CodeRow {
    fn on_disable(&mut self, ctx: &mut WidgetCtx<'_>) {
        blank(ctx, Self::ORIGIN, Size::new(Self::HINT.len() as u16, 3));
    }

    fn on_redraw(&mut self, ctx: &mut WidgetCtx<'_>) {
        let frame = Style::new(Color::BrightBlack, Color::Black);
        for (i, peg) in self.pegs.iter().enumerate() {
            let col = Self::ORIGIN.col + i as u16 * Self::SLOT_WIDTH;
            ctx.screen.write_at(Pos::new(Self::ORIGIN.row, col), frame, "(");
            match peg {
                Some(c) => {
                    ctx.screen.set_style(Style::new(PEG_COLORS[*c], Color::Black));
                    ctx.screen.write("●");
                }
                None => {
                    ctx.screen.write(" ");
                }
            }
            ctx.screen.set_style(frame);
            ctx.screen.write(")");
        }
        let hint = Style::new(Color::White, Color::Black).with_props(StyleProps::FAINT);
        ctx.screen.write_at(
            Pos::new(Self::ORIGIN.row + 2, Self::ORIGIN.col),
            hint,
            Self::HINT,
        );
    }

    fn on_input(&mut self, key: KeyInput, ctx: &mut WidgetCtx<'_>) -> bool {
        match key.key {
            Key::Char(c @ '1'..='4') => {
                self.cycle(c as usize - '1' as usize);
                ctx.request_redraw();
                true
            }
            Key::Esc => {
                ctx.change_scene(MENU);
                true
            }
            _ => false,
        }
    }

    fn on_mouse_click(&mut self, pos: Pos, button: MouseButton, ctx: &mut WidgetCtx<'_>) -> bool {
        match (Self::slot_at(pos), button) {
            (Some(slot), MouseButton::Left) => {
                self.cycle(slot);
                ctx.request_redraw();
                true
            }
            _ => false,
        }
    }
}

/// Time-driven widget: advances a glyph every few frames.
#[derive(Default)]
struct Spinner {
    frames: u32,
    phase: usize,
}

impl Spinner {
    const POS: Pos = Pos::new(2, 21);
    const GLYPHS: [char; 4] = ['|', '/', '-', '\\'];
    const FRAMES_PER_STEP: u32 = 6;
}

impl Widget for Spinner {
    fn on_disable(&mut self, ctx: &mut WidgetCtx<'_>) {
        blank(ctx, Self::POS, Size::new(1, 1));
    }

    fn on_frame(&mut self, ctx: &mut WidgetCtx<'_>) {
        self.frames += 1;
        if self.frames % Self::FRAMES_PER_STEP == 0 {
            self.phase = (self.phase + 1) % Self::GLYPHS.len();
            ctx.request_redraw();
        }
    }

    fn on_redraw(&mut self, ctx: &mut WidgetCtx<'_>) {
        ctx.screen.set_cursor(Self::POS);
        ctx.screen.set_style(Style::new(Color::Cyan, Color::Black));
        ctx.screen.put_char(Self::GLYPHS[self.phase]);
    }
}

/// Bottom-row scene indicator, present in every scene.
#[derive(Default)]
struct StatusBar {
    shown: Option<Scene>,
    row: Option<u16>,
}

impl Widget for StatusBar {
    fn on_frame(&mut self, ctx: &mut WidgetCtx<'_>) {
        if self.shown != ctx.scene() {
            ctx.request_redraw();
        }
    }

    fn on_redraw(&mut self, ctx: &mut WidgetCtx<'_>) {
        let live = ctx.screen.clamped_size();
        let row = live.height.max(1);
        if let Some(old) = self.row.filter(|&r| r != row) {
            blank(ctx, Pos::new(old, 1), Size::new(live.width, 1));
        }
        let bar = Style::new(Color::Black, Color::White);
        ctx.screen.set_cursor(Pos::new(row, 1));
        ctx.screen.set_style(bar);
        let name = match ctx.scene() {
            Some(BOARD) => "board",
            _ => "menu",
        };
        let n = write!(ctx.screen, " scene: {:<5} ", name);
        for _ in n..live.width as usize {
            ctx.screen.put_char(' ');
        }
        self.shown = ctx.scene();
        self.row = Some(row);
    }
}

/// Topmost handler for the quit chord.
struct QuitKeys;

impl Widget for QuitKeys {
    fn on_input(&mut self, key: KeyInput, ctx: &mut WidgetCtx<'_>) -> bool {
        if should_quit(key) {
            ctx.request_quit();
            return true;
        }
        false
    }
}
