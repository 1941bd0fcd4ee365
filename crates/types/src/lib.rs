//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the compositor.
//! All types are plain values with no I/O, making them usable from the screen
//! buffer, the encoder, the event bus, and widget code alike.
//!
//! # Canvas Dimensions
//!
//! The canvas is a fixed-capacity grid. The live region flushed to the terminal
//! is `min(terminal size, canvas maximum)`, computed per axis:
//!
//! - **Width**: up to 200 columns (indexed 1-200)
//! - **Height**: up to 60 rows (indexed 1-60)
//!
//! Positions are 1-indexed, matching the terminal's own cursor addressing.
//!
//! # Capacities
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MAX_SUBSCRIBERS` | 32 | Event bus slots |
//! | `MAX_WIDGETS` | 32 | Widget scheduler slots |
//! | `INPUT_QUEUE_CAPACITY` | 64 | Inputs drained per frame |
//! | `DEFAULT_FRAME_MS` | 33 | Minimum frame duration (~30 FPS) |
//!
//! # SGR Color Codes
//!
//! A [`Color`] is a 3-bit hue plus a brightness bit:
//!
//! | Hue | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 |
//! |-----|---|---|---|---|---|---|---|---|
//! | Name | black | red | green | yellow | blue | magenta | cyan | white |
//!
//! Foreground code is `30 + hue` (`90 + hue` when bright), background code is
//! `40 + hue` (`100 + hue` when bright).
//!
//! # Examples
//!
//! ```
//! use tui_mastermind_types::{Color, Style, StyleProps};
//!
//! let style = Style::new(Color::BrightRed, Color::Black).with_props(StyleProps::BOLD);
//! assert_eq!(style.fg.fg_code(), 91);
//! assert_eq!(style.bg.bg_code(), 40);
//! ```

use bitflags::bitflags;

/// Maximum canvas width in columns.
pub const CANVAS_MAX_WIDTH: u16 = 200;

/// Maximum canvas height in rows.
pub const CANVAS_MAX_HEIGHT: u16 = 60;

/// Number of cells in the fixed-capacity grid.
pub const CANVAS_CELLS: usize = (CANVAS_MAX_WIDTH as usize) * (CANVAS_MAX_HEIGHT as usize);

/// Event bus slot count.
pub const MAX_SUBSCRIBERS: usize = 32;

/// Widget scheduler slot count.
pub const MAX_WIDGETS: usize = 32;

/// Upper bound on platform inputs routed in a single frame.
pub const INPUT_QUEUE_CAPACITY: usize = 64;

/// Default minimum frame duration in milliseconds (~30 FPS).
pub const DEFAULT_FRAME_MS: u32 = 33;

/// Worst-case bytes the encoder emits for one cell:
/// reposition `ESC[60;200H` (9) + style `ESC[0;1;2;3;4;5;97;107m` (21) + a 4-byte scalar.
pub const MAX_BYTES_PER_CELL: usize = 40;

/// Trailing home + default-style sequences appended after a non-empty flush.
pub const FLUSH_TRAILER_BYTES: usize = 32;

/// Encoder working-buffer bound. Exceeding it is a precondition violation.
pub const FLUSH_BUFFER_CAPACITY: usize = CANVAS_CELLS * MAX_BYTES_PER_CELL + FLUSH_TRAILER_BYTES;

/// SGR foreground base code.
pub const SGR_FG_BASE: u8 = 30;

/// SGR background base code.
pub const SGR_BG_BASE: u8 = 40;

/// Offset added to the base code for the bright variant of a hue.
pub const SGR_BRIGHT_OFFSET: u8 = 60;

/// The sixteen terminal colors.
///
/// The discriminant packs the hue in bits 0-2 and brightness in bit 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl Color {
    const ALL: [Color; 16] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
        Color::BrightBlack,
        Color::BrightRed,
        Color::BrightGreen,
        Color::BrightYellow,
        Color::BrightBlue,
        Color::BrightMagenta,
        Color::BrightCyan,
        Color::BrightWhite,
    ];

    /// Rebuild a color from its packed nibble. Only the low four bits are read.
    pub const fn from_packed(bits: u8) -> Self {
        Self::ALL[(bits & 0x0f) as usize]
    }

    /// 3-bit hue offset (0-7).
    pub const fn hue(self) -> u8 {
        (self as u8) & 0x07
    }

    pub const fn is_bright(self) -> bool {
        (self as u8) & 0x08 != 0
    }

    /// SGR foreground code (30-37, 90-97).
    pub const fn fg_code(self) -> u8 {
        SGR_FG_BASE + self.hue() + if self.is_bright() { SGR_BRIGHT_OFFSET } else { 0 }
    }

    /// SGR background code (40-47, 100-107).
    pub const fn bg_code(self) -> u8 {
        SGR_BG_BASE + self.hue() + if self.is_bright() { SGR_BRIGHT_OFFSET } else { 0 }
    }
}

bitflags! {
    /// Text properties, emitted as SGR sub-codes in declaration order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleProps: u8 {
        const BOLD      = 0b0000_0001;
        const FAINT     = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const BLINK     = 0b0001_0000;
    }
}

impl StyleProps {
    /// `(flag, SGR sub-code)` in emission order.
    pub const SGR_CODES: [(StyleProps, u8); 5] = [
        (StyleProps::BOLD, 1),
        (StyleProps::FAINT, 2),
        (StyleProps::ITALIC, 3),
        (StyleProps::UNDERLINE, 4),
        (StyleProps::BLINK, 5),
    ];
}

/// Foreground, background and text properties of a cell.
///
/// Styles are small `Copy` values compared field-by-field on every flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub props: StyleProps,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: Color::White,
            bg: Color::Black,
            props: StyleProps::empty(),
        }
    }
}

impl Style {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            props: StyleProps::empty(),
        }
    }

    pub const fn with_props(self, props: StyleProps) -> Self {
        Self { props, ..self }
    }
}

/// A single canvas cell.
///
/// `needs_flush` is set by every write that targets the cell and cleared only
/// by the encoder when it emits the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
    pub needs_flush: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
            needs_flush: false,
        }
    }
}

/// 1-indexed terminal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u16,
    pub col: u16,
}

impl Pos {
    /// Top-left corner of the canvas.
    pub const HOME: Pos = Pos { row: 1, col: 1 };

    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// Size in columns x rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    /// The fixed canvas capacity.
    pub const CANVAS_MAX: Size = Size {
        width: CANVAS_MAX_WIDTH,
        height: CANVAS_MAX_HEIGHT,
    };

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Component-wise minimum with the canvas capacity.
    pub fn clamp_to_canvas(self) -> Self {
        Self {
            width: self.width.min(CANVAS_MAX_WIDTH),
            height: self.height.min(CANVAS_MAX_HEIGHT),
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row >= 1 && pos.col >= 1 && pos.row <= self.height && pos.col <= self.width
    }
}

/// Mouse buttons reported by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the platform layer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Left,
    Right,
    Up,
    Down,
}

/// A key press with its control modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyInput {
    pub const fn new(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    pub const fn ctrl(key: Key) -> Self {
        Self { key, ctrl: true }
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// One discrete input record from the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(KeyInput),
    MouseMove(Pos),
    MouseClick { pos: Pos, button: MouseButton },
    Resize(Size),
}

bitflags! {
    /// Event categories a subscriber can listen to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventMask: u32 {
        const KEY         = 1 << 0;
        const MOUSE_MOVE  = 1 << 1;
        const MOUSE_CLICK = 1 << 2;
        const RESIZE      = 1 << 3;
        const SCENE       = 1 << 4;
        const USER        = 1 << 5;
    }
}

/// Events routed through the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyInput),
    MouseMove(Pos),
    MouseClick { pos: Pos, button: MouseButton },
    Resize { old: Size, new: Size },
    SceneChanged { from: Option<Scene>, to: Scene },
    /// Application-defined event code.
    User(u32),
}

impl Event {
    /// The single category this event belongs to.
    pub fn mask(&self) -> EventMask {
        match self {
            Event::Key(_) => EventMask::KEY,
            Event::MouseMove(_) => EventMask::MOUSE_MOVE,
            Event::MouseClick { .. } => EventMask::MOUSE_CLICK,
            Event::Resize { .. } => EventMask::RESIZE,
            Event::SceneChanged { .. } => EventMask::SCENE,
            Event::User(_) => EventMask::USER,
        }
    }
}

/// Subscriber's answer to an event.
///
/// The bus itself always continues; only input dispatch in the scheduler
/// short-circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// A named UI mode, identified by a bit index (0-31).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scene(pub u8);

/// Set of scenes a widget is active in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SceneMask(u32);

impl SceneMask {
    pub const NONE: SceneMask = SceneMask(0);
    pub const ALL: SceneMask = SceneMask(u32::MAX);

    pub fn of(scenes: &[Scene]) -> Self {
        scenes.iter().fold(Self::NONE, |m, &s| m.with(s))
    }

    pub fn with(self, scene: Scene) -> Self {
        debug_assert!(scene.0 < 32, "scene index {} out of range", scene.0);
        Self(self.0 | (1u32 << (scene.0 & 31)))
    }

    pub fn contains(&self, scene: Scene) -> bool {
        scene.0 < 32 && self.0 & (1u32 << scene.0) != 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}
