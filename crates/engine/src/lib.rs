//! Event and widget runtime (engine-facing).
//!
//! This crate decides *when* things are drawn. It owns no terminal state of
//! its own: widgets draw into the term crate's `ScreenBuffer` and the runtime
//! hands that buffer to the `TerminalRenderer` once per frame.
//!
//! # Module Structure
//!
//! - [`bus`]: fixed-capacity publish/subscribe keyed by subscriber id and
//!   event category mask
//! - [`scheduler`]: widget registry, scene transitions, frame/redraw passes,
//!   topmost-first input dispatch
//! - [`runtime`]: the frame loop tying input, scheduler, resize and flush
//!   together
//! - [`pacer`]: frame-rate bound
//! - [`config`]: environment configuration
//!
//! # Example
//!
//! ```
//! use tui_mastermind_engine::{Widget, WidgetCtx, WidgetScheduler, EventBus};
//! use tui_mastermind_engine::term::ScreenBuffer;
//! use tui_mastermind_engine::types::{Pos, Scene, SceneMask, Size, Style};
//!
//! struct Hello;
//!
//! impl Widget for Hello {
//!     fn on_redraw(&mut self, ctx: &mut WidgetCtx<'_>) {
//!         ctx.screen.write_at(Pos::HOME, Style::default(), "hello");
//!     }
//! }
//!
//! let mut screen = ScreenBuffer::new(Size::new(80, 24));
//! let bus = EventBus::new();
//! let mut scheduler = WidgetScheduler::new();
//! scheduler.register(SceneMask::ALL, Hello);
//! scheduler.change_scene(Scene(0), &mut screen, &bus);
//! scheduler.run_frame(&mut screen, &bus);
//!
//! assert_eq!(screen.get(Pos::new(1, 5)).unwrap().ch, 'o');
//! ```

pub mod bus;
pub mod config;
pub mod pacer;
pub mod runtime;
pub mod scheduler;

pub use tui_mastermind_term as term;
pub use tui_mastermind_types as types;

pub use bus::{Callback, EventBus, SubscriberId};
pub use config::RuntimeConfig;
pub use pacer::FramePacer;
pub use runtime::{InputSource, Runtime};
pub use scheduler::{Widget, WidgetCtx, WidgetId, WidgetScheduler};
