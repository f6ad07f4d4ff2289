//! GUI module for FLAPNET.
//!
//! Provides a graphical frontend using egui + eframe.
//!
//! ## Architecture
//!
//! Everything runs on the render thread. The app paces the simulation to the
//! configured frame rate, stepping either the [`Trainer`](crate::Trainer)
//! (watch a population learn) or a [`SinglePlayer`](crate::SinglePlayer)
//! session (play with the space bar) between repaints. A speed multiplier
//! lets training run faster than real time.
//!
//! ## Usage
//!
//! ```no_run
//! use flapnet::Config;
//! use flapnet::gui::{run_gui, Mode};
//!
//! let config = Config::default();
//! run_gui(config, Mode::Train).unwrap();
//! ```

mod app;

pub use app::{run_gui, FlapnetApp, Mode};
