//! Horizon Press - button interaction and firing models.
//!
//! This is the main crate of Horizon Press. It re-exports the core reactive
//! types from `horizon-press-core` and provides the button models in
//! [`widget`].
//!
//! # Example
//!
//! ```
//! use horizon_press::widget::PointerKind;
//! use horizon_press::widget::widgets::{PushButtonModel, PushButtonOptions};
//!
//! let push = PushButtonModel::new(PushButtonOptions::default());
//! push.fired.connect(|_| println!("fired"));
//!
//! let button = push.button();
//! button.pointer_enter(PointerKind::Mouse);
//! button.pointer_down(PointerKind::Mouse);
//! button.pointer_up();
//! ```

pub use horizon_press_core::*;

mod error;
pub mod prelude;
pub mod widget;

pub use error::{ButtonError, Result as ButtonResult};
