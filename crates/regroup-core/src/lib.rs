#![forbid(unsafe_code)]

//! Core: shared values, animations, and gestures.
//!
//! # Role in regroup
//! `regroup-core` is the runtime the drag controllers stand on. It owns the
//! coordination primitives that replace a central store: observable
//! [`SharedValue`]s, cancelable [`AnimatedValue`]s, and the pan gesture stream.
//!
//! # Primary responsibilities
//! - **SharedValue / Snapshot**: wait-free reads, atomic writes, subscriptions.
//! - **AnimatedValue**: timing, spring, and decay transitions driven by `tick`.
//! - **Gestures**: [`PanEvent`] stream and a pointer-to-pan recognizer.
//! - **Geometry**: viewport, insets, and half-open vertical spans.
//!
//! # How it fits in the system
//! `regroup-layout` is pure and depends only on this crate's geometry;
//! `regroup-list` wires every controller together through these primitives.

pub mod animated;
pub mod animation;
pub mod geometry;
pub mod gesture;
pub mod shared;

pub use animated::AnimatedValue;
pub use geometry::{Insets, Span, Viewport};
pub use gesture::{PanConfig, PanEvent, PanRecognizer, PointerEvent};
pub use shared::{SharedValue, Snapshot, Subscription};
