//! OpenGL fundamentals, one lesson at a time.
//!
//! The [`graphics`] module is the reusable part: compiling and linking shader programs, validated
//! vertex layouts and draw calls, all behind the [`GlDriver`](graphics::GlDriver) trait. Everything
//! else turns that into something you can look at: [`lessons`] describes each tutorial step as
//! data, [`context`] owns the objects for one of them, and [`window`] puts it on screen.

#[macro_use] extern crate lazy_static;

pub mod config;
pub mod context;
pub mod graphics;
pub mod lessons;
pub mod logging;
pub mod scene;
pub mod ticker;
pub mod window;
