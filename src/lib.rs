//! Image gallery with per-image pan and zoom, global colour filters and PNG
//! export of the visible view.

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod gallery;
pub mod handle;
pub mod logging;
pub mod tile;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::FilterMode;
pub use gallery::Gallery;
pub use handle::ImageHandle;
pub use view::{ViewState, ViewTransform};
