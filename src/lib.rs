//! Layout engine turning weighted relations into chord, hive and network
//! diagrams, with hover highlighting, tooltips and click dispatch.

pub mod chord;
pub mod color;
pub mod config;
pub mod diagram;
pub mod geometry;
pub mod graph;
pub mod hive;
pub mod interaction;
pub mod network;
pub mod relation;
pub mod session;
pub mod sort;
pub mod util;

pub use config::{LayoutKind, PanelConfig};
pub use diagram::{Diagram, Layout, render_pass};
pub use relation::{LabelSplitter, Relation};
pub use session::RenderSession;
