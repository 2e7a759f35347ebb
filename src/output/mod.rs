//! Terminal presentation: filtering and the text/JSON renderers.

mod filter;
mod render;

pub use filter::{entry_date, parse_date_arg, EntryFilter};
pub use render::{render_json, render_text, Palette};
