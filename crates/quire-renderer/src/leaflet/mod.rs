mod block_renderer;
mod converter;
mod flatten;
mod markdown_converter;


pub use block_renderer::{render_block, to_html};
pub use converter::Converter;
pub use markdown_converter::{PLACEHOLDER_IMAGE_TARGET, convert_block, to_markup};
