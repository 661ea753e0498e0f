mod html_output;
mod markdown_output;
mod processor;

pub use html_output::{HtmlFacetOutput, render_faceted_html};
pub(crate) use html_output::escape_html;
pub use markdown_output::{MarkdownFacetOutput, render_faceted_markdown};
pub use processor::process_faceted_text;

use quire_api::Feature;

/// Sink for faceted text. Each facet span arrives as `start_feature` calls
/// (outermost first), the span text, then `end_feature` calls in reverse.
pub trait FacetOutput {
    type Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;
    fn start_feature(&mut self, feature: &Feature) -> Result<(), Self::Error>;
    fn end_feature(&mut self, feature: &Feature) -> Result<(), Self::Error>;
}
