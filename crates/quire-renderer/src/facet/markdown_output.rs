use quire_api::{Facet, Feature};
use std::fmt::Write;

use super::FacetOutput;

pub struct MarkdownFacetOutput<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownFacetOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FacetOutput for MarkdownFacetOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.writer.write_str(text)
    }

    fn start_feature(&mut self, feature: &Feature) -> Result<(), Self::Error> {
        match feature {
            Feature::Bold => write!(self.writer, "**"),
            Feature::Italic => write!(self.writer, "*"),
            Feature::Code => write!(self.writer, "`"),
            Feature::Strikethrough => write!(self.writer, "~~"),
            Feature::Highlight => write!(self.writer, "=="),
            Feature::Link { .. } => write!(self.writer, "["),
            // No markdown equivalent
            Feature::Underline => Ok(()),
        }
    }

    fn end_feature(&mut self, feature: &Feature) -> Result<(), Self::Error> {
        match feature {
            Feature::Bold => write!(self.writer, "**"),
            Feature::Italic => write!(self.writer, "*"),
            Feature::Code => write!(self.writer, "`"),
            Feature::Strikethrough => write!(self.writer, "~~"),
            Feature::Highlight => write!(self.writer, "=="),
            Feature::Link { uri } => write!(self.writer, "]({})", uri),
            // No markdown equivalent
            Feature::Underline => Ok(()),
        }
    }
}

pub fn render_faceted_markdown(text: &str, facets: &[Facet]) -> Result<String, std::fmt::Error> {
    let mut output = MarkdownFacetOutput::new(String::new());
    super::process_faceted_text(text, facets, &mut output)?;
    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_per_feature() {
        let text = "b i c s h u l";
        let facets = vec![
            Facet::new(0..1, vec![Feature::Bold]),
            Facet::new(2..3, vec![Feature::Italic]),
            Facet::new(4..5, vec![Feature::Code]),
            Facet::new(6..7, vec![Feature::Strikethrough]),
            Facet::new(8..9, vec![Feature::Highlight]),
            Facet::new(10..11, vec![Feature::Underline]),
            Facet::new(12..13, vec![Feature::link("https://x.com")]),
        ];
        insta::assert_snapshot!(
            render_faceted_markdown(text, &facets).unwrap(),
            @"**b** *i* `c` ~~s~~ ==h== u [l](https://x.com)"
        );
    }

    #[test]
    fn test_bold_link_nesting() {
        let facets = vec![Facet::new(
            0..4,
            vec![Feature::Bold, Feature::link("https://x.com")],
        )];
        assert_eq!(
            render_faceted_markdown("text", &facets).unwrap(),
            "[**text**](https://x.com)"
        );
    }
}
