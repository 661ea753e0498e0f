use quire_api::{Facet, Feature};
use std::fmt::Write;

use super::FacetOutput;

pub struct HtmlFacetOutput<W: Write> {
    writer: W,
}

impl<W: Write> HtmlFacetOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Escapes text for element content and double-quoted attribute values.
pub(crate) fn escape_html<W: Write>(writer: &mut W, text: &str) -> std::fmt::Result {
    for c in text.chars() {
        match c {
            '&' => writer.write_str("&amp;")?,
            '<' => writer.write_str("&lt;")?,
            '>' => writer.write_str("&gt;")?,
            '"' => writer.write_str("&quot;")?,
            _ => writer.write_char(c)?,
        }
    }
    Ok(())
}

impl<W: Write> FacetOutput for HtmlFacetOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        escape_html(&mut self.writer, text)
    }

    fn start_feature(&mut self, feature: &Feature) -> Result<(), Self::Error> {
        match feature {
            Feature::Bold => write!(self.writer, "<strong>"),
            Feature::Italic => write!(self.writer, "<em>"),
            Feature::Code => write!(self.writer, "<code>"),
            Feature::Underline => write!(self.writer, "<u>"),
            Feature::Strikethrough => write!(self.writer, "<s>"),
            Feature::Highlight => write!(self.writer, "<mark>"),
            Feature::Link { uri } => {
                write!(self.writer, "<a href=\"")?;
                escape_html(&mut self.writer, uri)?;
                write!(self.writer, "\">")
            }
        }
    }

    fn end_feature(&mut self, feature: &Feature) -> Result<(), Self::Error> {
        match feature {
            Feature::Bold => write!(self.writer, "</strong>"),
            Feature::Italic => write!(self.writer, "</em>"),
            Feature::Code => write!(self.writer, "</code>"),
            Feature::Underline => write!(self.writer, "</u>"),
            Feature::Strikethrough => write!(self.writer, "</s>"),
            Feature::Highlight => write!(self.writer, "</mark>"),
            Feature::Link { .. } => write!(self.writer, "</a>"),
        }
    }
}

pub fn render_faceted_html(text: &str, facets: &[Facet]) -> Result<String, std::fmt::Error> {
    let mut output = HtmlFacetOutput::new(String::new());
    super::process_faceted_text(text, facets, &mut output)?;
    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_text_and_href() {
        let facets = vec![Facet::new(
            4..9,
            vec![Feature::link("https://x.com/?a=1&b=\"2\"")],
        )];
        insta::assert_snapshot!(
            render_faceted_html("1 < link > 0", &facets).unwrap(),
            @r#"1 &lt; <a href="https://x.com/?a=1&amp;b=&quot;2&quot;">link </a>&gt; 0"#
        );
    }
}
