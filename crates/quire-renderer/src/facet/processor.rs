use quire_api::Facet;

use super::FacetOutput;

/// Re-applies `facets` to `text`, in the order given.
///
/// Facets are expected sorted by start and non-overlapping, which is what the
/// forward converter produces. A facet that starts inside an earlier one only
/// styles the part that was not emitted yet; ranges past the end of the text
/// or off a char boundary are ignored.
///
/// The feature list of a facet is applied as successive wrappings: the first
/// feature wraps the text, the second wraps that, and so on.
pub fn process_faceted_text<O: FacetOutput>(
    text: &str,
    facets: &[Facet],
    output: &mut O,
) -> Result<(), O::Error> {
    let mut cursor = 0;

    for facet in facets {
        let start = facet.index.start().max(cursor);
        let end = facet.index.end().min(text.len());
        if start >= end {
            continue;
        }
        let (Some(before), Some(span)) = (text.get(cursor..start), text.get(start..end)) else {
            continue;
        };

        output.write_text(before)?;
        for feature in facet.features.iter().rev() {
            output.start_feature(feature)?;
        }
        output.write_text(span)?;
        for feature in &facet.features {
            output.end_feature(feature)?;
        }
        cursor = end;
    }

    if let Some(rest) = text.get(cursor..) {
        output.write_text(rest)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_api::Feature;

    struct TestOutput {
        buffer: String,
    }

    impl TestOutput {
        fn new() -> Self {
            Self {
                buffer: String::new(),
            }
        }
    }

    impl FacetOutput for TestOutput {
        type Error = std::fmt::Error;

        fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
            self.buffer.push_str(text);
            Ok(())
        }

        fn start_feature(&mut self, feature: &Feature) -> Result<(), Self::Error> {
            match feature {
                Feature::Bold => self.buffer.push_str("<b>"),
                Feature::Italic => self.buffer.push_str("<i>"),
                Feature::Link { uri } => self.buffer.push_str(&format!("<a href=\"{}\">", uri)),
                _ => self.buffer.push_str("<?>"),
            }
            Ok(())
        }

        fn end_feature(&mut self, feature: &Feature) -> Result<(), Self::Error> {
            match feature {
                Feature::Bold => self.buffer.push_str("</b>"),
                Feature::Italic => self.buffer.push_str("</i>"),
                Feature::Link { .. } => self.buffer.push_str("</a>"),
                _ => self.buffer.push_str("</?>"),
            }
            Ok(())
        }
    }

    fn render(text: &str, facets: &[Facet]) -> String {
        let mut output = TestOutput::new();
        process_faceted_text(text, facets, &mut output).unwrap();
        output.buffer
    }

    #[test]
    fn test_simple_bold() {
        let facets = vec![Facet::new(0..5, vec![Feature::Bold])];
        assert_eq!(render("hello world", &facets), "<b>hello</b> world");
    }

    #[test]
    fn test_no_facets() {
        assert_eq!(render("plain text", &[]), "plain text");
    }

    #[test]
    fn test_link_facet() {
        let facets = vec![Facet::new(6..10, vec![Feature::link("https://example.com")])];
        assert_eq!(
            render("click here for more", &facets),
            "click <a href=\"https://example.com\">here</a> for more"
        );
    }

    #[test]
    fn test_features_wrap_in_list_order() {
        let facets = vec![Facet::new(
            0..4,
            vec![Feature::Bold, Feature::link("https://x.com")],
        )];
        assert_eq!(render("text", &facets), "<a href=\"https://x.com\"><b>text</b></a>");
    }

    #[test]
    fn test_adjacent_facets() {
        let facets = vec![
            Facet::new(0..3, vec![Feature::Bold]),
            Facet::new(3..6, vec![Feature::Bold, Feature::Italic]),
        ];
        assert_eq!(render("onetwo!", &facets), "<b>one</b><i><b>two</b></i>!");
    }

    #[test]
    fn test_overlap_only_styles_remainder() {
        let facets = vec![
            Facet::new(0..6, vec![Feature::Bold]),
            Facet::new(3..9, vec![Feature::Italic]),
        ];
        assert_eq!(render("abcdefghij", &facets), "<b>abcdef</b><i>ghi</i>j");
    }

    #[test]
    fn test_out_of_range_facets_are_ignored() {
        let facets = vec![
            Facet::new(4..40, vec![Feature::Bold]),
            Facet::new(1..2, vec![Feature::Italic]),
        ];
        // clamped to the text end, then the second facet starts behind the cursor
        assert_eq!(render("héllo", &facets), "hél<b>lo</b>");
    }

    #[test]
    fn test_non_char_boundary_is_skipped() {
        // byte 2 falls inside the two-byte 'é'
        let facets = vec![Facet::new(0..2, vec![Feature::Bold])];
        assert_eq!(render("héllo", &facets), "héllo");
    }
}
