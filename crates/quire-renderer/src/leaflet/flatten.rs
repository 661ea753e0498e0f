//! Inline flattening: nested inline markup to plaintext plus facets.

use quire_api::{Facet, Feature, Image};

use crate::images::ImageCatalog;
use crate::tree::{Node, NodeKind};

/// Plaintext with the facets that style it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TextRun {
    pub text: String,
    pub facets: Vec<Facet>,
}

impl TextRun {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Strips surrounding whitespace, shifting and clamping facets onto the
    /// remaining text. Returns `None` when nothing is left.
    pub fn trimmed(self) -> Option<Self> {
        let start = self.text.len() - self.text.trim_start().len();
        let end = self.text.trim_end().len();
        if start >= end {
            return None;
        }
        let text = self.text.get(start..end)?.to_string();
        let facets = self
            .facets
            .into_iter()
            .filter_map(|facet| {
                let from = facet.index.start().clamp(start, end) - start;
                let to = facet.index.end().clamp(start, end) - start;
                (from < to).then(|| Facet::new(from..to, facet.features))
            })
            .collect();
        Some(Self { text, facets })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InlineRun {
    Text(TextRun),
    Image(Image),
}

/// What to do with an image met while flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImageMode {
    /// Close the current text run and emit the image as its own run.
    Split,
    /// Keep a single run; the image contributes its alt text.
    AltText,
}

/// Features introduced by one enclosing inline node.
#[derive(Debug)]
struct FormatContext {
    features: Vec<Feature>,
    opened_at: usize,
}

/// Traversal state for one flattening pass. Owned by the caller, so nested
/// and repeated flattening never share state.
pub(crate) struct InlineFlattener<'c> {
    images: &'c ImageCatalog,
    mode: ImageMode,
    text: String,
    facets: Vec<Facet>,
    open: Vec<FormatContext>,
    runs: Vec<InlineRun>,
    block_separator: &'c str,
    /// Set when a block node opens or closes; the next leaf is preceded by
    /// `block_separator` unless nothing has been written yet.
    break_pending: bool,
}

impl<'c> InlineFlattener<'c> {
    pub fn new(images: &'c ImageCatalog, mode: ImageMode) -> Self {
        Self {
            images,
            mode,
            text: String::new(),
            facets: Vec::new(),
            open: Vec::new(),
            runs: Vec::new(),
            block_separator: " ",
            break_pending: false,
        }
    }

    /// Text placed between block-level nodes at any depth.
    pub fn with_block_separator(mut self, separator: &'c str) -> Self {
        self.block_separator = separator;
        self
    }

    pub fn visit_all<'n>(&mut self, nodes: impl IntoIterator<Item = &'n Node>) {
        for node in nodes {
            self.visit(node);
        }
    }

    /// Appends text that no open format context applies to.
    fn push_plain(&mut self, text: &str) {
        self.separate();
        self.text.push_str(text);
    }

    pub fn visit(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Text(text) | NodeKind::Html(text) => self.push_leaf(text),
            NodeKind::Code(code) => self.push_code(code),
            NodeKind::SoftBreak | NodeKind::HardBreak => self.push_plain(" "),
            NodeKind::TaskListMarker(checked) => {
                self.push_plain(if *checked { "[x] " } else { "[ ] " })
            }
            NodeKind::Emphasis => self.with_context(vec![Feature::Italic], node),
            NodeKind::Strong => self.with_context(vec![Feature::Bold], node),
            NodeKind::Strikethrough => self.with_context(vec![Feature::Strikethrough], node),
            NodeKind::Link { dest } => self.with_context(vec![Feature::link(dest.clone())], node),
            NodeKind::Image { dest, .. } => match self.mode {
                ImageMode::Split => {
                    self.flush();
                    let image = self.images.image_block(dest, alt_text(node));
                    self.runs.push(InlineRun::Image(image));
                }
                ImageMode::AltText => self.visit_all(&node.children),
            },
            kind if is_block(kind) => {
                self.break_pending = true;
                self.visit_all(&node.children);
                self.break_pending = true;
            }
            _ => self.visit_all(&node.children),
        }
    }

    fn separate(&mut self) {
        if std::mem::take(&mut self.break_pending) && !self.text.is_empty() {
            self.text.push_str(self.block_separator);
        }
    }

    fn with_context(&mut self, features: Vec<Feature>, node: &Node) {
        self.open.push(FormatContext {
            features,
            opened_at: self.text.len(),
        });
        self.visit_all(&node.children);
        if let Some(context) = self.open.pop() {
            tracing::trace!(
                start = context.opened_at,
                end = self.text.len(),
                features = ?context.features,
                "closed format context"
            );
        }
    }

    fn push_leaf(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.separate();
        let start = self.text.len();
        self.text.push_str(text);
        if !self.open.is_empty() {
            let features = self
                .open
                .iter()
                .flat_map(|context| context.features.iter().cloned())
                .collect();
            self.facets
                .push(Facet::new(start..self.text.len(), features));
        }
    }

    /// Code spans are atomic and ignore enclosing formatting.
    fn push_code(&mut self, code: &str) {
        if code.is_empty() {
            return;
        }
        self.separate();
        let start = self.text.len();
        self.text.push_str(code);
        self.facets
            .push(Facet::new(start..self.text.len(), vec![Feature::Code]));
    }

    fn flush(&mut self) {
        if self.text.is_empty() {
            return;
        }
        self.runs.push(InlineRun::Text(TextRun {
            text: std::mem::take(&mut self.text),
            facets: std::mem::take(&mut self.facets),
        }));
    }

    pub fn finish(mut self) -> Vec<InlineRun> {
        self.flush();
        self.runs
    }

    /// Collapses everything into one run. Only meaningful in
    /// [`ImageMode::AltText`], where no image runs are produced.
    pub fn finish_text(self) -> TextRun {
        TextRun {
            text: self.text,
            facets: self.facets,
        }
    }
}

fn is_block(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Paragraph
            | NodeKind::Heading(_)
            | NodeKind::CodeBlock { .. }
            | NodeKind::BlockQuote
            | NodeKind::List
            | NodeKind::Item
    )
}

/// Alt text for an image: its title, or else its first text child.
pub(crate) fn alt_text(image: &Node) -> Option<String> {
    let title = match &image.kind {
        NodeKind::Image { title, .. } => title.as_str(),
        _ => "",
    };
    if !title.is_empty() {
        return Some(title.to_string());
    }
    image
        .first_text()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    fn flatten(markup: &str, mode: ImageMode) -> Vec<InlineRun> {
        let tree = tree::parse(markup, pulldown_cmark::Options::ENABLE_STRIKETHROUGH).unwrap();
        let catalog = ImageCatalog::default();
        let mut flattener = InlineFlattener::new(&catalog, mode);
        flattener.visit_all(&tree.children[0].children);
        flattener.finish()
    }

    fn single_text(runs: Vec<InlineRun>) -> TextRun {
        match runs.as_slice() {
            [InlineRun::Text(run)] => run.clone(),
            other => panic!("expected one text run, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_contexts_concatenate_outermost_first() {
        let run = single_text(flatten("**a _b_**", ImageMode::Split));
        assert_eq!(run.text, "a b");
        assert_eq!(
            run.facets,
            vec![
                Facet::new(0..2, vec![Feature::Bold]),
                Facet::new(2..3, vec![Feature::Bold, Feature::Italic]),
            ]
        );
    }

    #[test]
    fn test_one_facet_per_leaf() {
        // the soft break splits the bold span into two text leaves
        let run = single_text(flatten("**one\ntwo**", ImageMode::Split));
        assert_eq!(run.text, "one two");
        assert_eq!(
            run.facets,
            vec![
                Facet::new(0..3, vec![Feature::Bold]),
                Facet::new(4..7, vec![Feature::Bold]),
            ]
        );
    }

    #[test]
    fn test_code_ignores_enclosing_context() {
        let run = single_text(flatten("**see `x`**", ImageMode::Split));
        assert_eq!(run.text, "see x");
        assert_eq!(run.facets[1], Facet::new(4..5, vec![Feature::Code]));
    }

    #[test]
    fn test_link_inside_strike() {
        let run = single_text(flatten("~~[gone](https://x.com)~~", ImageMode::Split));
        assert_eq!(
            run.facets,
            vec![Facet::new(
                0..4,
                vec![Feature::Strikethrough, Feature::link("https://x.com")]
            )]
        );
    }

    #[test]
    fn test_multibyte_offsets() {
        let run = single_text(flatten("café **naïve**", ImageMode::Split));
        assert_eq!(run.facets, vec![Facet::new(6..12, vec![Feature::Bold])]);
        assert_eq!(&run.text[6..12], "naïve");
    }

    #[test]
    fn test_image_splits_runs() {
        let runs = flatten("before ![cat](cat.png) after", ImageMode::Split);
        assert_eq!(runs.len(), 3);
        assert!(matches!(&runs[0], InlineRun::Text(run) if run.text == "before "));
        assert!(matches!(&runs[1], InlineRun::Image(image) if image.alt.as_deref() == Some("cat")));
        assert!(matches!(&runs[2], InlineRun::Text(run) if run.text == " after"));
    }

    #[test]
    fn test_image_alt_text_mode() {
        let runs = flatten("see ![a cat](cat.png)", ImageMode::AltText);
        assert_eq!(single_text(runs).text, "see a cat");
    }

    #[test]
    fn test_block_separator_at_any_depth() {
        let markup = "> - a\n>   - b\n>\n> c";
        let tree = tree::parse(markup, pulldown_cmark::Options::empty()).unwrap();
        let catalog = ImageCatalog::default();
        let mut flattener =
            InlineFlattener::new(&catalog, ImageMode::AltText).with_block_separator("|");
        flattener.visit_all(&tree.children[0].children);
        assert_eq!(flattener.finish_text().text, "a|b|c");
    }

    #[test]
    fn test_trimmed_shifts_facets() {
        let run = TextRun {
            text: "  **x** ".into(),
            facets: vec![
                Facet::new(0..1, vec![Feature::Italic]),
                Facet::new(2..7, vec![Feature::Bold]),
            ],
        };
        let trimmed = run.trimmed().unwrap();
        assert_eq!(trimmed.text, "**x**");
        assert_eq!(trimmed.facets, vec![Facet::new(0..5, vec![Feature::Bold])]);

        assert!(TextRun {
            text: " \n ".into(),
            facets: vec![],
        }
        .trimmed()
        .is_none());
    }
}
