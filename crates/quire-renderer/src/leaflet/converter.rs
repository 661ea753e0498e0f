//! Markdown to linear-document blocks.

use std::path::{Path, PathBuf};

use quire_api::{
    Block, Code, Heading, HorizontalRule, List, ListItem, ListItemContent, Paragraph, Quote,
};

use super::flatten::{ImageMode, InlineFlattener, InlineRun, TextRun, alt_text};
use crate::error::ConvertError;
use crate::images::{ImageCatalog, ImageResolver};
use crate::options::ConvertOptions;
use crate::tree::{self, Node, NodeKind};

/// Converts markdown into blocks.
///
/// Without a resolver every image becomes a placeholder blob. With one, each
/// distinct image reference is resolved once before any block is built, and
/// the first resolver error fails the whole conversion.
#[derive(Default)]
pub struct Converter<'r> {
    options: ConvertOptions,
    resolver: Option<&'r dyn ImageResolver>,
    base_path: Option<PathBuf>,
}

impl<'r> Converter<'r> {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            resolver: None,
            base_path: None,
        }
    }

    pub fn with_resolver(mut self, resolver: &'r dyn ImageResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Directory that relative image paths are joined onto.
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    #[tracing::instrument(skip_all, fields(len = markup.len(), images = self.resolver.is_some()))]
    pub fn to_document(&self, markup: &str) -> Result<Vec<Block>, ConvertError> {
        let tree = tree::parse(markup, self.options.parser_options())?;
        let catalog = match self.resolver {
            Some(resolver) => ImageCatalog::build(&tree, resolver, self.base_path())?,
            None => ImageCatalog::default(),
        };
        let builder = BlockBuilder {
            options: &self.options,
            images: &catalog,
        };
        Ok(builder.document(&tree))
    }
}

/// Builds blocks from a parsed tree. Performs no I/O; images come from the
/// pre-resolved catalog.
struct BlockBuilder<'a> {
    options: &'a ConvertOptions,
    images: &'a ImageCatalog,
}

impl BlockBuilder<'_> {
    fn document(&self, tree: &Node) -> Vec<Block> {
        let mut blocks = Vec::new();
        for node in &tree.children {
            self.block(node, &mut blocks);
        }
        blocks
    }

    fn block(&self, node: &Node, blocks: &mut Vec<Block>) {
        match &node.kind {
            NodeKind::Heading(level) => {
                let run = self.flatten_text(&node.children);
                blocks.push(Block::Heading(Heading {
                    plaintext: run.text,
                    level: *level,
                    facets: run.facets,
                }));
            }
            NodeKind::Paragraph => self.paragraph(node, blocks),
            NodeKind::CodeBlock { language } => blocks.push(Block::Code(Code {
                plaintext: node.literal(),
                language: language.clone(),
                theme: self.options.code_theme.clone(),
            })),
            NodeKind::BlockQuote => {
                let run = self.quote_text(node);
                blocks.push(Block::Quote(Quote {
                    plaintext: run.text,
                    facets: run.facets,
                }));
            }
            NodeKind::List => blocks.push(Block::List(List {
                children: self.list_items(node),
            })),
            NodeKind::Rule => blocks.push(Block::Rule(HorizontalRule {})),
            NodeKind::Image { dest, .. } => {
                blocks.push(Block::Image(self.images.image_block(dest, alt_text(node))))
            }
            other => tracing::trace!(kind = ?other, "skipping unsupported top-level node"),
        }
    }

    /// Emits a paragraph, split around any images it contains.
    fn paragraph(&self, node: &Node, blocks: &mut Vec<Block>) {
        let mut flattener = InlineFlattener::new(self.images, ImageMode::Split);
        flattener.visit_all(&node.children);
        let runs = flattener.finish();
        let split = runs.iter().any(|run| matches!(run, InlineRun::Image(_)));

        for run in runs {
            match run {
                InlineRun::Image(image) => blocks.push(Block::Image(image)),
                InlineRun::Text(run) => {
                    let run = if split { run.trimmed() } else { Some(run) };
                    match run {
                        Some(run) if !run.is_blank() => {
                            blocks.push(Block::Paragraph(Paragraph::new(run.text, run.facets)))
                        }
                        _ => tracing::debug!("dropping empty paragraph"),
                    }
                }
            }
        }
    }

    fn flatten_text(&self, nodes: &[Node]) -> TextRun {
        let mut flattener = InlineFlattener::new(self.images, ImageMode::AltText);
        flattener.visit_all(nodes);
        flattener.finish_text()
    }

    /// Joins the block nodes of a quote, at any depth, with the configured
    /// separator.
    fn quote_text(&self, quote: &Node) -> TextRun {
        let mut flattener = InlineFlattener::new(self.images, ImageMode::AltText)
            .with_block_separator(&self.options.quote_line_separator);
        flattener.visit_all(&quote.children);
        flattener.finish_text()
    }

    fn list_items(&self, list: &Node) -> Vec<ListItem> {
        list.children
            .iter()
            .filter(|child| child.kind == NodeKind::Item)
            .map(|item| self.list_item(item))
            .collect()
    }

    fn list_item(&self, item: &Node) -> ListItem {
        let (nested, body): (Vec<&Node>, Vec<&Node>) = item
            .children
            .iter()
            .partition(|child| child.kind == NodeKind::List);

        ListItem {
            content: self.item_content(&body),
            children: nested
                .into_iter()
                .flat_map(|list| self.list_items(list))
                .collect(),
        }
    }

    fn item_content(&self, body: &[&Node]) -> ListItemContent {
        if let [heading] = body {
            if let NodeKind::Heading(level) = heading.kind {
                let run = self.flatten_text(&heading.children);
                return ListItemContent::Heading(Heading {
                    plaintext: run.text,
                    level,
                    facets: run.facets,
                });
            }
        }
        if let Some(image) = sole_image(body) {
            if let NodeKind::Image { dest, .. } = &image.kind {
                return ListItemContent::Image(self.images.image_block(dest, alt_text(image)));
            }
        }

        let mut flattener = InlineFlattener::new(self.images, ImageMode::AltText);
        flattener.visit_all(body.iter().copied());
        let run = flattener.finish_text();
        ListItemContent::Paragraph(Paragraph::new(run.text, run.facets))
    }
}

/// The image, when a list item holds nothing but a single image.
fn sole_image<'n>(body: &[&'n Node]) -> Option<&'n Node> {
    match body {
        [node] if matches!(node.kind, NodeKind::Image { .. }) => Some(*node),
        [node] if node.kind == NodeKind::Paragraph => match node.children.as_slice() {
            [image] if matches!(image.kind, NodeKind::Image { .. }) => Some(image),
            _ => None,
        },
        _ => None,
    }
}
