//! Owned markup tree built from the parser's event stream.
//!
//! The converter walks the tree more than once (image discovery, then block
//! construction), so events are folded into nodes up front.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::error::ConvertError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Document,
    Paragraph,
    Heading(u8),
    BlockQuote,
    CodeBlock { language: Option<String> },
    List,
    Item,
    Emphasis,
    Strong,
    Strikethrough,
    Link { dest: String },
    Image { dest: String, title: String },
    Text(String),
    Code(String),
    Html(String),
    SoftBreak,
    HardBreak,
    Rule,
    TaskListMarker(bool),
    Other,
}

impl NodeKind {
    fn from_tag(tag: Tag<'_>) -> Self {
        match tag {
            Tag::Paragraph => Self::Paragraph,
            Tag::Heading { level, .. } => Self::Heading(level as u8),
            Tag::BlockQuote(_) => Self::BlockQuote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => Self::CodeBlock {
                language: info
                    .split_whitespace()
                    .next()
                    .filter(|lang| !lang.is_empty())
                    .map(str::to_string),
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => Self::CodeBlock { language: None },
            Tag::List(_) => Self::List,
            Tag::Item => Self::Item,
            Tag::Emphasis => Self::Emphasis,
            Tag::Strong => Self::Strong,
            Tag::Strikethrough => Self::Strikethrough,
            Tag::Link { dest_url, .. } => Self::Link {
                dest: dest_url.into_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => Self::Image {
                dest: dest_url.into_string(),
                title: title.into_string(),
            },
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    /// Image references in document order, repeats included.
    pub fn image_references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_image_references(&mut refs);
        refs
    }

    fn collect_image_references<'a>(&'a self, refs: &mut Vec<&'a str>) {
        if let NodeKind::Image { dest, .. } = &self.kind {
            refs.push(dest.as_str());
        }
        for child in &self.children {
            child.collect_image_references(refs);
        }
    }

    pub fn first_text(&self) -> Option<&str> {
        self.children.iter().find_map(|child| match &child.kind {
            NodeKind::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Concatenated literal text of every descendant.
    pub fn literal(&self) -> String {
        let mut out = String::new();
        self.push_literal(&mut out);
        out
    }

    fn push_literal(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::Code(text) | NodeKind::Html(text) => {
                out.push_str(text)
            }
            _ => {
                for child in &self.children {
                    child.push_literal(out);
                }
            }
        }
    }
}

/// Parses `markup` into a tree rooted at a [`NodeKind::Document`] node.
pub(crate) fn parse(markup: &str, options: Options) -> Result<Node, ConvertError> {
    let mut stack = vec![Node::new(NodeKind::Document)];

    for (event, range) in Parser::new_ext(markup, options).into_offset_iter() {
        let leaf = match event {
            Event::Start(tag) => {
                stack.push(Node::new(NodeKind::from_tag(tag)));
                continue;
            }
            Event::End(_) => match stack.pop() {
                Some(node) if !stack.is_empty() => node,
                _ => return Err(unbalanced("closing a node that was never opened", range.start)),
            },
            Event::Text(text) => Node::new(NodeKind::Text(text.into_string())),
            Event::Code(code) => Node::new(NodeKind::Code(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => {
                Node::new(NodeKind::Html(html.into_string()))
            }
            Event::SoftBreak => Node::new(NodeKind::SoftBreak),
            Event::HardBreak => Node::new(NodeKind::HardBreak),
            Event::Rule => Node::new(NodeKind::Rule),
            Event::TaskListMarker(checked) => Node::new(NodeKind::TaskListMarker(checked)),
            _ => continue,
        };
        let Some(parent) = stack.last_mut() else {
            return Err(unbalanced("content outside the document", range.start));
        };
        parent.children.push(leaf);
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(document), true) => Ok(document),
        _ => Err(unbalanced("node left open at end of input", markup.len())),
    }
}

fn unbalanced(message: &str, offset: usize) -> ConvertError {
    ConvertError::MarkupParse {
        message: message.to_string(),
        offset,
    }
}
