//! Linear-document blocks back to markdown.

use quire_api::{
    Block, Code, Facet, Heading, Image, List, ListItem, ListItemContent, Paragraph, Quote,
};

use crate::error::ConvertError;
use crate::facet::render_faceted_markdown;

/// Link target for images. The document only keeps a blob identity, so the
/// original path or URL cannot be recovered.
pub const PLACEHOLDER_IMAGE_TARGET: &str = "placeholder";

/// Renders blocks as markdown, separated by blank lines.
pub fn to_markup(blocks: &[Block]) -> Result<String, ConvertError> {
    let rendered = blocks
        .iter()
        .map(convert_block)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join("\n\n"))
}

pub fn convert_block(block: &Block) -> Result<String, ConvertError> {
    let mut md = String::new();

    match block {
        Block::Paragraph(text) => convert_text_block(&mut md, text),
        Block::Heading(header) => convert_header_block(&mut md, header),
        Block::Quote(quote) => convert_blockquote_block(&mut md, quote),
        Block::Code(code) => convert_code_block(&mut md, code),
        Block::List(list) => convert_unordered_list(&mut md, list)?,
        Block::Rule(_) => md.push_str("---"),
        Block::Image(image) => convert_image(&mut md, image),
        Block::Unknown(unknown) => {
            return Err(ConvertError::unsupported(unknown.type_discriminator()));
        }
    }

    Ok(md)
}

fn convert_text_block(md: &mut String, text: &Paragraph) {
    md.push_str(&render_faceted_text(&text.plaintext, &text.facets));
}

fn convert_header_block(md: &mut String, header: &Heading) {
    let level = header.level.clamp(1, 6) as usize;
    md.push_str(&"#".repeat(level));
    md.push(' ');
    md.push_str(&render_faceted_text(&header.plaintext, &header.facets));
}

fn convert_blockquote_block(md: &mut String, quote: &Quote) {
    let text = render_faceted_text(&quote.plaintext, &quote.facets);
    if text.is_empty() {
        md.push('>');
        return;
    }
    let quoted: Vec<String> = text.lines().map(|line| format!("> {line}")).collect();
    md.push_str(&quoted.join("\n"));
}

fn convert_code_block(md: &mut String, code: &Code) {
    md.push_str("```");
    if let Some(lang) = code.language.as_deref().filter(|lang| !lang.is_empty()) {
        md.push_str(lang);
    }
    md.push('\n');
    md.push_str(&code.plaintext);
    if !code.plaintext.ends_with('\n') {
        md.push('\n');
    }
    md.push_str("```");
}

fn convert_unordered_list(md: &mut String, list: &List) -> Result<(), ConvertError> {
    let mut lines = Vec::new();
    for item in &list.children {
        convert_list_item(&mut lines, item, 0)?;
    }
    md.push_str(&lines.join("\n"));
    Ok(())
}

fn convert_list_item(
    lines: &mut Vec<String>,
    item: &ListItem,
    indent: usize,
) -> Result<(), ConvertError> {
    let mut line = "  ".repeat(indent);
    line.push_str("- ");

    match &item.content {
        ListItemContent::Paragraph(text) => convert_text_block(&mut line, text),
        ListItemContent::Heading(header) => convert_header_block(&mut line, header),
        ListItemContent::Image(image) => convert_image(&mut line, image),
        ListItemContent::Unknown(unknown) => {
            return Err(ConvertError::unsupported(unknown.type_discriminator()));
        }
    }
    lines.push(line);

    for child in &item.children {
        convert_list_item(lines, child, indent + 1)?;
    }
    Ok(())
}

fn convert_image(md: &mut String, image: &Image) {
    md.push_str("![");
    if let Some(alt) = &image.alt {
        md.push_str(alt);
    }
    md.push_str("](");
    if image.image.reference.is_placeholder() {
        md.push_str(PLACEHOLDER_IMAGE_TARGET);
    } else {
        md.push_str("blob:");
        md.push_str(image.image.reference.as_str());
    }
    md.push(')');
}

fn render_faceted_text(text: &str, facets: &[Facet]) -> String {
    if facets.is_empty() {
        return text.to_string();
    }
    render_faceted_markdown(text, facets).unwrap_or_else(|_| text.to_string())
}
