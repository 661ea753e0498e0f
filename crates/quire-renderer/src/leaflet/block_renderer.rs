//! HTML preview of linear-document blocks.

use std::fmt::Write;

use quire_api::{
    Block, Code, Facet, Heading, Image, List, ListItem, ListItemContent, Paragraph, Quote,
};

use crate::facet::{escape_html, render_faceted_html};

pub fn to_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"leaflet-document\">");

    for block in blocks {
        render_block(&mut html, block);
    }

    html.push_str("</div>");
    html
}

pub fn render_block(html: &mut String, block: &Block) {
    match block {
        Block::Paragraph(text) => render_text_block(html, text),
        Block::Heading(header) => render_header_block(html, header),
        Block::Quote(quote) => render_blockquote_block(html, quote),
        Block::Code(code) => render_code_block(html, code),
        Block::List(list) => render_unordered_list(html, list),
        Block::Image(image) => render_image_block(html, image),
        Block::Rule(_) => html.push_str("<hr />\n"),
        Block::Unknown(data) => {
            let _ = writeln!(
                html,
                "<div class=\"embed-unknown\">[Unknown block: {}]</div>",
                escaped(data.type_discriminator())
            );
        }
    }
}

fn render_text_block(html: &mut String, text: &Paragraph) {
    html.push_str("<p class=\"leaflet-text\">");
    html.push_str(&render_faceted_text(&text.plaintext, &text.facets));
    html.push_str("</p>\n");
}

fn render_header_block(html: &mut String, header: &Heading) {
    let level = header.level.clamp(1, 6);
    let _ = write!(html, "<h{}>", level);
    html.push_str(&render_faceted_text(&header.plaintext, &header.facets));
    let _ = writeln!(html, "</h{}>", level);
}

fn render_blockquote_block(html: &mut String, quote: &Quote) {
    html.push_str("<blockquote>");
    let text = render_faceted_text(&quote.plaintext, &quote.facets);
    html.push_str(&text.replace('\n', "<br />\n"));
    html.push_str("</blockquote>\n");
}

fn render_code_block(html: &mut String, code: &Code) {
    match code.language.as_deref().filter(|lang| !lang.is_empty()) {
        Some(lang) => {
            let _ = write!(html, "<pre><code class=\"language-{}\">", escaped(lang));
        }
        None => html.push_str("<pre><code>"),
    }
    html.push_str(&escaped(&code.plaintext));
    html.push_str("</code></pre>\n");
}

fn render_unordered_list(html: &mut String, list: &List) {
    html.push_str("<ul>\n");
    for item in &list.children {
        render_list_item(html, item);
    }
    html.push_str("</ul>\n");
}

fn render_list_item(html: &mut String, item: &ListItem) {
    html.push_str("<li>");
    match &item.content {
        ListItemContent::Paragraph(text) => {
            html.push_str(&render_faceted_text(&text.plaintext, &text.facets));
        }
        ListItemContent::Heading(header) => {
            html.push_str("<strong>");
            html.push_str(&render_faceted_text(&header.plaintext, &header.facets));
            html.push_str("</strong>");
        }
        ListItemContent::Image(image) => render_image(html, image),
        ListItemContent::Unknown(data) => {
            let _ = write!(html, "[Unknown: {}]", escaped(data.type_discriminator()));
        }
    }
    if !item.children.is_empty() {
        html.push('\n');
        html.push_str("<ul>\n");
        for child in &item.children {
            render_list_item(html, child);
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</li>\n");
}

fn render_image_block(html: &mut String, image: &Image) {
    html.push_str("<figure>");
    render_image(html, image);
    html.push_str("</figure>\n");
}

fn render_image(html: &mut String, image: &Image) {
    let src = if image.image.reference.is_placeholder() {
        String::new()
    } else {
        format!("blob:{}", image.image.reference)
    };
    let _ = write!(
        html,
        "<img src=\"{}\" alt=\"{}\" width=\"{}\" height=\"{}\" />",
        escaped(&src),
        escaped(image.alt.as_deref().unwrap_or_default()),
        image.aspect_ratio.width,
        image.aspect_ratio.height
    );
}

fn render_faceted_text(text: &str, facets: &[Facet]) -> String {
    render_faceted_html(text, facets).unwrap_or_else(|_| escaped(text))
}

fn escaped(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = escape_html(&mut out, text);
    out
}
