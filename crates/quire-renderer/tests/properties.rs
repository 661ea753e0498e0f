use proptest::prelude::*;
use quire_api::{Block, Facet, ListItem, ListItemContent};
use quire_renderer::{to_document, to_markup};

fn inline_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}",
        "[a-zé ]{1,8}".prop_map(|s| format!("**{s}**")),
        "[a-z]{1,8}".prop_map(|s| format!("*{s}*")),
        "[a-z]{1,8}".prop_map(|s| format!("`{s}`")),
        "[a-z]{1,8}".prop_map(|s| format!("~~{s}~~")),
        "[a-z]{1,8}".prop_map(|s| format!("[{s}](https://example.com/{s})")),
        "[a-z]{1,8}".prop_map(|s| format!("![{s}]({s}.png)")),
        Just("  ".to_string()),
        Just("ü".to_string()),
    ]
}

fn line() -> impl Strategy<Value = String> {
    prop::collection::vec(inline_fragment(), 1..6).prop_map(|parts| parts.join(" "))
}

fn block_markup() -> impl Strategy<Value = String> {
    prop_oneof![
        line(),
        (1..=6usize, line()).prop_map(|(level, text)| format!("{} {text}", "#".repeat(level))),
        line().prop_map(|text| format!("> {text}")),
        prop::collection::vec(line(), 1..4)
            .prop_map(|items| items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n")),
        "[a-z ]{0,20}".prop_map(|code| format!("```\n{code}\n```")),
        Just("---".to_string()),
    ]
}

fn document_markup() -> impl Strategy<Value = String> {
    prop::collection::vec(block_markup(), 0..6).prop_map(|blocks| blocks.join("\n\n"))
}

fn assert_facets_valid(text: &str, facets: &[Facet]) {
    for facet in facets {
        let range = facet.index;
        assert!(range.start() < range.end(), "empty facet {range:?} over {text:?}");
        assert!(range.fits(text.len()), "facet {range:?} exceeds {text:?}");
        assert!(text.is_char_boundary(range.start()));
        assert!(text.is_char_boundary(range.end()));
        assert!(!facet.features.is_empty());
    }
}

fn check_item(item: &ListItem) {
    match &item.content {
        ListItemContent::Paragraph(p) => assert_facets_valid(&p.plaintext, &p.facets),
        ListItemContent::Heading(h) => assert_facets_valid(&h.plaintext, &h.facets),
        _ => {}
    }
    item.children.iter().for_each(check_item);
}

proptest! {
    #[test]
    fn facets_stay_within_plaintext(markup in document_markup()) {
        for block in to_document(&markup).unwrap() {
            match &block {
                Block::Paragraph(p) => {
                    prop_assert!(!p.plaintext.trim().is_empty(), "blank paragraph from {markup:?}");
                    assert_facets_valid(&p.plaintext, &p.facets);
                }
                Block::Heading(h) => {
                    prop_assert!((1..=6).contains(&h.level));
                    assert_facets_valid(&h.plaintext, &h.facets);
                }
                Block::Quote(q) => assert_facets_valid(&q.plaintext, &q.facets),
                Block::List(list) => list.children.iter().for_each(check_item),
                _ => {}
            }
        }
    }

    #[test]
    fn converted_documents_render_back(markup in document_markup()) {
        let blocks = to_document(&markup).unwrap();
        let rendered = to_markup(&blocks).unwrap();
        prop_assert_eq!(rendered.is_empty(), blocks.is_empty());
    }
}
