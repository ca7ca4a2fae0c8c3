//! Behaviour of the HTML to storage format conversion through the public API.

use html2asf::{convert_document, convert_html_str_to_asf, html_to_asf, Attributes, Context, Node};

fn convert(html: &str) -> String {
    convert_html_str_to_asf(html)
}

#[test]
fn test_text_leaf_identity() {
    let mut ctx = Context::new();
    assert_eq!(html_to_asf(&Node::text("5 < 6 & 7"), &mut ctx), "5 < 6 & 7");
}

#[test]
fn test_plain_text_document() {
    assert_eq!(convert("just text"), "just text");
}

#[test]
fn test_preserved_tags() {
    for tag in [
        "h1", "h2", "h3", "h4", "h5", "h6", "sup", "sub", "code", "pre", "small", "big",
    ] {
        assert_eq!(convert(&format!("<{tag}>in</{tag}>")), format!("<{tag}>in</{tag}>"));
    }
    assert_eq!(convert("<ul><li>a</li></ul>"), "<ul><li>a</li></ul>");
    assert_eq!(convert("<ol><li>a</li></ol>"), "<ol><li>a</li></ol>");
}

#[test]
fn test_bold_synonyms() {
    assert_eq!(convert("<strong>X</strong>"), "<strong>X</strong>");
    assert_eq!(convert("<b>X</b>"), "<strong>X</strong>");
}

#[test]
fn test_italic_synonyms() {
    assert_eq!(convert("<em>X</em>"), "<em>X</em>");
    assert_eq!(convert("<i>X</i>"), "<em>X</em>");
}

#[test]
fn test_underline_and_strike() {
    assert_eq!(convert("<u>X</u>"), "<u>X</u>");
    assert_eq!(
        convert("<s>X</s>"),
        r#"<span style="text-decoration: line-through;">X</span>"#
    );
}

#[test]
fn test_self_closing() {
    assert_eq!(convert("<br>"), "<br />");
    assert_eq!(convert(r#"<br class="x">"#), "<br />");
    assert_eq!(convert("<hr>"), "<hr />");
    assert_eq!(convert(r#"<hr style="border: 0">"#), "<hr />");
}

#[test]
fn test_pilcrow_anchor_suppressed() {
    assert_eq!(convert(r#"<a href="¶">¶</a>"#), "");
    assert_eq!(
        convert(r##"<h2>Intro<a class="anchor-link" href="#Intro">&#182;</a></h2>"##),
        "<h2>Intro</h2>"
    );
}

#[test]
fn test_external_link() {
    assert_eq!(
        convert(r#"<a href="https://example.com">Link</a>"#),
        r#"<a href="https://example.com">Link</a>"#
    );
}

#[test]
fn test_internal_page_link() {
    let out = convert(r#"<a href="Internal Page">Link</a>"#);

    assert!(out.contains(r#"ri:content-title="Internal Page""#));
    assert!(out.contains("<![CDATA[Link]]>"));
    assert_eq!(
        out,
        concat!(
            r#"<ac:link><ri:page ri:content-title="Internal Page"/>"#,
            "<ac:plain-text-link-body><![CDATA[Link]]></ac:plain-text-link-body></ac:link>"
        )
    );
}

#[test]
fn test_images() {
    assert_eq!(
        convert(r#"<img src="https://x.com/a.png">"#),
        r#"<ac:image><ri:url ri:value="https://x.com/a.png"/></ac:image>"#
    );
    assert_eq!(
        convert(r#"<img src="diagram.png">"#),
        r#"<ac:image><ri:attachment ri:filename="diagram.png"/></ac:image>"#
    );
}

#[test]
fn test_span_color() {
    assert_eq!(
        convert(r#"<span style="color: red;">X</span>"#),
        r#"<span style="color: red">X</span>"#
    );
    assert_eq!(convert("<span>X</span>"), "X");
    assert_eq!(convert(r#"<span style="font-weight: bold">X</span>"#), "X");
}

#[test]
fn test_paragraph_alignment() {
    assert_eq!(
        convert(r#"<p style="text-align: center">X</p>"#),
        r#"<p style="text-align: center">X</p>"#
    );
    assert_eq!(
        convert(r#"<p style="text-align: right">X</p>"#),
        r#"<p style="text-align: right">X</p>"#
    );
    assert_eq!(convert("<p>X</p>"), "<p>X</p>");
    assert_eq!(convert(r#"<p style="text-align: justify">X</p>"#), "<p>X</p>");
}

#[test]
fn test_blockquote_single_paragraph() {
    assert_eq!(
        convert("<blockquote>A<br>B</blockquote>"),
        "<blockquote><p>A<br />B</p></blockquote>"
    );
}

#[test]
fn test_nesting_composes() {
    assert_eq!(
        convert("<p><strong><em>X</em></strong></p>"),
        "<p><strong><em>X</em></strong></p>"
    );
}

#[test]
fn test_unknown_tags_flattened() {
    assert_eq!(
        convert("<div><section><p>A</p></section></div>"),
        "<p>A</p>"
    );
    assert_eq!(
        convert("<table><tr><td>1</td><td>2</td></tr></table>"),
        "12"
    );
}

#[test]
fn test_hand_built_tree() {
    let attrs: Attributes = [("style", "color: blue")].into_iter().collect();
    let tree = Node::fragment(vec![
        Node::element("span", attrs, vec![Node::text("blue")]),
        Node::element("i", Attributes::new(), vec![Node::text("it")]),
    ]);

    assert_eq!(
        html_to_asf(&tree, &mut Context::new()),
        r#"<span style="color: blue">blue</span><em>it</em>"#
    );
}

#[test]
fn test_convert_document_references() {
    let doc = convert_document(concat!(
        r#"<img src="diagram.png"><img src="diagram.png">"#,
        r#"<a href="Design Notes">notes</a><a href="https://example.com">web</a>"#,
    ));

    assert_eq!(doc.attachments, vec!["diagram.png".to_string()]);
    assert_eq!(doc.page_links, vec!["Design Notes".to_string()]);
}
