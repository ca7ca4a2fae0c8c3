//! Tag rule table for the HTML to ASF transcoder.
//!
//! Every supported tag maps to exactly one [`Rule`]. Tags missing from the
//! table fall back to [`Rule::Unwrap`]. Adding a tag is a single entry in
//! [`RULES`].

use crate::node::Attributes;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Inner text of anchors injected as heading permalinks by notebook and doc
/// renderers. The second entry is the same pilcrow read back as Latin-1.
const ANCHOR_DECORATIONS: &[&str] = &["¶", "Â¶"];

/// Paragraph alignments Confluence keeps.
const KEPT_ALIGNMENTS: &[&str] = &["center", "right"];

/// Rewrite of a single element given its already converted children.
#[derive(Clone, Copy)]
pub(crate) enum Rule {
    /// `<name>inner</name>` under a fixed, possibly normalized, name.
    Wrap(&'static str),
    /// Self-closing `<name />`; children are discarded.
    Void(&'static str),
    /// Rule-specific rewrite of `(attributes, inner)`.
    Rewrite(fn(&Attributes, String) -> String),
    /// Drops the wrapper and keeps the converted children.
    Unwrap,
}

impl Rule {
    /// Applies the rule to an element's attributes and converted children.
    pub(crate) fn apply(self, attrs: &Attributes, inner: String) -> String {
        match self {
            Self::Wrap(name) => format!("<{name}>{inner}</{name}>"),
            Self::Void(name) => format!("<{name} />"),
            Self::Rewrite(rewrite) => rewrite(attrs, inner),
            Self::Unwrap => inner,
        }
    }
}

pub(crate) static RULES: Lazy<HashMap<&'static str, Rule>> = Lazy::new(|| {
    [
        ("p", Rule::Rewrite(paragraph)),
        ("h1", Rule::Wrap("h1")),
        ("h2", Rule::Wrap("h2")),
        ("h3", Rule::Wrap("h3")),
        ("h4", Rule::Wrap("h4")),
        ("h5", Rule::Wrap("h5")),
        ("h6", Rule::Wrap("h6")),
        ("strong", Rule::Wrap("strong")),
        ("b", Rule::Wrap("strong")),
        ("em", Rule::Wrap("em")),
        ("i", Rule::Wrap("em")),
        ("u", Rule::Wrap("u")),
        ("strike", Rule::Rewrite(strikethrough)),
        ("s", Rule::Rewrite(strikethrough)),
        ("sup", Rule::Wrap("sup")),
        ("sub", Rule::Wrap("sub")),
        ("code", Rule::Wrap("code")),
        ("pre", Rule::Wrap("pre")),
        ("small", Rule::Wrap("small")),
        ("big", Rule::Wrap("big")),
        ("blockquote", Rule::Rewrite(blockquote)),
        ("br", Rule::Void("br")),
        ("hr", Rule::Void("hr")),
        ("ul", Rule::Wrap("ul")),
        ("ol", Rule::Wrap("ol")),
        ("li", Rule::Wrap("li")),
        ("a", Rule::Rewrite(anchor)),
        ("img", Rule::Rewrite(image)),
        ("span", Rule::Rewrite(span)),
    ]
    .into_iter()
    .collect()
});

/// Looks up the rule for `tag`, falling back to [`Rule::Unwrap`].
pub(crate) fn rule_for(tag: &str) -> Rule {
    RULES.get(tag).copied().unwrap_or(Rule::Unwrap)
}

/// Returns true if `url` is treated as an external link or image source.
pub(crate) fn is_external(url: &str) -> bool {
    url.starts_with("http")
}

/// Returns true if `inner` is a heading permalink decoration.
pub(crate) fn is_anchor_decoration(inner: &str) -> bool {
    ANCHOR_DECORATIONS.contains(&inner)
}

fn paragraph(attrs: &Attributes, inner: String) -> String {
    match text_align(attrs.get_or_empty("style")) {
        Some(align) => format!(r#"<p style="text-align: {align}">{inner}</p>"#),
        None => format!("<p>{inner}</p>"),
    }
}

fn strikethrough(_: &Attributes, inner: String) -> String {
    format!(r#"<span style="text-decoration: line-through;">{inner}</span>"#)
}

fn blockquote(_: &Attributes, inner: String) -> String {
    format!("<blockquote><p>{inner}</p></blockquote>")
}

fn anchor(attrs: &Attributes, inner: String) -> String {
    if is_anchor_decoration(&inner) {
        return String::new();
    }

    let href = attrs.get_or_empty("href");
    if is_external(href) {
        return format!(r#"<a href="{}">{inner}</a>"#, escape_attr(href));
    }

    format!(
        concat!(
            r#"<ac:link><ri:page ri:content-title="{}"/>"#,
            "<ac:plain-text-link-body>{}</ac:plain-text-link-body></ac:link>"
        ),
        escape_attr(href),
        cdata(&inner)
    )
}

fn image(attrs: &Attributes, _: String) -> String {
    let src = attrs.get_or_empty("src");
    if is_external(src) {
        format!(r#"<ac:image><ri:url ri:value="{}"/></ac:image>"#, escape_attr(src))
    } else {
        format!(
            r#"<ac:image><ri:attachment ri:filename="{}"/></ac:image>"#,
            escape_attr(src)
        )
    }
}

fn span(attrs: &Attributes, inner: String) -> String {
    match color(attrs.get_or_empty("style")) {
        Some(color) => format!(r#"<span style="color: {}">{inner}</span>"#, escape_attr(color)),
        None => inner,
    }
}

/// Extracts a kept `text-align` value from an inline style.
fn text_align(style: &str) -> Option<&'static str> {
    let value = style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .find(|(property, _)| property.trim().eq_ignore_ascii_case("text-align"))
        .and_then(|(_, value)| value.split_whitespace().next())?;

    KEPT_ALIGNMENTS
        .iter()
        .copied()
        .find(|kept| kept.eq_ignore_ascii_case(value))
}

/// Extracts the value after the first `color:` in an inline style, up to the
/// next `;`. Empty values yield `None`.
fn color(style: &str) -> Option<&str> {
    let (_, rest) = style.split_once("color:")?;
    let value = rest.split(';').next().unwrap_or_default().trim();
    (!value.is_empty()).then_some(value)
}

fn escape_attr(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Wraps `text` in CDATA, splitting any embedded `]]>` terminator.
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_unknown_tag_falls_back_to_unwrap() {
        let out = rule_for("table").apply(&Attributes::new(), "cell".to_string());
        assert_eq!(out, "cell");
    }

    #[test]
    fn test_void_rules_discard_children() {
        let out = rule_for("br").apply(&Attributes::new(), "ignored".to_string());
        assert_eq!(out, "<br />");
    }

    #[test]
    fn test_text_align_extraction() {
        assert_eq!(text_align("text-align: center"), Some("center"));
        assert_eq!(text_align("color: red; text-align:right;"), Some("right"));
        assert_eq!(text_align("text-align: center !important"), Some("center"));
        assert_eq!(text_align("TEXT-ALIGN:  Right  "), Some("right"));
        assert_eq!(text_align("text-align: justify"), None);
        assert_eq!(text_align("text-align: centered"), None);
        assert_eq!(text_align("text-align"), None);
        assert_eq!(text_align(""), None);
    }

    #[test]
    fn test_color_extraction() {
        assert_eq!(color("color: red;"), Some("red"));
        assert_eq!(color("font-weight: bold; color:#ff0000"), Some("#ff0000"));
        assert_eq!(color("color:;"), None);
        assert_eq!(color("font-weight: bold"), None);
    }

    #[test]
    fn test_anchor_escapes_href() {
        let out = anchor(
            &attrs(&[("href", "https://example.com/?a=1&b=2")]),
            "Q".to_string(),
        );
        assert_eq!(out, r#"<a href="https://example.com/?a=1&amp;b=2">Q</a>"#);
    }

    #[test]
    fn test_anchor_mojibake_pilcrow() {
        let out = anchor(&attrs(&[("href", "#Intro")]), "Â¶".to_string());
        assert!(out.is_empty());
    }

    #[test]
    fn test_anchor_without_href_links_empty_title() {
        let out = anchor(&Attributes::new(), "Text".to_string());
        assert!(out.contains(r#"ri:content-title="""#));
    }

    #[test]
    fn test_cdata_splits_terminator() {
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn test_image_without_src_is_attachment() {
        let out = image(&Attributes::new(), String::new());
        assert_eq!(out, r#"<ac:image><ri:attachment ri:filename=""/></ac:image>"#);
    }
}
