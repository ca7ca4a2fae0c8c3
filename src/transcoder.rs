//! Recursive HTML to Atlassian Storage Format conversion.
//!
//! The walker is post-order: each element's children are converted and
//! concatenated in document order before the element's rule wraps them.
//! Text leaves are emitted verbatim.

use crate::node::{Element, Node};
use crate::parser::parse_html;
use crate::rules::{self, rule_for};
use serde::Serialize;

/// Per-conversion state threaded through the walker.
///
/// Rules never read it. The walker records the external references the
/// converted body depends on, so a caller can upload attachments or verify
/// that linked pages exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    attachments: Vec<String>,
    page_links: Vec<String>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attachment filenames referenced by images, in first-seen order.
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// Page titles referenced by internal links, in first-seen order.
    #[must_use]
    pub fn page_links(&self) -> &[String] {
        &self.page_links
    }

    fn record(&mut self, el: &Element, tag: &str, inner: &str) {
        match tag {
            "img" => {
                let src = el.attrs.get_or_empty("src");
                if !src.is_empty() && !rules::is_external(src) {
                    push_unique(&mut self.attachments, src);
                }
            }
            "a" => {
                let href = el.attrs.get_or_empty("href");
                if !href.is_empty() && !rules::is_external(href) && !rules::is_anchor_decoration(inner) {
                    push_unique(&mut self.page_links, href);
                }
            }
            _ => {}
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Result of converting a whole HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// ASF markup, usable as a `storage` representation page body
    pub body: String,

    /// Attachment filenames the body references
    pub attachments: Vec<String>,

    /// Internal page titles the body links to
    pub page_links: Vec<String>,
}

/// Converts a node and its subtree into ASF markup.
///
/// # Examples
///
/// ```
/// use html2asf::{html_to_asf, Attributes, Context, Node};
///
/// let node = Node::element("b", Attributes::new(), vec![Node::text("X")]);
/// assert_eq!(html_to_asf(&node, &mut Context::new()), "<strong>X</strong>");
/// ```
pub fn html_to_asf(node: &Node, ctx: &mut Context) -> String {
    let el = match node {
        Node::Text(text) => return text.clone(),
        Node::Element(el) => el,
    };

    let inner: String = el.children.iter().map(|c| html_to_asf(c, ctx)).collect();

    let Some(tag) = el.tag.as_deref() else {
        return inner;
    };

    ctx.record(el, tag, &inner);
    rule_for(tag).apply(&el.attrs, inner)
}

/// Parses `html` and converts it to an ASF string.
///
/// # Examples
///
/// ```
/// use html2asf::convert_html_str_to_asf;
///
/// let asf = convert_html_str_to_asf(r#"<p style="text-align: center">Hi<br></p>"#);
/// assert_eq!(asf, r#"<p style="text-align: center">Hi<br /></p>"#);
/// ```
#[must_use]
pub fn convert_html_str_to_asf(html: &str) -> String {
    html_to_asf(&parse_html(html), &mut Context::new())
}

/// Returns the `body` element of a parsed document, or `root` itself when
/// there is none.
///
/// Page content lives in `body`; `head` holds the title, stylesheets and
/// scripts of an export, none of which belong in the page.
pub(crate) fn content_root(root: &Node) -> &Node {
    root.find(&|n: &Node| n.tag() == Some("body")).unwrap_or(root)
}

/// Parses `html` and converts its body, returning the markup together with
/// the references collected along the way.
///
/// Unlike [`convert_html_str_to_asf`], which walks the whole parsed tree,
/// this skips the document `head`.
#[must_use]
pub fn convert_document(html: &str) -> Conversion {
    let root = parse_html(html);
    let mut ctx = Context::new();
    let body = html_to_asf(content_root(&root), &mut ctx);

    Conversion {
        body,
        attachments: ctx.attachments,
        page_links: ctx.page_links,
    }
}
