use crate::node::Node;
use std::path::Path;

const UNTITLED: &str = "Untitled";
const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Derives a page title from a file name.
///
/// `_`, `-` and `.` in the stem become spaces and each word is capitalized.
///
/// # Examples
///
/// ```
/// use html2asf::title_from_path;
/// use std::path::Path;
///
/// assert_eq!(title_from_path(Path::new("my_notes-v2.html")).as_deref(), Some("My Notes V2"));
/// ```
#[must_use]
pub fn title_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let title = stem
        .replace(['_', '-', '.'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    (!title.is_empty()).then_some(title)
}

/// Derives a page title from the first heading of a document.
///
/// Only ASCII alphanumerics and whitespace survive.
#[must_use]
pub fn title_from_document(root: &Node) -> Option<String> {
    let heading = root.find(&|n: &Node| n.tag().is_some_and(|t| HEADINGS.contains(&t)))?;
    let text: String = heading
        .text_content()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let text = text.trim();

    (!text.is_empty()).then(|| text.to_string())
}

/// Picks the page title: explicit override, then first heading, then the
/// source file name, then `"Untitled"`.
#[must_use]
pub fn page_title(explicit: Option<&str>, root: &Node, source: Option<&Path>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| title_from_document(root))
        .or_else(|| source.and_then(title_from_path))
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}
