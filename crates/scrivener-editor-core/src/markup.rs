//! Markup codec for the content tree.
//!
//! History snapshots store the surface content as serialized markup. This
//! module converts between that markup and a [`ContentTree`]. The parser is
//! tolerant in the way an editable surface has to be: unclosed tags are closed
//! at the end of input, stray end tags are ignored, and `<br>` becomes the
//! atomic line-break marker.

use smol_str::SmolStr;

use crate::tree::{ContentTree, NodeId, NodeKind, Visibility};

/// Elements that never have children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// Parse markup into a fresh tree.
pub fn parse(markup: &str) -> ContentTree {
    let mut tree = ContentTree::new();
    parse_into(&mut tree, markup);
    tree
}

/// Replace the contents of `tree` with the parsed markup.
///
/// Every id previously issued by `tree` (other than the root) becomes stale.
pub fn parse_into(tree: &mut ContentTree, markup: &str) {
    tree.clear();
    let mut stack: Vec<(SmolStr, NodeId)> = vec![(SmolStr::default(), tree.root())];
    let mut rest = markup;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            push_text(tree, current(&stack), rest);
            break;
        };
        if lt > 0 {
            push_text(tree, current(&stack), &rest[..lt]);
        }
        rest = &rest[lt..];

        if let Some(comment) = rest.strip_prefix("<!--") {
            rest = match comment.find("-->") {
                Some(end) => &comment[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(gt) = rest.find('>') else {
            // No closing bracket: the remainder is literal text.
            push_text(tree, current(&stack), rest);
            break;
        };
        let source = &rest[..=gt];
        let inner = &rest[1..gt];
        rest = &rest[gt + 1..];

        if let Some(name) = inner.strip_prefix('/') {
            let name = name.trim().to_ascii_lowercase();
            match stack.iter().rposition(|(tag, _)| tag.as_str() == name) {
                Some(pos) if pos > 0 => stack.truncate(pos),
                _ => tracing::trace!(target: "scrivener::markup", tag = %name, "ignoring stray end tag"),
            }
            continue;
        }
        if inner.starts_with('!') || inner.starts_with('?') {
            continue;
        }

        let self_closing = inner.trim_end().ends_with('/');
        let inner = inner.trim_end().trim_end_matches('/');
        let name_end = inner
            .find(|c: char| c.is_whitespace())
            .unwrap_or(inner.len());
        let tag = inner[..name_end].to_ascii_lowercase();
        if !tag.starts_with(|c: char| c.is_ascii_alphabetic()) {
            // Not a tag: `1 < 2 > 0`, `<3>`.
            push_text(tree, current(&stack), source);
            continue;
        }
        let parent = current(&stack);

        if tag == "br" {
            let _ = tree.append_child(parent, NodeKind::LineBreak);
            continue;
        }

        let attrs = parse_attrs(&inner[name_end..]);
        let visibility = if attrs_imply_hidden(&attrs) {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
        let tag = SmolStr::new(tag);
        let kind = NodeKind::Element {
            tag: tag.clone(),
            attrs,
            visibility,
        };
        let Ok(id) = tree.append_child(parent, kind) else {
            continue;
        };
        if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
            stack.push((tag, id));
        }
    }
}

fn current(stack: &[(SmolStr, NodeId)]) -> NodeId {
    stack[stack.len() - 1].1
}

/// Append decoded text to `parent`, merging with a trailing text sibling.
fn push_text(tree: &mut ContentTree, parent: NodeId, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let decoded = html_escape::decode_html_entities(raw);
    let last = tree
        .children(parent)
        .ok()
        .and_then(|children| children.last().copied());
    if let Some(last) = last {
        if let Ok(text) = tree.text_mut(last) {
            text.push_str(&decoded);
            return;
        }
    }
    let _ = tree.append_child(parent, NodeKind::text(decoded.into_owned()));
}

fn parse_attrs(s: &str) -> Vec<(SmolStr, String)> {
    let mut attrs = Vec::new();
    let mut chars = s.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut name_end = s.len();
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' {
                name_end = i;
                break;
            }
            chars.next();
        }
        let name = SmolStr::new(s[start..name_end].to_ascii_lowercase());

        while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
            chars.next();
        }
        if !matches!(chars.peek(), Some((_, '='))) {
            attrs.push((name, String::new()));
            continue;
        }
        chars.next();
        while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
            chars.next();
        }

        let value = match chars.peek().copied() {
            Some((i, quote @ ('"' | '\''))) => {
                chars.next();
                let value_start = i + 1;
                let mut value_end = s.len();
                for (j, c) in chars.by_ref() {
                    if c == quote {
                        value_end = j;
                        break;
                    }
                }
                &s[value_start..value_end]
            }
            Some((i, _)) => {
                let mut value_end = s.len();
                while let Some(&(j, c)) = chars.peek() {
                    if c.is_whitespace() {
                        value_end = j;
                        break;
                    }
                    chars.next();
                }
                &s[i..value_end]
            }
            None => "",
        };
        attrs.push((name, html_escape::decode_html_entities(value).into_owned()));
    }
    attrs
}

/// Whether the attributes hide the element (`hidden`, `display:none`,
/// `visibility:hidden`).
pub fn attrs_imply_hidden(attrs: &[(SmolStr, String)]) -> bool {
    attrs.iter().any(|(name, value)| match name.as_str() {
        "hidden" => true,
        "style" => {
            let style: String = value
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            style
                .split(';')
                .any(|decl| decl == "display:none" || decl == "visibility:hidden")
        }
        _ => false,
    })
}

/// Serialize the root's children (the "inner markup" of the surface).
pub fn serialize(tree: &ContentTree) -> String {
    let mut out = String::new();
    if let Ok(children) = tree.children(tree.root()) {
        for child in children {
            write_node(tree, *child, &mut out);
        }
    }
    out
}

fn write_node(tree: &ContentTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.kind {
        NodeKind::Text(s) => out.push_str(&html_escape::encode_text(s)),
        NodeKind::LineBreak => out.push_str("<br>"),
        NodeKind::Element {
            tag,
            attrs,
            visibility,
        } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            if *visibility == Visibility::Hidden && !attrs_imply_hidden(attrs) {
                out.push_str(" hidden");
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }
            for child in node.children() {
                write_node(tree, *child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

/// Plain-text projection of markup, as handed to the spell checker.
pub fn to_plain_text(markup: &str) -> String {
    parse(markup).plain_text()
}
