//! HTML fragments as returned in article bodies.
//!
//! Parsing applies an allowlist: elements not on it are unwrapped (their
//! content kept), script-like elements are dropped with their content,
//! comments and unlisted attributes are discarded. The result is a small
//! tree that serializes back to well-formed markup.

use salt_core::document::DocumentNode;

/// Elements whose content is never text to display.
const DROP_WITH_CONTENT: &[&str] = &["script", "style", "textarea", "option", "noscript"];

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set `name`, replacing an existing value.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn is_void(&self) -> bool {
        VOID.contains(&self.name.as_str())
    }
}

impl DocumentNode for Node {
    fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    fn children_mut(&mut self) -> &mut [Self] {
        match self {
            Node::Text(_) => &mut [],
            Node::Element(e) => &mut e.children,
        }
    }
}

/// Which elements and attributes survive parsing.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    pub tags: Vec<String>,
    pub attributes: Vec<String>,
}

impl Allowlist {
    pub fn new<T: AsRef<str>, A: AsRef<str>>(tags: &[T], attributes: &[A]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.as_ref().to_ascii_lowercase()).collect(),
            attributes: attributes
                .iter()
                .map(|a| a.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    fn allows_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    fn allows_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

/// A parsed, sanitized fragment: a forest of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub children: Vec<Node>,
}

impl Fragment {
    pub fn parse(html: &str, allow: &Allowlist) -> Self {
        Parser::new(html, allow).run()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            write_node(&mut out, node);
        }
        out
    }

    /// All text content, in document order.
    pub fn text(&self) -> String {
        fn collect(nodes: &[Node], out: &mut String) {
            for node in nodes {
                match node {
                    Node::Text(t) => out.push_str(t),
                    Node::Element(e) => collect(&e.children, out),
                }
            }
        }
        let mut out = String::new();
        collect(&self.children, &mut out);
        out
    }
}

struct Parser<'a> {
    rest: &'a str,
    allow: &'a Allowlist,
    /// Open allowed elements; the bottom entry is the fragment root.
    stack: Vec<Element>,
    /// Names of open elements that were unwrapped, with the depth of
    /// `stack` when they opened.
    unwrapped: Vec<(String, usize)>,
}

impl<'a> Parser<'a> {
    fn new(html: &'a str, allow: &'a Allowlist) -> Self {
        Self {
            rest: html,
            allow,
            stack: vec![Element::new("")],
            unwrapped: Vec::new(),
        }
    }

    fn run(mut self) -> Fragment {
        while !self.rest.is_empty() {
            if let Some(after) = self.rest.strip_prefix("<!--") {
                self.rest = after.find("-->").map_or("", |i| &after[i + 3..]);
            } else if self.rest.starts_with("<!") || self.rest.starts_with("<?") {
                self.skip_past('>');
            } else if let Some(after) = self.rest.strip_prefix("</") {
                if after.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    self.rest = after;
                    self.end_tag();
                } else {
                    self.text_until_tag(2);
                }
            } else if self.rest.starts_with('<')
                && self.rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                self.rest = &self.rest[1..];
                self.start_tag();
            } else {
                self.text_until_tag(0);
            }
        }
        while self.stack.len() > 1 {
            self.close_top();
        }
        Fragment {
            children: self.stack.pop().map(|root| root.children).unwrap_or_default(),
        }
    }

    fn skip_past(&mut self, c: char) {
        self.rest = self.rest.find(c).map_or("", |i| &self.rest[i + c.len_utf8()..]);
    }

    /// Consume text up to the next `<` at or after byte `from`.
    fn text_until_tag(&mut self, from: usize) {
        let end = self.rest[from..].find('<').map_or(self.rest.len(), |i| i + from);
        let end = if end == 0 { 1 } else { end };
        let (raw, rest) = self.rest.split_at(end);
        self.rest = rest;
        self.push_text(&decode_entities(raw));
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        match top.children.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(text),
            _ => top.children.push(Node::Text(text.to_string())),
        }
    }

    fn tag_name(&mut self) -> String {
        let end = self
            .rest
            .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
            .unwrap_or(self.rest.len());
        let (name, rest) = self.rest.split_at(end);
        self.rest = rest;
        name.to_ascii_lowercase()
    }

    fn start_tag(&mut self) {
        let name = self.tag_name();
        let (attrs, self_closing) = self.attributes();

        if DROP_WITH_CONTENT.contains(&name.as_str()) {
            if !self_closing {
                self.skip_raw_text(&name);
            }
            return;
        }
        let void = VOID.contains(&name.as_str());
        if !self.allow.allows_tag(&name) {
            if !void && !self_closing {
                self.unwrapped.push((name, self.stack.len()));
            }
            return;
        }

        let mut element = Element::new(&name);
        element.attrs = attrs
            .into_iter()
            .filter(|(k, _)| self.allow.allows_attribute(k))
            .collect();
        if void || self_closing {
            if let Some(top) = self.stack.last_mut() {
                top.children.push(Node::Element(element));
            }
        } else {
            self.stack.push(element);
        }
    }

    /// Parse attributes up to and including `>`.
    fn attributes(&mut self) -> (Vec<(String, String)>, bool) {
        let mut attrs: Vec<(String, String)> = Vec::new();
        loop {
            self.rest = self.rest.trim_start();
            if self.rest.is_empty() {
                return (attrs, false);
            }
            if let Some(rest) = self.rest.strip_prefix("/>") {
                self.rest = rest;
                return (attrs, true);
            }
            if let Some(rest) = self.rest.strip_prefix('>') {
                self.rest = rest;
                return (attrs, false);
            }
            if let Some(rest) = self.rest.strip_prefix('/') {
                self.rest = rest;
                continue;
            }
            let end = self
                .rest
                .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '>' || c == '/')
                .unwrap_or(self.rest.len());
            let name = self.rest[..end].to_ascii_lowercase();
            self.rest = self.rest[end..].trim_start();
            let value = match self.rest.strip_prefix('=') {
                Some(rest) => {
                    self.rest = rest.trim_start();
                    self.attribute_value()
                }
                None => String::new(),
            };
            if !name.is_empty() && !attrs.iter().any(|(k, _)| *k == name) {
                attrs.push((name, value));
            }
        }
    }

    fn attribute_value(&mut self) -> String {
        let quote = self.rest.chars().next().filter(|&c| c == '"' || c == '\'');
        let raw = match quote {
            Some(q) => {
                let body = &self.rest[1..];
                let end = body.find(q).unwrap_or(body.len());
                self.rest = body.get(end + 1..).unwrap_or("");
                &body[..end]
            }
            None => {
                let end = self
                    .rest
                    .find(|c: char| c.is_ascii_whitespace() || c == '>')
                    .unwrap_or(self.rest.len());
                let (value, rest) = self.rest.split_at(end);
                self.rest = rest;
                value
            }
        };
        decode_entities(raw)
    }

    /// Skip the content of `name` and its end tag.
    fn skip_raw_text(&mut self, name: &str) {
        let close = format!("</{name}");
        let lower = self.rest.to_ascii_lowercase();
        match lower.find(&close) {
            Some(i) => {
                self.rest = &self.rest[i + close.len()..];
                self.skip_past('>');
            }
            None => self.rest = "",
        }
    }

    fn end_tag(&mut self) {
        let name = self.tag_name();
        self.skip_past('>');

        if let Some(pos) = self.unwrapped.iter().rposition(|(n, _)| *n == name) {
            let (_, depth) = self.unwrapped[pos];
            // allowed elements opened inside the unwrapped one close with it
            while self.stack.len() > depth {
                self.close_top();
            }
            self.unwrapped.truncate(pos);
            return;
        }
        let Some(pos) = self.stack.iter().skip(1).rposition(|e| e.name == name) else {
            return;
        };
        while self.stack.len() > pos + 1 {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(element) = self.stack.pop() {
            let depth = self.stack.len();
            self.unwrapped.retain(|&(_, d)| d <= depth);
            if let Some(parent) = self.stack.last_mut() {
                parent.children.push(Node::Element(element));
            }
        }
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(t) => escape_into(out, t, false),
        Node::Element(e) => {
            out.push('<');
            out.push_str(&e.name);
            for (k, v) in &e.attrs {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                escape_into(out, v, true);
                out.push('"');
            }
            out.push('>');
            if e.is_void() {
                return;
            }
            for child in &e.children {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(&e.name);
            out.push('>');
        }
    }
}

fn escape_into(out: &mut String, s: &str, attribute: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Decode character references. Unknown named references stay as written.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        let decoded = rest[1..]
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_reference(&rest[1..=end]).map(|c| (c, end + 2)));
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code).filter(|&c| c != '\0');
    }
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow() -> Allowlist {
        Allowlist::new(
            &["div", "p", "span", "i", "b", "em", "strong", "sup", "sub", "br"],
            &["class"],
        )
    }

    fn clean(html: &str) -> String {
        Fragment::parse(html, &allow()).to_html()
    }

    #[test]
    fn allowed_markup_round_trips() {
        let html = r#"<div class="entry"><b>rāma</b> <i>m.</i><br><sup>1</sup></div>"#;
        assert_eq!(clean(html), html);
    }

    #[test]
    fn disallowed_tags_are_unwrapped() {
        assert_eq!(
            clean(r#"<div><a href="x">see <b>agni</b></a>.</div>"#),
            "<div>see <b>agni</b>.</div>"
        );
        assert_eq!(clean("<table><tr><td>x</td></tr></table>"), "x");
    }

    #[test]
    fn script_content_is_dropped() {
        assert_eq!(
            clean("<p>a<script>alert('<b>')</script>b<style>p{}</style></p>"),
            "<p>ab</p>"
        );
    }

    #[test]
    fn attributes_are_filtered() {
        assert_eq!(
            clean(r#"<span class="hw" onclick="x()" style='color:red'>y</span>"#),
            r#"<span class="hw">y</span>"#
        );
        assert_eq!(
            clean("<span class=sa title=\"t\">y</span>"),
            r#"<span class="sa">y</span>"#
        );
    }

    #[test]
    fn comments_and_doctype_are_dropped() {
        assert_eq!(clean("<!DOCTYPE html><!-- c --><p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn unclosed_and_stray_tags() {
        assert_eq!(clean("<div><b>x</div>y</b>"), "<div><b>x</b></div>y");
        assert_eq!(clean("<p>1 < 2</p>"), "<p>1 &lt; 2</p>");
        assert_eq!(clean("a</>b"), "a&lt;/&gt;b");
    }

    #[test]
    fn self_closing_and_void() {
        assert_eq!(clean("a<br/>b<br />c"), "a<br>b<br>c");
        assert_eq!(clean(r#"a<img src="x">b"#), "ab");
    }

    #[test]
    fn entities() {
        assert_eq!(decode_entities("&amp;&lt;&#2352;&#x930;&nbsp;&bogus;&"), "&<रर\u{a0}&bogus;&");
        assert_eq!(clean("<b>&quot;x&quot; &amp; y</b>"), "<b>\"x\" &amp; y</b>");
    }

    #[test]
    fn text_content() {
        let f = Fragment::parse("<div><b>rāma</b> m.</div>", &allow());
        assert_eq!(f.text(), "rāma m.");
    }

    #[test]
    fn element_attributes() {
        let mut e = Element::new("B");
        assert_eq!(e.name, "b");
        e.set_attr("data-script", "iso");
        e.set_attr("data-script", "deva");
        assert_eq!(e.attr("data-script"), Some("deva"));
        assert_eq!(e.attrs.len(), 1);
    }
}
