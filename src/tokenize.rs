//! Tolerant element scanning over loosely structured markup.
//!
//! The input is not required to be well-formed XML. The scanner looks for
//! opening tags of one element name and hands each tag body to quick-xml's
//! HTML-mode attribute iterator, which accepts any attribute order, values
//! that span several lines, single or double quotes, unquoted values and
//! value-less attributes. A tag that never closes ends at the next `<` or at
//! the end of the input. Comments are skipped, except that `<!-- [TAG] -->`
//! markers can be tracked and attached to the fragments that follow them.

use std::borrow::Cow;

use quick_xml::escape::unescape;
use quick_xml::events::attributes::Attributes;

/// One attribute as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribute<'a> {
    pub name: &'a str,
    /// Entity-decoded value (raw text if decoding failed)
    pub value: Cow<'a, str>,
}

/// The attribute list of one located element.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment<'a> {
    /// Byte offset of the opening `<`
    pub offset: usize,
    pub attributes: Vec<RawAttribute<'a>>,
    /// Text of the most recent `<!-- [TAG] -->` marker, if tracked
    pub marker: Option<&'a str>,
}

impl Fragment<'_> {
    /// Get an attribute value by name. The first occurrence wins.
    ///
    /// A prefixed name (`inkscape:label`) must match exactly. An unprefixed
    /// name also matches a prefixed attribute with that local name, but only
    /// when no attribute carries the exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let exact = self.attributes.iter().find(|a| a.name == name);
        let found = match exact {
            Some(attr) => Some(attr),
            None if !name.contains(':') => {
                self.attributes.iter().find(|a| local_name(a.name) == name)
            }
            None => None,
        };
        found.map(|a| &*a.value)
    }
}

/// Where the tag being read stops.
struct TagEnd {
    /// End of the attribute text, before any `/>` or `>`
    body: usize,
    /// Where scanning resumes
    resume: usize,
    /// Offset of a quote that was never closed
    open_quote: Option<usize>,
}

/// Single forward scan producing one [`Fragment`] per element tag.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    element: &'a str,
    track_markers: bool,
    marker: Option<&'a str>,
}

impl<'a> Tokenizer<'a> {
    /// Scan for `<path>` elements.
    pub fn new(input: &'a str) -> Self {
        Self::for_element(input, "path")
    }

    /// Scan for elements with the given local name.
    pub fn for_element(input: &'a str, element: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            element,
            track_markers: false,
            marker: None,
        }
    }

    /// Attach `<!-- [TAG] -->` comment markers to subsequent fragments.
    pub fn with_markers(mut self, enabled: bool) -> Self {
        self.track_markers = enabled;
        self
    }

    fn skip_comment(&mut self, start: usize) {
        let body_start = start + "<!--".len();
        let (body, next) = match self.input[body_start..].find("-->") {
            Some(end) => (
                &self.input[body_start..body_start + end],
                body_start + end + "-->".len(),
            ),
            None => (&self.input[body_start..], self.input.len()),
        };
        self.pos = next;

        if self.track_markers {
            if let Some(marker) = parse_marker(body) {
                self.marker = Some(marker);
            }
        }
    }

    /// Find the end of the tag whose attributes start at `self.pos`.
    /// A `>` inside a quoted value does not end the tag.
    fn find_tag_end(&self) -> TagEnd {
        let bytes = self.input.as_bytes();
        let mut i = self.pos;
        while let Some(&b) = bytes.get(i) {
            match b {
                b'>' => {
                    let self_closing = i > self.pos && bytes[i - 1] == b'/';
                    let body = if self_closing { i - 1 } else { i };
                    return TagEnd {
                        body,
                        resume: i + 1,
                        open_quote: None,
                    };
                }
                b'<' => {
                    return TagEnd {
                        body: i,
                        resume: i,
                        open_quote: None,
                    };
                }
                b'"' | b'\'' => {
                    let rest = &self.input[i + 1..];
                    let close = rest
                        .find(b as char)
                        .filter(|&end| !rest[..end].contains('<'));
                    match close {
                        Some(end) => i += end + 2,
                        None => {
                            // Unterminated: the value runs to the next tag
                            let end = rest.find('<').map_or(self.input.len(), |e| i + 1 + e);
                            return TagEnd {
                                body: end,
                                resume: end,
                                open_quote: Some(i),
                            };
                        }
                    }
                }
                _ => i += 1,
            }
        }
        TagEnd {
            body: bytes.len(),
            resume: bytes.len(),
            open_quote: None,
        }
    }

    /// Read the attributes of the tag starting with the element name at
    /// `name_start`.
    fn read_attributes(
        &self,
        name_start: usize,
        name_len: usize,
        end: &TagEnd,
    ) -> Vec<RawAttribute<'a>> {
        let input = self.input;
        let body = &input[name_start..end.open_quote.unwrap_or(end.body)];
        let mut attributes = Vec::new();

        let mut iter = Attributes::html(body, name_len);
        iter.with_checks(false);
        for attr in iter {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) => {
                    tracing::trace!(offset = name_start - 1, %err, "skipping unreadable attribute");
                    continue;
                }
            };
            let Ok(name) = std::str::from_utf8(attr.key.into_inner()) else {
                continue;
            };
            let value = attr.unescape_value().unwrap_or_else(|_| {
                Cow::Owned(String::from_utf8_lossy(&attr.value).into_owned())
            });
            attributes.push(RawAttribute { name, value });
        }

        // quick-xml drops a value whose quote never closes; keep the text up
        // to the next tag instead.
        if let Some(quote) = end.open_quote {
            if let Some(name) = dangling_name(&input[name_start + name_len..quote]) {
                attributes.push(RawAttribute {
                    name,
                    value: decode(&input[quote + 1..end.body]),
                });
            }
        }

        attributes
    }

    fn read_name(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || matches!(b, b'/' | b'>' | b'<' | b'=' | b'"' | b'\'') {
                break;
            }
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Fragment<'a>> {
        while let Some(rel) = self.input[self.pos..].find('<') {
            let start = self.pos + rel;
            if self.input[start..].starts_with("<!--") {
                self.skip_comment(start);
                continue;
            }

            self.pos = start + 1;
            let name = self.read_name();
            if name.is_empty() || !local_name(name).eq_ignore_ascii_case(self.element) {
                continue;
            }

            let end = self.find_tag_end();
            let attributes = self.read_attributes(start + 1, name.len(), &end);
            self.pos = end.resume;
            return Some(Fragment {
                offset: start,
                attributes,
                marker: self.marker,
            });
        }

        self.pos = self.input.len();
        None
    }
}

/// Collapse all whitespace runs (newlines and tabs included) to one space
/// and trim both ends. Only ASCII whitespace separates path data, so other
/// Unicode spaces are kept.
pub fn normalize_geometry(d: &str) -> String {
    d.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn parse_marker(comment: &str) -> Option<&str> {
    let marker = comment.trim().strip_prefix('[')?.strip_suffix(']')?.trim();
    (!marker.is_empty()).then_some(marker)
}

/// Name of the attribute assigned by a trailing `name=` in `text`.
fn dangling_name(text: &str) -> Option<&str> {
    let name = text
        .trim_end()
        .strip_suffix('=')?
        .trim_end()
        .rsplit(|c: char| c.is_ascii_whitespace())
        .next()?;
    (!name.is_empty()).then_some(name)
}

fn decode(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    unescape(raw).unwrap_or(Cow::Borrowed(raw))
}
