//! Streaming RSS/Atom parsing.
//!
//! Accepts RSS 0.9x/2.0 (`<rss>`), RSS 1.0 (`<rdf:RDF>`) and Atom (`<feed>`).
//! Extraction is best-effort: elements are matched by local name, so any
//! namespace prefix (`dc:`, `dcterms:`, `atom:`) is accepted.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use policyfeed_core::{FallbackChain, Resolved, scrape_components};

use crate::error::{SourceError, SourceResult};

/// The dialect of a parsed feed, taken from its root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Rdf,
    Atom,
}

/// One `<item>` or `<entry>`; every field is optional upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    /// Raw text of `pubDate`, `published`, `issued` or Dublin Core `date`.
    pub published: Option<String>,
    /// Raw text of `updated` or `modified`.
    pub updated: Option<String>,
    /// Raw text of `created`.
    pub created: Option<String>,
}

impl FeedEntry {
    /// Calendar components scraped from `published`, ignoring any zone.
    pub fn published_parsed(&self) -> Option<NaiveDateTime> {
        self.published.as_deref().and_then(scrape_components)
    }

    /// Calendar components scraped from `updated`, ignoring any zone.
    pub fn updated_parsed(&self) -> Option<NaiveDateTime> {
        self.updated.as_deref().and_then(scrape_components)
    }

    /// Resolves the entry timestamp: the free-text fields first, then the
    /// scraped components interpreted as UTC.
    pub fn resolve_timestamp(&self) -> Option<Resolved> {
        FallbackChain::new()
            .text("published", self.published.as_deref())
            .text("updated", self.updated.as_deref())
            .text("created", self.created.as_deref())
            .attempt("published_parsed", || {
                self.published_parsed().map(|naive| naive.and_utc())
            })
            .attempt("updated_parsed", || {
                self.updated_parsed().map(|naive| naive.and_utc())
            })
            .resolve()
    }

    fn assign(&mut self, element: &str, value: String) {
        let slot = match element {
            "title" => &mut self.title,
            "link" => &mut self.link,
            "description" | "summary" => &mut self.summary,
            "pubdate" | "published" | "issued" | "date" => &mut self.published,
            "updated" | "modified" => &mut self.updated,
            "created" => &mut self.created,
            // Full content only stands in for a missing summary.
            "encoded" | "content" => &mut self.summary,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    /// Takes the `href` of an Atom `<link>`, if it is an alternate link.
    fn assign_link_href(&mut self, e: &BytesStart<'_>) {
        let mut href = None;
        let mut rel = None;

        for attr in e.attributes().flatten() {
            let value = attr
                .unescape_value()
                .map(Cow::into_owned)
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            match attr.key.local_name().as_ref() {
                b"href" => href = Some(value.trim().to_string()),
                b"rel" => rel = Some(value.trim().to_string()),
                _ => {}
            }
        }

        let is_alternate = matches!(rel.as_deref(), None | Some("") | Some("alternate"));
        if let Some(href) = href.filter(|h| is_alternate && !h.is_empty())
            && self.link.is_none()
        {
            self.link = Some(href);
        }
    }
}

/// A parsed feed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub format: FeedFormat,
    /// Channel or feed title.
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
}

/// Parses a feed document.
///
/// # Errors
///
/// Returns an `InvalidResponse` error for malformed or truncated XML, and for
/// documents whose root is not `rss`, `RDF` or `feed`.
pub fn parse_feed(xml: &str) -> SourceResult<FeedDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut format: Option<FeedFormat> = None;
    let mut title: Option<String> = None;
    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = local_name(&e);
                if stack.is_empty() {
                    format = Some(root_format(&name)?);
                }
                if is_entry(&name) && current.is_none() {
                    current = Some(FeedEntry::default());
                }
                if name == "link"
                    && parent_is_entry(&stack)
                    && let Some(entry) = current.as_mut()
                {
                    entry.assign_link_href(&e);
                }
                stack.push(name);
                text.clear();
            }
            Ok(Event::Empty(e)) => {
                let name = local_name(&e);
                if stack.is_empty() {
                    format = Some(root_format(&name)?);
                }
                if name == "link"
                    && parent_is_entry(&stack)
                    && let Some(entry) = current.as_mut()
                {
                    entry.assign_link_href(&e);
                }
            }
            Ok(Event::Text(e)) => {
                let chunk = e
                    .unescape()
                    .map(Cow::into_owned)
                    .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                text.push_str(&chunk);
            }
            Ok(Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::End(_)) => {
                let name = stack.pop().unwrap_or_default();
                let value = std::mem::take(&mut text);
                let value = value.trim();

                if is_entry(&name) {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                } else if !value.is_empty() {
                    if parent_is_entry(&stack) {
                        if let Some(entry) = current.as_mut() {
                            entry.assign(&name, value.to_string());
                        }
                    } else if name == "title"
                        && title.is_none()
                        && matches!(stack.last().map(String::as_str), Some("channel" | "feed"))
                    {
                        title = Some(value.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SourceError::invalid_response(format!(
                    "malformed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
                .with_source(e));
            }
            _ => {}
        }
        buf.clear();
    }

    let format =
        format.ok_or_else(|| SourceError::invalid_response("document has no root element"))?;
    if !stack.is_empty() {
        return Err(SourceError::invalid_response(format!(
            "truncated document: <{}> is never closed",
            stack.join("/")
        )));
    }

    Ok(FeedDocument {
        format,
        title,
        entries,
    })
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase()
}

fn root_format(name: &str) -> SourceResult<FeedFormat> {
    match name {
        "rss" => Ok(FeedFormat::Rss),
        "rdf" => Ok(FeedFormat::Rdf),
        "feed" => Ok(FeedFormat::Atom),
        other => Err(SourceError::invalid_response(format!(
            "not a feed: unexpected root element <{}>",
            other
        ))),
    }
}

fn is_entry(name: &str) -> bool {
    matches!(name, "item" | "entry")
}

fn parent_is_entry(stack: &[String]) -> bool {
    stack.last().is_some_and(|parent| is_entry(parent))
}
