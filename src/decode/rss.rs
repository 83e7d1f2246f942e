//! RSS shelf feed decoder

use super::types::{PageDecoder, RssChannel, RssRecord};
use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

/// Decodes one page of the `list_rss` feed.
///
/// Absent item fields decode as `""` and are listed in
/// `RssRecord::missing`, so one malformed item does not fail the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct RssDecoder;

impl RssDecoder {
    /// Create a new RSS decoder
    pub fn new() -> Self {
        Self
    }
}

impl PageDecoder for RssDecoder {
    type Output = RssChannel;

    fn decode(&self, body: &str) -> Result<RssChannel> {
        parse_channel(body)
    }
}

/// Element path of the channel, relative to the document root
const CHANNEL_PATH: [&str; 2] = ["rss", "channel"];

fn parse_channel(xml: &str) -> Result<RssChannel> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();

    let mut seen_channel = false;
    let mut title: Option<String> = None;
    let mut items = Vec::new();
    // Fields of the item being read, keyed by path below <item>
    let mut current: Option<HashMap<String, String>> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if stack == CHANNEL_PATH {
                    seen_channel = true;
                    if name == "item" {
                        current = Some(HashMap::new());
                    }
                }
                stack.push(name);
                text.clear();
            },
            Ok(Event::Empty(e)) => {
                // <num_pages/> and friends carry an empty value
                if let Some(fields) = current.as_mut() {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    fields.insert(item_key(&stack, &name), String::new());
                }
            },
            Ok(Event::Text(e)) => match e.unescape() {
                Ok(value) => text.push_str(&value),
                Err(_) => text.push_str(&String::from_utf8_lossy(&e)),
            },
            Ok(Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            },
            Ok(Event::End(_)) => {
                let Some(name) = stack.pop() else {
                    return Err(Error::xml("unbalanced closing tag"));
                };

                if stack == CHANNEL_PATH {
                    match name.as_str() {
                        "title" => title = Some(text.trim().to_string()),
                        "item" => {
                            if let Some(fields) = current.take() {
                                items.push(record_from_fields(fields));
                            }
                        },
                        _ => {},
                    }
                } else if let Some(fields) = current.as_mut() {
                    if stack.len() > CHANNEL_PATH.len() {
                        fields.insert(item_key(&stack, &name), std::mem::take(&mut text));
                    }
                }
                text.clear();
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.buffer_position()
                )))
            },
            _ => {},
        }
        buf.clear();
    }

    if !seen_channel {
        return Err(Error::xml("document has no <rss><channel> element"));
    }

    let title = title.ok_or_else(|| Error::validation("channel.title", "missing from feed"))?;

    Ok(RssChannel { title, items })
}

/// Key of a field below `<item>`: `title`, `book/num_pages`, ...
fn item_key(stack: &[String], name: &str) -> String {
    // stack is [rss, channel, item, ...parents]
    let mut parts: Vec<&str> = stack
        .iter()
        .skip(CHANNEL_PATH.len() + 1)
        .map(String::as_str)
        .collect();
    parts.push(name);
    parts.join("/")
}

fn record_from_fields(mut fields: HashMap<String, String>) -> RssRecord {
    let mut missing = Vec::new();
    let mut take = |key: &str| {
        fields.remove(key).unwrap_or_else(|| {
            missing.push(key.to_string());
            String::new()
        })
    };

    let mut record = RssRecord {
        guid: take("guid"),
        pub_date: take("pubDate"),
        title: take("title"),
        link: take("link"),
        book_id: take("book_id"),
        book_image_url: take("book_image_url"),
        book_small_image_url: take("book_small_image_url"),
        book_medium_image_url: take("book_medium_image_url"),
        book_large_image_url: take("book_large_image_url"),
        book_description: take("book_description"),
        num_pages: take("book/num_pages"),
        author_name: take("author_name"),
        isbn: take("isbn"),
        user_name: take("user_name"),
        user_rating: take("user_rating"),
        user_read_at: take("user_read_at"),
        user_date_added: take("user_date_added"),
        user_date_created: take("user_date_created"),
        user_shelves: take("user_shelves"),
        user_review: take("user_review"),
        average_rating: take("average_rating"),
        book_published: take("book_published"),
        description: take("description"),
        missing: Vec::new(),
    };
    record.missing = missing;
    record
}
