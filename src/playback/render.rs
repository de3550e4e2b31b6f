//! Webhook reply decoding
//!
//! The webhook answers with TwiML-like XML. A `Message` element either
//! holds the next prompt as text, or a `Body` plus any number of `Media`
//! URLs. The element may be the document root or sit under `Response`.
//! Only the first `Message` is rendered.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::common::{Error, Result};

/// Prompt shown when the reply has no message text
pub const EMPTY_MESSAGE: &str = "Empty message";

/// The next prompt decoded from a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub prompt: String,
    pub media_urls: Vec<String>,
    /// The reply carried no message text and `prompt` is the placeholder
    pub empty: bool,
}

#[derive(Default)]
struct MessageParts {
    text: String,
    body: String,
    media: Vec<String>,
    current_media: String,
}

/// Decode a raw reply body
pub fn render(bytes: &[u8]) -> Result<Rendered> {
    let xml = std::str::from_utf8(bytes).map_err(|e| Error::Decode(e.to_string()))?;
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<String> = Vec::new();
    let mut saw_element = false;
    // Depth of the captured Message element while inside it
    let mut message_depth: Option<usize> = None;
    let mut message: Option<MessageParts> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::Decode(e.to_string()))?;

        match event {
            Event::Start(e) => {
                saw_element = true;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "Message" && message.is_none() {
                    message = Some(MessageParts::default());
                    message_depth = Some(stack.len() + 1);
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                saw_element = true;
                if e.name().as_ref() == b"Message" && message.is_none() {
                    message = Some(MessageParts::default());
                }
            }
            Event::Text(e) => {
                let raw = std::str::from_utf8(&e).map_err(|e| Error::Decode(e.to_string()))?;
                let text =
                    quick_xml::escape::unescape(raw).map_err(|e| Error::Decode(e.to_string()))?;
                collect_text(&stack, message_depth, message.as_mut(), &text);
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e).map_err(|e| Error::Decode(e.to_string()))?;
                collect_text(&stack, message_depth, message.as_mut(), text);
            }
            Event::End(_) => {
                let depth = stack.len();
                let name = stack.pop().unwrap_or_default();
                if let (Some(parts), Some(msg_depth)) = (message.as_mut(), message_depth) {
                    if name == "Media" && depth == msg_depth + 1 {
                        let url = std::mem::take(&mut parts.current_media);
                        let url = url.trim();
                        if !url.is_empty() {
                            parts.media.push(url.to_string());
                        }
                    } else if depth == msg_depth {
                        message_depth = None;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Decode(format!(
            "unexpected end of document inside <{}>",
            open
        )));
    }
    if !saw_element {
        return Err(Error::Decode("no XML element in response".to_string()));
    }

    let parts = message.unwrap_or_default();
    let text = parts.text.trim();
    if !text.is_empty() {
        return Ok(Rendered {
            prompt: text.to_string(),
            media_urls: Vec::new(),
            empty: false,
        });
    }

    let body = parts.body.trim();
    Ok(Rendered {
        prompt: if body.is_empty() {
            EMPTY_MESSAGE.to_string()
        } else {
            body.to_string()
        },
        media_urls: parts.media,
        empty: body.is_empty(),
    })
}

fn collect_text(
    stack: &[String],
    message_depth: Option<usize>,
    message: Option<&mut MessageParts>,
    text: &str,
) {
    let (Some(parts), Some(depth)) = (message, message_depth) else {
        return;
    };
    if stack.len() == depth {
        parts.text.push_str(text);
    } else if stack.len() == depth + 1 {
        match stack.last().map(String::as_str) {
            Some("Body") => parts.body.push_str(text),
            Some("Media") => parts.current_media.push_str(text),
            _ => {}
        }
    }
}
