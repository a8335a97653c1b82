//! Typed extraction of the catalog identifier from a `tvshow.nfo` document.
//!
//! Only `tvshow > id` is read. The document is pull-parsed and abandoned as
//! soon as the identifier (or the end of the root element) is reached, so
//! whatever follows the root element (Kodi tolerates a bare scraper URL
//! there) is never looked at.

use derive_more::{Display, Error};
use exn::ResultExt;
use quick_xml::Reader;
use quick_xml::events::Event;
use tvsync_catalog::CatalogId;

const ROOT: &[u8] = b"tvshow";
const ID: &[u8] = b"id";

pub(crate) type Result<T> = std::result::Result<T, exn::Exn<ErrorKind>>;

#[derive(Debug, Display, Error)]
pub(crate) enum ErrorKind {
    #[display("not well-formed XML")]
    Xml,
    #[display("root element is not <tvshow>")]
    NotTvShow,
    #[display("<tvshow> has no <id>")]
    MissingId,
    #[display("<id> is not a catalog identifier: {_0:?}")]
    InvalidId(#[error(not(source))] String),
}

/// Extract the identifier from the text of an nfo document.
pub(crate) fn parse_id(xml: &str) -> Result<CatalogId> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut id: Option<String> = None;
    loop {
        match reader.read_event().or_raise(|| ErrorKind::Xml)? {
            Event::Start(element) => {
                depth += 1;
                let name = element.name();
                if depth == 1 && name.as_ref() != ROOT {
                    exn::bail!(ErrorKind::NotTvShow);
                }
                if depth == 2 && name.as_ref() == ID {
                    id = Some(String::new());
                }
            },
            Event::Empty(element) => {
                let name = element.name();
                match depth {
                    0 if name.as_ref() == ROOT => exn::bail!(ErrorKind::MissingId),
                    0 => exn::bail!(ErrorKind::NotTvShow),
                    1 if name.as_ref() == ID => return to_id(""),
                    _ => {},
                }
            },
            Event::Text(text) if depth == 2 => {
                if let Some(id) = id.as_mut() {
                    id.push_str(&text.unescape().or_raise(|| ErrorKind::Xml)?);
                }
            },
            Event::CData(data) if depth == 2 => {
                if let Some(id) = id.as_mut() {
                    id.push_str(std::str::from_utf8(&data).or_raise(|| ErrorKind::Xml)?);
                }
            },
            Event::End(_) => {
                if depth == 2
                    && let Some(id) = id.take()
                {
                    return to_id(&id);
                }
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    exn::bail!(ErrorKind::MissingId);
                }
            },
            Event::Eof if depth == 0 => exn::bail!(ErrorKind::NotTvShow),
            // Truncated document: the root element was never closed.
            Event::Eof => exn::bail!(ErrorKind::Xml),
            _ => {},
        }
    }
}

fn to_id(text: &str) -> Result<CatalogId> {
    let text = text.trim();
    text.parse::<CatalogId>().or_raise(|| ErrorKind::InvalidId(text.to_string()))
}
