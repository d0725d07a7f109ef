//! Decoding of Web Tools response documents.

use std::cmp::Ordering;

use log::warn;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    AddressInput, AddressRecord, ClientError, Field, LookupError, ParseError, RawResponse,
    ServiceError,
};

/// The addresses of a response, in ascending order of ID.
///
/// # Examples
///
/// ```
/// use reqwest::StatusCode;
/// use webtools::RawResponse;
///
/// let response = RawResponse::new(
///     StatusCode::OK,
///     r#"<CityStateLookupResponse>
///         <ZipCode ID="0"><Zip5>20770</Zip5></ZipCode>
///         <Address ID="1"><City>GREENBELT</City><State>MD</State></Address>
///         <Address ID="0"><City>OLD LYME</City><State>CT</State></Address>
///     </CityStateLookupResponse>"#,
/// );
/// let results = response.parse().unwrap();
///
/// assert_eq!(results.get("1").unwrap().citystate(), "GREENBELT, MD");
/// assert!(results.get("2").is_err());
///
/// let ids: Vec<_> = results.iter().map(|a| a.id()).collect();
/// assert_eq!(ids, ["0", "1"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<AddressRecord>,
}

/// Numeric IDs sort numerically and before any others, which sort as strings.
fn id_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl ResultSet {
    /// Creates a set from records in document order. Where two records share
    /// an ID, the later one wins.
    pub(crate) fn from_records(mut records: Vec<AddressRecord>) -> Self {
        records.reverse();
        records.sort_by(|a, b| id_order(a.id(), b.id()));
        records.dedup_by(|a, b| a.id() == b.id());
        Self { records }
    }

    /// Gets the address with the given ID.
    ///
    /// # Errors
    ///
    /// Will return `NotFound` if the response had no address with that ID.
    pub fn get(&self, id: &str) -> Result<&AddressRecord, LookupError> {
        self.records
            .iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| LookupError::NotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AddressRecord> {
        self.records.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = AddressRecord;
    type IntoIter = std::vec::IntoIter<AddressRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a AddressRecord;
    type IntoIter = std::slice::Iter<'a, AddressRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Decodes the body of `response`.
///
/// # Errors
/// - `Parse` if the body isn't a single well-formed XML element.
/// - `Service` if the root element is `Error`.
pub(crate) fn parse(response: &RawResponse) -> Result<ResultSet, ClientError> {
    let document = Document::read(response.body())?;

    if document.root.as_deref() == Some("Error") {
        warn!(
            "Web Tools API error response: {}\n{}",
            response.status(),
            response.body()
        );
        let detail = document.error;
        return Err(ServiceError::new(
            response.status(),
            response.body(),
            detail.number,
            detail.origin,
            detail.description,
        )
        .into());
    }

    Ok(ResultSet::from_records(document.addresses))
}

/// Where the text of the element being read ends up.
#[derive(Debug, Clone, Copy)]
enum Target {
    Field(Field),
    AddressError,
    Number,
    Source,
    Description,
}

#[derive(Debug)]
struct Capture {
    depth: usize,
    target: Target,
    text: String,
}

#[derive(Debug)]
struct PendingAddress {
    depth: usize,
    id: String,
    input: AddressInput,
    error_depth: Option<usize>,
    error: Option<String>,
}

#[derive(Debug, Default)]
struct ErrorDetail {
    number: Option<String>,
    origin: Option<String>,
    description: Option<String>,
}

/// The parts of a response document the client cares about.
#[derive(Debug, Default)]
struct Document {
    root: Option<String>,
    depth: usize,
    pending: Vec<PendingAddress>,
    capture: Option<Capture>,
    addresses: Vec<AddressRecord>,
    error: ErrorDetail,
}

impl Document {
    fn read(body: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(body);

        let mut document = Self::default();
        loop {
            let position = reader.buffer_position() as u64;
            let event = reader
                .read_event()
                .map_err(|e| ParseError::new(reader.buffer_position() as u64, e))?;
            match event {
                Event::Start(e) => document.open(&e, position)?,
                Event::Empty(e) => {
                    document.open(&e, position)?;
                    document.close(position)?;
                }
                Event::End(_) => document.close(position)?,
                Event::Text(e) => {
                    let text = e.unescape().map_err(|e| ParseError::new(position, e))?;
                    document.text(&text, position)?;
                }
                Event::CData(e) => {
                    let text =
                        std::str::from_utf8(&e).map_err(|e| ParseError::new(position, e))?;
                    document.text(text, position)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let position = reader.buffer_position() as u64;
        match document.root.as_deref() {
            None => return Err(ParseError::new(position, "no root element")),
            Some(root) if document.depth > 0 => {
                return Err(ParseError::new(
                    position,
                    format!("unexpected end of input, <{root}> is not closed"),
                ));
            }
            Some(_) => {}
        }

        Ok(document)
    }

    fn open(&mut self, e: &BytesStart, position: u64) -> Result<(), ParseError> {
        let name = e.name();
        let name = name.as_ref();

        if self.depth == 0 {
            if self.root.is_some() {
                return Err(ParseError::new(position, "more than one root element"));
            }
            self.root = Some(String::from_utf8_lossy(name).into_owned());
        }
        self.depth += 1;
        let depth = self.depth;

        if name == b"Address" {
            let id = e
                .try_get_attribute("ID")
                .map_err(|err| ParseError::new(position, err))?
                .ok_or_else(|| ParseError::new(position, "Address element without an ID"))?
                .unescape_value()
                .map_err(|err| ParseError::new(position, err))?
                .into_owned();
            self.pending.push(PendingAddress {
                depth,
                id,
                input: AddressInput::new(),
                error_depth: None,
                error: None,
            });
        } else if let Some(address) = self.pending.last_mut() {
            if depth == address.depth + 1 {
                if let Some(field) = Field::from_tag(name) {
                    self.capture = Some(Capture::new(depth, Target::Field(field)));
                } else if name == b"Error" {
                    address.error_depth = Some(depth);
                }
            } else if address.error_depth == Some(depth - 1) && name == b"Description" {
                self.capture = Some(Capture::new(depth, Target::AddressError));
            }
        } else if depth == 2 && self.root.as_deref() == Some("Error") {
            let target = match name {
                b"Number" => Some(Target::Number),
                b"Source" => Some(Target::Source),
                b"Description" => Some(Target::Description),
                _ => None,
            };
            if let Some(target) = target {
                self.capture = Some(Capture::new(depth, target));
            }
        }

        Ok(())
    }

    fn close(&mut self, position: u64) -> Result<(), ParseError> {
        let depth = self.depth;
        if depth == 0 {
            return Err(ParseError::new(position, "end tag without a start tag"));
        }

        if let Some(capture) = self.capture.take_if(|c| c.depth == depth) {
            self.commit(capture);
        }
        if let Some(address) = self.pending.last_mut() {
            if address.error_depth == Some(depth) {
                address.error_depth = None;
            }
        }
        if self.pending.last().is_some_and(|a| a.depth == depth) {
            if let Some(address) = self.pending.pop() {
                self.addresses.push(
                    AddressRecord::from_input(address.id, address.input)
                        .with_error(address.error),
                );
            }
        }

        self.depth -= 1;
        Ok(())
    }

    fn text(&mut self, text: &str, position: u64) -> Result<(), ParseError> {
        if self.depth == 0 {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(ParseError::new(position, "text outside the root element"));
        }
        if let Some(capture) = &mut self.capture {
            capture.text.push_str(text);
        }
        Ok(())
    }

    fn commit(&mut self, capture: Capture) {
        let text = capture.text;
        match capture.target {
            Target::Field(field) => {
                if let Some(address) = self.pending.last_mut() {
                    address.input.set(field, text);
                }
            }
            Target::AddressError => {
                if let Some(address) = self.pending.last_mut() {
                    address.error = Some(text);
                }
            }
            Target::Number => self.error.number = Some(text),
            Target::Source => self.error.origin = Some(text),
            Target::Description => self.error.description = Some(text),
        }
    }
}

impl Capture {
    fn new(depth: usize, target: Target) -> Self {
        Self {
            depth,
            target,
            text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests;
