use quick_xml::escape::escape;
use strum::IntoEnumIterator;

use crate::{AddressInput, Field, Operation};

/// Request document to send to the Web Tools API.
#[derive(Debug)]
pub(crate) struct Payload {
    root_tag: &'static str,
    xml: String,
    count: usize,
}

impl Payload {
    /// Creates a new payload, opening the root element with the given user ID.
    pub(crate) fn new(operation: Operation, user_id: &str) -> Self {
        let root_tag = operation.root_tag();
        Self {
            root_tag,
            xml: format!("<{root_tag} USERID=\"{}\">", escape(user_id)),
            count: 0,
        }
    }

    /// Adds an `Address` element, with an `ID` following the previous one.
    ///
    /// Unset and empty fields are written as empty elements.
    pub(crate) fn add(mut self, address: &AddressInput) -> Self {
        self.xml.push_str(&format!("<Address ID=\"{}\">", self.count));
        for field in Field::iter() {
            let tag = field.tag();
            match address.get(field).filter(|v| !v.is_empty()) {
                Some(value) => self.xml.push_str(&format!("<{tag}>{}</{tag}>", escape(value))),
                None => self.xml.push_str(&format!("<{tag}/>")),
            }
        }
        self.xml.push_str("</Address>");
        self.count += 1;
        self
    }

    /// Closes the root element and returns the document.
    pub(crate) fn finish(mut self) -> String {
        self.xml.push_str(&format!("</{}>", self.root_tag));
        self.xml
    }

    /// Builds the whole document for `addresses`.
    pub(crate) fn build(operation: Operation, user_id: &str, addresses: &[AddressInput]) -> String {
        addresses
            .iter()
            .fold(Self::new(operation, user_id), Self::add)
            .finish()
    }
}
