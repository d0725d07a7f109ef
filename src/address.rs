//! Type-safe address fields, request inputs and decoded records.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::Deserialize;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::UnknownFieldError;

/// The address fields understood by the Web Tools APIs, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum Field {
    FirmName,
    Address1,
    Address2,
    City,
    State,
    Zip5,
    Zip4,
}

impl Field {
    /// Gets the XML tag of the field, e.g. `FirmName`.
    pub fn tag(&self) -> &'static str {
        self.into()
    }

    /// Gets the lower-case key of the field, e.g. `firmname`.
    pub fn key(&self) -> &'static str {
        match self {
            Field::FirmName => "firmname",
            Field::Address1 => "address1",
            Field::Address2 => "address2",
            Field::City => "city",
            Field::State => "state",
            Field::Zip5 => "zip5",
            Field::Zip4 => "zip4",
        }
    }

    /// Finds the field whose XML tag is exactly `tag`.
    pub(crate) fn from_tag(tag: &[u8]) -> Option<Field> {
        Field::iter().find(|f| f.tag().as_bytes() == tag)
    }

    /// Parses a field name, ignoring ASCII case.
    pub fn parse(name: &str) -> Result<Field, UnknownFieldError> {
        Field::from_str(name).map_err(|_| UnknownFieldError(name.to_string()))
    }

    fn index(self) -> usize {
        self as usize
    }
}

type Fields = [Option<String>; Field::COUNT];

/// An address to send to the service.
///
/// Any subset of the fields may be set; unset fields are sent as empty
/// elements.
///
/// # Examples
///
/// ```
/// use webtools::{AddressInput, Field};
///
/// let input = AddressInput::new()
///     .with(Field::City, "Greenbelt")
///     .with(Field::State, "MD");
///
/// assert_eq!(input.get(Field::City), Some("Greenbelt"));
/// assert_eq!(input.get(Field::Zip5), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<String, Option<String>>")]
pub struct AddressInput {
    fields: Fields,
}

impl AddressInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the given field to `value`.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// In the case that `value` is some, sets the field to it.
    pub fn with_if_some(mut self, field: Field, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.set(field, value);
        }
        self
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields[field.index()] = Some(value.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields[field.index()].as_deref()
    }

    /// Creates an input from `(name, value)` pairs, matching names without
    /// regard to ASCII case.
    ///
    /// # Errors
    ///
    /// Will return an `UnknownFieldError` for the first name that isn't a [Field].
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, UnknownFieldError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        pairs.into_iter().try_fold(Self::new(), |input, (name, value)| {
            Ok(input.with(Field::parse(name.as_ref())?, value))
        })
    }
}

impl TryFrom<HashMap<String, Option<String>>> for AddressInput {
    type Error = UnknownFieldError;

    fn try_from(value: HashMap<String, Option<String>>) -> Result<Self, Self::Error> {
        value
            .into_iter()
            .try_fold(Self::new(), |input, (name, value)| {
                Ok(input.with_if_some(Field::parse(&name)?, value))
            })
    }
}

/// An address decoded from a response.
///
/// Accessors return an empty string for fields the service left out; use
/// [`AddressRecord::field`] to tell absent and empty apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    id: String,
    fields: Fields,
    error: Option<String>,
}

impl AddressRecord {
    /// Creates a record with the given ID from the fields of `input`.
    pub fn from_input(id: impl Into<String>, input: AddressInput) -> Self {
        Self {
            id: id.into(),
            fields: input.fields,
            error: None,
        }
    }

    pub(crate) fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    /// The position of the address in its request, as sent in the `ID` attribute.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.fields[field.index()].as_deref()
    }

    /// The description of the error the service reported for this address alone.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn value(&self, field: Field) -> &str {
        self.field(field).unwrap_or("")
    }

    pub fn firmname(&self) -> &str {
        self.value(Field::FirmName)
    }

    pub fn address1(&self) -> &str {
        self.value(Field::Address1)
    }

    pub fn address2(&self) -> &str {
        self.value(Field::Address2)
    }

    pub fn city(&self) -> &str {
        self.value(Field::City)
    }

    pub fn state(&self) -> &str {
        self.value(Field::State)
    }

    pub fn zip5(&self) -> &str {
        self.value(Field::Zip5)
    }

    pub fn zip4(&self) -> &str {
        self.value(Field::Zip4)
    }

    /// `address1` and `address2` on separate lines, or just `address2` when
    /// there is no `address1`.
    pub fn address_lines(&self) -> String {
        if self.address1().is_empty() {
            self.address2().to_string()
        } else {
            format!("{}\n{}", self.address1(), self.address2())
        }
    }

    /// `zip5-zip4`. The hyphen is kept even when `zip4` is empty.
    pub fn zipcode(&self) -> String {
        format!("{}-{}", self.zip5(), self.zip4())
    }

    pub fn citystate(&self) -> String {
        format!("{}, {}", self.city(), self.state())
    }

    pub fn last_line(&self) -> String {
        format!("{} {}", self.citystate(), self.zipcode())
    }
}

/// Formats the record as a mailing block: firm name and address lines that
/// are present, each on its own line, followed by the last line.
impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in [self.firmname(), self.address1(), self.address2()] {
            if !line.is_empty() {
                writeln!(f, "{line}")?;
            }
        }
        f.write_str(&self.last_line())
    }
}
