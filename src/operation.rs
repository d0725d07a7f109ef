use strum_macros::IntoStaticStr;

/// The lookups offered by the Web Tools address APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum Operation {
    Verify,
    ZipCodeLookup,
    CityStateLookup,
}

impl Operation {
    /// Gets the name sent in the `API` query parameter.
    pub fn api_name(&self) -> &'static str {
        self.into()
    }

    /// Gets the root tag of the request document.
    pub fn root_tag(&self) -> &'static str {
        match self {
            Operation::Verify => "AddressValidateRequest",
            Operation::ZipCodeLookup => "ZipCodeLookupRequest",
            Operation::CityStateLookup => "CityStateLookupRequest",
        }
    }
}

/// Which of the two service endpoints a request goes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Test,
}
