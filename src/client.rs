use log::debug;
use reqwest::StatusCode;
use url::Url;

use crate::response::{self, ResultSet};
use crate::{AddressInput, ClientBuilderError, ClientError, Environment, Operation, Payload};

const PRODUCTION_ENDPOINT: &str = "https://secure.shippingapis.com/ShippingAPI.dll";
const TEST_ENDPOINT: &str = "https://secure.shippingapis.com/ShippingAPITest.dll";

/// Builder for a [Client] that handles default values.
pub struct ClientBuilder {
    endpoint: Option<Url>,
    test_endpoint: Option<Url>,
    user_id: Option<String>,
    http_client: Option<reqwest::blocking::Client>,
}

impl ClientBuilder {
    fn new() -> Self {
        Self {
            endpoint: None,
            test_endpoint: None,
            user_id: None,
            http_client: None,
        }
    }

    /// Sets the production API endpoint to the one given.
    pub fn endpoint(mut self, endpoint: &Url) -> Self {
        self.endpoint = Some(endpoint.clone());
        self
    }

    /// Sets the test API endpoint to the one given.
    pub fn test_endpoint(mut self, endpoint: &Url) -> Self {
        self.test_endpoint = Some(endpoint.clone());
        self
    }

    /// Sets the Web Tools user ID to the one given.
    pub fn user_id(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    /// Uses the given HTTP client, e.g. one configured with a timeout.
    pub fn http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds a [Client] from the builder.
    ///
    /// In the case that no endpoints are set, the defaults of
    /// `https://secure.shippingapis.com/ShippingAPI.dll` and
    /// `https://secure.shippingapis.com/ShippingAPITest.dll` are used.
    ///
    /// # Errors
    /// - `MissingField` if the user ID isn't added to the builder.
    /// - `UrlParse` if a default API endpoint fails to parse. This shouldn't happen.
    pub fn build(self) -> Result<Client, ClientBuilderError> {
        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => PRODUCTION_ENDPOINT.parse()?,
        };
        let test_endpoint = match self.test_endpoint {
            Some(endpoint) => endpoint,
            None => TEST_ENDPOINT.parse()?,
        };
        let user_id = self
            .user_id
            .ok_or_else(|| ClientBuilderError::MissingField("user_id".to_string()))?;

        Ok(Client {
            endpoint,
            test_endpoint,
            user_id,
            client: self.http_client.unwrap_or_default(),
        })
    }
}

/// The status and body of a response, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body into the addresses it contains.
    ///
    /// # Errors
    /// - `Parse` if the body isn't well-formed XML.
    /// - `Service` if the body is an `Error` document.
    pub fn parse(&self) -> Result<ResultSet, ClientError> {
        response::parse(self)
    }
}

/// API client.
pub struct Client {
    endpoint: Url,
    test_endpoint: Url,
    user_id: String,
    client: reqwest::blocking::Client,
}

impl Client {
    /// Creates a new Client using the default endpoints.
    pub fn new(user_id: &str) -> Result<Self, ClientBuilderError> {
        Self::builder().user_id(user_id).build()
    }

    /// Returns a builder for a Client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn endpoint_for(&self, environment: Environment) -> &Url {
        match environment {
            Environment::Production => &self.endpoint,
            Environment::Test => &self.test_endpoint,
        }
    }

    /// Builds the request document for `addresses`, giving each an `ID` equal
    /// to its index.
    pub fn build_request(&self, addresses: &[AddressInput], operation: Operation) -> String {
        Payload::build(operation, &self.user_id, addresses)
    }

    /// Sends a GET request with the given document to the endpoint for
    /// `environment`.
    ///
    /// The status code isn't checked; see [`RawResponse::parse`].
    pub fn send(
        &self,
        operation: Operation,
        xml: &str,
        environment: Environment,
    ) -> Result<RawResponse, ClientError> {
        let endpoint = self.endpoint_for(environment);
        let mut url = endpoint.clone();
        url.query_pairs_mut()
            .append_pair("API", operation.api_name())
            .append_pair("XML", xml);

        debug!("sending {} request to {endpoint}", operation.api_name());
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        let body = resp.text()?;
        debug!("{} response: {status}, {} bytes", operation.api_name(), body.len());

        Ok(RawResponse::new(status, body))
    }

    /// Builds, sends and parses a request for `addresses`.
    pub fn request(
        &self,
        operation: Operation,
        addresses: &[AddressInput],
        environment: Environment,
    ) -> Result<ResultSet, ClientError> {
        let xml = self.build_request(addresses, operation);
        debug!("{} request for {} addresses", operation.api_name(), addresses.len());
        self.send(operation, &xml, environment)?.parse()
    }

    /// Verifies and standardizes the given addresses.
    pub fn verify(&self, addresses: &[AddressInput]) -> Result<ResultSet, ClientError> {
        self.request(Operation::Verify, addresses, Environment::Production)
    }

    /// Looks up the ZIP codes of the given addresses.
    pub fn zipcode_lookup(&self, addresses: &[AddressInput]) -> Result<ResultSet, ClientError> {
        self.request(Operation::ZipCodeLookup, addresses, Environment::Production)
    }

    /// Looks up the city and state for the ZIP codes of the given addresses.
    pub fn citystate_lookup(&self, addresses: &[AddressInput]) -> Result<ResultSet, ClientError> {
        self.request(Operation::CityStateLookup, addresses, Environment::Production)
    }
}
