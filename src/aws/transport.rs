//! SigV4-signed HTTP transport shared by every AWS service wrapper

use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use tracing::debug;
use url::form_urlencoded;

use super::error::{Error, Result};
use super::{xml, Credentials};

const USER_AGENT: &str = concat!("osd-utils-cli/", env!("CARGO_PKG_VERSION"));

/// Where a service lives and how requests to it are signed.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Signing name, also used in error messages.
    pub service: &'static str,
    pub host: String,
    pub region: String,
}

impl Endpoint {
    /// A global service reachable on a single host and signed for us-east-1.
    pub fn global(service: &'static str, host: &str) -> Self {
        Self {
            service,
            host: host.to_string(),
            region: "us-east-1".to_string(),
        }
    }

    /// A regional service at `<service>.<region>.amazonaws.com`.
    pub fn regional(service: &'static str, region: &str) -> Self {
        Self {
            service,
            host: format!("{}.{}.amazonaws.com", service, region),
            region: region.to_string(),
        }
    }

    fn url(&self) -> String {
        format!("https://{}/", self.host)
    }
}

/// JSON error body returned by JSON 1.1 services.
#[derive(Debug, Deserialize)]
struct JsonErrorBody {
    #[serde(rename = "__type", default)]
    error_type: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

/// Signs and executes requests with one set of credentials.
pub struct Transport {
    credentials: Credentials,
    client: Client,
}

impl Transport {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| Error::Http {
                service: "http",
                source,
            })?;

        Ok(Self {
            credentials,
            client,
        })
    }

    pub fn region(&self) -> &str {
        &self.credentials.region
    }

    /// Call a JSON 1.1 protocol action, e.g. `AWSInsightsIndexService.GetCostAndUsage`.
    pub fn json<I, O>(&self, endpoint: &Endpoint, target_prefix: &str, action: &str, input: &I) -> Result<O>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let body = serde_json::to_string(input).map_err(|e| Error::Decode {
            service: endpoint.service,
            action: action.to_string(),
            reason: format!("failed to serialize request: {}", e),
        })?;
        let target = format!("{}.{}", target_prefix, action);

        let (status, response_body) = self.send(
            endpoint,
            action,
            &[
                ("content-type", "application/x-amz-json-1.1"),
                ("x-amz-target", target.as_str()),
            ],
            body,
        )?;

        if !(200..300).contains(&status) {
            let parsed: Option<JsonErrorBody> = serde_json::from_str(&response_body).ok();
            let (code, message) = match parsed {
                Some(err) => (
                    err.error_type
                        .map(|t| t.rsplit('#').next().unwrap_or_default().to_string())
                        .unwrap_or_default(),
                    err.message.unwrap_or_else(|| response_body.clone()),
                ),
                None => (String::new(), response_body),
            };
            return Err(Error::Api {
                service: endpoint.service,
                action: action.to_string(),
                status,
                code,
                message,
            });
        }

        serde_json::from_str(&response_body).map_err(|e| Error::Decode {
            service: endpoint.service,
            action: action.to_string(),
            reason: format!("{} - Body: {}", e, response_body),
        })
    }

    /// Call a query protocol action and return the raw XML body.
    pub fn query(
        &self,
        endpoint: &Endpoint,
        action: &str,
        version: &str,
        params: &[(&str, &str)],
    ) -> Result<String> {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("Action", action);
        form.append_pair("Version", version);
        for (key, value) in params {
            form.append_pair(key, value);
        }
        let body = form.finish();

        let (status, response_body) = self.send(
            endpoint,
            action,
            &[("content-type", "application/x-www-form-urlencoded; charset=utf-8")],
            body,
        )?;

        if !(200..300).contains(&status) {
            return Err(Error::Api {
                service: endpoint.service,
                action: action.to_string(),
                status,
                code: xml::first(&response_body, "Code").unwrap_or_default(),
                message: xml::first(&response_body, "Message").unwrap_or(response_body),
            });
        }

        Ok(response_body)
    }

    /// Sign and send a POST request, returning the status and body.
    fn send(
        &self,
        endpoint: &Endpoint,
        action: &str,
        headers: &[(&str, &str)],
        body: String,
    ) -> Result<(u16, String)> {
        let url = endpoint.url();

        let aws_creds = aws_credential_types::Credentials::new(
            &self.credentials.access_key_id,
            &self.credentials.secret_access_key,
            self.credentials.session_token.clone(),
            None,
            "osd-utils-cli",
        );
        let identity: Identity = aws_creds.into();

        let signing_params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&endpoint.region)
            .name(endpoint.service)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| Error::Signing(e.to_string()))?;

        let signable_headers = headers
            .iter()
            .copied()
            .chain(std::iter::once(("host", endpoint.host.as_str())));
        let signable_request = SignableRequest::new(
            "POST",
            &url,
            signable_headers,
            SignableBody::Bytes(body.as_bytes()),
        )
        .map_err(|e| Error::Signing(e.to_string()))?;

        let (signing_instructions, _signature) = sign(signable_request, &signing_params.into())
            .map_err(|e| Error::Signing(e.to_string()))?
            .into_parts();

        let mut request_builder = self.client.post(&url).body(body);
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }
        for (name, value) in signing_instructions.headers() {
            let header_name: &str = name.as_ref();
            let header_value: &str = value.as_ref();
            request_builder = request_builder.header(header_name, header_value);
        }

        debug!(service = endpoint.service, action, "Executing AWS API request");

        let response = request_builder.send().map_err(|source| Error::Http {
            service: endpoint.service,
            source,
        })?;

        let status = response.status().as_u16();
        let response_body = response.text().map_err(|source| Error::Http {
            service: endpoint.service,
            source,
        })?;

        debug!(service = endpoint.service, action, status, "AWS API response");

        Ok((status, response_body))
    }
}
