//! STS AssumeRole and console federation

use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::{Error, Result};
use super::transport::{Endpoint, Transport};
use super::{xml, Credentials};

const VERSION: &str = "2011-06-15";
const FEDERATION_URL: &str = "https://signin.aws.amazon.com/federation";
const CONSOLE_URL: &str = "https://console.aws.amazon.com/";

fn endpoint() -> Endpoint {
    Endpoint::global("sts", "sts.amazonaws.com")
}

/// Temporary credentials returned by AssumeRole
#[derive(Debug, Clone)]
pub struct AssumedRole {
    pub credentials: Credentials,
    pub expiration: Option<String>,
}

pub(crate) fn assume_role(
    t: &Transport,
    role_arn: &str,
    session_name: &str,
    duration_seconds: u32,
) -> Result<AssumedRole> {
    let duration = duration_seconds.to_string();
    let body = t.query(
        &endpoint(),
        "AssumeRole",
        VERSION,
        &[
            ("RoleArn", role_arn),
            ("RoleSessionName", session_name),
            ("DurationSeconds", duration.as_str()),
        ],
    )?;

    let field = |name: &str| {
        xml::first(&body, name).ok_or_else(|| Error::Decode {
            service: "sts",
            action: "AssumeRole".to_string(),
            reason: format!("missing {}", name),
        })
    };

    Ok(AssumedRole {
        credentials: Credentials {
            access_key_id: field("AccessKeyId")?,
            secret_access_key: field("SecretAccessKey")?,
            session_token: Some(field("SessionToken")?),
            region: t.region().to_string(),
        },
        expiration: xml::first(&body, "Expiration"),
    })
}

/// Session document expected by the federation endpoint
#[derive(Serialize)]
struct FederationSession<'a> {
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    #[serde(rename = "sessionKey")]
    session_key: &'a str,
    #[serde(rename = "sessionToken")]
    session_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SigninTokenResponse {
    signin_token: String,
}

/// URL that exchanges temporary credentials for a sign-in token.
pub fn signin_token_url(credentials: &Credentials, duration_seconds: u32) -> Result<Url> {
    let session = serde_json::to_string(&FederationSession {
        session_id: &credentials.access_key_id,
        session_key: &credentials.secret_access_key,
        session_token: credentials.session_token.as_deref().unwrap_or_default(),
    })
    .map_err(|e| Error::Decode {
        service: "signin",
        action: "getSigninToken".to_string(),
        reason: e.to_string(),
    })?;

    let duration = duration_seconds.to_string();
    Url::parse_with_params(
        FEDERATION_URL,
        &[
            ("Action", "getSigninToken"),
            ("SessionDuration", duration.as_str()),
            ("Session", session.as_str()),
        ],
    )
    .map_err(|e| Error::Decode {
        service: "signin",
        action: "getSigninToken".to_string(),
        reason: e.to_string(),
    })
}

/// Console login URL for a sign-in token.
pub fn console_login_url(signin_token: &str, issuer: &str) -> Result<Url> {
    Url::parse_with_params(
        FEDERATION_URL,
        &[
            ("Action", "login"),
            ("Issuer", issuer),
            ("Destination", CONSOLE_URL),
            ("SigninToken", signin_token),
        ],
    )
    .map_err(|e| Error::Decode {
        service: "signin",
        action: "login".to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn get_signin_token(credentials: &Credentials, duration_seconds: u32) -> Result<String> {
    let url = signin_token_url(credentials, duration_seconds)?;
    let http = |source: reqwest::Error| Error::Http {
        service: "signin",
        source,
    };

    debug!("Requesting federation sign-in token");

    let response = HttpClient::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(http)?
        .get(url)
        .send()
        .map_err(http)?;

    let status = response.status().as_u16();
    let body = response.text().map_err(http)?;
    if !(200..300).contains(&status) {
        return Err(Error::Api {
            service: "signin",
            action: "getSigninToken".to_string(),
            status,
            code: String::new(),
            message: body,
        });
    }

    let parsed: SigninTokenResponse = serde_json::from_str(&body).map_err(|e| Error::Decode {
        service: "signin",
        action: "getSigninToken".to_string(),
        reason: e.to_string(),
    })?;
    Ok(parsed.signin_token)
}
