//! AWS module for credentials, request signing and the service calls the commands use

pub mod client;
pub mod cost_explorer;
pub mod credentials;
mod ec2;
pub mod error;
pub mod iam;
pub mod organizations;
pub mod sts;
mod transport;
mod xml;

#[cfg(test)]
pub mod fake;

pub use client::{collect_pages, AwsClientInput, Client, ClientBuilder, DefaultClientBuilder};
pub use cost_explorer::{Cost, TimePeriod};
pub use credentials::Credentials;
pub use error::Error;
pub use organizations::OrganizationalUnit;
