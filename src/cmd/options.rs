//! AWS flags shared by the cost commands and the AWS-backed account commands.

use clap::Args;
use std::io::Write;
use tracing::debug;

use super::validation::{self, CREDENTIAL_PAIR};
use crate::aws::{self, AwsClientInput, Client, ClientBuilder};
use crate::error::Error;

/// Region used when --aws-region is not given
pub const DEFAULT_REGION: &str = "us-east-1";

/// AWS credential and region flags
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AwsOptions {
    /// AWS Access Key ID
    #[arg(
        short = 'a',
        long = "aws-access-key-id",
        default_value = "",
        hide_default_value = true,
        global = true
    )]
    pub access_key_id: String,

    /// AWS Secret Access Key
    #[arg(
        short = 'x',
        long = "aws-secret-access-key",
        default_value = "",
        hide_default_value = true,
        global = true
    )]
    pub secret_access_key: String,

    /// specify AWS profile
    #[arg(
        short = 'p',
        long = "aws-profile",
        default_value = "",
        hide_default_value = true,
        global = true
    )]
    pub profile: String,

    /// specify AWS config file path
    #[arg(
        short = 'c',
        long = "aws-config",
        default_value = "",
        hide_default_value = true,
        global = true
    )]
    pub config_file: String,

    /// specify AWS region
    #[arg(short = 'g', long = "aws-region", default_value = DEFAULT_REGION, global = true)]
    pub region: String,
}

impl Default for AwsOptions {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            profile: String::new(),
            config_file: String::new(),
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl AwsOptions {
    /// Validate the credential flags. Runs before any subcommand touches AWS.
    /// The fallback notice goes to `notice`; commands whose stdout is meant
    /// for machines pass their error stream.
    pub fn complete(&self, command_path: &str, notice: &mut dyn Write) -> Result<(), Error> {
        validation::evaluate(
            [(
                &CREDENTIAL_PAIR,
                [self.access_key_id.as_str(), self.secret_access_key.as_str()],
            )],
            command_path,
        )?;

        if self.uses_default_chain() {
            writeln!(
                notice,
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY are not provided, reading credentials from config file or env vars."
            )?;
        }

        Ok(())
    }

    fn uses_default_chain(&self) -> bool {
        self.access_key_id.is_empty() && self.secret_access_key.is_empty()
    }

    /// Build the AWS client from the flag credentials if given, else from the
    /// profile, config file and environment.
    pub fn init_aws_clients(&self, builder: &dyn ClientBuilder) -> aws::error::Result<Box<dyn Client>> {
        if self.uses_default_chain() {
            debug!(profile = %self.profile, region = %self.region, "Using profile credentials");
            builder.new_aws_client(&self.profile, &self.region, &self.config_file)
        } else {
            debug!(region = %self.region, "Using credentials from flags");
            builder.new_aws_client_with_input(&AwsClientInput {
                access_key_id: self.access_key_id.clone(),
                secret_access_key: self.secret_access_key.clone(),
                session_token: None,
                region: self.region.clone(),
            })
        }
    }
}
