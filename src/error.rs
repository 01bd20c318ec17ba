//! Errors reported by the command layer.

use thiserror::Error;

use crate::aws;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid flags; nothing has been sent anywhere yet.
    #[error("{message}\nSee '{command_path} -h' for help and examples")]
    Usage {
        message: String,
        command_path: String,
    },

    /// DescribeOrganizationalUnit failed.
    #[error("Cannot get Organizational Unit {id}")]
    OrganizationalUnitLookup {
        id: String,
        #[source]
        source: aws::Error,
    },

    /// Writing to an output stream failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn usage(command_path: &str, message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            command_path: command_path.to_string(),
        }
    }
}
