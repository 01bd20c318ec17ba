//! [`Cluster`] backed by the `kubectl` binary.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{debug, instrument};

use super::types::{
    Account, AccountClaim, List, ObjectMeta, Secret, ACCOUNT_CLAIM_RESOURCE, ACCOUNT_NAMESPACE,
    ACCOUNT_RESOURCE,
};
use super::{Cluster, Error, Result};

/// Runs `kubectl` against the current (or given) kubeconfig context.
#[derive(Debug, Clone, Default)]
pub struct KubectlCluster {
    kubeconfig: Option<String>,
    context: Option<String>,
}

/// Metadata-only view used when listing secrets.
#[derive(serde::Deserialize)]
struct SecretMeta {
    metadata: ObjectMeta,
}

impl KubectlCluster {
    pub fn new(kubeconfig: Option<String>, context: Option<String>) -> Self {
        Self {
            kubeconfig,
            context,
        }
    }

    /// Global arguments followed by `args`.
    fn args<'a>(&'a self, args: &[&'a str]) -> Vec<&'a str> {
        let mut all = Vec::with_capacity(args.len() + 4);
        if let Some(kubeconfig) = &self.kubeconfig {
            all.extend(["--kubeconfig", kubeconfig.as_str()]);
        }
        if let Some(context) = &self.context {
            all.extend(["--context", context.as_str()]);
        }
        all.extend_from_slice(args);
        all
    }

    #[instrument(skip(self, stdin))]
    fn run(&self, args: &[&str], stdin: Option<&str>) -> Result<String> {
        let start = Instant::now();
        let mut child = Command::new("kubectl")
            .args(self.args(args))
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        debug!(
            exit_code = output.status.code().unwrap_or(-1),
            duration_ms = start.elapsed().as_millis() as u64,
            "kubectl finished"
        );

        if output.status.success() {
            return Ok(stdout);
        }
        if is_not_found(&stderr) {
            return Err(Error::NotFound(stderr));
        }
        Err(Error::NonZeroExit {
            code: output.status.code().unwrap_or(-1),
            stderr,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let mut full: Vec<&str> = vec!["get"];
        full.extend_from_slice(args);
        full.extend(["-o", "json"]);
        let stdout = self.run(&full, None)?;
        Ok(serde_json::from_str(&stdout)?)
    }

    fn patch(&self, name: &str, patch: &Value, subresource: Option<&str>) -> Result<()> {
        let patch = patch.to_string();
        let mut args = vec![
            "patch",
            ACCOUNT_RESOURCE,
            name,
            "-n",
            ACCOUNT_NAMESPACE,
            "--type",
            "merge",
            "-p",
            patch.as_str(),
        ];
        if let Some(subresource) = subresource {
            args.extend(["--subresource", subresource]);
        }
        self.run(&args, None)?;
        Ok(())
    }
}

/// kubectl marks a missing object with the API status reason, e.g.
/// `Error from server (NotFound): accounts... "x" not found`.
fn is_not_found(stderr: &str) -> bool {
    stderr.contains("(NotFound)")
}

impl Cluster for KubectlCluster {
    fn list_accounts(&self) -> Result<Vec<Account>> {
        let list: List<Account> = self.get_json(&[ACCOUNT_RESOURCE, "-n", ACCOUNT_NAMESPACE])?;
        Ok(list.items)
    }

    fn get_account(&self, name: &str) -> Result<Account> {
        self.get_json(&[ACCOUNT_RESOURCE, name, "-n", ACCOUNT_NAMESPACE])
    }

    fn list_account_claims(&self) -> Result<Vec<AccountClaim>> {
        let list: List<AccountClaim> = self.get_json(&[ACCOUNT_CLAIM_RESOURCE, "--all-namespaces"])?;
        Ok(list.items)
    }

    fn get_account_claim(&self, namespace: &str, name: &str) -> Result<AccountClaim> {
        self.get_json(&[ACCOUNT_CLAIM_RESOURCE, name, "-n", namespace])
    }

    fn patch_account(&self, name: &str, patch: &Value) -> Result<()> {
        self.patch(name, patch, None)
    }

    fn patch_account_status(&self, name: &str, patch: &Value) -> Result<()> {
        self.patch(name, patch, Some("status"))
    }

    fn list_secret_names(&self, namespace: &str) -> Result<Vec<String>> {
        let list: List<SecretMeta> = self.get_json(&["secrets", "-n", namespace])?;
        Ok(list.items.into_iter().map(|s| s.metadata.name).collect())
    }

    fn apply_secret(&self, secret: &Secret) -> Result<()> {
        let manifest = serde_json::to_string(secret)?;
        self.run(&["apply", "-f", "-"], Some(&manifest))?;
        Ok(())
    }

    fn delete_secret(&self, namespace: &str, name: &str) -> Result<()> {
        self.run(
            &["delete", "secret", name, "-n", namespace, "--ignore-not-found"],
            None,
        )?;
        Ok(())
    }
}
