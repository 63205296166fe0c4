use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::request::ActivationRequest;
use super::runner::{CommandOutput, CommandRunner};
use super::status::LicenseStatus;
use crate::credentials::Credentials;
use crate::errors::{CristieError, CristieResult};
use crate::logging::{log_license_event, LicenseEvent};
use crate::product::Product;
use crate::validation::validate_code;

/// Outcome of one activation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationResult {
    pub changed: bool,
    pub msg: String,
    pub product: Product,
    pub status_before: LicenseStatus,
    pub status_after: LicenseStatus,
}

/// Drives licmgr for one product.
#[derive(Debug, Clone)]
pub struct Activator<R> {
    runner: R,
    licmgr_path: PathBuf,
    product: Product,
}

impl<R: CommandRunner> Activator<R> {
    pub fn new(runner: R, licmgr_path: impl Into<PathBuf>, product: Product) -> Self {
        Self {
            runner,
            licmgr_path: licmgr_path.into(),
            product,
        }
    }

    pub fn licmgr_path(&self) -> &Path {
        &self.licmgr_path
    }

    /// Ask licmgr for the product's current license status.
    ///
    /// A status that is neither trial nor full is an error; it needs a human
    /// to look at the licmgr output.
    pub async fn get_license_status(&self) -> CristieResult<LicenseStatus> {
        if !self.licmgr_path.is_file() {
            return Err(CristieError::LicenseManagerMissing(self.licmgr_path.clone()));
        }

        let output = self
            .invoke(
                "reading license status",
                vec!["-p".to_string(), self.product.code().to_string()],
            )
            .await?;

        match LicenseStatus::from_output(&output.stdout) {
            LicenseStatus::Unknown => Err(CristieError::UnknownLicenceStatus {
                stdout: output.stdout,
            }),
            status => {
                log_license_event(
                    LicenseEvent::StatusRead,
                    self.product,
                    Some(status.to_string().as_str()),
                );
                Ok(status)
            }
        }
    }

    /// Register a contract code, then attach portal credentials.
    pub async fn activate_online(
        &self,
        contract: &str,
        credentials: &Credentials,
    ) -> CristieResult<ActivationResult> {
        credentials.validate()?;
        validate_code(contract, "contract_code")?;

        let before = self.get_license_status().await?;
        let code = self.product.code().to_string();

        self.invoke(
            "registering the contract code",
            vec!["-p".to_string(), code.clone(), "--cid".to_string(), contract.to_string()],
        )
        .await?;
        log_license_event(LicenseEvent::ContractRegistered, self.product, None);

        self.invoke(
            "attaching portal credentials",
            vec![
                "-p".to_string(),
                code,
                "--cred".to_string(),
                format!("{},{}", credentials.username, credentials.password),
            ],
        )
        .await?;
        log_license_event(
            LicenseEvent::CredentialsAttached,
            self.product,
            Some(credentials.username.as_str()),
        );

        self.finish(before).await
    }

    /// Apply an offline activation code.
    pub async fn activate_offline(&self, activation_code: &str) -> CristieResult<ActivationResult> {
        validate_code(activation_code, "act_code")?;

        let before = self.get_license_status().await?;

        self.invoke(
            "applying the activation code",
            vec![
                "-p".to_string(),
                self.product.catalog_key().to_string(),
                "--act".to_string(),
                activation_code.to_string(),
            ],
        )
        .await?;
        log_license_event(LicenseEvent::CodeApplied, self.product, None);

        self.finish(before).await
    }

    pub async fn activate(&self, request: &ActivationRequest) -> CristieResult<ActivationResult> {
        match request {
            ActivationRequest::Online {
                contract,
                credentials,
            } => self.activate_online(contract, credentials).await,
            ActivationRequest::Offline { activation_code } => {
                self.activate_offline(activation_code).await
            }
        }
    }

    async fn finish(&self, before: LicenseStatus) -> CristieResult<ActivationResult> {
        let after = self.get_license_status().await?;
        let changed = after != before;

        let event = if changed {
            LicenseEvent::Activated
        } else {
            LicenseEvent::Unchanged
        };
        log_license_event(event, self.product, Some(format!("{before} -> {after}").as_str()));

        Ok(ActivationResult {
            changed,
            msg: format!("Successfully licensed {}", self.product),
            product: self.product,
            status_before: before,
            status_after: after,
        })
    }

    /// Run licmgr and fail on a non-zero exit.
    async fn invoke(&self, stage: &'static str, args: Vec<String>) -> CristieResult<CommandOutput> {
        debug!(stage, flags = %redacted(&args), "Running licmgr");

        let output = self.runner.run(&self.licmgr_path, &args).await?;
        if !output.is_success() {
            log_license_event(LicenseEvent::Failed, self.product, Some(stage));
            return Err(CristieError::LicenseManagerError {
                stage,
                exit_code: output.exit_code,
                detail: output.diagnostic(),
            });
        }

        Ok(output)
    }
}

/// Argument list for logs with the `--cred` value masked.
fn redacted(args: &[String]) -> String {
    let mut out = Vec::with_capacity(args.len());
    let mut mask_next = false;
    for arg in args {
        if mask_next {
            out.push("********");
        } else {
            out.push(arg.as_str());
        }
        mask_next = arg == "--cred";
    }
    out.join(" ")
}
