use crate::credentials::Credentials;
use crate::errors::{CristieError, CristieResult};

/// How to activate: online with a contract code and portal credentials, or
/// offline with an activation code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationRequest {
    Online {
        contract: String,
        credentials: Credentials,
    },
    Offline {
        activation_code: String,
    },
}

impl ActivationRequest {
    /// Decide the activation type from the optional module fields.
    ///
    /// Empty strings count as absent. Online wins when username, password
    /// and contract are all set; otherwise an activation code means offline.
    /// Credentials without a contract code, and nothing usable at all, fail
    /// with different errors.
    pub fn from_fields(
        username: Option<&str>,
        password: Option<&str>,
        contract: Option<&str>,
        activation_code: Option<&str>,
    ) -> CristieResult<Self> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }

        let username = present(username);
        let password = present(password);

        if let (Some(user), Some(pass), Some(contract)) = (username, password, present(contract)) {
            return Ok(ActivationRequest::Online {
                contract: contract.to_string(),
                credentials: Credentials::new(user, pass),
            });
        }

        if let Some(code) = present(activation_code) {
            return Ok(ActivationRequest::Offline {
                activation_code: code.to_string(),
            });
        }

        if username.is_some() && password.is_some() {
            return Err(CristieError::ContractCodeMissing);
        }

        Err(CristieError::ActivationTypeAmbiguous)
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ActivationRequest::Online { .. })
    }
}
