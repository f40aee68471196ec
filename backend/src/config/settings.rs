//! Server settings loaded via OrthoConfig.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::access::Role;
use crate::domain::{AccountDraft, EmailAddress, Password, Username, ValidationError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";

/// Values controlling where the server listens and the first admin account.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLINIC")]
pub struct ClinicSettings {
    /// Socket address for the HTTP listener.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// Username of an administrator created at startup when absent.
    pub bootstrap_admin_username: Option<String>,
    /// Password for the bootstrap administrator.
    pub bootstrap_admin_password: Option<String>,
    /// Email for the bootstrap administrator.
    pub bootstrap_admin_email: Option<String>,
}

impl ClinicSettings {
    /// Parse the configured bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.trim().parse()
    }

    /// Account to seed when both a bootstrap username and password are set.
    pub fn bootstrap_admin(&self) -> Result<Option<AccountDraft>, ValidationError> {
        let (Some(username), Some(password)) = (
            self.bootstrap_admin_username.as_deref(),
            self.bootstrap_admin_password.as_deref(),
        ) else {
            return Ok(None);
        };
        Ok(Some(AccountDraft {
            username: Username::new(username)?,
            email: EmailAddress::new(
                self.bootstrap_admin_email
                    .as_deref()
                    .unwrap_or(DEFAULT_ADMIN_EMAIL),
            )?,
            role: Role::admin(),
            password: Password::new(password)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "CLINIC_BIND_ADDR",
        "CLINIC_BOOTSTRAP_ADMIN_USERNAME",
        "CLINIC_BOOTSTRAP_ADMIN_PASSWORD",
        "CLINIC_BOOTSTRAP_ADMIN_EMAIL",
    ];

    fn load_from_empty_args() -> ClinicSettings {
        ClinicSettings::load_from_iter([OsString::from("clinic")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid")
        );
        assert_eq!(settings.bootstrap_admin(), Ok(None));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CLINIC_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("CLINIC_BOOTSTRAP_ADMIN_USERNAME", Some("root".to_owned())),
            ("CLINIC_BOOTSTRAP_ADMIN_PASSWORD", Some("changeme".to_owned())),
            ("CLINIC_BOOTSTRAP_ADMIN_EMAIL", None),
        ]);

        let settings = load_from_empty_args();
        let admin = settings
            .bootstrap_admin()
            .expect("valid admin")
            .expect("admin configured");

        assert_eq!(settings.bind_addr().expect("parses").port(), 9000);
        assert_eq!(admin.username.as_ref(), "root");
        assert_eq!(admin.email.as_ref(), DEFAULT_ADMIN_EMAIL);
        assert_eq!(admin.role, Role::admin());
    }

    #[rstest]
    fn username_without_password_seeds_nothing() {
        let _guard = lock_env([
            ("CLINIC_BIND_ADDR", None),
            ("CLINIC_BOOTSTRAP_ADMIN_USERNAME", Some("root".to_owned())),
            ("CLINIC_BOOTSTRAP_ADMIN_PASSWORD", None),
            ("CLINIC_BOOTSTRAP_ADMIN_EMAIL", None),
        ]);

        assert_eq!(load_from_empty_args().bootstrap_admin(), Ok(None));
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([
            ("CLINIC_BIND_ADDR", Some("not-an-address".to_owned())),
            ("CLINIC_BOOTSTRAP_ADMIN_USERNAME", None),
            ("CLINIC_BOOTSTRAP_ADMIN_PASSWORD", None),
            ("CLINIC_BOOTSTRAP_ADMIN_EMAIL", None),
        ]);

        assert!(load_from_empty_args().bind_addr().is_err());
    }
}
