use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};

use crate::config::SecurityConfig;

/// The single account allowed to use the API. Loaded once at startup
/// and shared read-only with the auth middleware.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: String,
    pub role: String,
    pub realm: String,
}

/// Username/password pair decoded from an `Authorization: Basic` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BasicAuthError {
    #[error("Missing Authorization header")]
    Missing,
    #[error("Authorization header must use Basic scheme")]
    WrongScheme,
    #[error("Malformed Basic credentials")]
    Malformed,
    #[error("Bad credentials")]
    BadCredentials,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role: role.into(),
            realm: realm.into(),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            security.username.clone(),
            security.password.clone(),
            security.role.clone(),
            security.realm.clone(),
        )
    }

    /// Both halves are always compared, as fixed-length digests.
    pub fn verify(&self, candidate: &BasicCredentials) -> Result<(), BasicAuthError> {
        let user_ok = digest(&candidate.username) == digest(&self.username);
        let pass_ok = digest(&candidate.password) == digest(&self.password);
        if user_ok & pass_ok {
            Ok(())
        } else {
            Err(BasicAuthError::BadCredentials)
        }
    }

    /// Value for the `WWW-Authenticate` challenge header.
    pub fn challenge(&self) -> String {
        format!("Basic realm=\"{}\"", self.realm.replace('"', ""))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .field("role", &self.role)
            .field("realm", &self.realm)
            .finish()
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

impl BasicCredentials {
    /// Parse the raw value of an Authorization header.
    pub fn parse(header: &str) -> Result<Self, BasicAuthError> {
        let (scheme, encoded) = header
            .trim()
            .split_once(' ')
            .ok_or(BasicAuthError::WrongScheme)?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(BasicAuthError::WrongScheme);
        }

        let decoded = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|_| BasicAuthError::Malformed)?;
        let decoded = String::from_utf8(decoded).map_err(|_| BasicAuthError::Malformed)?;

        // Passwords may contain ':'; user names may not.
        let (username, password) = decoded.split_once(':').ok_or(BasicAuthError::Malformed)?;
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(creds: &BasicCredentials) -> String {
        let raw = format!("{}:{}", creds.username, creds.password);
        format!("Basic {}", general_purpose::STANDARD.encode(raw))
    }

    fn demo() -> Credentials {
        Credentials::new("demo", "password", "USER", "inventory")
    }

    #[test]
    fn parses_basic_header() {
        // base64("demo:password")
        let creds = BasicCredentials::parse("Basic ZGVtbzpwYXNzd29yZA==").unwrap();
        assert_eq!(creds.username, "demo");
        assert_eq!(creds.password, "password");
        assert!(demo().verify(&creds).is_ok());
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert!(BasicCredentials::parse("basic ZGVtbzpwYXNzd29yZA==").is_ok());
    }

    #[test]
    fn password_may_contain_colons() {
        let creds = BasicCredentials {
            username: "demo".into(),
            password: "a:b:c".into(),
        };
        assert_eq!(BasicCredentials::parse(&encode(&creds)).unwrap(), creds);
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(
            BasicCredentials::parse("Bearer abc.def"),
            Err(BasicAuthError::WrongScheme)
        );
        assert_eq!(BasicCredentials::parse("Basic"), Err(BasicAuthError::WrongScheme));
        assert_eq!(
            BasicCredentials::parse("Basic !!not-base64!!"),
            Err(BasicAuthError::Malformed)
        );
        // base64("nocolon")
        assert_eq!(
            BasicCredentials::parse("Basic bm9jb2xvbg=="),
            Err(BasicAuthError::Malformed)
        );
    }

    #[test]
    fn wrong_password_or_user_is_rejected() {
        let wrong_pass = BasicCredentials {
            username: "demo".into(),
            password: "nope".into(),
        };
        let wrong_user = BasicCredentials {
            username: "admin".into(),
            password: "password".into(),
        };
        assert_eq!(demo().verify(&wrong_pass), Err(BasicAuthError::BadCredentials));
        assert_eq!(demo().verify(&wrong_user), Err(BasicAuthError::BadCredentials));
    }

    #[test]
    fn debug_output_hides_password() {
        assert!(!format!("{:?}", demo()).contains("\"password\""));
    }

    #[test]
    fn challenge_names_realm() {
        assert_eq!(demo().challenge(), "Basic realm=\"inventory\"");
    }
}
