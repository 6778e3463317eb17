use secrecy::{ExposeSecret, SecretBox, SecretString};

/// Key material that must not leak through `Debug` output.
pub struct SecretBytes {
    inner: SecretBox<Vec<u8>>,
}

impl SecretBytes {
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { inner: SecretBox::new(Box::new(data)) }
    }

    pub fn expose_secret(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([... {} bytes ...])", self.len())
    }
}

/// A passphrase as typed by the user or passed with `--passphrase`.
pub struct Secret {
    inner: SecretString,
}

impl Secret {
    pub fn new(passphrase: &str) -> Self {
        Self { inner: SecretString::from(passphrase.to_owned()) }
    }

    pub fn from_string(passphrase: String) -> Self {
        Self { inner: SecretString::from(passphrase) }
    }

    pub fn expose_secret(&self) -> &str {
        self.inner.expose_secret()
    }

    /// Raw passphrase octets as fed to the S2K hash.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.expose_secret().as_bytes()
    }
}

impl From<SecretString> for Secret {
    fn from(secret: SecretString) -> Self {
        Self { inner: secret }
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_bytes_debug_redacts() {
        let secret = SecretBytes::from_vec(vec![1, 2, 3]);
        assert_eq!(format!("{secret:?}"), "SecretBytes([... 3 bytes ...])");
        assert_eq!(secret.expose_secret(), &[1, 2, 3]);
    }

    #[test]
    fn test_secret_passphrase() {
        let secret = Secret::new("correct horse");
        assert_eq!(secret.as_bytes(), b"correct horse");
        assert!(!format!("{secret:?}").contains("horse"));
        assert_eq!(Secret::from(SecretString::from("x".to_owned())).expose_secret(), "x");
    }
}
