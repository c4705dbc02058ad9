//! TLS setup for the TCP control interface
//!
//! Both ends authenticate: the server certificate must chain to the
//! configured CA and the client presents its own certificate.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ClientConfig, RootCertStore};

use crate::config::Config;
use crate::error::{ControlError, Result};

fn open_pem(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| ControlError::Certificate {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// Load every certificate in a PEM file
pub fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = open_pem(path)?;
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| ControlError::Certificate {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    if certs.is_empty() {
        return Err(ControlError::Certificate {
            path: path.display().to_string(),
            reason: "no certificates found".to_string(),
        });
    }
    Ok(certs)
}

/// Load the first private key (PKCS#1, PKCS#8 or SEC1) in a PEM file
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let mut reader = open_pem(path)?;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| ControlError::Certificate {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?
        .ok_or_else(|| ControlError::Certificate {
            path: path.display().to_string(),
            reason: "no private key found (expected PKCS1, PKCS8, or SEC1)".to_string(),
        })
}

/// Build a mutually authenticated client configuration
pub fn client_config(config: &Config) -> Result<Arc<ClientConfig>> {
    let ca_path = required(&config.server_ca, "server CA (--ca)")?;
    let cert_path = required(&config.client_cert, "client certificate (--client-cert)")?;
    let key_path = required(&config.client_key, "client key (--client-key)")?;

    let mut roots = RootCertStore::empty();
    for cert in load_certs(ca_path)? {
        roots.add(cert)?;
    }

    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let tls_config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_client_auth_cert(certs, key)?;

    Ok(Arc::new(tls_config))
}

fn required<'a>(path: &'a Option<std::path::PathBuf>, what: &str) -> Result<&'a Path> {
    path.as_deref()
        .ok_or_else(|| ControlError::Config(format!("missing {} for TLS control interface", what)))
}
