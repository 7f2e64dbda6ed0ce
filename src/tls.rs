//! HTTPS listener: rustls acceptor in front of the axum router.

use anyhow::Context;
use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;

use crate::config::TlsConfig;

/// Adapts a cloneable tower service to hyper's `&self` service trait
#[derive(Clone)]
pub struct TowerToHyperService<S> {
    service: S,
}

impl<S, R> hyper::service::Service<R> for TowerToHyperService<S>
where
    S: tower::Service<R> + Clone,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn call(&self, req: R) -> Self::Future {
        self.service.clone().call(req)
    }
}

/// Client hang-ups that are not worth logging
pub fn is_common_connection_error(err: &dyn std::error::Error) -> bool {
    let s = format!("{:?}", err);
    s.contains("BrokenPipe")
        || s.contains("ConnectionReset")
        || s.contains("UnexpectedEof")
        || s.contains("ConnectionAborted")
        || s.contains("NotConnected")
        || s.contains("TimedOut")
        || s.contains("IncompleteMessage")
}

fn load_cert_chain(cert_path: &Path, chain_path: Option<&Path>) -> anyhow::Result<Vec<CertificateDer<'static>>> {
    let cert_file = &mut BufReader::new(
        File::open(cert_path).with_context(|| format!("failed to open {}", cert_path.display()))?,
    );
    let mut cert_chain = rustls_pemfile::certs(cert_file).collect::<Result<Vec<_>, _>>()?;

    if let Some(cp) = chain_path {
        let chain_file = &mut BufReader::new(
            File::open(cp).with_context(|| format!("failed to open {}", cp.display()))?,
        );
        let extra_certs = rustls_pemfile::certs(chain_file).collect::<Result<Vec<_>, _>>()?;
        cert_chain.extend(extra_certs);
    }

    if cert_chain.is_empty() {
        anyhow::bail!("No certificates found in {}", cert_path.display());
    }
    Ok(cert_chain)
}

fn load_private_key(key_path: &Path) -> anyhow::Result<PrivateKeyDer<'static>> {
    let key_file = &mut BufReader::new(
        File::open(key_path).with_context(|| format!("failed to open {}", key_path.display()))?,
    );
    rustls_pemfile::private_key(key_file)?
        .ok_or_else(|| anyhow::anyhow!("No private keys found in {}", key_path.display()))
}

pub fn acceptor(tls: &TlsConfig) -> anyhow::Result<TlsAcceptor> {
    let cert_chain = load_cert_chain(&tls.cert_file, tls.chain_file.as_deref())?;
    let key = load_private_key(&tls.key_file)?;

    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, key)
        .context("invalid certificate or private key")?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

/// Accept TLS connections forever, serving each one on its own task
pub async fn serve(addr: SocketAddr, acceptor: TlsAcceptor, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "HTTPS listening");

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(s) => s,
            Err(_) => continue,
        };

        let acceptor = acceptor.clone();
        let app = app.clone();

        tokio::spawn(async move {
            match acceptor.accept(stream).await {
                Ok(tls_stream) => {
                    let io = TokioIo::new(tls_stream);
                    let service = TowerToHyperService { service: app };

                    if let Err(err) = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new())
                        .serve_connection(io, service)
                        .await
                    {
                        if !is_common_connection_error(err.as_ref()) {
                            tracing::warn!("error serving connection: {:?}", err);
                        }
                    }
                }
                Err(e) => {
                    if !is_common_connection_error(&e) {
                        tracing::warn!("TLS accept error: {}", e);
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn hang_ups_are_common() {
        let err = io::Error::new(io::ErrorKind::ConnectionReset, "peer went away");
        assert!(is_common_connection_error(&err));
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(!is_common_connection_error(&err));
    }

    #[test]
    fn missing_certificate_is_reported() {
        let tls = TlsConfig {
            port: 4443,
            cert_file: PathBuf::from("/nonexistent/cert.pem"),
            key_file: PathBuf::from("/nonexistent/key.pem"),
            chain_file: None,
        };
        let err = acceptor(&tls).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/cert.pem"));
    }

    #[test]
    fn pem_without_keys_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pem");
        std::fs::write(&path, "").unwrap();
        assert!(load_private_key(&path).is_err());
        assert!(load_cert_chain(&path, None).is_err());
    }
}
