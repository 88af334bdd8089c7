//! Serves the `trunk build` output of the front end, with SPA fallback.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{anyhow, Context};
use log::info;
use once_cell::sync::Lazy;
use rustls::{
    pki_types::{CertificateDer, PrivateKeyDer},
    server::ServerConfig,
};
use rustls_pemfile::{certs, private_key};

/* ---------- réglages ---------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    host: String,
    port: u16,
    dist_dir: PathBuf,
    tls: Option<(PathBuf, PathBuf)>,
}

impl Settings {
    /// Reads the settings through `var`, so tests can feed a map instead of the process env.
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match var("STATIC_PORT") {
            Some(p) => p.trim().parse().with_context(|| format!("STATIC_PORT is not a port: {p}"))?,
            None => 8444,
        };
        let tls = match (var("TLS_CERT"), var("TLS_KEY")) {
            (Some(cert), Some(key)) => Some((PathBuf::from(cert), PathBuf::from(key))),
            (None, None) => None,
            _ => return Err(anyhow!("TLS_CERT and TLS_KEY must be set together")),
        };
        Ok(Settings {
            host: var("STATIC_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            dist_dir: var("DIST_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("../frontend/dist")),
            tls,
        })
    }

    fn index(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }
}

static SETTINGS: Lazy<anyhow::Result<Settings>> = Lazy::new(|| Settings::from_lookup(|k| std::env::var(k).ok()));

/* ---------- TLS --------------------------------------------------------- */

fn build_tls_config(cert_path: &Path, key_path: &Path) -> anyhow::Result<ServerConfig> {
    let mut r = BufReader::new(File::open(cert_path).with_context(|| format!("open {}", cert_path.display()))?);
    let chain: Vec<CertificateDer<'static>> = certs(&mut r)
        .collect::<Result<_, _>>()
        .with_context(|| format!("parse {}", cert_path.display()))?;

    let mut r = BufReader::new(File::open(key_path).with_context(|| format!("open {}", key_path.display()))?);
    let key: PrivateKeyDer<'static> = private_key(&mut r)
        .with_context(|| format!("parse {}", key_path.display()))?
        .ok_or_else(|| anyhow!("no private key in {}", key_path.display()))?;

    ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .context("TLS config")
}

/* ---------- fallback SPA ------------------------------------------------ */

async fn spa_fallback(req: HttpRequest, index: web::Data<PathBuf>) -> actix_web::Result<HttpResponse> {
    Ok(NamedFile::open(index.get_ref())?.into_response(&req))
}

/* ---------- main -------------------------------------------------------- */

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,actix_web=info")).init();

    let settings = SETTINGS.as_ref().map_err(|e| anyhow!("{e:#}"))?.clone();
    info!("serving {} on {}:{}", settings.dist_dir.display(), settings.host, settings.port);

    let dist_dir = settings.dist_dir.clone();
    let index = web::Data::new(settings.index());
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(index.clone())
            .service(Files::new("/", &dist_dir).index_file("index.html"))
            .default_service(web::to(spa_fallback))
    });

    let server = match &settings.tls {
        Some((cert, key)) => {
            info!("TLS enabled ({})", cert.display());
            server.bind_rustls_0_23((settings.host.as_str(), settings.port), build_tls_config(cert, key)?)?
        }
        None => server.bind((settings.host.as_str(), settings.port))?,
    };
    server.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.host, "0.0.0.0");
        assert_eq!(s.port, 8444);
        assert!(s.dist_dir.ends_with("../frontend/dist"));
        assert_eq!(s.tls, None);
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("STATIC_HOST", "127.0.0.1"),
            ("STATIC_PORT", "9000"),
            ("DIST_DIR", "/srv/app"),
            ("TLS_CERT", "c.pem"),
            ("TLS_KEY", "k.pem"),
        ])
        .unwrap();
        assert_eq!(s.port, 9000);
        assert_eq!(s.index(), PathBuf::from("/srv/app/index.html"));
        assert_eq!(s.tls, Some((PathBuf::from("c.pem"), PathBuf::from("k.pem"))));
    }

    #[test]
    fn rejects_bad_port_and_half_tls() {
        assert!(settings(&[("STATIC_PORT", "http")]).is_err());
        assert!(settings(&[("TLS_CERT", "c.pem")]).is_err());
    }

    #[test]
    fn missing_certificate_is_an_error() {
        assert!(build_tls_config(Path::new("/nonexistent/cert.pem"), Path::new("/nonexistent/key.pem")).is_err());
    }
}
