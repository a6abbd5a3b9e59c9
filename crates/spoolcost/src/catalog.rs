//! Spool catalog retrieval.
//!
//! The catalog comes from a Spoolman server. Its JSON is decoded into wire
//! types ([`SpoolDto`]) and converted to typed [`Spool`]s exactly once, in
//! [`ingest`], which also drops archived spools and spools that break the
//! inventory invariants.

use crate::config::Config;
use rust_decimal::Decimal;
use serde::Deserialize;
use spoolcost_core::{resolve_density, resolve_diameter, Filament, Spool, UNKNOWN_NAME};
use std::time::Duration;
use thiserror::Error;

/// Failure to retrieve the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the connection failed.
    #[error("failed to fetch spools from {url}: {source}")]
    Request {
        /// The requested URL.
        url: String,
        /// The underlying HTTP error.
        #[source]
        source: ureq::Error,
    },
    /// The server answered with a non-success status.
    #[error("failed to fetch spools from {url}: HTTP status {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// The response body is not a spool list.
    #[error("failed to decode spools from {url}: {source}")]
    Decode {
        /// The requested URL.
        url: String,
        /// The underlying decoding error.
        #[source]
        source: ureq::Error,
    },
}

/// Source of the spool catalog.
pub trait CatalogSource {
    /// Fetch all active spools.
    fn fetch_spools(&self) -> Result<Vec<Spool>, CatalogError>;

    /// Source name.
    fn name(&self) -> &'static str;
}

/// A spool as returned by the Spoolman API.
#[derive(Debug, Clone, Deserialize)]
pub struct SpoolDto {
    /// Spool id.
    pub id: u64,
    /// Price paid.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    /// Nominal weight in grams.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub initial_weight: Option<Decimal>,
    /// Remaining weight in grams.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub remaining_weight: Option<Decimal>,
    /// Whether the spool is archived.
    #[serde(default)]
    pub archived: bool,
    /// Filament attributes.
    #[serde(default)]
    pub filament: FilamentDto,
}

/// Filament attributes as returned by the Spoolman API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilamentDto {
    /// Filament name.
    #[serde(default)]
    pub name: Option<String>,
    /// Material.
    #[serde(default)]
    pub material: Option<String>,
    /// Diameter in millimetres.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub diameter: Option<Decimal>,
    /// Density in g/cm³.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub density: Option<Decimal>,
    /// Colour hex string.
    #[serde(default)]
    pub color_hex: Option<String>,
}

impl SpoolDto {
    /// Convert to a typed spool, resolving missing values.
    pub fn into_spool(self) -> Spool {
        let f = self.filament;
        let mut filament = Filament::new(f.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()))
            .with_diameter(resolve_diameter(f.diameter))
            .with_density(resolve_density(f.density));
        filament.material = f.material;
        filament.color_hex = f.color_hex;

        Spool::new(
            self.id,
            self.price.unwrap_or_default(),
            self.initial_weight.unwrap_or_default(),
            self.remaining_weight.unwrap_or_default(),
        )
        .with_filament(filament)
    }
}

/// Turn decoded catalog entries into active, valid spools.
///
/// Archived spools are dropped silently; invalid ones are dropped with a
/// warning. Catalog order is kept.
pub fn ingest(entries: Vec<SpoolDto>) -> Vec<Spool> {
    let total = entries.len();
    let spools: Vec<Spool> = entries
        .into_iter()
        .filter(|dto| !dto.archived)
        .map(SpoolDto::into_spool)
        .filter(|spool| match spool.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("skipping spool: {e}");
                false
            }
        })
        .collect();
    tracing::debug!(total, active = spools.len(), "catalog ingested");
    spools
}

/// Spoolman HTTP client.
pub struct SpoolmanClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl SpoolmanClient {
    /// Create a client for the configured server.
    pub fn new(config: &Config) -> Self {
        Self::with_timeout(config.spool_endpoint(), config.timeout)
    }

    /// Create a client for an explicit spool endpoint URL.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            endpoint: endpoint.into(),
            agent: ureq::Agent::new_with_config(agent_config),
        }
    }

    /// The URL spools are fetched from.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CatalogSource for SpoolmanClient {
    fn fetch_spools(&self) -> Result<Vec<Spool>, CatalogError> {
        let url = &self.endpoint;
        tracing::debug!(%url, "fetching spools");

        let mut response = self
            .agent
            .get(url)
            .header("Accept", "application/json")
            .header(
                "User-Agent",
                concat!("spoolcost/", env!("CARGO_PKG_VERSION")),
            )
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => CatalogError::Status {
                    url: url.clone(),
                    status,
                },
                source => CatalogError::Request {
                    url: url.clone(),
                    source,
                },
            })?;

        let entries: Vec<SpoolDto> =
            response
                .body_mut()
                .read_json()
                .map_err(|source| CatalogError::Decode {
                    url: url.clone(),
                    source,
                })?;

        Ok(ingest(entries))
    }

    fn name(&self) -> &'static str {
        "spoolman"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spoolcost_core::{CostError, SpoolId};
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    const CATALOG_JSON: &str = r#"[
        {"id": 1, "filament": {"name": "PLA Red", "material": "PLA", "color_hex": "ff0000",
         "diameter": 1.75, "density": 1.24},
         "price": 16.49, "initial_weight": 1000, "remaining_weight": 912.13, "archived": false},
        {"id": 2, "filament": {"name": "PLA White", "material": "PLA", "color_hex": "ffffff"},
         "price": 10.99, "initial_weight": 1000, "remaining_weight": 440.00},
        {"id": 3, "filament": {"name": "Old PETG"},
         "price": 20, "initial_weight": 1000, "remaining_weight": 12, "archived": true},
        {"id": 4, "filament": {"name": "Overfull"},
         "price": 20, "initial_weight": 1000, "remaining_weight": 1012},
        {"id": 5, "filament": {"name": "Odd", "diameter": 0, "density": 0},
         "initial_weight": 500, "remaining_weight": 100, "registered": "2024-01-01T00:00:00"}
    ]"#;

    fn decode(json: &str) -> Vec<SpoolDto> {
        serde_json::from_str(json).unwrap()
    }

    /// Serve one HTTP response on a local port and return the base URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            write!(
                stream,
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
        });
        format!("http://{addr}/api/v1")
    }

    #[test]
    fn test_ingest_filters_archived_and_invalid() {
        let spools = ingest(decode(CATALOG_JSON));
        let ids: Vec<_> = spools.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![SpoolId(1), SpoolId(2), SpoolId(5)]);
    }

    #[test]
    fn test_ingest_resolves_defaults() {
        let spools = ingest(decode(CATALOG_JSON));

        let white = &spools[1];
        assert_eq!(white.price, dec!(10.99));
        assert_eq!(white.remaining_weight, dec!(440));
        assert_eq!(white.filament.diameter_mm, dec!(1.75));
        assert_eq!(white.filament.density_g_cm3, dec!(1.24));
        assert_eq!(white.filament.color_hex.as_deref(), Some("ffffff"));

        let odd = &spools[2];
        assert_eq!(odd.price, dec!(0));
        assert_eq!(odd.filament.diameter_mm, dec!(1.75));
        assert_eq!(odd.filament.density_g_cm3, dec!(0));
        assert_eq!(odd.filament.material, None);
    }

    #[test]
    fn test_ingest_keeps_spool_without_initial_weight() {
        let spools = ingest(decode(
            r#"[{"id": 8, "price": 20, "initial_weight": null, "remaining_weight": 500,
                 "filament": {"name": "Mystery"}}]"#,
        ));
        assert_eq!(spools.len(), 1);
        assert_eq!(spools[0].initial_weight, dec!(0));
        assert_eq!(spools[0].remaining_weight, dec!(500));
        assert_eq!(spools[0].cost_of(dec!(10)), Err(CostError::DivisionByZero));
    }

    #[test]
    fn test_missing_filament_name() {
        let spools = ingest(decode(r#"[{"id": 8, "initial_weight": 1000, "remaining_weight": 5}]"#));
        assert_eq!(spools[0].name(), "Unknown");
    }

    #[test]
    fn test_fetch_from_server() {
        let base = serve_once("HTTP/1.1 200 OK", CATALOG_JSON);
        let client = SpoolmanClient::new(&Config::new(base));
        assert!(client.endpoint().ends_with("/api/v1/spool"));

        let spools = client.fetch_spools().unwrap();
        assert_eq!(spools.len(), 3);
        assert_eq!(spools[0].name(), "PLA Red");
    }

    #[test]
    fn test_fetch_http_error() {
        let base = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
        let client = SpoolmanClient::new(&Config::new(base));

        let err = client.fetch_spools().unwrap_err();
        assert!(
            matches!(err, CatalogError::Status { status: 500, .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn test_fetch_bad_body() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"detail": "not a list"}"#);
        let client = SpoolmanClient::new(&Config::new(base));

        let err = client.fetch_spools().unwrap_err();
        assert!(matches!(err, CatalogError::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SpoolmanClient::with_timeout(
            format!("http://{addr}/api/v1/spool"),
            Duration::from_secs(2),
        );
        let err = client.fetch_spools().unwrap_err();
        assert!(matches!(err, CatalogError::Request { .. }), "got {err:?}");
    }
}
