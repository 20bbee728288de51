use crate::icinga::{CheckResult, IcingaTermination, Severity};
use log::debug;
use reqwest::blocking::Response;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

const MAX_REDIRECTS: usize = 10;

/// Connection settings for the appliance, fixed for the whole invocation.
#[derive(Clone, Debug)]
pub struct Target {
    pub host: String,
    pub user: String,
    pub secret: String,
    pub timeout: Duration,
    pub verify_certs: bool,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error {status} from {url}")]
    HttpStatus { url: String, status: StatusCode },
    #[error("Too many redirects while requesting {url}")]
    TooManyRedirects { url: String },
    #[error("Timeout after {secs}s while requesting {url}")]
    Timeout { url: String, secs: u64 },
    #[error("TLS certificate verification failed for {url}")]
    Tls { url: String, source: reqwest::Error },
    #[error("Connection error: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("Response from {url} is not valid JSON: {reason}")]
    MalformedJson { url: String, reason: String },
}

impl ClientError {
    /// Transport failures that could not be put into a narrower class.
    pub fn is_unclassified(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }
}

impl IcingaTermination for ClientError {
    fn exitcode(&self) -> Severity {
        Severity::Unknown
    }

    fn report(&self) -> ! {
        CheckResult::new(self.exitcode(), self.to_string()).report()
    }
}

/// Anything that can answer `api/v1.0` resource requests with JSON.
pub trait ApiSource {
    fn fetch<T: DeserializeOwned>(&self, resource: &str) -> Result<T, ClientError>;
}

pub struct FreenasApiClient {
    base_url: String,
    user: String,
    secret: String,
    timeout: Duration,
    http: reqwest::blocking::Client,
}

fn is_tls_failure(error: &(dyn StdError + 'static)) -> bool {
    let mut cause: Option<&(dyn StdError + 'static)> = error.source();
    while let Some(inner) = cause {
        let text = inner.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        cause = inner.source();
    }
    false
}

impl FreenasApiClient {
    pub fn new(target: &Target) -> Result<Self, ClientError> {
        let base_url = format!("http://{}/api/v1.0", target.host);
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::blocking::Client::builder()
            .redirect(Policy::none())
            .danger_accept_invalid_certs(!target.verify_certs)
            .connect_timeout(target.timeout)
            .timeout(target.timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| ClientError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(FreenasApiClient {
            base_url,
            user: target.user.clone(),
            secret: target.secret.clone(),
            timeout: target.timeout,
            http,
        })
    }

    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}/", self.base_url, resource)
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> ClientError {
        let url = error
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| url.to_owned());
        if error.is_timeout() {
            ClientError::Timeout {
                url,
                secs: self.timeout.as_secs(),
            }
        } else if let (true, Some(status)) = (error.is_status(), error.status()) {
            ClientError::HttpStatus { url, status }
        } else if error.is_decode() {
            ClientError::MalformedJson {
                url,
                reason: error.to_string(),
            }
        } else if is_tls_failure(&error) {
            ClientError::Tls { url, source: error }
        } else {
            ClientError::Transport { url, source: error }
        }
    }
}

fn redirect_target(response: &Response) -> Option<Url> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    response.url().join(location).ok()
}

/// Credentials only follow redirects that stay on the appliance's host,
/// whatever the scheme or port.
fn carries_credentials(origin_host: Option<&str>, next: &Url) -> bool {
    origin_host.is_some() && next.host_str() == origin_host
}

impl ApiSource for FreenasApiClient {
    fn fetch<T: DeserializeOwned>(&self, resource: &str) -> Result<T, ClientError> {
        let mut url = self.resource_url(resource);
        let origin_host = Url::parse(&url)
            .ok()
            .and_then(|origin| origin.host_str().map(str::to_owned));
        let mut credentials = true;

        for _ in 0..=MAX_REDIRECTS {
            debug!("GET {}", url);
            let mut request = self.http.get(&url);
            if credentials {
                request = request.basic_auth(&self.user, Some(&self.secret));
            }
            let response = request
                .send()
                .map_err(|error| self.classify(&url, error))?;

            let status = response.status();
            debug!("{} answered {}", url, status);
            if status.is_redirection() {
                if let Some(next) = redirect_target(&response) {
                    credentials = carries_credentials(origin_host.as_deref(), &next);
                    url = next.to_string();
                    continue;
                }
            }
            if !status.is_success() {
                return Err(ClientError::HttpStatus { url, status });
            }

            return response
                .json::<T>()
                .map_err(|error| self.classify(&url, error));
        }
        Err(ClientError::TooManyRedirects { url })
    }
}
