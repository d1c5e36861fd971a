//! HTTP session module
//!
//! A [`Session`] owns one reqwest client and, optionally, its cookie jar.
//! Every [`Request`] built from a session shares that client, the
//! session's default cookies and its timeout.

use crate::config::{Config, HttpMethod};
use crate::error::{Result, RequestsError};
use crate::utils::UrlUtils;
use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use std::time::Duration;
use url::Url;

pub mod body;
pub mod cookies;
pub mod headers;
pub mod request;
pub mod response;

pub use request::Request;
pub use response::Response;

/// Long-lived request factory carrying a timeout and default cookies
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: Client,
    jar: Option<Arc<Jar>>,
    user_agent: String,
    timeout: RwLock<Option<Duration>>,
    cookies: RwLock<HashMap<String, String>>,
}

impl Session {
    /// Create a session with the default configuration and a cookie jar
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a session from the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        // The blocking client defaults to a 30s total timeout; the session
        // timeout is applied per request instead.
        let mut builder = Client::builder().timeout(None);

        let jar = if config.cookie_store {
            let jar = Arc::new(Jar::default());
            builder = builder.cookie_provider(Arc::clone(&jar));
            Some(jar)
        } else {
            None
        };

        let client = builder.build().map_err(RequestsError::Transport)?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                client,
                jar,
                user_agent: config.user_agent,
                timeout: RwLock::new(config.timeout.filter(|t| !t.is_zero())),
                cookies: RwLock::new(config.cookies),
            }),
        })
    }

    /// Set the per-request timeout. A zero duration disables the timeout.
    pub fn set_timeout(&self, timeout: Duration) -> &Self {
        let timeout = if timeout.is_zero() {
            None
        } else {
            Some(timeout)
        };
        *self
            .inner
            .timeout
            .write()
            .unwrap_or_else(PoisonError::into_inner) = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        *self
            .inner
            .timeout
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the default cookies sent with every request of this session
    pub fn set_cookies(&self, cookies: &HashMap<String, String>) -> &Self {
        *self
            .inner
            .cookies
            .write()
            .unwrap_or_else(PoisonError::into_inner) = cookies.clone();
        self
    }

    /// Copy of the session's default cookies
    pub fn cookies(&self) -> HashMap<String, String> {
        self.inner
            .cookies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Start building a request with an arbitrary method
    pub fn request(&self, method: HttpMethod, url: &str) -> Result<Request> {
        let resolved = UrlUtils::resolve(url)?;
        Ok(Request::new(self.clone(), method, resolved))
    }

    pub fn get(&self, url: &str) -> Result<Request> {
        self.request(HttpMethod::Get, url)
    }

    pub fn post(&self, url: &str) -> Result<Request> {
        self.request(HttpMethod::Post, url)
    }

    pub fn put(&self, url: &str) -> Result<Request> {
        self.request(HttpMethod::Put, url)
    }

    pub fn delete(&self, url: &str) -> Result<Request> {
        self.request(HttpMethod::Delete, url)
    }

    pub fn head(&self, url: &str) -> Result<Request> {
        self.request(HttpMethod::Head, url)
    }

    pub fn options(&self, url: &str) -> Result<Request> {
        self.request(HttpMethod::Options, url)
    }

    pub fn trace(&self, url: &str) -> Result<Request> {
        self.request(HttpMethod::Trace, url)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.inner.client
    }

    pub(crate) fn user_agent(&self) -> &str {
        &self.inner.user_agent
    }

    /// Inject default cookies missing from the jar for `url`
    pub(crate) fn prepare_cookies(&self, url: &Url) {
        if let Some(jar) = &self.inner.jar {
            let defaults = self.cookies();
            cookies::merge_into_jar(jar, url, &defaults);
        }
    }

    /// Shared session without a cookie jar, used by [`crate::get`]
    pub(crate) fn shared_default() -> Result<Self> {
        static DEFAULT_SESSION: OnceLock<Session> = OnceLock::new();

        if let Some(session) = DEFAULT_SESSION.get() {
            return Ok(session.clone());
        }
        let session = Session::with_config(Config {
            cookie_store: false,
            ..Config::default()
        })?;
        Ok(DEFAULT_SESSION.get_or_init(|| session).clone())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_agent", &self.inner.user_agent)
            .field("timeout", &self.timeout())
            .field("cookies", &self.cookies())
            .field("cookie_store", &self.inner.jar.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::config::{Config, HttpMethod};
    use crate::error::RequestsError;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn timeout_round_trips_and_zero_disables() {
        let session = Session::new().expect("session");
        assert_eq!(session.timeout(), None);

        session.set_timeout(Duration::from_secs(5));
        assert_eq!(session.timeout(), Some(Duration::from_secs(5)));

        session.set_timeout(Duration::ZERO);
        assert_eq!(session.timeout(), None);
    }

    #[test]
    fn cookies_are_copied_in_and_out() {
        let session = Session::new().expect("session");
        let mut cookies = HashMap::new();
        cookies.insert("token".to_string(), "abc".to_string());
        session.set_cookies(&cookies);

        cookies.insert("other".to_string(), "x".to_string());
        assert_eq!(session.cookies().len(), 1);

        let mut copy = session.cookies();
        copy.clear();
        assert_eq!(session.cookies().get("token").map(String::as_str), Some("abc"));
    }

    #[test]
    fn clones_share_state() {
        let session = Session::new().expect("session");
        let clone = session.clone();
        clone.set_timeout(Duration::from_millis(250));
        assert_eq!(session.timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn verb_factories_bind_method_and_url() {
        let session = Session::new().expect("session");
        let cases = [
            (session.get("example.com/a"), HttpMethod::Get),
            (session.post("example.com/a"), HttpMethod::Post),
            (session.put("example.com/a"), HttpMethod::Put),
            (session.delete("example.com/a"), HttpMethod::Delete),
            (session.head("example.com/a"), HttpMethod::Head),
            (session.options("example.com/a"), HttpMethod::Options),
            (session.trace("example.com/a"), HttpMethod::Trace),
        ];
        for (request, method) in cases {
            let request = request.expect("request");
            assert_eq!(request.method(), method);
            assert_eq!(request.url(), "http://example.com/a");
        }
    }

    #[test]
    fn verb_factories_propagate_url_errors() {
        let session = Session::new().expect("session");
        let err = session.post("ftp://x.com").expect_err("ftp rejected");
        assert!(matches!(err, RequestsError::InvalidUrl(_)));
    }

    #[test]
    fn config_seeds_session_state() {
        let mut cookies = HashMap::new();
        cookies.insert("lang".to_string(), "en".to_string());
        let session = Session::with_config(Config {
            timeout: Some(Duration::from_secs(3)),
            cookies,
            ..Config::default()
        })
        .expect("session");
        assert_eq!(session.timeout(), Some(Duration::from_secs(3)));
        assert_eq!(session.cookies().len(), 1);
    }

    #[test]
    fn shared_default_session_is_reused() {
        let first = Session::shared_default().expect("session");
        let second = Session::shared_default().expect("session");
        assert!(std::sync::Arc::ptr_eq(&first.inner, &second.inner));
        assert!(first.inner.jar.is_none());
    }
}
