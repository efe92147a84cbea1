//! Outbound HTTP seam.
//!
//! Sync and the request handlers talk to the network through the
//! [`Fetch`] trait so tests can substitute canned responses.

use std::{fs::File, io, path::Path};

use reqwest::blocking::{Client, Response};

use crate::error::{Error, Result};

/// Outbound GET operations used by sync and the handlers.
pub trait Fetch {
    /// GET a JSON document.
    fn get_json(&self, url: &str) -> Result<serde_json::Value>;

    /// GET a text document with extra request headers.
    fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String>;

    /// GET a file, streaming the body to `dest`.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// [`Fetch`] implementation over a blocking reqwest client.
pub struct HttpFetch {
    client: Client,
}

impl HttpFetch {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .map_err(|source| Error::Request { url: url.to_string(), source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus { url: url.to_string(), status: status.as_u16() });
        }
        Ok(response)
    }
}

impl Default for HttpFetch {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetch {
    fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        self.get(url, &[])?
            .json()
            .map_err(|source| Error::Request { url: url.to_string(), source })
    }

    fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        self.get(url, headers)?
            .text()
            .map_err(|source| Error::Request { url: url.to_string(), source })
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let mut response = self.get(url, &[])?;
        let mut file = File::create(dest)?;
        io::copy(&mut response, &mut file)?;
        Ok(())
    }
}
