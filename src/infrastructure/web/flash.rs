use std::collections::BTreeMap;

use actix_web::{
    cookie::{time::Duration, Cookie},
    HttpRequest,
};
use serde::{Deserialize, Serialize};

use crate::{constants::FLASH_COOKIE, errors::FieldErrors};

/// Keeps the whole `Set-Cookie` header under the 4 KB browsers accept.
const MAX_COOKIE_VALUE_BYTES: usize = 3800;

/// One-shot data carried across a redirect in the `flash` cookie.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(default)]
    pub errors: FieldErrors,
    #[serde(default)]
    pub old: BTreeMap<String, String>,
}

impl Flash {
    pub fn new(errors: FieldErrors, old: BTreeMap<String, String>) -> Self {
        Flash { errors, old }
    }

    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        let cookie = req.cookie(FLASH_COOKIE)?;
        let value = cookie.value();

        // Cookie values usually arrive percent-decoded already.
        serde_json::from_str(value)
            .or_else(|_| {
                let decoded = urlencoding::decode(value).unwrap_or_default();
                serde_json::from_str(&decoded)
            })
            .map_err(|e| tracing::debug!("Discarding unreadable flash cookie: {}", e))
            .ok()
    }

    /// Old input is dropped longest-first until the cookie fits; errors are always kept.
    pub fn to_cookie(&self) -> Cookie<'static> {
        let mut flash = self.clone();
        let mut value = flash.encoded();

        while value.len() > MAX_COOKIE_VALUE_BYTES {
            let Some(longest) = flash.old
                .iter()
                .max_by_key(|(_, text)| text.len())
                .map(|(name, _)| name.clone())
            else {
                break;
            };
            tracing::debug!(field = %longest, "Dropping old input from oversized flash cookie");
            flash.old.remove(&longest);
            value = flash.encoded();
        }

        Cookie::build(FLASH_COOKIE, value)
            .path("/")
            .http_only(true)
            .finish()
    }

    fn encoded(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        urlencoding::encode(&json).into_owned()
    }

    pub fn removal_cookie() -> Cookie<'static> {
        Cookie::build(FLASH_COOKIE, "")
            .path("/")
            .max_age(Duration::ZERO)
            .finish()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)?.first().map(String::as_str)
    }

    pub fn old(&self, field: &str) -> Option<&str> {
        self.old.get(field).map(String::as_str)
    }
}
