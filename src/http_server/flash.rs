//! One-shot notifications carried to the next rendered page in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

fn read(jar: &CookieJar) -> Vec<FlashMessage> {
    // The jar percent-decodes request cookies and encodes Set-Cookie values.
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

/// Queue a message for the next page render.
pub fn push(jar: CookieJar, level: FlashLevel, message: impl Into<String>) -> CookieJar {
    let mut messages = read(&jar);
    messages.push(FlashMessage {
        level,
        message: message.into(),
    });

    let json = match serde_json::to_string(&messages) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to encode flash messages: {e}");
            return jar;
        }
    };
    jar.add(
        Cookie::build((FLASH_COOKIE, json))
            .path("/")
            .http_only(true),
    )
}

pub fn info(jar: CookieJar, message: impl Into<String>) -> CookieJar {
    push(jar, FlashLevel::Info, message)
}

pub fn error(jar: CookieJar, message: impl Into<String>) -> CookieJar {
    push(jar, FlashLevel::Error, message)
}

/// Take every queued message and clear the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    let messages = read(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    fn jar_with(cookie: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_push_then_take() {
        let jar = info(CookieJar::new(), "Venue The Musical Hop was successfully listed!");
        let jar = error(jar, "An error occurred.");

        let (jar, messages) = take(jar);
        assert_eq!(
            messages,
            vec![
                FlashMessage {
                    level: FlashLevel::Info,
                    message: "Venue The Musical Hop was successfully listed!".into(),
                },
                FlashMessage {
                    level: FlashLevel::Error,
                    message: "An error occurred.".into(),
                },
            ]
        );
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn test_take_reads_request_cookie() {
        let json = r#"[{"level":"info","message":"Artist Matt Quevedo was deleted"}]"#;
        let jar = jar_with(&format!("flash={}", urlencoding::encode(json)));

        let (_, messages) = take(jar);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "Artist Matt Quevedo was deleted");
    }

    #[test]
    fn test_garbage_cookie_is_ignored() {
        let (_, messages) = take(jar_with("flash=not-json"));
        assert!(messages.is_empty());
        assert!(take(CookieJar::new()).1.is_empty());
    }
}
