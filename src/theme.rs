use axum::http::{header, HeaderMap};

const COOKIE_NAME: &str = "theme";
const ONE_YEAR_SECS: u64 = 60 * 60 * 24 * 365;

/// Colour scheme preference. It lives in a browser cookie so it survives
/// reloads without the server keeping any per-user state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon shown on the toggle button: the theme you would switch to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == COOKIE_NAME)
            .map(|(_, value)| match value {
                "dark" => Theme::Dark,
                _ => Theme::Light,
            })
            .unwrap_or_default()
    }

    pub fn set_cookie(self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            COOKIE_NAME,
            self.as_str(),
            ONE_YEAR_SECS
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).expect("header"));
        headers
    }

    #[test]
    fn defaults_to_light_without_cookie() {
        assert_eq!(Theme::from_headers(&HeaderMap::new()), Theme::Light);
    }

    #[test]
    fn reads_theme_among_other_cookies() {
        let headers = headers_with_cookie("session=abc; theme=dark; lang=ar");
        assert_eq!(Theme::from_headers(&headers), Theme::Dark);
    }

    #[test]
    fn unknown_value_falls_back_to_light() {
        let headers = headers_with_cookie("theme=purple");
        assert_eq!(Theme::from_headers(&headers), Theme::Light);
    }

    #[test]
    fn toggle_round_trips_through_cookie() {
        let next = Theme::Light.toggled();
        assert_eq!(next, Theme::Dark);
        let cookie = next.set_cookie();
        let stored = cookie.split(';').next().expect("pair");
        assert_eq!(Theme::from_headers(&headers_with_cookie(stored)), Theme::Dark);
        assert_eq!(next.toggled(), Theme::Light);
    }
}
