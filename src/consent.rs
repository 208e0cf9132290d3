//! Cookie consent flag.
//!
//! One cookie, `naishin_consent`, holding `"1"` (accepted) or `"0"`
//! (rejected). It lives for a year on `path=/` with `samesite=lax`, and is
//! marked `secure` when the page is served over HTTPS. No cookie means the
//! visitor has not answered yet.

pub const CONSENT_COOKIE: &str = "naishin_consent";

/// One year, in seconds.
pub const CONSENT_MAX_AGE_SECS: u32 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentChoice {
    Accepted,
    Rejected,
}

impl ConsentChoice {
    pub fn as_cookie_value(self) -> &'static str {
        match self {
            ConsentChoice::Accepted => "1",
            ConsentChoice::Rejected => "0",
        }
    }

    pub fn from_cookie_value(value: &str) -> Option<Self> {
        match value.trim() {
            "1" => Some(ConsentChoice::Accepted),
            "0" => Some(ConsentChoice::Rejected),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConsentChoice::Accepted => "同意済み",
            ConsentChoice::Rejected => "拒否",
        }
    }
}

/// The `document.cookie` assignment string for `choice`.
pub fn format_consent_cookie(choice: ConsentChoice, secure: bool) -> String {
    let mut cookie = format!(
        "{CONSENT_COOKIE}={}; max-age={CONSENT_MAX_AGE_SECS}; path=/; samesite=lax",
        choice.as_cookie_value()
    );
    if secure {
        cookie.push_str("; secure");
    }
    cookie
}

/// Find the consent flag in a `document.cookie` header
/// (`"a=b; naishin_consent=1"`). Unknown values count as unanswered.
pub fn parse_consent(cookie_header: &str) -> Option<ConsentChoice> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == CONSENT_COOKIE)
        .and_then(|(_, value)| ConsentChoice::from_cookie_value(value))
}

#[cfg(target_arch = "wasm32")]
fn html_document() -> Option<web_sys::HtmlDocument> {
    use wasm_bindgen::JsCast;
    web_sys::window()?
        .document()?
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()
}

/// Current choice from `document.cookie`.
#[cfg(target_arch = "wasm32")]
pub fn read_consent() -> Option<ConsentChoice> {
    let cookie = html_document()?.cookie().ok()?;
    parse_consent(&cookie)
}

/// Store `choice`. Returns false when the document refuses the cookie.
#[cfg(target_arch = "wasm32")]
pub fn write_consent(choice: ConsentChoice) -> bool {
    let secure = web_sys::window()
        .and_then(|w| w.location().protocol().ok())
        .is_some_and(|p| p == "https:");
    let Some(doc) = html_document() else {
        log::warn!("naishin: document が取得できないため同意状態を保存できません");
        return false;
    };
    match doc.set_cookie(&format_consent_cookie(choice, secure)) {
        Ok(()) => true,
        Err(_) => {
            log::warn!("naishin: 同意 cookie の保存に失敗しました");
            false
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read_consent() -> Option<ConsentChoice> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write_consent(_choice: ConsentChoice) -> bool {
    false
}
