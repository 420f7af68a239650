//! HTTP transport abstraction and the browser fetch adapter.
//!
//! The WASM/JS interop lives in a `cfg`-gated `imp` module with a non-WASM fallback shim so the
//! crate compiles and tests on native targets.

use futures::future::LocalBoxFuture;

/// Raw HTTP reply as seen by the analysis client.
///
/// The body is retained as text even when it fails to parse as JSON, so it can be surfaced in
/// error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl HttpReply {
    /// Returns whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Asynchronous JSON POST transport to the analysis service.
pub trait AnalysisTransport {
    /// Posts `body` as JSON to `url` and returns the raw reply.
    ///
    /// The error string describes a transport-level failure (network unreachable, fetch
    /// rejected); non-2xx statuses are returned as a normal [`HttpReply`].
    fn post_json(&self, url: &str, body: String) -> LocalBoxFuture<'static, Result<HttpReply, String>>;
}

/// Browser `fetch`-backed transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl AnalysisTransport for FetchTransport {
    fn post_json(&self, url: &str, body: String) -> LocalBoxFuture<'static, Result<HttpReply, String>> {
        let url = url.to_string();
        Box::pin(async move { imp::post_json(&url, &body).await })
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use super::HttpReply;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, Response};

    fn js_error_to_string(value: JsValue) -> String {
        value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|error| String::from(error.message()))
            })
            .unwrap_or_else(|| format!("{value:?}"))
    }

    // Builder-style RequestInit keeps compatibility across web-sys 0.3 point releases.
    #[allow(deprecated)]
    pub async fn post_json(url: &str, body: &str) -> Result<HttpReply, String> {
        let headers = Headers::new().map_err(js_error_to_string)?;
        headers
            .set("Content-Type", "application/json")
            .map_err(js_error_to_string)?;

        let mut init = RequestInit::new();
        init.method("POST");
        init.headers(&headers.into());
        init.body(Some(&JsValue::from_str(body)));

        let request = Request::new_with_str_and_init(url, &init).map_err(js_error_to_string)?;
        let window = web_sys::window().ok_or_else(|| "no window in this context".to_string())?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error_to_string)?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| "fetch returned a non-Response value".to_string())?;
        let status = response.status();
        let text = JsFuture::from(response.text().map_err(js_error_to_string)?)
            .await
            .map_err(js_error_to_string)?;

        Ok(HttpReply {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use super::HttpReply;

    pub async fn post_json(_url: &str, _body: &str) -> Result<HttpReply, String> {
        Err("the fetch transport is only available when compiled for wasm32".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        for (status, expected) in [(199, false), (200, true), (204, true), (299, true), (400, false), (500, false)] {
            let reply = HttpReply {
                status,
                body: String::new(),
            };
            assert_eq!(reply.is_success(), expected, "status {status}");
        }
    }

    #[test]
    fn native_fallback_reports_unavailable() {
        let err = futures::executor::block_on(
            FetchTransport.post_json("/lex", "{}".to_string()),
        )
        .expect_err("native fetch should be unavailable");
        assert!(err.contains("wasm32"));
    }
}
