//! Ad serving.
//!
//! Demo creatives that trigger source registration in three ways:
//! - click on a link with `attributionsrc` (navigation source)
//! - `window.open` with an `attributionsrc` feature (navigation source)
//! - an `<img attributionsrc>` (event source)
//!
//! Publishers embed them with the `/ad-script-*` snippets, which write an
//! iframe allowed to use `attribution-reporting`.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use crate::http::server::AppState;

const AD_SIZE: u32 = 190;

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    ))
}

pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let adtech = &state.config.origins.adtech_url;
    let body = format!(
        r#"<h1>Ad tech</h1>
<p>Demo ads:</p>
<ul>
<li><a href="{adtech}/ad-click">Click ad (link)</a></li>
<li><a href="{adtech}/ad-click-js">Click ad (window.open)</a></li>
<li><a href="{adtech}/ad-view-img">View ad (image)</a></li>
</ul>
<p>Reports received so far: <a href="{adtech}/reports">/reports</a></p>"#
    );
    page("Ad tech", &body)
}

pub async fn ad_click(State(state): State<AppState>) -> impl IntoResponse {
    let adtech = &state.config.origins.adtech_url;
    let body = format!(
        r#"<a href="{adtech}/register-source-href" attributionsrc target="_blank">
<img src="{adtech}/register-source-image" alt="Blue shoes" width="{AD_SIZE}" height="{AD_SIZE}">
</a>"#
    );
    page("Ad: click", &body)
}

pub async fn ad_click_js(State(state): State<AppState>) -> impl IntoResponse {
    let href = &state.config.origins.advertiser_url;
    let attributionsrc = format!("{}/register-source-js", state.config.origins.adtech_url);
    let body = format!(
        r#"<button id="ad">Buy blue shoes</button>
<script>
document.getElementById("ad").addEventListener("click", () => {{
  window.open("{href}", "_blank", "attributionsrc={attributionsrc}");
}});
</script>"#
    );
    page("Ad: click (JS)", &body)
}

pub async fn ad_view_img(State(state): State<AppState>) -> impl IntoResponse {
    let adtech = &state.config.origins.adtech_url;
    let body = format!(
        r#"<img src="{adtech}/register-source-image" attributionsrc alt="Blue shoes" width="{AD_SIZE}" height="{AD_SIZE}">"#
    );
    page("Ad: view", &body)
}

/// `document.write` snippet embedding `path` in an attribution-enabled iframe.
pub fn iframe_script(adtech_url: &str, path: &str) -> String {
    let iframe = format!(
        "<iframe src='{adtech_url}{path}' allow='attribution-reporting' width={AD_SIZE} height={AD_SIZE} scrolling=no frameborder=1 padding=0></iframe>"
    );
    format!("document.write(\"{iframe}\");")
}

fn script_response(state: &AppState, path: &str) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript")],
        iframe_script(&state.config.origins.adtech_url, path),
    )
}

pub async fn ad_script_view_img(State(state): State<AppState>) -> impl IntoResponse {
    script_response(&state, "/ad-view-img")
}

pub async fn ad_script_click_element(State(state): State<AppState>) -> impl IntoResponse {
    script_response(&state, "/ad-click")
}

pub async fn ad_script_click_js(State(state): State<AppState>) -> impl IntoResponse {
    script_response(&state, "/ad-click-js")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iframe_script() {
        let script = iframe_script("https://adtech.example", "/ad-click");
        assert_eq!(
            script,
            "document.write(\"<iframe src='https://adtech.example/ad-click' allow='attribution-reporting' width=190 height=190 scrolling=no frameborder=1 padding=0></iframe>\");"
        );
    }

    #[test]
    fn test_page_wraps_body() {
        let Html(html) = page("T", "<p>hi</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>T</title>"));
        assert!(html.contains("<p>hi</p>"));
    }
}
