use axum::{http::Uri, response::Html};

use crate::{
    device::{DeviceClass, strip_device_prefix},
    error::AppError,
};

/// HTML shell for a device-prefixed page; the client bundle renders the rest.
pub async fn render(uri: Uri) -> Html<String> {
    let path = uri.path();
    let device = match DeviceClass::from_path(path) {
        Some(DeviceClass::Mobile) => "mobile",
        _ => "desktop",
    };
    let page = strip_device_prefix(path);
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>Casino</title></head>\
         <body data-device=\"{device}\" data-page=\"{}\"><div id=\"root\"></div></body></html>",
        page.replace('"', "&quot;").replace('<', "&lt;")
    ))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
