//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Resolves a static asset to its content-hashed URL.
///
/// Hashes are computed by `build.rs`. Unknown assets, or assets that were
/// missing at build time, resolve to their plain `/static` path.
///
/// Usage in templates: `{{ "css/main.css"|asset_path }}`
#[askama::filter_fn]
pub fn asset_path(asset: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(hashed_asset_path(&asset.to_string()))
}

fn hashed_asset_path(asset: &str) -> String {
    let hash = match asset {
        "css/main.css" => env!("CSS_HASH"),
        "js/scroller.js" => env!("JS_HASH"),
        _ => "",
    };
    let Some((dir_and_stem, ext)) = asset.rsplit_once('.') else {
        return format!("/static/{asset}");
    };
    if hash.is_empty() {
        return format!("/static/{asset}");
    }
    let (dir, stem) = dir_and_stem
        .rsplit_once('/')
        .map_or(("", dir_and_stem), |(dir, stem)| (dir, stem));
    if dir.is_empty() {
        format!("/static/derived/{stem}.{hash}.{ext}")
    } else {
        format!("/static/{dir}/derived/{stem}.{hash}.{ext}")
    }
}
