//! Build script for storefront crate.
//!
//! Generates content-based hashes for static assets (stylesheet and the
//! scroller script) so the templates can link immutable, cache-busting URLs.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    hash_asset(&static_dir, "css", "main", "css", "CSS_HASH");
    hash_asset(&static_dir, "js", "scroller", "js", "JS_HASH");
}

/// Hash `static/<subdir>/<stem>.<ext>` and copy it to
/// `static/<subdir>/derived/<stem>.<hash>.<ext>`.
///
/// Sets `env_key` for use with `env!()`; the value is empty when the asset
/// is missing so templates can fall back to the unhashed path.
fn hash_asset(static_dir: &Path, subdir: &str, stem: &str, ext: &str, env_key: &str) {
    let source = static_dir.join(subdir).join(format!("{stem}.{ext}"));
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", source.display());
            println!("cargo:rustc-env={env_key}=");
            return;
        }
    };

    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = &hash[..8];
    println!("cargo:rustc-env={env_key}={short_hash}");

    let derived_dir = static_dir.join(subdir).join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");
    let derived_path = derived_dir.join(format!("{stem}.{short_hash}.{ext}"));
    fs::copy(&source, &derived_path).expect("Failed to copy asset to derived directory");
}
