//! Binary entrypoint for the browser-hosted playground.

#[cfg(all(target_arch = "wasm32", feature = "csr"))]
fn main() {
    site::mount();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!(
        "The playground runs in the browser. Use `cargo xtask dev` for local development or build `site_app` for wasm32 with the `csr` feature."
    );
}
