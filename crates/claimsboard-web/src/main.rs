//! WASM entry point for the Leptos CSR app

use claimsboard_web::App;
use leptos::mount::mount_to_body;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
