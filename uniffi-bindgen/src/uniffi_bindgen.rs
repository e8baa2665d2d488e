//! Generates the Swift and Kotlin bindings for the `scankit` library.

fn main() {
    uniffi::uniffi_bindgen_main();
}
