// This binary crate is intentionally minimal.
// All training-harness logic lives in the library (src/lib.rs and its modules).
// Run demos with:
//   cargo run --example xor
//   cargo run --example line_fit
fn main() {
    println!("kiln-nn: a Keras-style compile/fit/evaluate harness for small neural networks.");
    println!("Run `cargo run --example xor` or `cargo run --example line_fit` to see it in action.");
}
