#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod config;
mod counter;
mod delay;
mod latch;
mod logging;
mod navigate;
mod pointer;
mod scroll;
mod storage;
mod typing;
mod viewport;

#[cfg(target_arch = "wasm32")]
mod frontend;
#[cfg(target_arch = "wasm32")]
mod hooks;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This project is frontend-only. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
