#[macro_use] extern crate clap;

mod interface;

use interface::cli::cli_main;

// The event loop has to own the main thread on some platforms, so unlike a headless tool there is
// no worker thread here.
fn main() -> anyhow::Result<()> {
    cli_main()
}
