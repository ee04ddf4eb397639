// src/bin/cli.rs
fn main() -> color_eyre::Result<()> {
    jpnic_scrape::cli::run()
}
