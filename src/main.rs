//! Host-side helper: `cargo run` builds the wasm package into `static/pkg`
//! and serves `static/` on a local port.

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::process::{Command, Stdio};

    use anyhow::{bail, Context, Result};
    use clap::Parser;
    use tracing::{info, warn};
    use tracing::level_filters::LevelFilter;

    #[derive(Debug, Parser)]
    #[command(name = "neuroscope", about = "Build and serve the NeuroScope 3D page")]
    struct Args {
        /// Port for the local HTTP server.
        #[arg(long, default_value_t = 5001)]
        port: u16,
        /// Serve whatever is already in static/pkg.
        #[arg(long)]
        skip_build: bool,
        #[arg(short, long)]
        verbose: bool,
    }

    fn build_pkg() -> Result<()> {
        info!("building wasm package");
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            .status()
            .context("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)")?;
        if !status.success() {
            bail!("wasm-pack finished with {status}");
        }
        Ok(())
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        tracing_subscriber::fmt()
            .with_max_level(if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO })
            .init();

        if args.skip_build {
            warn!("skipping wasm build; the page may serve stale artifacts");
        } else {
            build_pkg()?;
        }

        info!(port = args.port, "serving static/ at http://127.0.0.1:{}", args.port);
        let status = Command::new("python3")
            .args(["-m", "http.server", &args.port.to_string(), "--directory", "static"])
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .context("failed to start http server")?;
        if !status.success() {
            bail!("http server exited with {status}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
