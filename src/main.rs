//! pillar_crop_bundler - builds the video_pillar_crop single-file executable.
//!
//! Provisions an isolated Python environment, installs the build dependencies,
//! runs PyInstaller and publishes the executable to `dist_windows/`.

use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Run CLI and get exit code
    let exit_code = match pillar_crop_bundler::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
