use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const WASM_NAME: &str = "theus_record.wasm";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=crates/theus-record");
    println!("cargo:rerun-if-changed=crates/theus-core/src");
    println!("cargo:rerun-if-changed=crates/theus-macros/src");
    println!("cargo:rerun-if-changed=crates/theus-support/src");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=THEUS_SKIP_WASM_BUILD");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let dest_path = out_dir.join(WASM_NAME);

    let built = if env::var_os("THEUS_SKIP_WASM_BUILD").is_some() {
        Err("THEUS_SKIP_WASM_BUILD is set".to_string())
    } else {
        build_record_module(&manifest_dir.join("crates/theus-record"), &out_dir)
    };

    println!("cargo:rustc-check-cfg=cfg(theus_record_wasm)");
    match built {
        Ok(wasm) => {
            fs::copy(&wasm, &dest_path)?;
            println!("cargo:rustc-cfg=theus_record_wasm");
        }
        Err(reason) => {
            // the wasm tests are marked ignored without theus_record_wasm
            println!(
                "cargo:warning=theus-record was not built for wasm32 ({}); wasm tests will be skipped",
                reason
            );
            fs::write(&dest_path, b"")?;
        }
    }

    let gen_code = format!(
        "/// The theus-record module compiled for wasm32-unknown-unknown, or empty\n\
         /// when the target was unavailable at build time.\n\
         pub const THEUS_RECORD_WASM: &[u8] = include_bytes!(concat!(env!(\"OUT_DIR\"), \"/{}\"));\n",
        WASM_NAME
    );
    fs::write(out_dir.join("theus_record_wasm.rs"), gen_code)?;
    println!("cargo:rustc-env=THEUS_RECORD_WASM_PATH={}", dest_path.display());
    Ok(())
}

fn build_record_module(crate_dir: &Path, out_dir: &Path) -> Result<PathBuf, String> {
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    // separate target dir: the outer build holds the lock on the main one
    let target_dir = out_dir.join("wasm-target");
    let status = Command::new(cargo)
        .arg("build")
        .arg("--manifest-path")
        .arg(crate_dir.join("Cargo.toml"))
        .args(["--target", "wasm32-unknown-unknown", "--release", "--offline"])
        .arg("--target-dir")
        .arg(&target_dir)
        .env_remove("CARGO_ENCODED_RUSTFLAGS")
        .env_remove("CARGO_TARGET_DIR")
        .env_remove("RUSTFLAGS")
        .status()
        .map_err(|e| format!("failed to run cargo: {}", e))?;
    if !status.success() {
        return Err(format!("cargo exited with {}", status));
    }

    let wasm = target_dir.join("wasm32-unknown-unknown/release").join(WASM_NAME);
    if wasm.exists() {
        Ok(wasm)
    } else {
        Err(format!("{} not found", wasm.display()))
    }
}
