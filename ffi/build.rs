use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml")).unwrap_or_default();

    match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => {
            let include_dir = crate_dir.join("include");
            if let Err(err) = std::fs::create_dir_all(&include_dir) {
                println!("cargo:warning=cannot create {}: {err}", include_dir.display());
                return;
            }
            bindings.write_to_file(include_dir.join("carangas.h"));
        }
        Err(err) => println!("cargo:warning=header not generated: {err}"),
    }
}
