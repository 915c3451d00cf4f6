//! Link step for the `blas` feature.
//!
//! `BlasBackend` calls `cblas_*` symbols that the `cblas` crate only declares.
//! With `blas` enabled this links them from a system OpenBLAS, searching
//! `OPENBLAS_LIB_DIR` first and the Homebrew prefixes on macOS.

fn main() {
    #[cfg(feature = "blas")]
    {
        println!("cargo:rerun-if-env-changed=OPENBLAS_LIB_DIR");
        match std::env::var("OPENBLAS_LIB_DIR") {
            Ok(dir) => println!("cargo:rustc-link-search=native={dir}"),
            Err(_) if cfg!(target_os = "macos") => {
                for prefix in ["/opt/homebrew", "/usr/local"] {
                    println!("cargo:rustc-link-search=native={prefix}/opt/openblas/lib");
                }
            }
            Err(_) => {}
        }
        println!("cargo:rustc-link-lib=openblas");
    }
}
