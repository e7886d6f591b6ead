fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Ensure a working `protoc` is available (vendored) to avoid external toolchain dependency.
    let protoc_path = protoc_bin_vendored::protoc_bin_path()?;
    unsafe {
        std::env::set_var("PROTOC", protoc_path);
    }
    // Well-known types (Any, Duration, Empty, Timestamp) ship with the vendored protoc.
    let include_path = protoc_bin_vendored::include_path()?;
    unsafe {
        std::env::set_var("PROTOC_INCLUDE", include_path.as_os_str());
    }

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &[
                "proto/google/rpc/status.proto",
                "proto/google/longrunning/operations.proto",
                "proto/google/showcase/v1/showcase.proto",
            ],
            &["proto", &include_path.to_string_lossy()],
        )?;
    Ok(())
}
