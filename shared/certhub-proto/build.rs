fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        // The gateway serializes RPC replies straight to JSON.
        .type_attribute(".", "#[derive(serde::Serialize, serde::Deserialize)]")
        .compile(
            &["proto/certificate.proto", "proto/skill.proto"],
            &["proto"],
        )?;
    Ok(())
}
