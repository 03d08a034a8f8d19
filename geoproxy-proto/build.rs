use std::io::Result;

fn main() -> Result<()> {
    #[cfg(feature = "generate_proto")]
    prost_build::Config::new()
        .bytes(["."])
        .out_dir("src/generated")
        .compile_protos(&["src/geometry.proto"], &["src/"])?;
    Ok(())
}
