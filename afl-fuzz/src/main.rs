use tracing_subscriber::EnvFilter;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    afl::fuzz!(|data: &[u8]| {
        if let Ok(jfif) = nom_jfif::JfifContainer::from_bytes(data) {
            assert_eq!(jfif.byte_size(), jfif.bytes().len());
            let _ = jfif.dimensions();
            let _ = jfif.content_fingerprint();
            if let Some(exif) = jfif.exif_data() {
                let _ = nom_jfif::Exif::decode(Some(exif));
            }
        }
        let _ = nom_jfif::parse_segments(data);
        let _ = nom_jfif::decode_tiff(data);
    });
}
