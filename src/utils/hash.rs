use xxhash_rust::xxh3::xxh3_64;

pub fn hash_text(input: &str) -> String {
    format!("{:016x}", xxh3_64(input.as_bytes()))
}
