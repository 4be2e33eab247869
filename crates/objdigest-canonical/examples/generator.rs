use objdigest_canonical::{Canonicalizer, DigestAlg, DigestOptions, ObjectDigest, Record, Value};

fn main() {
    let order: Value = Record::new("Order")
        .field("id", 42)
        .field("customer", Record::new("Customer").field("name", "alice"))
        .field("lines", vec!["widget", "gadget"])
        .field("total", 19.5)
        .field("session_token", "ephemeral")
        .into();

    let options = DigestOptions::new()
        .with_algorithm(DigestAlg::Sha256)
        .exclude("session_token");

    match Canonicalizer::default().canonicalize(&order, &options.exclusions) {
        Ok(result) => println!("{}", result.node),
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }

    match ObjectDigest::with_options(&order, options) {
        Ok(digest) => println!("{} {}", digest.algorithm(), digest),
        Err(err) => {
            eprintln!("digest failed: {}", err);
            std::process::exit(1);
        }
    }
}
