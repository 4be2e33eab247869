//! Canonicalize command implementation.

use objdigest_canonical::{Canonicalizer, FieldExclusions};

use super::read_value;
use crate::error::CliError;
use crate::output::print_warnings;

pub fn run(input: Option<String>, exclude: Vec<String>) -> Result<(), CliError> {
    let value = read_value(input)?;
    let exclusions: FieldExclusions = exclude.into_iter().collect();

    let result = Canonicalizer::default().canonicalize(&value, &exclusions)?;
    print_warnings(&result.report);

    println!("{}", result.node.to_canonical_json()?);
    Ok(())
}
