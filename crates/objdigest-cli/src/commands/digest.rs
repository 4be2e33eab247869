//! Digest command implementation.

use objdigest_canonical::{digest_with_report, CyclePolicy, DigestOptions, FieldExclusions};

use super::read_value;
use crate::error::CliError;
use crate::output::{format_digest_json, print_warnings};

/// Arguments of the `digest` subcommand.
pub struct DigestArgs {
    pub input: Option<String>,
    pub alg: Option<String>,
    pub exclude: Vec<String>,
    pub config: Option<String>,
    pub ancestors_only: bool,
    pub json: bool,
    pub report: bool,
}

pub fn run(args: DigestArgs) -> Result<(), CliError> {
    let options = resolve_options(&args)?;
    let value = read_value(args.input)?;

    let (hash, report) = digest_with_report(&value, &options)?;

    if args.json || args.report {
        let report = args.report.then_some(&report);
        println!("{}", format_digest_json(options.algorithm, &hash, report));
    } else {
        print_warnings(&report);
        println!("{}", hash);
    }
    Ok(())
}

/// Config file first, then flags on top.
fn resolve_options(args: &DigestArgs) -> Result<DigestOptions, CliError> {
    let mut options = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            let document = serde_json::from_str(&text).map_err(|source| CliError::Json {
                path: path.clone(),
                source,
            })?;
            DigestOptions::from_json_value(document)?
        }
        None => DigestOptions::default(),
    };

    if let Some(alg) = &args.alg {
        options.algorithm = alg.parse()?;
    }
    options
        .exclusions
        .extend(args.exclude.iter().cloned().collect::<FieldExclusions>());
    if args.ancestors_only {
        options.cycle_policy = CyclePolicy::Ancestors;
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use objdigest_canonical::{DigestAlg, DigestError};

    fn args() -> DigestArgs {
        DigestArgs {
            input: None,
            alg: None,
            exclude: vec![],
            config: None,
            ancestors_only: false,
            json: false,
            report: false,
        }
    }

    #[test]
    fn flags_override_defaults() {
        let mut a = args();
        a.alg = Some("SHA-512".into());
        a.exclude = vec!["Secret".into()];
        a.ancestors_only = true;
        let options = resolve_options(&a).unwrap();
        assert_eq!(options.algorithm, DigestAlg::Sha512);
        assert!(options.exclusions.contains("Secret"));
        assert_eq!(options.cycle_policy, CyclePolicy::Ancestors);
    }

    #[test]
    fn unknown_algorithm_is_reported() {
        let mut a = args();
        a.alg = Some("blake9".into());
        assert!(matches!(
            resolve_options(&a),
            Err(CliError::Digest(DigestError::UnsupportedAlgorithm(_)))
        ));
    }
}
