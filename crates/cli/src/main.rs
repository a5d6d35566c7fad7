use api_shared::auth::encode_token;
use api_shared::ApplicatieRegistry;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zrc_core::archief::IsoDuration;
use zrc_core::{InMemoryRegistry, Scope};

#[derive(Parser)]
#[command(name = "zrc")]
#[command(about = "ZRC case registry CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a bearer token for a client application
    Token {
        /// Client identifier, as listed in the applicaties file
        #[arg(long)]
        client_id: String,
        /// Shared secret of the client
        #[arg(long)]
        secret: String,
        /// Scope to put on the token, e.g. zds.scopes.zaken.lezen (repeatable)
        #[arg(long = "scope")]
        scopes: Vec<Scope>,
    },
    /// List the scopes a token can carry
    Scopes,
    /// Add an archival term to a source date
    Archiefactiedatum {
        /// Source date (YYYY-MM-DD)
        #[arg(long)]
        brondatum: NaiveDate,
        /// ISO-8601 period, e.g. P10Y
        #[arg(long)]
        termijn: IsoDuration,
    },
    /// Load the applicaties and registry fixture files and report what they contain
    CheckConfig {
        /// Client applications file
        #[arg(long)]
        applicaties: Option<PathBuf>,
        /// Catalogue and decision fixtures file
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },
}

fn archiefactiedatum(brondatum: NaiveDate, termijn: IsoDuration) -> Result<NaiveDate, String> {
    termijn.add_to(brondatum).map_err(|e| e.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Token {
            client_id,
            secret,
            scopes,
        }) => match encode_token(&client_id, &secret, &scopes) {
            Ok(token) => println!("{token}"),
            Err(e) => eprintln!("Error creating token: {e}"),
        },
        Some(Commands::Scopes) => {
            for scope in Scope::ALL {
                println!("{}", scope.as_str());
            }
        }
        Some(Commands::Archiefactiedatum { brondatum, termijn }) => {
            match archiefactiedatum(brondatum, termijn) {
                Ok(datum) => println!("{datum}"),
                Err(e) => eprintln!("Error computing archiefactiedatum: {e}"),
            }
        }
        Some(Commands::CheckConfig {
            applicaties,
            fixtures,
        }) => {
            if let Some(path) = applicaties {
                let registry = ApplicatieRegistry::from_yaml_file(&path)?;
                println!("{}: {} client application(s)", path.display(), registry.len());
            }
            if let Some(path) = fixtures {
                InMemoryRegistry::from_yaml_file(&path)?;
                println!("{}: fixtures loaded", path.display());
            }
        }
        None => {
            println!("No command given. Use --help for usage.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_archiefactiedatum() {
        let brondatum = NaiveDate::from_ymd_opt(2018, 6, 11).unwrap();
        let termijn: IsoDuration = "P10Y".parse().unwrap();
        assert_eq!(
            archiefactiedatum(brondatum, termijn).unwrap(),
            NaiveDate::from_ymd_opt(2028, 6, 11).unwrap()
        );
    }

    #[test]
    fn test_token_arguments_parse_scopes() {
        let cli = Cli::try_parse_from([
            "zrc",
            "token",
            "--client-id",
            "demo",
            "--secret",
            "s3cret",
            "--scope",
            "zds.scopes.zaken.lezen",
            "--scope",
            "zds.scopes.zaken.aanmaken",
        ])
        .unwrap();
        let Some(Commands::Token { scopes, .. }) = cli.command else {
            panic!("expected token command");
        };
        assert_eq!(scopes, vec![Scope::ZakenLezen, Scope::ZakenAanmaken]);
    }

    #[test]
    fn test_unknown_scope_is_rejected() {
        assert!(Cli::try_parse_from([
            "zrc", "token", "--client-id", "demo", "--secret", "x", "--scope", "zaken.alles",
        ])
        .is_err());
    }
}
