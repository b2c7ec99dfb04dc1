//! Minimal CLI parsing for one-shot commands.

use std::env;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Print the GraphQL SDL and exit
    pub print_schema: bool,
    /// Apply migrations and exit
    pub migrate_only: bool,
}

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse(env::args().skip(1))
    }

    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = CliOptions::default();
        for arg in args {
            match arg.as_ref() {
                "--print-schema" => options.print_schema = true,
                "--migrate-only" => options.migrate_only = true,
                other => tracing::debug!(arg = other, "Ignoring unknown argument"),
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        assert_eq!(CliOptions::parse(Vec::<String>::new()), CliOptions::default());

        let options = CliOptions::parse(["--print-schema", "--verbose"]);
        assert!(options.print_schema);
        assert!(!options.migrate_only);

        assert!(CliOptions::parse(["--migrate-only"]).migrate_only);
    }
}
