use std::path::PathBuf;
use anyhow::anyhow;

use crate::asm::AssemblerConfig;
use crate::decode::{DecoderConfig, DEFAULT_VERSION_BYTE};
use crate::diagnostic::{Diagnostic, Emitter};

/// Parse the arguments of a subcommand, or exit the process after printing help or an error.
///
/// `program` is what gets shown in the usage line, e.g. `cardscript assemble`.
pub fn cli<A: CliArg>(
    program: &str,
    args: &[String],
    usage_args: &str,
    arg_parsers: A,
) -> A::Value {
    match parse_args(args, arg_parsers) {
        Ok(arg_values) => arg_values,
        Err(ParseError::PrintHelp(opts)) => {
            print_help(program, usage_args, &opts);
            std::process::exit(0);
        },
        Err(ParseError::PrintVersion) => {
            println!("cardscript {}", env!("CARGO_PKG_VERSION"));
            std::process::exit(0);
        },
        Err(ParseError::Error(e)) => {
            print_usage(program, usage_args);
            eprintln!();
            emit_nospans(&e);
            std::process::exit(1);
        },
    }
}

/// Report an error that has no position info, such as a failure to read a file.
pub fn emit_nospans(e: &anyhow::Error) {
    let mut emitter = Emitter::stderr("<command line>", "");
    // only an IO error on stderr could get here, and then there is nowhere left to report it
    let _ = emitter.emit(&Diagnostic::error().with_message(format!("{:#}", e)));
}

fn print_usage(program: &str, usage_args: &str) {
    eprintln!("Usage: {} {}", program, usage_args);
}
fn print_help(program: &str, usage_args: &str, opts: &getopts::Options) {
    eprint!("{}", opts.usage(&format!("Usage: {} {}", program, usage_args)));
}

pub type ArgError = anyhow::Error;

pub enum ParseError { Error(ArgError), PrintHelp(getopts::Options), PrintVersion }
// factors out the parts where we want usage with errors
pub fn parse_args<A: CliArg>(args: &[String], arg_parsers: A) -> Result<A::Value, ParseError> {
    let mut opts = getopts::Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optflag("V", "version", "print the version and exit");
    arg_parsers.add_to_options(&mut opts);

    let mut matches = opts.parse(args).map_err(|e| ParseError::Error(anyhow!("{}", e)))?;
    if matches.opt_present("h") {
        return Err(ParseError::PrintHelp(opts));
    }
    if matches.opt_present("version") {
        return Err(ParseError::PrintVersion);
    }

    matches.free.reverse();

    let out = arg_parsers.extract_value(&mut matches).map_err(ParseError::Error)?;

    if let Some(unexpected_pos) = matches.free.pop() {
        return Err(ParseError::Error(anyhow!("unexpected positional: {:?}", unexpected_pos)));
    }

    Ok(out)
}

// ------------------------------------------------

pub trait CliArg {
    type Value;
    fn add_to_options(&self, opts: &mut getopts::Options);
    /// NOTE: `matches.free` is in reverse order, so you can call `Vec::pop` to extract them.
    fn extract_value(&self, matches: &mut getopts::Matches) -> Result<Self::Value, ArgError>;
}

pub fn output() -> impl CliArg<Value=Option<PathBuf>> { opts::PathOpt(opts::Opt {
    short: "o", long: "output", metavar: "OUTPUT",
    help: "write the result to a file instead of standard output",
})}
pub fn json() -> impl CliArg<Value=bool> { opts::Flag {
    short: "", long: "json",
    help: "print machine-readable JSON",
}}
pub fn decoder_config() -> impl CliArg<Value=DecoderConfig> { opts::DecoderConfigOpts }
pub fn assembler_config() -> impl CliArg<Value=AssemblerConfig> { opts::AssemblerConfigOpts }
pub fn path_arg(s: &'static str) -> impl CliArg<Value=PathBuf> { opts::ReqPathOpt(opts::Positional { metavar: s }) }
pub fn input() -> impl CliArg<Value=PathBuf> { path_arg("FILE") }


/// A simple HList type for CliArg.
#[doc(hidden)]
pub struct Args<H, T>(pub H, pub T);
#[macro_export]
macro_rules! args {
    () => { () };
    ($a:expr $(, $more:expr)* $(,)?) => { $crate::cli_helper::Args($a, $crate::args!( $($more),* )) }
}
#[macro_export]
macro_rules! args_pat {
    () => { () };
    ($a:pat $(, $more:pat)* $(,)?) => { $crate::cli_helper::Args($a, $crate::args_pat!( $($more),* )) }
}


impl CliArg for () {
    type Value = ();
    fn add_to_options(&self, _: &mut getopts::Options) {}
    fn extract_value(&self, _: &mut getopts::Matches) -> Result<Self::Value, ArgError> { Ok(()) }
}

impl<H: CliArg, T: CliArg> CliArg for Args<H, T> {
    type Value = Args<H::Value, T::Value>;
    fn add_to_options(&self, options: &mut getopts::Options) {
        self.0.add_to_options(options);
        self.1.add_to_options(options);
    }
    fn extract_value(&self, matches: &mut getopts::Matches) -> Result<Self::Value, ArgError> {
        let head = self.0.extract_value(matches)?;
        let tail = self.1.extract_value(matches)?;
        Ok(Args(head, tail))
    }
}


pub mod opts {
    pub use super::*;

    pub struct Opt {
        pub short: &'static str,
        pub long: &'static str,
        pub metavar: &'static str,
        pub help: &'static str
    }
    impl CliArg for Opt {
        type Value = Option<String>;
        fn add_to_options(&self, opts: &mut getopts::Options) {
            opts.optopt(self.short, self.long, self.help, self.metavar);
        }
        fn extract_value(&self, matches: &mut getopts::Matches) -> Result<Self::Value, ArgError> {
            matches.opt_get(self.long).map_err(|e| anyhow!("{}", e))
        }
    }

    pub struct Flag {
        pub short: &'static str,
        pub long: &'static str,
        pub help: &'static str
    }
    impl CliArg for Flag {
        type Value = bool;
        fn add_to_options(&self, opts: &mut getopts::Options) {
            opts.optflag(self.short, self.long, self.help);
        }
        fn extract_value(&self, matches: &mut getopts::Matches) -> Result<Self::Value, ArgError> {
            Ok(matches.opt_present(self.long))
        }
    }

    pub struct Positional {
        pub metavar: &'static str,
    }
    impl CliArg for Positional {
        type Value = String;
        fn add_to_options(&self, _: &mut getopts::Options) {}
        fn extract_value(&self, matches: &mut getopts::Matches) -> Result<Self::Value, ArgError> {
            matches.free.pop().ok_or_else(|| anyhow!("missing required positional arg {}", self.metavar))
        }
    }

    pub struct PathOpt<Inner>(pub Inner);
    impl<Inner: CliArg<Value=Option<String>>> CliArg for PathOpt<Inner> {
        type Value = Option<PathBuf>;
        fn add_to_options(&self, opts: &mut getopts::Options) { self.0.add_to_options(opts) }
        fn extract_value(&self, matches: &mut getopts::Matches) -> Result<Self::Value, ArgError> {
            self.0.extract_value(matches).map(|opt| opt.map(Into::into))
        }
    }

    pub struct ReqPathOpt<Inner>(pub Inner);
    impl<Inner: CliArg<Value=String>> CliArg for ReqPathOpt<Inner> {
        type Value = PathBuf;
        fn add_to_options(&self, opts: &mut getopts::Options) { self.0.add_to_options(opts) }
        fn extract_value(&self, matches: &mut getopts::Matches) -> Result<Self::Value, ArgError> {
            self.0.extract_value(matches).map(Into::into)
        }
    }

    const VERSION_BYTE_HELP: &str = "header byte that programs start with (default 0x01)";

    fn version_byte(matches: &getopts::Matches) -> Result<u8, ArgError> {
        match matches.opt_str("version-byte") {
            None => Ok(DEFAULT_VERSION_BYTE),
            Some(text) => crate::asm::parse_int(&text).ok_or_else(|| anyhow!("invalid --version-byte {:?}: expected a number from 0 to 255", text)),
        }
    }

    pub struct DecoderConfigOpts;
    impl CliArg for DecoderConfigOpts {
        type Value = DecoderConfig;
        fn add_to_options(&self, opts: &mut getopts::Options) {
            opts.optopt("", "version-byte", VERSION_BYTE_HELP, "NUM");
            opts.optflag("", "strict-version", "treat a header byte other than the version byte as an error");
        }
        fn extract_value(&self, matches: &mut getopts::Matches) -> Result<Self::Value, ArgError> {
            Ok(DecoderConfig {
                version_byte: version_byte(matches)?,
                strict_version: matches.opt_present("strict-version"),
            })
        }
    }

    pub struct AssemblerConfigOpts;
    impl CliArg for AssemblerConfigOpts {
        type Value = AssemblerConfig;
        fn add_to_options(&self, opts: &mut getopts::Options) {
            opts.optopt("", "version-byte", VERSION_BYTE_HELP, "NUM");
        }
        fn extract_value(&self, matches: &mut getopts::Matches) -> Result<Self::Value, ArgError> {
            Ok(AssemblerConfig { version_byte: version_byte(matches)? })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{args, args_pat};

    fn strings(args: &[&str]) -> Vec<String> { args.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn positional_and_options() {
        let parsed = parse_args(
            &strings(&["in.bin", "--version-byte", "0x2a", "--strict-version"]),
            args![input(), decoder_config()],
        );
        let args_pat![path, config] = match parsed {
            Ok(values) => values,
            Err(_) => panic!("failed to parse"),
        };
        assert_eq!(path, PathBuf::from("in.bin"));
        assert_eq!(config, DecoderConfig { version_byte: 0x2a, strict_version: true });
    }

    #[test]
    fn defaults() {
        let parsed = parse_args(&strings(&["in.cards"]), args![input(), output(), assembler_config()]);
        let args_pat![_, output, config] = match parsed {
            Ok(values) => values,
            Err(_) => panic!("failed to parse"),
        };
        assert_eq!(output, None);
        assert_eq!(config, AssemblerConfig::default());
    }

    #[test]
    fn errors() {
        let bad_byte = parse_args(&strings(&["x", "--version-byte", "256"]), args![input(), decoder_config()]);
        assert!(matches!(bad_byte, Err(ParseError::Error(_))));

        let extra = parse_args(&strings(&["x", "y"]), args![input()]);
        assert!(matches!(extra, Err(ParseError::Error(_))));

        let missing = parse_args(&strings(&[]), args![input()]);
        assert!(matches!(missing, Err(ParseError::Error(_))));

        let help = parse_args(&strings(&["--help"]), args![input()]);
        assert!(matches!(help, Err(ParseError::PrintHelp(_))));
    }
}
