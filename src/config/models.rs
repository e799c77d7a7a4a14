use crate::api::models::RecordType;
use crate::error::Error;
use clap::{ArgAction, Parser};
use std::{path::PathBuf, str::FromStr};
use validator::Validate;

pub const DEFAULT_NGROK_URL: &str = "http://localhost:4040";
pub const DEFAULT_IPV4_URL: &str = "https://api.ipify.org";
pub const DEFAULT_IPV6_URL: &str = "https://api6.ipify.org";

// Required flags are optional here, and may be given without a value, so a
// missing one is reported through the event log instead of clap's own exit path.
#[derive(Debug, Parser, Validate)]
#[command(name = "netlify-ddns", version, about, disable_help_flag = true)]
pub struct Args {
    /// Token from "User settings" > "Applications" > "New access token"
    #[arg(short = 't', long, num_args = 0..=1, default_missing_value = "")]
    #[validate(required, length(min = 1))]
    pub token: Option<String>,

    /// DNS name to update
    #[arg(short = 'h', long, num_args = 0..=1, default_missing_value = "")]
    #[validate(required, length(min = 1))]
    pub hostname: Option<String>,

    /// "A" (IPv4) || "AAAA" (IPv6) || "CNAME" (ngrok tunnels)
    #[arg(
        short = 'a',
        long = "type",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    #[validate(required, length(min = 1))]
    pub record_type: Option<String>,

    /// Base URL of the local ngrok agent API
    #[arg(short = 'n', long, default_value = DEFAULT_NGROK_URL)]
    pub ngrok: String,

    #[arg(long, default_value = "console.log")]
    pub log_file: PathBuf,

    /// Start with an empty log file instead of appending
    #[arg(long)]
    pub truncate_log: bool,

    #[arg(long, default_value = crate::api::netlify::API_BASE_URL)]
    pub api_url: String,

    #[arg(long, default_value = DEFAULT_IPV4_URL)]
    pub ipv4_url: String,

    #[arg(long, default_value = DEFAULT_IPV6_URL)]
    pub ipv6_url: String,

    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    A,
    Aaaa,
    Cname,
}

impl Mode {
    pub fn record_type(self) -> RecordType {
        match self {
            Self::A => RecordType::A,
            Self::Aaaa => RecordType::AAAA,
            Self::Cname => RecordType::CNAME,
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            other => Err(Error::InvalidArgument(format!(
                "--type must be \"A\", \"AAAA\" or \"CNAME\", got \"{}\"",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub hostname: String,
    pub mode: Mode,
    pub ngrok_url: String,
    pub api_url: String,
    pub ipv4_url: String,
    pub ipv6_url: String,
}

impl Config {
    /// First characters of the token, enough to tell tokens apart in the log.
    pub fn token_preview(&self) -> String {
        self.token.chars().take(8).collect()
    }
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if let Err(errors) = args.validate() {
            let mut missing: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| match &**field {
                    "record_type" => "--type".to_string(),
                    other => format!("--{}", other),
                })
                .collect();
            missing.sort();
            return Err(Error::MissingArgument(missing.join(" || ")));
        }

        let (Some(token), Some(hostname), Some(record_type)) =
            (args.token, args.hostname, args.record_type)
        else {
            return Err(Error::MissingArgument(
                "--hostname || --type || --token".to_string(),
            ));
        };

        Ok(Self {
            token,
            hostname,
            mode: record_type.parse()?,
            ngrok_url: args.ngrok,
            api_url: args.api_url,
            ipv4_url: args.ipv4_url,
            ipv6_url: args.ipv6_url,
        })
    }
}
