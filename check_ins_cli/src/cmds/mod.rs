use clap::{Args, Parser, Subcommand};

pub mod check_in;

pub const ENV_CHECK_INS_URL: &str = "CHECK_INS_URL";

#[derive(Debug, Parser)]
#[command(name = "check-ins-cli")]
#[command(author, version, about, long_about=None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        global = true,
        long,
        env = ENV_CHECK_INS_URL,
        default_value = "http://127.0.0.1:8080"
    )]
    pub url: String,

    #[arg(global = true, long)]
    pub print_command: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List a page of check-ins, newest first
    List(ListCheckIns),
    /// Show a single check-in
    Get(GetCheckIn),
    /// Create a check-in
    Create(CreateCheckIn),
    /// Replace the fields of a check-in
    Update(UpdateCheckIn),
    /// Delete a check-in
    Delete(DeleteCheckIn),
}

#[derive(Debug, Args)]
pub struct ListCheckIns {
    /// Page url taken from the `links` of a previous listing
    #[arg(long, conflicts_with = "page")]
    pub cursor: Option<String>,
    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(from_global)]
    pub url: String,
}

#[derive(Debug, Args)]
pub struct GetCheckIn {
    pub id: i64,
    #[arg(from_global)]
    pub url: String,
}

#[derive(Debug, Args)]
pub struct CheckInFields {
    #[arg(long)]
    pub description: String,
    /// Latitude in [-90, 90]. Omit to store no latitude.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Longitude in [-180, 180]. Omit to store no longitude.
    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Args)]
pub struct CreateCheckIn {
    #[command(flatten)]
    pub fields: CheckInFields,
    #[arg(from_global)]
    pub url: String,
}

#[derive(Debug, Args)]
pub struct UpdateCheckIn {
    pub id: i64,
    #[command(flatten)]
    pub fields: CheckInFields,
    /// Submit as a form post with `_method=PUT` instead of a PUT request
    #[arg(long = "override")]
    pub method_override: bool,
    #[arg(from_global)]
    pub url: String,
}

#[derive(Debug, Args)]
pub struct DeleteCheckIn {
    pub id: i64,
    #[arg(from_global)]
    pub url: String,
}
