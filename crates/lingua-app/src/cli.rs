use std::path::PathBuf;

use clap::Parser;
use lingua_config::BackendKind;

#[derive(Parser, Debug)]
#[command(
    name = "lingua",
    version,
    about = "Translate text with Google Translate, DeepL or LibreTranslate"
)]
pub struct Cli {
    /// Text to translate. Read from stdin when omitted.
    pub text: Vec<String>,

    /// Source language name or code, `auto` to detect
    #[arg(short, long)]
    pub from: Option<String>,

    /// Target language name or code
    #[arg(short, long)]
    pub to: Option<String>,

    /// Translation service for this session
    #[arg(short, long, value_name = "google|deepl|libre")]
    pub backend: Option<BackendKind>,

    /// Request timeout
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Preferences file
    #[arg(long, value_name = "PATH")]
    pub preferences: Option<PathBuf>,

    /// Print every supported language and exit
    #[arg(long)]
    pub list_languages: bool,

    /// Print the popular languages and exit
    #[arg(long)]
    pub popular: bool,

    /// Detect the language of the text instead of translating it
    #[arg(long)]
    pub detect: bool,

    /// Read requests line by line even when stdin is not a terminal
    #[arg(short, long)]
    pub interactive: bool,
}
