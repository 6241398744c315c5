use clap::{Parser, ValueEnum};
use site_pdf::Mode;
use site_pdf::config::{ConverterConfig, WaitPolicy};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-pdf")]
#[command(about = "Render a website, or a page and the pages it links to, as a PDF")]
#[command(version)]
pub struct Args {
    /// Page to render; https:// is assumed when no scheme is given
    pub url: String,

    /// single renders one page, multi appends up to 9 linked same-origin pages
    #[arg(short, long, value_enum, default_value_t = ModeArg::Single)]
    pub mode: ModeArg,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config file and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Where to write the PDF (defaults to single-page.pdf or multi-page.pdf)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Linked pages to include in multi mode (at most 9)
    #[arg(long)]
    pub max_links: Option<usize>,

    /// Fixed wait after DOM content is parsed, in milliseconds
    #[arg(long)]
    pub settle_ms: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    #[value(alias = "free")]
    Single,
    #[value(alias = "pro")]
    Multi,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Single => Mode::SinglePage,
            ModeArg::Multi => Mode::MultiPage,
        }
    }
}

/// Build the configuration: file (or defaults), then environment, then flags
pub fn build_config(args: &Args) -> Result<ConverterConfig, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => ConverterConfig::from_file(path)?,
        None => ConverterConfig::default(),
    };
    let mut config = config.with_env_overrides();

    if let Some(webdriver_url) = &args.webdriver_url {
        config.webdriver_url = webdriver_url.clone();
    }
    if let Some(max_links) = args.max_links {
        config.links.max_links = max_links;
    }
    if let Some(delay_ms) = args.settle_ms {
        config.render.wait = WaitPolicy::Settle { delay_ms };
    }
    Ok(config)
}
