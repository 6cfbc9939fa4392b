use anyhow::{Result, anyhow};
use clap::Parser;
use image_caption::CaptionApp;
#[cfg(feature = "system-clipboard")]
use image_caption::clipboard::SystemClipboard;
use image_caption::config::CaptionConfig;
use image_caption::core::ImageFile;
use image_caption::state::AppEvent;

/// Caption an image with the image-captioning API:
/// - validates the file (images only, at most 5MB)
/// - uploads it and prints the caption
#[derive(Parser, Debug)]
#[command(name = "caption")]
#[command(about = "🖼️ Generate a caption for an image")]
#[command(long_about = "Upload an image to the captioning service and print the generated caption.
The API key and endpoint default to the values compiled in (CAPTION_API_KEY, CAPTION_API_URL).")]
struct Args {
    /// Image to caption
    #[arg(help = "Image file (JPG, PNG, GIF, ... up to 5MB)")]
    image: String,

    /// API key override
    #[arg(
        short = 'k',
        long,
        help = "API key sent in the x-api-key header (overrides the built-in key)"
    )]
    api_key: Option<String>,

    /// Endpoint override
    #[arg(short, long, help = "Captioning endpoint URL (overrides the built-in endpoint)")]
    endpoint: Option<String>,

    /// Copy the caption to the clipboard
    #[arg(
        short,
        long,
        help = "Copy the generated caption to the clipboard \
                (on X11/Wayland, stays running until the clipboard is replaced)"
    )]
    copy: bool,

    /// Print the history entry as JSON
    #[arg(long, help = "Print the result as a JSON history entry instead of plain text")]
    json: bool,

    /// Verbose diagnostics
    #[arg(short, long, help = "Show debug diagnostics on stderr")]
    verbose: bool,
}

impl Args {
    fn to_config(&self) -> CaptionConfig {
        let mut config = CaptionConfig::default();
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    image_caption::logging::init_tracing(args.verbose);

    let mut builder = CaptionApp::builder().with_config(args.to_config());
    #[cfg(feature = "system-clipboard")]
    if args.copy {
        builder = builder.with_clipboard(Box::new(SystemClipboard::holding()));
    }
    let mut app = builder.build().map_err(|e| anyhow!(e.user_message()))?;

    let image = ImageFile::from_path(&args.image).map_err(|e| anyhow!(e.user_message()))?;
    app.dispatch(AppEvent::FileSelected(image));
    if let Some(message) = app.state().error() {
        return Err(anyhow!(message.to_string()));
    }

    let state = app.generate().await;
    if let Some(message) = state.error() {
        return Err(anyhow!(message.to_string()));
    }

    if args.json {
        let entry = state
            .history()
            .get(0)
            .ok_or_else(|| anyhow!("No caption generated"))?;
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        let view = app.view();
        println!("{}", view.caption.unwrap_or_default());
    }

    if args.copy {
        app.dispatch(AppEvent::CaptionCopied);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use image_caption::config::PLACEHOLDER_API_KEY;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["caption", "photo.jpg"]).unwrap();
        assert_eq!(args.image, "photo.jpg");
        assert!(!args.copy && !args.json && !args.verbose);
        assert!(args.api_key.is_none());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = Args::try_parse_from([
            "caption",
            "photo.jpg",
            "--api-key",
            "k-123",
            "--endpoint",
            "http://localhost:9000/caption",
            "--copy",
        ])
        .unwrap();
        let config = args.to_config();
        assert_eq!(config.endpoint, "http://localhost:9000/caption");
        assert_eq!(config.credential.api_key(), Some("k-123"));
        assert!(args.copy);
    }

    #[test]
    fn test_placeholder_key_flag_is_unconfigured() {
        let args =
            Args::try_parse_from(["caption", "photo.jpg", "-k", PLACEHOLDER_API_KEY]).unwrap();
        assert!(!args.to_config().credential.is_configured());
    }

    #[test]
    fn test_copy_help_mentions_clipboard_hold() {
        let command = Args::command();
        let copy = command
            .get_arguments()
            .find(|arg| arg.get_id() == "copy")
            .unwrap();
        let help = copy.get_help().unwrap().to_string();
        assert!(help.contains("stays running until the clipboard is replaced"));
    }

    #[test]
    fn test_image_is_required() {
        assert!(Args::try_parse_from(["caption"]).is_err());
    }
}
