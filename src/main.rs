//! CLI entry point for snipview.

use std::io::Write;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use snipview::cli::{Cli, OutputFormat};
use snipview::config::ViewerConfig;
use snipview::export::{render_html, render_text};
use snipview::gallery::{Gallery, builtin_snippet};
use snipview::logging::init_logging;
use snipview::snippet::{CodeSnippet, FALLBACK_LABEL};
use snipview::tui::{self, ViewSettings};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "snipview", &mut std::io::stdout());
        return Ok(());
    }

    // File logging only when the terminal is ours or a log file was requested
    let _guard = (cli.format == OutputFormat::Tui || cli.log_file.is_some())
        .then(|| init_logging(cli.log_file.as_deref(), Some(&cli.log_level)));

    let config = ViewerConfig::resolve(cli.config.as_deref(), &cli.to_config_overrides())
        .wrap_err("Failed to resolve configuration")?;

    if let Some(ref path) = cli.save_config {
        config
            .save(path)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote configuration to {}", path.display());
    }

    let gallery = load_gallery(&cli, &config)?;
    info!(entries = gallery.len(), format = ?cli.format, "Snippets ready");

    let rendered = match cli.format {
        OutputFormat::Tui => {
            let settings = ViewSettings {
                tab_width: config.viewer.tab_width,
                overflow: config.viewer.overflow,
                theme: config.theme().wrap_err("Invalid theme colors")?,
            };
            return tui::run(gallery, settings);
        }
        OutputFormat::Text => gallery
            .entries()
            .iter()
            .map(|entry| render_text(&entry.snippet, &entry.title, config.viewer.tab_width))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Html => gallery
            .entries()
            .iter()
            .map(|entry| {
                render_html(
                    &entry.snippet,
                    &entry.title,
                    config.viewer.overflow,
                    config.viewer.tab_width,
                )
            })
            .collect::<String>(),
    };

    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)
            .wrap_err_with(|| format!("Failed to write to {}", path.display()))?;
        eprintln!("Wrote snippet to {}", path.display());
    } else {
        std::io::stdout()
            .write_all(rendered.as_bytes())
            .wrap_err("Failed to write to stdout")?;
    }

    Ok(())
}

/// Build the gallery from `--gallery`, a file, stdin (`-`), or the built-in sample.
fn load_gallery(cli: &Cli, config: &ViewerConfig) -> Result<Gallery> {
    if let Some(ref path) = cli.gallery {
        info!(source = %path.display(), "Loading gallery");
        return Gallery::load(path)
            .wrap_err_with(|| format!("Failed to load gallery {}", path.display()));
    }

    let source = cli
        .input
        .as_deref()
        .map_or("built-in sample".into(), |path| path.display().to_string());
    info!(%source, "Loading snippet");

    let snippet = match cli.input {
        Some(ref path) if path.as_os_str() == "-" => {
            let label = cli.language.as_deref().unwrap_or(FALLBACK_LABEL);
            CodeSnippet::from_reader(std::io::stdin().lock(), label)
                .wrap_err("Failed to read snippet from stdin")?
        }
        Some(ref path) => CodeSnippet::from_path(path, cli.language.as_deref())?,
        None => {
            let sample = builtin_snippet();
            match cli.language {
                Some(ref label) => CodeSnippet::new(sample.content(), label.as_str()),
                None => sample,
            }
        }
    };

    Ok(Gallery::single(config.viewer.title.clone(), snippet))
}
