use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use code_peek::app::{
    AppSettings, CodedThemeName, OutputFormat, PreviewController, PreviewKind, ThemeMode,
    detect_system_dark_mode,
};

#[derive(Parser, Debug)]
#[command(name = "codepeek", version, about = "Quick previews of source and YAML files")]
struct Cli {
    /// Settings file to use instead of the per-user one
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Output encoding (defaults to the saved setting)
    #[arg(long, global = true, value_enum)]
    format: Option<FormatArg>,

    /// Coded theme name, e.g. dark.base16-ocean
    #[arg(long, global = true, value_name = "THEME")]
    theme: Option<String>,

    /// Appearance to render for (defaults to the saved setting)
    #[arg(long, global = true, value_enum)]
    appearance: Option<AppearanceArg>,

    /// Highlight as this language instead of detecting it, e.g. "Rust" or "py"
    #[arg(long, global = true, value_name = "NAME")]
    syntax: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a full preview of a file
    Preview {
        file: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the first lines of a file
    Thumbnail {
        file: PathBuf,
        /// Number of lines to keep
        #[arg(short = 'n', long)]
        lines: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List available themes
    Themes,
    /// Inspect or change saved settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print the current settings as JSON
    Show,
    /// Print the settings file location
    Path,
    /// Restore every setting to its default
    Reset,
    /// Change one setting
    Set { key: String, value: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Ansi,
    Html,
    Plain,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Ansi => OutputFormat::Ansi,
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AppearanceArg {
    Light,
    Dark,
    Auto,
}

impl From<AppearanceArg> for ThemeMode {
    fn from(value: AppearanceArg) -> Self {
        match value {
            AppearanceArg::Light => ThemeMode::Light,
            AppearanceArg::Dark => ThemeMode::Dark,
            AppearanceArg::Auto => ThemeMode::SystemDefault,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("codepeek: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings_path = cli.settings.clone().unwrap_or_else(AppSettings::get_config_path);
    let settings = AppSettings::load_from(&settings_path);

    match cli.command {
        Command::Preview { ref file, ref output } => {
            let controller = build_controller(&cli, settings)?;
            render(&controller, &cli, file, PreviewKind::Preview, output.as_deref())
        }
        Command::Thumbnail {
            ref file,
            lines,
            ref output,
        } => {
            let mut settings = settings;
            if let Some(lines) = lines {
                settings.thumbnail_lines = lines.max(1);
            }
            let controller = build_controller(&cli, settings)?;
            render(&controller, &cli, file, PreviewKind::Thumbnail, output.as_deref())
        }
        Command::Themes => {
            let controller = build_controller(&cli, settings)?;
            let current = controller.theme_name().clone();
            for entry in controller.catalog().entries() {
                let marker = if entry.coded == current { "*" } else { " " };
                let origin = if entry.builtin { "" } else { " (custom)" };
                println!("{} {:<28} {}{}", marker, entry.coded.to_string(), entry.display_name, origin);
            }
            Ok(())
        }
        Command::Settings { action } => run_settings(action, settings, &settings_path),
    }
}

fn build_controller(cli: &Cli, settings: AppSettings) -> Result<PreviewController> {
    let mode = cli.appearance.map(ThemeMode::from).unwrap_or(settings.theme_mode);
    let appearance = mode.resolve(detect_system_dark_mode);
    log::debug!("Rendering for {:?} appearance", appearance);

    let mut controller = PreviewController::new(settings, appearance);
    if let Some(theme) = &cli.theme {
        let name: CodedThemeName = theme.parse()?;
        controller
            .use_theme(name)
            .with_context(|| format!("cannot use theme '{}'", theme))?;
    }
    if let Some(syntax) = &cli.syntax {
        controller.force_syntax(syntax)?;
    }
    Ok(controller)
}

fn render(
    controller: &PreviewController,
    cli: &Cli,
    file: &Path,
    kind: PreviewKind,
    output: Option<&Path>,
) -> Result<()> {
    let preview = controller
        .render_file(file, kind)
        .with_context(|| format!("cannot preview {}", file.display()))?;
    log::info!(
        "Rendered {} as {}{}",
        file.display(),
        preview.syntax_name,
        if preview.truncated { " (truncated)" } else { "" }
    );

    let format = cli
        .format
        .map(OutputFormat::from)
        .unwrap_or(controller.settings().output_format);
    let encoded = controller.encode(&preview, format);

    match output {
        Some(path) => fs::write(path, encoded)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(encoded.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn run_settings(action: SettingsAction, mut settings: AppSettings, path: &Path) -> Result<()> {
    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Path => {
            println!("{}", path.display());
        }
        SettingsAction::Reset => {
            AppSettings::default()
                .save_to(path)
                .with_context(|| format!("cannot write {}", path.display()))?;
            println!("Settings reset to defaults");
        }
        SettingsAction::Set { key, value } => {
            settings.set_value(&key, &value)?;
            settings
                .save_to(path)
                .with_context(|| format!("cannot write {}", path.display()))?;
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use code_peek::app::Appearance;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_settings_set_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let set = SettingsAction::Set {
            key: "font_size".to_string(),
            value: "16".to_string(),
        };
        run_settings(set, AppSettings::load_from(&path), &path).unwrap();
        assert_eq!(AppSettings::load_from(&path).font_size, 16);

        let bad = SettingsAction::Set {
            key: "font_size".to_string(),
            value: "huge".to_string(),
        };
        assert!(run_settings(bad, AppSettings::load_from(&path), &path).is_err());
        assert_eq!(AppSettings::load_from(&path).font_size, 16);

        run_settings(SettingsAction::Reset, AppSettings::load_from(&path), &path).unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        run_settings(SettingsAction::Path, AppSettings::default(), &path).unwrap();
        run_settings(SettingsAction::Show, AppSettings::default(), &path).unwrap();
    }

    #[test]
    fn test_settings_subcommand_parses() {
        let cli = parse(&["codepeek", "--settings", "/tmp/s.json", "settings", "set", "tab_size", "2"]);
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.json")));
        match cli.command {
            Command::Settings {
                action: SettingsAction::Set { key, value },
            } => {
                assert_eq!(key, "tab_size");
                assert_eq!(value, "2");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_appearance_flag() {
        let cli = parse(&["codepeek", "--appearance", "dark", "themes"]);
        let controller = build_controller(&cli, AppSettings::default()).unwrap();
        assert_eq!(controller.appearance(), Appearance::Dark);
    }

    #[test]
    fn test_theme_flag_switches_appearance() {
        let cli = parse(&["codepeek", "--appearance", "dark", "--theme", "light.inspired-github", "themes"]);
        let controller = build_controller(&cli, AppSettings::default()).unwrap();
        assert_eq!(controller.appearance(), Appearance::Light);
        assert_eq!(controller.theme_name().to_string(), "light.inspired-github");

        let cli = parse(&["codepeek", "--theme", "dark.no-such-theme", "themes"]);
        assert!(build_controller(&cli, AppSettings::default()).is_err());
        let cli = parse(&["codepeek", "--theme", "sepia", "themes"]);
        assert!(build_controller(&cli, AppSettings::default()).is_err());
    }

    #[test]
    fn test_syntax_flag() {
        let cli = parse(&["codepeek", "--syntax", "py", "preview", "x.yaml"]);
        let controller = build_controller(&cli, AppSettings::default()).unwrap();
        let preview = controller.render_text(Path::new("x.yaml"), "a: 1\n", PreviewKind::Preview, false);
        assert_eq!(preview.syntax_name, "Python");

        let cli = parse(&["codepeek", "--syntax", "klingon", "themes"]);
        assert!(build_controller(&cli, AppSettings::default()).is_err());
    }

    #[test]
    fn test_preview_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("conf.yaml");
        let output = dir.path().join("out.txt");
        fs::write(&input, "b: 1\na: 2\n").unwrap();
        let cli = parse(&[
            "codepeek",
            "--format",
            "plain",
            "--appearance",
            "light",
            "preview",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        let controller = build_controller(&cli, AppSettings::default()).unwrap();
        render(&controller, &cli, &input, PreviewKind::Preview, Some(&output)).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "a: 2\nb: 1\n");
    }
}
