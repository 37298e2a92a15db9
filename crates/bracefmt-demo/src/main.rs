//! Prints a showcase of every bracefmt color, style and convenience function.

use bracefmt::{args, Formatter, Named};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

const COLORS: &[&str] = &[
    "{black}{white | background}Black{reset}",
    "{red}Red{reset}",
    "{green}Green{reset}",
    "{yellow}Yellow{reset}",
    "{blue}Blue{reset}",
    "{magenta}Magenta{reset}",
    "{cyan}Cyan{reset}",
    "{white}{black | background}White{reset}",
    "{gray}Gray{reset}",
    "{rgb 255 99 71}Tomato{reset}",
    r#"{color "0xADFF2F"}Greeny yellow{reset}"#,
];

const BRIGHT: &[&str] = &[
    "{black | bright}Bright black{reset}",
    "{red | bright}Bright red{reset}",
    "{green | bright}Bright green{reset}",
    "{yellow | bright}Bright yellow{reset}",
    "{blue | bright}Bright blue{reset}",
    "{magenta | bright}Bright magenta{reset}",
    "{cyan | bright}Bright cyan{reset}",
    "{white | bright}{black | background}Bright white{reset}",
    "{gray | bright}Bright gray{reset}",
];

const BACKGROUNDS: &[&str] = &[
    "{black | background}{white}Background black{reset}",
    "{red | background}Background red{reset}",
    "{green | background}Background green{reset}",
    "{yellow | background}Background yellow{reset}",
    "{blue | background}Background blue{reset}",
    "{magenta | background}Background magenta{reset}",
    "{cyan | background}Background cyan{reset}",
    "{white | background}{black}Background white{reset}",
    "{gray | background}Background gray{reset}",
    "{rgb 255 99 71 | background}Background tomato{reset}",
    r#"{color "0xADFF2F" | background}Background greeny yellow{reset}"#,
];

const STYLES: &[&str] = &[
    "{bold}Bold{reset}",
    "{faint}Faint{reset}",
    "{italic}Italic{reset}",
    "{underline}Underline{reset}",
    "{blink}Blink{reset}",
    "{overline}Overline{reset}",
    "{invert}Invert{reset}",
    "Hide: '{hide}Hide{reset}'",
    "{strike}Strike{reset}",
    "{bold}Bold on{bold | off} and off",
];

const SYSTEM: &[&str] = &[
    "IP: {ip}",
    "User: {user}",
    "Executable: {executable}",
    "Current working directory: {cwd}",
    "Hostname: {hostname}",
    r#"Environment: USER={env "USER"}"#,
    r#"Expanded: {expand "$HOME/.config"}"#,
    "Process ID: {pid}",
    "Parent process ID: {ppid}",
    "User ID: {uid} (effective {euid})",
    "Group ID: {gid} (effective {egid})",
    "Bell{bell}",
];

const TIME: &[&str] = &[
    "Now: {now}",
    "RFC 3339: {now | rfc3339}",
    "ISO 8601: {now | iso8601}",
];

const PATHS: &[&str] = &[
    r#"Absolute: {absolute "."}"#,
    r#"Base: {base "/var/log/app.log"}"#,
    r#"Directory: {directory "/var/log/app.log"}"#,
    r#"Extension: {extension "/var/log/app.log"}"#,
    r#"Clean: {clean "/var//log/../lib/./app"}"#,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Section {
    Colors,
    Bright,
    Backgrounds,
    Styles,
    System,
    Time,
    Paths,
    Arguments,
}

impl Section {
    fn title(self) -> &'static str {
        match self {
            Section::Colors => "Colors",
            Section::Bright => "Bright colors",
            Section::Backgrounds => "Background colors",
            Section::Styles => "Text attributes",
            Section::System => "System",
            Section::Time => "Time",
            Section::Paths => "Paths",
            Section::Arguments => "Arguments",
        }
    }

    fn messages(self) -> &'static [&'static str] {
        match self {
            Section::Colors => COLORS,
            Section::Bright => BRIGHT,
            Section::Backgrounds => BACKGROUNDS,
            Section::Styles => STYLES,
            Section::System => SYSTEM,
            Section::Time => TIME,
            Section::Paths => PATHS,
            Section::Arguments => &[],
        }
    }
}

/// Showcase of the bracefmt built-in functions
#[derive(Parser)]
#[command(name = "bracefmt-demo")]
#[command(version)]
#[command(about = "Prints every bracefmt color, style and convenience function")]
struct Cli {
    /// Disable escape sequences (colors and styles render as nothing)
    #[arg(long)]
    plain: bool,

    /// Force escape sequences even when stdout is not a terminal
    #[arg(long, conflicts_with = "plain")]
    color: bool,

    /// Only print these sections
    #[arg(short, long, value_enum)]
    section: Vec<Section>,

    /// Log formatter decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn print_arguments(formatter: &Formatter) -> bracefmt::Result<()> {
    let named = Named::new().with("file", "src/main.rs").with("line", 42);
    let lines = [
        formatter.format("Automatic: {p} {p} {p}", &args![1, "two", 3.5])?,
        formatter.format("Positional: {p2} {p1} {p0}", &args!["c", "b", "a"])?,
        formatter.format(
            "Named: {file}:{line}: {red}{p1}{reset}",
            &args![named, "error"],
        )?,
        formatter.format("Unused arguments are appended:", &args![true, 7])?,
        formatter.format(r#"Pipelines: {"shout" | upper} {"Quiet" | lower} {"name" | capitalize}"#, &[])?,
    ];
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn run(cli: &Cli) -> bracefmt::Result<()> {
    let mut formatter = Formatter::new();
    if cli.plain {
        formatter.disable_escape_sequences();
    } else if cli.color {
        formatter.enable_escape_sequences();
    }

    let sections: Vec<Section> = if cli.section.is_empty() {
        Section::value_variants().to_vec()
    } else {
        cli.section.clone()
    };

    for (i, section) in sections.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{}",
            formatter.format("{bold}{p}{reset}", &args![section.title()])?
        );

        if section == Section::Arguments {
            print_arguments(&formatter)?;
            continue;
        }
        for message in section.messages() {
            println!("{}", formatter.format(message, &[])?);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("bracefmt=trace"))
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
