use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{App, ArgMatches, ErrorKind};

use glprimer::config::HostConfig;
use glprimer::graphics::{ShaderSource, ShaderStage};
use glprimer::lessons::Lesson;
use glprimer::logging::{init_logging, LoggingConfig};
use glprimer::window;

#[derive(Debug, PartialEq)]
pub enum Command {
    List,
    Describe(Lesson),
    Run {
        lesson: Lesson,
        host: HostConfig,
        vertex: Option<PathBuf>,
        fragment: Option<PathBuf>,
    },
}

#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub command: Command,
    pub log_filter: Option<String>,
}

fn lesson_arg(m: &ArgMatches) -> Result<Lesson> {
    let name = m.value_of("LESSON").unwrap_or_default();
    name.parse::<Lesson>().map_err(anyhow::Error::msg)
}

fn number_arg<T>(m: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    m.value_of(name)
        .map(|v| v.parse::<T>().with_context(|| format!("invalid --{} `{}`", name, v)))
        .transpose()
}

pub fn parse_from<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let yaml = load_yaml!("cli.yaml");
    let matches = App::from_yaml(yaml).get_matches_from_safe(args)?;

    let log_filter = matches.value_of("log").map(String::from);

    let command = match matches.subcommand() {
        ("list", _) => Command::List,
        ("describe", Some(m)) => Command::Describe(lesson_arg(m)?),
        ("run", Some(m)) => {
            let mut host = HostConfig::default();
            if let Some(width) = number_arg(m, "width")? {
                host.width = width;
            }
            if let Some(height) = number_arg(m, "height")? {
                host.height = height;
            }
            if let Some(fps) = number_arg(m, "fps")? {
                host.fps = fps;
            }
            if let Some(samples) = number_arg(m, "samples")? {
                host.samples = samples;
            }
            host.vsync = !m.is_present("no-vsync");

            Command::Run {
                lesson: lesson_arg(m)?,
                host,
                vertex: m.value_of("vertex").map(PathBuf::from),
                fragment: m.value_of("fragment").map(PathBuf::from),
            }
        }
        _ => Command::List,
    };

    Ok(Invocation { command, log_filter })
}

fn list() {
    for lesson in Lesson::ALL.iter() {
        println!("{:<10} {}", lesson.name(), lesson.description());
    }
}

fn describe(lesson: Lesson) -> Result<()> {
    let config = lesson.config()?;
    let layout = config.buffer.layout();

    println!("{}: {}", lesson, lesson.description());
    println!();
    println!(
        "{}{} from {} vertices, {} bytes each",
        config.primitive,
        if config.texture.is_some() { " (textured)" } else { "" },
        config.buffer.vertex_count(),
        layout.stride()
    );
    for attribute in layout.attributes() {
        let range = attribute.byte_range();
        println!(
            "  slot {}: {} x f32 at bytes [{}, {})",
            attribute.slot, attribute.components, range.start, range.end
        );
    }

    for source in [&config.vertex, &config.fragment].iter() {
        println!();
        println!("--- {} shader ---", source.stage());
        print!("{}", source.text());
    }

    Ok(())
}

/// Help, version and the bare-command usage screen come back from clap as errors. Those are
/// printed to stdout and end the run successfully; anything else is passed on.
fn finish_early(err: anyhow::Error) -> Result<()> {
    match err.downcast_ref::<clap::Error>() {
        Some(clap_err)
            if matches!(
                clap_err.kind,
                ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed | ErrorKind::MissingArgumentOrSubcommand
            ) =>
        {
            println!("{}", clap_err.message);
            Ok(())
        }
        _ => Err(err),
    }
}

pub fn cli_main() -> Result<()> {
    let invocation = match parse_from(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => return finish_early(e),
    };

    init_logging(LoggingConfig {
        env_filter: invocation.log_filter,
        ..LoggingConfig::default()
    });

    match invocation.command {
        Command::List => list(),
        Command::Describe(lesson) => describe(lesson)?,
        Command::Run {
            lesson,
            host,
            vertex,
            fragment,
        } => {
            let mut config = lesson.config()?;
            if let Some(path) = vertex {
                config.vertex = ShaderSource::from_file(ShaderStage::Vertex, &path)?;
            }
            if let Some(path) = fragment {
                config.fragment = ShaderSource::from_file(ShaderStage::Fragment, &path)?;
            }

            window::run(lesson, config, &host).with_context(|| format!("running lesson `{}`", lesson))?;
        }
    }

    Ok(())
}
