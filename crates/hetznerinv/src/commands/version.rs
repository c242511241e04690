use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemInfo>,
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub family: &'static str,
}

impl VersionInfo {
    pub fn new(all: bool) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            system: all.then(|| SystemInfo {
                os: std::env::consts::OS,
                arch: std::env::consts::ARCH,
                family: std::env::consts::FAMILY,
            }),
        }
    }

    pub fn text(&self) -> String {
        match &self.system {
            Some(system) => format!(
                "Running {}, on {} ({})",
                self.version, system.os, system.arch
            ),
            None => self.version.to_string(),
        }
    }
}

/// `--all` without `--output` defaults to JSON
pub fn handle(all: bool, output: Option<OutputFormat>) -> anyhow::Result<()> {
    let info = VersionInfo::new(all);
    let format = output.unwrap_or(if all {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    });

    match format {
        OutputFormat::Text => println!("{}", info.text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&info)?),
    }
    Ok(())
}
