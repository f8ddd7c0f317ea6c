//! Entry point for the check worker.
//!
//! Compiled for the web, this registers the spell-check reactor as a web
//! worker. Natively, it speaks the same protocol as JSON lines: one input
//! message per stdin line, one output message per stdout line, logs on
//! stderr.

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
fn main() {
    console_error_panic_hook::set_once();

    use gloo_worker::Registrable;
    use scrivener_check_worker::{LogConfig, SpellCheckReactor, telemetry};

    // A subscriber may already be installed by the page's own setup.
    let _ = telemetry::init(LogConfig::from_env("check-worker"));

    SpellCheckReactor::registrar().register();
}

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
fn main() -> miette::Result<()> {
    native::run()
}

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
mod native {
    use std::io::{BufRead, Write};
    use std::path::PathBuf;

    use clap::Parser;
    use miette::{IntoDiagnostic, Result};
    use scrivener_check_worker::{CheckWorkerHost, LogConfig, telemetry};
    use scrivener_spellcheck::{
        CheckerChannel, CheckerInput, CheckerOutput, DictionaryData, SpellCheckConfig,
    };

    #[derive(Parser)]
    #[command(version, about = "Spell-check worker speaking JSON lines over stdio", long_about = None)]
    struct Cli {
        /// Affix file to load before reading stdin
        #[arg(long, requires = "dic", env = "SCRIVENER_AFF_PATH")]
        aff: Option<PathBuf>,

        /// Word-list file to load before reading stdin
        #[arg(long, requires = "aff", env = "SCRIVENER_DIC_PATH")]
        dic: Option<PathBuf>,
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        telemetry::init(LogConfig::from_env("check-worker")).into_diagnostic()?;

        let host = CheckWorkerHost::spawn(SpellCheckConfig::from_env(), write_output)
            .into_diagnostic()?;

        if let (Some(aff), Some(dic)) = (cli.aff, cli.dic) {
            let data = DictionaryData::from_files(&aff, &dic).into_diagnostic()?;
            host.send(data.into_input()).into_diagnostic()?;
        }

        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = line.into_diagnostic()?;
            if line.trim().is_empty() {
                continue;
            }
            match CheckerInput::from_json(&line) {
                Ok(input) => host.send(input).into_diagnostic()?,
                Err(e) => {
                    tracing::warn!(target: "scrivener::worker", "ignoring malformed input: {e}");
                    write_output(CheckerOutput::Error {
                        message: format!("malformed input: {e}").into(),
                    });
                }
            }
        }

        host.shutdown().into_diagnostic()
    }

    fn write_output(output: CheckerOutput) {
        let line = match output.to_json() {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(target: "scrivener::worker", "failed to encode output: {e}");
                return;
            }
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{line}").and_then(|()| stdout.flush()) {
            tracing::error!(target: "scrivener::worker", "failed to write output: {e}");
        }
    }
}
