//! End-to-end command flow: `--list`, `--validate`, and scaffolding.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use log::{debug, error};

use crate::catalog::{Catalog, CatalogLocation};
use crate::cli::Cli;
use crate::fetch::{FetchConfig, LicenseSource, SourceFetcher};
use crate::fields::{FieldError, detect_defaults, missing_fields, resolve_field_values};
use crate::license::{
    Evidence, ExistingLicenseFile, FieldValues, IdentificationStrategy, LicenseDescriptor,
    download_license, fill_license,
};
use crate::project::{
    find_existing_license, resolve_output_path, update_package_json_license, write_license_file,
};
use crate::prompt::{Choice, Prompter};
use crate::report::{Console, ListReport, SkipReason, StatusReport};

/// Written texts up to this many lines are echoed back after saving.
const PREVIEW_MAX_LINES: usize = 40;

/// Everything a run needs besides the parsed flags. The environment is read
/// by the caller; nothing here consults process-wide state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cwd: PathBuf,
    /// Value of `NICELICENSE_DATA`, if set
    pub data_env: Option<String>,
    pub fetch: FetchConfig,
    /// Prompts are refused instead of asked
    pub non_interactive: bool,
    /// Field defaults; detected from git and `cwd` when `None`
    pub defaults: Option<FieldValues>,
}

impl AppConfig {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            data_env: None,
            fetch: FetchConfig::default(),
            non_interactive: false,
            defaults: None,
        }
    }
}

pub struct App<'a> {
    config: AppConfig,
    prompter: &'a mut dyn Prompter,
    console: Console<'a>,
}

impl<'a> App<'a> {
    pub fn new(config: AppConfig, prompter: &'a mut dyn Prompter, console: Console<'a>) -> Self {
        Self {
            config,
            prompter,
            console,
        }
    }

    /// Run and report any failure on the console. Returns the exit code.
    pub fn execute(&mut self, cli: &Cli) -> i32 {
        match self.run(cli) {
            Ok(()) => 0,
            Err(err) => {
                let message = format!("{:#}", err);
                if let Err(e) = self.console.error(&message) {
                    error!("Failed to report error {:?}: {}", message, e);
                }
                1
            }
        }
    }

    pub fn run(&mut self, cli: &Cli) -> Result<()> {
        let location = CatalogLocation::resolve(
            cli.data.as_deref(),
            self.config.data_env.as_deref(),
            &self.config.cwd,
        );
        debug!("Loading catalog from {}", location.describe());
        let catalog = Catalog::load(location)?;

        if cli.list {
            return self.list(cli, &catalog);
        }

        let source = SourceFetcher::new(&self.config.fetch, catalog.location.local_root())?;
        if cli.validate {
            return self.validate(cli.strategy, &catalog, &source);
        }
        self.scaffold(cli, &catalog, &source)
    }

    fn list(&mut self, cli: &Cli, catalog: &Catalog) -> Result<()> {
        if self.console.is_json() {
            self.console.emit(&ListReport::new(&catalog.licenses))?;
            return Ok(());
        }

        for license in &catalog.licenses {
            self.console
                .say(&format!("{} - {}", license.spdx, license.name))?;
            if !cli.verbose {
                continue;
            }
            self.console
                .say(&format!("  url: {}", license.source_location))?;
            if let Some(digest) = &license.expected_digest {
                self.console.say(&format!("  sha256: {}", digest))?;
            }
            if !license.required_fields().is_empty() {
                self.console.say(&format!(
                    "  template: {}",
                    license.required_fields().join(", ")
                ))?;
            }
            if !license.advisories.is_empty() {
                self.console
                    .say(&format!("  warnings: {}", license.advisories.join("; ")))?;
            }
        }
        Ok(())
    }

    fn validate(
        &mut self,
        strategy: IdentificationStrategy,
        catalog: &Catalog,
        source: &dyn LicenseSource,
    ) -> Result<()> {
        let Some(existing) = find_existing_license(&self.config.cwd)? else {
            let message = "No LICENSE file found.".to_string();
            if self.console.is_json() {
                self.console.emit(&StatusReport::Missing { message })?;
            } else {
                self.console.say(&message)?;
            }
            return Ok(());
        };

        let outcome = strategy.identify(&existing.text, &catalog.licenses, source);
        let path = existing.path.display().to_string();

        let Some(found) = outcome.identification else {
            if let Some(scan_error) = outcome.scan_error {
                return Err(anyhow::Error::new(scan_error)
                    .context("Could not identify LICENSE; the catalog scan was incomplete"));
            }
            let message = unidentified_message(strategy).to_string();
            if self.console.is_json() {
                self.console
                    .emit(&StatusReport::Unknown { message, path })?;
            } else {
                self.console.say(&message)?;
            }
            return Ok(());
        };

        let percent = found.confidence_percent();
        if self.console.is_json() {
            let (matched, total) = match found.evidence {
                Evidence::Fingerprints { matched, total } => (Some(matched), Some(total)),
                Evidence::Template => (None, None),
            };
            self.console.emit(&StatusReport::Identified {
                spdx: found.license.spdx.clone(),
                name: found.license.name.clone(),
                path,
                confidence: found.confidence,
                confidence_percent: format!("{}%", percent),
                matched_fingerprints: matched,
                total_fingerprints: total,
                method: found.evidence.method().to_string(),
            })?;
            return Ok(());
        }

        let detail = match found.evidence {
            Evidence::Fingerprints { matched, total } => {
                format!("{}/{} fingerprints matched", matched, total)
            }
            Evidence::Template => "canonical text template matched".to_string(),
        };
        self.console.say(&format!(
            "Identified {} as {} ({}% confidence, {}).",
            existing.filename, found.license.spdx, percent, detail
        ))?;
        Ok(())
    }

    fn scaffold(&mut self, cli: &Cli, catalog: &Catalog, source: &dyn LicenseSource) -> Result<()> {
        let cwd = self.config.cwd.clone();
        let non_interactive = self.config.non_interactive;
        let defaults = match &self.config.defaults {
            Some(defaults) => defaults.clone(),
            None => detect_defaults(&cwd),
        };
        let existing = find_existing_license(&cwd)?;

        let requested = match cli.license.as_deref() {
            Some(spdx) => Some(
                catalog
                    .find(spdx)
                    .ok_or_else(|| anyhow!("Unknown license: {}", spdx))?,
            ),
            None => None,
        };

        if let Some(existing) = &existing {
            if !cli.stdout {
                self.console
                    .say(&format!("Found {}.", existing.filename))?;
            }
            let Some(requested) = requested else {
                if self.console.is_json() {
                    self.console.emit(&StatusReport::Existing {
                        path: existing.path.display().to_string(),
                    })?;
                }
                return Ok(());
            };
            if !self.confirm_overwrite(existing, cli.yes, non_interactive)? {
                if self.console.is_json() {
                    self.console.emit(&StatusReport::Skipped {
                        reason: SkipReason::OverwriteDeclined,
                    })?;
                } else {
                    self.console.say("Leaving existing license unchanged.")?;
                }
                return Ok(());
            }
            self.console.say(&format!(
                "--license {} requested, will replace.",
                requested.spdx
            ))?;
        }

        if requested.is_none() && non_interactive {
            return Err(anyhow!(
                "License selection required in non-interactive mode. Provide --license."
            ));
        }
        let selected = match requested {
            Some(license) => Some(license),
            None => self.choose_license(catalog)?,
        };
        let Some(selected) = selected else {
            if self.console.is_json() {
                self.console.emit(&StatusReport::Skipped {
                    reason: SkipReason::NoSelection,
                })?;
            } else {
                self.console.say("No license selected.")?;
            }
            return Ok(());
        };

        if !cli.stdout {
            self.console
                .say(&format!("Downloading {}...", selected.spdx))?;
        }
        let downloaded = download_license(selected, source)?;

        let provided = cli.provided_fields();
        if non_interactive && !cli.yes {
            let missing = missing_fields(selected, &provided);
            if !missing.is_empty() {
                return Err(FieldError::MissingNonInteractive { fields: missing }.into());
            }
        }
        let values =
            resolve_field_values(selected, &provided, &defaults, cli.yes, &mut *self.prompter)?;
        let filled = fill_license(&downloaded, selected, &values)?;

        if cli.stdout {
            if self.console.is_json() {
                self.console.emit(&StatusReport::Stdout {
                    spdx: selected.spdx.clone(),
                    name: selected.name.clone(),
                    license_text: filled,
                    warnings: selected.advisories.clone(),
                })?;
            } else {
                self.console
                    .write_raw(&format!("{}\n", filled.trim_end()))?;
            }
            return Ok(());
        }

        let target = resolve_output_path(
            &cwd,
            existing.as_ref(),
            cli.path.as_deref(),
            cli.yes,
            non_interactive,
            &mut *self.prompter,
        )?;

        if cli.dry_run {
            if self.console.is_json() {
                self.console.emit(&StatusReport::DryRun {
                    spdx: selected.spdx.clone(),
                    name: selected.name.clone(),
                    path: target.display().to_string(),
                    warnings: selected.advisories.clone(),
                })?;
            } else {
                self.console
                    .say(&format!("Dry run: would write {}.", file_name(&target)))?;
            }
            return Ok(());
        }

        write_license_file(&target, &filled)?;
        let update = update_package_json_license(
            &cwd,
            &selected.spdx,
            cli.yes,
            non_interactive,
            &mut *self.prompter,
        )?;

        if self.console.is_json() {
            self.console.emit(&StatusReport::Written {
                spdx: selected.spdx.clone(),
                name: selected.name.clone(),
                path: target.display().to_string(),
                package_json_updated: update.updated,
                warnings: selected.advisories.clone(),
            })?;
            return Ok(());
        }

        self.console.say(&format!("Saved {}.", file_name(&target)))?;
        if filled.split('\n').count() <= PREVIEW_MAX_LINES {
            self.console.say("\n--------\n")?;
            self.console.say(filled.trim_end())?;
            self.console.say("\n--------\n")?;
        }
        for advisory in &selected.advisories {
            self.console.warn(&format!("Warning: {}", advisory))?;
        }
        match (&update.path, update.updated) {
            (Some(_), true) => self.console.say("Updated package.json license field.")?,
            (None, _) => self
                .console
                .say("No package.json found; skipping license field update.")?,
            (Some(_), false) => {}
        }
        Ok(())
    }

    fn confirm_overwrite(
        &mut self,
        existing: &ExistingLicenseFile,
        yes: bool,
        non_interactive: bool,
    ) -> Result<bool> {
        if yes {
            return Ok(true);
        }
        if non_interactive {
            return Err(anyhow!(
                "Overwrite confirmation required in non-interactive mode. Provide --yes to proceed."
            ));
        }
        self.prompter
            .confirm(&format!("Replace existing {}?", existing.filename))
    }

    fn choose_license<'c>(&mut self, catalog: &'c Catalog) -> Result<Option<&'c LicenseDescriptor>> {
        let choices: Vec<Choice> = catalog
            .licenses
            .iter()
            .map(|license| Choice {
                name: license.spdx.clone(),
                message: format!("{} - {}", license.spdx, license.name),
            })
            .collect();

        let selected = self.prompter.select("Pick a license", &choices)?;
        Ok(selected.and_then(|spdx| catalog.find(&spdx)))
    }
}

fn unidentified_message(strategy: IdentificationStrategy) -> &'static str {
    match strategy {
        IdentificationStrategy::Fingerprint => {
            "Could not identify LICENSE - no matching fingerprints found."
        }
        IdentificationStrategy::Pattern => {
            "Could not identify LICENSE - no catalog template matched."
        }
        IdentificationStrategy::Auto => {
            "Could not identify LICENSE - no matching fingerprints or templates found."
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
