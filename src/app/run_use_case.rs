use crate::config::{Config, LookupConfig};
use crate::constants::{INPUT_KEYS_COLUMN, OUTPUT_SUFFIX};
use crate::error::Result;
use crate::join::{JoinReport, ProviderJoin};
use crate::pipeline::{EnrichmentPipeline, PipelineResult};
use crate::table::Table;
use crate::types::RadiusLookup;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a single invocation should do
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub enrich: bool,
    pub radius: u32,
}

impl RunRequest {
    /// `<input stem>.out.csv` in the working directory
    pub fn default_output(input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        PathBuf::from(format!("{}{}", stem, OUTPUT_SUFFIX))
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub output: PathBuf,
    pub rows: usize,
    pub enrichment: Option<PipelineResult>,
    pub join: JoinReport,
}

/// Read the input, enrich it, join provider tables and write the output.
///
/// Nothing is written when a step fails; only the lookup cache may already
/// hold the rows resolved before the failure.
pub struct RunUseCase<'a> {
    config: &'a Config,
}

impl<'a> RunUseCase<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// `connect` builds the remote lookup and is only called when enrichment is requested.
    pub fn execute<C, P>(&self, request: &RunRequest, connect: C, progress: P) -> Result<RunSummary>
    where
        C: FnOnce(&LookupConfig) -> Result<Box<dyn RadiusLookup>>,
        P: FnMut(usize, usize),
    {
        let mut table = Table::read(&request.input)?;
        info!("Loaded {} rows from {}", table.len(), request.input.display());

        let enrichment = if request.enrich {
            table.require_column(INPUT_KEYS_COLUMN)?;
            let lookup = connect(&self.config.lookup)?;
            let pipeline =
                EnrichmentPipeline::new(&*lookup, &self.config.lookup.cache_dir, request.radius);
            Some(pipeline.run_with_progress(&mut table, progress)?)
        } else {
            None
        };

        let join = ProviderJoin::new(&self.config.providers).run(&mut table)?;

        table.write(&request.output)?;
        info!("Wrote {} rows to {}", table.len(), request.output.display());

        Ok(RunSummary {
            output: request.output.clone(),
            rows: table.len(),
            enrichment,
            join,
        })
    }
}
