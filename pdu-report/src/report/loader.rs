use std::path::{Path, PathBuf};

use pdu_core::domain::ReportGrid;

use crate::{
    pipeline::{PipelineError, Source},
    sources::open_rows,
};

/// Where the base grid of a report update comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseGrid {
    /// Pristine monthly template; every section starts out empty.
    CleanTemplate(PathBuf),
    /// Output of an earlier run; sections filled back then survive.
    PriorOutput(PathBuf),
}

impl BaseGrid {
    /// Prior output is used only when preserving was asked for and the
    /// output file is already there; otherwise the clean template.
    pub fn choose(template: &Path, output: &Path, preserve_existing: bool) -> Self {
        if preserve_existing && output.exists() {
            BaseGrid::PriorOutput(output.to_path_buf())
        } else {
            BaseGrid::CleanTemplate(template.to_path_buf())
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            BaseGrid::CleanTemplate(p) | BaseGrid::PriorOutput(p) => p,
        }
    }

    pub fn is_prior_output(&self) -> bool {
        matches!(self, BaseGrid::PriorOutput(_))
    }
}

impl Source<ReportGrid> for BaseGrid {
    fn load(&self) -> Result<ReportGrid, PipelineError> {
        match self {
            BaseGrid::CleanTemplate(path) => {
                tracing::info!(path = %path.display(), "using clean template")
            }
            BaseGrid::PriorOutput(path) => tracing::info!(
                path = %path.display(),
                "loading existing filled report (preserving previous data)"
            ),
        }

        let rows = open_rows(self.path()).load()?;
        if rows.is_empty() && !self.is_prior_output() {
            return Err(PipelineError::Load(format!(
                "template {} contains no rows",
                self.path().display()
            )));
        }

        Ok(ReportGrid::from_text_rows(rows))
    }
}
