use std::collections::BTreeMap;
use std::path::PathBuf;

use divgen_division::{
    DivisionError, ReportDivision, SpecDivisionLayout, SpecExtractOptions, extract_to_divisions,
};
use pyo3::exceptions::{PyFileNotFoundError, PyOSError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "divgen.division.extract_to_divisions.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";
const C_REPORT_PREFIX: &str = "[DIVISION]";

#[pyclass(name = "ReportDivision")]
#[derive(Debug, Clone)]
struct PyReportDivision {
    inner: ReportDivision,
}

impl From<ReportDivision> for PyReportDivision {
    fn from(report_division: ReportDivision) -> Self {
        Self {
            inner: report_division,
        }
    }
}

#[pymethods]
impl PyReportDivision {
    #[getter]
    fn cnt_rows_read(&self) -> u64 {
        self.inner.cnt_rows_read
    }

    #[getter]
    fn rows_by_division(&self) -> Vec<(String, u64)> {
        self.inner.rows_by_division.clone()
    }

    #[getter]
    fn cnt_artifacts_planned(&self) -> u64 {
        self.inner.cnt_artifacts_planned
    }

    #[getter]
    fn cnt_artifacts_written(&self) -> u64 {
        self.inner.cnt_artifacts_written
    }

    #[getter]
    fn dir_out(&self) -> Option<String> {
        self.inner
            .dir_out
            .as_ref()
            .map(|path| path.to_string_lossy().to_string())
    }

    #[getter]
    fn files_out(&self) -> Vec<String> {
        self.inner
            .files_out()
            .iter()
            .map(|path| path.to_string_lossy().to_string())
            .collect()
    }

    #[getter]
    fn warnings(&self) -> Vec<String> {
        self.inner.warnings.clone()
    }

    #[getter]
    fn warning_count(&self) -> usize {
        self.inner.warning_count()
    }

    fn to_dict(&self) -> BTreeMap<String, u64> {
        self.inner.to_dict()
    }

    #[pyo3(signature = (prefix = C_REPORT_PREFIX))]
    fn format(&self, prefix: &str) -> String {
        self.inner.format(prefix)
    }

    fn __str__(&self) -> String {
        self.inner.format(C_REPORT_PREFIX)
    }
}

fn map_division_error(exception: DivisionError) -> PyErr {
    let message = exception.to_string();
    match exception {
        DivisionError::SourceNotFound { .. } => PyFileNotFoundError::new_err(message),
        DivisionError::SourceRead { .. }
        | DivisionError::OutputDirInit { .. }
        | DivisionError::XlsxWrite { .. } => PyOSError::new_err(message),
        DivisionError::SourceParse { .. }
        | DivisionError::MissingColumn { .. }
        | DivisionError::AmbiguousBeltBucket { .. }
        | DivisionError::UnmappedBeltLevel { .. }
        | DivisionError::DuplicateDivision { .. } => PyValueError::new_err(message),
        DivisionError::DataFrame { .. } => PyRuntimeError::new_err(message),
    }
}

fn run_extract(
    py: Python<'_>,
    file_in: String,
    dir_out_root: Option<String>,
    if_dry_run: bool,
) -> PyResult<ReportDivision> {
    let spec_options = SpecExtractOptions {
        dir_out_root: dir_out_root
            .map(PathBuf::from)
            .unwrap_or_else(|| SpecExtractOptions::default().dir_out_root),
        if_dry_run,
    };
    let path_file_in = PathBuf::from(file_in);
    let layout = SpecDivisionLayout::default();

    let report_division =
        py.allow_threads(|| extract_to_divisions(&path_file_in, &layout, &spec_options));
    report_division.map_err(map_division_error)
}

/// Split a registration CSV into roster workbooks; returns the absolute output directory.
#[pyfunction(name = "extract_to_divisions")]
#[pyo3(signature = (file_in, dir_out_root = None))]
fn extract_to_divisions_py(
    py: Python<'_>,
    file_in: String,
    dir_out_root: Option<String>,
) -> PyResult<String> {
    let report_division = run_extract(py, file_in, dir_out_root, false)?;
    report_division
        .dir_out
        .map(|path| path.to_string_lossy().to_string())
        .ok_or_else(|| PyRuntimeError::new_err("Run finished without an output directory."))
}

/// Same run as `extract_to_divisions`, returning the full report.
#[pyfunction(name = "extract_to_divisions_report")]
#[pyo3(signature = (file_in, dir_out_root = None, if_dry_run = false))]
fn extract_to_divisions_report_py(
    py: Python<'_>,
    file_in: String,
    dir_out_root: Option<String>,
    if_dry_run: bool,
) -> PyResult<PyReportDivision> {
    let report_division = run_extract(py, file_in, dir_out_root, if_dry_run)?;
    Ok(PyReportDivision::from(report_division))
}

#[pymodule]
fn _divgen_division_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyReportDivision>()?;
    module.add_function(wrap_pyfunction!(extract_to_divisions_py, module)?)?;
    module.add_function(wrap_pyfunction!(extract_to_divisions_report_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
