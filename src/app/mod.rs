pub mod run_use_case;

pub use run_use_case::{RunRequest, RunSummary, RunUseCase};
