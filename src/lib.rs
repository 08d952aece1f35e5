pub mod assess;
pub mod executor;
pub mod logging;
pub mod model;
pub mod traits;

// Re-export common types for convenience
pub use assess::{DependencyAnalyses, ImpactAssessmentOptions, ImpactAssessor, ManagerRule};
pub use executor::*;
pub use logging::init_tracing;
pub use model::*;
pub use traits::*;
