pub mod probability;
pub use probability::{
    compute_probabilities, filter_duplex_probability, ProbabilityFilterConfig,
    ProbabilityFilterConfigBuilder, ProbabilityFilterSummary,
};

pub mod structure;
pub use structure::{
    filter_secondary_structure, parse_mfe_threshold, StructureFilterConfig,
    StructureFilterConfigBuilder, StructureFilterSummary,
};
