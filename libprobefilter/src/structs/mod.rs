pub mod alignment_record;
pub use alignment_record::AlignmentRecord;

pub mod probe_record;
pub use probe_record::ProbeRecord;

pub mod probability_vector;
pub use probability_vector::ProbabilityVector;

pub mod filtered;
pub use filtered::{FilteredProbeLine, FilteredProbeRecord, StructureFilteredProbeRecord};
